use super::*;
use rand::Rng;
use rand::seq::SliceRandom;

/// Yields owning `(input, target)` mini-batches from two arrays sharing their leading dimension.
///
/// Rows are taken in order or in a shuffled order without replacement; the trailing rows which
/// do not fill a whole batch are dropped. A batch size above the leading dimension is clamped
/// to it. The iterator is single pass.
pub struct BatchIterator<T> {
    inputs: RowBlock<T>,
    targets: RowBlock<T>,
    order: Vec<usize>,
    batch_size: usize,
    next_batch: usize,
    batches: usize,
}

/// Dense rows of a materialized operand.
struct RowBlock<T> {
    data: Vec<T>,
    row_shape: Shape,
    row_len: usize,
}

impl<T: Numeric> RowBlock<T> {
    fn new(array: NdArray<T>) -> Result<Self> {
        let row_shape: Shape = array.shape[1..].iter().copied().collect();
        Ok(Self {
            row_len: shape::count_of(&row_shape),
            data: array.to_vec()?,
            row_shape,
        })
    }

    fn gather(&self, rows: &[usize]) -> NdArray<T> {
        let mut data = Vec::with_capacity(rows.len() * self.row_len);
        for &row in rows {
            data.extend_from_slice(&self.data[row * self.row_len..(row + 1) * self.row_len]);
        }

        let mut shape: Shape = small_vec![rows.len()];
        shape.extend(self.row_shape.iter().copied());
        NdArray::owned(shape, data)
    }
}

impl<T: Numeric> BatchIterator<T> {
    /// Iterates the rows in their original order.
    pub fn new(inputs: &NdView<T>, targets: &NdView<T>, batch_size: usize) -> Result<Self> {
        let (inputs, targets) = (inputs.materialize()?, targets.materialize()?);
        let dim0 = inputs.shape[0];

        if batch_size == 0 {
            return Err(ArrayError::InvalidArgument(
                "Batch size must be positive".to_string(),
            ));
        }
        if targets.shape[0] != dim0 {
            return Err(ArrayError::InvalidArgument(format!(
                "Inputs have {dim0} rows but targets have {}",
                targets.shape[0]
            )));
        }

        let batch_size = batch_size.min(dim0);
        let batches = if batch_size == 0 { 0 } else { dim0 / batch_size };

        Ok(Self {
            inputs: RowBlock::new(inputs)?,
            targets: RowBlock::new(targets)?,
            order: (0..dim0).collect(),
            batch_size,
            next_batch: 0,
            batches,
        })
    }

    /// Iterates the rows in a random order drawn from `rng`.
    pub fn shuffled<R: Rng + ?Sized>(
        inputs: &NdView<T>,
        targets: &NdView<T>,
        batch_size: usize,
        rng: &mut R,
    ) -> Result<Self> {
        let mut iter = Self::new(inputs, targets, batch_size)?;
        iter.order.shuffle(rng);
        Ok(iter)
    }

    /// Effective batch size after clamping.
    pub fn batch_size(&self) -> usize {
        self.batch_size
    }
}

impl<T: Numeric> Iterator for BatchIterator<T> {
    type Item = (NdArray<T>, NdArray<T>);

    fn next(&mut self) -> Option<Self::Item> {
        if self.next_batch >= self.batches {
            return None;
        }

        let start = self.next_batch * self.batch_size;
        let rows = &self.order[start..start + self.batch_size];
        self.next_batch += 1;

        Some((self.inputs.gather(rows), self.targets.gather(rows)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.batches - self.next_batch;
        (left, Some(left))
    }
}

impl<T: Numeric> ExactSizeIterator for BatchIterator<T> {}
