use super::*;
use log::trace;

impl<T: Numeric> NdView<T> {
    /// Joins two views along `axis`; all other axes must match.
    ///
    /// Both operands are materialized and the result owns its data.
    pub fn concat(&self, other: &NdView<T>, axis: usize) -> NdView<T> {
        let (left, right) = (self.clone(), other.clone());

        NdView::new(move || {
            let (a, b) = (left.materialize()?, right.materialize()?);
            let shape = shape::prepare_concatenation(&a.shape, &b.shape, axis)?;
            trace!("concat {:?} and {:?} along {axis} -> {:?}", a.shape, b.shape, shape);

            let outer = shape::count_of(&shape[..axis]);
            let inner = shape::count_of(&shape[axis + 1..]);
            let (a_block, b_block) = (a.shape[axis] * inner, b.shape[axis] * inner);
            let (a_data, b_data) = (a.to_vec()?, b.to_vec()?);

            let mut data = Vec::with_capacity(shape::count_of(&shape));
            for o in 0..outer {
                data.extend_from_slice(&a_data[o * a_block..(o + 1) * a_block]);
                data.extend_from_slice(&b_data[o * b_block..(o + 1) * b_block]);
            }

            Ok(NdArray::owned(shape, data))
        })
    }

    /// Splits the view along `axis` before `index` into two read-through views.
    pub fn split(&self, axis: usize, index: usize) -> (NdView<T>, NdView<T>) {
        let head = self.narrow(axis, 0, Some(index));
        let tail = self.narrow(axis, index, None);
        (head, tail)
    }

    /// Keeps `len` entries of `axis` starting at `start`, or everything after `start` for
    /// `None`.
    pub fn narrow(&self, axis: usize, start: usize, len: Option<usize>) -> NdView<T> {
        let parent = self.clone();

        NdView::new(move || {
            let src = parent.evaluate()?;
            shape::check_axis(axis, src.rank())?;

            let dim = src.shape[axis];
            let len = len.unwrap_or(dim.saturating_sub(start));
            if start.checked_add(len).is_none_or(|end| end > dim) {
                return Err(ArrayError::IndexOutOfBounds(format!(
                    "Range of {len} from {start} out of bounds for dimension {axis} with size {dim}"
                )));
            }

            let mut shape = src.shape.clone();
            shape[axis] = len;
            trace!("narrow {:?} along {axis} -> {:?}", src.shape, shape);

            let inner = shape::count_of(&src.shape[axis + 1..]);
            let (block, parent_block) = (len * inner, dim * inner);

            Ok(NdArray::derived(shape, move |i| {
                let (o, rem) = (i / block, i % block);
                src.get_at(o * parent_block + start * inner + rem)
            }))
        })
    }
}
