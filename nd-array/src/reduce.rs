use super::*;
use log::trace;

impl<T: Numeric> NdView<T> {
    /// Folds elements along `axis`, or all of them for `None`, starting from `identity`.
    ///
    /// The result is materialized into owning storage. A zero-length axis yields `identity`;
    /// `is_mean` divides every folded value by the axis length.
    pub fn reduce(
        &self,
        axis: Option<usize>,
        identity: T,
        combine: impl Fn(T, T) -> T + 'static,
        keep_dims: bool,
        is_mean: bool,
    ) -> NdView<T> {
        let parent = self.clone();

        NdView::new(move || {
            let src = parent.evaluate()?;
            let shape = shape::prepare_axis_reduction(&src.shape, axis, keep_dims)?;
            trace!("reduce {:?} along {:?} -> {:?}", src.shape, axis, shape);

            let (outer, len, inner) = split_at_axis(&src.shape, axis);
            let divisor = T::from_f64(len as f64);
            let mut data = Vec::with_capacity(outer * inner);

            for o in 0..outer {
                for i in 0..inner {
                    let mut acc = identity;
                    for j in 0..len {
                        acc = combine(acc, src.get_at((o * len + j) * inner + i)?);
                    }
                    if is_mean && len > 0 {
                        acc = acc.div(divisor)?;
                    }
                    data.push(acc);
                }
            }

            Ok(NdArray::owned(shape, data))
        })
    }

    /// Position of the largest element along `axis`; the axis is removed and ties keep the
    /// first occurrence. An empty axis has no position and fails with
    /// [`ArrayError::ShapeMismatch`].
    pub fn argmax(&self, axis: usize) -> NdView<i32> {
        self.arg_select(axis, |candidate, best| candidate > best)
    }

    /// Position of the smallest element along `axis`; the axis is removed and ties keep the
    /// first occurrence.
    pub fn argmin(&self, axis: usize) -> NdView<i32> {
        self.arg_select(axis, |candidate, best| candidate < best)
    }

    fn arg_select(&self, axis: usize, is_better: fn(T, T) -> bool) -> NdView<i32> {
        let parent = self.clone();

        NdView::new(move || {
            let src = parent.evaluate()?;
            let shape = shape::prepare_axis_reduction(&src.shape, Some(axis), false)?;
            trace!("arg select {:?} along {axis} -> {:?}", src.shape, shape);

            let (outer, len, inner) = split_at_axis(&src.shape, Some(axis));
            if len == 0 {
                return Err(ArrayError::ShapeMismatch(format!(
                    "Cannot select an index along empty axis {axis} of {:?}",
                    src.shape
                )));
            }
            let mut data = Vec::with_capacity(outer * inner);

            for o in 0..outer {
                for i in 0..inner {
                    let mut best = (0, None);
                    for j in 0..len {
                        let value = src.get_at((o * len + j) * inner + i)?;
                        if best.1.is_none_or(|current| is_better(value, current)) {
                            best = (j, Some(value));
                        }
                    }
                    data.push(best.0 as i32);
                }
            }

            Ok(NdArray::owned(shape, data))
        })
    }
}

/// Named reductions.
impl<T: Numeric> NdView<T> {
    pub fn sum(&self, axis: Option<usize>, keep_dims: bool) -> NdView<T> {
        self.reduce(axis, T::ZERO, T::add, keep_dims, false)
    }

    pub fn prod(&self, axis: Option<usize>, keep_dims: bool) -> NdView<T> {
        self.reduce(axis, T::ONE, T::mul, keep_dims, false)
    }

    pub fn mean(&self, axis: Option<usize>, keep_dims: bool) -> NdView<T> {
        self.reduce(axis, T::ZERO, T::add, keep_dims, true)
    }

    pub fn max(&self, axis: Option<usize>, keep_dims: bool) -> NdView<T> {
        self.reduce(axis, T::MIN_VALUE, T::max, keep_dims, false)
    }

    pub fn min(&self, axis: Option<usize>, keep_dims: bool) -> NdView<T> {
        self.reduce(axis, T::MAX_VALUE, T::min, keep_dims, false)
    }

    /// Sum of all elements as `f64`.
    pub fn sum_all(&self) -> Result<f64> {
        Ok(self.to_vec()?.into_iter().map(T::to_f64).sum())
    }

    /// Product of all elements as `f64`.
    pub fn prod_all(&self) -> Result<f64> {
        Ok(self.to_vec()?.into_iter().map(T::to_f64).product())
    }

    /// Mean of all elements as `f64`; zero for an empty array.
    pub fn mean_all(&self) -> Result<f64> {
        let values = self.to_vec()?;
        if values.is_empty() {
            return Ok(0.0);
        }
        Ok(values.iter().map(|&v| v.to_f64()).sum::<f64>() / values.len() as f64)
    }
}

/// Splits a shape into the element counts before, along and after the reduced axis.
fn split_at_axis(shape: &[usize], axis: Option<usize>) -> (usize, usize, usize) {
    match axis {
        Some(axis) => (
            shape::count_of(&shape[..axis]),
            shape[axis],
            shape::count_of(&shape[axis + 1..]),
        ),
        None => (1, shape::count_of(shape), 1),
    }
}
