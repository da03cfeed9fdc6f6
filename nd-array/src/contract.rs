use super::*;
use crate::shape::Contraction;
use log::trace;

impl<T: Numeric> NdView<T> {
    /// Generalized dot product: sums over the last axis of `self` and the second-to-last axis of
    /// `other`.
    ///
    /// Both operands are materialized first. A rank-1 left operand acts as a single row and a
    /// rank-1 right operand as a single column; the unit axis introduced that way does not
    /// appear in the result, so a vector times a matrix is a vector.
    pub fn contract(&self, other: &NdView<T>) -> NdView<T> {
        let (left, right) = (self.clone(), other.clone());

        NdView::new(move || {
            let (a, b) = (left.materialize()?, right.materialize()?);
            let contraction = shape::prepare_contraction(&a.shape, &b.shape)?;
            trace!(
                "contract {:?} with {:?} -> {:?}",
                a.shape, b.shape, contraction.output
            );

            let data = contract_dense(&a.to_vec()?, &b.to_vec()?, &contraction);
            Ok(NdArray::owned(contraction.output, data))
        })
    }

    /// Alias of [`NdView::contract`].
    pub fn dot(&self, other: &NdView<T>) -> NdView<T> {
        self.contract(other)
    }
}

/// Computes a contraction of two row-major blocks laid out as `contraction.left` and
/// `contraction.right`.
fn contract_dense<T: Numeric>(left: &[T], right: &[T], contraction: &Contraction) -> Vec<T> {
    let Contraction {
        left: lshape,
        right: rshape,
        full,
        ..
    } = contraction;

    let (l, r) = (lshape.len(), rshape.len());
    let (lstrides, rstrides) = (shape::strides_of(lshape), shape::strides_of(rshape));
    let depth = contraction.depth();
    let (lstep, rstep) = (lstrides[l - 1], rstrides[r - 2]);

    let count = shape::count_of(full);
    let mut index: Shape = small_vec![0; full.len()];
    let mut data = Vec::with_capacity(count);

    for offset in 0..count {
        shape::multi_index_of(offset, full, &mut index);

        let lbase: usize = (0..l - 1).map(|k| index[k] * lstrides[k]).sum();
        let rbase: usize = (0..r - 2)
            .map(|k| index[l - 1 + k] * rstrides[k])
            .sum::<usize>()
            + index[full.len() - 1] * rstrides[r - 1];

        let mut sum = T::ZERO;
        for i in 0..depth {
            sum = sum.add(left[lbase + i * lstep].mul(right[rbase + i * rstep]));
        }
        data.push(sum);
    }

    data
}
