//! Pure shape algebra: strides, index conversions, broadcasting and the shapes produced by
//! reshape, transpose, reduction, contraction and concatenation.

use super::*;

/// Number of elements described by a shape.
pub fn count_of(shape: &[usize]) -> usize {
    shape.iter().product()
}

/// Returns the shape unchanged, or `[1]` for an empty one.
pub fn normalize(shape: &[usize]) -> Shape {
    if shape.is_empty() { small_vec![1] } else { Shape::from(shape) }
}

/// Row-major strides: `strides[k]` is the product of `shape[k + 1..]`.
pub fn strides_of(shape: &[usize]) -> Shape {
    let mut strides: Shape = small_vec![0; shape.len()];
    let mut acc = 1;
    for k in (0..shape.len()).rev() {
        strides[k] = acc;
        acc *= shape[k];
    }
    strides
}

/// Writes the multi-index of a row-major `offset` into `out`.
pub fn multi_index_of(offset: usize, shape: &[usize], out: &mut [usize]) {
    let mut rem = offset;
    for k in (0..shape.len()).rev() {
        if shape[k] == 0 {
            out[k] = 0;
        } else {
            out[k] = rem % shape[k];
            rem /= shape[k];
        }
    }
}

/// Converts a multi-index into a flat offset using the given strides.
pub fn flat_offset_of(indices: &[usize], shape: &[usize], strides: &[usize]) -> Result<usize> {
    if indices.len() != shape.len() {
        return Err(ArrayError::ShapeMismatch(format!(
            "Index dimension mismatch: {} != {}",
            indices.len(),
            shape.len()
        )));
    }

    let mut offset = 0;
    for (k, &idx) in indices.iter().enumerate() {
        if idx >= shape[k] {
            return Err(ArrayError::IndexOutOfBounds(format!(
                "Index {idx} out of bounds for dimension {k} with size {}",
                shape[k]
            )));
        }
        offset += idx * strides[k];
    }

    Ok(offset)
}

/// Maps a row-major offset of `shape` through arbitrary `strides`.
pub fn remap_offset(offset: usize, shape: &[usize], strides: &[usize]) -> usize {
    let mut rem = offset;
    let mut mapped = 0;
    for k in (0..shape.len()).rev() {
        if shape[k] == 0 {
            continue;
        }
        mapped += (rem % shape[k]) * strides[k];
        rem /= shape[k];
    }
    mapped
}

/// Maps a row-major offset of the broadcast shape `target` to the offset of an operand with
/// `shape` and row-major `strides`, right-aligned and repeating its unit axes.
pub fn broadcast_offset(
    offset: usize,
    target: &[usize],
    shape: &[usize],
    strides: &[usize],
) -> usize {
    let pad = target.len() - shape.len();
    let mut rem = offset;
    let mut mapped = 0;
    for j in (0..target.len()).rev() {
        if target[j] == 0 {
            continue;
        }
        let idx = rem % target[j];
        rem /= target[j];
        if j >= pad {
            let k = j - pad;
            mapped += (idx % shape[k]) * strides[k];
        }
    }
    mapped
}

/// Resolves the shape of an elementwise operation between two shapes.
///
/// Shapes are right-aligned and padded with ones; every pair of sizes must be equal or one of
/// them must be 1, the result takes the larger one.
pub fn broadcast_shapes(a: &[usize], b: &[usize]) -> Result<Shape> {
    let rank = a.len().max(b.len());
    let mut shape: Shape = small_vec![0; rank];

    for k in 0..rank {
        let da = if k + a.len() < rank { 1 } else { a[k + a.len() - rank] };
        let db = if k + b.len() < rank { 1 } else { b[k + b.len() - rank] };
        if da != db && da != 1 && db != 1 {
            return Err(ArrayError::ShapeMismatch(format!(
                "Cannot broadcast {a:?} with {b:?}"
            )));
        }
        shape[k] = if da == 1 { db } else { da };
    }

    Ok(shape)
}

/// Resolves a reshape target with at most one `-1` wildcard.
pub fn prepare_reshape(shape: &[usize], target: &[isize]) -> Result<Shape> {
    let count = count_of(shape);
    let wildcards = target.iter().filter(|&&d| d == -1).count();
    if wildcards > 1 {
        return Err(ArrayError::ShapeMismatch(format!(
            "Can only specify one unknown dimension in {target:?}"
        )));
    }
    if let Some(d) = target.iter().find(|&&d| d < -1) {
        return Err(ArrayError::ShapeMismatch(format!(
            "Negative dimension {d} in reshape target {target:?}"
        )));
    }

    let known: usize = target.iter().filter(|&&d| d >= 0).map(|&d| d as usize).product();
    let inferred = if wildcards == 1 {
        if known == 0 || count % known != 0 {
            return Err(ArrayError::ShapeMismatch(format!(
                "Cannot reshape array of size {count} into {target:?}"
            )));
        }
        count / known
    } else {
        0
    };

    let new_shape = normalize(
        &target
            .iter()
            .map(|&d| if d == -1 { inferred } else { d as usize })
            .collect::<Shape>(),
    );

    if count_of(&new_shape) != count {
        return Err(ArrayError::ShapeMismatch(format!(
            "Cannot reshape array of size {count} to size {}",
            count_of(&new_shape)
        )));
    }

    Ok(new_shape)
}

/// Default permutation: all axes reversed.
pub fn prepare_transpose(rank: usize) -> Shape {
    (0..rank).rev().collect()
}

/// Checks that `perm` is a permutation of `0..rank`.
pub fn validate_permutation(perm: &[usize], rank: usize) -> Result<()> {
    let mut seen: SmallVec<bool, INLINE_RANK> = small_vec![false; rank];
    if perm.len() != rank {
        return Err(ArrayError::ShapeMismatch(format!(
            "Permutation {perm:?} does not match rank {rank}"
        )));
    }
    for &axis in perm {
        if axis >= rank || seen[axis] {
            return Err(ArrayError::ShapeMismatch(format!(
                "Invalid permutation {perm:?} for rank {rank}"
            )));
        }
        seen[axis] = true;
    }
    Ok(())
}

/// Reorders `values` so that entry `k` of the result is `values[perm[k]]`.
pub fn permute(values: &[usize], perm: &[usize]) -> Shape {
    perm.iter().map(|&axis| values[axis]).collect()
}

/// Shape left after reducing `axis` (or every axis for `None`).
pub fn prepare_axis_reduction(
    shape: &[usize],
    axis: Option<usize>,
    keep_dims: bool,
) -> Result<Shape> {
    let Some(axis) = axis else {
        return Ok(small_vec![1]);
    };
    check_axis(axis, shape.len())?;

    let mut reduced = Shape::from(shape);
    if keep_dims {
        reduced[axis] = 1;
    } else {
        reduced.remove(axis);
    }

    Ok(normalize(&reduced))
}

/// Operand and output shapes of a tensor contraction.
#[derive(Clone, Debug, PartialEq)]
pub struct Contraction {
    /// Left operand shape, rank-1 promoted to `[1, n]`.
    pub left: Shape,
    /// Right operand shape, rank-1 promoted to `[n, 1]`.
    pub right: Shape,
    /// Shape iterated by the contraction: left leading axes, right leading axes, right last axis.
    pub full: Shape,
    /// Result shape with the promoted unit axes removed again.
    pub output: Shape,
}

impl Contraction {
    /// Length of the summed axis.
    pub fn depth(&self) -> usize {
        self.left[self.left.len() - 1]
    }
}

/// Resolves the shapes of a generalized dot product of `a` and `b`.
pub fn prepare_contraction(a: &[usize], b: &[usize]) -> Result<Contraction> {
    let (a, b) = (normalize(a), normalize(b));
    let left: Shape = if a.len() == 1 { small_vec![1, a[0]] } else { a.clone() };
    let right: Shape = if b.len() == 1 { small_vec![b[0], 1] } else { b.clone() };

    let (l, r) = (left.len(), right.len());
    if left[l - 1] != right[r - 2] {
        return Err(ArrayError::ShapeMismatch(format!(
            "Cannot contract {a:?} with {b:?}: {} != {}",
            left[l - 1],
            right[r - 2]
        )));
    }

    let mut full: Shape = left[..l - 1].iter().copied().collect();
    full.extend(right[..r - 2].iter().copied());
    full.push(right[r - 1]);

    let mut output = full.clone();
    if b.len() == 1 {
        output.pop();
    }
    if a.len() == 1 {
        output.remove(0);
    }

    Ok(Contraction {
        left,
        right,
        full,
        output: normalize(&output),
    })
}

/// Shape of `a` and `b` joined along `axis`.
pub fn prepare_concatenation(a: &[usize], b: &[usize], axis: usize) -> Result<Shape> {
    let (a, b) = (normalize(a), normalize(b));
    if a.len() != b.len() {
        return Err(ArrayError::ShapeMismatch(format!(
            "Cannot concat rank {} with rank {}",
            a.len(),
            b.len()
        )));
    }
    check_axis(axis, a.len())?;

    if (0..a.len()).any(|k| k != axis && a[k] != b[k]) {
        return Err(ArrayError::ShapeMismatch(format!(
            "Cannot concat {a:?} and {b:?} along axis {axis}"
        )));
    }

    let mut shape = a;
    shape[axis] += b[axis];
    Ok(shape)
}

pub(crate) fn check_axis(axis: usize, rank: usize) -> Result<()> {
    if axis >= rank {
        return Err(ArrayError::ShapeMismatch(format!(
            "Axis {axis} is out of range for rank {rank}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn strides_are_row_major() {
        assert_eq!(&strides_of(&[2, 3, 4])[..], &[12, 4, 1]);
        assert_eq!(&strides_of(&[5])[..], &[1]);
        assert_eq!(&strides_of(&[2, 0, 3])[..], &[0, 3, 1]);
    }

    #[rstest]
    #[case(&[3, 4])]
    #[case(&[2, 3, 4])]
    #[case(&[1, 5, 1, 2, 3])]
    fn multi_index_round_trips_every_offset(#[case] shape: &[usize]) -> Result<()> {
        let strides = strides_of(shape);
        let mut index: Shape = small_vec![0; shape.len()];
        for offset in 0..count_of(shape) {
            multi_index_of(offset, shape, &mut index);
            assert_eq!(flat_offset_of(&index, shape, &strides)?, offset);
        }
        Ok(())
    }

    #[test]
    fn flat_offset_rejects_out_of_bounds_index() {
        let shape = [2, 3];
        let strides = strides_of(&shape);
        assert!(matches!(
            flat_offset_of(&[1, 3], &shape, &strides),
            Err(ArrayError::IndexOutOfBounds(_))
        ));
        assert!(matches!(
            flat_offset_of(&[1], &shape, &strides),
            Err(ArrayError::ShapeMismatch(_))
        ));
    }

    #[rstest]
    #[case(&[3, 1], &[1, 4], &[3, 4])]
    #[case(&[2, 3, 4], &[4], &[2, 3, 4])]
    #[case(&[5, 1, 3], &[2, 1], &[5, 2, 3])]
    #[case(&[1], &[7], &[7])]
    #[case(&[0, 3], &[1, 3], &[0, 3])]
    fn broadcast_is_commutative(
        #[case] a: &[usize],
        #[case] b: &[usize],
        #[case] expected: &[usize],
    ) -> Result<()> {
        assert_eq!(&broadcast_shapes(a, b)?[..], expected);
        assert_eq!(&broadcast_shapes(b, a)?[..], expected);
        Ok(())
    }

    #[test]
    fn broadcast_rejects_incompatible_sizes() {
        assert!(matches!(
            broadcast_shapes(&[2, 3], &[3, 2]),
            Err(ArrayError::ShapeMismatch(_))
        ));
    }

    #[test]
    fn broadcast_offset_repeats_unit_axes() {
        let shape = [3, 1];
        let strides = strides_of(&shape);
        let mapped: Vec<_> = (0..12)
            .map(|i| broadcast_offset(i, &[3, 4], &shape, &strides))
            .collect();
        assert_eq!(mapped, vec![0, 0, 0, 0, 1, 1, 1, 1, 2, 2, 2, 2]);

        let row = [4];
        let mapped: Vec<_> = (0..8)
            .map(|i| broadcast_offset(i, &[2, 4], &row, &strides_of(&row)))
            .collect();
        assert_eq!(mapped, vec![0, 1, 2, 3, 0, 1, 2, 3]);
    }

    #[test]
    fn reshape_infers_wildcard() -> Result<()> {
        assert_eq!(&prepare_reshape(&[2, 6], &[3, -1])?[..], &[3, 4]);
        assert_eq!(&prepare_reshape(&[2, 6], &[-1])?[..], &[12]);
        assert_eq!(&prepare_reshape(&[1], &[])?[..], &[1]);
        Ok(())
    }

    #[rstest]
    #[case(&[2, 6], &[5, -1])]
    #[case(&[2, 6], &[-1, -1])]
    #[case(&[2, 6], &[4, 4])]
    #[case(&[2, 6], &[-2, 6])]
    fn reshape_rejects_bad_targets(#[case] shape: &[usize], #[case] target: &[isize]) {
        assert!(matches!(
            prepare_reshape(shape, target),
            Err(ArrayError::ShapeMismatch(_))
        ));
    }

    #[test]
    fn transpose_reverses_by_default() -> Result<()> {
        assert_eq!(&prepare_transpose(3)[..], &[2, 1, 0]);
        assert_eq!(&permute(&[2, 3, 4], &[1, 2, 0])[..], &[3, 4, 2]);
        validate_permutation(&[1, 2, 0], 3)?;
        assert!(validate_permutation(&[0, 0, 1], 3).is_err());
        assert!(validate_permutation(&[0, 3, 1], 3).is_err());
        assert!(validate_permutation(&[0, 1], 3).is_err());
        Ok(())
    }

    #[rstest]
    #[case(&[2, 3, 4], Some(1), false, &[2, 4])]
    #[case(&[2, 3, 4], Some(1), true, &[2, 1, 4])]
    #[case(&[2, 3, 4], None, false, &[1])]
    #[case(&[5], Some(0), false, &[1])]
    fn axis_reduction_shapes(
        #[case] shape: &[usize],
        #[case] axis: Option<usize>,
        #[case] keep: bool,
        #[case] expected: &[usize],
    ) -> Result<()> {
        assert_eq!(&prepare_axis_reduction(shape, axis, keep)?[..], expected);
        Ok(())
    }

    #[test]
    fn axis_reduction_rejects_bad_axis() {
        assert!(matches!(
            prepare_axis_reduction(&[2, 3], Some(2), false),
            Err(ArrayError::ShapeMismatch(_))
        ));
    }

    #[rstest]
    #[case(&[2, 3], &[3, 4], &[2, 4])]
    #[case(&[3], &[3, 4], &[4])]
    #[case(&[2, 3], &[3], &[2])]
    #[case(&[3], &[3], &[1])]
    #[case(&[5, 2, 3], &[3, 4], &[5, 2, 4])]
    #[case(&[2, 3], &[6, 3, 4], &[2, 6, 4])]
    #[case(&[], &[1, 4], &[4])]
    #[case(&[3, 1], &[], &[3])]
    fn contraction_shapes(
        #[case] a: &[usize],
        #[case] b: &[usize],
        #[case] expected: &[usize],
    ) -> Result<()> {
        let contraction = prepare_contraction(a, b)?;
        assert_eq!(&contraction.output[..], expected);
        assert_eq!(count_of(&contraction.full), count_of(&contraction.output));
        Ok(())
    }

    #[test]
    fn contraction_rejects_mismatched_axes() {
        assert!(matches!(
            prepare_contraction(&[2, 3], &[4, 2]),
            Err(ArrayError::ShapeMismatch(_))
        ));
    }

    #[test]
    fn concatenation_extends_axis() -> Result<()> {
        assert_eq!(&prepare_concatenation(&[2, 3], &[2, 3], 0)?[..], &[4, 3]);
        assert_eq!(&prepare_concatenation(&[2, 3], &[2, 5], 1)?[..], &[2, 8]);
        assert!(prepare_concatenation(&[2, 3], &[3, 3], 1).is_err());
        assert!(prepare_concatenation(&[2, 3], &[2, 3], 2).is_err());
        assert!(prepare_concatenation(&[2, 3], &[6], 0).is_err());
        assert_eq!(&prepare_concatenation(&[], &[], 0)?[..], &[2]);
        assert_eq!(&prepare_concatenation(&[], &[3], 0)?[..], &[4]);
        Ok(())
    }
}
