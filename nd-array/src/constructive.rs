use super::*;
use rand::Rng;

impl<T: Numeric> NdArray<T> {
    /// Creates an owning array from row-major `data`.
    /// An empty shape is treated as `[1]`.
    pub fn new(data: Vec<T>, shape: &[usize]) -> Result<Self> {
        let shape = shape::normalize(shape);
        let count = shape::count_of(&shape);
        if data.len() != count {
            return Err(ArrayError::ShapeMismatch(format!(
                "Cannot create array of shape {shape:?} from {} elements",
                data.len()
            )));
        }

        Ok(Self::owned(shape, data))
    }

    /// Creates an array holding `value` everywhere.
    pub fn scalar(value: T, shape: &[usize]) -> Self {
        let shape = shape::normalize(shape);
        Self {
            strides: shape::strides_of(&shape),
            count: shape::count_of(&shape),
            shape,
            source: Source::Filled(value),
        }
    }

    pub fn zeros(shape: &[usize]) -> Self {
        Self::scalar(T::ZERO, shape)
    }

    pub fn ones(shape: &[usize]) -> Self {
        Self::scalar(T::ONE, shape)
    }

    /// Creates an array sampled uniformly from `[min, max)`.
    pub fn uniform<R: Rng + ?Sized>(rng: &mut R, min: f64, max: f64, shape: &[usize]) -> Self {
        let shape = shape::normalize(shape);
        let (min, max) = (T::from_f64(min), T::from_f64(max));
        let data = (0..shape::count_of(&shape))
            .map(|_| T::sample(rng, min, max))
            .collect();
        Self::owned(shape, data)
    }

    /// Creates a 1D array `0, 1, .., len - 1`.
    pub fn arange(len: usize) -> Self {
        Self::arange_with(0.0, len, 1.0)
    }

    /// Creates a 1D array of `len` values starting at `start` and advancing by `step`.
    pub fn arange_with(start: f64, len: usize, step: f64) -> Self {
        let data = (0..len)
            .map(|i| T::from_f64(start + i as f64 * step))
            .collect();
        Self::owned(small_vec![len], data)
    }

    pub(crate) fn owned(shape: Shape, data: Vec<T>) -> Self {
        Self {
            strides: shape::strides_of(&shape),
            count: data.len(),
            shape,
            source: Source::Owned(Rc::new(data)),
        }
    }

    pub(crate) fn derived(shape: Shape, accessor: impl Fn(usize) -> Result<T> + 'static) -> Self {
        let strides = shape::strides_of(&shape);
        Self::derived_with_strides(shape, strides, accessor)
    }

    pub(crate) fn derived_with_strides(
        shape: Shape,
        strides: Shape,
        accessor: impl Fn(usize) -> Result<T> + 'static,
    ) -> Self {
        Self {
            count: shape::count_of(&shape),
            shape,
            strides,
            source: Source::Derived(Rc::new(accessor)),
        }
    }
}

impl<T: Numeric> From<Vec<T>> for NdArray<T> {
    fn from(data: Vec<T>) -> Self {
        Self::owned(small_vec![data.len()], data)
    }
}

impl<T: Numeric, const M: usize> From<Vec<[T; M]>> for NdArray<T> {
    fn from(rows: Vec<[T; M]>) -> Self {
        let shape = small_vec![rows.len(), M];
        Self::owned(shape, rows.into_iter().flatten().collect())
    }
}

impl<T: Numeric> TryFrom<Vec<Vec<T>>> for NdArray<T> {
    type Error = ArrayError;

    fn try_from(rows: Vec<Vec<T>>) -> Result<Self> {
        let cols = rows.first().map_or(0, Vec::len);
        if let Some(row) = rows.iter().find(|row| row.len() != cols) {
            return Err(ArrayError::ShapeMismatch(format!(
                "Ragged rows: expected {cols} columns, got {}",
                row.len()
            )));
        }

        let shape = small_vec![rows.len(), cols];
        Ok(Self::owned(shape, rows.into_iter().flatten().collect()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn can_create_from_data() -> Result<()> {
        let array = NdArray::new(vec![1, 2, 3, 4, 5, 6], &[2, 3])?;
        assert_eq!(array.shape(), &[2, 3]);
        assert_eq!(array.strides(), &[3, 1]);
        assert_eq!(array.get(&[1, 0])?, 4);
        assert!(array.is_owning());

        assert!(matches!(
            NdArray::new(vec![1, 2, 3], &[2, 2]),
            Err(ArrayError::ShapeMismatch(_))
        ));
        Ok(())
    }

    #[test]
    fn empty_shape_is_rank_one() -> Result<()> {
        let array = NdArray::new(vec![7.0f32], &[])?;
        assert_eq!(array.shape(), &[1]);
        assert_eq!(NdArray::<i32>::zeros(&[]).shape(), &[1]);
        Ok(())
    }

    #[test]
    fn filled_arrays_repeat_value() -> Result<()> {
        let ones = NdArray::<f64>::ones(&[2, 2]);
        assert_eq!(ones.to_vec()?, vec![1.0; 4]);
        assert_eq!(NdArray::scalar(3, &[3]).to_vec()?, vec![3, 3, 3]);
        assert_eq!(NdArray::<i32>::zeros(&[0, 4]).to_vec()?, Vec::<i32>::new());
        Ok(())
    }

    #[test]
    fn arange_steps_and_casts() -> Result<()> {
        assert_eq!(NdArray::<i32>::arange(4).to_vec()?, vec![0, 1, 2, 3]);
        assert_eq!(
            NdArray::<f64>::arange_with(1.0, 3, 0.5).to_vec()?,
            vec![1.0, 1.5, 2.0]
        );
        Ok(())
    }

    #[test]
    fn uniform_is_reproducible_and_bounded() -> Result<()> {
        let a = NdArray::<f64>::uniform(&mut StdRng::seed_from_u64(42), -1.0, 1.0, &[3, 4]);
        let b = NdArray::<f64>::uniform(&mut StdRng::seed_from_u64(42), -1.0, 1.0, &[3, 4]);
        assert_eq!(a, b);
        assert!(a.to_vec()?.iter().all(|v| (-1.0..1.0).contains(v)));
        Ok(())
    }

    #[test]
    fn can_create_from_rows() -> Result<()> {
        let fixed = NdArray::from(vec![[0, 0], [1, 0], [0, 1], [1, 1]]);
        assert_eq!(fixed.shape(), &[4, 2]);

        let nested = NdArray::try_from(vec![vec![0, 0], vec![1, 0], vec![0, 1], vec![1, 1]])?;
        assert_eq!(fixed, nested);

        assert!(matches!(
            NdArray::try_from(vec![vec![1.0, 2.0], vec![3.0]]),
            Err(ArrayError::ShapeMismatch(_))
        ));
        Ok(())
    }
}
