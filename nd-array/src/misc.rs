use super::*;
use std::fmt;

/// Exact comparison of shape and elements; arrays that fail to evaluate are never equal.
impl<T: Numeric> PartialEq for NdArray<T> {
    fn eq(&self, other: &Self) -> bool {
        self.shape == other.shape
            && matches!((self.to_vec(), other.to_vec()), (Ok(a), Ok(b)) if a == b)
    }
}

impl<T: Numeric> fmt::Debug for NdArray<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NdArray")
            .field("shape", &self.shape)
            .field("strides", &self.strides)
            .field("owning", &self.is_owning())
            .field("dtype", &T::DTYPE)
            .field("elements", &self.to_vec())
            .finish()
    }
}

impl<T: Numeric> fmt::Debug for NdView<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("NdView").field(&self.evaluate()).finish()
    }
}

impl<T: Numeric> NdArray<T> {
    /// Compares shapes exactly and elements within the tolerance of `T`.
    pub fn approx_eq(&self, other: &NdArray<T>) -> Result<bool> {
        if self.shape != other.shape {
            return Ok(false);
        }

        for (a, b) in self.elements().zip(other.elements()) {
            if !a?.approx_eq(b?) {
                return Ok(false);
            }
        }

        Ok(true)
    }
}

impl<T: Numeric> NdView<T> {
    pub fn approx_eq(&self, other: &NdView<T>) -> Result<bool> {
        self.evaluate()?.approx_eq(&other.evaluate()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equality_ignores_storage_kind() -> Result<()> {
        let filled = NdArray::<i32>::scalar(4, &[2, 3]);
        let derived = NdArray::<i32>::ones(&[3, 2]).view().t().mul_scalar(4.0).evaluate()?;
        let owned = NdArray::new(vec![4; 6], &[2, 3])?;

        assert!(!derived.is_owning());
        assert_eq!(filled, derived);
        assert_eq!(derived, owned);
        assert_ne!(owned, NdArray::new(vec![4; 6], &[3, 2])?);
        Ok(())
    }

    #[test]
    fn failing_arrays_are_never_equal() -> Result<()> {
        let failing = NdArray::<i32>::ones(&[2]).view().div_scalar(0.0).evaluate()?;
        assert_ne!(failing, failing.clone());
        assert!(failing.approx_eq(&NdArray::ones(&[2])).is_err());
        Ok(())
    }

    #[test]
    fn approximate_comparison_uses_tolerance() -> Result<()> {
        let x = NdArray::new(vec![0.25, 1.0], &[2])?.view();

        assert!(x.approx_eq(&(&x + 1e-7))?);
        assert!(!x.approx_eq(&(&x + 1e-3))?);
        assert!(!x.approx_eq(&x.reshape(&[1, 2]))?);
        assert_ne!(x.evaluate()?, (&x + 1e-7).evaluate()?);
        Ok(())
    }

    #[test]
    fn debug_shows_layout() -> Result<()> {
        let array = NdArray::<f32>::ones(&[2, 1]).view().t().evaluate()?;
        let debug = format!("{array:?}");
        assert!(debug.contains("shape: [1, 2]"));
        assert!(debug.contains("owning: false"));
        assert!(debug.contains("dtype: Float32"));
        Ok(())
    }
}
