use super::*;
use std::ops::{Add, Div, Mul, Neg, Sub};

/// Elementwise unary operations.
impl<T: Numeric> NdView<T> {
    pub fn neg(&self) -> NdView<T> {
        self.map(T::neg)
    }

    pub fn abs(&self) -> NdView<T> {
        self.map(T::abs)
    }

    /// Natural exponent; fails on evaluation for integers.
    pub fn exp(&self) -> NdView<T> {
        self.try_map(T::exp)
    }

    /// Natural logarithm; fails on evaluation for integers.
    pub fn log(&self) -> NdView<T> {
        self.try_map(T::log)
    }

    pub fn sq(&self) -> NdView<T> {
        self.map(T::sq)
    }

    pub fn sqrt(&self) -> NdView<T> {
        self.map(T::sqrt)
    }

    pub fn tanh(&self) -> NdView<T> {
        self.try_map(T::tanh)
    }

    /// Derivative of tanh.
    pub fn dtanh(&self) -> NdView<T> {
        self.try_map(T::dtanh)
    }

    pub fn sigmoid(&self) -> NdView<T> {
        self.try_map(T::sigmoid)
    }

    /// Derivative of sigmoid.
    pub fn dsigmoid(&self) -> NdView<T> {
        self.try_map(T::dsigmoid)
    }

    /// Rounds half to even at `digits` decimals; integers are unchanged.
    pub fn round(&self, digits: u32) -> NdView<T> {
        self.map(move |x| x.round(digits))
    }

    pub fn clamp(&self, min: f64, max: f64) -> NdView<T> {
        self.map(move |x| x.clamp_to(min, max))
    }

    /// Converts every element to another scalar type.
    pub fn cast<U: Numeric>(&self) -> NdView<U> {
        self.map(T::cast::<U>)
    }
}

/// Arithmetic with a scalar operand, converted to `T` first.
impl<T: Numeric> NdView<T> {
    pub fn add_scalar(&self, value: f64) -> NdView<T> {
        let value = T::from_f64(value);
        self.map(move |x| x.add(value))
    }

    pub fn sub_scalar(&self, value: f64) -> NdView<T> {
        let value = T::from_f64(value);
        self.map(move |x| x.sub(value))
    }

    /// Computes `value - x`.
    pub fn rsub_scalar(&self, value: f64) -> NdView<T> {
        let value = T::from_f64(value);
        self.map(move |x| value.sub(x))
    }

    pub fn mul_scalar(&self, value: f64) -> NdView<T> {
        let value = T::from_f64(value);
        self.map(move |x| x.mul(value))
    }

    pub fn div_scalar(&self, value: f64) -> NdView<T> {
        let value = T::from_f64(value);
        self.try_map(move |x| x.div(value))
    }

    /// Computes `value / x`.
    pub fn rdiv_scalar(&self, value: f64) -> NdView<T> {
        let value = T::from_f64(value);
        self.try_map(move |x| value.div(x))
    }
}

/// Broadcasting binary operations.
impl<T: Numeric> NdView<T> {
    pub fn add(&self, other: &NdView<T>) -> NdView<T> {
        self.zip(other, T::add)
    }

    pub fn sub(&self, other: &NdView<T>) -> NdView<T> {
        self.zip(other, T::sub)
    }

    pub fn mul(&self, other: &NdView<T>) -> NdView<T> {
        self.zip(other, T::mul)
    }

    /// Elementwise division; integer division by zero fails on evaluation.
    pub fn div(&self, other: &NdView<T>) -> NdView<T> {
        self.try_zip(other, T::div)
    }

    pub fn minimum(&self, other: &NdView<T>) -> NdView<T> {
        self.zip(other, T::min)
    }

    pub fn maximum(&self, other: &NdView<T>) -> NdView<T> {
        self.zip(other, T::max)
    }
}

/// Comparisons, producing 1 where the relation holds and 0 elsewhere.
///
/// Equality uses the tolerance of the element type, ordering is exact.
impl<T: Numeric> NdView<T> {
    pub fn equal(&self, other: &NdView<T>) -> NdView<T> {
        self.zip(other, |a, b| T::from_bool(a.approx_eq(b)))
    }

    pub fn not_equal(&self, other: &NdView<T>) -> NdView<T> {
        self.zip(other, |a, b| T::from_bool(!a.approx_eq(b)))
    }

    pub fn less(&self, other: &NdView<T>) -> NdView<T> {
        self.zip(other, |a, b| T::from_bool(a < b))
    }

    pub fn less_equal(&self, other: &NdView<T>) -> NdView<T> {
        self.zip(other, |a, b| T::from_bool(a <= b))
    }

    pub fn greater(&self, other: &NdView<T>) -> NdView<T> {
        self.zip(other, |a, b| T::from_bool(a > b))
    }

    pub fn greater_equal(&self, other: &NdView<T>) -> NdView<T> {
        self.zip(other, |a, b| T::from_bool(a >= b))
    }
}

macro_rules! impl_binary_op {
    ($trait:ident, $method:ident, $scalar:ident, $rscalar:ident) => {
        impl<T: Numeric> $trait<&NdView<T>> for &NdView<T> {
            type Output = NdView<T>;

            fn $method(self, rhs: &NdView<T>) -> NdView<T> {
                NdView::$method(self, rhs)
            }
        }

        impl<T: Numeric> $trait<NdView<T>> for NdView<T> {
            type Output = NdView<T>;

            fn $method(self, rhs: NdView<T>) -> NdView<T> {
                NdView::$method(&self, &rhs)
            }
        }

        impl<T: Numeric> $trait<&NdView<T>> for NdView<T> {
            type Output = NdView<T>;

            fn $method(self, rhs: &NdView<T>) -> NdView<T> {
                NdView::$method(&self, rhs)
            }
        }

        impl<T: Numeric> $trait<f64> for NdView<T> {
            type Output = NdView<T>;

            fn $method(self, rhs: f64) -> NdView<T> {
                self.$scalar(rhs)
            }
        }

        impl<T: Numeric> $trait<f64> for &NdView<T> {
            type Output = NdView<T>;

            fn $method(self, rhs: f64) -> NdView<T> {
                self.$scalar(rhs)
            }
        }

        impl<T: Numeric> $trait<NdView<T>> for f64 {
            type Output = NdView<T>;

            fn $method(self, rhs: NdView<T>) -> NdView<T> {
                rhs.$rscalar(self)
            }
        }

        impl<T: Numeric> $trait<&NdView<T>> for f64 {
            type Output = NdView<T>;

            fn $method(self, rhs: &NdView<T>) -> NdView<T> {
                rhs.$rscalar(self)
            }
        }
    };
}

impl_binary_op!(Add, add, add_scalar, add_scalar);
impl_binary_op!(Sub, sub, sub_scalar, rsub_scalar);
impl_binary_op!(Mul, mul, mul_scalar, mul_scalar);
impl_binary_op!(Div, div, div_scalar, rdiv_scalar);

impl<T: Numeric> Neg for NdView<T> {
    type Output = NdView<T>;

    fn neg(self) -> NdView<T> {
        NdView::neg(&self)
    }
}

impl<T: Numeric> Neg for &NdView<T> {
    type Output = NdView<T>;

    fn neg(self) -> NdView<T> {
        NdView::neg(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn floats(data: Vec<f64>) -> NdView<f64> {
        NdArray::from(data).view()
    }

    #[test]
    fn test_operators() -> Result<()> {
        let a = NdArray::new(vec![1, 2, 3, 4], &[2, 2])?.view();
        let b = NdArray::from(vec![10, 20]).view();

        assert_eq!((&a + &b).to_vec()?, vec![11, 22, 13, 24]);
        assert_eq!((&a - &b).to_vec()?, vec![-9, -18, -7, -16]);
        assert_eq!((&a * &b).to_vec()?, vec![10, 40, 30, 80]);
        assert_eq!((&b / &a).to_vec()?, vec![10, 10, 3, 5]);
        assert_eq!((-&a).to_vec()?, vec![-1, -2, -3, -4]);
        Ok(())
    }

    #[test]
    fn scalars_work_on_either_side() -> Result<()> {
        let x = floats(vec![1.0, 2.0, 4.0]);

        assert_eq!((&x + 1.0).to_vec()?, vec![2.0, 3.0, 5.0]);
        assert_eq!((1.0 - &x).to_vec()?, vec![0.0, -1.0, -3.0]);
        assert_eq!((2.0 * &x).to_vec()?, vec![2.0, 4.0, 8.0]);
        assert_eq!((&x / 2.0).to_vec()?, vec![0.5, 1.0, 2.0]);
        assert_eq!((4.0 / x).to_vec()?, vec![4.0, 2.0, 1.0]);
        Ok(())
    }

    #[test]
    fn integer_division_by_zero_fails() {
        let a = NdArray::from(vec![1, 2]).view();
        let zero = NdArray::<i32>::zeros(&[1]).view();
        assert!(matches!(
            (&a / &zero).to_vec(),
            Err(ArrayError::UnsupportedOperation(_))
        ));
    }

    #[test]
    fn transcendental_functions_fail_for_integers() {
        let a = NdArray::<i32>::ones(&[2]).view();
        assert!(matches!(a.exp().to_vec(), Err(ArrayError::UnsupportedOperation(_))));
        assert!(matches!(a.sigmoid().to_vec(), Err(ArrayError::UnsupportedOperation(_))));
    }

    #[test]
    fn unary_operations() -> Result<()> {
        let x = floats(vec![-1.5, 0.0, 2.25]);

        assert_eq!(x.abs().to_vec()?, vec![1.5, 0.0, 2.25]);
        assert_eq!(x.sq().to_vec()?, vec![2.25, 0.0, 5.0625]);
        assert_eq!(x.abs().sqrt().to_vec()?, vec![1.5f64.sqrt(), 0.0, 1.5]);
        assert_eq!(x.clamp(-1.0, 1.0).to_vec()?, vec![-1.0, 0.0, 1.0]);
        assert_eq!(x.round(0).to_vec()?, vec![-2.0, 0.0, 2.0]);
        assert_eq!(x.cast::<i32>().to_vec()?, vec![-2, 0, 2]);

        let ones = x.exp().log().sub(&x).abs().less_equal(&floats(vec![1e-9]));
        assert_eq!(ones.to_vec()?, vec![1.0; 3]);
        Ok(())
    }

    #[test]
    fn activation_derivatives() -> Result<()> {
        let zero = NdArray::<f64>::zeros(&[2]).view();
        assert_eq!(zero.sigmoid().to_vec()?, vec![0.5; 2]);
        assert_eq!(zero.dsigmoid().to_vec()?, vec![0.25; 2]);
        assert_eq!(zero.tanh().to_vec()?, vec![0.0; 2]);
        assert_eq!(zero.dtanh().to_vec()?, vec![1.0; 2]);
        Ok(())
    }

    #[test]
    fn equality_uses_epsilon() -> Result<()> {
        let x = floats(vec![0.1, 1.0, 100.0]);

        let within = &x + 5e-7;
        assert_eq!(x.equal(&within).to_vec()?, vec![1.0; 3]);
        assert_eq!(x.not_equal(&within).to_vec()?, vec![0.0; 3]);

        let beyond = &x + 1e-5;
        assert_eq!(x.equal(&beyond).to_vec()?, vec![0.0; 3]);
        assert_eq!(x.less(&beyond).to_vec()?, vec![1.0; 3]);

        let ints = NdArray::from(vec![1, 2, 3]).view();
        let shifted = NdArray::from(vec![1, 3, 2]).view();
        assert_eq!(ints.equal(&shifted).to_vec()?, vec![1, 0, 0]);
        Ok(())
    }

    #[test]
    fn ordering_comparisons_broadcast() -> Result<()> {
        let x = NdArray::new(vec![1, 5, 3, 3], &[2, 2])?.view();
        let limit = NdArray::scalar(3, &[1]).view();

        assert_eq!(x.greater(&limit).to_vec()?, vec![0, 1, 0, 0]);
        assert_eq!(x.greater_equal(&limit).to_vec()?, vec![0, 1, 1, 1]);
        assert_eq!(x.less(&limit).to_vec()?, vec![1, 0, 0, 0]);
        assert_eq!(x.minimum(&limit).to_vec()?, vec![1, 3, 3, 3]);
        assert_eq!(x.maximum(&limit).to_vec()?, vec![3, 5, 3, 3]);
        Ok(())
    }
}
