//! Scalar types supported by the arrays and the operations the algorithms need from them.

use super::*;
use rand::Rng;
use std::fmt;
use std::str::FromStr;

/// Runtime tag of a supported scalar type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DType {
    Int32,
    Float32,
    Float64,
}

impl DType {
    pub fn name(&self) -> &'static str {
        match self {
            DType::Int32 => "int32",
            DType::Float32 => "float32",
            DType::Float64 => "float64",
        }
    }

    pub fn is_float(&self) -> bool {
        !matches!(self, DType::Int32)
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DType {
    type Err = ArrayError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "int32" | "i32" => Ok(DType::Int32),
            "float32" | "f32" => Ok(DType::Float32),
            "float64" | "f64" => Ok(DType::Float64),
            other => Err(ArrayError::UnsupportedType(format!(
                "{other} is not supported, only int32, float32 or float64"
            ))),
        }
    }
}

/// Operations table of a scalar type.
///
/// Every algorithm of the crate is written against this trait, so the same shape, broadcast and
/// reduction code serves integers and floating point numbers alike. Integer arithmetic wraps on
/// overflow; transcendental functions are not defined for integers and fail with
/// [`ArrayError::UnsupportedOperation`].
pub trait Numeric: Copy + Default + PartialEq + PartialOrd + fmt::Debug + fmt::Display + 'static {
    const DTYPE: DType;
    const ZERO: Self;
    const ONE: Self;
    /// Absolute tolerance used by [`Numeric::approx_eq`]; zero for integers.
    const EPSILON: Self;
    const MIN_VALUE: Self;
    const MAX_VALUE: Self;

    fn neg(self) -> Self;
    fn add(self, rhs: Self) -> Self;
    fn sub(self, rhs: Self) -> Self;
    fn mul(self, rhs: Self) -> Self;
    fn div(self, rhs: Self) -> Result<Self>;

    fn exp(self) -> Result<Self>;
    fn log(self) -> Result<Self>;
    fn tanh(self) -> Result<Self>;
    fn abs(self) -> Self;
    fn sqrt(self) -> Self;

    /// Rounds half to even at the given number of decimal digits.
    fn round(self, digits: u32) -> Self;

    fn min(self, other: Self) -> Self;
    fn max(self, other: Self) -> Self;

    /// Samples uniformly from `[min, max)`; an empty range yields `min`.
    fn sample<R: Rng + ?Sized>(rng: &mut R, min: Self, max: Self) -> Self;

    fn to_f64(self) -> f64;
    fn from_f64(value: f64) -> Self;

    /// Equality within [`Numeric::EPSILON`].
    fn approx_eq(self, other: Self) -> bool;

    fn cast<U: Numeric>(self) -> U {
        U::from_f64(self.to_f64())
    }

    fn from_bool(value: bool) -> Self {
        if value { Self::ONE } else { Self::ZERO }
    }

    fn sq(self) -> Self {
        self.mul(self)
    }

    fn sigmoid(self) -> Result<Self> {
        Self::ONE.div(Self::ONE.add(self.neg().exp()?))
    }

    fn dsigmoid(self) -> Result<Self> {
        let s = self.sigmoid()?;
        Ok(s.mul(Self::ONE.sub(s)))
    }

    fn dtanh(self) -> Result<Self> {
        Ok(Self::ONE.sub(self.tanh()?.sq()))
    }

    fn clamp_to(self, min: f64, max: f64) -> Self {
        Self::from_f64(min).max(self.min(Self::from_f64(max)))
    }
}

impl Numeric for i32 {
    const DTYPE: DType = DType::Int32;
    const ZERO: Self = 0;
    const ONE: Self = 1;
    const EPSILON: Self = 0;
    const MIN_VALUE: Self = i32::MIN;
    const MAX_VALUE: Self = i32::MAX;

    fn neg(self) -> Self {
        self.wrapping_neg()
    }

    fn add(self, rhs: Self) -> Self {
        self.wrapping_add(rhs)
    }

    fn sub(self, rhs: Self) -> Self {
        self.wrapping_sub(rhs)
    }

    fn mul(self, rhs: Self) -> Self {
        self.wrapping_mul(rhs)
    }

    fn div(self, rhs: Self) -> Result<Self> {
        if rhs == 0 {
            return Err(ArrayError::UnsupportedOperation(format!(
                "integer division of {self} by zero"
            )));
        }
        Ok(self.wrapping_div(rhs))
    }

    fn exp(self) -> Result<Self> {
        Err(unsupported_for_integers("exp"))
    }

    fn log(self) -> Result<Self> {
        Err(unsupported_for_integers("log"))
    }

    fn tanh(self) -> Result<Self> {
        Err(unsupported_for_integers("tanh"))
    }

    fn abs(self) -> Self {
        self.wrapping_abs()
    }

    fn sqrt(self) -> Self {
        (self as f64).sqrt() as i32
    }

    fn round(self, _digits: u32) -> Self {
        self
    }

    fn min(self, other: Self) -> Self {
        Ord::min(self, other)
    }

    fn max(self, other: Self) -> Self {
        Ord::max(self, other)
    }

    fn sample<R: Rng + ?Sized>(rng: &mut R, min: Self, max: Self) -> Self {
        if min < max { rng.gen_range(min..max) } else { min }
    }

    fn to_f64(self) -> f64 {
        self as f64
    }

    fn from_f64(value: f64) -> Self {
        value.round_ties_even() as i32
    }

    fn approx_eq(self, other: Self) -> bool {
        self == other
    }
}

fn unsupported_for_integers(op: &str) -> ArrayError {
    ArrayError::UnsupportedOperation(format!("{op} is not defined for {}", DType::Int32))
}

macro_rules! impl_numeric_for_float {
    ($float:ty, $dtype:expr) => {
        impl Numeric for $float {
            const DTYPE: DType = $dtype;
            const ZERO: Self = 0.0;
            const ONE: Self = 1.0;
            const EPSILON: Self = 1e-6;
            const MIN_VALUE: Self = <$float>::MIN;
            const MAX_VALUE: Self = <$float>::MAX;

            fn neg(self) -> Self {
                -self
            }

            fn add(self, rhs: Self) -> Self {
                self + rhs
            }

            fn sub(self, rhs: Self) -> Self {
                self - rhs
            }

            fn mul(self, rhs: Self) -> Self {
                self * rhs
            }

            fn div(self, rhs: Self) -> Result<Self> {
                Ok(self / rhs)
            }

            fn exp(self) -> Result<Self> {
                Ok(<$float>::exp(self))
            }

            fn log(self) -> Result<Self> {
                Ok(<$float>::ln(self))
            }

            fn tanh(self) -> Result<Self> {
                Ok(<$float>::tanh(self))
            }

            fn abs(self) -> Self {
                <$float>::abs(self)
            }

            fn sqrt(self) -> Self {
                <$float>::sqrt(self)
            }

            fn round(self, digits: u32) -> Self {
                let scale = (10.0 as $float).powi(digits as i32);
                (self * scale).round_ties_even() / scale
            }

            fn min(self, other: Self) -> Self {
                <$float>::min(self, other)
            }

            fn max(self, other: Self) -> Self {
                <$float>::max(self, other)
            }

            fn sample<R: Rng + ?Sized>(rng: &mut R, min: Self, max: Self) -> Self {
                if min < max { rng.gen_range(min..max) } else { min }
            }

            fn to_f64(self) -> f64 {
                self as f64
            }

            fn from_f64(value: f64) -> Self {
                value as $float
            }

            fn approx_eq(self, other: Self) -> bool {
                <$float>::abs(self - other) <= Self::EPSILON
            }
        }
    };
}

impl_numeric_for_float!(f32, DType::Float32);
impl_numeric_for_float!(f64, DType::Float64);
