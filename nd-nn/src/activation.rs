//! Activation functions and their derivatives, both taken at the pre-activation input.

use super::*;

pub trait Activation<T: Numeric> {
    fn name(&self) -> &'static str;

    fn func(&self, x: &NdView<T>) -> NdView<T>;

    /// Derivative of [`Activation::func`] at `x`.
    fn grad(&self, x: &NdView<T>) -> NdView<T>;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct Sigmoid;

impl<T: Numeric> Activation<T> for Sigmoid {
    fn name(&self) -> &'static str {
        "Sigmoid"
    }

    fn func(&self, x: &NdView<T>) -> NdView<T> {
        x.sigmoid()
    }

    fn grad(&self, x: &NdView<T>) -> NdView<T> {
        x.dsigmoid()
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct Tanh;

impl<T: Numeric> Activation<T> for Tanh {
    fn name(&self) -> &'static str {
        "Tanh"
    }

    fn func(&self, x: &NdView<T>) -> NdView<T> {
        x.tanh()
    }

    fn grad(&self, x: &NdView<T>) -> NdView<T> {
        x.dtanh()
    }
}

/// Rectified linear unit; non-negative inputs pass through.
#[derive(Clone, Copy, Debug, Default)]
pub struct Relu;

impl<T: Numeric> Activation<T> for Relu {
    fn name(&self) -> &'static str {
        "ReLU"
    }

    fn func(&self, x: &NdView<T>) -> NdView<T> {
        Activation::<T>::grad(self, x) * x
    }

    fn grad(&self, x: &NdView<T>) -> NdView<T> {
        x.greater_equal(&NdArray::zeros(&[1]).view())
    }
}
