use super::*;

/// Inputs with probabilities are kept this far from 0 and 1.
const PROBABILITY_CLAMP: f64 = 1e-6;

/// Elementwise loss between targets `y` and predictions `p`.
pub trait Loss<T: Numeric> {
    fn loss(&self, y: &NdView<T>, p: &NdView<T>) -> NdView<T>;

    /// Derivative of [`Loss::loss`] with respect to `p`.
    fn grad(&self, y: &NdView<T>, p: &NdView<T>) -> NdView<T>;
}

/// Half squared error.
#[derive(Clone, Copy, Debug, Default)]
pub struct SquareLoss;

impl<T: Numeric> Loss<T> for SquareLoss {
    fn loss(&self, y: &NdView<T>, p: &NdView<T>) -> NdView<T> {
        (p - y).sq() / 2.0
    }

    fn grad(&self, y: &NdView<T>, p: &NdView<T>) -> NdView<T> {
        p - y
    }
}

/// Binary cross entropy of probabilities.
#[derive(Clone, Copy, Debug, Default)]
pub struct CrossEntropyLoss;

impl<T: Numeric> Loss<T> for CrossEntropyLoss {
    fn loss(&self, y: &NdView<T>, p: &NdView<T>) -> NdView<T> {
        let p = p.clamp(PROBABILITY_CLAMP, 1.0 - PROBABILITY_CLAMP);
        -y * p.log() - (1.0 - y) * (1.0 - &p).log()
    }

    fn grad(&self, y: &NdView<T>, p: &NdView<T>) -> NdView<T> {
        let p = p.clamp(PROBABILITY_CLAMP, 1.0 - PROBABILITY_CLAMP);
        -y / &p + (1.0 - y) / (1.0 - &p)
    }
}
