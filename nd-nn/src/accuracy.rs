use super::*;

/// Fraction of samples (rows) predicted correctly.
pub trait Accuracy<T: Numeric> {
    fn accuracy(&self, y: &NdView<T>, p: &NdView<T>) -> Result<f64>;
}

/// A row is correct when every rounded prediction equals the rounded target.
#[derive(Clone, Copy, Debug, Default)]
pub struct RoundAccuracy;

impl<T: Numeric> Accuracy<T> for RoundAccuracy {
    fn accuracy(&self, y: &NdView<T>, p: &NdView<T>) -> Result<f64> {
        y.round(0)
            .equal(&p.round(0))
            .prod(Some(1), false)
            .mean_all()
    }
}

/// A row is correct when the largest prediction sits where the largest target does.
#[derive(Clone, Copy, Debug, Default)]
pub struct ArgmaxAccuracy;

impl<T: Numeric> Accuracy<T> for ArgmaxAccuracy {
    fn accuracy(&self, y: &NdView<T>, p: &NdView<T>) -> Result<f64> {
        y.argmax(1).equal(&p.argmax(1)).mean_all()
    }
}
