use super::*;

/// Updates one parameter array from its gradient.
///
/// Every parameter gets its own optimizer through [`Optimizer::fresh`], so state such as
/// momentum is never shared between parameters.
pub trait Optimizer<T: Numeric> {
    fn update(&mut self, w: &NdArray<T>, g: &NdArray<T>) -> Result<NdArray<T>>;

    /// Returns an optimizer with the same settings and no state.
    fn fresh(&self) -> Box<dyn Optimizer<T>>;
}

/// Stochastic gradient descent with momentum:
/// `v = momentum * v + (1 - momentum) * g`, `w = w - lr * v`.
#[derive(Clone)]
pub struct Sgd<T> {
    lr: f64,
    momentum: f64,
    velocity: Option<NdArray<T>>,
}

impl<T: Numeric> Sgd<T> {
    pub fn new(lr: f64) -> Self {
        Self::with_momentum(lr, 0.0)
    }

    pub fn with_momentum(lr: f64, momentum: f64) -> Self {
        Self {
            lr,
            momentum,
            velocity: None,
        }
    }
}

impl<T: Numeric> Optimizer<T> for Sgd<T> {
    fn update(&mut self, w: &NdArray<T>, g: &NdArray<T>) -> Result<NdArray<T>> {
        let velocity = match &self.velocity {
            Some(velocity) => velocity.view(),
            None => NdArray::zeros(w.shape()).view(),
        };

        let velocity = (self.momentum * velocity + (1.0 - self.momentum) * g.view()).copy()?;
        let updated = (w.view() - self.lr * velocity.view()).copy()?;
        self.velocity = Some(velocity);

        Ok(updated)
    }

    fn fresh(&self) -> Box<dyn Optimizer<T>> {
        Box::new(Self::with_momentum(self.lr, self.momentum))
    }
}
