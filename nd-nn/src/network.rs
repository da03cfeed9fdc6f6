use super::*;
use log::{debug, info};
use rand::RngCore;

/// Settings of [`Network::fit`].
#[derive(Clone, Debug)]
pub struct FitConfig {
    pub epochs: usize,
    pub batch_size: usize,
    /// Progress is logged every this many epochs and after the last one.
    pub display_epochs: usize,
    pub shuffle: bool,
}

impl Default for FitConfig {
    fn default() -> Self {
        Self {
            epochs: 100,
            batch_size: 32,
            display_epochs: 10,
            shuffle: true,
        }
    }
}

/// Mean loss and accuracy of one epoch.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EpochStats {
    pub epoch: usize,
    pub loss: f64,
    pub accuracy: f64,
}

/// A sequential stack of layers trained with mini-batch gradient descent.
pub struct Network<T: Numeric> {
    optimizer: Box<dyn Optimizer<T>>,
    loss: Box<dyn Loss<T>>,
    accuracy: Box<dyn Accuracy<T>>,
    layers: Vec<Box<dyn Layer<T>>>,
}

impl<T: Numeric> Network<T> {
    pub fn new(
        optimizer: impl Optimizer<T> + 'static,
        loss: impl Loss<T> + 'static,
        accuracy: impl Accuracy<T> + 'static,
    ) -> Self {
        Self {
            optimizer: Box::new(optimizer),
            loss: Box::new(loss),
            accuracy: Box::new(accuracy),
            layers: Vec::new(),
        }
    }

    /// Appends a layer, feeding it the output shape of the previous one, and initializes it.
    pub fn add_layer<R: RngCore>(
        &mut self,
        mut layer: impl Layer<T> + 'static,
        rng: &mut R,
    ) -> Result<()> {
        if let Some(last) = self.layers.last() {
            layer.set_input_shape(last.output_shape());
        }
        layer.initialize(self.optimizer.as_ref(), rng)?;
        self.layers.push(Box::new(layer));

        Ok(())
    }

    pub fn layers(&self) -> usize {
        self.layers.len()
    }

    pub fn forward(&mut self, x: &NdArray<T>, training: bool) -> Result<NdArray<T>> {
        self.layers
            .iter_mut()
            .try_fold(x.clone(), |x, layer| layer.forward(&x, training))
    }

    pub fn backward(&mut self, grad: &NdArray<T>) -> Result<NdArray<T>> {
        self.layers
            .iter_mut()
            .rev()
            .try_fold(grad.clone(), |grad, layer| layer.backward(&grad))
    }

    pub fn predict(&mut self, x: &NdArray<T>) -> Result<NdArray<T>> {
        self.forward(x, false)
    }

    /// Runs one gradient step and returns the batch loss and accuracy before the step.
    pub fn train_on_batch(&mut self, x: &NdArray<T>, y: &NdArray<T>) -> Result<(f64, f64)> {
        let prediction = self.forward(x, true)?;
        let (y, p) = (y.view(), prediction.view());

        let loss = self.loss.loss(&y, &p).mean_all()?;
        let accuracy = self.accuracy.accuracy(&y, &p)?;

        let grad = self.loss.grad(&y, &p).copy()?;
        self.backward(&grad)?;

        Ok((loss, accuracy))
    }

    /// Returns loss and accuracy without touching the parameters.
    pub fn test_on_batch(&mut self, x: &NdArray<T>, y: &NdArray<T>) -> Result<(f64, f64)> {
        let prediction = self.predict(x)?;
        let (y, p) = (y.view(), prediction.view());

        Ok((self.loss.loss(&y, &p).mean_all()?, self.accuracy.accuracy(&y, &p)?))
    }

    /// Like [`Network::test_on_batch`], logging the result.
    pub fn test(&mut self, x: &NdArray<T>, y: &NdArray<T>) -> Result<(f64, f64)> {
        let (loss, accuracy) = self.test_on_batch(x, y)?;
        info!("test loss: {loss:.6} accuracy: {accuracy:.4}");

        Ok((loss, accuracy))
    }

    /// Trains for `config.epochs` epochs and returns the per-epoch means.
    pub fn fit<R: RngCore>(
        &mut self,
        x: &NdArray<T>,
        y: &NdArray<T>,
        config: &FitConfig,
        rng: &mut R,
    ) -> Result<Vec<EpochStats>> {
        let display = config.display_epochs.max(1);
        let mut history = Vec::with_capacity(config.epochs);

        for line in self.summary().lines() {
            debug!("{line}");
        }
        info!(
            "training {} layers for {} epochs, batch size {}",
            self.layers.len(),
            config.epochs,
            config.batch_size
        );

        for epoch in 1..=config.epochs {
            let batches = if config.shuffle {
                BatchIterator::shuffled(&x.view(), &y.view(), config.batch_size, rng)?
            } else {
                BatchIterator::new(&x.view(), &y.view(), config.batch_size)?
            };

            let (mut loss, mut accuracy, mut count) = (0.0, 0.0, 0);
            for (bx, by) in batches {
                let (batch_loss, batch_accuracy) = self.train_on_batch(&bx, &by)?;
                loss += batch_loss;
                accuracy += batch_accuracy;
                count += 1;
            }

            let count = Ord::max(count, 1) as f64;
            let stats = EpochStats {
                epoch,
                loss: loss / count,
                accuracy: accuracy / count,
            };
            if epoch % display == 0 || epoch == config.epochs {
                info!(
                    "epoch {:>5}/{} loss: {:.6} accuracy: {:.4}",
                    stats.epoch, config.epochs, stats.loss, stats.accuracy
                );
            }
            history.push(stats);
        }

        if let Some(last) = history.last() {
            info!("training done, loss: {:.6} accuracy: {:.4}", last.loss, last.accuracy);
        }

        Ok(history)
    }

    /// One line per layer with its name, parameter count and shapes.
    pub fn summary(&self) -> String {
        let header = format!("{:<16}{:>10}{:>12}{:>12}", "Layer", "Params", "Input", "Output");
        let rows = self.layers.iter().map(|layer| {
            format!(
                "{:<16}{:>10}{:>12}{:>12}",
                layer.name(),
                layer.params(),
                format!("{:?}", layer.input_shape()),
                format!("{:?}", layer.output_shape())
            )
        });
        let total: usize = self.layers.iter().map(|layer| layer.params()).sum();

        std::iter::once(header)
            .chain(rows)
            .chain(std::iter::once(format!("Total params: {total}")))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
