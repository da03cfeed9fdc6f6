use super::*;
use rand::RngCore;

/// A network layer with hand-derived gradients.
pub trait Layer<T: Numeric> {
    fn name(&self) -> String;

    fn input_shape(&self) -> &[usize];

    fn output_shape(&self) -> &[usize];

    /// Number of trainable values.
    fn params(&self) -> usize;

    fn set_input_shape(&mut self, shape: &[usize]);

    /// Allocates parameters; each one receives a fresh copy of `optimizer`.
    fn initialize(&mut self, optimizer: &dyn Optimizer<T>, rng: &mut dyn RngCore) -> Result<()>;

    /// Computes the layer output, remembering the input for [`Layer::backward`].
    fn forward(&mut self, x: &NdArray<T>, training: bool) -> Result<NdArray<T>>;

    /// Takes the gradient of the loss with respect to the output, updates the parameters when
    /// training and returns the gradient with respect to the input.
    fn backward(&mut self, grad: &NdArray<T>) -> Result<NdArray<T>>;
}

/// Applies an activation function elementwise.
pub struct ActivationLayer<T: Numeric> {
    activation: Box<dyn Activation<T>>,
    shape: Vec<usize>,
    input: Option<NdArray<T>>,
}

impl<T: Numeric> ActivationLayer<T> {
    pub fn new(activation: impl Activation<T> + 'static) -> Self {
        Self {
            activation: Box::new(activation),
            shape: Vec::new(),
            input: None,
        }
    }
}

impl<T: Numeric> Layer<T> for ActivationLayer<T> {
    fn name(&self) -> String {
        self.activation.name().to_string()
    }

    fn input_shape(&self) -> &[usize] {
        &self.shape
    }

    fn output_shape(&self) -> &[usize] {
        &self.shape
    }

    fn params(&self) -> usize {
        0
    }

    fn set_input_shape(&mut self, shape: &[usize]) {
        self.shape = shape.to_vec();
    }

    fn initialize(&mut self, _optimizer: &dyn Optimizer<T>, _rng: &mut dyn RngCore) -> Result<()> {
        Ok(())
    }

    fn forward(&mut self, x: &NdArray<T>, _training: bool) -> Result<NdArray<T>> {
        self.input = Some(x.clone());
        self.activation.func(&x.view()).copy()
    }

    fn backward(&mut self, grad: &NdArray<T>) -> Result<NdArray<T>> {
        let input = self.input.as_ref().ok_or_else(|| not_run(&self.name()))?;
        (grad.view() * self.activation.grad(&input.view())).copy()
    }
}

/// Fully connected layer `x . W + b`, optionally followed by an activation.
pub struct Dense<T: Numeric> {
    input_shape: Vec<usize>,
    output_shape: Vec<usize>,
    activation: Option<ActivationLayer<T>>,
    params: Option<DenseParams<T>>,
    input: Option<NdArray<T>>,
    training: bool,
}

struct DenseParams<T: Numeric> {
    weights: NdArray<T>,
    biases: NdArray<T>,
    weights_optimizer: Box<dyn Optimizer<T>>,
    biases_optimizer: Box<dyn Optimizer<T>>,
}

impl<T: Numeric> Dense<T> {
    /// Creates a layer whose input size is taken from the previous layer.
    pub fn new(output_nodes: usize) -> Self {
        Self {
            input_shape: Vec::new(),
            output_shape: vec![output_nodes],
            activation: None,
            params: None,
            input: None,
            training: false,
        }
    }

    /// Creates a first layer with a known input size.
    pub fn with_input(input_nodes: usize, output_nodes: usize) -> Self {
        let mut layer = Self::new(output_nodes);
        layer.input_shape = vec![input_nodes];
        layer
    }

    pub fn activation(mut self, activation: impl Activation<T> + 'static) -> Self {
        self.activation = Some(ActivationLayer::new(activation));
        self
    }

    pub fn weights(&self) -> Option<&NdArray<T>> {
        self.params.as_ref().map(|p| &p.weights)
    }

    pub fn biases(&self) -> Option<&NdArray<T>> {
        self.params.as_ref().map(|p| &p.biases)
    }

    /// Replaces the weights and biases, keeping the optimizers.
    pub fn set_parameters(&mut self, weights: NdArray<T>, biases: NdArray<T>) -> Result<()> {
        let name = self.name();
        let params = self.params.as_mut().ok_or_else(|| not_initialized(&name))?;
        if weights.shape() != params.weights.shape() || biases.shape() != params.biases.shape() {
            return Err(ArrayError::ShapeMismatch(format!(
                "{name} expects weights {:?} and biases {:?}",
                params.weights.shape(),
                params.biases.shape()
            )));
        }
        params.weights = weights;
        params.biases = biases;
        Ok(())
    }
}

impl<T: Numeric> Layer<T> for Dense<T> {
    fn name(&self) -> String {
        match &self.activation {
            Some(activation) => format!("Dense-{}", activation.name()),
            None => "Dense".to_string(),
        }
    }

    fn input_shape(&self) -> &[usize] {
        &self.input_shape
    }

    fn output_shape(&self) -> &[usize] {
        &self.output_shape
    }

    fn params(&self) -> usize {
        self.params
            .as_ref()
            .map_or(0, |p| p.weights.count() + p.biases.count())
    }

    fn set_input_shape(&mut self, shape: &[usize]) {
        self.input_shape = shape.to_vec();
    }

    fn initialize(&mut self, optimizer: &dyn Optimizer<T>, rng: &mut dyn RngCore) -> Result<()> {
        let Some(&input_nodes) = self.input_shape.first() else {
            return Err(ArrayError::InvalidArgument(format!(
                "{} has no input shape",
                self.name()
            )));
        };
        let output_nodes = self.output_shape[0];

        let limit = 1.0 / (input_nodes as f64).sqrt();
        let weights = NdArray::<f64>::uniform(rng, -limit, limit, &[input_nodes, output_nodes])
            .view()
            .cast::<T>()
            .copy()?;

        self.params = Some(DenseParams {
            weights,
            biases: NdArray::zeros(&[1, output_nodes]),
            weights_optimizer: optimizer.fresh(),
            biases_optimizer: optimizer.fresh(),
        });
        if let Some(activation) = self.activation.as_mut() {
            activation.set_input_shape(&self.output_shape);
        }

        Ok(())
    }

    fn forward(&mut self, x: &NdArray<T>, training: bool) -> Result<NdArray<T>> {
        let name = self.name();
        let params = self.params.as_ref().ok_or_else(|| not_initialized(&name))?;

        self.training = training;
        self.input = Some(x.clone());

        let output = (x.view().contract(&params.weights.view()) + params.biases.view()).copy()?;
        match self.activation.as_mut() {
            Some(activation) => activation.forward(&output, training),
            None => Ok(output),
        }
    }

    fn backward(&mut self, grad: &NdArray<T>) -> Result<NdArray<T>> {
        let name = self.name();
        let grad = match self.activation.as_mut() {
            Some(activation) => activation.backward(grad)?,
            None => grad.clone(),
        };

        let params = self.params.as_mut().ok_or_else(|| not_initialized(&name))?;
        let input = self.input.as_ref().ok_or_else(|| not_run(&name))?;
        let weights = params.weights.clone();

        if self.training {
            let grad_weights = input.view().t().contract(&grad.view()).copy()?;
            let grad_biases = grad.view().sum(Some(0), true).copy()?;

            params.weights = params.weights_optimizer.update(&params.weights, &grad_weights)?;
            params.biases = params.biases_optimizer.update(&params.biases, &grad_biases)?;
        }

        grad.view().contract(&weights.view().t()).copy()
    }
}

fn not_initialized(name: &str) -> ArrayError {
    ArrayError::InvalidArgument(format!("{name} is not initialized"))
}

fn not_run(name: &str) -> ArrayError {
    ArrayError::InvalidArgument(format!("{name} has no input, run forward first"))
}
