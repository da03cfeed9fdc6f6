//! Library crate for nd_nn
//!
//! A feed-forward network trainer on top of `nd_array`: dense and activation layers with
//! hand-written gradients, losses, accuracy metrics and SGD with momentum.

use nd_array::{ArrayError, BatchIterator, NdArray, NdView, Numeric, Result};

pub mod accuracy;
pub mod activation;
pub mod layer;
pub mod loss;
pub mod optim;

mod network;

use crate::accuracy::Accuracy;
use crate::activation::Activation;
use crate::layer::Layer;
use crate::loss::Loss;
use crate::optim::Optimizer;

pub use crate::network::{EpochStats, FitConfig, Network};
