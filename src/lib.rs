//! A small fully connected feedforward network trained one example at a time
//! with backpropagation and plain gradient descent.
//!
//! Every weight and bias is a separate [`Parameter`] so the propagation
//! arithmetic stays visible: no matrices, no batching.

pub mod builder;
pub mod core;
pub mod data;
pub mod error;
pub mod models;
pub mod persistence;
pub mod prelude;
pub mod utils;

// Re-export types
pub use crate::core::{Activation, Layer, Loss, Neuron, Parameter};
pub use builder::{NetworkBuilder, NetworkConfig};
pub use error::{NNError, Result};
pub use models::{Evaluation, Network};

pub mod plot {
    pub mod plot_errors_over_epochs;
}
