// src/core.rs
pub mod activations;
pub mod layers;
pub mod losses;
pub mod normalization;
pub mod optimizers;
pub mod output;
pub mod parameter;

// Re-export commonly used items
pub use activations::Activation;
pub use layers::{Layer, Neuron};
pub use losses::{mean_loss, Loss};
pub use normalization::Normalization;
pub use optimizers::Optimization;
pub use parameter::Parameter;
