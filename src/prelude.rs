pub use serde::{Deserialize, Serialize};

pub use crate::error::*;
pub use crate::models::{Evaluation, Network};
pub use crate::builder::{NetworkBuilder, NetworkConfig};
pub use crate::data::{Example, LoaderOptions};

// Internal re-exports
pub use crate::core::{
    mean_loss,
    Activation,
    Layer,
    Loss,
    Neuron,
    Normalization,
    Optimization,
    Parameter,
};
