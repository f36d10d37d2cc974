use crate::prelude::*;

/// Nonlinearity applied to every neuron outside the input layer.
///
/// Both `forward` and `derivative` take the pre-activation sum `z`.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Activation {
    Relu,
    #[default]
    Sigmoid,
}

impl Activation {
    pub fn forward(&self, z: f64) -> f64 {
        match self {
            Self::Relu => relu_forward(z),
            Self::Sigmoid => sigmoid_forward(z),
        }
    }

    pub fn derivative(&self, z: f64) -> f64 {
        match self {
            Self::Relu => relu_backward(z),
            Self::Sigmoid => sigmoid_backward(z),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Relu => "relu",
            Self::Sigmoid => "sigmoid",
        }
    }
}

fn sigmoid_forward(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

fn sigmoid_backward(z: f64) -> f64 {
    let s = sigmoid_forward(z);
    s * (1.0 - s)
}

fn relu_forward(z: f64) -> f64 {
    if z >= 0.0 {
        z
    } else {
        0.0
    }
}

fn relu_backward(z: f64) -> f64 {
    if z >= 0.0 {
        1.0
    } else {
        0.0
    }
}
