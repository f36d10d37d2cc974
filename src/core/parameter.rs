use crate::prelude::*;

/// A single trainable scalar: a weight or a bias.
///
/// `pending_gradient` accumulates contributions during the backward pass and
/// is zero again once the update has been applied.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq)]
pub struct Parameter {
    #[serde(alias = "Value")]
    pub value: f64,
    #[serde(default, alias = "TempGradient")]
    pub pending_gradient: f64,
}

impl Parameter {
    pub fn new(value: f64) -> Self {
        Self {
            value,
            pending_gradient: 0.0,
        }
    }

    pub fn accumulate(&mut self, gradient: f64) {
        self.pending_gradient += gradient;
    }
}
