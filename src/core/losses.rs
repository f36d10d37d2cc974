use crate::prelude::*;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Loss {
    #[default]
    SquaredError,
}

impl Loss {
    /// Loss contributed by a single output neuron.
    pub fn loss(&self, predicted: f64, expected: f64) -> f64 {
        match self {
            Self::SquaredError => (predicted - expected).powi(2),
        }
    }

    /// Partial derivative of the mean loss over `output_count` outputs with
    /// respect to one prediction.
    pub fn derivative(&self, predicted: f64, expected: f64, output_count: usize) -> f64 {
        match self {
            Self::SquaredError => 2.0 / output_count as f64 * (predicted - expected),
        }
    }
}

/// Mean of the per-output losses. Slices must have equal length.
pub fn mean_loss(loss: Loss, predicted: &[f64], expected: &[f64]) -> Result<f64> {
    if predicted.len() != expected.len() {
        return Err(NNError::InvalidExpectedSize {
            expected: predicted.len(),
            actual: expected.len(),
        });
    }
    if predicted.is_empty() {
        return Ok(0.0);
    }
    let total: f64 = predicted
        .iter()
        .zip(expected)
        .map(|(&p, &e)| loss.loss(p, e))
        .sum();
    Ok(total / predicted.len() as f64)
}
