use crate::prelude::*;

/// One unit of the network. Called a perceptron in older literature.
///
/// Input-layer neurons carry neither weights nor bias: they only hold the
/// value written by the forward pass. Every other neuron has one weight per
/// neuron of the previous layer, in the same order, and a bias.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Neuron {
    #[serde(default, alias = "Activation", serialize_with = "finite_or_zero")]
    pub activation: f64,
    #[serde(alias = "WeightsVector")]
    pub weights: Option<Vec<Parameter>>,
    #[serde(alias = "Bias")]
    pub bias: Option<Parameter>,
}

/// JSON has no encoding for NaN or infinity, and an overflowed activation is
/// recomputed by the next forward pass anyway.
fn finite_or_zero<S: serde::Serializer>(
    value: &f64,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_f64(if value.is_finite() { *value } else { 0.0 })
}

impl Neuron {
    pub fn input() -> Self {
        Self::default()
    }

    pub fn new(weights: Vec<Parameter>, bias: Parameter) -> Self {
        Self {
            activation: 0.0,
            weights: Some(weights),
            bias: Some(bias),
        }
    }

    /// Builds a neuron from raw weight values and a bias value.
    pub fn with_values(weights: &[f64], bias: f64) -> Self {
        Self::new(
            weights.iter().map(|&w| Parameter::new(w)).collect(),
            Parameter::new(bias),
        )
    }

    pub fn is_input(&self) -> bool {
        self.weights.is_none() && self.bias.is_none()
    }

    pub fn fan_in(&self) -> usize {
        self.weights.as_ref().map_or(0, Vec::len)
    }

    /// `z = dot(weights, previous.activations) + bias`
    pub fn weighted_sum(&self, previous: &Layer) -> f64 {
        let dot: f64 = self
            .weights
            .iter()
            .flatten()
            .zip(&previous.neurons)
            .map(|(w, n)| w.value * n.activation)
            .sum();
        dot + self.bias.map_or(0.0, |b| b.value)
    }

    pub fn parameter_count(&self) -> usize {
        self.fan_in() + usize::from(self.bias.is_some())
    }

    /// Iterates over every parameter this neuron owns, weights first.
    pub fn parameters(&self) -> impl Iterator<Item = &Parameter> {
        self.weights.iter().flatten().chain(self.bias.iter())
    }
}

/// An ordered group of neurons at the same depth.
///
/// Layers do not link to each other; the network keeps them in a `Vec` and
/// the previous layer of layer `i` is layer `i - 1`.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(transparent)]
pub struct Layer {
    pub neurons: Vec<Neuron>,
}

impl Layer {
    pub fn new(neurons: Vec<Neuron>) -> Self {
        Self { neurons }
    }

    pub fn input(size: usize) -> Self {
        Self {
            neurons: vec![Neuron::input(); size],
        }
    }

    pub fn len(&self) -> usize {
        self.neurons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.neurons.is_empty()
    }

    pub fn activations(&self) -> Vec<f64> {
        self.neurons.iter().map(|n| n.activation).collect()
    }

    pub fn parameter_count(&self) -> usize {
        self.neurons.iter().map(Neuron::parameter_count).sum()
    }

    pub fn typ(&self) -> String {
        if self.neurons.iter().all(Neuron::is_input) {
            "Input".into()
        } else {
            "Dense".into()
        }
    }
}

/// Checks the shape of a layer chain: at least two layers, an input layer
/// with bare neurons, and for every other layer a bias and exactly one
/// weight per neuron of the previous layer.
///
/// Returns a description of the first violation found.
pub fn check_chain(layers: &[Layer]) -> std::result::Result<(), String> {
    if layers.len() < 2 {
        return Err(format!(
            "a network needs an input and an output layer, got {} layer(s)",
            layers.len()
        ));
    }
    for (idx, layer) in layers.iter().enumerate() {
        if layer.is_empty() {
            return Err(format!("layer {} has no neurons", idx));
        }
    }
    if let Some(j) = layers[0].neurons.iter().position(|n| !n.is_input()) {
        return Err(format!("input neuron {} has incoming parameters", j));
    }
    for (idx, pair) in layers.windows(2).enumerate() {
        let (previous, layer) = (&pair[0], &pair[1]);
        for (j, neuron) in layer.neurons.iter().enumerate() {
            match (&neuron.weights, &neuron.bias) {
                (Some(weights), Some(_)) if weights.len() == previous.len() => {}
                (Some(weights), Some(_)) => {
                    return Err(format!(
                        "neuron {} of layer {} has {} weights but the previous layer has {} neurons",
                        j,
                        idx + 1,
                        weights.len(),
                        previous.len()
                    ));
                }
                _ => {
                    return Err(format!(
                        "neuron {} of layer {} is missing its weights or bias",
                        j,
                        idx + 1
                    ));
                }
            }
        }
    }
    Ok(())
}
