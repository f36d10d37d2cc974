use crate::core::layers::check_chain;
use crate::persistence;
use crate::prelude::*;
use crate::utils::argmax;
use std::path::Path;
use tracing::{debug, info, warn};

/// A fully connected feedforward network.
///
/// Owns the layer chain: `layers[0]` is the input layer, the last entry is
/// the output layer, and the predecessor of layer `i` is layer `i - 1`.
/// The topology is fixed once the network exists; only activations and
/// parameters change.
#[derive(Debug, Clone)]
pub struct Network {
    layers: Vec<Layer>,
    learning_rate: f64,
    activation: Activation,
    loss: Loss,
}

/// Outcome of [`Network::test`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Evaluation {
    pub correct: usize,
    pub total: usize,
}

impl Evaluation {
    pub fn mistakes(&self) -> usize {
        self.total - self.correct
    }

    pub fn accuracy(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.correct as f64 / self.total as f64
        }
    }
}

pub(crate) fn check_learning_rate(learning_rate: f64) -> Result<()> {
    if !(learning_rate.is_finite() && learning_rate > 0.0) {
        return Err(NNError::ConfigurationError(format!(
            "learning rate must be greater than zero, got {}",
            learning_rate
        )));
    }
    Ok(())
}

impl Network {
    pub fn builder() -> NetworkBuilder {
        NetworkBuilder::new()
    }

    /// Wraps an already linked layer chain.
    pub fn from_layers(
        layers: Vec<Layer>,
        activation: Activation,
        loss: Loss,
        learning_rate: f64,
    ) -> Result<Self> {
        check_learning_rate(learning_rate)?;
        check_chain(&layers).map_err(NNError::ConfigurationError)?;
        Ok(Self {
            layers,
            learning_rate,
            activation,
            loss,
        })
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Weight `i` of neuron `neuron` in layer `layer`.
    pub fn weight_mut(&mut self, layer: usize, neuron: usize, i: usize) -> Option<&mut Parameter> {
        self.layers
            .get_mut(layer)?
            .neurons
            .get_mut(neuron)?
            .weights
            .as_mut()?
            .get_mut(i)
    }

    pub fn bias_mut(&mut self, layer: usize, neuron: usize) -> Option<&mut Parameter> {
        self.layers
            .get_mut(layer)?
            .neurons
            .get_mut(neuron)?
            .bias
            .as_mut()
    }

    pub fn into_layers(self) -> Vec<Layer> {
        self.layers
    }

    pub fn layer(&self, idx: usize) -> Option<&Layer> {
        self.layers.get(idx)
    }

    pub fn previous(&self, idx: usize) -> Option<&Layer> {
        idx.checked_sub(1).and_then(|p| self.layers.get(p))
    }

    pub fn next(&self, idx: usize) -> Option<&Layer> {
        self.layers.get(idx + 1)
    }

    pub fn input_layer(&self) -> &Layer {
        &self.layers[0]
    }

    pub fn output_layer(&self) -> &Layer {
        &self.layers[self.layers.len() - 1]
    }

    pub fn input_size(&self) -> usize {
        self.input_layer().len()
    }

    pub fn output_size(&self) -> usize {
        self.output_layer().len()
    }

    pub fn output_activations(&self) -> Vec<f64> {
        self.output_layer().activations()
    }

    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    pub fn set_learning_rate(&mut self, learning_rate: f64) -> Result<()> {
        check_learning_rate(learning_rate)?;
        self.learning_rate = learning_rate;
        Ok(())
    }

    pub fn activation(&self) -> Activation {
        self.activation
    }

    pub fn loss(&self) -> Loss {
        self.loss
    }

    pub fn parameter_count(&self) -> usize {
        self.layers.iter().map(Layer::parameter_count).sum()
    }

    pub fn summary(&self) -> String {
        let mut res = "\nModel Network\n".to_string();
        res.push_str("-------------------------------------------------------------\n");
        res.push_str("Layer (Type)\t\t Output shape\t\t No.of params\n");
        for layer in self.layers.iter() {
            res.push_str(&format!(
                "{}\t\t\t  (None, {})\t\t  {}\n",
                layer.typ(),
                layer.len(),
                layer.parameter_count()
            ));
        }
        res.push_str("-------------------------------------------------------------\n");
        res.push_str(&format!("Total params: {}\n", self.parameter_count()));
        res.push_str(&format!(
            "Activation: {}, learning rate: {}\n",
            self.activation.name(),
            self.learning_rate
        ));
        res
    }

    /// Writes `input` into the input layer and recomputes every other
    /// layer's activations in chain order.
    pub fn propagate_forward(&mut self, input: &[f64]) -> Result<()> {
        if input.len() != self.input_size() {
            return Err(NNError::InvalidInputSize {
                expected: self.input_size(),
                actual: input.len(),
            });
        }

        for (neuron, &x) in self.layers[0].neurons.iter_mut().zip(input) {
            neuron.activation = x;
        }

        for idx in 1..self.layers.len() {
            let (before, after) = self.layers.split_at_mut(idx);
            let previous = &before[idx - 1];
            for neuron in after[0].neurons.iter_mut() {
                let z = neuron.weighted_sum(previous);
                neuron.activation = self.activation.forward(z);
            }
        }
        Ok(())
    }

    /// Forward pass returning a copy of the output activations.
    pub fn predict(&mut self, input: &[f64]) -> Result<Vec<f64>> {
        self.propagate_forward(input)?;
        Ok(self.output_activations())
    }

    /// Adds one example's gradient to every parameter's pending gradient.
    ///
    /// Walks from the output layer toward the input layer. The activations
    /// must come from a forward pass on the matching input.
    pub fn accumulate_gradients(&mut self, expected: &[f64]) -> Result<()> {
        let output_size = self.output_size();
        if expected.len() != output_size {
            return Err(NNError::InvalidExpectedSize {
                expected: output_size,
                actual: expected.len(),
            });
        }

        let mut multipliers: Vec<f64> = self
            .output_layer()
            .neurons
            .iter()
            .zip(expected)
            .map(|(n, &e)| self.loss.derivative(n.activation, e, output_size))
            .collect();

        for idx in (1..self.layers.len()).rev() {
            let (before, after) = self.layers.split_at_mut(idx);
            let previous = &before[idx - 1];
            let mut next_multipliers = vec![0.0; previous.len()];

            for (neuron, &g) in after[0].neurons.iter_mut().zip(&multipliers) {
                let z = neuron.weighted_sum(previous);
                let dcdz = g * self.activation.derivative(z);

                for ((weight, prev), next_g) in neuron
                    .weights
                    .iter_mut()
                    .flatten()
                    .zip(&previous.neurons)
                    .zip(next_multipliers.iter_mut())
                {
                    *next_g += dcdz * weight.value;
                    weight.accumulate(dcdz * prev.activation);
                }
                if let Some(bias) = neuron.bias.as_mut() {
                    bias.accumulate(dcdz);
                }
            }

            multipliers = next_multipliers;
        }
        Ok(())
    }

    /// Backpropagates `expected` and applies the resulting update.
    pub fn propagate_backward(&mut self, expected: &[f64]) -> Result<()> {
        self.accumulate_gradients(expected)?;
        self.apply_gradients();
        Ok(())
    }

    /// One gradient descent step over every non-input parameter. Leaves all
    /// pending gradients at zero.
    pub fn apply_gradients(&mut self) {
        let learning_rate = self.learning_rate;
        for layer in self.layers.iter_mut().skip(1) {
            layer.apply_gradients(learning_rate);
        }
    }

    /// Mean loss of the current output activations against `expected`.
    pub fn example_loss(&self, expected: &[f64]) -> Result<f64> {
        mean_loss(self.loss, &self.output_activations(), expected)
    }

    /// Runs `epochs` passes over `examples`, in order, updating after every
    /// example.
    ///
    /// Returns one reported cost per epoch: the mean loss of the output
    /// activations left by the epoch's last forward pass, measured against the
    /// last example's expected vector. It is a progress signal, not an
    /// epoch average.
    pub fn train(&mut self, examples: &[Example], epochs: usize) -> Result<Vec<f64>> {
        let last = examples.last().ok_or(NNError::EmptyDataset)?;
        let mut costs = Vec::with_capacity(epochs);

        for epoch in 0..epochs {
            for example in examples {
                self.propagate_forward(&example.input)?;
                self.propagate_backward(&example.expected)?;
            }

            let cost = self.example_loss(&last.expected)?;
            info!("Total cost: {} epoch: {}.", cost, epoch + 1);
            costs.push(cost);
        }
        Ok(costs)
    }

    /// Fails on the first example whose input or expected vector does not
    /// match the input or output layer width.
    pub fn check_examples(&self, examples: &[Example]) -> Result<()> {
        for example in examples {
            if example.input.len() != self.input_size() {
                return Err(NNError::InvalidInputSize {
                    expected: self.input_size(),
                    actual: example.input.len(),
                });
            }
            if example.expected.len() != self.output_size() {
                return Err(NNError::InvalidExpectedSize {
                    expected: self.output_size(),
                    actual: example.expected.len(),
                });
            }
        }
        Ok(())
    }

    /// Counts how many examples the network classifies correctly: the index
    /// of the largest output must equal the index of the largest expected
    /// value. Parameters are left untouched.
    pub fn test(&mut self, examples: &[Example]) -> Result<Evaluation> {
        if examples.is_empty() {
            warn!("Evaluating on an empty dataset");
        }

        let mut correct = 0;
        for example in examples {
            if example.expected.len() != self.output_size() {
                return Err(NNError::InvalidExpectedSize {
                    expected: self.output_size(),
                    actual: example.expected.len(),
                });
            }
            self.propagate_forward(&example.input)?;
            let predicted = self.output_layer().neurons.iter().map(|n| n.activation);
            if argmax(predicted) == argmax(example.expected.iter().copied()) {
                correct += 1;
            }
        }

        let evaluation = Evaluation {
            correct,
            total: examples.len(),
        };
        info!(
            "Guessed correctly {} examples. Mistakes {}",
            evaluation.correct,
            evaluation.mistakes()
        );
        Ok(evaluation)
    }

    /// Saves the layer chain in the delimited text format.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        persistence::save_layers(&self.layers, &path)?;
        debug!("Saved network to {}", path.as_ref().display());
        Ok(())
    }

    /// Loads a layer chain written by [`Network::save`]. The strategies and
    /// learning rate are not part of the file.
    pub fn load<P: AsRef<Path>>(
        path: P,
        activation: Activation,
        loss: Loss,
        learning_rate: f64,
    ) -> Result<Self> {
        let layers = persistence::load_layers(&path)?;
        debug!(
            "Loaded {} layers from {}",
            layers.len(),
            path.as_ref().display()
        );
        Self::from_layers(layers, activation, loss, learning_rate)
    }

    pub fn save_binary<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        persistence::save_binary(&self.layers, path)
    }

    pub fn load_binary<P: AsRef<Path>>(
        path: P,
        activation: Activation,
        loss: Loss,
        learning_rate: f64,
    ) -> Result<Self> {
        let layers = persistence::load_binary(path)?;
        Self::from_layers(layers, activation, loss, learning_rate)
    }
}
