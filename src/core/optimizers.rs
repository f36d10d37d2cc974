use crate::core::layers::{Layer, Neuron};
use crate::core::parameter::Parameter;

/// Plain gradient descent: `value -= pending_gradient * learning_rate`,
/// then the pending gradient is reset to zero.
pub trait Optimization {
    fn apply_gradients(&mut self, learning_rate: f64);
}

impl Optimization for Parameter {
    fn apply_gradients(&mut self, learning_rate: f64) {
        self.value -= self.pending_gradient * learning_rate;
        self.pending_gradient = 0.0;
    }
}

impl Optimization for Neuron {
    fn apply_gradients(&mut self, learning_rate: f64) {
        if let Some(bias) = self.bias.as_mut() {
            bias.apply_gradients(learning_rate);
        }
        for weight in self.weights.iter_mut().flatten() {
            weight.apply_gradients(learning_rate);
        }
    }
}

impl Optimization for Layer {
    fn apply_gradients(&mut self, learning_rate: f64) {
        for neuron in self.neurons.iter_mut() {
            neuron.apply_gradients(learning_rate);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn parameter_step_zeroes_gradient() {
        let mut p = Parameter::new(1.0);
        p.accumulate(0.5);
        p.apply_gradients(0.1);
        assert_relative_eq!(p.value, 0.95);
        assert_eq!(p.pending_gradient, 0.0);
    }

    #[test]
    fn layer_step_touches_every_parameter() {
        let mut layer = Layer::new(vec![Neuron::with_values(&[1.0, 2.0], 3.0); 2]);
        for neuron in layer.neurons.iter_mut() {
            for w in neuron.weights.iter_mut().flatten() {
                w.accumulate(1.0);
            }
            if let Some(b) = neuron.bias.as_mut() {
                b.accumulate(-1.0);
            }
        }
        layer.apply_gradients(0.5);
        for neuron in &layer.neurons {
            let weights: Vec<f64> = neuron.weights.iter().flatten().map(|w| w.value).collect();
            assert_eq!(weights, vec![0.5, 1.5]);
            assert_eq!(neuron.bias.map(|b| b.value), Some(3.5));
            assert!(neuron.parameters().all(|p| p.pending_gradient == 0.0));
        }
    }
}
