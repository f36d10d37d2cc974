use crate::models::check_learning_rate;
use crate::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, StandardNormal};
use std::path::Path;
use tracing::debug;

fn default_learning_rate() -> f64 {
    0.02
}

/// Topology and training settings for a new network.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct NetworkConfig {
    pub input_size: usize,
    #[serde(default)]
    pub hidden_sizes: Vec<usize>,
    pub output_size: usize,
    #[serde(default = "default_learning_rate")]
    pub learning_rate: f64,
    #[serde(default)]
    pub activation: Activation,
    #[serde(default)]
    pub loss: Loss,
    #[serde(default)]
    pub seed: Option<u64>,
}

impl NetworkConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| NNError::ConfigurationError(format!("invalid network config: {}", e)))
    }
}

/// Assembles a randomly initialized network: weights drawn from the
/// standard normal distribution, biases at zero.
#[derive(Debug, Clone)]
pub struct NetworkBuilder {
    input_size: usize,
    hidden_sizes: Vec<usize>,
    output_size: usize,
    learning_rate: f64,
    activation: Activation,
    loss: Loss,
    seed: Option<u64>,
}

impl Default for NetworkBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl NetworkBuilder {
    pub fn new() -> Self {
        Self {
            input_size: 0,
            hidden_sizes: vec![],
            output_size: 0,
            learning_rate: 0.0,
            activation: Activation::default(),
            loss: Loss::default(),
            seed: None,
        }
    }

    pub fn from_config(config: &NetworkConfig) -> Self {
        Self {
            input_size: config.input_size,
            hidden_sizes: config.hidden_sizes.clone(),
            output_size: config.output_size,
            learning_rate: config.learning_rate,
            activation: config.activation,
            loss: config.loss,
            seed: config.seed,
        }
    }

    pub fn with_input_size(mut self, size: usize) -> Self {
        self.input_size = size;
        self
    }

    pub fn with_hidden_layer(mut self, size: usize) -> Self {
        self.hidden_sizes.push(size);
        self
    }

    pub fn with_output_size(mut self, size: usize) -> Self {
        self.output_size = size;
        self
    }

    pub fn with_learning_rate(mut self, learning_rate: f64) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    pub fn with_activation(mut self, activation: Activation) -> Self {
        self.activation = activation;
        self
    }

    pub fn with_loss(mut self, loss: Loss) -> Self {
        self.loss = loss;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    fn validate(&self) -> Result<()> {
        check_learning_rate(self.learning_rate)?;
        if self.input_size == 0 {
            return Err(NNError::ConfigurationError(
                "input size must be greater than 0".to_string(),
            ));
        }
        if self.output_size == 0 {
            return Err(NNError::ConfigurationError(
                "output size must be greater than 0".to_string(),
            ));
        }
        if let Some(idx) = self.hidden_sizes.iter().position(|&s| s == 0) {
            return Err(NNError::ConfigurationError(format!(
                "hidden layer {} must have at least one neuron",
                idx
            )));
        }
        Ok(())
    }

    /// Builds with the configured seed, or from OS entropy when none is set.
    pub fn build(&self) -> Result<Network> {
        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        self.build_with_rng(&mut rng)
    }

    pub fn build_with_rng<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Network> {
        self.validate()?;

        let mut layers = Vec::with_capacity(self.hidden_sizes.len() + 2);
        layers.push(Layer::input(self.input_size));

        let mut fan_in = self.input_size;
        for &size in self.hidden_sizes.iter().chain(std::iter::once(&self.output_size)) {
            let neurons = (0..size)
                .map(|_| {
                    let weights = (0..fan_in)
                        .map(|_| Parameter::new(StandardNormal.sample(&mut *rng)))
                        .collect();
                    Neuron::new(weights, Parameter::new(0.0))
                })
                .collect();
            layers.push(Layer::new(neurons));
            fan_in = size;
        }

        debug!(
            "Built network {} -> {:?} -> {}",
            self.input_size, self.hidden_sizes, self.output_size
        );
        Network::from_layers(layers, self.activation, self.loss, self.learning_rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builder() -> NetworkBuilder {
        NetworkBuilder::new()
            .with_input_size(3)
            .with_hidden_layer(4)
            .with_hidden_layer(2)
            .with_output_size(2)
            .with_learning_rate(0.1)
    }

    #[test]
    fn shapes_follow_topology() {
        let net = builder().with_seed(42).build().unwrap();
        let sizes: Vec<usize> = net.layers().iter().map(Layer::len).collect();
        assert_eq!(sizes, vec![3, 4, 2, 2]);
        for idx in 1..net.layers().len() {
            let previous = net.previous(idx).unwrap();
            for neuron in &net.layers()[idx].neurons {
                assert_eq!(neuron.fan_in(), previous.len());
                assert_eq!(neuron.bias, Some(Parameter::new(0.0)));
            }
        }
        assert!(net.input_layer().neurons.iter().all(Neuron::is_input));
    }

    #[test]
    fn same_seed_same_weights() {
        let a = builder().with_seed(9).build().unwrap();
        let b = builder().with_seed(9).build().unwrap();
        let c = builder().with_seed(10).build().unwrap();
        assert_eq!(a.layers(), b.layers());
        assert_ne!(a.layers(), c.layers());
    }

    #[test]
    fn rejects_bad_configuration() {
        let err = builder().with_learning_rate(0.0).build().unwrap_err();
        assert!(matches!(err, NNError::ConfigurationError(_)));
        assert!(builder().with_learning_rate(-0.5).build().is_err());
        assert!(builder().with_input_size(0).build().is_err());
        assert!(builder().with_output_size(0).build().is_err());
        assert!(builder().with_hidden_layer(0).build().is_err());
    }

    #[test]
    fn no_hidden_layers() {
        let net = NetworkBuilder::new()
            .with_input_size(2)
            .with_output_size(2)
            .with_learning_rate(0.5)
            .build()
            .unwrap();
        assert_eq!(net.layers().len(), 2);
        assert_eq!(net.parameter_count(), 6);
    }

    #[test]
    fn config_from_json_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("net.json");
        std::fs::write(
            &path,
            r#"{ "input_size": 784, "hidden_sizes": [8], "output_size": 10, "activation": "relu" }"#,
        )
        .unwrap();
        let config = NetworkConfig::from_file(&path).unwrap();
        assert_eq!(config.learning_rate, 0.02);
        assert_eq!(config.activation, Activation::Relu);
        assert_eq!(config.loss, Loss::SquaredError);
        assert_eq!(config.seed, None);

        let net = NetworkBuilder::from_config(&config).with_seed(3).build().unwrap();
        assert_eq!(net.output_size(), 10);
        assert_eq!(net.learning_rate(), 0.02);
    }

    #[test]
    fn config_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("net.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            NetworkConfig::from_file(&path),
            Err(NNError::ConfigurationError(_))
        ));
    }
}
