//! Command-line entry point: builds or loads a network, trains it on a
//! labelled CSV file, evaluates it, and saves the result.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use scalarnet::core::output::write_cost_history;
use scalarnet::data::{load_examples_with, LoaderOptions};
use scalarnet::plot::plot_errors_over_epochs::plot_errors_over_epochs;
use scalarnet::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "scalarnet")]
#[command(about = "Train and evaluate a small feedforward network", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbosity level
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

#[derive(Clone, Copy, ValueEnum)]
enum ActivationArg {
    Relu,
    Sigmoid,
}

impl From<ActivationArg> for Activation {
    fn from(arg: ActivationArg) -> Self {
        match arg {
            ActivationArg::Relu => Activation::Relu,
            ActivationArg::Sigmoid => Activation::Sigmoid,
        }
    }
}

#[derive(clap::Args)]
struct DataArgs {
    /// Labelled CSV file: class index first, then the input values
    #[arg(short, long)]
    data: PathBuf,

    /// Number of classes (width of the one-hot expected vector)
    #[arg(short, long, default_value = "10")]
    classes: usize,

    /// Field delimiter
    #[arg(long, default_value = ",")]
    delimiter: char,

    /// Divide raw inputs by this value, e.g. 255 for pixel intensities
    #[arg(long)]
    input_max: Option<f64>,
}

impl DataArgs {
    fn load(&self) -> Result<Vec<Example>> {
        if !self.delimiter.is_ascii() {
            bail!("delimiter must be a single ASCII character");
        }
        let options = LoaderOptions {
            delimiter: self.delimiter as u8,
            scale: self.input_max.map(|ub| (0.0, ub)),
        };
        load_examples_with(&self.data, self.classes, options)
            .with_context(|| format!("loading {}", self.data.display()))
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Train a new or previously saved network
    Train {
        #[command(flatten)]
        data: DataArgs,

        /// JSON network config; cannot be combined with the topology flags below
        #[arg(
            long,
            conflicts_with_all = ["resume", "hidden", "learning_rate", "activation", "seed"]
        )]
        config: Option<PathBuf>,

        /// Continue training a saved network instead of building a new one
        #[arg(long)]
        resume: Option<PathBuf>,

        /// Hidden layer size, repeat for several layers
        #[arg(long = "hidden", default_values_t = [8])]
        hidden: Vec<usize>,

        #[arg(long, default_value = "0.02")]
        learning_rate: f64,

        #[arg(long, value_enum, default_value = "sigmoid")]
        activation: ActivationArg,

        /// Seed for weight initialization
        #[arg(long)]
        seed: Option<u64>,

        #[arg(short, long, default_value = "1000")]
        epochs: usize,

        /// Where to save the trained network
        #[arg(short, long)]
        output: PathBuf,

        /// Use the binary snapshot format
        #[arg(long)]
        binary: bool,

        /// Write the per-epoch cost to this CSV file
        #[arg(long)]
        history: Option<PathBuf>,

        /// Draw the per-epoch cost to this PNG file
        #[arg(long)]
        plot: Option<PathBuf>,
    },

    /// Evaluate a saved network
    Test {
        #[command(flatten)]
        data: DataArgs,

        #[arg(short, long)]
        model: PathBuf,

        #[arg(long, value_enum, default_value = "sigmoid")]
        activation: ActivationArg,

        /// Load the binary snapshot format
        #[arg(long)]
        binary: bool,
    },
}

fn load_network(
    path: &Path,
    binary: bool,
    activation: Activation,
    learning_rate: f64,
) -> Result<Network> {
    let network = if binary {
        Network::load_binary(path, activation, Loss::SquaredError, learning_rate)
    } else {
        Network::load(path, activation, Loss::SquaredError, learning_rate)
    };
    network.with_context(|| format!("loading network from {}", path.display()))
}

fn save_network(network: &Network, path: &Path, binary: bool) -> Result<()> {
    let saved = if binary {
        network.save_binary(path)
    } else {
        network.save(path)
    };
    saved.with_context(|| format!("saving network to {}", path.display()))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level: Level = cli.log_level.parse().unwrap_or(Level::INFO);
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Train {
            data,
            config,
            resume,
            hidden,
            learning_rate,
            activation,
            seed,
            epochs,
            output,
            binary,
            history,
            plot,
        } => {
            let examples = data.load()?;
            let input_size = examples.first().map(|e| e.input.len()).unwrap_or(0);

            let mut network = match (resume, config) {
                (Some(path), _) => load_network(&path, binary, activation.into(), learning_rate)?,
                (None, Some(path)) => {
                    let config = NetworkConfig::from_file(&path)
                        .with_context(|| format!("reading config {}", path.display()))?;
                    NetworkBuilder::from_config(&config).build()?
                }
                (None, None) => {
                    let mut builder = NetworkBuilder::new()
                        .with_input_size(input_size)
                        .with_output_size(data.classes)
                        .with_learning_rate(learning_rate)
                        .with_activation(activation.into());
                    for size in hidden {
                        builder = builder.with_hidden_layer(size);
                    }
                    if let Some(seed) = seed {
                        builder = builder.with_seed(seed);
                    }
                    builder.build()?
                }
            };
            info!("{}", network.summary());
            network
                .check_examples(&examples)
                .with_context(|| format!("{} does not fit the network", data.data.display()))?;

            let costs = network.train(&examples, epochs)?;
            let evaluation = network.test(&examples)?;
            info!("Training accuracy: {:.2}%", evaluation.accuracy() * 100.0);

            save_network(&network, &output, binary)?;
            if let Some(path) = history {
                write_cost_history(&costs, &path)?;
            }
            if let Some(path) = plot {
                plot_errors_over_epochs(&costs, &path)
                    .map_err(|e| anyhow::anyhow!("plotting to {}: {}", path.display(), e))?;
            }
        }
        Commands::Test {
            data,
            model,
            activation,
            binary,
        } => {
            let examples = data.load()?;
            let mut network = load_network(&model, binary, activation.into(), 0.02)?;
            network
                .check_examples(&examples)
                .with_context(|| format!("{} does not fit the network", data.data.display()))?;
            let evaluation = network.test(&examples)?;
            info!(
                "Accuracy: {:.2}% ({}/{})",
                evaluation.accuracy() * 100.0,
                evaluation.correct,
                evaluation.total
            );
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> std::result::Result<Cli, clap::Error> {
        let base = ["scalarnet", "train", "-d", "train.csv", "-o", "net.ml"];
        Cli::try_parse_from(base.iter().chain(args))
    }

    #[test]
    fn config_rejects_topology_flags() {
        assert!(parse(&["--config", "net.json"]).is_ok());
        for flag in [
            &["--hidden", "16"][..],
            &["--learning-rate", "0.5"][..],
            &["--activation", "relu"][..],
            &["--seed", "3"][..],
            &["--resume", "old.ml"][..],
        ] {
            let mut args = vec!["--config", "net.json"];
            args.extend_from_slice(flag);
            let err = parse(&args).err().unwrap();
            assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
        }
    }

    #[test]
    fn topology_flags_work_without_config() {
        let cli = parse(&["--hidden", "16", "--hidden", "4", "--seed", "3"]).unwrap();
        match cli.command {
            Commands::Train { hidden, seed, config, .. } => {
                assert_eq!(hidden, vec![16, 4]);
                assert_eq!(seed, Some(3));
                assert!(config.is_none());
            }
            _ => panic!("expected the train subcommand"),
        }
    }
}
