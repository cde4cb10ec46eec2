use std::error::Error;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;

use digitnet::network::{Network, NetworkSpec};
use digitnet::{evaluate, persist, train_epochs};

#[derive(Parser)]
#[command(name = "digitnet", about = "Train and evaluate a digit classifier on CSV datasets")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Train a fresh network on a labeled CSV dataset and save its weights
    Train {
        /// CSV dataset: label followed by pixel fields, one record per line
        #[arg(long, value_name = "PATH", default_value = "mnist_dataset/mnist_train.csv")]
        data: PathBuf,
        /// Full passes over the dataset
        #[arg(long, default_value_t = 5)]
        epochs: usize,
        #[arg(long, default_value_t = 784)]
        inputs: usize,
        #[arg(long, default_value_t = 200)]
        hiddens: usize,
        #[arg(long, default_value_t = 10)]
        outputs: usize,
        #[arg(long, default_value_t = 0.1)]
        rate: f64,
        /// Directory for the weight files and architecture sidecar
        #[arg(long, value_name = "DIR", default_value = "data")]
        model_dir: PathBuf,
    },
    /// Load saved weights and score them against a labeled CSV dataset
    Predict {
        #[arg(long, value_name = "PATH", default_value = "mnist_dataset/mnist_test.csv")]
        data: PathBuf,
        #[arg(long, value_name = "DIR", default_value = "data")]
        model_dir: PathBuf,
    },
}

fn hidden_weights_path(model_dir: &Path) -> PathBuf {
    model_dir.join("hweights.model")
}

fn output_weights_path(model_dir: &Path) -> PathBuf {
    model_dir.join("outputs.model")
}

fn spec_path(model_dir: &Path) -> PathBuf {
    model_dir.join("network.json")
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt().init();

    let cli = Cli::parse();
    let mut rng = StdRng::from_entropy();

    match cli.command {
        Command::Train {
            data,
            epochs,
            inputs,
            hiddens,
            outputs,
            rate,
            model_dir,
        } => {
            let mut net = Network::new(inputs, hiddens, outputs, rate, &mut rng);
            info!(inputs, hiddens, outputs, rate, "network initialized");

            let stats = train_epochs(&mut net, &data, epochs)?;
            let total_ms: u64 = stats.iter().map(|s| s.elapsed_ms).sum();
            println!("Time taken to train: {}.{:03}s", total_ms / 1000, total_ms % 1000);

            std::fs::create_dir_all(&model_dir)?;
            persist::save(&net, &hidden_weights_path(&model_dir), &output_weights_path(&model_dir))?;
            NetworkSpec::of(&net).save_json(spec_path(&model_dir).to_str().ok_or("non-UTF-8 model dir")?)?;
            info!(model_dir = %model_dir.display(), "model saved");
        }
        Command::Predict { data, model_dir } => {
            let spec = NetworkSpec::load_json(spec_path(&model_dir).to_str().ok_or("non-UTF-8 model dir")?)?;
            let mut net = spec.build(&mut rng);
            persist::load(&mut net, &hidden_weights_path(&model_dir), &output_weights_path(&model_dir))?;
            info!(
                inputs = net.input_size,
                hiddens = net.hidden_size,
                outputs = net.output_size,
                "model loaded"
            );

            let eval = evaluate(&net, &data)?;
            println!(
                "Time taken to check: {}.{:03}s",
                eval.elapsed_ms / 1000,
                eval.elapsed_ms % 1000
            );
            println!("Score: {} / {} ({:.2}%)", eval.correct, eval.total, eval.accuracy() * 100.0);
        }
    }

    Ok(())
}
