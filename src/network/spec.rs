use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::activation::ActivationFunction;
use crate::network::network::Network;

/// A serializable description of a trained network's architecture.
///
/// The weight files are raw binary and carry only matrix dimensions, so the
/// trainer writes this sidecar next to them; `predict` reads it back to
/// reconstruct a network of the right shape without re-specifying flags.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkSpec {
    pub input_size: usize,
    pub hidden_size: usize,
    pub output_size: usize,
    pub learning_rate: f64,
    pub activation: ActivationFunction,
}

impl NetworkSpec {
    pub fn of(network: &Network) -> NetworkSpec {
        NetworkSpec {
            input_size: network.input_size,
            hidden_size: network.hidden_size,
            output_size: network.output_size,
            learning_rate: network.learning_rate,
            activation: network.activation(),
        }
    }

    /// Builds a freshly initialized network with this spec's shape. Weights
    /// are random; callers normally overwrite them via `persist::load`.
    pub fn build<R: Rng>(&self, rng: &mut R) -> Network {
        Network::new(
            self.input_size,
            self.hidden_size,
            self.output_size,
            self.learning_rate,
            rng,
        )
    }

    /// Serializes the spec to a pretty-printed JSON file.
    pub fn save_json(&self, path: &str) -> std::io::Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))
    }

    /// Deserializes a `NetworkSpec` from a JSON file.
    pub fn load_json(path: &str) -> std::io::Result<NetworkSpec> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        serde_json::from_reader(reader)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))
    }
}
