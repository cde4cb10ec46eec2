use std::path::Path;
use std::time::Instant;

use tracing::{debug, info};

use crate::dataset::{DatasetError, SampleReader};
use crate::math::Matrix;
use crate::network::Network;
use crate::train::epoch_stats::EpochStats;

/// Result of an inference-only pass over a labeled dataset.
#[derive(Debug, Clone)]
pub struct Evaluation {
    pub correct: usize,
    pub total: usize,
    pub elapsed_ms: u64,
}

impl Evaluation {
    pub fn accuracy(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.correct as f64 / self.total as f64
    }
}

/// Drives `epochs` full passes over the dataset, feeding every record into
/// `Network::train`. The file is re-opened and streamed each epoch.
///
/// Dataset errors (unreadable file, malformed record) abort the run and
/// propagate to the caller; nothing is retried or skipped.
pub fn train_epochs(
    network: &mut Network,
    dataset_path: &Path,
    epochs: usize,
) -> Result<Vec<EpochStats>, DatasetError> {
    let mut stats = Vec::with_capacity(epochs);

    for epoch in 1..=epochs {
        let start = Instant::now();
        let mut samples = 0usize;

        let reader = SampleReader::open(dataset_path, network.input_size, network.output_size)?;
        for sample in reader {
            let sample = sample?;
            network.train(&sample.input, &sample.target);
            samples += 1;

            if samples % 10_000 == 0 {
                debug!(epoch, samples, "epoch in progress");
            }
        }

        let epoch_stats = EpochStats {
            epoch,
            total_epochs: epochs,
            samples,
            elapsed_ms: start.elapsed().as_millis() as u64,
        };
        info!(
            epoch,
            total_epochs = epochs,
            samples,
            elapsed_ms = epoch_stats.elapsed_ms,
            "epoch complete"
        );
        stats.push(epoch_stats);
    }

    Ok(stats)
}

/// Runs an inference-only pass over a labeled dataset and tallies how many
/// records the network classifies correctly (argmax of the output column
/// against the record's label).
pub fn evaluate(network: &Network, dataset_path: &Path) -> Result<Evaluation, DatasetError> {
    let start = Instant::now();
    let mut correct = 0usize;
    let mut total = 0usize;

    let reader = SampleReader::open(dataset_path, network.input_size, network.output_size)?;
    for sample in reader {
        let sample = sample?;
        let output = network.predict(&sample.input);
        if argmax(&output) == sample.label {
            correct += 1;
        }
        total += 1;
    }

    Ok(Evaluation {
        correct,
        total,
        elapsed_ms: start.elapsed().as_millis() as u64,
    })
}

/// Row index of the largest value in a column matrix.
pub fn argmax(output: &Matrix) -> usize {
    let mut best = 0;
    let mut highest = f64::MIN;
    for (i, row) in output.data.iter().enumerate() {
        if row[0] > highest {
            best = i;
            highest = row[0];
        }
    }
    best
}
