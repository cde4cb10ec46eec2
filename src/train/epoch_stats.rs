/// Per-epoch statistics produced by `train_epochs`.
#[derive(Debug, Clone)]
pub struct EpochStats {
    /// 1-based epoch number.
    pub epoch: usize,
    /// Total epochs requested for this run.
    pub total_epochs: usize,
    /// Samples trained on during this epoch.
    pub samples: usize,
    /// Wall-clock duration of this single epoch in milliseconds.
    pub elapsed_ms: u64,
}
