pub mod epoch_stats;
pub mod trainer;

pub use epoch_stats::EpochStats;
pub use trainer::{argmax, evaluate, train_epochs, Evaluation};
