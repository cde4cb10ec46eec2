pub mod activation;
pub mod dataset;
pub mod math;
pub mod network;
pub mod persist;
pub mod train;

// Convenience re-exports
pub use activation::ActivationFunction;
pub use dataset::{DatasetError, Sample, SampleReader};
pub use math::Matrix;
pub use network::{Network, NetworkSpec};
pub use persist::PersistError;
pub use train::{evaluate, train_epochs, Evaluation};
