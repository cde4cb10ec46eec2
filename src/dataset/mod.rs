pub mod csv;

pub use csv::{DatasetError, Sample, SampleReader};
