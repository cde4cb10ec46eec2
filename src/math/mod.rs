pub mod init;
pub mod matrix;

pub use init::fan_in_uniform;
pub use matrix::Matrix;
