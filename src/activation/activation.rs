use serde::{Deserialize, Serialize};

/// The network's elementwise nonlinearity.
///
/// Only the logistic sigmoid is supported; the enum form keeps the
/// forward/backward algorithm independent of the concrete choice should
/// another activation ever be added.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActivationFunction {
    Sigmoid,
}

impl ActivationFunction {
    pub fn function(&self, z: f64) -> f64 {
        match self {
            ActivationFunction::Sigmoid => 1.0 / (1.0 + (-z).exp()),
        }
    }

    /// Derivative expressed in terms of the already-computed activation `a`.
    /// For the sigmoid this is the usual shortcut `a * (1 - a)`.
    pub fn derivative_from_output(&self, a: f64) -> f64 {
        match self {
            ActivationFunction::Sigmoid => a * (1.0 - a),
        }
    }
}
