use rand::Rng;

use crate::activation::ActivationFunction;
use crate::math::{fan_in_uniform, Matrix};

/// A three-layer feedforward network: input → hidden → output, sigmoid
/// activations, trained one sample at a time by gradient descent.
///
/// The two weight matrices are the only mutable state; each training step
/// replaces both wholesale rather than editing cells.
pub struct Network {
    pub input_size: usize,
    pub hidden_size: usize,
    pub output_size: usize,
    pub hidden_weights: Matrix,
    pub output_weights: Matrix,
    pub learning_rate: f64,
    activation: ActivationFunction,
}

impl Network {
    /// Builds a network with fan-in scaled random weights: the hidden layer
    /// is fed by `input_size` connections, the output layer by
    /// `hidden_size`.
    pub fn new<R: Rng>(
        input_size: usize,
        hidden_size: usize,
        output_size: usize,
        learning_rate: f64,
        rng: &mut R,
    ) -> Network {
        let hidden_weights = fan_in_uniform(hidden_size, input_size, input_size, rng);
        let output_weights = fan_in_uniform(output_size, hidden_size, hidden_size, rng);

        Network {
            input_size,
            hidden_size,
            output_size,
            hidden_weights,
            output_weights,
            learning_rate,
            activation: ActivationFunction::Sigmoid,
        }
    }

    pub fn activation(&self) -> ActivationFunction {
        self.activation
    }

    /// Forward pass: treats `input` as an `input_size × 1` column and returns
    /// the `output_size × 1` activation column. Pure; no state is touched.
    pub fn predict(&self, input: &[f64]) -> Matrix {
        let input = Matrix::column(input);
        let hidden = self.activate(self.hidden_weights.clone() * input);
        self.activate(self.output_weights.clone() * hidden)
    }

    /// One online gradient-descent step on a single (input, target) pair.
    ///
    /// The full forward pass is recomputed, the output error is propagated
    /// back through the output weights, and both weight matrices are replaced
    /// with their updated values as a unit.
    ///
    /// Note: the hidden error is the raw `Wo^T · (target - output)` without
    /// the output layer's activation derivative. This simplified rule is
    /// intentional; convergence tests assert it, not the exact MSE gradient.
    pub fn train(&mut self, input: &[f64], target: &[f64]) {
        let input = Matrix::column(input);
        let hidden = self.activate(self.hidden_weights.clone() * input.clone());
        let output = self.activate(self.output_weights.clone() * hidden.clone());

        let output_err = Matrix::column(target) - output.clone();
        let hidden_err = self.output_weights.transpose() * output_err.clone();

        let output_grad =
            output_err.hadamard(&self.sigmoid_prime(&output)) * hidden.transpose();
        let hidden_grad =
            hidden_err.hadamard(&self.sigmoid_prime(&hidden)) * input.transpose();

        self.output_weights =
            self.output_weights.clone() + output_grad.scale(self.learning_rate);
        self.hidden_weights =
            self.hidden_weights.clone() + hidden_grad.scale(self.learning_rate);
    }

    fn activate(&self, pre: Matrix) -> Matrix {
        let act = self.activation;
        pre.apply(|_, _, z| act.function(z))
    }

    /// Activation derivative over a matrix of already-activated values.
    fn sigmoid_prime(&self, activated: &Matrix) -> Matrix {
        let act = self.activation;
        activated.map(|a| act.derivative_from_output(a))
    }
}
