use rand::distributions::{Distribution, Uniform};
use rand::Rng;

use crate::math::matrix::Matrix;

/// Fan-in scaled uniform initialization: every cell is drawn i.i.d. from
/// `U(-1/sqrt(fan_in), 1/sqrt(fan_in))`.
///
/// `fan_in` is the number of connections feeding the layer being initialized,
/// which keeps initial pre-activation magnitudes bounded regardless of layer
/// width. The RNG is injected so callers control seeding: the binary seeds
/// from entropy, tests seed deterministically.
pub fn fan_in_uniform<R: Rng>(rows: usize, cols: usize, fan_in: usize, rng: &mut R) -> Matrix {
    let bound = 1.0 / (fan_in as f64).sqrt();
    let dist = Uniform::new_inclusive(-bound, bound);

    let mut res = Matrix::zeros(rows, cols);
    for i in 0..rows {
        for j in 0..cols {
            res.data[i][j] = dist.sample(rng);
        }
    }
    res
}
