use std::ops::{Add, Mul, Sub};

/// A dense 2-D array of f64 values.
///
/// All operations allocate and return a new matrix; nothing mutates its
/// inputs. Shape mismatches are caller errors and panic.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    pub rows: usize,
    pub cols: usize,
    pub data: Vec<Vec<f64>>,
}

impl Matrix {
    pub fn zeros(rows: usize, cols: usize) -> Matrix {
        Matrix {
            rows,
            cols,
            data: vec![vec![0.0; cols]; rows],
        }
    }

    pub fn from_data(data: Vec<Vec<f64>>) -> Matrix {
        Matrix {
            rows: data.len(),
            cols: data[0].len(),
            data,
        }
    }

    /// Builds a matrix of the given shape from a row-major flat slice.
    pub fn from_row_major(rows: usize, cols: usize, values: &[f64]) -> Matrix {
        assert_eq!(
            values.len(),
            rows * cols,
            "expected {} values for a {}x{} matrix, got {}",
            rows * cols,
            rows,
            cols,
            values.len()
        );
        let data = values.chunks(cols).map(|row| row.to_vec()).collect();
        Matrix { rows, cols, data }
    }

    /// Interprets a slice as an n×1 column matrix.
    pub fn column(values: &[f64]) -> Matrix {
        Matrix {
            rows: values.len(),
            cols: 1,
            data: values.iter().map(|&v| vec![v]).collect(),
        }
    }

    /// Flattens the matrix into a row-major vector.
    pub fn to_row_major(&self) -> Vec<f64> {
        self.data.iter().flatten().copied().collect()
    }

    pub fn transpose(&self) -> Matrix {
        let mut res = Matrix::zeros(self.cols, self.rows);

        for i in 0..res.rows {
            for j in 0..res.cols {
                res.data[i][j] = self.data[j][i];
            }
        }

        res
    }

    /// Returns a same-shape matrix with `f(row, col, value)` substituted at
    /// every cell. The indices are provided for callers that need them;
    /// elementwise activations ignore them.
    pub fn apply<F>(&self, f: F) -> Matrix
    where
        F: Fn(usize, usize, f64) -> f64,
    {
        let mut res = Matrix::zeros(self.rows, self.cols);

        for i in 0..self.rows {
            for j in 0..self.cols {
                res.data[i][j] = f(i, j, self.data[i][j]);
            }
        }

        res
    }

    /// Shorthand for `apply` when the cell position is irrelevant.
    pub fn map<F>(&self, f: F) -> Matrix
    where
        F: Fn(f64) -> f64,
    {
        self.apply(|_, _, v| f(v))
    }

    /// Multiplies every cell by the scalar `s`.
    pub fn scale(&self, s: f64) -> Matrix {
        self.map(|v| v * s)
    }

    /// Adds the scalar `s` to every cell, by adding a same-shape matrix
    /// filled with `s`.
    pub fn add_scalar(&self, s: f64) -> Matrix {
        let filled = Matrix::zeros(self.rows, self.cols).map(|_| s);
        self.clone() + filled
    }

    /// Elementwise (Hadamard) product of two same-shape matrices.
    pub fn hadamard(&self, rhs: &Matrix) -> Matrix {
        assert_shape_eq(self, rhs, "hadamard");

        let data = self
            .data
            .iter()
            .zip(rhs.data.iter())
            .map(|(a, b)| a.iter().zip(b.iter()).map(|(x, y)| x * y).collect())
            .collect();
        Matrix::from_data(data)
    }
}

fn assert_shape_eq(a: &Matrix, b: &Matrix, op: &str) {
    assert!(
        a.rows == b.rows && a.cols == b.cols,
        "{} requires equal shapes, got {}x{} and {}x{}",
        op,
        a.rows,
        a.cols,
        b.rows,
        b.cols
    );
}

impl Add for Matrix {
    type Output = Matrix;

    fn add(self, rhs: Self) -> Self::Output {
        assert_shape_eq(&self, &rhs, "add");

        let mut res = Matrix::zeros(self.rows, self.cols);

        for i in 0..self.rows {
            for j in 0..self.cols {
                res.data[i][j] = self.data[i][j] + rhs.data[i][j];
            }
        }

        res
    }
}

impl Sub for Matrix {
    type Output = Matrix;

    fn sub(self, rhs: Self) -> Self::Output {
        assert_shape_eq(&self, &rhs, "subtract");

        let mut res = Matrix::zeros(self.rows, self.cols);

        for i in 0..self.rows {
            for j in 0..self.cols {
                res.data[i][j] = self.data[i][j] - rhs.data[i][j];
            }
        }

        res
    }
}

impl Mul for Matrix {
    type Output = Matrix;

    /// Standard matrix product; requires `self.cols == rhs.rows`.
    fn mul(self, rhs: Self) -> Self::Output {
        assert_eq!(
            self.cols, rhs.rows,
            "product requires {}x{} . {}x{} inner dimensions to match",
            self.rows, self.cols, rhs.rows, rhs.cols
        );

        let mut res = Matrix::zeros(self.rows, rhs.cols);

        for i in 0..res.rows {
            for j in 0..res.cols {
                let mut sum = 0.0;

                for k in 0..self.cols {
                    sum += self.data[i][k] * rhs.data[k][j];
                }

                res.data[i][j] = sum;
            }
        }

        res
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn product_known_values() {
        let a = Matrix::from_row_major(2, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let b = Matrix::from_row_major(3, 2, &[7.0, 8.0, 9.0, 10.0, 11.0, 12.0]);

        let c = a * b;

        assert_eq!(c.rows, 2);
        assert_eq!(c.cols, 2);
        assert_eq!(c.to_row_major(), vec![58.0, 64.0, 139.0, 154.0]);
    }

    #[test]
    #[should_panic]
    fn product_shape_mismatch_panics() {
        let a = Matrix::zeros(2, 3);
        let b = Matrix::zeros(2, 3);
        let _ = a * b;
    }

    #[test]
    fn apply_passes_cell_position() {
        let a = Matrix::zeros(2, 3);
        let indexed = a.apply(|i, j, _| (i * 10 + j) as f64);
        assert_eq!(indexed.data[1][2], 12.0);
        assert_eq!(indexed.data[0][0], 0.0);
    }

    #[test]
    fn elementwise_ops() {
        let a = Matrix::from_row_major(2, 2, &[1.0, 2.0, 3.0, 4.0]);
        let b = Matrix::from_row_major(2, 2, &[5.0, 6.0, 7.0, 8.0]);

        assert_eq!((a.clone() + b.clone()).to_row_major(), vec![6.0, 8.0, 10.0, 12.0]);
        assert_eq!((b.clone() - a.clone()).to_row_major(), vec![4.0, 4.0, 4.0, 4.0]);
        assert_eq!(a.hadamard(&b).to_row_major(), vec![5.0, 12.0, 21.0, 32.0]);
        assert_eq!(a.scale(2.0).to_row_major(), vec![2.0, 4.0, 6.0, 8.0]);
        assert_eq!(a.add_scalar(0.5).to_row_major(), vec![1.5, 2.5, 3.5, 4.5]);
    }

    #[test]
    #[should_panic]
    fn add_shape_mismatch_panics() {
        let _ = Matrix::zeros(2, 2) + Matrix::zeros(3, 2);
    }

    #[test]
    fn transpose_column() {
        let c = Matrix::column(&[1.0, 2.0, 3.0]);
        assert_eq!(c.rows, 3);
        assert_eq!(c.cols, 1);

        let t = c.transpose();
        assert_eq!(t.rows, 1);
        assert_eq!(t.cols, 3);
        assert_eq!(t.data[0], vec![1.0, 2.0, 3.0]);
    }
}
