use alloc::vec::Vec;

use crate::error::MatrixError;
use crate::traits::{max_modulus, LinalgScalar};
use crate::Matrix;

impl<T: LinalgScalar> Matrix<T> {
    /// Inverse by Gauss-Jordan elimination on `[A | I]`.
    ///
    /// A zero pivot is replaced by the first row below it with a non-zero
    /// entry in the pivot column; the exchange is applied to both halves.
    /// Fails with `NotSquare`, or `Singular` when no such row exists. Float
    /// pivots within round-off of their input row's largest entry count as
    /// zero (see [`LinalgScalar::negligible`]).
    ///
    /// ```
    /// use sharemat::Matrix;
    /// let a = Matrix::from_rows(2, 2, &[0.0_f64, 2.0, 4.0, 0.0]);
    /// let inv = a.inverse().unwrap();
    /// assert_eq!(inv.to_vec(), [0.0, 0.25, 0.5, 0.0]);
    /// ```
    pub fn inverse(&self) -> Result<Matrix<T>, MatrixError> {
        let n = self.require_square()?;
        tracing::debug!(n, "Gauss-Jordan inversion");

        let left = self.copy();
        let right = Matrix::eye(n);
        let mut scales: Vec<T::Real> = (0..n)
            .map(|i| max_modulus((0..n).map(|j| self.get(i, j))))
            .collect();
        let usable = |row: usize, col: usize, scales: &[T::Real]| {
            !T::negligible(left.get(row, col).modulus(), scales[row], n)
        };
        for i in 0..n {
            if !usable(i, i, &scales) {
                match ((i + 1)..n).find(|&j| usable(j, i, &scales)) {
                    Some(j) => {
                        tracing::debug!(row = i, with = j, "pivot row exchange");
                        left.exchange_rows(i, j)?;
                        right.exchange_rows(i, j)?;
                        scales.swap(i, j);
                    }
                    None => {
                        tracing::debug!(column = i, "no non-zero pivot");
                        return Err(MatrixError::Singular);
                    }
                }
            }

            let pivot = left.get(i, i);
            if pivot != T::one() {
                for j in 0..n {
                    right.set(i, j, right.get(i, j) / pivot);
                }
                for j in (i + 1)..n {
                    left.set(i, j, left.get(i, j) / pivot);
                }
                left.set(i, i, T::one());
            }

            for k in 0..n {
                if k == i {
                    continue;
                }
                let factor = left.get(k, i);
                if factor == T::zero() {
                    continue;
                }
                for j in 0..n {
                    right.set(k, j, right.get(k, j) - right.get(i, j) * factor);
                }
                for j in (i + 1)..n {
                    left.set(k, j, left.get(k, j) - left.get(i, j) * factor);
                }
                left.set(k, i, T::zero());
            }
        }
        Ok(right)
    }
}
