use crate::error::MatrixError;
use crate::traits::Scalar;

use super::Matrix;

impl<T: Scalar> Matrix<T> {
    /// Sum of diagonal elements of a square matrix.
    ///
    /// ```
    /// use sharemat::{Matrix, MatrixError};
    /// let m = Matrix::from_rows(2, 2, &[1.0, 2.0, 3.0, 4.0]);
    /// assert_eq!(m.trace(), Ok(5.0));
    ///
    /// let wide = Matrix::<f64>::new(2, 3);
    /// assert_eq!(wide.trace(), Err(MatrixError::NotSquare { rows: 2, cols: 3 }));
    /// ```
    pub fn trace(&self) -> Result<T, MatrixError> {
        if !self.is_square() {
            return Err(MatrixError::NotSquare {
                rows: self.nrows(),
                cols: self.ncols(),
            });
        }
        Ok(self.trace_unchecked())
    }

    /// Sum of the first `min(nrows, ncols)` diagonal elements, for any shape.
    pub fn trace_unchecked(&self) -> T {
        let n = self.nrows().min(self.ncols());
        let mut sum = T::zero();
        for i in 0..n {
            sum = sum + self.get(i, i);
        }
        sum
    }

    /// Square with every off-diagonal element exactly zero.
    ///
    /// ```
    /// use sharemat::Matrix;
    /// assert!(Matrix::scalar(3, 2.0_f64).is_diagonal());
    /// assert!(!Matrix::from_rows(2, 2, &[1.0, 0.0, 1e-9, 1.0]).is_diagonal());
    /// ```
    pub fn is_diagonal(&self) -> bool {
        if !self.is_square() {
            return false;
        }
        let n = self.nrows();
        for i in 0..n {
            for j in (i + 1)..n {
                if self.get(i, j) != T::zero() || self.get(j, i) != T::zero() {
                    return false;
                }
            }
        }
        true
    }

    /// Square with `m(i, j) == m(j, i)` exactly.
    pub fn is_symmetric(&self) -> bool {
        if !self.is_square() {
            return false;
        }
        let n = self.nrows();
        for i in 0..n {
            for j in (i + 1)..n {
                if self.get(i, j) != self.get(j, i) {
                    return false;
                }
            }
        }
        true
    }

    pub(crate) fn require_square(&self) -> Result<usize, MatrixError> {
        if self.is_square() {
            Ok(self.nrows())
        } else {
            Err(MatrixError::NotSquare {
                rows: self.nrows(),
                cols: self.ncols(),
            })
        }
    }
}
