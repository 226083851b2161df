use crate::error::MatrixError;
use crate::traits::Scalar;
use crate::Matrix;

impl<T: Scalar> Matrix<T> {
    /// Minor with row `row` and column `col` removed.
    ///
    /// ```
    /// use sharemat::Matrix;
    /// let m = Matrix::from_rows(3, 3, &[1, 2, 3, 4, 5, 6, 7, 8, 9]);
    /// let c = m.co_matrix(1, 0).unwrap();
    /// assert_eq!(c.to_vec(), [2, 3, 8, 9]);
    /// ```
    pub fn co_matrix(&self, row: usize, col: usize) -> Result<Matrix<T>, MatrixError> {
        if row >= self.nrows() {
            return Err(MatrixError::IndexOutOfBounds {
                axis: "row",
                index: row,
                len: self.nrows(),
            });
        }
        if col >= self.ncols() {
            return Err(MatrixError::IndexOutOfBounds {
                axis: "column",
                index: col,
                len: self.ncols(),
            });
        }
        Ok(self.minor(row, col))
    }

    /// Determinant by cofactor expansion along the first column.
    ///
    /// O(n!): meant for small matrices. A `0 x 0` matrix has determinant one.
    ///
    /// ```
    /// use sharemat::Matrix;
    /// let m = Matrix::from_rows(2, 2, &[3.0, 8.0, 4.0, 6.0]);
    /// assert_eq!(m.determinant(), Ok(-14.0));
    /// ```
    pub fn determinant(&self) -> Result<T, MatrixError> {
        self.require_square()?;
        Ok(expand(self))
    }

    fn minor(&self, row: usize, col: usize) -> Matrix<T> {
        Matrix::from_fn(self.nrows() - 1, self.ncols() - 1, |i, j| {
            let r = if i < row { i } else { i + 1 };
            let c = if j < col { j } else { j + 1 };
            self.get(r, c)
        })
    }
}

fn expand<T: Scalar>(m: &Matrix<T>) -> T {
    match m.nrows() {
        0 => T::one(),
        1 => m.get(0, 0),
        n => {
            let mut sum = T::zero();
            for i in 0..n {
                let a = m.get(i, 0);
                if a == T::zero() {
                    continue;
                }
                let term = a * expand(&m.minor(i, 0));
                sum = if i % 2 == 0 { sum + term } else { sum - term };
            }
            sum
        }
    }
}
