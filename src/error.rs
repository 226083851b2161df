/// Errors reported by matrix construction, views and algorithms.
///
/// Fallible methods return it directly; the arithmetic operators panic with
/// its `Display` text instead, since `Add`/`Mul`/... cannot return a `Result`.
///
/// ```
/// use sharemat::{Matrix, MatrixError};
///
/// let singular = Matrix::from_rows(2, 2, &[1.0_f64, 2.0, 2.0, 4.0]);
/// assert_eq!(singular.inverse().unwrap_err(), MatrixError::Singular);
///
/// let rect = Matrix::<f64>::new(2, 3);
/// assert_eq!(rect.determinant().unwrap_err(), MatrixError::NotSquare { rows: 2, cols: 3 });
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatrixError {
    /// Operand shapes are incompatible for `op`.
    DimensionMismatch {
        op: &'static str,
        lhs: (usize, usize),
        rhs: (usize, usize),
    },
    /// The operation requires a square matrix.
    NotSquare { rows: usize, cols: usize },
    /// The operation requires a symmetric matrix.
    NotSymmetric,
    /// No usable (non-zero) pivot exists.
    Singular,
    /// A window or index falls outside the matrix.
    OutOfBounds {
        /// `(row, col)` of the first element requested.
        start: (usize, usize),
        /// `(rows, cols)` of the requested window.
        size: (usize, usize),
        /// `(rows, cols)` of the matrix being addressed.
        bounds: (usize, usize),
    },
    /// A row or column index is past the end of its axis.
    IndexOutOfBounds {
        axis: &'static str,
        index: usize,
        len: usize,
    },
}

impl core::fmt::Display for MatrixError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            MatrixError::DimensionMismatch { op, lhs, rhs } => write!(
                f,
                "dimension mismatch: {}x{} {} {}x{}",
                lhs.0, lhs.1, op, rhs.0, rhs.1
            ),
            MatrixError::NotSquare { rows, cols } => {
                write!(f, "matrix is not square ({}x{})", rows, cols)
            }
            MatrixError::NotSymmetric => write!(f, "matrix is not symmetric"),
            MatrixError::Singular => write!(f, "matrix is singular"),
            MatrixError::OutOfBounds { start, size, bounds } => write!(
                f,
                "window ({},{}) size {}x{} out of bounds for {}x{} matrix",
                start.0, start.1, size.0, size.1, bounds.0, bounds.1
            ),
            MatrixError::IndexOutOfBounds { axis, index, len } => {
                write!(f, "{} index {} out of bounds for length {}", axis, index, len)
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for MatrixError {}
