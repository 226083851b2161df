use core::fmt::{self, Write};

use crate::error::MatrixError;
use crate::traits::{MatrixRef, Scalar};

use super::Matrix;

// ── Row / column exchange ───────────────────────────────────────────

impl<T: Scalar> Matrix<T> {
    /// Swap two rows in place; every alias sees the swap.
    ///
    /// ```
    /// use sharemat::Matrix;
    /// let m = Matrix::from_rows(2, 2, &[1.0, 2.0, 3.0, 4.0]);
    /// m.exchange_rows(0, 1).unwrap();
    /// assert_eq!(m.to_vec(), [3.0, 4.0, 1.0, 2.0]);
    /// ```
    pub fn exchange_rows(&self, row1: usize, row2: usize) -> Result<&Self, MatrixError> {
        check_index("row", row1, self.nrows())?;
        check_index("row", row2, self.nrows())?;
        if row1 != row2 {
            for j in 0..self.ncols() {
                self.at(row1, j).swap(self.at(row2, j));
            }
        }
        Ok(self)
    }

    /// Swap two columns in place; every alias sees the swap.
    pub fn exchange_columns(&self, col1: usize, col2: usize) -> Result<&Self, MatrixError> {
        check_index("column", col1, self.ncols())?;
        check_index("column", col2, self.ncols())?;
        if col1 != col2 {
            for i in 0..self.nrows() {
                self.at(i, col1).swap(self.at(i, col2));
            }
        }
        Ok(self)
    }
}

fn check_index(axis: &'static str, index: usize, len: usize) -> Result<(), MatrixError> {
    if index < len {
        Ok(())
    } else {
        Err(MatrixError::IndexOutOfBounds { axis, index, len })
    }
}

// ── Pivot merge ─────────────────────────────────────────────────────

impl<T: Scalar> Matrix<T> {
    /// Add `other` into this matrix with its `(0, 0)` placed at `(row, col)`.
    ///
    /// Offsets may be negative. Any part of `other` landing outside this
    /// matrix is skipped.
    ///
    /// ```
    /// use sharemat::Matrix;
    /// let m = Matrix::<i32>::new(2, 2);
    /// m.pivot_merge(-1, 1, &Matrix::from_rows(2, 2, &[1, 2, 3, 4]));
    /// assert_eq!(m.to_vec(), [0, 3, 0, 0]);
    /// ```
    pub fn pivot_merge(&self, row: isize, col: isize, other: &impl MatrixRef<T>) -> &Self {
        for i in 0..other.nrows() {
            let r = row.saturating_add(i as isize);
            if r < 0 {
                continue;
            }
            let r = r as usize;
            if r >= self.nrows() {
                break;
            }
            for j in 0..other.ncols() {
                let c = col.saturating_add(j as isize);
                if c < 0 {
                    continue;
                }
                let c = c as usize;
                if c >= self.ncols() {
                    break;
                }
                let cell = self.at(r, c);
                cell.set(cell.get() + other.get(i, j));
            }
        }
        self
    }

    /// [`pivot_merge`](Matrix::pivot_merge) on a deep copy; `self` is untouched.
    pub fn pivot_add(&self, row: isize, col: isize, other: &impl MatrixRef<T>) -> Matrix<T> {
        let out = self.copy();
        out.pivot_merge(row, col, other);
        out
    }
}

// ── Display / dump ──────────────────────────────────────────────────

/// Outcome of [`Matrix::inspect`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dump {
    /// Bytes actually written into the caller's buffer.
    pub written: usize,
    /// Bytes the full dump needs.
    pub required: usize,
}

impl Dump {
    pub fn is_truncated(&self) -> bool {
        self.written < self.required
    }
}

impl<T: Scalar + fmt::Display> Matrix<T> {
    /// Write the brace-delimited dump into `buf`, truncating at its capacity.
    ///
    /// ```
    /// use sharemat::Matrix;
    /// let m = Matrix::from_rows(1, 2, &[1.5_f64, -2.0]);
    /// let mut buf = [0u8; 64];
    /// let dump = m.inspect(&mut buf);
    /// assert_eq!(&buf[..dump.written], b"{\n{1.500000,-2.000000}\n}");
    ///
    /// let mut small = [0u8; 4];
    /// let dump = m.inspect(&mut small);
    /// assert!(dump.is_truncated());
    /// assert_eq!(&small, b"{\n{1");
    /// ```
    pub fn inspect(&self, buf: &mut [u8]) -> Dump {
        let mut w = BoundedWriter {
            buf,
            written: 0,
            required: 0,
        };
        // BoundedWriter never fails.
        let _ = write!(w, "{}", self);
        Dump {
            written: w.written,
            required: w.required,
        }
    }
}

/// `{\n{a,b},\n{c,d}\n}` with six decimals unless the formatter sets a precision.
///
/// ```
/// use sharemat::Matrix;
/// let m = Matrix::from_rows(2, 2, &[1.0, 0.0, 0.0, 2.0]);
/// assert_eq!(format!("{:.1}", m), "{\n{1.0,0.0},\n{0.0,2.0}\n}");
/// ```
impl<T: Scalar + fmt::Display> fmt::Display for Matrix<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prec = f.precision().unwrap_or(6);
        write!(f, "{{")?;
        for i in 0..self.nrows() {
            write!(f, "{}", if i == 0 { "\n{" } else { ",\n{" })?;
            for j in 0..self.ncols() {
                if j > 0 {
                    write!(f, ",")?;
                }
                write!(f, "{:.*}", prec, self.get(i, j))?;
            }
            write!(f, "}}")?;
        }
        write!(f, "\n}}")
    }
}

/// `fmt::Write` into a fixed byte slice that drops what does not fit and
/// keeps counting.
struct BoundedWriter<'a> {
    buf: &'a mut [u8],
    written: usize,
    required: usize,
}

impl fmt::Write for BoundedWriter<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let bytes = s.as_bytes();
        let room = self.buf.len() - self.written;
        let n = room.min(bytes.len());
        self.buf[self.written..self.written + n].copy_from_slice(&bytes[..n]);
        self.written += n;
        self.required += bytes.len();
        Ok(())
    }
}
