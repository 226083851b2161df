mod ops;
mod square;
mod util;
mod views;

pub use util::Dump;
pub use views::{PartialMatrix, TransposedMatrix};

use alloc::vec::Vec;
use core::cell::Cell;

use crate::error::MatrixError;
use crate::storage::{Dense, Storage};
use crate::traits::{MatrixMut, MatrixRef, Scalar};

/// Dense matrix handle with shared, reference-counted storage.
///
/// A `Matrix` owns one [`Storage`]: either a dense buffer or a view onto
/// another matrix's buffer. `Clone` is shallow: the clone aliases the same
/// elements, and writes through either handle are visible through both.
/// Call [`copy`](Matrix::copy) for an independent deep copy.
///
/// Elements live in [`Cell`]s, so writing (`set`, `at(..).set`, `clear`,
/// `exchange_rows`, ...) only needs `&self`. Handles are neither `Send` nor
/// `Sync`.
///
/// # Examples
///
/// ```
/// use sharemat::Matrix;
///
/// let a = Matrix::from_rows(2, 2, &[1.0_f64, 2.0, 3.0, 4.0]);
/// assert_eq!(a.get(0, 1), 2.0);
///
/// let alias = a.clone();
/// alias.set(0, 1, 5.0);
/// assert_eq!(a.get(0, 1), 5.0);
///
/// let detached = a.copy();
/// detached.set(0, 1, 0.0);
/// assert_eq!(a.get(0, 1), 5.0);
/// ```
pub struct Matrix<T> {
    storage: Storage<T>,
}

impl<T> Clone for Matrix<T> {
    /// Shallow: the clone aliases the same elements.
    fn clone(&self) -> Self {
        Self {
            storage: self.storage.shallow_copy(),
        }
    }
}

// ── Constructors ────────────────────────────────────────────────────

impl<T: Scalar> Matrix<T> {
    /// Create a zero-filled `nrows x ncols` matrix.
    ///
    /// ```
    /// use sharemat::Matrix;
    /// let m = Matrix::<f64>::new(2, 3);
    /// assert_eq!(m.nrows(), 2);
    /// assert_eq!(m.ncols(), 3);
    /// assert_eq!(m.get(1, 2), 0.0);
    /// ```
    pub fn new(nrows: usize, ncols: usize) -> Self {
        Self::from_storage(Storage::Dense(Dense::zeros(nrows, ncols)))
    }

    /// Create a matrix from a flat slice in row-major order.
    ///
    /// Panics if `row_major.len() != nrows * ncols`.
    ///
    /// ```
    /// use sharemat::Matrix;
    /// let m = Matrix::from_rows(2, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    /// assert_eq!(m.get(0, 2), 3.0);
    /// assert_eq!(m.get(1, 0), 4.0);
    /// ```
    pub fn from_rows(nrows: usize, ncols: usize, row_major: &[T]) -> Self {
        assert_eq!(
            row_major.len(),
            nrows * ncols,
            "slice length {} does not match {}x{} matrix",
            row_major.len(),
            nrows,
            ncols,
        );
        Self::from_storage(Storage::Dense(Dense::from_row_major(nrows, ncols, row_major)))
    }

    /// Fallible [`from_rows`](Matrix::from_rows).
    pub fn try_from_rows(nrows: usize, ncols: usize, row_major: &[T]) -> Result<Self, MatrixError> {
        if row_major.len() != nrows * ncols {
            return Err(MatrixError::DimensionMismatch {
                op: "from",
                lhs: (nrows, ncols),
                rhs: (1, row_major.len()),
            });
        }
        Ok(Self::from_storage(Storage::Dense(Dense::from_row_major(
            nrows, ncols, row_major,
        ))))
    }

    /// Create a matrix by calling `f(row, col)` for each element.
    ///
    /// ```
    /// use sharemat::Matrix;
    /// let m = Matrix::from_fn(2, 2, |i, j| (i * 2 + j) as i32);
    /// assert_eq!(m.get(1, 0), 2);
    /// ```
    pub fn from_fn(nrows: usize, ncols: usize, f: impl Fn(usize, usize) -> T) -> Self {
        let mut data = Vec::with_capacity(nrows * ncols);
        for i in 0..nrows {
            for j in 0..ncols {
                data.push(f(i, j));
            }
        }
        Self::from_storage(Storage::Dense(Dense::from_row_major(nrows, ncols, &data)))
    }

    /// Zero-filled matrix on an alignment-padded buffer.
    ///
    /// The row stride is rounded up to an even count unless the matrix is a
    /// vector. Logical behaviour is identical to [`Matrix::new`].
    pub fn aligned(nrows: usize, ncols: usize) -> Self {
        Self::from_storage(Storage::Dense(Dense::aligned(nrows, ncols)))
    }

    /// Row-major slice copied onto an alignment-padded buffer.
    ///
    /// Panics if `row_major.len() != nrows * ncols`.
    pub fn from_rows_aligned(nrows: usize, ncols: usize, row_major: &[T]) -> Self {
        assert_eq!(
            row_major.len(),
            nrows * ncols,
            "slice length {} does not match {}x{} matrix",
            row_major.len(),
            nrows,
            ncols,
        );
        Self::from_storage(Storage::Dense(Dense::aligned_from_row_major(
            nrows, ncols, row_major,
        )))
    }

    /// `size x size` matrix with `value` on the diagonal.
    ///
    /// ```
    /// use sharemat::Matrix;
    /// let s = Matrix::scalar(2, 3.0_f64);
    /// assert_eq!(s.get(1, 1), 3.0);
    /// assert_eq!(s.get(0, 1), 0.0);
    /// ```
    pub fn scalar(size: usize, value: T) -> Self {
        let m = Self::new(size, size);
        for i in 0..size {
            m.set(i, i, value);
        }
        m
    }

    /// `size x size` identity matrix.
    pub fn eye(size: usize) -> Self {
        Self::scalar(size, T::one())
    }
}

impl<T> Matrix<T> {
    /// Wrap an existing storage without copying it.
    #[inline]
    pub fn from_storage(storage: Storage<T>) -> Self {
        Self { storage }
    }

    #[inline]
    pub fn storage(&self) -> &Storage<T> {
        &self.storage
    }

    #[inline]
    pub fn into_storage(self) -> Storage<T> {
        self.storage
    }

    /// Number of rows.
    #[inline]
    pub fn nrows(&self) -> usize {
        self.storage.nrows()
    }

    /// Number of columns.
    #[inline]
    pub fn ncols(&self) -> usize {
        self.storage.ncols()
    }

    /// Whether the matrix is square.
    #[inline]
    pub fn is_square(&self) -> bool {
        self.nrows() == self.ncols()
    }

    /// Whether `other` has a different shape.
    #[inline]
    pub fn is_different_size<U: Copy>(&self, other: &impl MatrixRef<U>) -> bool {
        self.nrows() != other.nrows() || self.ncols() != other.ncols()
    }

    /// Whether this handle reads through a view rather than its own dense storage.
    #[inline]
    pub fn is_view(&self) -> bool {
        self.storage.is_view()
    }

    /// Whether both handles end up in the same buffer.
    #[inline]
    pub fn shares_buffer_with(&self, other: &Matrix<T>) -> bool {
        self.storage.root().buffer().ptr_eq(other.storage.root().buffer())
    }

    /// Cell holding element `(row, col)`, 0-based.
    ///
    /// Panics if the index is out of range.
    #[inline]
    pub fn at(&self, row: usize, col: usize) -> &Cell<T> {
        assert!(
            row < self.nrows() && col < self.ncols(),
            "index ({},{}) out of bounds for {}x{} matrix",
            row,
            col,
            self.nrows(),
            self.ncols(),
        );
        self.storage.at(row, col)
    }

    /// Cell holding element `(row, col)`, 1-based.
    ///
    /// ```
    /// use sharemat::Matrix;
    /// let m = Matrix::from_rows(2, 2, &[1, 2, 3, 4]);
    /// assert_eq!(m.matlab(2, 1).get(), 3);
    /// ```
    #[inline]
    pub fn matlab(&self, row: usize, col: usize) -> &Cell<T> {
        assert!(row >= 1 && col >= 1, "matlab indices start at 1");
        self.at(row - 1, col - 1)
    }

    /// Re-point this handle at `other`'s storage.
    ///
    /// Afterwards both handles alias the same elements; nothing is copied.
    /// Contrast with [`TransposedMatrix::assign_from`] /
    /// [`PartialMatrix::assign_from`], which copy values into a view's region.
    pub fn rebind(&mut self, other: &Matrix<T>) {
        self.storage = other.storage.shallow_copy();
    }
}

impl<T: Scalar> Matrix<T> {
    /// Element `(row, col)`.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> T {
        self.at(row, col).get()
    }

    /// Write element `(row, col)`; visible through every alias.
    #[inline]
    pub fn set(&self, row: usize, col: usize, value: T) {
        self.at(row, col).set(value);
    }

    /// Independent deep copy on a fresh buffer.
    ///
    /// A dense matrix keeps its layout, padding included. Views collapse
    /// into compact dense storage.
    pub fn copy(&self) -> Self {
        Self::from_storage(self.storage.deep_copy())
    }

    /// Zero every element (a view only clears its window).
    pub fn clear(&self) -> &Self {
        self.storage.clear();
        self
    }

    /// Row-major list of all elements.
    pub fn to_vec(&self) -> Vec<T> {
        let mut out = Vec::with_capacity(self.nrows() * self.ncols());
        for i in 0..self.nrows() {
            for j in 0..self.ncols() {
                out.push(self.storage.get(i, j));
            }
        }
        out
    }
}

impl<T: Scalar> Default for Matrix<T> {
    /// Empty `0 x 0` matrix; it has no addressable element.
    fn default() -> Self {
        Self::new(0, 0)
    }
}

// ── MatrixRef / MatrixMut ───────────────────────────────────────────

impl<T: Scalar> MatrixRef<T> for Matrix<T> {
    #[inline]
    fn nrows(&self) -> usize {
        self.storage.nrows()
    }

    #[inline]
    fn ncols(&self) -> usize {
        self.storage.ncols()
    }

    #[inline]
    fn get(&self, row: usize, col: usize) -> T {
        Matrix::get(self, row, col)
    }
}

impl<T: Scalar> MatrixMut<T> for Matrix<T> {
    #[inline]
    fn cell(&self, row: usize, col: usize) -> &Cell<T> {
        self.at(row, col)
    }
}

// ── Comparison / Debug ──────────────────────────────────────────────

impl<T: Scalar> PartialEq for Matrix<T> {
    /// Element-wise equality; storage layout and aliasing are ignored.
    fn eq(&self, other: &Self) -> bool {
        if self.is_different_size(other) {
            return false;
        }
        (0..self.nrows())
            .all(|i| (0..self.ncols()).all(|j| self.storage.get(i, j) == other.storage.get(i, j)))
    }
}

impl<T: Scalar> core::fmt::Debug for Matrix<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Matrix")
            .field("nrows", &self.nrows())
            .field("ncols", &self.ncols())
            .field("view", &self.is_view())
            .field("data", &self.to_vec())
            .finish()
    }
}
