use core::cell::Cell;
use core::ops::Deref;

use crate::error::MatrixError;
use crate::storage::Storage;
use crate::traits::{MatrixMut, MatrixRef, Scalar};

use super::Matrix;

/// Transposed view of another matrix.
///
/// Shares the parent's buffer: writes through the view land in the parent
/// and vice versa. Derefs to [`Matrix`], so every read-side method and the
/// arithmetic operators work on it directly. Call
/// [`copy`](Matrix::copy) to detach.
///
/// ```
/// use sharemat::Matrix;
///
/// let m = Matrix::from_rows(2, 3, &[1, 2, 3, 4, 5, 6]);
/// let t = m.transpose();
/// assert_eq!((t.nrows(), t.ncols()), (3, 2));
/// assert_eq!(t.get(2, 0), 3);
/// t.set(2, 0, 30);
/// assert_eq!(m.get(0, 2), 30);
/// ```
pub struct TransposedMatrix<T> {
    inner: Matrix<T>,
}

/// Sub-block view of another matrix.
///
/// Shares the parent's buffer like [`TransposedMatrix`].
///
/// ```
/// use sharemat::Matrix;
///
/// let m = Matrix::<f64>::new(3, 3);
/// let block = m.partial(2, 2, 1, 1).unwrap();
/// block.set(0, 0, 4.0);
/// assert_eq!(m.get(1, 1), 4.0);
/// ```
pub struct PartialMatrix<T> {
    inner: Matrix<T>,
}

/// Copy `min(rows) x min(cols)` elements of `src` into `dst`.
fn substitute<T: Scalar>(dst: &Matrix<T>, src: &impl MatrixRef<T>) {
    let rows = dst.nrows().min(src.nrows());
    let cols = dst.ncols().min(src.ncols());
    for i in 0..rows {
        for j in 0..cols {
            dst.set(i, j, src.get(i, j));
        }
    }
}

fn original_of<T>(inner: &Matrix<T>) -> Matrix<T> {
    match inner.storage().parent() {
        Some(parent) => Matrix::from_storage(parent.shallow_copy()),
        // View facades are only built around view storage.
        None => inner.clone(),
    }
}

// ── Constructors on Matrix ──────────────────────────────────────────

impl<T> Matrix<T> {
    /// Transposed view aliasing this matrix's elements.
    ///
    /// For a detached transpose use `m.transpose().copy()`.
    pub fn transpose(&self) -> TransposedMatrix<T> {
        TransposedMatrix {
            inner: Matrix::from_storage(Storage::transposed(self.storage().shallow_copy())),
        }
    }

    /// `nrows x ncols` view whose `(0, 0)` is this matrix's `(row_offset, col_offset)`.
    ///
    /// Fails if the window does not fit inside the matrix.
    pub fn partial(
        &self,
        nrows: usize,
        ncols: usize,
        row_offset: usize,
        col_offset: usize,
    ) -> Result<PartialMatrix<T>, MatrixError> {
        let storage = Storage::partial(
            self.storage().shallow_copy(),
            nrows,
            ncols,
            row_offset,
            col_offset,
        )?;
        Ok(PartialMatrix {
            inner: Matrix::from_storage(storage),
        })
    }

    /// `1 x ncols` view of row `row`.
    pub fn row_vector(&self, row: usize) -> Result<PartialMatrix<T>, MatrixError> {
        self.partial(1, self.ncols(), row, 0)
    }

    /// `nrows x 1` view of column `col`.
    pub fn column_vector(&self, col: usize) -> Result<PartialMatrix<T>, MatrixError> {
        self.partial(self.nrows(), 1, 0, col)
    }
}

// ── TransposedMatrix ────────────────────────────────────────────────

impl<T> TransposedMatrix<T> {
    /// Handle on the pre-transpose matrix. Still an alias, not a copy.
    ///
    /// ```
    /// use sharemat::Matrix;
    /// let m = Matrix::from_rows(1, 2, &[1, 2]);
    /// let back = m.transpose().untranspose();
    /// assert!(back.shares_buffer_with(&m));
    /// assert_eq!((back.nrows(), back.ncols()), (1, 2));
    /// ```
    pub fn untranspose(&self) -> Matrix<T> {
        original_of(&self.inner)
    }

    /// Same as [`untranspose`](TransposedMatrix::untranspose).
    pub fn original(&self) -> Matrix<T> {
        original_of(&self.inner)
    }

    /// Drop the view type, keeping the alias as a plain matrix handle.
    pub fn into_matrix(self) -> Matrix<T> {
        self.inner
    }
}

impl<T: Scalar> TransposedMatrix<T> {
    /// Copy `src` element-wise into the aliased region.
    ///
    /// Only the overlapping `min(rows) x min(cols)` block is written; the
    /// view keeps pointing at the same parent. Use
    /// [`Matrix::rebind`] to re-point a handle instead.
    pub fn assign_from(&self, src: &impl MatrixRef<T>) -> &Self {
        substitute(&self.inner, src);
        self
    }
}

impl<T> Deref for TransposedMatrix<T> {
    type Target = Matrix<T>;

    #[inline]
    fn deref(&self) -> &Matrix<T> {
        &self.inner
    }
}

impl<T> From<TransposedMatrix<T>> for Matrix<T> {
    fn from(t: TransposedMatrix<T>) -> Self {
        t.inner
    }
}

// ── PartialMatrix ───────────────────────────────────────────────────

impl<T> PartialMatrix<T> {
    /// Handle on the matrix this block was taken from.
    pub fn original(&self) -> Matrix<T> {
        original_of(&self.inner)
    }

    /// `(row, col)` of this block's origin inside the parent.
    pub fn offset(&self) -> (usize, usize) {
        match self.inner.storage() {
            Storage::Partial(p) => (p.row_offset(), p.col_offset()),
            _ => (0, 0),
        }
    }

    /// Drop the view type, keeping the alias as a plain matrix handle.
    pub fn into_matrix(self) -> Matrix<T> {
        self.inner
    }
}

impl<T: Scalar> PartialMatrix<T> {
    /// Copy `src` element-wise into the aliased block.
    ///
    /// ```
    /// use sharemat::Matrix;
    /// let m = Matrix::<i32>::new(3, 3);
    /// let patch = Matrix::from_rows(2, 2, &[1, 2, 3, 4]);
    /// m.partial(2, 2, 1, 1).unwrap().assign_from(&patch);
    /// assert_eq!(m.get(2, 2), 4);
    /// assert_eq!(m.get(0, 0), 0);
    /// ```
    pub fn assign_from(&self, src: &impl MatrixRef<T>) -> &Self {
        substitute(&self.inner, src);
        self
    }
}

impl<T> Deref for PartialMatrix<T> {
    type Target = Matrix<T>;

    #[inline]
    fn deref(&self) -> &Matrix<T> {
        &self.inner
    }
}

impl<T> From<PartialMatrix<T>> for Matrix<T> {
    fn from(p: PartialMatrix<T>) -> Self {
        p.inner
    }
}

// ── MatrixRef / MatrixMut / PartialEq ───────────────────────────────

macro_rules! impl_view_traits {
    ($($view:ident),*) => {
        $(
            impl<T> Clone for $view<T> {
                fn clone(&self) -> Self {
                    Self {
                        inner: self.inner.clone(),
                    }
                }
            }

            impl<T: Scalar> MatrixRef<T> for $view<T> {
                #[inline]
                fn nrows(&self) -> usize {
                    self.inner.nrows()
                }

                #[inline]
                fn ncols(&self) -> usize {
                    self.inner.ncols()
                }

                #[inline]
                fn get(&self, row: usize, col: usize) -> T {
                    self.inner.get(row, col)
                }
            }

            impl<T: Scalar> MatrixMut<T> for $view<T> {
                #[inline]
                fn cell(&self, row: usize, col: usize) -> &Cell<T> {
                    self.inner.at(row, col)
                }
            }

            impl<T: Scalar> PartialEq<Matrix<T>> for $view<T> {
                fn eq(&self, other: &Matrix<T>) -> bool {
                    self.inner == *other
                }
            }

            impl<T: Scalar> PartialEq<$view<T>> for Matrix<T> {
                fn eq(&self, other: &$view<T>) -> bool {
                    *self == other.inner
                }
            }

            impl<T: Scalar> core::fmt::Debug for $view<T> {
                fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                    f.debug_tuple(stringify!($view)).field(&self.inner).finish()
                }
            }

            impl<T: Scalar + core::fmt::Display> core::fmt::Display for $view<T> {
                fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                    core::fmt::Display::fmt(&self.inner, f)
                }
            }
        )*
    };
}

impl_view_traits!(TransposedMatrix, PartialMatrix);

#[cfg(test)]
mod tests {
    use super::*;

    fn m3() -> Matrix<f64> {
        Matrix::from_fn(3, 3, |i, j| (i * 3 + j) as f64)
    }

    #[test]
    fn transpose_aliases_both_ways() {
        let m = m3();
        let t = m.transpose();
        assert_eq!(t.get(0, 1), 3.0);
        m.set(1, 0, 42.0);
        assert_eq!(t.get(0, 1), 42.0);
        t.set(2, 1, -1.0);
        assert_eq!(m.get(1, 2), -1.0);
        assert!(t.is_view());
    }

    #[test]
    fn double_transpose_reads_original() {
        let m = Matrix::from_rows(2, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let tt = m.transpose().transpose();
        assert_eq!(*tt, m);
        assert!(tt.shares_buffer_with(&m));
    }

    #[test]
    fn untranspose_is_live_alias() {
        let m = m3();
        let back = m.transpose().untranspose();
        back.set(0, 2, 11.0);
        assert_eq!(m.get(0, 2), 11.0);
        assert!(!back.is_view());
    }

    #[test]
    fn partial_aliases_parent() {
        let m = m3();
        let p = m.partial(2, 2, 1, 1).unwrap();
        assert_eq!(p.get(0, 0), 4.0);
        assert_eq!(p.offset(), (1, 1));
        p.set(1, 1, 100.0);
        assert_eq!(m.get(2, 2), 100.0);
    }

    #[test]
    fn partial_copy_detaches() {
        let m = m3();
        let c = m.partial(2, 2, 0, 1).unwrap().copy();
        assert!(!c.is_view());
        c.set(0, 0, -5.0);
        assert_eq!(m.get(0, 1), 1.0);
    }

    #[test]
    fn partial_out_of_bounds() {
        let m = m3();
        assert!(m.partial(2, 2, 2, 0).is_err());
        assert!(m.partial(1, 4, 0, 0).is_err());
        assert!(m.partial(3, 3, 0, 0).is_ok());
        assert!(m.partial(0, 0, 3, 3).is_ok());
    }

    #[test]
    fn row_and_column_vectors() {
        let m = m3();
        let r = m.row_vector(1).unwrap();
        assert_eq!((r.nrows(), r.ncols()), (1, 3));
        assert_eq!(r.to_vec(), [3.0, 4.0, 5.0]);
        let c = m.column_vector(2).unwrap();
        assert_eq!((c.nrows(), c.ncols()), (3, 1));
        assert_eq!(c.to_vec(), [2.0, 5.0, 8.0]);
        c.set(0, 0, 0.5);
        assert_eq!(m.get(0, 2), 0.5);
        assert!(m.row_vector(3).is_err());
        assert!(m.column_vector(3).is_err());
    }

    #[test]
    fn assign_from_copies_into_region() {
        let m = Matrix::<f64>::new(3, 3);
        let src = Matrix::from_rows(2, 2, &[1.0, 2.0, 3.0, 4.0]);
        let block = m.partial(2, 2, 0, 1).unwrap();
        block.assign_from(&src);
        assert_eq!(m.get(0, 1), 1.0);
        assert_eq!(m.get(1, 2), 4.0);
        assert_eq!(m.get(2, 2), 0.0);
        assert!(!block.shares_buffer_with(&src));
    }

    #[test]
    fn assign_from_clips_to_smaller_shape() {
        let m = Matrix::<i32>::new(2, 3);
        let t = m.transpose();
        t.assign_from(&Matrix::from_rows(2, 2, &[1, 2, 3, 4]));
        // t is 3x2, src is 2x2: t(0..2, 0..2) written
        assert_eq!(m.to_vec(), [1, 3, 0, 2, 4, 0]);
    }

    #[test]
    fn nested_views() {
        let m = m3();
        let p = m.transpose().partial(2, 1, 1, 2).unwrap();
        // p(i, 0) = t(1 + i, 2) = m(2, 1 + i)
        assert_eq!(p.to_vec(), [7.0, 8.0]);
        let parent = p.original();
        assert!(parent.is_view());
        assert_eq!(parent.get(2, 0), 2.0);
    }

    #[test]
    fn into_matrix_keeps_alias() {
        let m = m3();
        let plain: Matrix<f64> = m.row_vector(0).unwrap().into_matrix();
        plain.set(0, 0, 9.0);
        assert_eq!(m.get(0, 0), 9.0);
        let t: Matrix<f64> = m.transpose().into();
        assert_eq!(t.get(1, 0), 1.0);
    }
}
