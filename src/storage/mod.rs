//! Element storage behind a [`Matrix`](crate::Matrix).
//!
//! A [`Storage`] is either a [`Dense`] buffer or a view that forwards to a
//! parent storage through a coordinate transform. Views nest freely (the
//! transpose of a sub-block of a transpose...), and every access ends at a
//! cell of some dense buffer.

mod buffer;
mod dense;

pub use buffer::SharedBuffer;
pub use dense::{aligned_cols, aligned_rows, Dense};

use alloc::boxed::Box;
use core::cell::Cell;

use crate::error::MatrixError;
use crate::traits::{MatrixMut, MatrixRef, Scalar};

/// Rectangular grid of cells addressed by `(row, col)`.
///
/// `Clone` is the shallow copy: a new handle of the same variant sharing the
/// underlying buffer.
#[derive(Debug)]
pub enum Storage<T> {
    /// Owns (a share of) a buffer.
    Dense(Dense<T>),
    /// `(r, c)` reads the parent's `(c, r)`.
    Transposed(Box<Storage<T>>),
    /// `(r, c)` reads the parent's `(r + row_offset, c + col_offset)`.
    Partial(Partial<T>),
}

/// Sub-block window onto a parent storage.
#[derive(Debug)]
pub struct Partial<T> {
    parent: Box<Storage<T>>,
    rows: usize,
    cols: usize,
    row_offset: usize,
    col_offset: usize,
}

impl<T> Clone for Storage<T> {
    fn clone(&self) -> Self {
        match self {
            Storage::Dense(d) => Storage::Dense(d.clone()),
            Storage::Transposed(p) => Storage::Transposed(p.clone()),
            Storage::Partial(p) => Storage::Partial(p.clone()),
        }
    }
}

impl<T> Clone for Partial<T> {
    fn clone(&self) -> Self {
        Self {
            parent: self.parent.clone(),
            rows: self.rows,
            cols: self.cols,
            row_offset: self.row_offset,
            col_offset: self.col_offset,
        }
    }
}

impl<T> Partial<T> {
    #[inline]
    pub fn parent(&self) -> &Storage<T> {
        &self.parent
    }

    #[inline]
    pub fn row_offset(&self) -> usize {
        self.row_offset
    }

    #[inline]
    pub fn col_offset(&self) -> usize {
        self.col_offset
    }
}

impl<T> Storage<T> {
    /// Transposed view of `parent`.
    pub fn transposed(parent: Storage<T>) -> Self {
        Storage::Transposed(Box::new(parent))
    }

    /// `rows x cols` window of `parent` starting at `(row_offset, col_offset)`.
    ///
    /// The window must lie inside the parent.
    pub fn partial(
        parent: Storage<T>,
        rows: usize,
        cols: usize,
        row_offset: usize,
        col_offset: usize,
    ) -> Result<Self, MatrixError> {
        let fits = row_offset
            .checked_add(rows)
            .is_some_and(|end| end <= parent.nrows())
            && col_offset
                .checked_add(cols)
                .is_some_and(|end| end <= parent.ncols());
        if !fits {
            return Err(MatrixError::OutOfBounds {
                start: (row_offset, col_offset),
                size: (rows, cols),
                bounds: (parent.nrows(), parent.ncols()),
            });
        }
        Ok(Storage::Partial(Partial {
            parent: Box::new(parent),
            rows,
            cols,
            row_offset,
            col_offset,
        }))
    }

    #[inline]
    pub fn nrows(&self) -> usize {
        match self {
            Storage::Dense(d) => d.nrows(),
            Storage::Transposed(p) => p.ncols(),
            Storage::Partial(p) => p.rows,
        }
    }

    #[inline]
    pub fn ncols(&self) -> usize {
        match self {
            Storage::Dense(d) => d.ncols(),
            Storage::Transposed(p) => p.nrows(),
            Storage::Partial(p) => p.cols,
        }
    }

    /// Cell at `(row, col)`. The caller keeps indices in range.
    #[inline]
    pub fn at(&self, row: usize, col: usize) -> &Cell<T> {
        debug_assert!(row < self.nrows() && col < self.ncols());
        match self {
            Storage::Dense(d) => d.at(row, col),
            Storage::Transposed(p) => p.at(col, row),
            Storage::Partial(p) => p.parent.at(row + p.row_offset, col + p.col_offset),
        }
    }

    /// New handle sharing the same memory.
    #[inline]
    pub fn shallow_copy(&self) -> Self {
        self.clone()
    }

    /// Whether this storage forwards to a parent instead of owning a buffer.
    #[inline]
    pub fn is_view(&self) -> bool {
        !matches!(self, Storage::Dense(_))
    }

    /// The storage a view forwards to; `None` for dense storage.
    pub fn parent(&self) -> Option<&Storage<T>> {
        match self {
            Storage::Dense(_) => None,
            Storage::Transposed(p) => Some(p.as_ref()),
            Storage::Partial(p) => Some(p.parent.as_ref()),
        }
    }

    /// The dense buffer every access of this storage ends up in.
    pub fn root(&self) -> &Dense<T> {
        match self {
            Storage::Dense(d) => d,
            Storage::Transposed(p) => p.root(),
            Storage::Partial(p) => p.parent.root(),
        }
    }
}

impl<T: Scalar> Storage<T> {
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> T {
        self.at(row, col).get()
    }

    /// Zero every element reachable through this storage.
    ///
    /// A view only clears its own window of the parent.
    pub fn clear(&self) {
        match self {
            Storage::Dense(d) => d.clear(),
            _ => {
                for i in 0..self.nrows() {
                    for j in 0..self.ncols() {
                        self.at(i, j).set(T::zero());
                    }
                }
            }
        }
    }

    /// Contiguous dense form of the logical contents.
    ///
    /// Dense storage returns an alias of itself; views are materialised into
    /// a fresh compact buffer. A transposed view materialises its parent
    /// first, then swaps indices.
    pub fn to_dense(&self) -> Dense<T> {
        match self {
            Storage::Dense(d) => d.clone(),
            Storage::Transposed(p) => {
                let src = p.to_dense();
                let (rows, cols) = (src.ncols(), src.nrows());
                tracing::trace!(rows, cols, "materializing transposed view");
                let out = Dense::zeros(rows, cols);
                for i in 0..rows {
                    for j in 0..cols {
                        out.at(i, j).set(src.at(j, i).get());
                    }
                }
                out
            }
            Storage::Partial(p) => {
                tracing::trace!(rows = p.rows, cols = p.cols, "materializing partial view");
                let out = Dense::zeros(p.rows, p.cols);
                for i in 0..p.rows {
                    for j in 0..p.cols {
                        out.at(i, j).set(self.at(i, j).get());
                    }
                }
                out
            }
        }
    }

    /// Fully independent dense copy.
    pub fn deep_copy(&self) -> Storage<T> {
        match self {
            Storage::Dense(d) => Storage::Dense(d.duplicate()),
            // Materialising a view always allocates a new buffer.
            _ => Storage::Dense(self.to_dense()),
        }
    }
}

impl<T: Scalar> MatrixRef<T> for Storage<T> {
    #[inline]
    fn nrows(&self) -> usize {
        Storage::nrows(self)
    }

    #[inline]
    fn ncols(&self) -> usize {
        Storage::ncols(self)
    }

    #[inline]
    fn get(&self, row: usize, col: usize) -> T {
        Storage::get(self, row, col)
    }
}

impl<T: Scalar> MatrixMut<T> for Storage<T> {
    #[inline]
    fn cell(&self, row: usize, col: usize) -> &Cell<T> {
        self.at(row, col)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> Storage<i32> {
        Storage::Dense(Dense::from_row_major(3, 4, &[0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11]))
    }

    #[test]
    fn transposed_swaps_indices() {
        let t = Storage::transposed(grid());
        assert_eq!((t.nrows(), t.ncols()), (4, 3));
        assert_eq!(t.get(3, 1), 7);
        assert!(t.is_view());
    }

    #[test]
    fn partial_offsets_indices() {
        let p = Storage::partial(grid(), 2, 2, 1, 2).unwrap();
        assert_eq!((p.nrows(), p.ncols()), (2, 2));
        assert_eq!(p.get(0, 0), 6);
        assert_eq!(p.get(1, 1), 11);
    }

    #[test]
    fn partial_rejects_overflowing_window() {
        let err = Storage::partial(grid(), 2, 3, 2, 0).unwrap_err();
        assert_eq!(
            err,
            MatrixError::OutOfBounds {
                start: (2, 0),
                size: (2, 3),
                bounds: (3, 4),
            }
        );
        assert!(Storage::partial(grid(), 1, 1, usize::MAX, 0).is_err());
    }

    #[test]
    fn views_write_through() {
        let base = grid();
        let t = Storage::transposed(base.shallow_copy());
        let p = Storage::partial(t.shallow_copy(), 2, 2, 1, 1).unwrap();
        p.at(0, 1).set(-1);
        // p(0,1) -> t(1,2) -> base(2,1)
        assert_eq!(base.get(2, 1), -1);
        assert!(p.root().buffer().ptr_eq(base.root().buffer()));
    }

    #[test]
    fn to_dense_materializes_views() {
        let base = grid();
        let t = Storage::transposed(base.shallow_copy());
        let d = t.to_dense();
        assert!(!d.buffer().ptr_eq(base.root().buffer()));
        assert_eq!((d.nrows(), d.ncols()), (4, 3));
        assert_eq!(d.at(3, 2).get(), 11);

        let alias = base.to_dense();
        assert!(alias.buffer().ptr_eq(base.root().buffer()));
    }

    #[test]
    fn deep_copy_detaches() {
        let base = grid();
        let copy = base.deep_copy();
        copy.at(0, 0).set(100);
        assert_eq!(base.get(0, 0), 0);

        let window = Storage::partial(base.shallow_copy(), 1, 2, 0, 0).unwrap();
        let detached = window.deep_copy();
        assert!(!detached.is_view());
        detached.at(0, 1).set(50);
        assert_eq!(base.get(0, 1), 1);
    }

    #[test]
    fn clear_on_view_only_touches_window() {
        let base = grid();
        let p = Storage::partial(base.shallow_copy(), 1, 4, 1, 0).unwrap();
        p.clear();
        assert_eq!(base.get(0, 3), 3);
        assert_eq!(base.get(1, 2), 0);
        assert_eq!(base.get(2, 0), 8);
    }

    #[test]
    fn shallow_copy_shares_buffer_refcount() {
        let base = grid();
        assert_eq!(base.root().buffer().ref_count(), 1);
        let t = Storage::transposed(base.shallow_copy());
        assert_eq!(base.root().buffer().ref_count(), 2);
        let t2 = t.shallow_copy();
        assert_eq!(base.root().buffer().ref_count(), 3);
        drop(t);
        drop(t2);
        assert_eq!(base.root().buffer().ref_count(), 1);
        assert_eq!(base.parent().map(|p| p.nrows()), None);
    }
}
