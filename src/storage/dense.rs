use core::cell::Cell;

use crate::traits::Scalar;

use super::buffer::SharedBuffer;

/// Contiguous row-major storage.
///
/// Logical size is `rows x cols`. The physical buffer is `buffer_rows x
/// buffer_cols`; the two only differ for [`Dense::aligned`] stores, whose
/// stride is padded to an even count for 2-wide kernels. Element `(r, c)`
/// lives at `r * buffer_cols + c`.
#[derive(Debug)]
pub struct Dense<T> {
    buffer: SharedBuffer<T>,
    rows: usize,
    cols: usize,
    buffer_rows: usize,
    buffer_cols: usize,
}

/// Padded row count for an aligned buffer: odd counts grow by one unless the
/// matrix is a vector.
#[inline]
pub fn aligned_rows(rows: usize, cols: usize) -> usize {
    if rows == 1 || cols == 1 || rows % 2 == 0 {
        rows
    } else {
        rows + 1
    }
}

/// Padded column count (row stride) for an aligned buffer.
#[inline]
pub fn aligned_cols(rows: usize, cols: usize) -> usize {
    if rows == 1 || cols == 1 || cols % 2 == 0 {
        cols
    } else {
        cols + 1
    }
}

impl<T> Clone for Dense<T> {
    /// Shares the buffer.
    fn clone(&self) -> Self {
        Self {
            buffer: self.buffer.clone(),
            rows: self.rows,
            cols: self.cols,
            buffer_rows: self.buffer_rows,
            buffer_cols: self.buffer_cols,
        }
    }
}

impl<T: Scalar> Dense<T> {
    /// Zero-filled compact store.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            buffer: SharedBuffer::filled(rows * cols, T::zero()),
            rows,
            cols,
            buffer_rows: rows,
            buffer_cols: cols,
        }
    }

    /// Compact store copied from a row-major slice of exactly `rows * cols` elements.
    pub fn from_row_major(rows: usize, cols: usize, data: &[T]) -> Self {
        debug_assert_eq!(data.len(), rows * cols);
        Self {
            buffer: SharedBuffer::from_slice(data),
            rows,
            cols,
            buffer_rows: rows,
            buffer_cols: cols,
        }
    }

    /// Zero-filled store with a padded physical layout.
    ///
    /// ```
    /// use sharemat::storage::Dense;
    /// let d = Dense::<f64>::aligned(3, 3);
    /// assert_eq!((d.buffer_rows(), d.buffer_cols()), (4, 4));
    /// let v = Dense::<f64>::aligned(1, 5);
    /// assert_eq!((v.buffer_rows(), v.buffer_cols()), (1, 5));
    /// ```
    pub fn aligned(rows: usize, cols: usize) -> Self {
        let buffer_rows = aligned_rows(rows, cols);
        let buffer_cols = aligned_cols(rows, cols);
        Self {
            buffer: SharedBuffer::filled(buffer_rows * buffer_cols, T::zero()),
            rows,
            cols,
            buffer_rows,
            buffer_cols,
        }
    }

    /// Padded store copied row by row from a compact row-major slice.
    pub fn aligned_from_row_major(rows: usize, cols: usize, data: &[T]) -> Self {
        debug_assert_eq!(data.len(), rows * cols);
        let d = Self::aligned(rows, cols);
        for (i, row) in data.chunks(cols.max(1)).take(rows).enumerate() {
            for (j, &x) in row.iter().enumerate() {
                d.at(i, j).set(x);
            }
        }
        d
    }

    /// Independent copy with the same physical layout.
    pub fn duplicate(&self) -> Self {
        Self {
            buffer: self.buffer.duplicate(),
            ..*self
        }
    }

    /// Zero the whole physical buffer, padding included.
    pub fn clear(&self) {
        self.buffer.fill(T::zero());
    }
}

impl<T> Dense<T> {
    #[inline]
    pub fn nrows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn ncols(&self) -> usize {
        self.cols
    }

    /// Physical row count.
    #[inline]
    pub fn buffer_rows(&self) -> usize {
        self.buffer_rows
    }

    /// Physical column count, i.e. the row stride.
    #[inline]
    pub fn buffer_cols(&self) -> usize {
        self.buffer_cols
    }

    /// Whether the physical layout is larger than the logical one.
    #[inline]
    pub fn is_padded(&self) -> bool {
        self.buffer_rows != self.rows || self.buffer_cols != self.cols
    }

    #[inline]
    pub fn buffer(&self) -> &SharedBuffer<T> {
        &self.buffer
    }

    /// Raw pointer to element `(0, 0)`; rows are `buffer_cols()` apart.
    #[inline]
    pub fn as_ptr(&self) -> *const T {
        self.buffer.as_ptr()
    }

    #[inline]
    pub fn at(&self, row: usize, col: usize) -> &Cell<T> {
        debug_assert!(row < self.rows && col < self.cols);
        self.buffer.cell(row * self.buffer_cols + col)
    }
}
