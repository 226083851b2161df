use alloc::rc::Rc;
use core::cell::Cell;

/// Reference-counted element buffer.
///
/// Cloning aliases the same allocation and bumps the holder count; dropping
/// the last clone frees it. Elements sit in [`Cell`]s so any holder can write
/// through a shared reference.
///
/// ```
/// use sharemat::storage::SharedBuffer;
///
/// let a = SharedBuffer::filled(4, 0.0_f64);
/// let b = a.clone();
/// assert_eq!(a.ref_count(), 2);
/// b.cell(1).set(3.0);
/// assert_eq!(a.cell(1).get(), 3.0);
/// drop(b);
/// assert_eq!(a.ref_count(), 1);
/// ```
pub struct SharedBuffer<T> {
    cells: Rc<[Cell<T>]>,
}

impl<T: Copy> SharedBuffer<T> {
    /// Allocate `len` elements, all set to `value`.
    pub fn filled(len: usize, value: T) -> Self {
        Self {
            cells: (0..len).map(|_| Cell::new(value)).collect(),
        }
    }

    /// Allocate a buffer holding a copy of `slice`.
    pub fn from_slice(slice: &[T]) -> Self {
        Self {
            cells: slice.iter().map(|&x| Cell::new(x)).collect(),
        }
    }

    /// Fresh allocation with the same contents. The result does not alias `self`.
    pub fn duplicate(&self) -> Self {
        Self {
            cells: self.cells.iter().map(|c| Cell::new(c.get())).collect(),
        }
    }

    /// Overwrite every element with `value`.
    pub fn fill(&self, value: T) {
        for c in self.cells.iter() {
            c.set(value);
        }
    }
}

impl<T> SharedBuffer<T> {
    /// Number of elements in the allocation.
    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Element `i` of the allocation.
    #[inline]
    pub fn cell(&self, i: usize) -> &Cell<T> {
        &self.cells[i]
    }

    /// All elements as a slice of cells.
    #[inline]
    pub fn as_cells(&self) -> &[Cell<T>] {
        &self.cells
    }

    /// Raw pointer to the first element.
    ///
    /// `Cell<T>` has the same layout as `T`, so the pointer addresses `len()`
    /// contiguous `T`s. It stays valid while any clone of this buffer lives;
    /// writes through it must not race with writes through the cells.
    #[inline]
    pub fn as_ptr(&self) -> *const T {
        self.cells.as_ptr() as *const T
    }

    /// Number of live handles sharing this allocation.
    #[inline]
    pub fn ref_count(&self) -> usize {
        Rc::strong_count(&self.cells)
    }

    /// Whether both handles address the same allocation.
    #[inline]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.cells, &other.cells)
    }
}

impl<T> Clone for SharedBuffer<T> {
    fn clone(&self) -> Self {
        Self {
            cells: Rc::clone(&self.cells),
        }
    }
}

impl<T> core::fmt::Debug for SharedBuffer<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SharedBuffer")
            .field("len", &self.len())
            .field("refs", &self.ref_count())
            .finish()
    }
}
