use core::cell::Cell;
use core::fmt::Debug;
use num_traits::{Num, One, Zero};

/// Trait for types that can be used as matrix elements.
///
/// Blanket-implemented for all types satisfying the bounds.
/// Covers `f32`, `f64`, all integer types, and `Complex<T>` when the
/// `complex` feature is enabled.
pub trait Scalar: Copy + PartialEq + Debug + Zero + One + Num {}

impl<T: Copy + PartialEq + Debug + Zero + One + Num> Scalar for T {}

/// Read-only access to a matrix-like type.
///
/// Implemented by [`Matrix`](crate::Matrix), the view facades and
/// [`Storage`](crate::storage::Storage), so element-wise algorithms and the
/// `*=` family accept any of them without materialising a view first.
pub trait MatrixRef<T: Copy> {
    fn nrows(&self) -> usize;
    fn ncols(&self) -> usize;
    fn get(&self, row: usize, col: usize) -> T;
}

/// Write access to a matrix-like type.
///
/// Elements live in shared cells, so writing only needs `&self`: every
/// handle aliasing the same buffer observes the write.
pub trait MatrixMut<T: Copy>: MatrixRef<T> {
    fn cell(&self, row: usize, col: usize) -> &Cell<T>;

    #[inline]
    fn set(&self, row: usize, col: usize, value: T) {
        self.cell(row, col).set(value);
    }
}

/// Element types the pivoting algorithms (LU, UD, inverse) can run on.
///
/// Integers divide exactly, so only an exact zero pivot is singular. Floats
/// and complex numbers compare the pivot against the round-off a
/// length-`n` elimination can leave on entries of magnitude `scale`: a
/// pivot within `n * epsilon * scale` is treated as zero.
///
/// ```
/// use sharemat::LinalgScalar;
///
/// assert!(<f64 as LinalgScalar>::negligible(4.4e-16, 2.1, 2));
/// assert!(!<f64 as LinalgScalar>::negligible(1e-3, 2.1, 2));
/// assert!(!<i32 as LinalgScalar>::negligible(1.0, 1e9, 100));
/// ```
pub trait LinalgScalar: Scalar {
    /// Magnitude type used for pivot comparisons.
    type Real: Copy + PartialOrd;

    /// `|x|` for reals; `|re| + |im|` for complex.
    fn modulus(self) -> Self::Real;

    /// Whether a pivot of modulus `pivot` is indistinguishable from zero.
    fn negligible(pivot: Self::Real, scale: Self::Real, n: usize) -> bool;
}

macro_rules! impl_linalg_scalar_int {
    ($($t:ty),*) => {
        $(
            impl LinalgScalar for $t {
                type Real = f64;

                #[inline]
                fn modulus(self) -> f64 {
                    let x = self as f64;
                    if x < 0.0 { -x } else { x }
                }

                #[inline]
                fn negligible(pivot: f64, _scale: f64, _n: usize) -> bool {
                    pivot == 0.0
                }
            }
        )*
    };
}

impl_linalg_scalar_int!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

macro_rules! impl_linalg_scalar_float {
    ($($t:ident),*) => {
        $(
            impl LinalgScalar for $t {
                type Real = $t;

                #[inline]
                fn modulus(self) -> $t {
                    if self < 0.0 { -self } else { self }
                }

                #[inline]
                fn negligible(pivot: $t, scale: $t, n: usize) -> bool {
                    pivot <= n as $t * $t::EPSILON * scale
                }
            }

            #[cfg(feature = "complex")]
            impl LinalgScalar for num_complex::Complex<$t> {
                type Real = $t;

                #[inline]
                fn modulus(self) -> $t {
                    self.re.modulus() + self.im.modulus()
                }

                #[inline]
                fn negligible(pivot: $t, scale: $t, n: usize) -> bool {
                    <$t as LinalgScalar>::negligible(pivot, scale, n)
                }
            }
        )*
    };
}

impl_linalg_scalar_float!(f32, f64);

/// Largest [`modulus`](LinalgScalar::modulus) among `values`, zero when empty.
pub(crate) fn max_modulus<T: LinalgScalar>(values: impl Iterator<Item = T>) -> T::Real {
    let zero = T::zero().modulus();
    values.map(T::modulus).fold(zero, |m, v| if v > m { v } else { m })
}
