use core::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use crate::error::MatrixError;
use crate::kernel::{self, Kernel};
use crate::traits::{LinalgScalar, MatrixRef, Scalar};

use super::{Matrix, PartialMatrix, TransposedMatrix};

#[track_caller]
fn or_panic<T>(result: Result<Matrix<T>, MatrixError>) -> Matrix<T> {
    match result {
        Ok(m) => m,
        Err(e) => panic!("{}", e),
    }
}

/// Overwrite `dst` element-wise from an equally shaped `src`.
fn write_back<T: Scalar>(dst: &Matrix<T>, src: &Matrix<T>) {
    for i in 0..dst.nrows() {
        for j in 0..dst.ncols() {
            dst.set(i, j, src.get(i, j));
        }
    }
}

// ── Checked arithmetic ──────────────────────────────────────────────

impl<T: Scalar> Matrix<T> {
    /// New matrix with `f` applied to every element.
    pub fn map(&self, f: impl Fn(T) -> T) -> Matrix<T> {
        Matrix::from_fn(self.nrows(), self.ncols(), |i, j| f(self.get(i, j)))
    }

    /// Element-wise sum. Shapes must match exactly.
    ///
    /// ```
    /// use sharemat::{Matrix, MatrixError};
    /// let a = Matrix::from_rows(1, 2, &[1, 2]);
    /// let b = Matrix::from_rows(1, 2, &[10, 20]);
    /// assert_eq!(a.checked_add(&b).unwrap().to_vec(), [11, 22]);
    /// assert!(matches!(
    ///     a.checked_add(&b.transpose()),
    ///     Err(MatrixError::DimensionMismatch { .. })
    /// ));
    /// ```
    pub fn checked_add(&self, rhs: &impl MatrixRef<T>) -> Result<Matrix<T>, MatrixError> {
        self.zip_with(rhs, "+", |a, b| a + b)
    }

    /// Element-wise difference. Shapes must match exactly.
    pub fn checked_sub(&self, rhs: &impl MatrixRef<T>) -> Result<Matrix<T>, MatrixError> {
        self.zip_with(rhs, "-", |a, b| a - b)
    }

    /// Matrix product by the naive triple loop.
    ///
    /// Either operand may be a view; it is read in place, not materialised.
    pub fn checked_mul(&self, rhs: &impl MatrixRef<T>) -> Result<Matrix<T>, MatrixError> {
        if self.ncols() != rhs.nrows() {
            return Err(MatrixError::DimensionMismatch {
                op: "*",
                lhs: (self.nrows(), self.ncols()),
                rhs: (rhs.nrows(), rhs.ncols()),
            });
        }
        Ok(kernel::naive_gemm(self, rhs))
    }

    /// Matrix product computed by `kernel`.
    ///
    /// ```
    /// use sharemat::kernel::Strided;
    /// use sharemat::Matrix;
    ///
    /// let a = Matrix::from_rows(2, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    /// let p = a.mul_with(&a.transpose(), &Strided).unwrap();
    /// assert_eq!(p.to_vec(), [14.0, 32.0, 32.0, 77.0]);
    /// ```
    pub fn mul_with<K: Kernel<T> + ?Sized>(
        &self,
        rhs: &Matrix<T>,
        kernel: &K,
    ) -> Result<Matrix<T>, MatrixError> {
        if self.ncols() != rhs.nrows() {
            return Err(MatrixError::DimensionMismatch {
                op: "*",
                lhs: (self.nrows(), self.ncols()),
                rhs: (rhs.nrows(), rhs.ncols()),
            });
        }
        Ok(kernel.gemm(self, rhs))
    }

    /// `*=` for any readable right operand.
    ///
    /// The handle is re-pointed at the product; other aliases of the old
    /// elements keep their values.
    pub fn mul_assign_by(&mut self, rhs: &impl MatrixRef<T>) {
        let product = or_panic(self.checked_mul(rhs));
        *self = product;
    }

    fn zip_with(
        &self,
        rhs: &impl MatrixRef<T>,
        op: &'static str,
        f: impl Fn(T, T) -> T,
    ) -> Result<Matrix<T>, MatrixError> {
        if self.is_different_size(rhs) {
            return Err(MatrixError::DimensionMismatch {
                op,
                lhs: (self.nrows(), self.ncols()),
                rhs: (rhs.nrows(), rhs.ncols()),
            });
        }
        Ok(Matrix::from_fn(self.nrows(), self.ncols(), |i, j| {
            f(self.get(i, j), rhs.get(i, j))
        }))
    }

    fn apply_in_place(&self, f: impl Fn(T) -> T) {
        for i in 0..self.nrows() {
            for j in 0..self.ncols() {
                let c = self.at(i, j);
                c.set(f(c.get()));
            }
        }
    }
}

impl<T: LinalgScalar> Matrix<T> {
    /// `self * rhs.inverse()`.
    pub fn checked_div(&self, rhs: &Matrix<T>) -> Result<Matrix<T>, MatrixError> {
        let inv = rhs.inverse()?;
        self.checked_mul(&inv)
    }
}

// ── Matrix (+ - * /) matrix, any mix of plain and view operands ─────

macro_rules! impl_binary_op {
    ($bound:ident, $trait:ident, $method:ident, $checked:ident, $lhs:ident, $rhs:ident) => {
        impl<T: $bound> $trait<$rhs<T>> for $lhs<T> {
            type Output = Matrix<T>;
            #[track_caller]
            fn $method(self, rhs: $rhs<T>) -> Matrix<T> {
                or_panic(self.$checked(&rhs))
            }
        }

        impl<T: $bound> $trait<&$rhs<T>> for $lhs<T> {
            type Output = Matrix<T>;
            #[track_caller]
            fn $method(self, rhs: &$rhs<T>) -> Matrix<T> {
                or_panic(self.$checked(rhs))
            }
        }

        impl<T: $bound> $trait<$rhs<T>> for &$lhs<T> {
            type Output = Matrix<T>;
            #[track_caller]
            fn $method(self, rhs: $rhs<T>) -> Matrix<T> {
                or_panic(self.$checked(&rhs))
            }
        }

        impl<T: $bound> $trait<&$rhs<T>> for &$lhs<T> {
            type Output = Matrix<T>;
            #[track_caller]
            fn $method(self, rhs: &$rhs<T>) -> Matrix<T> {
                or_panic(self.$checked(rhs))
            }
        }
    };
}

macro_rules! impl_binary_ops {
    ($(($lhs:ident, $rhs:ident)),*) => {
        $(
            impl_binary_op!(Scalar, Add, add, checked_add, $lhs, $rhs);
            impl_binary_op!(Scalar, Sub, sub, checked_sub, $lhs, $rhs);
            impl_binary_op!(Scalar, Mul, mul, checked_mul, $lhs, $rhs);
            impl_binary_op!(LinalgScalar, Div, div, checked_div, $lhs, $rhs);
        )*
    };
}

impl_binary_ops!(
    (Matrix, Matrix),
    (Matrix, TransposedMatrix),
    (Matrix, PartialMatrix),
    (TransposedMatrix, Matrix),
    (TransposedMatrix, TransposedMatrix),
    (TransposedMatrix, PartialMatrix),
    (PartialMatrix, Matrix),
    (PartialMatrix, TransposedMatrix),
    (PartialMatrix, PartialMatrix)
);

// ── In-place += and -= (write into the aliased elements) ────────────

macro_rules! impl_elementwise_assign {
    ($(($lhs:ident, $rhs:ident)),*) => {
        $(
            impl<T: Scalar> AddAssign<&$rhs<T>> for $lhs<T> {
                #[track_caller]
                fn add_assign(&mut self, rhs: &$rhs<T>) {
                    // Summed out of place first: `rhs` may alias `self`.
                    let sum = or_panic(self.checked_add(rhs));
                    write_back(self, &sum);
                }
            }

            impl<T: Scalar> AddAssign<$rhs<T>> for $lhs<T> {
                #[track_caller]
                fn add_assign(&mut self, rhs: $rhs<T>) {
                    self.add_assign(&rhs);
                }
            }

            impl<T: Scalar> SubAssign<&$rhs<T>> for $lhs<T> {
                #[track_caller]
                fn sub_assign(&mut self, rhs: &$rhs<T>) {
                    let diff = or_panic(self.checked_sub(rhs));
                    write_back(self, &diff);
                }
            }

            impl<T: Scalar> SubAssign<$rhs<T>> for $lhs<T> {
                #[track_caller]
                fn sub_assign(&mut self, rhs: $rhs<T>) {
                    self.sub_assign(&rhs);
                }
            }
        )*
    };
}

impl_elementwise_assign!(
    (Matrix, Matrix),
    (Matrix, TransposedMatrix),
    (Matrix, PartialMatrix),
    (TransposedMatrix, Matrix),
    (TransposedMatrix, TransposedMatrix),
    (TransposedMatrix, PartialMatrix),
    (PartialMatrix, Matrix),
    (PartialMatrix, TransposedMatrix),
    (PartialMatrix, PartialMatrix)
);

// ── Matrix *= and /= (re-point the handle) ──────────────────────────

macro_rules! impl_product_assign {
    ($($rhs:ident),*) => {
        $(
            impl<T: Scalar> MulAssign<&$rhs<T>> for Matrix<T> {
                #[track_caller]
                fn mul_assign(&mut self, rhs: &$rhs<T>) {
                    self.mul_assign_by(rhs);
                }
            }

            impl<T: Scalar> MulAssign<$rhs<T>> for Matrix<T> {
                #[track_caller]
                fn mul_assign(&mut self, rhs: $rhs<T>) {
                    self.mul_assign_by(&rhs);
                }
            }

            impl<T: LinalgScalar> DivAssign<&$rhs<T>> for Matrix<T> {
                #[track_caller]
                fn div_assign(&mut self, rhs: &$rhs<T>) {
                    let quotient = or_panic(self.checked_div(rhs));
                    *self = quotient;
                }
            }

            impl<T: LinalgScalar> DivAssign<$rhs<T>> for Matrix<T> {
                #[track_caller]
                fn div_assign(&mut self, rhs: $rhs<T>) {
                    self.div_assign(&rhs);
                }
            }
        )*
    };
}

impl_product_assign!(Matrix, TransposedMatrix, PartialMatrix);

// ── Scalar * / and negation ─────────────────────────────────────────

macro_rules! impl_scalar_ops {
    ($($m:ident),*) => {
        $(
            impl<T: Scalar> Mul<T> for $m<T> {
                type Output = Matrix<T>;
                fn mul(self, rhs: T) -> Matrix<T> {
                    self.map(|x| x * rhs)
                }
            }

            impl<T: Scalar> Mul<T> for &$m<T> {
                type Output = Matrix<T>;
                fn mul(self, rhs: T) -> Matrix<T> {
                    self.map(|x| x * rhs)
                }
            }

            impl<T: Scalar> Div<T> for $m<T> {
                type Output = Matrix<T>;
                fn div(self, rhs: T) -> Matrix<T> {
                    self.map(|x| x / rhs)
                }
            }

            impl<T: Scalar> Div<T> for &$m<T> {
                type Output = Matrix<T>;
                fn div(self, rhs: T) -> Matrix<T> {
                    self.map(|x| x / rhs)
                }
            }

            impl<T: Scalar> MulAssign<T> for $m<T> {
                fn mul_assign(&mut self, rhs: T) {
                    self.apply_in_place(|x| x * rhs);
                }
            }

            impl<T: Scalar> DivAssign<T> for $m<T> {
                fn div_assign(&mut self, rhs: T) {
                    self.apply_in_place(|x| x / rhs);
                }
            }

            impl<T: Scalar> Neg for $m<T> {
                type Output = Matrix<T>;
                fn neg(self) -> Matrix<T> {
                    self.map(|x| T::zero() - x)
                }
            }

            impl<T: Scalar> Neg for &$m<T> {
                type Output = Matrix<T>;
                fn neg(self) -> Matrix<T> {
                    self.map(|x| T::zero() - x)
                }
            }
        )*
    };
}

impl_scalar_ops!(Matrix, TransposedMatrix, PartialMatrix);

// ── scalar * matrix (concrete impls) ────────────────────────────────

macro_rules! impl_scalar_mul_left_for {
    ($t:ty; $($m:ident),*) => {
        $(
            impl Mul<$m<$t>> for $t {
                type Output = Matrix<$t>;
                fn mul(self, rhs: $m<$t>) -> Matrix<$t> {
                    rhs * self
                }
            }

            impl Mul<&$m<$t>> for $t {
                type Output = Matrix<$t>;
                fn mul(self, rhs: &$m<$t>) -> Matrix<$t> {
                    rhs * self
                }
            }
        )*
    };
}

macro_rules! impl_scalar_mul_left {
    ($($t:ty),*) => {
        $(
            impl_scalar_mul_left_for!($t; Matrix, TransposedMatrix, PartialMatrix);
        )*
    };
}

impl_scalar_mul_left!(
    f32, f64, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize
);

#[cfg(feature = "complex")]
impl_scalar_mul_left!(num_complex::Complex<f32>, num_complex::Complex<f64>);
