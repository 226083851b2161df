//! Matrix-product backends.
//!
//! The operators always use the [`Naive`] triple loop, which reads any
//! storage (dense or view) element by element. [`Strided`] is the dense
//! fast path: both operands are forced to dense buffers and the product runs
//! on raw row strides, with transposed operands consumed in place through a
//! [`Transpose`] flag instead of being materialised.
//!
//! Other backends plug in by implementing [`Kernel`] and calling
//! [`Matrix::mul_with`].

use crate::matrix::Matrix;
use crate::storage::{Dense, Storage};
use crate::traits::{MatrixRef, Scalar};

/// Whether a dense operand is read as stored or transposed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transpose {
    No,
    Yes,
}

impl Transpose {
    /// `(row_stride, col_stride)` for logical access into a buffer with row
    /// stride `ld`.
    #[inline]
    pub fn strides(self, ld: usize) -> (usize, usize) {
        match self {
            Transpose::No => (ld, 1),
            Transpose::Yes => (1, ld),
        }
    }
}

/// Matrix-product backend.
///
/// Callers check `lhs.ncols() == rhs.nrows()` before dispatching.
pub trait Kernel<T: Scalar> {
    /// `lhs * rhs` as a fresh matrix.
    fn gemm(&self, lhs: &Matrix<T>, rhs: &Matrix<T>) -> Matrix<T>;
}

/// Element-wise triple loop over any storage.
#[derive(Debug, Clone, Copy, Default)]
pub struct Naive;

/// Dense strided product keyed on the operands' transpose flags.
#[derive(Debug, Clone, Copy, Default)]
pub struct Strided;

impl<T: Scalar> Kernel<T> for Naive {
    fn gemm(&self, lhs: &Matrix<T>, rhs: &Matrix<T>) -> Matrix<T> {
        naive_gemm(lhs, rhs)
    }
}

impl<T: Scalar> Kernel<T> for Strided {
    fn gemm(&self, lhs: &Matrix<T>, rhs: &Matrix<T>) -> Matrix<T> {
        let (a, ta) = dense_operand(lhs.storage());
        let (b, tb) = dense_operand(rhs.storage());
        tracing::trace!(?ta, ?tb, "strided gemm");

        let (m, n, k) = (lhs.nrows(), rhs.ncols(), lhs.ncols());
        let out = if a.is_padded() || b.is_padded() {
            Dense::aligned(m, n)
        } else {
            Dense::zeros(m, n)
        };
        strided_gemm(&out, &a, ta, &b, tb, m, n, k);
        Matrix::from_storage(Storage::Dense(out))
    }
}

/// `lhs * rhs` by the naive triple loop. Shapes are not checked.
pub(crate) fn naive_gemm<T: Scalar>(lhs: &impl MatrixRef<T>, rhs: &impl MatrixRef<T>) -> Matrix<T> {
    let (m, n, k) = (lhs.nrows(), rhs.ncols(), lhs.ncols());
    debug_assert_eq!(k, rhs.nrows());
    let out = Matrix::new(m, n);
    for i in 0..m {
        for j in 0..n {
            let mut sum = T::zero();
            for p in 0..k {
                sum = sum + lhs.get(i, p) * rhs.get(p, j);
            }
            out.set(i, j, sum);
        }
    }
    out
}

/// Dense buffer and transpose flag for one operand.
///
/// A transpose of a dense store is read through its parent buffer; any other
/// view is materialised first.
fn dense_operand<T: Scalar>(storage: &Storage<T>) -> (Dense<T>, Transpose) {
    match storage {
        Storage::Dense(d) => (d.clone(), Transpose::No),
        Storage::Transposed(parent) => (parent.to_dense(), Transpose::Yes),
        Storage::Partial(_) => (storage.to_dense(), Transpose::No),
    }
}

#[allow(clippy::too_many_arguments)]
fn strided_gemm<T: Scalar>(
    out: &Dense<T>,
    a: &Dense<T>,
    ta: Transpose,
    b: &Dense<T>,
    tb: Transpose,
    m: usize,
    n: usize,
    k: usize,
) {
    let (a_rs, a_cs) = ta.strides(a.buffer_cols());
    let ldb = b.buffer_cols();
    let c_rs = out.buffer_cols();
    let a_buf = a.buffer().as_cells();
    let b_buf = b.buffer().as_cells();
    let c_buf = out.buffer().as_cells();

    match tb {
        // Row-major rhs: stream rows of b into rows of c.
        Transpose::No => {
            for i in 0..m {
                let c_row = &c_buf[i * c_rs..i * c_rs + n];
                for p in 0..k {
                    let aip = a_buf[i * a_rs + p * a_cs].get();
                    let b_row = &b_buf[p * ldb..p * ldb + n];
                    for (c, bv) in c_row.iter().zip(b_row) {
                        c.set(c.get() + aip * bv.get());
                    }
                }
            }
        }
        // Transposed rhs: columns of the logical b are contiguous rows of
        // its parent, so each output element is a dot of two runs.
        Transpose::Yes => {
            for i in 0..m {
                for j in 0..n {
                    let b_col = &b_buf[j * ldb..j * ldb + k];
                    let mut sum = T::zero();
                    for (p, bv) in b_col.iter().enumerate() {
                        sum = sum + a_buf[i * a_rs + p * a_cs].get() * bv.get();
                    }
                    c_buf[i * c_rs + j].set(sum);
                }
            }
        }
    }
}
