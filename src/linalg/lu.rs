use crate::error::MatrixError;
use crate::matrix::PartialMatrix;
use crate::traits::{max_modulus, LinalgScalar, Scalar};
use crate::Matrix;

/// LU factors of a square matrix, packed side by side as `[L | U]`.
///
/// `L` is lower triangular and carries the computed diagonal; `U` is unit
/// upper triangular with its ones stored explicitly. No pivoting is done, so
/// a matrix that needs a row exchange to factor reports
/// [`MatrixError::Singular`].
///
/// ```
/// use sharemat::Matrix;
///
/// let a = Matrix::from_rows(2, 2, &[4.0_f64, 3.0, 6.0, 3.0]);
/// let lu = a.lu().unwrap();
/// assert_eq!(lu.l().to_vec(), [4.0, 0.0, 6.0, -1.5]);
/// assert_eq!(lu.u().to_vec(), [1.0, 0.75, 0.0, 1.0]);
/// assert_eq!(lu.l() * lu.u(), a);
/// ```
#[derive(Debug, Clone)]
pub struct Lu<T: Scalar> {
    packed: Matrix<T>,
    l: PartialMatrix<T>,
    u: PartialMatrix<T>,
}

impl<T: Scalar> Lu<T> {
    /// Lower factor, a view into [`packed`](Lu::packed).
    pub fn l(&self) -> &PartialMatrix<T> {
        &self.l
    }

    /// Unit upper factor, a view into [`packed`](Lu::packed).
    pub fn u(&self) -> &PartialMatrix<T> {
        &self.u
    }

    /// The `n x 2n` matrix `[L | U]`.
    pub fn packed(&self) -> &Matrix<T> {
        &self.packed
    }

    pub fn into_packed(self) -> Matrix<T> {
        self.packed
    }
}

impl<T: LinalgScalar> Matrix<T> {
    /// LU decomposition without pivoting, as one `n x 2n` matrix `[L | U]`.
    ///
    /// Fails with `NotSquare`, or with `Singular` when a diagonal element of
    /// `L` comes out zero. For floating-point elements "zero" means within
    /// round-off of the largest entry in its input row (see
    /// [`LinalgScalar::negligible`]).
    pub fn decompose_lu(&self) -> Result<Matrix<T>, MatrixError> {
        let n = self.require_square()?;
        tracing::debug!(n, "LU decomposition");

        let lu = Matrix::new(n, 2 * n);
        for i in 0..n {
            let scale = max_modulus((0..n).map(|j| self.get(i, j)));
            for j in 0..n {
                let mut v = self.get(i, j);
                if i >= j {
                    for k in 0..j {
                        v = v - lu.get(i, k) * lu.get(k, j + n);
                    }
                    if i == j && T::negligible(v.modulus(), scale, n) {
                        tracing::debug!(row = i, "zero diagonal in L");
                        return Err(MatrixError::Singular);
                    }
                    lu.set(i, j, v);
                } else {
                    for k in 0..i {
                        v = v - lu.get(i, k) * lu.get(k, j + n);
                    }
                    lu.set(i, j + n, v / lu.get(i, i));
                }
            }
            lu.set(i, i + n, T::one());
        }
        Ok(lu)
    }

    /// [`decompose_lu`](Matrix::decompose_lu) with `L` and `U` exposed as views.
    pub fn lu(&self) -> Result<Lu<T>, MatrixError> {
        let packed = self.decompose_lu()?;
        let n = packed.nrows();
        let l = packed.partial(n, n, 0, 0)?;
        let u = packed.partial(n, n, 0, n)?;
        Ok(Lu { packed, l, u })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: &Matrix<f64>, b: &Matrix<f64>, tol: f64) -> bool {
        !a.is_different_size(b)
            && a.to_vec()
                .iter()
                .zip(b.to_vec().iter())
                .all(|(x, y)| (x - y).abs() < tol)
    }

    #[test]
    fn packed_layout() {
        let a = Matrix::from_rows(2, 2, &[4.0, 3.0, 6.0, 3.0]);
        let lu = a.decompose_lu().unwrap();
        assert_eq!((lu.nrows(), lu.ncols()), (2, 4));
        assert_eq!(lu.to_vec(), [4.0, 0.0, 1.0, 0.75, 6.0, -1.5, 0.0, 1.0]);
    }

    #[test]
    fn reconstructs_3x3() {
        let a = Matrix::from_rows(3, 3, &[2.0, -1.0, 0.0, -1.0, 2.0, -1.0, 0.0, -1.0, 2.0]);
        let lu = a.lu().unwrap();
        assert!(approx_eq(&(lu.l() * lu.u()), &a, 1e-12));
        for i in 0..3 {
            assert_eq!(lu.u().get(i, i), 1.0);
            for j in 0..i {
                assert_eq!(lu.u().get(i, j), 0.0);
                assert_eq!(lu.l().get(j, i), 0.0);
            }
        }
    }

    #[test]
    fn factors_alias_packed() {
        let a = Matrix::from_rows(2, 2, &[1.0, 2.0, 3.0, 4.0]);
        let lu = a.lu().unwrap();
        assert!(lu.l().shares_buffer_with(lu.packed()));
        assert!(!lu.packed().shares_buffer_with(&a));
        let packed = lu.clone().into_packed();
        assert_eq!(packed.get(1, 3), 1.0);
    }

    #[test]
    fn needs_pivoting_is_singular() {
        let a = Matrix::from_rows(2, 2, &[0.0, 1.0, 1.0, 0.0]);
        assert_eq!(a.decompose_lu().unwrap_err(), MatrixError::Singular);
        let b = Matrix::from_rows(2, 2, &[1.0, 2.0, 2.0, 4.0]);
        assert_eq!(b.lu().unwrap_err(), MatrixError::Singular);
    }

    #[test]
    fn rank_deficient_floats_are_singular() {
        // Row 2 is three times row 1, up to the rounding of the literals.
        let a = Matrix::from_rows(2, 2, &[0.1_f64, 0.7, 0.3, 2.1]);
        assert_eq!(a.decompose_lu().unwrap_err(), MatrixError::Singular);

        let tiny = Matrix::from_rows(2, 2, &[1e-20, 0.0, 0.0, 1e-20]);
        assert!(tiny.lu().is_ok());
    }

    #[test]
    fn integer_elements_use_exact_pivots() {
        let a = Matrix::from_rows(2, 2, &[2, 4, 1, 3]);
        let packed = a.decompose_lu().unwrap();
        assert_eq!(packed.to_vec(), [2, 0, 1, 2, 1, 1, 0, 1]);
        let b = Matrix::from_rows(2, 2, &[2, 4, 1, 2]);
        assert_eq!(b.decompose_lu().unwrap_err(), MatrixError::Singular);
    }

    #[test]
    fn rejects_non_square() {
        let a = Matrix::<f64>::new(2, 3);
        assert_eq!(
            a.decompose_lu().unwrap_err(),
            MatrixError::NotSquare { rows: 2, cols: 3 }
        );
    }

    #[test]
    fn input_view_is_read_in_place() {
        let a = Matrix::from_rows(2, 2, &[4.0, 6.0, 3.0, 3.0]);
        let lu = a.transpose().lu().unwrap();
        assert_eq!(lu.l().to_vec(), [4.0, 0.0, 6.0, -1.5]);
    }
}
