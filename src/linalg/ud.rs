use crate::error::MatrixError;
use crate::matrix::PartialMatrix;
use crate::traits::{max_modulus, LinalgScalar, Scalar};
use crate::Matrix;

/// UD factors of a symmetric matrix, packed as `[U | D]`, with
/// `A = U * D * Uᵀ`.
///
/// `U` is unit upper triangular and `D` diagonal.
#[derive(Debug, Clone)]
pub struct Ud<T: Scalar> {
    packed: Matrix<T>,
    u: PartialMatrix<T>,
    d: PartialMatrix<T>,
}

impl<T: Scalar> Ud<T> {
    /// Unit upper factor, a view into [`packed`](Ud::packed).
    pub fn u(&self) -> &PartialMatrix<T> {
        &self.u
    }

    /// Diagonal factor, a view into [`packed`](Ud::packed).
    pub fn d(&self) -> &PartialMatrix<T> {
        &self.d
    }

    pub fn packed(&self) -> &Matrix<T> {
        &self.packed
    }

    pub fn into_packed(self) -> Matrix<T> {
        self.packed
    }
}

impl<T: LinalgScalar> Matrix<T> {
    /// UD decomposition of a symmetric matrix, as one `n x 2n` matrix `[U | D]`.
    ///
    /// Works from the last column backwards, deflating a scratch copy of the
    /// input. Fails with `NotSquare`, `NotSymmetric`, or `Singular` when a
    /// zero `D(i, i)` would have to divide. Float pivots count as zero within
    /// round-off of their input row, as in
    /// [`decompose_lu`](Matrix::decompose_lu).
    ///
    /// ```
    /// use sharemat::Matrix;
    /// let a = Matrix::from_rows(2, 2, &[4.0_f64, 2.0, 2.0, 3.0]);
    /// let ud = a.ud().unwrap();
    /// let back = ud.u() * ud.d() * ud.u().transpose();
    /// assert!((back.get(0, 0) - 4.0).abs() < 1e-12);
    /// assert!((back.get(0, 1) - 2.0).abs() < 1e-12);
    /// ```
    pub fn decompose_ud(&self) -> Result<Matrix<T>, MatrixError> {
        let n = self.require_square()?;
        if !self.is_symmetric() {
            return Err(MatrixError::NotSymmetric);
        }
        tracing::debug!(n, "UD decomposition");

        let p = self.copy();
        let ud = Matrix::new(n, 2 * n);
        for i in (0..n).rev() {
            let d = p.get(i, i);
            ud.set(i, i + n, d);
            ud.set(i, i, T::one());
            let scale = max_modulus((0..n).map(|j| self.get(i, j)));
            if i > 0 && T::negligible(d.modulus(), scale, n) {
                tracing::debug!(row = i, "zero diagonal in D");
                return Err(MatrixError::Singular);
            }
            for j in 0..i {
                let uji = p.get(j, i) / d;
                ud.set(j, i, uji);
                for k in 0..=j {
                    let cell = p.at(k, j);
                    cell.set(cell.get() - ud.get(k, i) * d * uji);
                }
            }
        }
        Ok(ud)
    }

    /// [`decompose_ud`](Matrix::decompose_ud) with `U` and `D` exposed as views.
    pub fn ud(&self) -> Result<Ud<T>, MatrixError> {
        let packed = self.decompose_ud()?;
        let n = packed.nrows();
        let u = packed.partial(n, n, 0, 0)?;
        let d = packed.partial(n, n, 0, n)?;
        Ok(Ud { packed, u, d })
    }
}
