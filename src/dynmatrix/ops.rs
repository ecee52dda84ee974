use crate::traits::{FloatScalar, Scalar};

use super::{DynMatrix, MatrixError};

/// Binary operation applied cell by cell.
///
/// Used both for matrix–matrix ops (`op(a[i,j], b[i,j])`) and for
/// matrix–scalar ops (`op(a[i,j], alpha)`).
///
/// ```
/// use spectral_core::dynmatrix::Cellwise;
/// assert_eq!(Cellwise::Sub.apply(5.0_f64, 2.0), 3.0);
/// assert!((Cellwise::Pow.apply(2.0_f64, 3.0) - 8.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cellwise {
    Add,
    Sub,
    Mul,
    Div,
    /// `a.powf(b)`.
    Pow,
}

impl Cellwise {
    #[inline]
    pub fn apply<T: FloatScalar>(self, a: T, b: T) -> T {
        match self {
            Cellwise::Add => a + b,
            Cellwise::Sub => a - b,
            Cellwise::Mul => a * b,
            Cellwise::Div => a / b,
            Cellwise::Pow => a.powf(b),
        }
    }
}

#[inline]
fn assert_same_shape<T>(op: &str, a: &DynMatrix<T>, b: &DynMatrix<T>) {
    assert_eq!(
        a.shape(),
        b.shape(),
        "dimension mismatch: {}x{} {} {}x{}",
        a.nrows(),
        a.ncols(),
        op,
        b.nrows(),
        b.ncols(),
    );
}

// ── Cellwise and scalar ops ─────────────────────────────────────────

impl<T: FloatScalar> DynMatrix<T> {
    /// `self[i,j] = op(lhs[i,j], rhs[i,j])` for every cell.
    ///
    /// Panics unless `self`, `lhs` and `rhs` share a shape.
    ///
    /// ```
    /// use spectral_core::DynMatrix;
    /// use spectral_core::dynmatrix::Cellwise;
    ///
    /// let a = DynMatrix::from_rows(1, 2, &[6.0_f64, 8.0]).unwrap();
    /// let b = DynMatrix::from_rows(1, 2, &[2.0, 4.0]).unwrap();
    /// let mut dst = DynMatrix::like(&a).unwrap();
    /// dst.cellwise_from(&a, &b, Cellwise::Div);
    /// assert_eq!(dst[(0, 0)], 3.0);
    /// assert_eq!(dst[(0, 1)], 2.0);
    /// ```
    pub fn cellwise_from(&mut self, lhs: &Self, rhs: &Self, op: Cellwise) {
        assert_same_shape("cellwise", lhs, rhs);
        assert_same_shape("into", lhs, self);
        for i in 0..self.nrows() {
            for j in 0..self.ncols() {
                self.set(i, j, op.apply(lhs.at(i, j), rhs.at(i, j)));
            }
        }
    }

    /// `self[i,j] = op(self[i,j], rhs[i,j])` for every cell.
    pub fn cellwise_assign(&mut self, rhs: &Self, op: Cellwise) {
        assert_same_shape("cellwise", self, rhs);
        for i in 0..self.nrows() {
            for j in 0..self.ncols() {
                let v = op.apply(self.at(i, j), rhs.at(i, j));
                self.set(i, j, v);
            }
        }
    }

    /// Fresh matrix holding `op(self[i,j], rhs[i,j])`.
    pub fn cellwise(&self, rhs: &Self, op: Cellwise) -> Result<Self, MatrixError> {
        let mut out = DynMatrix::like(self)?;
        out.cellwise_from(self, rhs, op);
        Ok(out)
    }

    /// `self[i,j] = op(src[i,j], alpha)` for every cell.
    ///
    /// ```
    /// use spectral_core::DynMatrix;
    /// use spectral_core::dynmatrix::Cellwise;
    ///
    /// let a = DynMatrix::from_rows(1, 2, &[1.0_f64, 2.0]).unwrap();
    /// let mut dst = DynMatrix::like(&a).unwrap();
    /// dst.scalar_from(&a, 2.0, Cellwise::Pow);
    /// assert!((dst[(0, 1)] - 4.0).abs() < 1e-12);
    /// ```
    pub fn scalar_from(&mut self, src: &Self, alpha: T, op: Cellwise) {
        assert_same_shape("into", src, self);
        for i in 0..self.nrows() {
            for j in 0..self.ncols() {
                self.set(i, j, op.apply(src.at(i, j), alpha));
            }
        }
    }

    /// `self[i,j] = op(self[i,j], alpha)` for every cell.
    pub fn scalar_assign(&mut self, alpha: T, op: Cellwise) {
        for x in self.data.iter_mut() {
            *x = op.apply(*x, alpha);
        }
    }

    /// Fresh matrix holding `op(self[i,j], alpha)`.
    pub fn scalar(&self, alpha: T, op: Cellwise) -> Result<Self, MatrixError> {
        let mut out = DynMatrix::like(self)?;
        out.scalar_from(self, alpha, op);
        Ok(out)
    }

    /// Reversed power: `self[i,j] = base ^ src[i,j]`.
    ///
    /// ```
    /// use spectral_core::DynMatrix;
    /// let a = DynMatrix::from_rows(1, 3, &[0.0_f64, 1.0, 3.0]).unwrap();
    /// let mut dst = DynMatrix::like(&a).unwrap();
    /// dst.scalar_pow_from(&a, 2.0);
    /// assert!((dst[(0, 2)] - 8.0).abs() < 1e-12);
    /// ```
    pub fn scalar_pow_from(&mut self, src: &Self, base: T) {
        assert_same_shape("into", src, self);
        for i in 0..self.nrows() {
            for j in 0..self.ncols() {
                self.set(i, j, base.powf(src.at(i, j)));
            }
        }
    }

    /// Reversed power in place: `self[i,j] = base ^ self[i,j]`.
    pub fn scalar_pow_assign(&mut self, base: T) {
        for x in self.data.iter_mut() {
            *x = base.powf(*x);
        }
    }
}

// ── Matrix multiply ─────────────────────────────────────────────────

impl<T: Scalar> DynMatrix<T> {
    /// `self = lhs @ rhs`, classic triple loop accumulating in `T`.
    ///
    /// Operands are read through their transpose views, so passing a
    /// transposed `V` multiplies by `V^T` without copying. `self` cannot
    /// alias `lhs` or `rhs`.
    ///
    /// Panics unless `lhs.ncols() == rhs.nrows()` and `self` is
    /// `lhs.nrows() x rhs.ncols()`.
    ///
    /// ```
    /// use spectral_core::DynMatrix;
    /// let a = DynMatrix::from_rows(2, 2, &[1.0_f64, 2.0, 3.0, 4.0]).unwrap();
    /// let b = DynMatrix::from_rows(2, 1, &[1.0, 1.0]).unwrap();
    /// let mut c = DynMatrix::zeros(2, 1).unwrap();
    /// c.matmul_into(&a, &b);
    /// assert_eq!(c[(0, 0)], 3.0);
    /// assert_eq!(c[(1, 0)], 7.0);
    /// ```
    pub fn matmul_into(&mut self, lhs: &Self, rhs: &Self) {
        assert_eq!(
            lhs.ncols(),
            rhs.nrows(),
            "dimension mismatch: {}x{} * {}x{}",
            lhs.nrows(),
            lhs.ncols(),
            rhs.nrows(),
            rhs.ncols(),
        );
        assert_eq!(
            self.shape(),
            (lhs.nrows(), rhs.ncols()),
            "dimension mismatch: product is {}x{}, destination is {}x{}",
            lhs.nrows(),
            rhs.ncols(),
            self.nrows(),
            self.ncols(),
        );
        let inner = lhs.ncols();
        for i in 0..self.nrows() {
            for j in 0..self.ncols() {
                let mut acc = T::zero();
                for k in 0..inner {
                    acc = acc + lhs.at(i, k) * rhs.at(k, j);
                }
                self.set(i, j, acc);
            }
        }
    }

    /// Fresh matrix holding `self @ rhs`.
    pub fn matmul(&self, rhs: &Self) -> Result<Self, MatrixError> {
        let mut out = DynMatrix::zeros(self.nrows(), rhs.ncols())?.with_bounds_check(self.bounds);
        out.matmul_into(self, rhs);
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f64 = 1e-12;

    fn assert_near(a: f64, b: f64, tol: f64, msg: &str) {
        assert!(
            (a - b).abs() < tol,
            "{}: {} vs {} (diff {})",
            msg,
            a,
            b,
            (a - b).abs()
        );
    }

    fn sample() -> DynMatrix<f64> {
        DynMatrix::from_rows(2, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap()
    }

    #[test]
    fn cellwise_all_ops() {
        let a = DynMatrix::from_rows(1, 2, &[6.0_f64, 2.0]).unwrap();
        let b = DynMatrix::from_rows(1, 2, &[3.0, 3.0]).unwrap();
        let cases = [
            (Cellwise::Add, [9.0, 5.0]),
            (Cellwise::Sub, [3.0, -1.0]),
            (Cellwise::Mul, [18.0, 6.0]),
            (Cellwise::Div, [2.0, 2.0 / 3.0]),
            (Cellwise::Pow, [216.0, 8.0]),
        ];
        for (op, expected) in cases {
            let c = a.cellwise(&b, op).unwrap();
            assert_near(c[(0, 0)], expected[0], TOL, &format!("{:?}", op));
            assert_near(c[(0, 1)], expected[1], TOL, &format!("{:?}", op));
        }
    }

    #[test]
    fn cellwise_assign_in_place() {
        let mut a = sample();
        let b = sample();
        a.cellwise_assign(&b, Cellwise::Add);
        assert_eq!(a[(1, 2)], 12.0);
    }

    #[test]
    fn cellwise_respects_transpose() {
        let a = sample();
        let mut b = DynMatrix::from_rows(3, 2, &[1.0, 4.0, 2.0, 5.0, 3.0, 6.0]).unwrap();
        b.transpose();
        let c = a.cellwise(&b, Cellwise::Sub).unwrap();
        for i in 0..2 {
            for j in 0..3 {
                assert_eq!(c[(i, j)], 0.0);
            }
        }
    }

    #[test]
    #[should_panic(expected = "dimension mismatch")]
    fn cellwise_shape_mismatch() {
        let a = sample();
        let b = DynMatrix::<f64>::zeros(3, 2).unwrap();
        let _ = a.cellwise(&b, Cellwise::Add);
    }

    #[test]
    #[should_panic(expected = "dimension mismatch")]
    fn cellwise_destination_mismatch() {
        let a = sample();
        let mut dst = DynMatrix::<f64>::zeros(2, 2).unwrap();
        dst.cellwise_from(&a, &a, Cellwise::Mul);
    }

    #[test]
    fn scalar_ops() {
        let a = sample();
        assert_eq!(a.scalar(1.0, Cellwise::Add).unwrap()[(0, 0)], 2.0);
        assert_eq!(a.scalar(1.0, Cellwise::Sub).unwrap()[(0, 0)], 0.0);
        assert_eq!(a.scalar(2.0, Cellwise::Mul).unwrap()[(1, 2)], 12.0);
        assert_eq!(a.scalar(2.0, Cellwise::Div).unwrap()[(1, 1)], 2.5);
        assert_near(a.scalar(2.0, Cellwise::Pow).unwrap()[(1, 0)], 16.0, TOL, "pow");
    }

    #[test]
    fn scalar_assign_fill_pattern() {
        // Zero then shift: how a filled matrix can be rebuilt in place.
        let mut a = sample();
        a.scalar_assign(0.0, Cellwise::Mul);
        a.scalar_assign(7.0, Cellwise::Add);
        assert_eq!(a, DynMatrix::fill(2, 3, 7.0).unwrap());
    }

    #[test]
    fn scalar_pow_reversed() {
        let a = DynMatrix::from_rows(1, 3, &[0.0_f64, 0.5, 2.0]).unwrap();
        let mut b = a.clone();
        b.scalar_pow_assign(4.0);
        assert_near(b[(0, 0)], 1.0, TOL, "4^0");
        assert_near(b[(0, 1)], 2.0, TOL, "4^0.5");
        assert_near(b[(0, 2)], 16.0, TOL, "4^2");
    }

    #[test]
    fn matmul_known() {
        let a = sample();
        let b = DynMatrix::from_rows(3, 2, &[7.0, 8.0, 9.0, 10.0, 11.0, 12.0]).unwrap();
        let c = a.matmul(&b).unwrap();
        assert_eq!(c.shape(), (2, 2));
        assert_eq!(c[(0, 0)], 58.0);
        assert_eq!(c[(0, 1)], 64.0);
        assert_eq!(c[(1, 0)], 139.0);
        assert_eq!(c[(1, 1)], 154.0);
    }

    #[test]
    fn matmul_identity() {
        let m = DynMatrix::from_fn(4, 4, |i, j| (i as f64) - 2.0 * (j as f64) + 0.5).unwrap();
        let id = DynMatrix::eye(4).unwrap();
        assert_eq!(m.matmul(&id).unwrap(), m);
        assert_eq!(id.matmul(&m).unwrap(), m);
    }

    #[test]
    fn matmul_transposed_operand() {
        // A^T A through the view equals the explicit product.
        let a = sample();
        let at = a.clone().into_transpose();
        let explicit = DynMatrix::from_rows(3, 2, &[1.0, 4.0, 2.0, 5.0, 3.0, 6.0]).unwrap();
        assert_eq!(at.matmul(&a).unwrap(), explicit.matmul(&a).unwrap());
    }

    #[test]
    fn matmul_into_transposed_destination() {
        let a = DynMatrix::from_rows(2, 2, &[1.0, 2.0, 3.0, 4.0]).unwrap();
        let mut dst = DynMatrix::<f64>::zeros(2, 2).unwrap().into_transpose();
        dst.matmul_into(&a, &a);
        assert_eq!(dst[(0, 0)], 7.0);
        assert_eq!(dst[(0, 1)], 10.0);
        assert_eq!(dst[(1, 0)], 15.0);
        assert_eq!(dst[(1, 1)], 22.0);
    }

    #[test]
    #[should_panic(expected = "dimension mismatch")]
    fn matmul_inner_mismatch() {
        let a = sample();
        let _ = a.matmul(&a);
    }
}
