use alloc::vec::Vec;

use crate::traits::Scalar;

use super::{DynMatrix, MatrixError};

impl<T: Scalar> DynMatrix<T> {
    /// Create a square diagonal matrix from a slice.
    ///
    /// ```
    /// use spectral_core::DynMatrix;
    /// let m = DynMatrix::from_diag(&[2.0_f64, 3.0]).unwrap();
    /// assert_eq!(m[(0, 0)], 2.0);
    /// assert_eq!(m[(1, 1)], 3.0);
    /// assert_eq!(m[(0, 1)], 0.0);
    /// ```
    pub fn from_diag(values: &[T]) -> Result<Self, MatrixError> {
        let n = values.len();
        let mut m = Self::zeros(n, n)?;
        for (i, &v) in values.iter().enumerate() {
            m[(i, i)] = v;
        }
        Ok(m)
    }

    /// Extract the diagonal, `min(nrows, ncols)` entries.
    ///
    /// ```
    /// use spectral_core::DynMatrix;
    /// let m = DynMatrix::from_rows(2, 2, &[1.0, 2.0, 3.0, 4.0]).unwrap();
    /// assert_eq!(m.diag(), vec![1.0, 4.0]);
    /// ```
    pub fn diag(&self) -> Vec<T> {
        let n = self.nrows().min(self.ncols());
        (0..n).map(|i| self.at(i, i)).collect()
    }

    /// Sum of diagonal elements.
    pub fn trace(&self) -> T {
        let n = self.nrows().min(self.ncols());
        let mut sum = T::zero();
        for i in 0..n {
            sum = sum + self.at(i, i);
        }
        sum
    }

    /// Check if the matrix is symmetric (`A == A^T`), exactly.
    pub fn is_symmetric(&self) -> bool {
        if !self.is_square() {
            return false;
        }
        let n = self.nrows();
        for i in 0..n {
            for j in (i + 1)..n {
                if self.at(i, j) != self.at(j, i) {
                    return false;
                }
            }
        }
        true
    }

    /// Off-diagonal energy: the sum of `A[i,j]^2` over all `i != j`.
    ///
    /// Zero exactly when the matrix is diagonal. The Jacobi solver uses the
    /// decrease of this quantity as its convergence metric.
    ///
    /// Panics if the matrix is not square.
    ///
    /// ```
    /// use spectral_core::DynMatrix;
    /// let m = DynMatrix::from_rows(2, 2, &[1.0_f64, 2.0, -3.0, 4.0]).unwrap();
    /// assert_eq!(m.off_diagonal_energy(), 13.0);
    /// ```
    pub fn off_diagonal_energy(&self) -> T {
        assert!(
            self.is_square(),
            "off-diagonal energy requires a square matrix, got {}x{}",
            self.nrows(),
            self.ncols(),
        );
        let n = self.nrows();
        let mut off = T::zero();
        for i in 0..n {
            for j in 0..n {
                if i != j {
                    let x = self.at(i, j);
                    off = off + x * x;
                }
            }
        }
        off
    }

    /// Whether every off-diagonal entry is exactly zero.
    ///
    /// Panics if the matrix is not square.
    pub fn is_diagonal(&self) -> bool {
        self.off_diagonal_energy() == T::zero()
    }
}
