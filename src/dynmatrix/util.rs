use alloc::vec;
use core::fmt::{self, Write as _};

use crate::traits::{FloatScalar, Scalar};

use super::{try_alloc, DynMatrix, MatrixError};

// ── Row / Column manipulation ───────────────────────────────────────

impl<T: Copy> DynMatrix<T> {
    /// Swap two columns in place.
    ///
    /// ```
    /// use spectral_core::DynMatrix;
    /// let mut m = DynMatrix::from_rows(2, 2, &[1.0, 2.0, 3.0, 4.0]).unwrap();
    /// m.swap_cols(0, 1);
    /// assert_eq!(m[(0, 0)], 2.0);
    /// assert_eq!(m[(0, 1)], 1.0);
    /// ```
    pub fn swap_cols(&mut self, a: usize, b: usize) {
        if a != b {
            for i in 0..self.nrows() {
                let tmp = self.at(i, a);
                self.set(i, a, self.at(i, b));
                self.set(i, b, tmp);
            }
        }
    }
}

/// Whether `indices` is a permutation of `0..n`.
fn is_permutation(indices: &[usize], n: usize) -> bool {
    if indices.len() != n {
        return false;
    }
    let mut seen = vec![false; n];
    for &k in indices {
        if k >= n || seen[k] {
            return false;
        }
        seen[k] = true;
    }
    true
}

impl<T: Scalar> DynMatrix<T> {
    /// Reorder columns: `new[:, j] = old[:, indices[j]]`.
    ///
    /// Precondition: `indices` is a permutation of `0..ncols`. Only the
    /// length is checked in release builds; duplicates or out-of-range
    /// entries are caught by a debug assertion and otherwise produce an
    /// unspecified (but memory-safe) result.
    ///
    /// The result is stored untransposed, whatever the view was before.
    ///
    /// ```
    /// use spectral_core::DynMatrix;
    /// let mut m = DynMatrix::from_rows(1, 3, &[10.0, 20.0, 30.0]).unwrap();
    /// m.permute_cols(&[2, 0, 1]).unwrap();
    /// assert_eq!(m.diag(), vec![30.0]);
    /// assert_eq!(m[(0, 1)], 10.0);
    /// assert_eq!(m[(0, 2)], 20.0);
    /// ```
    pub fn permute_cols(&mut self, indices: &[usize]) -> Result<(), MatrixError> {
        let (m, n) = self.shape();
        assert_eq!(
            indices.len(),
            n,
            "permutation has {} entries for {} columns",
            indices.len(),
            n,
        );
        debug_assert!(
            is_permutation(indices, n),
            "column indices must be a permutation of 0..{}",
            n,
        );
        let mut data = try_alloc(m * n, T::zero())?;
        for (j, &src) in indices.iter().enumerate() {
            for i in 0..m {
                data[i * n + j] = self.at(i, src);
            }
        }
        self.data = data;
        self.rows = m;
        self.cols = n;
        self.transposed = false;
        Ok(())
    }

    /// Reorder rows: `new[i, :] = old[indices[i], :]`.
    ///
    /// Same precondition as [`permute_cols`](DynMatrix::permute_cols);
    /// implemented as a column permutation of the transpose view.
    pub fn permute_rows(&mut self, indices: &[usize]) -> Result<(), MatrixError> {
        self.transpose();
        let result = self.permute_cols(indices);
        self.transpose();
        result
    }

    /// New matrix holding the first `k` columns.
    ///
    /// Panics if `k > ncols`.
    pub fn leading_cols(&self, k: usize) -> Result<Self, MatrixError> {
        assert!(
            k <= self.ncols(),
            "requested {} leading columns of a {}x{} matrix",
            k,
            self.nrows(),
            self.ncols(),
        );
        let mut out = DynMatrix::zeros(self.nrows(), k)?.with_bounds_check(self.bounds);
        for i in 0..self.nrows() {
            for j in 0..k {
                out.set(i, j, self.at(i, j));
            }
        }
        Ok(out)
    }
}

impl<T: FloatScalar> DynMatrix<T> {
    /// Divide every row by its Euclidean norm, in place.
    ///
    /// Rows whose norm is zero are left unchanged.
    ///
    /// ```
    /// use spectral_core::DynMatrix;
    /// let mut m = DynMatrix::from_rows(2, 2, &[3.0_f64, 4.0, 0.0, 0.0]).unwrap();
    /// m.normalize_rows();
    /// assert!((m[(0, 0)] - 0.6).abs() < 1e-12);
    /// assert!((m[(0, 1)] - 0.8).abs() < 1e-12);
    /// assert_eq!(m[(1, 0)], 0.0);
    /// ```
    pub fn normalize_rows(&mut self) {
        for i in 0..self.nrows() {
            let mut sum_sq = T::zero();
            for j in 0..self.ncols() {
                let x = self.at(i, j);
                sum_sq = sum_sq + x * x;
            }
            let norm = sum_sq.sqrt();
            if norm == T::zero() {
                continue;
            }
            for j in 0..self.ncols() {
                let x = self.at(i, j);
                self.set(i, j, x / norm);
            }
        }
    }
}

// ── Diagnostic printing ─────────────────────────────────────────────

/// Number formatting for [`Csv`] and [`DiagonalCsv`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Precision {
    /// Four decimals, `%.4f` style.
    #[default]
    Short,
    /// Shortest representation that round-trips to the same value.
    Full,
}

impl Precision {
    #[inline]
    fn write<T: fmt::Display>(self, f: &mut fmt::Formatter<'_>, x: T) -> fmt::Result {
        match self {
            Precision::Short => write!(f, "{:.4}", x),
            Precision::Full => write!(f, "{}", x),
        }
    }
}

/// Comma-separated rendering of a matrix, one line per row.
///
/// Created by [`DynMatrix::csv`].
pub struct Csv<'a, T> {
    matrix: &'a DynMatrix<T>,
    precision: Precision,
}

/// The diagonal of a matrix on a single comma-separated line.
///
/// Created by [`DynMatrix::diagonal_csv`].
pub struct DiagonalCsv<'a, T> {
    matrix: &'a DynMatrix<T>,
    precision: Precision,
}

impl<T> DynMatrix<T> {
    /// Render as comma-separated rows, each terminated by a newline.
    ///
    /// ```
    /// use spectral_core::{DynMatrix, Precision};
    /// let m = DynMatrix::from_rows(2, 2, &[1.0_f64, -0.5, 2.0, 1.0 / 3.0]).unwrap();
    /// assert_eq!(
    ///     m.csv(Precision::Short).to_string(),
    ///     "1.0000,-0.5000\n2.0000,0.3333\n",
    /// );
    /// assert_eq!(m.csv(Precision::Full).to_string().lines().next(), Some("1,-0.5"));
    /// ```
    pub fn csv(&self, precision: Precision) -> Csv<'_, T> {
        Csv {
            matrix: self,
            precision,
        }
    }

    /// Render the diagonal (`min(nrows, ncols)` entries) as one line.
    ///
    /// ```
    /// use spectral_core::{DynMatrix, Precision};
    /// let m = DynMatrix::from_diag(&[3.0_f64, 1.0]).unwrap();
    /// assert_eq!(m.diagonal_csv(Precision::Short).to_string(), "3.0000,1.0000\n");
    /// ```
    pub fn diagonal_csv(&self, precision: Precision) -> DiagonalCsv<'_, T> {
        DiagonalCsv {
            matrix: self,
            precision,
        }
    }
}

impl<T: Copy + fmt::Display> fmt::Display for Csv<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let m = self.matrix;
        for i in 0..m.nrows() {
            for j in 0..m.ncols() {
                if j > 0 {
                    f.write_char(',')?;
                }
                self.precision.write(f, m.at(i, j))?;
            }
            f.write_char('\n')?;
        }
        Ok(())
    }
}

impl<T: Copy + fmt::Display> fmt::Display for DiagonalCsv<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let m = self.matrix;
        let n = m.nrows().min(m.ncols());
        for i in 0..n {
            if i > 0 {
                f.write_char(',')?;
            }
            self.precision.write(f, m.at(i, i))?;
        }
        f.write_char('\n')
    }
}

/// Same as `csv(Precision::Short)`.
impl<T: Copy + fmt::Display> fmt::Display for DynMatrix<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.csv(Precision::Short), f)
    }
}
