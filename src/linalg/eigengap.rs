use alloc::vec::Vec;
use core::cmp::Ordering;

use log::debug;

use crate::dynmatrix::{DynMatrix, MatrixError};
use crate::traits::FloatScalar;

use super::jacobi::JacobiEigen;

/// Indices that sort `values` descending. Stable: equal values keep their
/// original relative order. NaNs compare equal to everything.
pub fn argsort_desc<T: FloatScalar>(values: &[T]) -> Vec<usize> {
    let mut idx: Vec<usize> = (0..values.len()).collect();
    idx.sort_by(|&a, &b| values[b].partial_cmp(&values[a]).unwrap_or(Ordering::Equal));
    idx
}

/// Sort eigenpairs by eigenvalue, descending, in place.
///
/// The permutation is derived once from the diagonal of `eigenvalues` and
/// applied to the columns of `eigenvectors` and to both the rows and the
/// columns of `eigenvalues`, so the latter stays diagonal and column `k` of
/// `eigenvectors` still pairs with `eigenvalues[(k, k)]`.
///
/// Panics if `eigenvalues` is not square or `eigenvectors` does not have
/// one column per eigenvalue.
pub fn sort_eigenpairs_desc<T: FloatScalar>(
    eigenvalues: &mut DynMatrix<T>,
    eigenvectors: &mut DynMatrix<T>,
) -> Result<(), MatrixError> {
    assert!(
        eigenvalues.is_square(),
        "eigenvalue matrix must be square, got {}x{}",
        eigenvalues.nrows(),
        eigenvalues.ncols(),
    );
    assert_eq!(
        eigenvectors.ncols(),
        eigenvalues.nrows(),
        "dimension mismatch: {} eigenvector columns for {} eigenvalues",
        eigenvectors.ncols(),
        eigenvalues.nrows(),
    );
    let perm = argsort_desc(&eigenvalues.diag());
    eigenvectors.permute_cols(&perm)?;
    eigenvalues.permute_cols(&perm)?;
    eigenvalues.permute_rows(&perm)?;
    Ok(())
}

/// Largest gap among the leading half of a descending spectrum.
///
/// Scans `i` in `0..n/2` for the maximum of `values[i] - values[i + 1]`;
/// the first maximum wins. Returns `(i, gap)`.
///
/// Panics if `values.len() < 2`.
///
/// ```
/// use spectral_core::linalg::eigengap_index;
/// let (i, gap) = eigengap_index(&[5.0_f64, 4.0, 3.0, 1.0, 0.9, 0.1]);
/// assert_eq!(i, 2);
/// assert_eq!(gap, 2.0);
/// ```
pub fn eigengap_index<T: FloatScalar>(values: &[T]) -> (usize, T) {
    let half_n = values.len() / 2;
    assert!(
        half_n >= 1,
        "eigengap selection needs at least 2 eigenvalues, got {}",
        values.len(),
    );
    let mut best = 0;
    let mut best_gap = values[0] - values[1];
    for i in 1..half_n {
        let gap = values[i] - values[i + 1];
        if gap > best_gap {
            best = i;
            best_gap = gap;
        }
    }
    (best, best_gap)
}

/// First `k` eigenvector columns with every row scaled to unit length.
///
/// This is the point embedding handed to the clustering stage. Rows with
/// zero norm stay zero. Panics if `k` exceeds the number of columns.
pub fn spectral_embedding<T: FloatScalar>(
    sorted_eigenvectors: &DynMatrix<T>,
    k: usize,
) -> Result<DynMatrix<T>, MatrixError> {
    let mut u = sorted_eigenvectors.leading_cols(k)?;
    u.normalize_rows();
    Ok(u)
}

/// Eigenpairs sorted descending together with the eigengap choice of `k`.
///
/// # Example
///
/// ```
/// use spectral_core::{DynMatrix, SpectralSelection};
///
/// let vals = DynMatrix::from_diag(&[1.0_f64, 5.0, 3.0, 4.0, 0.1, 0.9]).unwrap();
/// let vecs = DynMatrix::eye(6).unwrap();
/// let sel = SpectralSelection::new(vals, vecs).unwrap();
///
/// assert_eq!(sel.eigenvalues().diag(), vec![5.0, 4.0, 3.0, 1.0, 0.9, 0.1]);
/// assert_eq!(sel.gap_index(), 2);
/// assert_eq!(sel.k(), 3);
/// ```
#[derive(Debug, Clone)]
pub struct SpectralSelection<T> {
    k: usize,
    gap_index: usize,
    gap: T,
    eigenvalues: DynMatrix<T>,
    eigenvectors: DynMatrix<T>,
}

impl<T: FloatScalar> SpectralSelection<T> {
    /// Sort the eigenpairs descending and pick `k`.
    ///
    /// Panics on fewer than 2 eigenvalues, or on the shape mismatches
    /// [`sort_eigenpairs_desc`] rejects.
    pub fn new(mut eigenvalues: DynMatrix<T>, mut eigenvectors: DynMatrix<T>) -> Result<Self, MatrixError> {
        sort_eigenpairs_desc(&mut eigenvalues, &mut eigenvectors)?;
        let (gap_index, gap) = eigengap_index(&eigenvalues.diag());
        debug!(
            "eigengap: largest gap {} after index {} of {}, k = {}",
            gap,
            gap_index,
            eigenvalues.nrows(),
            gap_index + 1,
        );
        Ok(Self {
            k: gap_index + 1,
            gap_index,
            gap,
            eigenvalues,
            eigenvectors,
        })
    }

    /// Number of clusters: `gap_index() + 1`.
    pub fn k(&self) -> usize {
        self.k
    }

    /// 0-based index `i` of the selected gap `lambda[i] - lambda[i + 1]`.
    pub fn gap_index(&self) -> usize {
        self.gap_index
    }

    pub fn gap(&self) -> T {
        self.gap
    }

    /// Diagonal eigenvalue matrix, sorted descending.
    pub fn eigenvalues(&self) -> &DynMatrix<T> {
        &self.eigenvalues
    }

    /// Eigenvectors, columns in the same order as the eigenvalues.
    pub fn eigenvectors(&self) -> &DynMatrix<T> {
        &self.eigenvectors
    }

    /// [`spectral_embedding`] of the sorted eigenvectors with this `k`.
    pub fn embedding(&self) -> Result<DynMatrix<T>, MatrixError> {
        spectral_embedding(&self.eigenvectors, self.k)
    }

    /// `(k, eigenvalues, eigenvectors)`.
    pub fn into_parts(self) -> (usize, DynMatrix<T>, DynMatrix<T>) {
        (self.k, self.eigenvalues, self.eigenvectors)
    }
}

/// Sort eigenpairs descending and choose `k` by the eigengap heuristic.
///
/// Returns `(k, sorted_eigenvalues, sorted_eigenvectors)`; the inputs are
/// left as they are. See [`SpectralSelection`] for the owned variant.
pub fn select_k<T: FloatScalar>(
    eigenvalues: &DynMatrix<T>,
    eigenvectors: &DynMatrix<T>,
) -> Result<(usize, DynMatrix<T>, DynMatrix<T>), MatrixError> {
    let sel = SpectralSelection::new(eigenvalues.try_clone()?, eigenvectors.try_clone()?)?;
    Ok(sel.into_parts())
}

impl<T: FloatScalar> JacobiEigen<T> {
    /// Reorder the eigenpairs by eigenvalue, descending.
    pub fn into_sorted_desc(self) -> Result<Self, MatrixError> {
        let rotations = self.rotations();
        let converged = self.converged();
        let (mut vecs, mut vals) = self.into_parts();
        sort_eigenpairs_desc(&mut vals, &mut vecs)?;
        Ok(JacobiEigen::from_parts(vecs, vals, rotations, converged))
    }

    /// Sort descending and choose `k` by the eigengap heuristic.
    ///
    /// Panics if the matrix is smaller than 2x2.
    pub fn select_k(self) -> Result<SpectralSelection<T>, MatrixError> {
        let (vecs, vals) = self.into_parts();
        SpectralSelection::new(vals, vecs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

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

    #[test]
    fn argsort_descending() {
        assert_eq!(argsort_desc(&[1.0, 5.0, 3.0]), vec![1, 2, 0]);
    }

    #[test]
    fn argsort_stable_on_ties() {
        assert_eq!(argsort_desc(&[2.0, 7.0, 2.0, 7.0]), vec![1, 3, 0, 2]);
    }

    #[test]
    fn argsort_empty() {
        assert!(argsort_desc::<f64>(&[]).is_empty());
    }

    #[test]
    fn eigengap_searches_first_half() {
        let (i, gap) = eigengap_index(&[5.0, 4.0, 3.0, 1.0, 0.9, 0.1]);
        assert_eq!(i, 2);
        assert_eq!(gap, 2.0);
    }

    #[test]
    fn eigengap_ignores_second_half() {
        // The gap 1.0 -> -10.0 sits after index n/2 - 1 and must not win.
        let (i, _) = eigengap_index(&[3.0, 2.5, 1.0, -10.0]);
        assert_eq!(i, 1);
    }

    #[test]
    fn eigengap_first_maximum_wins() {
        let (i, gap) = eigengap_index(&[3.0, 2.0, 1.0, 0.0]);
        assert_eq!(i, 0);
        assert_eq!(gap, 1.0);
    }

    #[test]
    fn eigengap_two_values() {
        assert_eq!(eigengap_index(&[4.0, 1.0]), (0, 3.0));
        // n = 3 still only looks at index 0.
        assert_eq!(eigengap_index(&[4.0, 3.5, -8.0]), (0, 0.5));
    }

    #[test]
    #[should_panic(expected = "at least 2 eigenvalues")]
    fn eigengap_needs_two() {
        eigengap_index(&[1.0]);
    }

    #[test]
    fn sort_keeps_pairs_together() {
        let mut vals = DynMatrix::from_diag(&[1.0, 3.0, 2.0]).unwrap();
        let mut vecs = DynMatrix::from_fn(3, 3, |i, j| (10 * i + j) as f64).unwrap();
        let old = vecs.clone();
        sort_eigenpairs_desc(&mut vals, &mut vecs).unwrap();

        assert_eq!(vals.diag(), vec![3.0, 2.0, 1.0]);
        assert!(vals.is_diagonal());
        for i in 0..3 {
            assert_eq!(vecs[(i, 0)], old[(i, 1)]);
            assert_eq!(vecs[(i, 1)], old[(i, 2)]);
            assert_eq!(vecs[(i, 2)], old[(i, 0)]);
        }
    }

    #[test]
    fn sort_preserves_near_diagonal_entries() {
        let mut vals = DynMatrix::from_rows(2, 2, &[1.0, 1e-9, 1e-9, 2.0]).unwrap();
        let mut vecs = DynMatrix::eye(2).unwrap();
        sort_eigenpairs_desc(&mut vals, &mut vecs).unwrap();
        assert_eq!(vals.diag(), vec![2.0, 1.0]);
        assert_eq!(vals[(0, 1)], 1e-9);
    }

    #[test]
    #[should_panic(expected = "dimension mismatch")]
    fn sort_shape_mismatch() {
        let mut vals = DynMatrix::<f64>::eye(3).unwrap();
        let mut vecs = DynMatrix::<f64>::eye(2).unwrap();
        let _ = sort_eigenpairs_desc(&mut vals, &mut vecs);
    }

    #[test]
    fn selection_from_unsorted() {
        let vals = DynMatrix::from_diag(&[1.0, 5.0, 3.0, 4.0, 0.1, 0.9]).unwrap();
        let vecs = DynMatrix::from_fn(6, 6, |i, j| (10 * i + j) as f64).unwrap();
        let sel = SpectralSelection::new(vals, vecs).unwrap();
        assert_eq!(sel.eigenvalues().diag(), vec![5.0, 4.0, 3.0, 1.0, 0.9, 0.1]);
        assert_eq!(sel.gap_index(), 2);
        assert_eq!(sel.gap(), 2.0);
        assert_eq!(sel.k(), 3);
        // Largest eigenvalue came from column 1.
        assert_eq!(sel.eigenvectors()[(4, 0)], 41.0);
    }

    #[test]
    fn select_k_leaves_inputs() {
        let vals = DynMatrix::from_diag(&[1.0, 4.0]).unwrap();
        let vecs = DynMatrix::eye(2).unwrap();
        let (k, svals, svecs) = select_k(&vals, &vecs).unwrap();
        assert_eq!(k, 1);
        assert_eq!(svals.diag(), vec![4.0, 1.0]);
        assert_eq!(svecs[(1, 0)], 1.0);
        assert_eq!(vals.diag(), vec![1.0, 4.0]);
    }

    #[test]
    fn embedding_rows_unit_length() {
        let vecs = DynMatrix::from_rows(3, 3, &[3.0, 4.0, 9.0, 0.0, 0.0, 9.0, 1.0, 0.0, 9.0]).unwrap();
        let t = spectral_embedding(&vecs, 2).unwrap();
        assert_eq!(t.shape(), (3, 2));
        assert_near(t[(0, 0)], 0.6, 1e-12, "row 0");
        assert_near(t[(0, 1)], 0.8, 1e-12, "row 0");
        assert_eq!(t[(1, 0)], 0.0);
        assert_eq!(t[(1, 1)], 0.0);
        assert_eq!(t[(2, 0)], 1.0);
    }

    #[test]
    fn jacobi_sorted_desc() {
        let a = DynMatrix::from_rows(3, 3, &[1.0, 0.0, 0.0, 0.0, 3.0, 1.0, 0.0, 1.0, 3.0]).unwrap();
        let eig = a.eig_jacobi().unwrap().into_sorted_desc().unwrap();
        let vals = eig.eigenvalue_vec();
        assert_near(vals[0], 4.0, 1e-10, "lambda0");
        assert_near(vals[1], 2.0, 1e-10, "lambda1");
        assert_near(vals[2], 1.0, 1e-10, "lambda2");
        assert!(eig.converged());

        // Column 0 is (0, 1, 1)/sqrt(2) up to sign.
        let v = eig.eigenvectors();
        assert_near(v[(0, 0)], 0.0, 1e-10, "v00");
        assert_near(v[(1, 0)].abs(), core::f64::consts::FRAC_1_SQRT_2, 1e-10, "v10");
        assert_near(v[(1, 0)], v[(2, 0)], 1e-10, "v10 = v20");
    }

    #[test]
    fn jacobi_select_k() {
        let a = DynMatrix::from_rows(4, 4, &[
            5.0, 0.1, 0.0, 0.0, //
            0.1, 5.0, 0.0, 0.0, //
            0.0, 0.0, 1.0, 0.1, //
            0.0, 0.0, 0.1, 1.0,
        ])
        .unwrap();
        let sel = a.eig_jacobi().unwrap().select_k().unwrap();
        // Spectrum 5.1, 4.9, 1.1, 0.9: largest leading gap is after index 1.
        assert_eq!(sel.gap_index(), 1);
        assert_eq!(sel.k(), 2);
        assert_eq!(sel.embedding().unwrap().shape(), (4, 2));
    }
}
