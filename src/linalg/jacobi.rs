use alloc::vec::Vec;

use log::{debug, trace, warn};

use crate::dynmatrix::{DynMatrix, MatrixError};
use crate::traits::FloatScalar;

/// Settings for the Jacobi eigensolver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JacobiSettings<T> {
    /// Stop once a rotation lowers the off-diagonal energy by less than
    /// this amount (default: 1e-5).
    pub epsilon: T,
    /// Hard cap on the number of rotations (default: 100).
    pub max_rotations: usize,
}

impl Default for JacobiSettings<f64> {
    fn default() -> Self {
        Self {
            epsilon: 1e-5,
            max_rotations: 100,
        }
    }
}

impl Default for JacobiSettings<f32> {
    fn default() -> Self {
        Self {
            epsilon: 1e-5,
            max_rotations: 100,
        }
    }
}

/// Planar rotation in the `(i, j)` plane.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Rotation<T> {
    c: T,
    s: T,
}

impl<T: FloatScalar> Rotation<T> {
    /// Rotation that annihilates `a[(i, j)]` of a symmetric matrix.
    ///
    /// A zero pivot gives the identity rotation.
    fn for_pivot(a: &DynMatrix<T>, i: usize, j: usize) -> Self {
        let aij = a.at(i, j);
        if aij == T::zero() {
            return Self {
                c: T::one(),
                s: T::zero(),
            };
        }
        let two = T::one() + T::one();
        let theta = (a.at(j, j) - a.at(i, i)) / (two * aij);
        // sign(0) = +1
        let sign = if theta < T::zero() { -T::one() } else { T::one() };
        let t = sign / (theta.abs() + (T::one() + theta * theta).sqrt());
        let c = T::one() / (T::one() + t * t).sqrt();
        Self { c, s: t * c }
    }

    /// `V <- V * P`: only columns `i` and `j` change, both computed from the
    /// values before the update.
    fn apply_to_columns(&self, v: &mut DynMatrix<T>, i: usize, j: usize) {
        for r in 0..v.nrows() {
            let vi = v.at(r, i);
            let vj = v.at(r, j);
            v.set(r, i, self.c * vi - self.s * vj);
            v.set(r, j, self.s * vi + self.c * vj);
        }
    }
}

/// Position of the off-diagonal entry with the largest magnitude.
///
/// Scans row-major with a strict `>`, so the first maximum wins; for a
/// symmetric matrix that is always an upper-triangle position. A matrix
/// with no nonzero off-diagonal entry yields `(0, 1)`.
fn find_pivot<T: FloatScalar>(a: &DynMatrix<T>) -> (usize, usize) {
    let n = a.nrows();
    let mut best = T::zero();
    let mut pivot = (0, 1);
    for i in 0..n {
        for j in 0..n {
            if i == j {
                continue;
            }
            let x = a.at(i, j).abs();
            if x > best {
                best = x;
                pivot = (i, j);
            }
        }
    }
    pivot
}

/// Eigendecomposition of a real symmetric matrix by classical Jacobi
/// rotations, always rotating on the largest off-diagonal entry.
///
/// Holds the accumulated rotation matrix `V` (eigenvectors in columns) and
/// the diagonalized matrix `A' = V^T A V` (eigenvalues on the diagonal).
/// Eigenpairs come out in the order the rotations leave them; use
/// [`into_sorted_desc`](JacobiEigen::into_sorted_desc) or
/// [`select_k`](JacobiEigen::select_k) for a descending spectrum.
///
/// # Example
///
/// ```
/// use spectral_core::{DynMatrix, JacobiEigen};
///
/// let a = DynMatrix::from_rows(2, 2, &[2.0_f64, 1.0, 1.0, 2.0]).unwrap();
/// let eig = JacobiEigen::new(&a).unwrap();
/// assert!(eig.converged());
///
/// let mut vals = eig.eigenvalue_vec();
/// vals.sort_by(|a, b| a.partial_cmp(b).unwrap());
/// assert!((vals[0] - 1.0).abs() < 1e-12);
/// assert!((vals[1] - 3.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct JacobiEigen<T> {
    eigenvectors: DynMatrix<T>,
    eigenvalues: DynMatrix<T>,
    rotations: usize,
    converged: bool,
}

impl<T: FloatScalar> JacobiEigen<T>
where
    JacobiSettings<T>: Default,
{
    /// Decompose `a` with default settings.
    pub fn new(a: &DynMatrix<T>) -> Result<Self, MatrixError> {
        Self::with_settings(a, &JacobiSettings::default())
    }
}

impl<T: FloatScalar> JacobiEigen<T> {
    /// Decompose the symmetric matrix `a`.
    ///
    /// The first rotation is always performed. After each rotation the
    /// solver stops if the off-diagonal energy dropped by less than
    /// `settings.epsilon`, otherwise once `settings.max_rotations`
    /// rotations have been applied.
    ///
    /// Only allocation failure is an error. Panics if `a` is not square.
    /// Symmetry is not checked; for a non-symmetric input the result has
    /// no meaning.
    pub fn with_settings(a: &DynMatrix<T>, settings: &JacobiSettings<T>) -> Result<Self, MatrixError> {
        assert!(
            a.is_square(),
            "Jacobi eigensolver requires a square matrix, got {}x{}",
            a.nrows(),
            a.ncols(),
        );
        let n = a.nrows();
        let mut v = DynMatrix::eye(n)?.with_bounds_check(a.bounds_check());
        let mut current = a.try_clone()?;

        if n < 2 {
            return Ok(Self {
                eigenvectors: v,
                eigenvalues: current,
                rotations: 0,
                converged: true,
            });
        }

        let mut vt_a = DynMatrix::like(a)?;
        let mut next = DynMatrix::like(a)?;
        let mut off = current.off_diagonal_energy();
        let mut rotations = 0;
        let converged = loop {
            let (i, j) = find_pivot(&current);
            let rot = Rotation::for_pivot(&current, i, j);
            rot.apply_to_columns(&mut v, i, j);
            rotations += 1;

            // A' = V^T A V from the input matrix and the accumulated V.
            v.transpose();
            vt_a.matmul_into(&v, a);
            v.transpose();
            next.matmul_into(&vt_a, &v);
            core::mem::swap(&mut current, &mut next);

            let off_next = current.off_diagonal_energy();
            trace!(
                "jacobi rotation {}: pivot ({}, {}), c = {}, s = {}, off-diagonal energy {} -> {}",
                rotations,
                i,
                j,
                rot.c,
                rot.s,
                off,
                off_next,
            );
            if off - off_next < settings.epsilon {
                break true;
            }
            off = off_next;
            if rotations >= settings.max_rotations {
                warn!(
                    "jacobi: stopped at the {} rotation cap, off-diagonal energy {}",
                    settings.max_rotations, off,
                );
                break false;
            }
        };
        debug!(
            "jacobi: {}x{} matrix, {} rotations, converged = {}",
            n, n, rotations, converged,
        );

        Ok(Self {
            eigenvectors: v,
            eigenvalues: current,
            rotations,
            converged,
        })
    }

    /// Eigenvector matrix `V`; column `k` pairs with `eigenvalues()[(k, k)]`.
    pub fn eigenvectors(&self) -> &DynMatrix<T> {
        &self.eigenvectors
    }

    /// Diagonalized matrix `A'`; eigenvalues on the diagonal.
    pub fn eigenvalues(&self) -> &DynMatrix<T> {
        &self.eigenvalues
    }

    /// Diagonal of [`eigenvalues`](JacobiEigen::eigenvalues).
    pub fn eigenvalue_vec(&self) -> Vec<T> {
        self.eigenvalues.diag()
    }

    /// Number of rotations applied.
    pub fn rotations(&self) -> usize {
        self.rotations
    }

    /// `false` when the rotation cap stopped the solver.
    pub fn converged(&self) -> bool {
        self.converged
    }

    /// `(eigenvectors, eigenvalues)`.
    pub fn into_parts(self) -> (DynMatrix<T>, DynMatrix<T>) {
        (self.eigenvectors, self.eigenvalues)
    }

    pub(crate) fn from_parts(
        eigenvectors: DynMatrix<T>,
        eigenvalues: DynMatrix<T>,
        rotations: usize,
        converged: bool,
    ) -> Self {
        Self {
            eigenvectors,
            eigenvalues,
            rotations,
            converged,
        }
    }
}

/// Decompose a symmetric matrix with default settings, returning
/// `(eigenvectors, eigenvalues)`.
///
/// ```
/// use spectral_core::{solve_eigen, DynMatrix};
///
/// let a = DynMatrix::from_rows(2, 2, &[2.0_f64, 1.0, 1.0, 2.0]).unwrap();
/// let (vecs, vals) = solve_eigen(&a).unwrap();
///
/// // V^T A V reproduces the eigenvalue matrix.
/// let vt_a = vecs.clone().into_transpose().matmul(&a).unwrap();
/// let d = vt_a.matmul(&vecs).unwrap();
/// for i in 0..2 {
///     for j in 0..2 {
///         assert!((d[(i, j)] - vals[(i, j)]).abs() < 1e-12);
///     }
/// }
/// ```
pub fn solve_eigen<T: FloatScalar>(a: &DynMatrix<T>) -> Result<(DynMatrix<T>, DynMatrix<T>), MatrixError>
where
    JacobiSettings<T>: Default,
{
    solve_eigen_with(a, &JacobiSettings::default())
}

/// [`solve_eigen`] with explicit settings.
pub fn solve_eigen_with<T: FloatScalar>(
    a: &DynMatrix<T>,
    settings: &JacobiSettings<T>,
) -> Result<(DynMatrix<T>, DynMatrix<T>), MatrixError> {
    Ok(JacobiEigen::with_settings(a, settings)?.into_parts())
}

impl<T: FloatScalar> DynMatrix<T>
where
    JacobiSettings<T>: Default,
{
    /// Jacobi eigendecomposition with default settings.
    pub fn eig_jacobi(&self) -> Result<JacobiEigen<T>, MatrixError> {
        JacobiEigen::new(self)
    }
}

impl<T: FloatScalar> DynMatrix<T> {
    /// Jacobi eigendecomposition with explicit settings.
    pub fn eig_jacobi_with(&self, settings: &JacobiSettings<T>) -> Result<JacobiEigen<T>, MatrixError> {
        JacobiEigen::with_settings(self, settings)
    }
}
