//! Symmetric eigensolver and eigengap selection.
//!
//! # Jacobi
//!
//! [`JacobiEigen`] diagonalizes a symmetric matrix by repeatedly rotating
//! on its largest off-diagonal entry. After every rotation the eigenvalue
//! matrix is rebuilt as `V^T A V` from the input and the accumulated
//! rotations, and the solver stops when the off-diagonal energy
//! (`sum of A[i,j]^2, i != j`) stops dropping by more than
//! [`JacobiSettings::epsilon`] or after [`JacobiSettings::max_rotations`].
//!
//! # Eigengap
//!
//! [`SpectralSelection`] sorts the eigenpairs by eigenvalue, descending,
//! and picks the number of clusters `k` at the largest gap
//! `lambda[i] - lambda[i + 1]` among the first `n / 2` positions.
//!
//! # Example
//!
//! ```
//! use spectral_core::{select_k, solve_eigen, DynMatrix};
//!
//! // Two loosely coupled pairs.
//! let a = DynMatrix::from_rows(4, 4, &[
//!     5.0_f64, 0.1, 0.0, 0.0,
//!     0.1, 5.0, 0.0, 0.0,
//!     0.0, 0.0, 1.0, 0.1,
//!     0.0, 0.0, 0.1, 1.0,
//! ]).unwrap();
//!
//! let (vecs, vals) = solve_eigen(&a).unwrap();
//! let (k, sorted_vals, _sorted_vecs) = select_k(&vals, &vecs).unwrap();
//!
//! assert_eq!(k, 2);
//! assert!((sorted_vals[(0, 0)] - 5.1).abs() < 1e-9);
//! ```

mod eigengap;
mod jacobi;

pub use eigengap::{
    argsort_desc, eigengap_index, select_k, sort_eigenpairs_desc, spectral_embedding,
    SpectralSelection,
};
pub use jacobi::{solve_eigen, solve_eigen_with, JacobiEigen, JacobiSettings};
