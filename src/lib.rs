//! # spectral-core
//!
//! Numerical core of a spectral-clustering pipeline: a heap-allocated dense
//! matrix with an O(1) transpose view, the elementwise and linear-algebra
//! operators built on it, a Jacobi eigensolver for symmetric matrices, and
//! the eigengap heuristic that picks the number of clusters.
//!
//! ## Quick start
//!
//! ```
//! use spectral_core::DynMatrix;
//!
//! let a = DynMatrix::from_rows(3, 3, &[
//!     4.0_f64, 1.0, 0.0,
//!     1.0, 3.0, 0.0,
//!     0.0, 0.0, 0.5,
//! ]).unwrap();
//!
//! let eig = a.eig_jacobi().unwrap();
//! let selection = eig.select_k().unwrap();
//!
//! // Eigenvalues come back sorted descending, eigenvectors reordered to match.
//! let vals = selection.eigenvalues().diag();
//! assert!(vals[0] >= vals[1] && vals[1] >= vals[2]);
//! assert_eq!(selection.k(), 1);
//! ```
//!
//! ## Modules
//!
//! - [`dynmatrix`]: `DynMatrix<T>` with runtime dimensions, a row-major
//!   `Vec<T>` buffer and a lazy transpose flag. Cellwise, scalar and matrix
//!   products, row normalization, column permutation, off-diagonal energy
//!   and a CSV-style diagnostic printer.
//!
//! - [`linalg`]: [`JacobiEigen`] (largest-pivot Jacobi
//!   rotations with a convergence threshold and a rotation cap) and the
//!   eigengap selector [`SpectralSelection`].
//!
//! - [`traits`]: element traits [`Scalar`] and [`FloatScalar`].
//!
//! ## Precision
//!
//! Everything is generic over `T: FloatScalar` (`f32` or `f64`). The
//! [`Real`] alias picks one precision for the whole pipeline: `f64` by
//! default, `f32` with the `f32` feature.
//!
//! ## Cargo features
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `std`   | yes     | Hardware FPU via system libm, `std::error::Error` impls |
//! | `f32`   | no      | `Real = f32` instead of `f64` |
//!
//! Without `std` the crate is `no_std` + `alloc` and uses the pure-Rust
//! `libm` fallback for float math.
//!
//! ## Logging
//!
//! Solver progress is reported through the [`log`](https://docs.rs/log)
//! facade (`trace!` per rotation, `debug!` on termination). No logger is
//! installed by this crate.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod dynmatrix;
pub mod linalg;
pub mod traits;

pub use dynmatrix::{BoundsCheck, DynMatrix, DynMatrixf32, DynMatrixf64, MatrixError, Precision};
pub use linalg::{select_k, solve_eigen, JacobiEigen, JacobiSettings, SpectralSelection};
pub use traits::{FloatScalar, Scalar};

/// Floating-point precision used by the pipeline.
#[cfg(not(feature = "f32"))]
pub type Real = f64;

/// Floating-point precision used by the pipeline.
#[cfg(feature = "f32")]
pub type Real = f32;

/// Matrix of [`Real`] elements.
pub type RealMatrix = DynMatrix<Real>;
