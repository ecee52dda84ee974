mod ops;
mod square;
mod util;

pub use ops::Cellwise;
pub use util::{Csv, DiagonalCsv, Precision};

use alloc::vec::Vec;
use core::ops::{Index, IndexMut};

use crate::traits::Scalar;

/// Allocation failure while creating a matrix buffer.
///
/// Returned by every constructor and by every operation that needs scratch
/// storage. Shape mismatches and out-of-range indices are contract
/// violations and panic instead.
///
/// ```
/// use spectral_core::{DynMatrix, MatrixError};
///
/// let err = DynMatrix::<f64>::zeros(usize::MAX, 2).unwrap_err();
/// assert!(matches!(err, MatrixError::CapacityOverflow { .. }));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatrixError {
    /// `nrows * ncols` does not fit in `usize`.
    CapacityOverflow { nrows: usize, ncols: usize },
    /// The allocator refused a buffer of `len` elements.
    AllocFailed { len: usize },
}

impl core::fmt::Display for MatrixError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            MatrixError::CapacityOverflow { nrows, ncols } => {
                write!(f, "matrix size {}x{} overflows usize", nrows, ncols)
            }
            MatrixError::AllocFailed { len } => {
                write!(f, "failed to allocate a buffer of {} elements", len)
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for MatrixError {}

/// Policy for validating logical `(row, col)` indices.
///
/// Chosen per matrix at construction time and inherited by matrices
/// derived from it (copies, fresh results of operations).
///
/// ```
/// use spectral_core::{BoundsCheck, DynMatrix};
///
/// let m = DynMatrix::<f64>::zeros(2, 2)
///     .unwrap()
///     .with_bounds_check(BoundsCheck::Always);
/// assert_eq!(m.bounds_check(), BoundsCheck::Always);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BoundsCheck {
    /// Out-of-range indices panic in every build.
    Always,
    /// Out-of-range indices panic in debug builds only. In release builds an
    /// index that is logically out of range but still inside the buffer
    /// reads or writes an unspecified element; an index past the end of the
    /// buffer still panics.
    #[default]
    DebugOnly,
}

/// Dynamically-sized heap-allocated matrix.
///
/// Row-major `Vec<T>` storage in the *untransposed* orientation, plus a
/// transpose flag. [`transpose`](DynMatrix::transpose) flips the flag and
/// swaps the reported shape in O(1); the buffer is never touched. Every
/// element access computes the physical offset from the flag in one step.
///
/// A `DynMatrix` exclusively owns its buffer. The transpose flag is plain
/// state: mutating a matrix through `&mut` is not meant to be shared across
/// threads.
///
/// # Examples
///
/// ```
/// use spectral_core::DynMatrix;
///
/// let mut a = DynMatrix::from_rows(2, 3, &[1.0_f64, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
/// assert_eq!(a[(0, 2)], 3.0);
/// assert_eq!(a.shape(), (2, 3));
///
/// a.transpose();
/// assert_eq!(a.shape(), (3, 2));
/// assert_eq!(a[(2, 0)], 3.0);
/// ```
#[derive(Debug, Clone)]
pub struct DynMatrix<T> {
    data: Vec<T>,
    /// Physical row count (untransposed orientation).
    rows: usize,
    /// Physical column count, i.e. the row stride of `data`.
    cols: usize,
    transposed: bool,
    bounds: BoundsCheck,
}

/// Dynamic matrix with `f32` elements.
pub type DynMatrixf32 = DynMatrix<f32>;
/// Dynamic matrix with `f64` elements.
pub type DynMatrixf64 = DynMatrix<f64>;

/// Allocate a buffer of `len` copies of `value`, reporting failure instead
/// of aborting. An empty buffer performs no allocation.
pub(crate) fn try_alloc<T: Clone>(len: usize, value: T) -> Result<Vec<T>, MatrixError> {
    let mut data = Vec::new();
    if len > 0 {
        data.try_reserve_exact(len)
            .map_err(|_| MatrixError::AllocFailed { len })?;
        data.resize(len, value);
    }
    Ok(data)
}

fn buffer_len(nrows: usize, ncols: usize) -> Result<usize, MatrixError> {
    nrows
        .checked_mul(ncols)
        .ok_or(MatrixError::CapacityOverflow { nrows, ncols })
}

// ── Constructors ────────────────────────────────────────────────────

impl<T: Scalar> DynMatrix<T> {
    /// Create an `nrows x ncols` matrix of zeros.
    ///
    /// ```
    /// use spectral_core::DynMatrix;
    /// let m = DynMatrix::<f64>::zeros(2, 3).unwrap();
    /// assert_eq!(m.nrows(), 2);
    /// assert_eq!(m.ncols(), 3);
    /// assert_eq!(m[(1, 2)], 0.0);
    /// ```
    pub fn zeros(nrows: usize, ncols: usize) -> Result<Self, MatrixError> {
        Self::fill(nrows, ncols, T::zero())
    }

    /// Create a matrix filled with a given value.
    ///
    /// ```
    /// use spectral_core::DynMatrix;
    /// let m = DynMatrix::fill(2, 3, 7.0_f64).unwrap();
    /// assert_eq!(m[(0, 0)], 7.0);
    /// assert_eq!(m[(1, 2)], 7.0);
    /// ```
    pub fn fill(nrows: usize, ncols: usize, value: T) -> Result<Self, MatrixError> {
        let len = buffer_len(nrows, ncols)?;
        Ok(Self {
            data: try_alloc(len, value)?,
            rows: nrows,
            cols: ncols,
            transposed: false,
            bounds: BoundsCheck::default(),
        })
    }

    /// Create an `n x n` identity matrix.
    ///
    /// ```
    /// use spectral_core::DynMatrix;
    /// let id = DynMatrix::<f64>::eye(3).unwrap();
    /// assert_eq!(id[(0, 0)], 1.0);
    /// assert_eq!(id[(0, 1)], 0.0);
    /// assert_eq!(id[(2, 2)], 1.0);
    /// ```
    pub fn eye(n: usize) -> Result<Self, MatrixError> {
        let mut m = Self::zeros(n, n)?;
        for i in 0..n {
            m[(i, i)] = T::one();
        }
        Ok(m)
    }

    /// Zero matrix with the same logical shape and bounds policy as `other`.
    pub fn like(other: &Self) -> Result<Self, MatrixError> {
        Ok(Self::zeros(other.nrows(), other.ncols())?.with_bounds_check(other.bounds))
    }

    /// Create a matrix from a flat slice in row-major order.
    ///
    /// Panics if `row_major.len() != nrows * ncols`.
    ///
    /// ```
    /// use spectral_core::DynMatrix;
    /// let m = DynMatrix::from_rows(2, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
    /// assert_eq!(m[(0, 2)], 3.0);
    /// assert_eq!(m[(1, 0)], 4.0);
    /// ```
    pub fn from_rows(nrows: usize, ncols: usize, row_major: &[T]) -> Result<Self, MatrixError> {
        let len = buffer_len(nrows, ncols)?;
        assert_eq!(
            row_major.len(),
            len,
            "slice length {} does not match {}x{} matrix",
            row_major.len(),
            nrows,
            ncols,
        );
        let mut m = Self::zeros(nrows, ncols)?;
        m.data.copy_from_slice(row_major);
        Ok(m)
    }

    /// Create a matrix by calling `f(row, col)` for each element.
    ///
    /// ```
    /// use spectral_core::DynMatrix;
    /// let m = DynMatrix::from_fn(3, 3, |i, j| if i == j { 1.0_f64 } else { 0.0 }).unwrap();
    /// assert_eq!(m[(0, 0)], 1.0);
    /// assert_eq!(m[(0, 1)], 0.0);
    /// ```
    pub fn from_fn(
        nrows: usize,
        ncols: usize,
        f: impl Fn(usize, usize) -> T,
    ) -> Result<Self, MatrixError> {
        let mut m = Self::zeros(nrows, ncols)?;
        for i in 0..nrows {
            for j in 0..ncols {
                m.data[i * ncols + j] = f(i, j);
            }
        }
        Ok(m)
    }

    /// Deep copy into a freshly allocated matrix.
    ///
    /// Unlike `clone`, reports allocation failure. The copy keeps the logical
    /// shape, the transpose view and the bounds policy of `self`.
    pub fn try_clone(&self) -> Result<Self, MatrixError> {
        let mut data = try_alloc(self.data.len(), T::zero())?;
        data.copy_from_slice(&self.data);
        Ok(Self {
            data,
            rows: self.rows,
            cols: self.cols,
            transposed: self.transposed,
            bounds: self.bounds,
        })
    }

    /// Deep copy `src` into `self`, element by element in logical order.
    ///
    /// Panics if the logical shapes differ.
    pub fn copy_from(&mut self, src: &Self) {
        assert_eq!(
            self.shape(),
            src.shape(),
            "dimension mismatch: copy {}x{} into {}x{}",
            src.nrows(),
            src.ncols(),
            self.nrows(),
            self.ncols(),
        );
        if self.transposed == src.transposed {
            self.data.copy_from_slice(&src.data);
            return;
        }
        for i in 0..self.nrows() {
            for j in 0..self.ncols() {
                self.set(i, j, src.at(i, j));
            }
        }
    }
}

// ── Shape and view ──────────────────────────────────────────────────

impl<T> DynMatrix<T> {
    /// Number of rows of the logical (possibly transposed) view.
    #[inline]
    pub fn nrows(&self) -> usize {
        if self.transposed {
            self.cols
        } else {
            self.rows
        }
    }

    /// Number of columns of the logical (possibly transposed) view.
    #[inline]
    pub fn ncols(&self) -> usize {
        if self.transposed {
            self.rows
        } else {
            self.cols
        }
    }

    /// `(nrows, ncols)` of the logical view.
    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        (self.nrows(), self.ncols())
    }

    /// Whether the matrix is square.
    #[inline]
    pub fn is_square(&self) -> bool {
        self.rows == self.cols
    }

    /// Whether the matrix has no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Whether the transpose view is active.
    #[inline]
    pub fn is_transposed(&self) -> bool {
        self.transposed
    }

    /// Transpose in place by flipping the view. O(1), never copies data.
    #[inline]
    pub fn transpose(&mut self) {
        self.transposed = !self.transposed;
    }

    /// Consume and return the transposed view.
    #[inline]
    pub fn into_transpose(mut self) -> Self {
        self.transpose();
        self
    }

    /// Bounds policy of this matrix.
    #[inline]
    pub fn bounds_check(&self) -> BoundsCheck {
        self.bounds
    }

    /// Replace the bounds policy.
    #[inline]
    pub fn with_bounds_check(mut self, bounds: BoundsCheck) -> Self {
        self.bounds = bounds;
        self
    }

    /// Physical offset of logical element `(row, col)`.
    #[inline]
    fn offset(&self, row: usize, col: usize) -> usize {
        match self.bounds {
            BoundsCheck::Always => assert!(
                row < self.nrows() && col < self.ncols(),
                "index ({}, {}) out of bounds for {}x{} matrix",
                row,
                col,
                self.nrows(),
                self.ncols(),
            ),
            BoundsCheck::DebugOnly => debug_assert!(
                row < self.nrows() && col < self.ncols(),
                "index ({}, {}) out of bounds for {}x{} matrix",
                row,
                col,
                self.nrows(),
                self.ncols(),
            ),
        }
        if self.transposed {
            col * self.cols + row
        } else {
            row * self.cols + col
        }
    }

    /// Reference to logical element `(row, col)`.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> &T {
        &self.data[self.offset(row, col)]
    }

    /// Mutable reference to logical element `(row, col)`.
    #[inline]
    pub fn get_mut(&mut self, row: usize, col: usize) -> &mut T {
        let k = self.offset(row, col);
        &mut self.data[k]
    }
}

impl<T: Copy> DynMatrix<T> {
    /// Value of logical element `(row, col)`.
    #[inline]
    pub fn at(&self, row: usize, col: usize) -> T {
        self.data[self.offset(row, col)]
    }

    /// Overwrite logical element `(row, col)`.
    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: T) {
        let k = self.offset(row, col);
        self.data[k] = value;
    }
}

// ── Index ───────────────────────────────────────────────────────────

impl<T> Index<(usize, usize)> for DynMatrix<T> {
    type Output = T;

    #[inline]
    fn index(&self, (row, col): (usize, usize)) -> &T {
        self.get(row, col)
    }
}

impl<T> IndexMut<(usize, usize)> for DynMatrix<T> {
    #[inline]
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut T {
        self.get_mut(row, col)
    }
}

// ── Equality ────────────────────────────────────────────────────────

/// Logical equality: same shape and same element at every `(row, col)`,
/// regardless of transpose view or bounds policy.
impl<T: Copy + PartialEq> PartialEq for DynMatrix<T> {
    fn eq(&self, other: &Self) -> bool {
        if self.shape() != other.shape() {
            return false;
        }
        if self.transposed == other.transposed {
            return self.data == other.data;
        }
        for i in 0..self.nrows() {
            for j in 0..self.ncols() {
                if self.at(i, j) != other.at(i, j) {
                    return false;
                }
            }
        }
        true
    }
}
