use core::fmt::{Debug, Display};
use num_traits::{Float, Num, One, Zero};

/// Trait for types that can be stored in a matrix.
///
/// Blanket-implemented for all types satisfying the bounds.
/// Covers `f32`, `f64`, and all integer types.
pub trait Scalar: Copy + PartialEq + Debug + Zero + One + Num {}

impl<T: Copy + PartialEq + Debug + Zero + One + Num> Scalar for T {}

/// Trait for floating-point matrix elements.
///
/// Required by everything that needs `sqrt`, `abs` or `powf`: the cellwise
/// power ops, row normalization, Jacobi rotations and the eigengap search.
/// `Display` is included so values can be printed and logged.
pub trait FloatScalar: Scalar + Float + Display {}

impl<T: Scalar + Float + Display> FloatScalar for T {}
