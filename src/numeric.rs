//! Basic numerical concepts used throughout the crate

#![allow(missing_docs)]

// Floating-point precision is configured here
#[cfg(feature = "f32")]
pub type Float = f32;
#[cfg(feature = "f32")]
pub use std::f32 as reals;
#[cfg(not(feature = "f32"))]
pub type Float = f64;
#[cfg(not(feature = "f32"))]
pub use std::f64 as reals;

/// Integer codes used by every cut configuration table
pub type CutCode = i32;

/// Mathematical functions
pub mod functions {
    use super::Float;
    use prefix_num_ops::real::*;

    /// Euclidean norm of a pair of deviations
    pub fn norm2(x: Float, y: Float) -> Float {
        sqrt(x.powi(2) + y.powi(2))
    }
}
