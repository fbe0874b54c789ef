//! Scalar arithmetic used by the lift pipeline.
//!
//! The preprocessor and integrator only ever add, subtract, multiply, divide,
//! negate and take cosines. Anything that supports those operations can flow
//! through them, which lets a Monte Carlo ensemble stand in for a plain `f64`
//! without the pipeline knowing the difference.

use std::fmt::Debug;
use std::ops::{Add, Div, Mul, Neg, Sub};

/// Arithmetic required of every quantity carried through the pipeline.
pub trait Scalar:
    Clone
    + Debug
    + From<f64>
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + Neg<Output = Self>
{
    /// Cosine of an angle in radians
    fn cos(&self) -> Self;

    /// Best single-number estimate, used for validity checks
    fn nominal(&self) -> f64;

    fn zero() -> Self {
        Self::from(0.0)
    }
}

impl Scalar for f64 {
    fn cos(&self) -> Self {
        f64::cos(*self)
    }

    fn nominal(&self) -> f64 {
        *self
    }
}
