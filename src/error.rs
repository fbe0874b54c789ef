//! Typed errors for lift preprocessing and uncertainty setup.
//!
//! Every failure here is caused by caller-supplied input. Nothing is retried and
//! nothing is logged at this level; callers decide whether an error is fatal.

use thiserror::Error;

/// Errors arising from preprocessing readings or constructing uncertain values.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LiftError {
    /// A required argument was absent (only reachable through the C ABI).
    #[error("required input was null")]
    NullInput,

    /// The destination buffer cannot hold one output per input panel.
    #[error("output buffer too short: {required} panels need storing but capacity is {capacity}")]
    OutputTooShort { required: usize, capacity: usize },

    /// A pitot-static height difference was below zero.
    #[error("pitot-static height difference is negative ({value})")]
    NegativeHeightDifference { value: f64 },

    /// An error magnitude or sample count could not describe a distribution.
    #[error("invalid uncertainty: {0}")]
    InvalidUncertainty(String),
}
