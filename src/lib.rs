//! # Aerofoil Lift
//!
//! Lift per unit span from pitot-static readings taken around an aerofoil,
//! with measurement uncertainty carried through every step.

// Re-export the main types and functions
pub use error::LiftError;
pub use lift::{lift_per_unit_length, section_lift};
pub use model::{ModelParameters, PreProcessedDataPoint, RawDataPoint};
pub use pitot::velocity_squared_from_pitot_static;
pub use preprocess::{pre_process, pre_process_into};
pub use report::{estimate_lift, run, Estimate, LiftReport, PanelReport};
pub use scalar::Scalar;
pub use session::{
    ErrorBudget, MeasurementSession, MeasurementSource, Measured, PanelMeasurement,
    SessionParameters,
};
pub use uncertainty::{
    Deterministic, DistributionShape, Ensemble, MonteCarlo, UncertaintyConfig, UncertaintyMode,
    UncertaintyModel,
};

// Module declarations
pub mod constants;
pub mod ffi;
mod error;
mod lift;
mod model;
mod pitot;
mod preprocess;
mod report;
mod scalar;
mod session;
mod uncertainty;
