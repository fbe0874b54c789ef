//! Measurement records flowing through the lift pipeline.
//!
//! All quantities are in SI units. Every record is generic over the scalar type
//! so the same pipeline runs on plain `f64`s or on uncertain values.

use crate::scalar::Scalar;

/// One pitot-static reading taken over a panel of the aerofoil surface
#[derive(Debug, Clone, PartialEq)]
pub struct RawDataPoint<S = f64> {
    /// Manometer height difference for this panel (m); must not be negative
    pub pitot_static_height_difference: S,

    /// Angle from the panel's outward normal to the vertical (rad)
    ///
    /// Panels on the top surface have magnitude in `[0, pi/2]`, panels on the
    /// bottom surface in `[pi/2, pi]`. The sign says which half of the profile
    /// the panel sits on. Angles are used as given, never normalised.
    pub angle_between_normal_and_vertical: S,

    /// Length of the panel along the profile (m)
    pub section_length: S,
}

/// Constants for one measurement session
#[derive(Debug, Clone, PartialEq)]
pub struct ModelParameters<S = f64> {
    /// Density of the fluid flowing over the wing (kg/m³)
    pub stream_fluid_density: S,

    /// Density of the fluid in the pitot-static manometer (kg/m³)
    pub pitot_static_fluid_density: S,

    /// Gravitational acceleration (m/s²)
    pub g: S,

    /// Multiplicative correction for a misaligned pitot-static tube
    ///
    /// Always supplied. Use [`crate::constants::NO_TUBE_ANGLE_ADJUST`] when the
    /// tube is aligned with the flow.
    pub tube_angle_adjust: S,

    /// Freestream reading taken far from the aerofoil (m)
    pub airflow_pitot_static_height_difference: S,
}

impl<S: Scalar> ModelParameters<S> {
    pub fn new(
        stream_fluid_density: S,
        pitot_static_fluid_density: S,
        g: S,
        tube_angle_adjust: S,
        airflow_pitot_static_height_difference: S,
    ) -> Self {
        Self {
            stream_fluid_density,
            pitot_static_fluid_density,
            g,
            tube_angle_adjust,
            airflow_pitot_static_height_difference,
        }
    }
}

/// A panel ready for lift integration
#[derive(Debug, Clone, PartialEq)]
pub struct PreProcessedDataPoint<S = f64> {
    /// Static pressure relative to freestream (Pa)
    ///
    /// Positive where the local flow is slower than freestream. Only the
    /// differential is kept, so every panel shares the same unknown base.
    pub pressure: S,

    /// Copied from the source [`RawDataPoint`]
    pub angle_between_normal_and_vertical: S,

    /// Copied from the source [`RawDataPoint`]
    pub section_length: S,
}

impl<S: Scalar> Default for PreProcessedDataPoint<S> {
    fn default() -> Self {
        Self {
            pressure: S::zero(),
            angle_between_normal_and_vertical: S::zero(),
            section_length: S::zero(),
        }
    }
}
