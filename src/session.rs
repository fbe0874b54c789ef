//! Measurement sessions: where readings and parameters come from.
//!
//! The pipeline never owns a dataset. It asks a [`MeasurementSource`] for the
//! session parameters and panel readings, handing it the active
//! [`UncertaintyModel`] so each value is built with the right error attached.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use crate::constants::{NO_TUBE_ANGLE_ADJUST, WATER_DENSITY};
use crate::error::LiftError;
use crate::model::{ModelParameters, RawDataPoint};
use crate::uncertainty::UncertaintyModel;

/// Supplies one session's parameters and panel readings
pub trait MeasurementSource {
    fn parameters<M: UncertaintyModel>(
        &self,
        model: &mut M,
    ) -> Result<ModelParameters<M::Value>, LiftError>;

    fn readings<M: UncertaintyModel>(
        &self,
        model: &mut M,
    ) -> Result<Vec<RawDataPoint<M::Value>>, LiftError>;
}

/// A nominal value with its absolute error
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Measured {
    pub value: f64,
    pub error: f64,
}

impl Measured {
    pub fn new(value: f64, error: f64) -> Self {
        Self { value, error }
    }

    pub fn exact(value: f64) -> Self {
        Self { value, error: 0.0 }
    }

    pub fn with_fractional_error(value: f64, fractional_error: f64) -> Self {
        Self { value, error: value.abs() * fractional_error }
    }

    fn realise<M: UncertaintyModel>(&self, model: &mut M) -> Result<M::Value, LiftError> {
        model.with_error(self.value, self.error)
    }
}

/// Session-wide constants, each with its own error
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionParameters {
    pub stream_fluid_density: Measured,
    pub pitot_static_fluid_density: Measured,
    pub g: Measured,
    pub tube_angle_adjust: Measured,
    pub airflow_pitot_static_height_difference: Measured,
}

/// Errors shared by every panel reading
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ErrorBudget {
    /// Absolute error of each manometer reading (m)
    pub height_difference: f64,
    /// Absolute error of each panel angle (rad)
    pub angle: f64,
    /// Error of each panel length as a fraction of that length
    pub section_length_fraction: f64,
}

impl ErrorBudget {
    pub fn none() -> Self {
        Self {
            height_difference: 0.0,
            angle: 0.0,
            section_length_fraction: 0.0,
        }
    }
}

/// Nominal geometry and reading for one panel
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PanelMeasurement {
    pub height_difference: f64,
    pub angle: f64,
    pub section_length: f64,
}

impl PanelMeasurement {
    pub fn new(height_difference: f64, angle: f64, section_length: f64) -> Self {
        Self { height_difference, angle, section_length }
    }
}

/// An in-memory survey of one aerofoil
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasurementSession {
    pub parameters: SessionParameters,
    pub errors: ErrorBudget,
    pub panels: Vec<PanelMeasurement>,
}

impl MeasurementSession {
    pub fn new(parameters: SessionParameters, errors: ErrorBudget, panels: Vec<PanelMeasurement>) -> Self {
        Self { parameters, errors, panels }
    }

    /// Wind-tunnel survey of a 12-panel cambered section
    ///
    /// Six panels face upward and six downward, each 0.1 m long. The manometer
    /// is water and is read through a 0.2 inclined-tube correction. Values are as
    /// recorded on the rig sheet.
    pub fn reference_aerofoil() -> Self {
        let length = 0.1;
        let heights_and_angles = [
            // upward facing
            (155e-3, -0.75),
            (109e-3, -0.1),
            (124e-3, 0.3),
            (120e-3, 0.1),
            (132e-3, 0.1),
            (135e-3, 0.0),
            // downward facing
            (162e-3, -(PI - 0.75)),
            (102e-3, -(PI - 0.1)),
            (100e-3, -(PI + 0.3)),
            (112e-3, -(PI + 0.1)),
            (118e-3, -(PI + 0.1)),
            (128e-3, -PI),
        ];

        Self {
            parameters: SessionParameters {
                stream_fluid_density: Measured::new(0.965, 0.00163),
                pitot_static_fluid_density: Measured::exact(WATER_DENSITY),
                g: Measured::exact(0.981),
                tube_angle_adjust: Measured::with_fractional_error(0.2, 0.05),
                airflow_pitot_static_height_difference: Measured::new(0.057, 0.2e-3),
            },
            errors: ErrorBudget {
                height_difference: 0.2e-3,
                angle: 2.0 * PI * 5e-3,
                section_length_fraction: 0.05,
            },
            panels: heights_and_angles
                .iter()
                .map(|&(h, a)| PanelMeasurement::new(h, a, length))
                .collect(),
        }
    }

    /// Exact session with a single aligned tube and no reading errors
    pub fn exact(
        stream_fluid_density: f64,
        pitot_static_fluid_density: f64,
        g: f64,
        airflow_pitot_static_height_difference: f64,
        panels: Vec<PanelMeasurement>,
    ) -> Self {
        Self {
            parameters: SessionParameters {
                stream_fluid_density: Measured::exact(stream_fluid_density),
                pitot_static_fluid_density: Measured::exact(pitot_static_fluid_density),
                g: Measured::exact(g),
                tube_angle_adjust: Measured::exact(NO_TUBE_ANGLE_ADJUST),
                airflow_pitot_static_height_difference: Measured::exact(
                    airflow_pitot_static_height_difference,
                ),
            },
            errors: ErrorBudget::none(),
            panels,
        }
    }
}

impl MeasurementSource for MeasurementSession {
    fn parameters<M: UncertaintyModel>(
        &self,
        model: &mut M,
    ) -> Result<ModelParameters<M::Value>, LiftError> {
        let p = &self.parameters;
        Ok(ModelParameters::new(
            p.stream_fluid_density.realise(model)?,
            p.pitot_static_fluid_density.realise(model)?,
            p.g.realise(model)?,
            p.tube_angle_adjust.realise(model)?,
            p.airflow_pitot_static_height_difference.realise(model)?,
        ))
    }

    fn readings<M: UncertaintyModel>(
        &self,
        model: &mut M,
    ) -> Result<Vec<RawDataPoint<M::Value>>, LiftError> {
        self.panels
            .iter()
            .map(|panel| {
                Ok(RawDataPoint {
                    pitot_static_height_difference: model
                        .with_error(panel.height_difference, self.errors.height_difference)?,
                    angle_between_normal_and_vertical: model
                        .with_error(panel.angle, self.errors.angle)?,
                    section_length: model.with_fractional_error(
                        panel.section_length,
                        self.errors.section_length_fraction,
                    )?,
                })
            })
            .collect()
    }
}
