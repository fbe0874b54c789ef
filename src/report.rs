//! End-to-end lift estimation for a measurement session.

use serde::Serialize;
use tracing::info;

use crate::error::LiftError;
use crate::lift::{lift_per_unit_length, section_lift};
use crate::preprocess::pre_process;
use crate::session::MeasurementSource;
use crate::uncertainty::{Deterministic, MonteCarlo, UncertaintyConfig, UncertaintyModel};

/// Summary of an uncertain quantity
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Estimate {
    pub mean: f64,
    pub std_dev: f64,
    pub p05: f64,
    pub p95: f64,
}

impl Estimate {
    pub fn of<M: UncertaintyModel>(model: &M, value: &M::Value) -> Self {
        Self {
            mean: model.mean(value),
            std_dev: model.std_dev(value),
            p05: model.percentile(value, 5.0),
            p95: model.percentile(value, 95.0),
        }
    }
}

/// Per-panel breakdown
#[derive(Debug, Clone, Serialize)]
pub struct PanelReport {
    pub index: usize,
    pub pressure: Estimate,
    pub angle_between_normal_and_vertical: f64,
    pub section_length: f64,
    pub lift_contribution: Estimate,
}

/// Result of one lift estimation
#[derive(Debug, Clone, Serialize)]
pub struct LiftReport {
    pub uncertainty: UncertaintyConfig,
    pub lift_per_unit_length: Estimate,
    pub panels: Vec<PanelReport>,
}

/// Run the pipeline on `source` with an already-built uncertainty model
///
/// Returns the lift estimate and the per-panel breakdown.
pub fn estimate_lift<M, D>(model: &mut M, source: &D) -> Result<(Estimate, Vec<PanelReport>), LiftError>
where
    M: UncertaintyModel,
    D: MeasurementSource,
{
    let params = source.parameters(model)?;
    let readings = source.readings(model)?;
    let processed = pre_process(&params, &readings)?;
    let lift = lift_per_unit_length(&processed);

    let model: &M = model;
    let panels = processed
        .iter()
        .enumerate()
        .map(|(index, point)| PanelReport {
            index,
            pressure: Estimate::of(model, &point.pressure),
            angle_between_normal_and_vertical: model.mean(&point.angle_between_normal_and_vertical),
            section_length: model.mean(&point.section_length),
            lift_contribution: Estimate::of(model, &section_lift(point)),
        })
        .collect();

    Ok((Estimate::of(model, &lift), panels))
}

/// Run the pipeline with the strategy selected by `config`
pub fn run<D: MeasurementSource>(config: &UncertaintyConfig, source: &D) -> Result<LiftReport, LiftError> {
    let (lift, panels) = match config.mode.shape() {
        None => estimate_lift(&mut Deterministic, source)?,
        Some(shape) => {
            let mut model = MonteCarlo::new(shape, config.samples, config.seed)?;
            estimate_lift(&mut model, source)?
        }
    };

    info!(
        mode = ?config.mode,
        panels = panels.len(),
        lift = lift.mean,
        std_dev = lift.std_dev,
        "lift estimated"
    );

    Ok(LiftReport {
        uncertainty: config.clone(),
        lift_per_unit_length: lift,
        panels,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{MeasurementSession, PanelMeasurement};
    use crate::uncertainty::UncertaintyMode;
    use approx::assert_relative_eq;

    fn deterministic() -> UncertaintyConfig {
        UncertaintyConfig {
            mode: UncertaintyMode::None,
            ..Default::default()
        }
    }

    #[test]
    fn test_deterministic_report_has_zero_error() {
        let session = MeasurementSession::reference_aerofoil();
        let report = run(&deterministic(), &session).unwrap();
        assert_eq!(report.panels.len(), 12);
        assert_eq!(report.lift_per_unit_length.std_dev, 0.0);
        assert_eq!(report.lift_per_unit_length.p05, report.lift_per_unit_length.mean);
    }

    #[test]
    fn test_panel_contributions_sum_to_lift() {
        let session = MeasurementSession::reference_aerofoil();
        let report = run(&deterministic(), &session).unwrap();
        let total: f64 = report.panels.iter().map(|p| p.lift_contribution.mean).sum();
        assert_relative_eq!(total, report.lift_per_unit_length.mean, max_relative = 1e-9);
    }

    #[test]
    fn test_reference_aerofoil_nominal_lift() {
        // rig sheet values run through the nominal arithmetic
        let report = run(&deterministic(), &MeasurementSession::reference_aerofoil()).unwrap();
        assert_relative_eq!(
            report.lift_per_unit_length.mean,
            1.0528361667082275,
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_monte_carlo_mean_near_nominal() {
        let session = MeasurementSession::reference_aerofoil();
        let nominal = run(&deterministic(), &session).unwrap().lift_per_unit_length.mean;
        let config = UncertaintyConfig {
            mode: UncertaintyMode::Gaussian,
            samples: 20_000,
            seed: Some(2024),
        };
        let report = run(&config, &session).unwrap();
        let lift = report.lift_per_unit_length;
        assert!(lift.std_dev > 0.0);
        assert!((lift.mean - nominal).abs() < 3.0 * lift.std_dev);
        assert!(lift.p05 < lift.mean && lift.mean < lift.p95);
    }

    #[test]
    fn test_negative_reading_surfaces() {
        let session = MeasurementSession::exact(1.2, 1000.0, 9.81, 0.05, vec![PanelMeasurement::new(-0.01, 0.0, 0.1)]);
        let err = run(&deterministic(), &session).unwrap_err();
        assert_eq!(err, LiftError::NegativeHeightDifference { value: -0.01 });
    }

    #[test]
    fn test_zero_samples_surfaces() {
        let session = MeasurementSession::reference_aerofoil();
        let config = UncertaintyConfig {
            mode: UncertaintyMode::Uniform,
            samples: 0,
            seed: None,
        };
        assert!(matches!(run(&config, &session), Err(LiftError::InvalidUncertainty(_))));
    }

    #[test]
    fn test_report_serialises_to_json() {
        let session = MeasurementSession::reference_aerofoil();
        let report = run(&deterministic(), &session).unwrap();
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["uncertainty"]["mode"], "none");
        assert_eq!(json["panels"].as_array().map(Vec::len), Some(12));
    }
}
