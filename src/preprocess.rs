//! Conversion of raw pitot-static readings into panel pressures.

use tracing::{debug, trace};

use crate::error::LiftError;
use crate::model::{ModelParameters, PreProcessedDataPoint, RawDataPoint};
use crate::pitot::velocity_squared_from_pitot_static;
use crate::scalar::Scalar;

/// Produce `PreProcessedDataPoint`s suitable for calculating aerofoil lift
///
/// Writes one output per input panel into `data_out[..raw_data.len()]`, in the
/// same order. Anything past that is left untouched.
///
/// # Errors
/// * `OutputTooShort` if `data_out` is shorter than `raw_data`; nothing is written
/// * `NegativeHeightDifference` if the freestream or any panel reading is
///   negative. Panels before the failing one may already have been written, so
///   the buffer must not be used after an error.
pub fn pre_process_into<S: Scalar>(
    params: &ModelParameters<S>,
    raw_data: &[RawDataPoint<S>],
    data_out: &mut [PreProcessedDataPoint<S>],
) -> Result<(), LiftError> {
    if data_out.len() < raw_data.len() {
        return Err(LiftError::OutputTooShort {
            required: raw_data.len(),
            capacity: data_out.len(),
        });
    }

    let airflow_speed_squared =
        velocity_squared_from_pitot_static(&params.airflow_pitot_static_height_difference, params)?;

    for (i, (raw, out)) in raw_data.iter().zip(data_out.iter_mut()).enumerate() {
        let v_squared_here =
            velocity_squared_from_pitot_static(&raw.pitot_static_height_difference, params)?;

        // Offset from absolute pressure by the freestream static pressure, which
        // acts equally above and below the wing and so carries no lift.
        let pressure = (airflow_speed_squared.clone() - v_squared_here)
            * params.stream_fluid_density.clone()
            / S::from(2.0);

        trace!(panel = i, pressure = pressure.nominal(), "panel pressure");

        *out = PreProcessedDataPoint {
            pressure,
            angle_between_normal_and_vertical: raw.angle_between_normal_and_vertical.clone(),
            section_length: raw.section_length.clone(),
        };
    }

    debug!(
        panels = raw_data.len(),
        freestream_v_squared = airflow_speed_squared.nominal(),
        "preprocessed readings"
    );
    Ok(())
}

/// Allocating form of [`pre_process_into`]
pub fn pre_process<S: Scalar>(
    params: &ModelParameters<S>,
    raw_data: &[RawDataPoint<S>],
) -> Result<Vec<PreProcessedDataPoint<S>>, LiftError> {
    let mut data_out = vec![PreProcessedDataPoint::default(); raw_data.len()];
    pre_process_into(params, raw_data, &mut data_out)?;
    Ok(data_out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn params() -> ModelParameters {
        ModelParameters::new(10.0, 10.0, 10.0, 1.0, 10.0)
    }

    fn point(dh: f64, angle: f64, length: f64) -> RawDataPoint {
        RawDataPoint {
            pitot_static_height_difference: dh,
            angle_between_normal_and_vertical: angle,
            section_length: length,
        }
    }

    fn sentinel() -> PreProcessedDataPoint {
        PreProcessedDataPoint {
            pressure: -1.0,
            angle_between_normal_and_vertical: -1.0,
            section_length: -1.0,
        }
    }

    #[test]
    fn test_pressure_formula() {
        let raw = [point(10.0, 0.0, 1.0), point(13.0, -PI, 1.0)];
        let out = pre_process(&params(), &raw).unwrap();
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].pressure, 0.0);
        // (200 - 260) * 10 / 2
        assert_eq!(out[1].pressure, -300.0);
    }

    #[test]
    fn test_angle_and_length_follow_their_panel() {
        let raw = [point(1.0, 0.1, 0.5), point(2.0, -2.0, 0.25), point(3.0, 3.0, 0.125)];
        let out = pre_process(&params(), &raw).unwrap();
        for (r, p) in raw.iter().zip(out.iter()) {
            assert_eq!(p.angle_between_normal_and_vertical, r.angle_between_normal_and_vertical);
            assert_eq!(p.section_length, r.section_length);
        }
    }

    #[test]
    fn test_slower_flow_gives_positive_pressure() {
        let out = pre_process(&params(), &[point(4.0, 0.0, 1.0)]).unwrap();
        assert!(out[0].pressure > 0.0);
    }

    #[test]
    fn test_tail_of_buffer_untouched() {
        let raw = [point(10.0, 0.0, 1.0)];
        let mut out = vec![sentinel(); 3];
        pre_process_into(&params(), &raw, &mut out).unwrap();
        assert_eq!(out[0].section_length, 1.0);
        assert_eq!(out[1], sentinel());
        assert_eq!(out[2], sentinel());
    }

    #[test]
    fn test_output_too_short_writes_nothing() {
        let raw = [point(1.0, 0.0, 1.0), point(2.0, 0.0, 1.0), point(3.0, 0.0, 1.0)];
        let mut out = vec![sentinel(); 2];
        let result = pre_process_into(&params(), &raw, &mut out);
        assert_eq!(result, Err(LiftError::OutputTooShort { required: 3, capacity: 2 }));
        assert!(out.iter().all(|p| *p == sentinel()));
    }

    #[test]
    fn test_negative_panel_reading_stops_processing() {
        let raw = [point(1.0, 0.0, 1.0), point(-2.0, 0.0, 1.0), point(3.0, 0.0, 1.0)];
        let mut out = vec![sentinel(); 3];
        let result = pre_process_into(&params(), &raw, &mut out);
        assert_eq!(result, Err(LiftError::NegativeHeightDifference { value: -2.0 }));
        assert_eq!(out[2], sentinel());
    }

    #[test]
    fn test_negative_freestream_reading_rejected() {
        let mut params = params();
        params.airflow_pitot_static_height_difference = -0.5;
        let mut out = vec![sentinel(); 1];
        let result = pre_process_into(&params, &[point(1.0, 0.0, 1.0)], &mut out);
        assert_eq!(result, Err(LiftError::NegativeHeightDifference { value: -0.5 }));
        assert_eq!(out[0], sentinel());
    }

    #[test]
    fn test_empty_input() {
        let out = pre_process(&params(), &[]).unwrap();
        assert!(out.is_empty());
    }
}
