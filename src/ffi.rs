//! C ABI for embedding the lift pipeline in data-acquisition software
//!
//! Mirrors the classic buffer-passing interface: the caller owns every buffer,
//! the library only reads the inputs and writes into the output it is given.

use crate::error::LiftError;
use crate::lift::lift_per_unit_length;
use crate::model::{ModelParameters, PreProcessedDataPoint, RawDataPoint};
use crate::preprocess::pre_process;
use std::os::raw::c_double;
use std::ptr;
use std::slice;

// FFI-safe structures with C-compatible layouts

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct FFIRawDataPoint {
    pub pitot_static_height_difference: c_double,    // m
    pub angle_between_normal_and_vertical: c_double, // radians
    pub section_length: c_double,                    // m
}

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct FFIModelParameters {
    pub stream_fluid_density: c_double,                   // kg/m³
    pub pitot_static_fluid_density: c_double,             // kg/m³
    pub g: c_double,                                      // m/s²
    pub tube_angle_adjust: c_double,                      // 1.0 for an aligned tube
    pub airflow_pitot_static_height_difference: c_double, // m
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FFIPreProcessedDataPoint {
    pub pressure: c_double,                          // Pa, relative to freestream
    pub angle_between_normal_and_vertical: c_double, // radians
    pub section_length: c_double,                    // m
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FFIPreProcessResult {
    Ok = 0,
    InputNull = 1,
    OutputTooShort = 2,
    HeightDifferenceNegative = 3,
    UncertaintyInvalid = 4,
}

impl From<&LiftError> for FFIPreProcessResult {
    fn from(err: &LiftError) -> Self {
        match err {
            LiftError::NullInput => FFIPreProcessResult::InputNull,
            LiftError::OutputTooShort { .. } => FFIPreProcessResult::OutputTooShort,
            LiftError::NegativeHeightDifference { .. } => {
                FFIPreProcessResult::HeightDifferenceNegative
            }
            // not produced by plain f64 preprocessing
            LiftError::InvalidUncertainty(_) => FFIPreProcessResult::UncertaintyInvalid,
        }
    }
}

impl From<&FFIRawDataPoint> for RawDataPoint {
    fn from(raw: &FFIRawDataPoint) -> Self {
        RawDataPoint {
            pitot_static_height_difference: raw.pitot_static_height_difference,
            angle_between_normal_and_vertical: raw.angle_between_normal_and_vertical,
            section_length: raw.section_length,
        }
    }
}

impl From<&FFIModelParameters> for ModelParameters {
    fn from(params: &FFIModelParameters) -> Self {
        ModelParameters::new(
            params.stream_fluid_density,
            params.pitot_static_fluid_density,
            params.g,
            params.tube_angle_adjust,
            params.airflow_pitot_static_height_difference,
        )
    }
}

impl From<&PreProcessedDataPoint> for FFIPreProcessedDataPoint {
    fn from(point: &PreProcessedDataPoint) -> Self {
        FFIPreProcessedDataPoint {
            pressure: point.pressure,
            angle_between_normal_and_vertical: point.angle_between_normal_and_vertical,
            section_length: point.section_length,
        }
    }
}

impl From<&FFIPreProcessedDataPoint> for PreProcessedDataPoint {
    fn from(point: &FFIPreProcessedDataPoint) -> Self {
        PreProcessedDataPoint {
            pressure: point.pressure,
            angle_between_normal_and_vertical: point.angle_between_normal_and_vertical,
            section_length: point.section_length,
        }
    }
}

unsafe fn pre_process_raw(
    params: *const FFIModelParameters,
    raw_data: *const FFIRawDataPoint,
    raw_data_len: usize,
    data_out: *mut FFIPreProcessedDataPoint,
    out_len: usize,
) -> Result<(), LiftError> {
    if params.is_null() || raw_data.is_null() || data_out.is_null() {
        return Err(LiftError::NullInput);
    }
    if out_len < raw_data_len {
        return Err(LiftError::OutputTooShort {
            required: raw_data_len,
            capacity: out_len,
        });
    }

    let params = ModelParameters::from(&*params);
    let raw: Vec<RawDataPoint> = slice::from_raw_parts(raw_data, raw_data_len)
        .iter()
        .map(RawDataPoint::from)
        .collect();

    let processed = pre_process(&params, &raw)?;

    // The output may be uninitialised memory, so write through the pointer
    // rather than forming a slice over it.
    for (i, point) in processed.iter().enumerate() {
        ptr::write(data_out.add(i), FFIPreProcessedDataPoint::from(point));
    }
    Ok(())
}

/// Produce preprocessed panels from raw pitot-static readings
///
/// On success `data_out[0..raw_data_len]` holds one panel per reading, in order,
/// and the rest of `data_out` is untouched. On any error nothing is written.
///
/// # Safety
/// Non-null pointers must be valid: `params` for one read, `raw_data` for
/// `raw_data_len` reads and `data_out` for `out_len` writes.
#[no_mangle]
pub unsafe extern "C" fn aerofoil_pre_process(
    params: *const FFIModelParameters,
    raw_data: *const FFIRawDataPoint,
    raw_data_len: usize,
    data_out: *mut FFIPreProcessedDataPoint,
    out_len: usize,
) -> FFIPreProcessResult {
    match pre_process_raw(params, raw_data, raw_data_len, data_out, out_len) {
        Ok(()) => FFIPreProcessResult::Ok,
        Err(e) => FFIPreProcessResult::from(&e),
    }
}

/// Lift per unit span from preprocessed panels
///
/// Returns 0 for an empty input and NaN when `data` is null but `len` is not 0.
///
/// # Safety
/// A non-null `data` must be valid for `len` reads.
#[no_mangle]
pub unsafe extern "C" fn aerofoil_lift_per_unit_length(
    data: *const FFIPreProcessedDataPoint,
    len: usize,
) -> c_double {
    if len == 0 {
        return 0.0;
    }
    if data.is_null() {
        return f64::NAN;
    }

    let points: Vec<PreProcessedDataPoint> = slice::from_raw_parts(data, len)
        .iter()
        .map(PreProcessedDataPoint::from)
        .collect();
    lift_per_unit_length(&points)
}
