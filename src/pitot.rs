//! Pitot-static velocity solver.
//!
//! For incompressible flow the stagnation-minus-static pressure read by the tube
//! is `ρ_stream v² / 2`, and the manometer balances it with a fluid column
//! `ρ_pitot g Δh`. Solving for the velocity gives
//!
//! v² = 2 × ρ_pitot × g × Δh × K / ρ_stream
//!
//! where `K` corrects for tube misalignment.

use crate::error::LiftError;
use crate::model::ModelParameters;
use crate::scalar::Scalar;

/// Squared local flow speed implied by a pitot-static height difference
///
/// # Arguments
/// * `pitot_static_height_difference` - Manometer reading (m)
/// * `params` - Session constants
///
/// # Returns
/// Squared flow speed in m²/s², or `NegativeHeightDifference` when the
/// reading's nominal value is below zero
pub fn velocity_squared_from_pitot_static<S: Scalar>(
    pitot_static_height_difference: &S,
    params: &ModelParameters<S>,
) -> Result<S, LiftError> {
    let dh = pitot_static_height_difference.nominal();
    if dh < 0.0 {
        return Err(LiftError::NegativeHeightDifference { value: dh });
    }

    let rho_f = params.stream_fluid_density.clone();
    let rho_w = params.pitot_static_fluid_density.clone();
    let k = params.tube_angle_adjust.clone();

    Ok(S::from(2.0) * rho_w * params.g.clone() * pitot_static_height_difference.clone() * k / rho_f)
}
