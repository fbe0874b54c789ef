//! Lift integration over preprocessed panels.
//!
//! Each panel pushes on the wing along its inward normal. Its vertical share is
//! `pressure × cos(angle) × length`, with the angle measured from the outward
//! normal to the vertical. Negating the sum turns that inward-positive push into
//! upward-positive lift.

use tracing::{debug, trace};

use crate::model::PreProcessedDataPoint;
use crate::scalar::Scalar;

/// Lift contributed by a single panel, per unit span
pub fn section_lift<S: Scalar>(point: &PreProcessedDataPoint<S>) -> S {
    -(point.pressure.clone()
        * point.angle_between_normal_and_vertical.cos()
        * point.section_length.clone())
}

/// Calculate the lift per unit length on an aerofoil
///
/// A plain ordered sum of [`section_lift`] over every panel; an empty slice
/// gives exactly zero.
pub fn lift_per_unit_length<S: Scalar>(data: &[PreProcessedDataPoint<S>]) -> S {
    let lift = data.iter().enumerate().fold(S::zero(), |lift, (i, point)| {
        let lift_i = section_lift(point);
        trace!(panel = i, lift = lift_i.nominal(), "panel lift");
        lift + lift_i
    });
    debug!(panels = data.len(), lift = lift.nominal(), "integrated lift");
    lift
}
