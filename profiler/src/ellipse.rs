//! Overlay ellipse sampling
//!
//! The display collaborator draws the fitted beam as a closed polyline.
//! [`EllipseConvention::Legacy`] reproduces the parametric form existing
//! deployments draw:
//!
//! ```text
//! x(t) = cx + ra·cos(t)·cos(θ) − rb·sin(t)·sin(θ)
//! y(t) = cy + ra·cos(t)·sin(θ) − rb·sin(t)·cos(θ)
//! ```
//!
//! which mirrors the minor term in y relative to a true rotation.
//! [`EllipseConvention::Rotation`] applies the standard rotation matrix
//! instead (`+ rb·sin(t)·cos(θ)` in y). Both trace the same curve when θ is
//! a multiple of 90°.

use std::f64::consts::PI;

pub use beam_types::{EllipseConvention, DEFAULT_NUM_POINTS};
use beam_types::BeamEstimate;

/// Sample an ellipse at `num_points` evenly spaced angles over [0, 2π].
///
/// Both endpoints are included so the curve closes on itself. `width` and
/// `height` are full lengths; `angle_degrees` rotates the width axis away
/// from +x.
pub fn render_ellipse(
    centroid: (f64, f64),
    width: f64,
    height: f64,
    angle_degrees: f64,
    num_points: usize,
    convention: EllipseConvention,
) -> Vec<(f64, f64)> {
    let (cx, cy) = centroid;
    let theta = angle_degrees.to_radians();
    let (sin_theta, cos_theta) = theta.sin_cos();
    let r_a = width / 2.0;
    let r_b = height / 2.0;

    let step = if num_points > 1 {
        2.0 * PI / (num_points - 1) as f64
    } else {
        0.0
    };

    (0..num_points)
        .map(|i| {
            let (sin_t, cos_t) = (i as f64 * step).sin_cos();
            let x = cx + r_a * cos_t * cos_theta - r_b * sin_t * sin_theta;
            let y = match convention {
                EllipseConvention::Legacy => {
                    cy + r_a * cos_t * sin_theta - r_b * sin_t * cos_theta
                }
                EllipseConvention::Rotation => {
                    cy + r_a * cos_t * sin_theta + r_b * sin_t * cos_theta
                }
            };
            (x, y)
        })
        .collect()
}

/// Overlay curve for a beam estimate (minor axis as width, major as height).
pub fn render_estimate(
    estimate: &BeamEstimate,
    num_points: usize,
    convention: EllipseConvention,
) -> Vec<(f64, f64)> {
    render_ellipse(
        estimate.centroid(),
        estimate.overlay_width(),
        estimate.overlay_height(),
        estimate.rotation_degrees,
        num_points,
        convention,
    )
}
