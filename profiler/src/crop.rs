//! Region-of-interest cropping around the current beam estimate

use ndarray::{s, Array2};

use crate::error::{AnalysisError, AnalysisStage};
use crate::moments::MomentSet;

/// Smallest half-width of a crop window, in samples
pub const MIN_HALF_WIDTH: f64 = 4.0;

/// Relative slack under which a negative square-root argument is treated
/// as rounding noise and clamped to zero
const ROUNDING_TOLERANCE: f64 = 1e-12;

/// Square root that rejects arguments which are genuinely negative.
///
/// `scale` is the magnitude of the terms that produced `value`; negatives
/// within rounding distance of zero relative to it are clamped.
pub(crate) fn checked_sqrt(
    value: f64,
    scale: f64,
    stage: AnalysisStage,
    quantity: &'static str,
) -> Result<f64, AnalysisError> {
    if value >= 0.0 {
        Ok(value.sqrt())
    } else if value >= -ROUNDING_TOLERANCE * scale.abs() {
        Ok(0.0)
    } else {
        Err(AnalysisError::NegativeVariance {
            stage,
            quantity,
            value,
        })
    }
}

/// Axis-aligned crop box in the coordinates of the region it was cut from.
///
/// Bounds are half-open: rows `bottom..top`, columns `left..right`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CropWindow {
    pub left: usize,
    pub bottom: usize,
    pub right: usize,
    pub top: usize,
    /// RMS of the two half-widths before the minimum-size floor
    pub inclusion_radius: f64,
}

impl CropWindow {
    /// Size a crop box around the centroid of `moments`.
    ///
    /// Half-widths are `crop_radius * 4 * sigma` along each axis, floored at
    /// [`MIN_HALF_WIDTH`], and the box is clipped to a region of `dim`
    /// (rows, cols). A box that falls entirely outside collapses to empty.
    pub fn around(
        moments: &MomentSet,
        crop_radius: f64,
        dim: (usize, usize),
        iteration: usize,
    ) -> Result<Self, AnalysisError> {
        let stage = AnalysisStage::Crop { iteration };
        let (cx, cy) = moments.centroid();
        if !cx.is_finite() || !cy.is_finite() {
            return Err(AnalysisError::NonFiniteCentroid {
                stage,
                x: cx,
                y: cy,
            });
        }

        let scale = moments.m20.abs() + moments.m02.abs();
        let w20 = crop_radius * 4.0 * checked_sqrt(moments.m20, scale, stage, "m20")?;
        let w02 = crop_radius * 4.0 * checked_sqrt(moments.m02, scale, stage, "m02")?;
        let inclusion_radius = ((w20 * w20 + w02 * w02) / 2.0).sqrt();

        let w20 = w20.max(MIN_HALF_WIDTH);
        let w02 = w02.max(MIN_HALF_WIDTH);

        let (rows, cols) = dim;
        let (left, right) = clip_span(cx, w20, cols);
        let (bottom, top) = clip_span(cy, w02, rows);

        Ok(Self {
            left,
            bottom,
            right,
            top,
            inclusion_radius,
        })
    }

    /// Number of rows kept
    pub fn rows(&self) -> usize {
        self.top - self.bottom
    }

    /// Number of columns kept
    pub fn cols(&self) -> usize {
        self.right - self.left
    }

    pub fn is_empty(&self) -> bool {
        self.rows() == 0 || self.cols() == 0
    }

    /// Shrink `region` in place to this window
    pub fn apply(&self, region: &mut Array2<f64>) {
        region.slice_collapse(s![self.bottom..self.top, self.left..self.right]);
    }
}

/// Integer span `[center - half, center + half]` clipped to `0..len`.
///
/// Bounds truncate toward zero like an integer cast of the clipped values.
fn clip_span(center: f64, half_width: f64, len: usize) -> (usize, usize) {
    let len_f = len as f64;
    let lower = (center - half_width).clamp(0.0, len_f).floor() as usize;
    let upper = (center + half_width).clamp(0.0, len_f).floor() as usize;
    (lower, upper.max(lower))
}
