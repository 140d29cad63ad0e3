//! Per-frame beam fit result.

use serde::{Deserialize, Serialize};

/// Gaussian-beam ellipse fitted to one frame.
///
/// Lengths are in pixels of the original (uncropped) frame. Axes follow the
/// 1/e² convention: twice the square root of two times the standard
/// deviation along each principal direction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BeamEstimate {
    /// Centroid column coordinate
    pub centroid_x: f64,
    /// Centroid row coordinate
    pub centroid_y: f64,
    /// Full length of the major axis
    pub major_axis: f64,
    /// Full length of the minor axis
    pub minor_axis: f64,
    /// Orientation of the major axis, degrees counter-clockwise from +x
    pub rotation_degrees: f64,
    /// minor_axis / major_axis; 1.0 is circular
    pub ellipticity: f64,
    /// Sum of the background levels removed across all crop iterations
    pub baseline: f64,
    /// RMS half-width of the last crop window, 0.0 when no crop ran
    pub inclusion_radius: f64,
}

impl BeamEstimate {
    /// Centroid as an (x, y) pair.
    pub fn centroid(&self) -> (f64, f64) {
        (self.centroid_x, self.centroid_y)
    }

    /// Overlay width handed to the ellipse renderer.
    ///
    /// The overlay draws the minor axis as its width and the major axis as
    /// its height.
    pub fn overlay_width(&self) -> f64 {
        self.minor_axis
    }

    /// Overlay height handed to the ellipse renderer.
    pub fn overlay_height(&self) -> f64 {
        self.major_axis
    }
}
