//! Intensity-weighted image moments up to second order
//!
//! The first moments give the centroid of the working region in its own
//! pixel coordinates (x = column, y = row). Second moments are central and
//! normalized by the total intensity, i.e. they are the variances and the
//! covariance of the intensity distribution.

use ndarray::ArrayView2;

/// Normalized moments of one working region
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MomentSet {
    /// Total intensity, or 1.0 when the region sums to exactly zero
    pub m00: f64,
    /// Centroid x (column)
    pub m10: f64,
    /// Centroid y (row)
    pub m01: f64,
    /// Variance along x
    pub m20: f64,
    /// Variance along y
    pub m02: f64,
    /// Covariance of x and y
    pub m11: f64,
}

impl MomentSet {
    /// Calculate the moments of a (background-subtracted) intensity region.
    ///
    /// Negative samples are kept; the caller decides what a negative
    /// variance means. An empty region behaves like an all-zero one.
    pub fn compute(region: &ArrayView2<f64>) -> Self {
        let mut sum = 0.0;
        let mut sum_x = 0.0;
        let mut sum_y = 0.0;
        for ((row, col), &intensity) in region.indexed_iter() {
            sum += intensity;
            sum_x += intensity * col as f64;
            sum_y += intensity * row as f64;
        }

        let m00 = if sum == 0.0 { 1.0 } else { sum };
        let m10 = sum_x / m00;
        let m01 = sum_y / m00;

        let mut sum_xx = 0.0;
        let mut sum_yy = 0.0;
        let mut sum_xy = 0.0;
        for ((row, col), &intensity) in region.indexed_iter() {
            let dx = col as f64 - m10;
            let dy = row as f64 - m01;
            sum_xx += intensity * dx * dx;
            sum_yy += intensity * dy * dy;
            sum_xy += intensity * dx * dy;
        }

        Self {
            m00,
            m10,
            m01,
            m20: sum_xx / m00,
            m02: sum_yy / m00,
            m11: sum_xy / m00,
        }
    }

    /// Centroid as (x, y) in the coordinates of the region it was computed on
    pub fn centroid(&self) -> (f64, f64) {
        (self.m10, self.m01)
    }

    /// Copy with the centroid moved by an integer crop offset
    pub fn offset(&self, dx: usize, dy: usize) -> Self {
        Self {
            m10: self.m10 + dx as f64,
            m01: self.m01 + dy as f64,
            ..*self
        }
    }
}
