//! Frame-to-ellipse estimation
//!
//! One call turns one frame into one [`BeamEstimate`]:
//!
//! 1. Reduce color frames to intensity.
//! 2. Subtract a percentile background (no flooring at zero).
//! 3. Compute normalized moments.
//! 4. `num_crops` times: crop to a box sized from the current second
//!    moments, recalibrate the background on the crop alone, recompute.
//! 5. Shift the centroid back into full-frame coordinates.
//! 6. Derive 1/e² axes and orientation from the final second moments.
//!
//! The analyzer keeps no state between calls except its configuration, so
//! independent frames can be analysed concurrently.

use beam_types::{AnalyzerConfig, BeamEstimate};
use log::{debug, trace};
use ndarray::{Array2, ArrayView2};
use rayon::prelude::*;

use crate::crop::{checked_sqrt, CropWindow};
use crate::error::{AnalysisError, AnalysisStage, ConfigError};
use crate::frame::Frame;
use crate::moments::MomentSet;
use crate::stats::percentile;

/// 2^1.5: converts a standard deviation into a 1/e² full width
const AXIS_SCALE: f64 = 2.828_427_124_746_190_3;

/// Check the parts of a configuration the numerics depend on.
pub fn validate_config(config: &AnalyzerConfig) -> Result<(), ConfigError> {
    if !(0.0..=100.0).contains(&config.background_percentile) {
        return Err(ConfigError::PercentileOutOfRange(
            config.background_percentile,
        ));
    }
    if !(config.crop_radius.is_finite() && config.crop_radius > 0.0) {
        return Err(ConfigError::InvalidCropRadius(config.crop_radius));
    }
    Ok(())
}

/// Principal axes of the intensity ellipse
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EllipseAxes {
    pub major_axis: f64,
    pub minor_axis: f64,
    pub rotation_degrees: f64,
    pub ellipticity: f64,
}

impl EllipseAxes {
    /// Eigen-decomposition of the 2x2 second-moment matrix, scaled to 1/e²
    /// full widths.
    ///
    /// A zero-size spot reports an ellipticity of 1.0.
    pub fn from_moments(moments: &MomentSet) -> Result<Self, AnalysisError> {
        let stage = AnalysisStage::Ellipse;
        let MomentSet { m20, m02, m11, .. } = *moments;
        if !(m20.is_finite() && m02.is_finite() && m11.is_finite()) {
            return Err(AnalysisError::NonFiniteMoments { stage });
        }

        let q = ((m20 - m02).powi(2) + 4.0 * m11 * m11).sqrt();
        let trace = m20 + m02;
        let scale = trace.abs() + q;

        let major_axis = AXIS_SCALE * checked_sqrt(trace + q, scale, stage, "major axis")?;
        let minor_axis = AXIS_SCALE * checked_sqrt(trace - q, scale, stage, "minor axis")?;
        let rotation_degrees = (0.5 * (2.0 * m11).atan2(m20 - m02)).to_degrees();
        let ellipticity = if major_axis > 0.0 {
            minor_axis / major_axis
        } else {
            1.0
        };

        Ok(Self {
            major_axis,
            minor_axis,
            rotation_degrees,
            ellipticity,
        })
    }
}

/// Stateless-per-call Gaussian beam estimator
#[derive(Debug, Clone, PartialEq)]
pub struct BeamAnalyzer {
    config: AnalyzerConfig,
}

impl Default for BeamAnalyzer {
    fn default() -> Self {
        Self {
            config: AnalyzerConfig::default(),
        }
    }
}

impl BeamAnalyzer {
    /// Create an analyzer, rejecting configurations that would break the
    /// numerics.
    pub fn new(config: AnalyzerConfig) -> Result<Self, ConfigError> {
        validate_config(&config)?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Replace the configuration between calls.
    ///
    /// The old configuration is kept if the new one is invalid.
    pub fn reconfigure(&mut self, config: AnalyzerConfig) -> Result<(), ConfigError> {
        validate_config(&config)?;
        self.config = config;
        Ok(())
    }

    /// Estimate the beam in one frame.
    ///
    /// Color frames without exactly three channels fail with
    /// [`AnalysisError::Frame`].
    pub fn analyze(&self, frame: &Frame) -> Result<BeamEstimate, AnalysisError> {
        self.analyze_owned(frame.to_intensity()?)
    }

    /// Estimate the beam in an intensity field that is already single-channel.
    pub fn analyze_intensity(
        &self,
        intensity: ArrayView2<f64>,
    ) -> Result<BeamEstimate, AnalysisError> {
        self.analyze_owned(intensity.to_owned())
    }

    /// Analyse independent frames in parallel, preserving input order.
    pub fn analyze_batch(&self, frames: &[Frame]) -> Vec<Result<BeamEstimate, AnalysisError>> {
        frames.par_iter().map(|frame| self.analyze(frame)).collect()
    }

    fn analyze_owned(&self, mut working: Array2<f64>) -> Result<BeamEstimate, AnalysisError> {
        let percentile_value = self.config.background_percentile;

        let mut baseline = subtract_background(&mut working, percentile_value)
            .map_err(|source| AnalysisError::Stats {
                stage: AnalysisStage::Background,
                source,
            })?;
        let mut moments = MomentSet::compute(&working.view());
        trace!("Full-frame moments: {moments:?}, background {baseline:.3}");

        let mut inclusion_radius = 0.0;
        let (mut left, mut bottom) = (0usize, 0usize);

        for iteration in 0..self.config.num_crops {
            let window =
                CropWindow::around(&moments, self.config.crop_radius, working.dim(), iteration)?;
            inclusion_radius = window.inclusion_radius;
            if window.is_empty() {
                debug!("Crop pass {} left an empty window", iteration + 1);
            }
            left += window.left;
            bottom += window.bottom;

            window.apply(&mut working);

            let background = subtract_background(&mut working, percentile_value).map_err(
                |source| AnalysisError::Stats {
                    stage: AnalysisStage::Crop { iteration },
                    source,
                },
            )?;
            baseline += background;
            moments = MomentSet::compute(&working.view());

            debug!(
                "Crop pass {}: window x {}..{} y {}..{} (offset {}, {}), background {:.3}, \
                 centroid ({:.3}, {:.3})",
                iteration + 1,
                window.left,
                window.right,
                window.bottom,
                window.top,
                left,
                bottom,
                background,
                moments.m10,
                moments.m01
            );
        }

        let moments = moments.offset(left, bottom);
        let axes = EllipseAxes::from_moments(&moments)?;

        Ok(BeamEstimate {
            centroid_x: moments.m10,
            centroid_y: moments.m01,
            major_axis: axes.major_axis,
            minor_axis: axes.minor_axis,
            rotation_degrees: axes.rotation_degrees,
            ellipticity: axes.ellipticity,
            baseline,
            inclusion_radius,
        })
    }
}

/// Subtract the `p`-th percentile from every sample and return it.
fn subtract_background(
    region: &mut Array2<f64>,
    p: f64,
) -> Result<f64, crate::stats::StatsError> {
    let background = percentile(region.iter().copied(), p)?;
    region.mapv_inplace(|v| v - background);
    Ok(background)
}
