//! Error types for frame validation, configuration and analysis.

use std::fmt;
use thiserror::Error;

use crate::stats::StatsError;

/// Rejected frame layouts
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FrameError {
    #[error("Unsupported frame shape {0:?}: expected (rows, cols) or (rows, cols, 3)")]
    UnsupportedShape(Vec<usize>),
}

/// Rejected analyzer settings
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Background percentile must be within [0, 100], got {0}")]
    PercentileOutOfRange(f64),
    #[error("Crop radius must be positive and finite, got {0}")]
    InvalidCropRadius(f64),
}

/// Step of the estimator in which a computation failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisStage {
    /// Background percentile of the full frame
    Background,
    /// Cropping and recalibration pass (zero-based)
    Crop { iteration: usize },
    /// Axis and rotation derivation from the final moments
    Ellipse,
}

impl fmt::Display for AnalysisStage {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AnalysisStage::Background => write!(f, "background calibration"),
            AnalysisStage::Crop { iteration } => write!(f, "crop pass {}", iteration + 1),
            AnalysisStage::Ellipse => write!(f, "ellipse derivation"),
        }
    }
}

/// Failure to produce an estimate for one frame.
///
/// Every variant describes a frame that should be dropped; the next frame is
/// analysed from scratch.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    #[error("Invalid frame: {0}")]
    Frame(#[from] FrameError),

    #[error("Statistics failed during {stage}: {source}")]
    Stats {
        stage: AnalysisStage,
        #[source]
        source: StatsError,
    },

    #[error("Negative {quantity} ({value}) under square root during {stage}")]
    NegativeVariance {
        stage: AnalysisStage,
        quantity: &'static str,
        value: f64,
    },

    #[error("Non-finite centroid ({x}, {y}) during {stage}")]
    NonFiniteCentroid { stage: AnalysisStage, x: f64, y: f64 },

    #[error("Non-finite second moments during {stage}")]
    NonFiniteMoments { stage: AnalysisStage },
}

impl AnalysisError {
    /// Stage that failed, if the failure happened inside the estimator
    pub fn stage(&self) -> Option<AnalysisStage> {
        match self {
            AnalysisError::Frame(_) => None,
            AnalysisError::Stats { stage, .. }
            | AnalysisError::NegativeVariance { stage, .. }
            | AnalysisError::NonFiniteCentroid { stage, .. }
            | AnalysisError::NonFiniteMoments { stage } => Some(*stage),
        }
    }
}
