//! Profiler settings as handed in by a configuration panel or a JSON file.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading settings
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Failed to parse profiler settings: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Default number of samples on the overlay ellipse
pub const DEFAULT_NUM_POINTS: usize = 40;

/// Sign convention used when sampling the overlay ellipse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EllipseConvention {
    /// Parametric form used by existing deployments; the y equation reuses
    /// the x equation's rotation terms with a subtracted minor term.
    #[default]
    Legacy,
    /// Standard 2D rotation matrix applied to the axis-aligned ellipse.
    Rotation,
}

/// Tunables of the frame-to-ellipse estimator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Percentile (0-100) of the working region taken as background
    pub background_percentile: f64,
    /// Number of crop-and-recompute passes
    pub num_crops: usize,
    /// Crop half-width in units of 4 sigma (beam diameters)
    pub crop_radius: f64,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            background_percentile: 15.0,
            num_crops: 1,
            crop_radius: 1.5,
        }
    }
}

/// Everything the profiler component needs between frames.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfilerSettings {
    /// Analyse incoming frames and show the overlay
    pub active: bool,
    /// Estimator tunables
    pub analyzer: AnalyzerConfig,
    /// Number of samples on the overlay ellipse
    pub num_points: usize,
    /// Sign convention of the overlay ellipse
    pub ellipse_convention: EllipseConvention,
}

impl Default for ProfilerSettings {
    fn default() -> Self {
        Self {
            active: false,
            analyzer: AnalyzerConfig::default(),
            num_points: DEFAULT_NUM_POINTS,
            ellipse_convention: EllipseConvention::default(),
        }
    }
}

impl ProfilerSettings {
    /// Parse settings from JSON; missing fields take their defaults.
    pub fn from_json(text: &str) -> Result<Self, SettingsError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Serialize settings to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
