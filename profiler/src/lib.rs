//! Gaussian beam profiling for laser diagnostic cameras
//!
//! Estimates centroid, 1/e² principal axes, rotation and ellipticity of a
//! single beam from image moments, with percentile background subtraction
//! and iterative region-of-interest cropping to reject off-beam clutter.
//!
//! ```
//! use ndarray::{s, Array2};
//! use profiler::{BeamAnalyzer, Frame};
//!
//! let mut data = Array2::<f64>::zeros((64, 64));
//! data.slice_mut(s![30..35, 30..35]).fill(100.0);
//!
//! let estimate = BeamAnalyzer::default().analyze(&Frame::mono(data)).unwrap();
//! assert!((estimate.centroid_x - 32.0).abs() < 1e-9);
//! assert!((estimate.ellipticity - 1.0).abs() < 1e-9);
//! ```

pub mod analyzer;
pub mod crop;
pub mod display;
pub mod ellipse;
pub mod error;
pub mod frame;
pub mod hud;
pub mod moments;
pub mod profiler;
pub mod stats;
pub mod synthetic;

pub use analyzer::{validate_config, BeamAnalyzer, EllipseAxes};
pub use beam_types::{AnalyzerConfig, BeamEstimate, EllipseConvention, ProfilerSettings};
pub use display::{Overlay, ProfilerDisplay, Screen};
pub use ellipse::{render_ellipse, render_estimate, DEFAULT_NUM_POINTS};
pub use error::{AnalysisError, AnalysisStage, ConfigError, FrameError};
pub use frame::Frame;
pub use hud::{format_estimate, Hud, PROFILER_HUD_KEY};
pub use moments::MomentSet;
pub use profiler::BeamProfiler;
pub use stats::StatsError;
