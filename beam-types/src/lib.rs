//! Record types shared between the beam profiler and its consumers.
//!
//! Nothing in here does numerics; these are the plain, serializable values
//! that cross the boundary between the analysis core and whatever draws or
//! stores its output.

mod estimate;
pub mod settings;

pub use estimate::BeamEstimate;
pub use settings::{
    AnalyzerConfig, EllipseConvention, ProfilerSettings, SettingsError, DEFAULT_NUM_POINTS,
};
