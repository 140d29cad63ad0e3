//! Harness for driving the beam profiler
//!
//! Provides frame sources (a synthetic Gaussian camera and a still image),
//! the per-frame delivery loop, and the `beam_profile` command line tool.

pub mod session;
pub mod source;

pub use session::{run_session, SessionSummary};
pub use source::{DummyGaussian, DummyGaussianConfig, FrameSource, ImageFileSource, SourceError};
