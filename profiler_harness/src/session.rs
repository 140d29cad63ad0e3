//! Frame delivery loop
//!
//! Frames are analysed strictly one after another. A frame the profiler
//! cannot analyse is dropped and the loop moves on; only a failing source
//! ends the session early.

use beam_types::BeamEstimate;
use log::info;
use profiler::{BeamProfiler, ProfilerDisplay};

use crate::source::{FrameSource, SourceError};

/// Outcome of one profiling session
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionSummary {
    /// Frames pulled from the source
    pub delivered: usize,
    /// Frames that produced an estimate
    pub analyzed: usize,
    /// Frames ignored because the profiler was inactive
    pub skipped: usize,
    /// Frames whose analysis failed
    pub dropped: usize,
    /// Estimates in delivery order
    pub estimates: Vec<BeamEstimate>,
}

/// Pull `frames` frames from `source` and feed them through `profiler`.
pub fn run_session<S, D>(
    source: &mut S,
    profiler: &mut BeamProfiler,
    display: &mut D,
    frames: usize,
) -> Result<SessionSummary, SourceError>
where
    S: FrameSource + ?Sized,
    D: ProfilerDisplay + ?Sized,
{
    info!("Profiling {} frames from {}", frames, source.id_string());
    let mut summary = SessionSummary::default();

    for _ in 0..frames {
        let frame = source.next_frame()?;
        summary.delivered += 1;

        match profiler.process_frame(&frame, display) {
            Ok(Some(estimate)) => {
                summary.analyzed += 1;
                summary.estimates.push(estimate);
            }
            Ok(None) => summary.skipped += 1,
            // Already logged by the profiler; the next frame starts fresh
            Err(_) => summary.dropped += 1,
        }
    }

    info!(
        "Session finished: {} analysed, {} skipped, {} dropped",
        summary.analyzed, summary.skipped, summary.dropped
    );
    Ok(summary)
}
