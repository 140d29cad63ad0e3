//! Beam profiler component
//!
//! Wraps a [`BeamAnalyzer`] with the on/off switch and overlay publishing the
//! viewer needs. Each delivered frame goes through an explicit pipeline:
//! analyse, format the heads-up text, sample the ellipse, push all three to
//! the display.

use beam_types::{BeamEstimate, ProfilerSettings};
use log::{debug, warn};

use crate::analyzer::BeamAnalyzer;
use crate::display::ProfilerDisplay;
use crate::ellipse::render_estimate;
use crate::error::{AnalysisError, ConfigError};
use crate::frame::Frame;
use crate::hud::{format_estimate, PROFILER_HUD_KEY};

/// Per-frame beam profiling with display output
#[derive(Debug, Clone)]
pub struct BeamProfiler {
    settings: ProfilerSettings,
    analyzer: BeamAnalyzer,
    last_estimate: Option<BeamEstimate>,
}

impl BeamProfiler {
    pub fn new(settings: ProfilerSettings) -> Result<Self, ConfigError> {
        let analyzer = BeamAnalyzer::new(settings.analyzer)?;
        Ok(Self {
            settings,
            analyzer,
            last_estimate: None,
        })
    }

    pub fn settings(&self) -> &ProfilerSettings {
        &self.settings
    }

    pub fn analyzer(&self) -> &BeamAnalyzer {
        &self.analyzer
    }

    pub fn is_active(&self) -> bool {
        self.settings.active
    }

    /// Most recent successful estimate
    pub fn last_estimate(&self) -> Option<&BeamEstimate> {
        self.last_estimate.as_ref()
    }

    /// Swap in new settings between frames.
    ///
    /// The `active` flag of `settings` is ignored; use [`Self::set_active`]
    /// so the display is kept in step.
    pub fn reconfigure(&mut self, settings: ProfilerSettings) -> Result<(), ConfigError> {
        self.analyzer.reconfigure(settings.analyzer)?;
        self.settings = ProfilerSettings {
            active: self.settings.active,
            ..settings
        };
        Ok(())
    }

    /// Turn analysis on or off.
    ///
    /// Turning it off removes the profiler's heads-up block. Overlay
    /// visibility always follows the flag.
    pub fn set_active<D: ProfilerDisplay + ?Sized>(&mut self, active: bool, display: &mut D) {
        self.settings.active = active;
        if !active {
            display.set_hud(PROFILER_HUD_KEY, None);
        }
        display.set_overlay_visible(active);
    }

    /// Analyse one frame and publish the result.
    ///
    /// Every published result also shows the overlay, so a profiler built
    /// with `active: true` needs no separate [`Self::set_active`] call.
    /// Returns `Ok(None)` without touching the frame while inactive. On
    /// failure the display keeps showing the previous result; the caller
    /// should drop the frame and continue with the next one.
    pub fn process_frame<D: ProfilerDisplay + ?Sized>(
        &mut self,
        frame: &Frame,
        display: &mut D,
    ) -> Result<Option<BeamEstimate>, AnalysisError> {
        if !self.settings.active {
            return Ok(None);
        }

        let estimate = match self.analyzer.analyze(frame) {
            Ok(estimate) => estimate,
            Err(err) => {
                match err.stage() {
                    Some(stage) => warn!("Dropping frame, {stage} failed: {err}"),
                    None => warn!("Dropping frame: {err}"),
                }
                return Err(err);
            }
        };
        debug!(
            "Beam at ({:.2}, {:.2}), axes {:.2} x {:.2}",
            estimate.centroid_x, estimate.centroid_y, estimate.major_axis, estimate.minor_axis
        );

        self.publish(&estimate, display);
        self.last_estimate = Some(estimate);
        Ok(Some(estimate))
    }

    fn publish<D: ProfilerDisplay + ?Sized>(&self, estimate: &BeamEstimate, display: &mut D) {
        display.set_hud(PROFILER_HUD_KEY, Some(format_estimate(estimate)));
        display.set_centroid(Some(estimate.centroid()));
        let points = render_estimate(
            estimate,
            self.settings.num_points,
            self.settings.ellipse_convention,
        );
        display.set_ellipse(&points);
        display.set_overlay_visible(true);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::Screen;
    use beam_types::{AnalyzerConfig, DEFAULT_NUM_POINTS};
    use ndarray::{s, Array2};

    fn active_settings() -> ProfilerSettings {
        ProfilerSettings {
            active: true,
            ..Default::default()
        }
    }

    fn spot_frame() -> Frame {
        let mut data = Array2::<f64>::zeros((48, 48));
        data.slice_mut(s![20..25, 10..15]).fill(80.0);
        Frame::mono(data)
    }

    #[test]
    fn test_inactive_skips_frames() {
        let mut profiler = BeamProfiler::new(ProfilerSettings::default()).unwrap();
        let mut screen = Screen::new();

        let result = profiler.process_frame(&spot_frame(), &mut screen).unwrap();
        assert!(result.is_none());
        assert!(screen.hud.is_empty());
        assert!(profiler.last_estimate().is_none());
    }

    #[test]
    fn test_active_publishes_overlay() {
        let mut profiler = BeamProfiler::new(active_settings()).unwrap();
        let mut screen = Screen::new();

        let estimate = profiler
            .process_frame(&spot_frame(), &mut screen)
            .unwrap()
            .unwrap();

        approx::assert_relative_eq!(estimate.centroid_x, 12.0, epsilon = 1e-9);
        approx::assert_relative_eq!(estimate.centroid_y, 22.0, epsilon = 1e-9);
        assert_eq!(screen.overlay.centroid, Some(estimate.centroid()));
        assert_eq!(screen.overlay.ellipse.len(), DEFAULT_NUM_POINTS);
        assert!(screen
            .hud
            .get(PROFILER_HUD_KEY)
            .unwrap()
            .starts_with("Centroid: 12.0, 22.0\n"));
        assert_eq!(profiler.last_estimate(), Some(&estimate));
    }

    #[test]
    fn test_active_at_construction_shows_overlay() {
        let mut profiler = BeamProfiler::new(active_settings()).unwrap();
        let mut screen = Screen::new();
        assert!(!screen.overlay.visible);

        profiler.process_frame(&spot_frame(), &mut screen).unwrap();
        assert!(screen.overlay.visible);
    }

    #[test]
    fn test_deactivate_clears_hud() {
        let mut profiler = BeamProfiler::new(active_settings()).unwrap();
        let mut screen = Screen::new();
        screen.hud.set("other", "keep me");

        profiler.set_active(true, &mut screen);
        profiler.process_frame(&spot_frame(), &mut screen).unwrap();
        assert!(screen.overlay.visible);
        assert!(screen.hud.get(PROFILER_HUD_KEY).is_some());

        profiler.set_active(false, &mut screen);
        assert!(!profiler.is_active());
        assert!(!screen.overlay.visible);
        assert!(screen.hud.get(PROFILER_HUD_KEY).is_none());
        assert_eq!(screen.hud.get("other"), Some("keep me"));
    }

    #[test]
    fn test_failed_frame_leaves_display_untouched() {
        let mut profiler = BeamProfiler::new(active_settings()).unwrap();
        let mut screen = Screen::new();
        profiler.process_frame(&spot_frame(), &mut screen).unwrap();
        let before = screen.hud_text();

        let bad = Frame::mono(Array2::from_elem((8, 8), f64::NAN));
        assert!(profiler.process_frame(&bad, &mut screen).is_err());
        assert_eq!(screen.hud_text(), before);
        assert!(profiler.last_estimate().is_some());
    }

    #[test]
    fn test_reconfigure_keeps_active_flag() {
        let mut profiler = BeamProfiler::new(active_settings()).unwrap();
        let new_settings = ProfilerSettings {
            active: false,
            num_points: 12,
            analyzer: AnalyzerConfig {
                num_crops: 0,
                ..Default::default()
            },
            ..Default::default()
        };

        profiler.reconfigure(new_settings).unwrap();
        assert!(profiler.is_active());
        assert_eq!(profiler.settings().num_points, 12);
        assert_eq!(profiler.analyzer().config().num_crops, 0);

        let mut screen = Screen::new();
        profiler.process_frame(&spot_frame(), &mut screen).unwrap();
        assert_eq!(screen.overlay.ellipse.len(), 12);
    }

    #[test]
    fn test_reconfigure_rejects_invalid() {
        let mut profiler = BeamProfiler::new(active_settings()).unwrap();
        let bad = ProfilerSettings {
            analyzer: AnalyzerConfig {
                background_percentile: -1.0,
                ..Default::default()
            },
            num_points: 3,
            ..Default::default()
        };

        assert!(profiler.reconfigure(bad).is_err());
        assert_eq!(profiler.settings().num_points, DEFAULT_NUM_POINTS);
    }
}
