//! Seam between the profiler and whatever draws the camera view
//!
//! The profiler only pushes values through [`ProfilerDisplay`]; it never
//! reads display state back. [`Screen`] is an in-memory implementation used
//! by the harness and by tests.

use crate::hud::Hud;

/// Sink for everything the profiler draws on top of the camera image
pub trait ProfilerDisplay {
    /// Publish (`Some`) or remove (`None`) a heads-up text block
    fn set_hud(&mut self, key: &str, text: Option<String>);

    /// Move the centroid marker; `None` removes it
    fn set_centroid(&mut self, centroid: Option<(f64, f64)>);

    /// Replace the ellipse polyline
    fn set_ellipse(&mut self, points: &[(f64, f64)]);

    /// Show or hide the centroid marker and ellipse
    fn set_overlay_visible(&mut self, visible: bool);
}

/// Overlay geometry last pushed by the profiler
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Overlay {
    pub visible: bool,
    pub centroid: Option<(f64, f64)>,
    pub ellipse: Vec<(f64, f64)>,
}

/// In-memory display state
#[derive(Debug, Clone, Default)]
pub struct Screen {
    pub hud: Hud,
    pub overlay: Overlay,
}

impl Screen {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merged heads-up text as it would appear on screen
    pub fn hud_text(&self) -> String {
        self.hud.render()
    }
}

impl ProfilerDisplay for Screen {
    fn set_hud(&mut self, key: &str, text: Option<String>) {
        self.hud.update(key, text);
    }

    fn set_centroid(&mut self, centroid: Option<(f64, f64)>) {
        self.overlay.centroid = centroid;
    }

    fn set_ellipse(&mut self, points: &[(f64, f64)]) {
        self.overlay.ellipse = points.to_vec();
    }

    fn set_overlay_visible(&mut self, visible: bool) {
        self.overlay.visible = visible;
    }
}
