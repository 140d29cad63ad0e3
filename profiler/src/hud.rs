//! Heads-up display text
//!
//! Several components may publish a text block on top of the camera image.
//! Each owns one key; the display renders all blocks in key order.

use std::collections::BTreeMap;

use beam_types::BeamEstimate;

/// Key under which the beam profiler publishes its block
pub const PROFILER_HUD_KEY: &str = "profiler";

/// Keyed text blocks merged into one overlay
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Hud {
    entries: BTreeMap<String, String>,
}

impl Hud {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish or replace the block for `key`
    pub fn set(&mut self, key: &str, text: impl Into<String>) {
        self.entries.insert(key.to_string(), text.into());
    }

    /// Remove the block for `key`, returning it if present
    pub fn clear(&mut self, key: &str) -> Option<String> {
        self.entries.remove(key)
    }

    /// Set when `text` is `Some`, clear when `None`
    pub fn update(&mut self, key: &str, text: Option<String>) {
        match text {
            Some(text) => self.set(key, text),
            None => {
                self.clear(key);
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All blocks in key order, each followed by a blank line
    pub fn render(&self) -> String {
        let mut text = String::new();
        for block in self.entries.values() {
            text.push_str(block);
            text.push_str("\n\n");
        }
        text
    }
}

/// Human-readable summary of one estimate.
///
/// Lengths and angles carry one decimal, ellipticity three.
pub fn format_estimate(estimate: &BeamEstimate) -> String {
    format!(
        "Centroid: {:.1}, {:.1}\n\
         Major axis: {:.1}\n\
         Minor axis: {:.1}\n\
         Rotation: {:.1}°\n\
         Ellipticity: {:.3}\n\
         Baseline: {:.1}\n\
         Inclusion radius: {:.1}",
        estimate.centroid_x,
        estimate.centroid_y,
        estimate.major_axis,
        estimate.minor_axis,
        estimate.rotation_degrees,
        estimate.ellipticity,
        estimate.baseline,
        estimate.inclusion_radius
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_estimate() {
        let estimate = BeamEstimate {
            centroid_x: 32.04,
            centroid_y: 31.96,
            major_axis: 5.6569,
            minor_axis: 5.6569,
            rotation_degrees: -45.26,
            ellipticity: 0.99987,
            baseline: 0.0,
            inclusion_radius: 8.4853,
        };

        assert_eq!(
            format_estimate(&estimate),
            "Centroid: 32.0, 32.0\n\
             Major axis: 5.7\n\
             Minor axis: 5.7\n\
             Rotation: -45.3°\n\
             Ellipticity: 1.000\n\
             Baseline: 0.0\n\
             Inclusion radius: 8.5"
        );
    }

    #[test]
    fn test_render_sorted_by_key() {
        let mut hud = Hud::new();
        hud.set("profiler", "beam");
        hud.set("minmax", "range");

        assert_eq!(hud.render(), "range\n\nbeam\n\n");
    }

    #[test]
    fn test_update_and_clear() {
        let mut hud = Hud::new();
        hud.update(PROFILER_HUD_KEY, Some("a".to_string()));
        assert_eq!(hud.get(PROFILER_HUD_KEY), Some("a"));

        hud.update(PROFILER_HUD_KEY, Some("b".to_string()));
        assert_eq!(hud.get(PROFILER_HUD_KEY), Some("b"));

        hud.update(PROFILER_HUD_KEY, None);
        assert!(hud.is_empty());
        assert_eq!(hud.render(), "");

        // Clearing a missing key is not an error
        assert_eq!(hud.clear("absent"), None);
    }
}
