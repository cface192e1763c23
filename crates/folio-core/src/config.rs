//! Tunable thresholds for snapping, navigation and gestures.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid config value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Engine configuration.
///
/// Every field falls back to its default when absent, so a partial JSON
/// object only overrides what it names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Element snap threshold in screen pixels (at 100% zoom).
    pub element_snap_threshold: f64,
    /// Page snap distance in canvas units.
    pub page_snap_distance: f64,
    /// Only pages closer than this participate in page snapping.
    pub page_proximity: f64,
    /// Gap kept between snapped neighbouring pages.
    pub page_padding: f64,
    /// Buffer used by the post-snap overlap check.
    pub overlap_buffer: f64,
    /// Max cross-axis offset for two pages to count as neighbours.
    pub adjacency_tolerance: f64,
    /// Row tolerance of the side navigator ordering.
    pub navigator_row_tolerance: f64,
    /// Pointer travel (screen px) before a press becomes a drag.
    pub drag_threshold: f64,
    /// Max press duration for a click, in milliseconds.
    pub click_max_ms: u64,
    /// Duration of the scroll-to-page animation, in milliseconds.
    pub pan_animation_ms: u64,
    pub zoom_min: f64,
    pub zoom_max: f64,
    pub zoom_step: f64,
    /// Zoom change per wheel pixel while Ctrl/Cmd is held.
    pub wheel_zoom_sensitivity: f64,
    pub minimap_width: f64,
    pub minimap_height: f64,
    /// Upper bound of the minimap projection scale.
    pub minimap_max_scale: f64,
    /// Smallest width/height an element can be resized to.
    pub min_element_size: f64,
    /// Resize handle hit radius in screen pixels.
    pub handle_hit_radius: f64,
    /// Presentation autoplay interval, in milliseconds.
    pub autoplay_interval_ms: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            element_snap_threshold: 8.0,
            page_snap_distance: 80.0,
            page_proximity: 200.0,
            page_padding: 30.0,
            overlap_buffer: 10.0,
            adjacency_tolerance: 100.0,
            navigator_row_tolerance: 100.0,
            drag_threshold: 5.0,
            click_max_ms: 150,
            pan_animation_ms: 600,
            zoom_min: 25.0,
            zoom_max: 200.0,
            zoom_step: 25.0,
            wheel_zoom_sensitivity: 0.01,
            minimap_width: 240.0,
            minimap_height: 160.0,
            minimap_max_scale: 0.3,
            min_element_size: 20.0,
            handle_hit_radius: 8.0,
            autoplay_interval_ms: 5000,
        }
    }
}

impl EngineConfig {
    /// Parse a configuration from JSON and validate it.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the configuration to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Check that every threshold is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("element_snap_threshold", self.element_snap_threshold),
            ("page_snap_distance", self.page_snap_distance),
            ("page_proximity", self.page_proximity),
            ("adjacency_tolerance", self.adjacency_tolerance),
            ("navigator_row_tolerance", self.navigator_row_tolerance),
            ("drag_threshold", self.drag_threshold),
            ("zoom_min", self.zoom_min),
            ("zoom_step", self.zoom_step),
            ("minimap_width", self.minimap_width),
            ("minimap_height", self.minimap_height),
            ("minimap_max_scale", self.minimap_max_scale),
            ("min_element_size", self.min_element_size),
        ];
        for (field, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::Invalid {
                    field,
                    reason: format!("must be a positive number, got {}", value),
                });
            }
        }

        let non_negative = [
            ("page_padding", self.page_padding),
            ("overlap_buffer", self.overlap_buffer),
            ("wheel_zoom_sensitivity", self.wheel_zoom_sensitivity),
            ("handle_hit_radius", self.handle_hit_radius),
        ];
        for (field, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::Invalid {
                    field,
                    reason: format!("must be zero or positive, got {}", value),
                });
            }
        }

        if self.zoom_min >= self.zoom_max {
            return Err(ConfigError::Invalid {
                field: "zoom_max",
                reason: format!("must exceed zoom_min ({})", self.zoom_min),
            });
        }
        if self.pan_animation_ms == 0 {
            return Err(ConfigError::Invalid {
                field: "pan_animation_ms",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(EngineConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = EngineConfig::from_json(r#"{ "page_padding": 40.0 }"#).unwrap();
        assert!((config.page_padding - 40.0).abs() < f64::EPSILON);
        assert!((config.page_snap_distance - 80.0).abs() < f64::EPSILON);
        assert_eq!(config.click_max_ms, 150);
    }

    #[test]
    fn test_rejects_inverted_zoom_range() {
        let result = EngineConfig::from_json(r#"{ "zoom_min": 300.0 }"#);
        assert!(matches!(result, Err(ConfigError::Invalid { field: "zoom_max", .. })));
    }

    #[test]
    fn test_rejects_negative_threshold() {
        let result = EngineConfig::from_json(r#"{ "drag_threshold": -1.0 }"#);
        assert!(matches!(result, Err(ConfigError::Invalid { field: "drag_threshold", .. })));
    }

    #[test]
    fn test_bad_json() {
        assert!(matches!(EngineConfig::from_json("{"), Err(ConfigError::Parse(_))));
    }
}
