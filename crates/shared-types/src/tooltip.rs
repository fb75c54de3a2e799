//! Tooltip settings and data structures shared by the engine and its hosts

use serde::{Deserialize, Serialize};

use crate::errors::{TooltipError, TooltipResult};

/// Mark labels the chart library puts on marker groups (`<g aria-label="dot">`)
pub const MARKER_GROUP_LABELS: [&str; 8] =
    ["dot", "line", "area", "bar", "rect", "cell", "tick", "text"];

/// Marker elements sampled in DOM mode when no selector is configured
pub const DEFAULT_MARKER_SELECTOR: &str =
    r#"g[aria-label="dot"] circle, g[aria-label="dot"] path"#;

/// Tried once when the configured selector matches nothing
pub const FALLBACK_MARKER_SELECTOR: &str = "circle";

pub const DEFAULT_CLASS_NAME: &str = "plot-tooltip";

/// How data points are mapped into a space comparable with the pointer
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum CoordinateMode {
    /// Scale mode when accessors and scales are both available, else DOM mode
    #[default]
    Auto,
    /// Always use the chart's value-to-pixel scales
    Scales,
    /// Always measure rendered marker elements
    Elements,
}

/// Serializable tooltip configuration
///
/// Accessors, content functions and the container override are host values
/// and live next to these settings, not inside them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct TooltipSettings {
    /// Search radius in pixels
    pub hit_radius: f64,

    /// Trust markup returned by the `html` content function
    #[serde(alias = "allowHTML")]
    pub allow_html: bool,

    /// Minimum distance between the overlay and the viewport edges
    pub clamp_padding: f64,

    /// CSS class applied to the overlay element
    pub class_name: String,

    /// Marker selector used in DOM mode
    #[serde(alias = "dotSelector")]
    pub elements_selector: Option<String>,

    /// Capture the pointer while a datum is matched
    pub capture: bool,

    /// Overlay offset from the pointer
    pub offset_x: f64,
    pub offset_y: f64,

    pub mode: CoordinateMode,
}

impl Default for TooltipSettings {
    fn default() -> Self {
        Self {
            hit_radius: 16.0,
            allow_html: false,
            clamp_padding: 8.0,
            class_name: DEFAULT_CLASS_NAME.to_string(),
            elements_selector: None,
            capture: true,
            offset_x: 12.0,
            offset_y: 12.0,
            mode: CoordinateMode::Auto,
        }
    }
}

impl TooltipSettings {
    pub fn from_json(json: &str) -> TooltipResult<Self> {
        let settings: TooltipSettings =
            serde_json::from_str(json).map_err(|e| TooltipError::InvalidConfig {
                message: format!("Failed to parse settings: {e}"),
                field: None,
            })?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> TooltipResult<()> {
        if !self.hit_radius.is_finite() || self.hit_radius < 0.0 {
            return Err(TooltipError::invalid_config(
                "hitRadius",
                format!("must be a finite non-negative number, got {}", self.hit_radius),
            ));
        }
        if !self.clamp_padding.is_finite() || self.clamp_padding < 0.0 {
            return Err(TooltipError::invalid_config(
                "clampPadding",
                format!(
                    "must be a finite non-negative number, got {}",
                    self.clamp_padding
                ),
            ));
        }
        if !self.offset_x.is_finite() || !self.offset_y.is_finite() {
            return Err(TooltipError::invalid_config(
                "offsetX",
                "offsets must be finite",
            ));
        }
        if let Some(selector) = &self.elements_selector {
            if selector.trim().is_empty() {
                return Err(TooltipError::invalid_config(
                    "elementsSelector",
                    "selector must not be empty",
                ));
            }
        }
        Ok(())
    }

    pub fn marker_selector(&self) -> &str {
        self.elements_selector
            .as_deref()
            .unwrap_or(DEFAULT_MARKER_SELECTOR)
    }
}
