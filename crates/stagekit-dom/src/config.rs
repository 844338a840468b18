//! Stage configuration.

use serde::{Deserialize, Serialize};
use stagekit_css::{Color, GeometryBox};

use crate::error::ConfigError;

/// Class names and defaults used by the component model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StageConfig {
    /// Marks a node as an editable unit.
    pub editable_class: String,
    /// Selection marker.
    pub selected_class: String,
    /// Persisted lock marker.
    pub locked_class: String,
    /// Marks nodes visible only on some pages.
    pub page_class: String,
    /// Marks the element new children attach to.
    pub background_class: String,
    /// Inner payload element of HTML boxes.
    pub html_content_class: String,
    /// Placement and size of new components, in pixels.
    pub default_left: f32,
    pub default_top: f32,
    pub default_width: f32,
    pub default_height: f32,
    /// Background fill of new components.
    pub default_fill: String,
    pub default_text: String,
    pub default_html: String,
}

impl Default for StageConfig {
    fn default() -> Self {
        Self {
            editable_class: "editable-style".to_string(),
            selected_class: "selected".to_string(),
            locked_class: "locked-style".to_string(),
            page_class: "paged-element".to_string(),
            background_class: "background".to_string(),
            html_content_class: "html-content".to_string(),
            default_left: 100.0,
            default_top: 100.0,
            default_width: 100.0,
            default_height: 100.0,
            default_fill: Color::WHITE.to_string(),
            default_text: "New text box".to_string(),
            default_html: "<p>New HTML box</p>".to_string(),
        }
    }
}

impl StageConfig {
    /// Load a configuration from JSON. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Geometry given to newly created components.
    pub fn default_geometry(&self) -> GeometryBox {
        GeometryBox::from_px(
            self.default_left,
            self.default_top,
            self.default_width,
            self.default_height,
        )
    }
}
