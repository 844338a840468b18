//! Geometry boxes.
//!
//! The seven positioning/sizing properties of a component are kept apart from
//! its appearance. Only the normal-state record ever stores them, and they are
//! always written as one unit: a field that is `None` clears the property.

use crate::property::PropertyMap;
use crate::values::Length;

/// Camel-case names of the geometry properties, in storage order.
pub const GEOMETRY_KEYS: [&str; 7] = ["top", "left", "width", "height", "bottom", "right", "zIndex"];

/// Property that geometry depends on; forced to `absolute` whenever a box is applied.
pub const POSITION_KEY: &str = "position";

pub const POSITION_ABSOLUTE: &str = "absolute";

/// True for the seven geometry properties, in either case convention.
pub fn is_geometry_key(key: &str) -> bool {
    GEOMETRY_KEYS.contains(&key) || key == "z-index"
}

/// Copy of `style` without geometry and without `position`.
pub fn strip_geometry(style: &PropertyMap) -> PropertyMap {
    let mut out = style.clone();
    out.retain(|k, _| !is_geometry_key(k) && k != POSITION_KEY);
    out
}

/// Position and size of a component, as unit-bearing strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeometryBox {
    pub top: Option<String>,
    pub left: Option<String>,
    pub width: Option<String>,
    pub height: Option<String>,
    pub bottom: Option<String>,
    pub right: Option<String>,
    pub z_index: Option<String>,
}

impl GeometryBox {
    /// Box placed at `(left, top)` with the given size, all in pixels.
    pub fn from_px(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left: Some(Length::Px(left).to_string()),
            top: Some(Length::Px(top).to_string()),
            width: Some(Length::Px(width).to_string()),
            height: Some(Length::Px(height).to_string()),
            ..Default::default()
        }
    }

    /// Same box with its size replaced by a pixel size.
    pub fn with_px_size(mut self, width: f32, height: f32) -> Self {
        self.width = Some(Length::Px(width).to_string());
        self.height = Some(Length::Px(height).to_string());
        self
    }

    /// Read the geometry out of a resolved presentation.
    pub fn extract(style: &PropertyMap) -> Self {
        let field = |key: &str| {
            style
                .get(key)
                .filter(|v| !v.trim().is_empty())
                .map(str::to_string)
        };
        Self {
            top: field("top"),
            left: field("left"),
            width: field("width"),
            height: field("height"),
            bottom: field("bottom"),
            right: field("right"),
            z_index: field("zIndex"),
        }
    }

    /// True when no field is set.
    pub fn is_empty(&self) -> bool {
        self.entries().all(|(_, v)| v.is_none())
    }

    /// `(camel-case key, value)` for all seven fields, in storage order.
    pub fn entries(&self) -> impl Iterator<Item = (&'static str, Option<&str>)> {
        let values = [
            &self.top,
            &self.left,
            &self.width,
            &self.height,
            &self.bottom,
            &self.right,
            &self.z_index,
        ];
        GEOMETRY_KEYS
            .into_iter()
            .zip(values)
            .map(|(k, v)| (k, v.as_deref().filter(|v| !v.trim().is_empty())))
    }

    /// New record with the geometry fields overwritten and everything else
    /// untouched.
    ///
    /// Set fields are appended after the appearance properties, unset fields
    /// are removed. `position: absolute` accompanies a non-empty box.
    pub fn merge_into(&self, record: &PropertyMap) -> PropertyMap {
        let mut merged = record.clone();
        merged.retain(|k, _| !is_geometry_key(k) && k != POSITION_KEY);
        for (key, value) in self.entries() {
            if let Some(value) = value {
                merged.insert(key, value);
            }
        }
        if !self.is_empty() {
            merged.insert(POSITION_KEY, POSITION_ABSOLUTE);
        }
        merged
    }
}
