//! Per-context style records.
//!
//! Each element stores one encoded record per [`Context`] in the context's
//! attribute (`style-normal`, `style-hover`, `style-pressed`). An absent
//! attribute means the context has no override. Only the normal record carries
//! geometry, and that geometry is always taken from the live box.
//!
//! None of these operations fail; unknown nodes read as empty and ignore
//! writes.

use stagekit_css::{
    camel_case, decode, encode, is_geometry_key, strip_geometry, GeometryBox, PropertyMap,
    NONE_VALUE, POSITION_ABSOLUTE, POSITION_KEY,
};
use tracing::trace;

use crate::context::Context;
use crate::document::{Document, NodeId};

/// Browsers may re-quote values such as `url('a.png')`; quotes are ignored
/// when deciding whether a live value changed.
fn same_live_value(current: Option<&str>, value: &str) -> bool {
    current.is_some_and(|current| current.replace('\'', "") == value.replace('\'', ""))
}

impl Document {
    /// Full decoded record for a context, geometry included.
    pub fn get_css(&self, id: NodeId, context: Context) -> PropertyMap {
        self.attribute(id, context.attribute_name())
            .map(decode)
            .unwrap_or_default()
    }

    pub fn has_style(&self, id: NodeId, context: Context) -> bool {
        self.attribute(id, context.attribute_name())
            .is_some_and(|raw| !raw.trim().is_empty())
    }

    /// Appearance-only view of a context's record: geometry and `position`
    /// are stripped.
    pub fn get_style(&self, id: NodeId, context: Context) -> PropertyMap {
        strip_geometry(&self.get_css(id, context))
    }

    /// Apply appearance properties live and store them as the context's record.
    ///
    /// A `none` value clears the property. Geometry keys in `style` are
    /// ignored; for [`Context::Normal`] the record's geometry is read back from
    /// the live box instead.
    pub fn set_style(&mut self, id: NodeId, style: &PropertyMap, context: Context) {
        if self.element(id).is_none() {
            trace!(?id, "Ignoring style write on a non-element");
            return;
        }

        let mut record = PropertyMap::new();
        for (name, value) in style.iter() {
            let name = camel_case(name);
            let value = value.trim();
            if value.is_empty() {
                continue;
            }
            if is_geometry_key(&name) || name == POSITION_KEY {
                trace!(property = %name, %context, "Geometry is only written through the bounding box");
                continue;
            }
            if value == NONE_VALUE {
                self.set_style_property(id, &name, None);
                continue;
            }
            if !same_live_value(self.style_property(id, &name), value) {
                self.set_style_property(id, &name, Some(value));
            }
            record.insert(name, value);
        }

        if context == Context::Normal {
            record = self.bounding_box(id).merge_into(&record);
        }
        self.store_record(id, context, &record);
    }

    /// Geometry of the live box.
    pub fn bounding_box(&self, id: NodeId) -> GeometryBox {
        self.presentation(id)
            .map(GeometryBox::extract)
            .unwrap_or_default()
    }

    /// Move/resize the live box and commit the geometry to the normal record.
    ///
    /// Unset fields are cleared, never left at a previous value.
    pub fn set_bounding_box(&mut self, id: NodeId, bb: &GeometryBox) {
        if self.element(id).is_none() {
            return;
        }
        self.apply_geometry(id, bb);
        let merged = bb.merge_into(&self.get_css(id, Context::Normal));
        self.store_record(id, Context::Normal, &merged);
    }

    /// Write a geometry box to the live presentation, forcing absolute
    /// positioning.
    pub fn apply_geometry(&mut self, id: NodeId, bb: &GeometryBox) {
        if self.style_property(id, POSITION_KEY) != Some(POSITION_ABSOLUTE) {
            self.set_style_property(id, POSITION_KEY, Some(POSITION_ABSOLUTE));
        }
        for (key, value) in bb.entries() {
            match value {
                Some(value) => {
                    if self.style_property(id, key) != Some(value) {
                        self.set_style_property(id, key, Some(value));
                    }
                }
                None => self.set_style_property(id, key, None),
            }
        }
    }

    /// Encode and store a record, skipping redundant writes. An empty record
    /// removes the attribute.
    fn store_record(&mut self, id: NodeId, context: Context, record: &PropertyMap) {
        let encoded = encode(record);
        let attr = context.attribute_name();
        if encoded.is_empty() {
            self.remove_attribute(id, attr);
        } else if self.attribute(id, attr) != Some(encoded.as_str()) {
            self.set_attribute(id, attr, &encoded);
        }
    }
}
