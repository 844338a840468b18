//! Style record codec.
//!
//! Converts between the stored attribute form (`prop: value; prop: value; `)
//! and a [`PropertyMap`]. This is the only place that translates property
//! names between selector case (`background-color`) and camel case
//! (`backgroundColor`).
//!
//! Neither direction can fail: malformed segments are dropped while decoding,
//! and deleted (`none`) or empty values are skipped while encoding.

use tracing::trace;

use crate::property::PropertyMap;

/// Value that marks a property for deletion rather than assignment.
pub const NONE_VALUE: &str = "none";

/// Decode a stored style string into a property map with camel-case keys.
///
/// The string is split on `;`, each segment on its first `:`. Segments with
/// no `:` or with an empty name or value are ignored.
pub fn decode(raw: &str) -> PropertyMap {
    let mut map = PropertyMap::new();
    for segment in raw.split(';') {
        let segment = segment.trim();
        if segment.is_empty() {
            continue;
        }
        let Some((name, value)) = segment.split_once(':') else {
            trace!(segment, "Dropping style segment without a separator");
            continue;
        };
        let (name, value) = (name.trim(), value.trim());
        if name.is_empty() || value.is_empty() {
            trace!(segment, "Dropping empty style declaration");
            continue;
        }
        map.insert(camel_case(name), value);
    }
    map
}

/// Encode a property map into the stored style string.
///
/// Entries whose value is empty or `none` are omitted entirely.
pub fn encode(map: &PropertyMap) -> String {
    let mut out = String::new();
    for (name, value) in map.iter() {
        if !is_assignable(value) {
            continue;
        }
        out.push_str(&selector_case(name));
        out.push_str(": ");
        out.push_str(value);
        out.push_str("; ");
    }
    out
}

/// True when a value assigns the property (non-empty and not `none`).
pub fn is_assignable(value: &str) -> bool {
    let value = value.trim();
    !value.is_empty() && value != NONE_VALUE
}

/// `backgroundColor` -> `background-color`, `WebkitTransform` -> `-webkit-transform`.
///
/// Already hyphenated names pass through unchanged.
pub fn selector_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for ch in name.chars() {
        if ch.is_ascii_uppercase() {
            out.push('-');
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}

/// `background-color` -> `backgroundColor`, `-webkit-transform` -> `WebkitTransform`.
pub fn camel_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper_next = false;
    for ch in name.chars() {
        if ch == '-' {
            upper_next = true;
        } else if upper_next {
            out.push(ch.to_ascii_uppercase());
            upper_next = false;
        } else {
            out.push(ch);
        }
    }
    out
}
