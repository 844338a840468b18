//! # StageKit CSS
//!
//! Style records for stage components.
//!
//! ## Design Goals
//!
//! 1. **Flat records**: A style record is a property bag, not a stylesheet
//! 2. **Lossless storage**: One attribute string per interaction context round-trips through [`codec`]
//! 3. **Geometry apart**: Position and size live in a [`GeometryBox`], never mixed into appearance

pub mod codec;
pub mod geometry;
pub mod property;
pub mod values;

pub use codec::{camel_case, decode, encode, is_assignable, selector_case, NONE_VALUE};
pub use geometry::{
    is_geometry_key, strip_geometry, GeometryBox, GEOMETRY_KEYS, POSITION_ABSOLUTE, POSITION_KEY,
};
pub use property::PropertyMap;
pub use values::{Color, Length};
