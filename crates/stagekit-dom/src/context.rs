//! Interaction contexts.

use std::fmt;
use std::str::FromStr;

use crate::error::ContextParseError;

/// A named interaction state with its own style record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Context {
    /// Resting state. The only context whose record carries geometry.
    #[default]
    Normal,
    Hover,
    Pressed,
}

impl Context {
    pub const ALL: [Context; 3] = [Context::Normal, Context::Hover, Context::Pressed];

    pub fn as_str(self) -> &'static str {
        match self {
            Context::Normal => "normal",
            Context::Hover => "hover",
            Context::Pressed => "pressed",
        }
    }

    /// Attribute holding this context's encoded style record.
    pub fn attribute_name(self) -> &'static str {
        match self {
            Context::Normal => "style-normal",
            Context::Hover => "style-hover",
            Context::Pressed => "style-pressed",
        }
    }
}

impl fmt::Display for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Context {
    type Err = ContextParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Context::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ContextParseError(s.to_string()))
    }
}
