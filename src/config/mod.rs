//! Layout configuration surface.
//!
//! Three attribute-style knobs drive how packed coordinates become positioning
//! directives. Attribute parsing is lenient: anything unrecognized falls back
//! to the default. The `FromStr` impls are the strict counterpart for callers
//! that want to reject typos.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{LayoutError, Result};

/// How placements are written onto children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Positioning {
    /// Edge offsets (`top`/`right`/`bottom`/`left`).
    Offset,
    /// A 2D translation relative to the child's own null position.
    #[default]
    Transform,
}

/// Horizontal packing direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum XDirection {
    #[default]
    Ltr,
    Rtl,
}

/// Vertical packing direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum YDirection {
    #[default]
    Ttb,
    Btt,
}

macro_rules! attribute_enum {
    ($ty:ident, $attr:literal, { $($text:literal => $variant:ident),+ $(,)? }) => {
        impl $ty {
            pub const ATTRIBUTE: &'static str = $attr;

            /// Lenient parse: trims the value and falls back to the default
            /// for missing or unrecognized input.
            pub fn from_attribute(value: Option<&str>) -> Self {
                value
                    .and_then(|raw| raw.trim().parse::<Self>().ok())
                    .unwrap_or_default()
            }

            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $text,)+
                }
            }
        }

        impl FromStr for $ty {
            type Err = LayoutError;

            fn from_str(value: &str) -> Result<Self> {
                match value {
                    $($text => Ok(Self::$variant),)+
                    other => Err(LayoutError::UnknownValue {
                        attribute: Self::ATTRIBUTE,
                        value: other.to_string(),
                    }),
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

attribute_enum!(Positioning, "positioning", { "offset" => Offset, "transform" => Transform });
attribute_enum!(XDirection, "x-direction", { "ltr" => Ltr, "rtl" => Rtl });
attribute_enum!(YDirection, "y-direction", { "ttb" => Ttb, "btt" => Btt });

/// Immutable configuration snapshot held by a layout instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct LayoutConfig {
    pub positioning: Positioning,
    #[serde(rename = "x-direction")]
    pub x_direction: XDirection,
    #[serde(rename = "y-direction")]
    pub y_direction: YDirection,
}

/// Attribute-keyed raw form, before fallback is applied. Values stay untyped
/// so a non-string falls back like any other unrecognized value.
#[derive(Debug, Deserialize)]
struct RawLayoutConfig {
    positioning: Option<Value>,
    #[serde(rename = "x-direction")]
    x_direction: Option<Value>,
    #[serde(rename = "y-direction")]
    y_direction: Option<Value>,
}

impl LayoutConfig {
    pub const fn new(positioning: Positioning, x_direction: XDirection, y_direction: YDirection) -> Self {
        Self {
            positioning,
            x_direction,
            y_direction,
        }
    }

    pub fn from_attributes(
        positioning: Option<&str>,
        x_direction: Option<&str>,
        y_direction: Option<&str>,
    ) -> Self {
        Self {
            positioning: Positioning::from_attribute(positioning),
            x_direction: XDirection::from_attribute(x_direction),
            y_direction: YDirection::from_attribute(y_direction),
        }
    }

    /// Load from a JSON object keyed by attribute name. Unknown values fall
    /// back per field; only malformed JSON is an error.
    pub fn from_json(source: &str) -> Result<Self> {
        let raw: RawLayoutConfig = serde_json::from_str(source)?;
        Ok(Self::from_attributes(
            raw.positioning.as_ref().and_then(Value::as_str),
            raw.x_direction.as_ref().and_then(Value::as_str),
            raw.y_direction.as_ref().and_then(Value::as_str),
        ))
    }

    pub fn with_positioning(mut self, positioning: Positioning) -> Self {
        self.positioning = positioning;
        self
    }

    pub fn with_x_direction(mut self, x_direction: XDirection) -> Self {
        self.x_direction = x_direction;
        self
    }

    pub fn with_y_direction(mut self, y_direction: YDirection) -> Self {
        self.y_direction = y_direction;
        self
    }
}
