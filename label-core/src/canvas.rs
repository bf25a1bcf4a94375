//! Canvas description: size, padding, and the icon's natural metrics.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize, Serializer};

/// Margin applied on every side of every region when padding is enabled.
pub const DEFAULT_MARGIN: u32 = 10;

/// Canvas width: a concrete pixel count or computed from content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(from = "RawWidth")]
pub enum CanvasWidth {
    /// Fixed width in pixels.
    Fixed(u32),
    /// Width derived from the icon and the natural text width.
    Auto,
}

impl CanvasWidth {
    /// Parse a width as written in a preset or on the command line.
    ///
    /// `"auto"` (any case) selects [`CanvasWidth::Auto`]. Anything that is not
    /// a number is coerced to `Fixed(0)`: the resulting canvas is degenerate
    /// but rendering it does not fail.
    #[must_use]
    pub fn parse(input: &str) -> Self {
        let trimmed = input.trim();
        if trimmed.eq_ignore_ascii_case("auto") {
            return Self::Auto;
        }
        if let Ok(value) = trimmed.parse::<i64>() {
            return Self::from_signed(value);
        }
        if let Ok(value) = trimmed.parse::<f64>() {
            return Self::from_float(value);
        }
        tracing::warn!(width = %input, "Unparseable canvas width, coercing to 0");
        Self::Fixed(0)
    }

    fn from_signed(value: i64) -> Self {
        Self::Fixed(u32::try_from(value.max(0)).unwrap_or(u32::MAX))
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn from_float(value: f64) -> Self {
        if value.is_finite() {
            // `as` saturates for out-of-range floats.
            Self::Fixed(value.max(0.0) as u32)
        } else {
            tracing::warn!(width = value, "Non-finite canvas width, coercing to 0");
            Self::Fixed(0)
        }
    }

    /// Whether the width is computed from content.
    #[must_use]
    pub fn is_auto(self) -> bool {
        matches!(self, Self::Auto)
    }
}

impl fmt::Display for CanvasWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed(width) => write!(f, "{width}"),
            Self::Auto => f.write_str("auto"),
        }
    }
}

impl FromStr for CanvasWidth {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl Serialize for CanvasWidth {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Fixed(width) => serializer.serialize_u32(*width),
            Self::Auto => serializer.serialize_str("auto"),
        }
    }
}

/// Wire form of a width as it appears in preset files.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawWidth {
    Integer(i64),
    Float(f64),
    Text(String),
    Other(serde_json::Value),
}

impl From<RawWidth> for CanvasWidth {
    fn from(raw: RawWidth) -> Self {
        match raw {
            RawWidth::Integer(value) => Self::from_signed(value),
            RawWidth::Float(value) => Self::from_float(value),
            RawWidth::Text(text) => Self::parse(&text),
            RawWidth::Other(value) => {
                tracing::warn!(width = %value, "Non-numeric canvas width, coercing to 0");
                Self::Fixed(0)
            }
        }
    }
}

/// Target canvas size. Height is always concrete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanvasSpec {
    /// Width, possibly `auto`.
    pub width: CanvasWidth,
    /// Height in pixels.
    pub height: u32,
}

impl CanvasSpec {
    /// Canvas with a fixed width.
    #[must_use]
    pub fn fixed(width: u32, height: u32) -> Self {
        Self {
            width: CanvasWidth::Fixed(width),
            height,
        }
    }

    /// Canvas whose width is computed from content.
    #[must_use]
    pub fn auto(height: u32) -> Self {
        Self {
            width: CanvasWidth::Auto,
            height,
        }
    }
}

/// Whether a uniform margin is inset on all sides of every region.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Padding {
    /// Inset by [`DEFAULT_MARGIN`].
    #[default]
    Enabled,
    /// No inset.
    Disabled,
}

impl Padding {
    /// Margin in pixels.
    #[must_use]
    pub fn margin(self) -> u32 {
        match self {
            Self::Enabled => DEFAULT_MARGIN,
            Self::Disabled => 0,
        }
    }
}

impl From<bool> for Padding {
    fn from(enabled: bool) -> Self {
        if enabled {
            Self::Enabled
        } else {
            Self::Disabled
        }
    }
}

/// Natural size of a decoded icon.
///
/// The pixels stay with the decoder; layout only needs the dimensions and a
/// name to blame when they are unusable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IconMetrics {
    /// Display name, usually the file name.
    pub name: String,
    /// Natural width in pixels.
    pub width: u32,
    /// Natural height in pixels.
    pub height: u32,
}

impl IconMetrics {
    /// Create icon metrics.
    #[must_use]
    pub fn new(name: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            name: name.into(),
            width,
            height,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_auto_any_case() {
        assert_eq!(CanvasWidth::parse("auto"), CanvasWidth::Auto);
        assert_eq!(CanvasWidth::parse(" AUTO "), CanvasWidth::Auto);
    }

    #[test]
    fn test_parse_numbers() {
        assert_eq!(CanvasWidth::parse("400"), CanvasWidth::Fixed(400));
        assert_eq!(CanvasWidth::parse("-5"), CanvasWidth::Fixed(0));
        assert_eq!(CanvasWidth::parse("250.9"), CanvasWidth::Fixed(250));
    }

    #[test]
    fn test_parse_garbage_coerces_to_zero() {
        assert_eq!(CanvasWidth::parse("wide"), CanvasWidth::Fixed(0));
        assert_eq!(CanvasWidth::parse(""), CanvasWidth::Fixed(0));
    }

    #[test]
    fn test_width_deserialize_variants() {
        let widths: Vec<CanvasWidth> =
            serde_json::from_str(r#"[300, "auto", "120", -4, 99.5, null, [1]]"#).expect("parse");
        assert_eq!(
            widths,
            vec![
                CanvasWidth::Fixed(300),
                CanvasWidth::Auto,
                CanvasWidth::Fixed(120),
                CanvasWidth::Fixed(0),
                CanvasWidth::Fixed(99),
                CanvasWidth::Fixed(0),
                CanvasWidth::Fixed(0),
            ]
        );
    }

    #[test]
    fn test_width_serialize() {
        let json = serde_json::to_string(&[CanvasWidth::Fixed(42), CanvasWidth::Auto]).expect("ser");
        assert_eq!(json, r#"[42,"auto"]"#);
    }

    #[test]
    fn test_padding_margin() {
        assert_eq!(Padding::Enabled.margin(), 10);
        assert_eq!(Padding::Disabled.margin(), 0);
        assert_eq!(Padding::from(false), Padding::Disabled);
    }
}
