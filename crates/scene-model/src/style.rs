//! Color and stroke styling primitives.
//!
//! Wire conventions: object colors are opaque `#rrggbb` hex strings with
//! opacity carried separately as a float, while the frame background is a
//! four-element RGBA float array.

use serde::{Deserialize, Serialize};

/// An opaque RGB color, serialized as a `#rrggbb` hex string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color { r: 0, g: 0, b: 0 };
    pub const WHITE: Color = Color {
        r: 255,
        g: 255,
        b: 255,
    };

    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse a `#rrggbb` hex string (case-insensitive).
    pub fn from_hex(hex: &str) -> Result<Self, ColorParseError> {
        let err = || ColorParseError {
            input: hex.to_string(),
        };
        let digits = hex.strip_prefix('#').ok_or_else(err)?;
        if digits.len() != 6 || !digits.is_ascii() {
            return Err(err());
        }
        let r = u8::from_str_radix(&digits[0..2], 16).map_err(|_| err())?;
        let g = u8::from_str_radix(&digits[2..4], 16).map_err(|_| err())?;
        let b = u8::from_str_radix(&digits[4..6], 16).map_err(|_| err())?;
        Ok(Self { r, g, b })
    }

    /// Format as `#rrggbb`.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Combine with an opacity into an RGBA float quad.
    pub fn with_opacity(self, alpha: f64) -> Rgba {
        Rgba {
            r: self.r as f64 / 255.0,
            g: self.g as f64 / 255.0,
            b: self.b as f64 / 255.0,
            a: alpha,
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl std::str::FromStr for Color {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl TryFrom<String> for Color {
    type Error = ColorParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> String {
        color.to_hex()
    }
}

/// Error parsing a hex color string.
#[derive(Debug, Clone, thiserror::Error)]
#[error("Invalid hex color: {input:?} (expected \"#rrggbb\")")]
pub struct ColorParseError {
    pub input: String,
}

/// An RGBA color with components in `[0.0, 1.0]`, serialized as a
/// four-element array.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 4]", into = "[f64; 4]")]
pub struct Rgba {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Rgba {
    pub fn new(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }
}

impl From<[f64; 4]> for Rgba {
    fn from(v: [f64; 4]) -> Self {
        Self {
            r: v[0],
            g: v[1],
            b: v[2],
            a: v[3],
        }
    }
}

impl From<Rgba> for [f64; 4] {
    fn from(c: Rgba) -> [f64; 4] {
        [c.r, c.g, c.b, c.a]
    }
}

/// Stroke endpoint style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LineCap {
    Round,
    #[default]
    Butt,
    Square,
}

/// Stroke corner style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LineJoin {
    Round,
    Bevel,
    #[default]
    Miter,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_round_trip() {
        let color = Color::new(0xfc, 0x62, 0x55);
        assert_eq!(color.to_hex(), "#fc6255");
        assert_eq!(Color::from_hex("#fc6255").unwrap(), color);
    }

    #[test]
    fn test_hex_parse_is_case_insensitive() {
        assert_eq!(
            Color::from_hex("#FC6255").unwrap(),
            Color::from_hex("#fc6255").unwrap()
        );
    }

    #[test]
    fn test_hex_parse_rejects_malformed_input() {
        assert!(Color::from_hex("fc6255").is_err()); // missing #
        assert!(Color::from_hex("#fc625").is_err()); // too short
        assert!(Color::from_hex("#fc62555").is_err()); // too long
        assert!(Color::from_hex("#zz6255").is_err()); // not hex
    }

    #[test]
    fn test_color_serializes_as_hex_string() {
        let json = serde_json::to_string(&Color::WHITE).unwrap();
        assert_eq!(json, "\"#ffffff\"");
        let parsed: Color = serde_json::from_str("\"#000000\"").unwrap();
        assert_eq!(parsed, Color::BLACK);
    }

    #[test]
    fn test_rgba_serializes_as_array() {
        let rgba = Rgba::new(0.0, 0.5, 1.0, 0.25);
        let json = serde_json::to_string(&rgba).unwrap();
        assert_eq!(json, "[0.0,0.5,1.0,0.25]");
        let parsed: Rgba = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, rgba);
    }

    #[test]
    fn test_with_opacity() {
        let rgba = Color::WHITE.with_opacity(0.5);
        assert!((rgba.r - 1.0).abs() < 1e-9);
        assert!((rgba.a - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_stroke_style_wire_strings() {
        assert_eq!(serde_json::to_string(&LineCap::Butt).unwrap(), "\"butt\"");
        assert_eq!(
            serde_json::to_string(&LineJoin::Miter).unwrap(),
            "\"miter\""
        );
        let cap: LineCap = serde_json::from_str("\"round\"").unwrap();
        assert_eq!(cap, LineCap::Round);
    }

    #[test]
    fn test_stroke_style_defaults() {
        assert_eq!(LineCap::default(), LineCap::Butt);
        assert_eq!(LineJoin::default(), LineJoin::Miter);
    }
}
