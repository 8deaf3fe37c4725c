use std::fmt;
use std::str::FromStr;

use palette::{FromColor, IntoColor, Lab, Srgb};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Error returned when a string is not a `#RRGGBB` / `RRGGBB` color.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorParseError {
    #[error("invalid hex color {0:?}: expected 6 hex digits")]
    Length(String),
    #[error("invalid hex color {0:?}: non-hex character")]
    Digit(String),
}

/// Core color type used throughout the crate.
/// Wraps sRGB u8 components and provides conversions to perceptual color spaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE: Color = Color::new(0xff, 0xff, 0xff);
    pub const BLACK: Color = Color::new(0x00, 0x00, 0x00);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse a hex color string like `#ff8800`, `#FF8800` or `ff8800`.
    ///
    /// Surrounding whitespace is ignored.
    pub fn from_hex(hex: &str) -> Result<Self, ColorParseError> {
        let trimmed = hex.trim();
        let digits = trimmed.strip_prefix('#').unwrap_or(trimmed);
        if digits.len() != 6 {
            return Err(ColorParseError::Length(hex.to_string()));
        }
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ColorParseError::Digit(hex.to_string()));
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16)
                .map_err(|_| ColorParseError::Digit(hex.to_string()))
        };
        Ok(Self {
            r: channel(0..2)?,
            g: channel(2..4)?,
            b: channel(4..6)?,
        })
    }

    /// Serialize to uppercase hex `#RRGGBB`, the form palettes and recolored
    /// templates are written in.
    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    /// Serialize to lowercase hex `#rrggbb`, the normalized form used when
    /// comparing template colors.
    pub fn to_hex_lower(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    pub fn from_rgb(rgb: [u8; 3]) -> Self {
        Self::new(rgb[0], rgb[1], rgb[2])
    }

    pub fn to_rgb(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    /// Convert to CIELAB (for perceptual K-means clustering).
    pub fn to_lab(self) -> Lab {
        let srgb_f32: Srgb<f32> = Srgb::new(self.r, self.g, self.b).into_format();
        srgb_f32.into_color()
    }

    /// Create from CIELAB.
    pub fn from_lab(lab: Lab) -> Self {
        let srgb: Srgb<f32> = Srgb::from_color(lab);
        let r = (srgb.red.clamp(0.0, 1.0) * 255.0).round() as u8;
        let g = (srgb.green.clamp(0.0, 1.0) * 255.0).round() as u8;
        let b = (srgb.blue.clamp(0.0, 1.0) * 255.0).round() as u8;
        Self { r, g, b }
    }

    /// WCAG 2.0 relative luminance.
    ///
    /// Linearizes each sRGB channel, then computes the weighted sum.
    pub fn relative_luminance(self) -> f32 {
        fn linearize(c: u8) -> f32 {
            let c = c as f32 / 255.0;
            if c <= 0.04045 {
                c / 12.92
            } else {
                ((c + 0.055) / 1.055).powf(2.4)
            }
        }
        0.2126 * linearize(self.r) + 0.7152 * linearize(self.g) + 0.0722 * linearize(self.b)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Color {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Color::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_round_trip() {
        let original = Color::from_hex("#ff8800").unwrap();
        assert_eq!(original, Color::new(255, 136, 0));
        assert_eq!(original.to_hex(), "#FF8800");
        assert_eq!(original.to_hex_lower(), "#ff8800");
    }

    #[test]
    fn hex_without_hash() {
        let color = Color::from_hex("aabbcc").unwrap();
        assert_eq!(color.to_hex(), "#AABBCC");
    }

    #[test]
    fn hex_mixed_case_is_equal() {
        assert_eq!(
            Color::from_hex("#1d4ed8").unwrap(),
            Color::from_hex("1D4ED8").unwrap()
        );
    }

    #[test]
    fn hex_invalid_length() {
        assert!(matches!(
            Color::from_hex("#fff"),
            Err(ColorParseError::Length(_))
        ));
    }

    #[test]
    fn hex_invalid_chars() {
        assert!(matches!(
            Color::from_hex("#gggggg"),
            Err(ColorParseError::Digit(_))
        ));
        // A sign would slip through from_str_radix.
        assert!(Color::from_hex("+12345").is_err());
    }

    #[test]
    fn lab_round_trip() {
        for original in [
            Color::new(200, 100, 50),
            Color::new(0, 255, 0),
            Color::new(128, 128, 128),
            Color::BLACK,
            Color::WHITE,
        ] {
            let recovered = Color::from_lab(original.to_lab());
            for (a, b) in original.to_rgb().iter().zip(recovered.to_rgb()) {
                assert!(
                    (*a as i16 - b as i16).unsigned_abs() <= 1,
                    "mismatch for {original}: {recovered}"
                );
            }
        }
    }

    #[test]
    fn relative_luminance_extremes() {
        assert!(Color::BLACK.relative_luminance() < 0.001);
        assert!((Color::WHITE.relative_luminance() - 1.0).abs() < 0.001);
    }

    #[test]
    fn serde_uses_hex_strings() {
        let json = serde_json::to_string(&Color::new(16, 185, 129)).unwrap();
        assert_eq!(json, "\"#10B981\"");
        let back: Color = serde_json::from_str("\"10b981\"").unwrap();
        assert_eq!(back, Color::new(16, 185, 129));
        assert!(serde_json::from_str::<Color>("\"nope\"").is_err());
    }

    #[test]
    fn display_matches_to_hex() {
        let color = Color::new(171, 205, 239);
        assert_eq!(format!("{color}"), color.to_hex());
    }
}
