use std::fmt;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::color::{Color, ColorParseError};

/// An ordered list of theme colors, most dominant first.
///
/// Index 0 is treated as the most "primary" color when the palette is
/// mapped onto a template's color roles.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Palette(Vec<Color>);

impl Palette {
    pub fn new(colors: Vec<Color>) -> Self {
        Self(colors)
    }

    /// Parse a comma-separated list such as `#000000,FFFFFF, #888888`.
    pub fn parse_list(list: &str) -> Result<Self, ColorParseError> {
        list.split(',')
            .filter(|s| !s.trim().is_empty())
            .map(Color::from_hex)
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }

    pub fn colors(&self) -> &[Color] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Uppercase `#RRGGBB` strings in palette order.
    pub fn to_hex_strings(&self) -> Vec<String> {
        self.0.iter().map(|c| c.to_hex()).collect()
    }

    /// Serialize to a JSON array of hex strings.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("failed to serialize palette")
    }
}

impl AsRef<[Color]> for Palette {
    fn as_ref(&self) -> &[Color] {
        &self.0
    }
}

impl From<Vec<Color>> for Palette {
    fn from(colors: Vec<Color>) -> Self {
        Self(colors)
    }
}

impl fmt::Display for Palette {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex_strings().join(","))
    }
}
