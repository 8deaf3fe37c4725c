//! Slide template model plus color-role classification and recoloring.
//!
//! Templates are JSON documents: a background descriptor and an ordered list
//! of positioned objects. Only the color-bearing fields are typed; everything
//! else is carried through `extra` maps so a recolored template serializes
//! back with all its other data intact.

pub mod classify;
pub mod legacy;
pub mod recolor;

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

pub use classify::{extract_color_system, ColorRoleClassifier, ColorSystem, FontSizeClassifier, Role};
pub use recolor::{recolor, recolor_with};

/// Schema version assumed when a template does not declare one.
pub const LEGACY_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlideTemplate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema_version: Option<u32>,
    #[serde(default)]
    pub background: Background,
    #[serde(default)]
    pub objects: Vec<SlideObject>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Background {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Only string values are read as colors; anything else is carried through.
fn color_str(value: &Option<Value>) -> Option<&str> {
    value.as_ref().and_then(Value::as_str)
}

impl Background {
    pub fn color_str(&self) -> Option<&str> {
        color_str(&self.color)
    }
}

/// A positioned object on the slide, keyed by its kind
/// (`{ "text": {...} }`, `{ "shape": {...} }`, ...).
#[derive(Debug, Clone, PartialEq)]
pub enum SlideObject {
    Text(TextObject),
    Shape(ShapeObject),
    /// Any other kind (image, chart, table, ...), or a text/shape whose body
    /// does not fit the typed model. Kept verbatim, never recolored.
    Other(Map<String, Value>),
}

impl<'de> Deserialize<'de> for SlideObject {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let map = Map::<String, Value>::deserialize(deserializer)?;
        let typed = match map.iter().next() {
            Some((kind, body)) if map.len() == 1 => match kind.as_str() {
                "text" => serde_json::from_value(body.clone()).ok().map(SlideObject::Text),
                "shape" => serde_json::from_value(body.clone()).ok().map(SlideObject::Shape),
                _ => None,
            },
            _ => None,
        };
        Ok(typed.unwrap_or(SlideObject::Other(map)))
    }
}

impl Serialize for SlideObject {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;

        match self {
            SlideObject::Text(text) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("text", text)?;
                map.end()
            }
            SlideObject::Shape(shape) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("shape", shape)?;
                map.end()
            }
            SlideObject::Other(map) => map.serialize(serializer),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TextObject {
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub text: Value,
    #[serde(default)]
    pub options: TextOptions,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextOptions {
    /// Kept as raw JSON so integral sizes serialize back unchanged and
    /// values of the wrong type do not reject the template.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TextOptions {
    /// Font size in points. Numeric strings such as `"40"` are accepted.
    pub fn font_size_pt(&self) -> Option<f64> {
        match self.font_size.as_ref()? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn color_str(&self) -> Option<&str> {
        color_str(&self.color)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ShapeObject {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default)]
    pub options: ShapeOptions,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ShapeOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<ColorSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<ColorSpec>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// `{ "color": "...", ... }` as used by shape fills and outlines.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ColorSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ColorSpec {
    pub fn color_str(&self) -> Option<&str> {
        color_str(&self.color)
    }
}

impl SlideTemplate {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("invalid slide template JSON")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read template {}", path.display()))?;
        Self::from_json(&json).with_context(|| format!("in template {}", path.display()))
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("failed to serialize slide template")
    }

    /// Write the template JSON to an arbitrary path.
    pub fn write_to(&self, path: &Path) -> Result<()> {
        let content = self.to_json()?;
        std::fs::write(path, content)
            .with_context(|| format!("failed to write template to {}", path.display()))
    }

    pub fn schema_version(&self) -> u32 {
        self.schema_version.unwrap_or(LEGACY_SCHEMA_VERSION)
    }
}
