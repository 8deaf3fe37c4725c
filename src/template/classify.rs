use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::color::Color;
use crate::template::{SlideObject, SlideTemplate};

/// The five semantic color roles of a slide, in palette order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Background,
    Title,
    Body,
    Accent,
    Secondary,
}

impl Role {
    pub const ALL: [Role; 5] = [
        Role::Background,
        Role::Title,
        Role::Body,
        Role::Accent,
        Role::Secondary,
    ];

    /// Palette slot this role is mapped onto.
    pub fn index(self) -> usize {
        self as usize
    }
}

/// A template's colors classified into the five roles.
///
/// Every slot is always populated; roles the template never declares keep
/// their defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorSystem {
    pub background: Color,
    pub title: Color,
    pub body: Color,
    pub accent: Color,
    pub secondary: Color,
}

impl Default for ColorSystem {
    fn default() -> Self {
        Self {
            background: Color::new(0xff, 0xff, 0xff),
            title: Color::new(0x00, 0x00, 0x00),
            body: Color::new(0x66, 0x66, 0x66),
            accent: Color::new(0x00, 0x66, 0xcc),
            secondary: Color::new(0xcc, 0xcc, 0xcc),
        }
    }
}

impl ColorSystem {
    /// `[background, title, body, accent, secondary]`
    pub fn to_array(&self) -> [Color; 5] {
        [
            self.background,
            self.title,
            self.body,
            self.accent,
            self.secondary,
        ]
    }

    pub fn get(&self, role: Role) -> Color {
        self.to_array()[role.index()]
    }

    /// Role whose color equals `color`, checking roles in palette order.
    pub fn role_of(&self, color: Color) -> Option<Role> {
        Role::ALL.into_iter().find(|&r| self.get(r) == color)
    }
}

/// Strategy that assigns a template's colors to roles.
pub trait ColorRoleClassifier {
    fn classify(&self, template: &SlideTemplate) -> ColorSystem;
}

/// Classifies text colors by font size and shape fills by encounter order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontSizeClassifier {
    /// Text at or above this size sets `title`.
    pub title_min: f64,
    /// Text at or above this size (but below `title_min`) is a title fallback.
    pub subtitle_min: f64,
}

impl Default for FontSizeClassifier {
    fn default() -> Self {
        Self {
            title_min: 36.0,
            subtitle_min: 20.0,
        }
    }
}

fn parse_declared(value: Option<&str>, field: &str) -> Option<Color> {
    let value = value?;
    match Color::from_hex(value) {
        Ok(color) => Some(color),
        Err(err) => {
            warn!(field, %err, "ignoring unparseable template color");
            None
        }
    }
}

impl ColorRoleClassifier for FontSizeClassifier {
    fn classify(&self, template: &SlideTemplate) -> ColorSystem {
        let mut system = ColorSystem::default();

        if let Some(bg) = parse_declared(template.background.color_str(), "background") {
            system.background = bg;
        }

        let mut found_title = false;
        let mut title_candidates = Vec::new();
        let mut fills: Vec<Color> = Vec::new();

        for object in &template.objects {
            match object {
                SlideObject::Text(text) => {
                    let Some(color) = parse_declared(text.options.color_str(), "text") else {
                        continue;
                    };
                    let size = text.options.font_size_pt().unwrap_or(0.0);
                    if size >= self.title_min {
                        system.title = color;
                        found_title = true;
                    } else if size >= self.subtitle_min {
                        title_candidates.push(color);
                    } else {
                        system.body = color;
                    }
                }
                SlideObject::Shape(shape) => {
                    let fill = shape.options.fill.as_ref().and_then(|f| f.color_str());
                    if let Some(color) = parse_declared(fill, "fill") {
                        if !fills.contains(&color) {
                            fills.push(color);
                        }
                    }
                }
                SlideObject::Other(_) => {}
            }
        }

        if !found_title {
            if let Some(&first) = title_candidates.first() {
                system.title = first;
            }
        }
        if let Some(&accent) = fills.first() {
            system.accent = accent;
        }
        if let Some(&secondary) = fills.get(1) {
            system.secondary = secondary;
        }

        system
    }
}

/// Classify a template's colors with the default [`FontSizeClassifier`].
pub fn extract_color_system(template: &SlideTemplate) -> ColorSystem {
    FontSizeClassifier::default().classify(template)
}
