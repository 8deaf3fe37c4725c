//! Hardcoded colors of older template schemas.
//!
//! Templates authored before `schemaVersion` existed used a fixed color set
//! that does not always survive classification (for example a second text
//! color that the body slot overwrote). These tables map such colors to the
//! role whose palette slot should replace them.

use crate::color::Color;
use crate::template::classify::Role;

const V1_ROLES: &[(Color, Role)] = &[
    (Color::new(0xff, 0xff, 0xff), Role::Background),
    (Color::new(0xf8, 0xfa, 0xfc), Role::Background),
    (Color::new(0x0f, 0x17, 0x2a), Role::Background),
    (Color::new(0x1f, 0x29, 0x37), Role::Title),
    (Color::new(0x11, 0x18, 0x27), Role::Title),
    (Color::new(0x37, 0x41, 0x51), Role::Body),
    (Color::new(0x4b, 0x55, 0x63), Role::Body),
    (Color::new(0x6b, 0x72, 0x80), Role::Body),
    (Color::new(0x25, 0x63, 0xeb), Role::Accent),
    (Color::new(0x3b, 0x82, 0xf6), Role::Accent),
    (Color::new(0x93, 0xc5, 0xfd), Role::Secondary),
    (Color::new(0xe5, 0xe7, 0xeb), Role::Secondary),
];

/// Legacy color table for a template schema version.
pub fn legacy_roles(schema_version: u32) -> &'static [(Color, Role)] {
    match schema_version {
        0 | 1 => V1_ROLES,
        _ => &[],
    }
}

/// Role a legacy color stands for under `schema_version`, if any.
pub fn legacy_role(schema_version: u32, color: Color) -> Option<Role> {
    legacy_roles(schema_version)
        .iter()
        .find(|(c, _)| *c == color)
        .map(|&(_, role)| role)
}
