use serde_json::Value;
use tracing::debug;

use crate::color::Color;
use crate::template::classify::{ColorRoleClassifier, ColorSystem, FontSizeClassifier, Role};
use crate::template::legacy::legacy_role;
use crate::template::{SlideObject, SlideTemplate};

/// Maps one declared color string to its replacement.
struct Substitution<'a> {
    original: ColorSystem,
    palette: &'a [Color],
    schema_version: u32,
}

impl Substitution<'_> {
    fn slot_for(&self, color: Color) -> Option<usize> {
        self.original
            .role_of(color)
            .or_else(|| legacy_role(self.schema_version, color))
            .map(Role::index)
    }

    /// Replacement for `value`, or `None` to leave it untouched.
    fn replace(&self, value: &str) -> Option<String> {
        let color = Color::from_hex(value).ok()?;
        let slot = self.slot_for(color)?;
        let target = *self.palette.get(slot)?;
        if target == color {
            return None;
        }
        debug!(from = %color.to_hex_lower(), to = %target, slot, "recolor");
        Some(target.to_hex())
    }

    /// Only string values are candidates; other JSON is left as it is.
    fn apply(&self, field: &mut Option<Value>) {
        let new = field.as_ref().and_then(Value::as_str).and_then(|v| self.replace(v));
        if let Some(new) = new {
            *field = Some(Value::String(new));
        }
    }
}

/// Recolor a copy of `template` onto `palette` using the default classifier.
///
/// Each color matching one of the template's five role colors is replaced by
/// the palette entry at that role's index
/// (`[background, title, body, accent, secondary]`). Colors that match no
/// role are checked against the legacy table for the template's schema
/// version, and otherwise left as they are. The input is never modified.
pub fn recolor(template: &SlideTemplate, palette: &[Color]) -> SlideTemplate {
    recolor_with(template, palette, &FontSizeClassifier::default())
}

/// [`recolor`] with a caller-chosen role classifier.
pub fn recolor_with(
    template: &SlideTemplate,
    palette: &[Color],
    classifier: &dyn ColorRoleClassifier,
) -> SlideTemplate {
    let subst = Substitution {
        original: classifier.classify(template),
        palette,
        schema_version: template.schema_version(),
    };

    let mut out = template.clone();
    subst.apply(&mut out.background.color);

    for object in &mut out.objects {
        match object {
            SlideObject::Text(text) => subst.apply(&mut text.options.color),
            SlideObject::Shape(shape) => {
                if let Some(fill) = shape.options.fill.as_mut() {
                    subst.apply(&mut fill.color);
                }
                if let Some(line) = shape.options.line.as_mut() {
                    subst.apply(&mut line.color);
                }
            }
            SlideObject::Other(_) => {}
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::classify::extract_color_system;

    fn hex(s: &str) -> Color {
        Color::from_hex(s).unwrap()
    }

    fn template(json: &str) -> SlideTemplate {
        SlideTemplate::from_json(json).unwrap()
    }

    fn text_color(t: &SlideTemplate, i: usize) -> Option<&str> {
        match &t.objects[i] {
            SlideObject::Text(text) => text.options.color_str(),
            _ => None,
        }
    }

    fn fill_and_line(t: &SlideTemplate, i: usize) -> (Option<&str>, Option<&str>) {
        match &t.objects[i] {
            SlideObject::Shape(s) => (
                s.options.fill.as_ref().and_then(|f| f.color_str()),
                s.options.line.as_ref().and_then(|l| l.color_str()),
            ),
            _ => (None, None),
        }
    }

    const SLIDE: &str = r##"{
        "schemaVersion": 2,
        "background": { "color": "111827" },
        "objects": [
            { "text": { "text": "Title", "options": { "fontSize": 40, "color": "#1D4ED8" } } },
            { "text": { "text": "Body", "options": { "fontSize": 14, "color": "#6B7280" } } },
            { "shape": { "type": "rect", "options": { "fill": { "color": "#10B981" }, "line": { "color": "#10b981" } } } },
            { "shape": { "type": "line", "options": { "line": { "color": "#ABCDEF" } } } }
        ]
    }"##;

    #[test]
    fn maps_roles_positionally() {
        let t = template(SLIDE);
        let palette = [
            hex("#000000"),
            hex("#FFFFFF"),
            hex("#888888"),
            hex("#FF0000"),
            hex("#00FF00"),
        ];
        let out = recolor(&t, &palette);
        assert_eq!(out.background.color_str(), Some("#000000"));
        assert_eq!(text_color(&out, 0), Some("#FFFFFF"));
        assert_eq!(text_color(&out, 1), Some("#888888"));
        assert_eq!(fill_and_line(&out, 2), (Some("#FF0000"), Some("#FF0000")));
        // Not a role color and the schema has no legacy table.
        assert_eq!(fill_and_line(&out, 3), (None, Some("#ABCDEF")));
    }

    #[test]
    fn short_palette_leaves_later_roles_alone() {
        let t = template(SLIDE);
        let out = recolor(&t, &[hex("#000000"), hex("#FFFFFF")]);
        assert_eq!(out.background.color_str(), Some("#000000"));
        assert_eq!(text_color(&out, 0), Some("#FFFFFF"));
        assert_eq!(text_color(&out, 1), Some("#6B7280"));
        assert_eq!(fill_and_line(&out, 2).0, Some("#10B981"));
    }

    #[test]
    fn input_is_not_mutated() {
        let t = template(SLIDE);
        let before = t.clone();
        let _ = recolor(&t, &[hex("#010101"); 5]);
        assert_eq!(t, before);
    }

    #[test]
    fn identity_palette_is_a_no_op() {
        let t = template(SLIDE);
        let identity = extract_color_system(&t).to_array();
        assert_eq!(recolor(&t, &identity), t);
    }

    #[test]
    fn legacy_colors_follow_their_role() {
        // No schemaVersion: legacy table applies. #374151 is a legacy body
        // color that lost the body slot to the later #6B7280 text.
        let t = template(
            r##"{
            "objects": [
                { "text": { "options": { "fontSize": 12, "color": "#374151" } } },
                { "text": { "options": { "fontSize": 12, "color": "#6B7280" } } }
            ]
        }"##,
        );
        let palette = [
            hex("#000000"),
            hex("#111111"),
            hex("#222222"),
            hex("#333333"),
            hex("#444444"),
        ];
        let out = recolor(&t, &palette);
        assert_eq!(text_color(&out, 0), Some("#222222"));
        assert_eq!(text_color(&out, 1), Some("#222222"));
    }

    #[test]
    fn unparseable_colors_are_left_verbatim() {
        let t = template(
            r##"{ "background": { "color": "linear-gradient(red, blue)" } }"##,
        );
        let out = recolor(&t, &[hex("#000000")]);
        assert_eq!(
            out.background.color_str(),
            Some("linear-gradient(red, blue)")
        );
    }

    #[test]
    fn unknown_kinds_pass_through() {
        let t = template(
            r##"{
            "schemaVersion": 2,
            "background": { "color": "#111827" },
            "objects": [
                { "line": { "x": 1, "options": { "line": { "color": "#111827" } } } },
                { "table": { "rows": [["#111827"]] } },
                { "text": { "options": { "fontSize": 40, "color": "#1D4ED8" } } }
            ]
        }"##,
        );
        let out = recolor(&t, &[hex("#000000"), hex("#FFFFFF")]);
        assert_eq!(out.background.color_str(), Some("#000000"));
        assert_eq!(text_color(&out, 2), Some("#FFFFFF"));
        assert_eq!(out.objects[0], t.objects[0]);
        assert_eq!(out.objects[1], t.objects[1]);

        let json: Value = serde_json::from_str(&out.to_json().unwrap()).unwrap();
        assert_eq!(json["objects"][0]["line"]["options"]["line"]["color"], "#111827");
        assert_eq!(json["objects"][1]["table"]["rows"][0][0], "#111827");
    }

    #[test]
    fn non_string_colors_are_left_verbatim() {
        let t = template(
            r##"{
            "schemaVersion": 2,
            "objects": [
                { "text": { "options": { "fontSize": "40", "color": "#1D4ED8" } } },
                { "text": { "options": { "fontSize": 12, "color": 6710886 } } },
                { "shape": { "options": { "fill": { "color": { "theme": "accent1" } } } } }
            ]
        }"##,
        );
        let palette = [hex("#000000"); 5];
        let out = recolor(&t, &palette);
        // A string font size still makes this the title.
        assert_eq!(text_color(&out, 0), Some("#000000"));
        assert_eq!(out.objects[1], t.objects[1]);
        assert_eq!(out.objects[2], t.objects[2]);
    }

    struct Fixed(ColorSystem);

    impl ColorRoleClassifier for Fixed {
        fn classify(&self, _: &SlideTemplate) -> ColorSystem {
            self.0
        }
    }

    #[test]
    fn classifier_is_pluggable() {
        let t = template(SLIDE);
        let fixed = Fixed(ColorSystem {
            accent: hex("#ABCDEF"),
            ..ColorSystem::default()
        });
        let palette = [hex("#000000"); 5];
        let out = recolor_with(&t, &palette, &fixed);
        assert_eq!(fill_and_line(&out, 3).1, Some("#000000"));
        // #1D4ED8 is no role color under this classifier.
        assert_eq!(text_color(&out, 0), Some("#1D4ED8"));
    }
}
