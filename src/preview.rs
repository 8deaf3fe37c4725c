use std::io::{self, Write};

use crossterm::queue;
use crossterm::style::{Color as TermColor, Print, PrintStyledContent, Stylize};

use crate::color::Color;
use crate::template::{ColorSystem, Role};

fn to_term(c: Color) -> TermColor {
    TermColor::Rgb {
        r: c.r,
        g: c.g,
        b: c.b,
    }
}

/// Choose black or white foreground for readable text on the given background.
fn contrast_fg(c: Color) -> TermColor {
    if c.relative_luminance() > 0.4 {
        TermColor::Black
    } else {
        TermColor::White
    }
}

fn role_name(role: Role) -> &'static str {
    match role {
        Role::Background => "background",
        Role::Title => "title",
        Role::Body => "body",
        Role::Accent => "accent",
        Role::Secondary => "secondary",
    }
}

fn swatch<W: Write>(out: &mut W, label: &str, color: Color) -> io::Result<()> {
    let text = format!(" {label:<10} {} ", color.to_hex());
    queue!(
        out,
        PrintStyledContent(text.with(contrast_fg(color)).on(to_term(color))),
        Print("\n")
    )
}

/// Print one colored swatch per palette entry.
pub fn render_palette<W: Write>(out: &mut W, colors: &[Color]) -> io::Result<()> {
    for (i, &color) in colors.iter().enumerate() {
        swatch(out, &i.to_string(), color)?;
    }
    out.flush()
}

/// Print one colored swatch per color role.
pub fn render_color_system<W: Write>(out: &mut W, system: &ColorSystem) -> io::Result<()> {
    for role in Role::ALL {
        swatch(out, role_name(role), system.get(role))?;
    }
    out.flush()
}
