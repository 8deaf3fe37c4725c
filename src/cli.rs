use std::path::PathBuf;

use clap::{Args as ClapArgs, Parser, Subcommand};

use crate::pipeline::{ClusterMethod, ExtractOptions};

/// Extract color palettes from images and recolor slide templates.
#[derive(Parser, Debug)]
#[command(name = "slide-palette", version, about)]
pub struct Args {
    /// Read settings from this TOML file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Extract a palette from an image
    Palette(PaletteArgs),
    /// Print the color roles of a slide template
    Colors(ColorsArgs),
    /// Recolor a slide template onto a palette
    Recolor(RecolorArgs),
}

/// Extraction overrides shared by commands that read images.
#[derive(ClapArgs, Debug, Default, Clone)]
pub struct ExtractArgs {
    /// Number of palette colors
    #[arg(short = 'k', long = "colors")]
    pub colors: Option<usize>,

    /// Seed for centroid initialization (reproducible palettes)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Clustering algorithm
    #[arg(long, value_enum)]
    pub method: Option<ClusterMethod>,
}

impl ExtractArgs {
    /// Apply the flags that were given on top of `options`.
    pub fn apply(&self, mut options: ExtractOptions) -> ExtractOptions {
        if let Some(colors) = self.colors {
            options.colors = colors;
        }
        if let Some(seed) = self.seed {
            options.seed = Some(seed);
        }
        if let Some(method) = self.method {
            options.method = method;
        }
        options
    }
}

#[derive(ClapArgs, Debug)]
pub struct PaletteArgs {
    /// Path to the input image
    pub image: PathBuf,

    #[command(flatten)]
    pub extract: ExtractArgs,

    /// Print the palette as a JSON array
    #[arg(long)]
    pub json: bool,

    /// Print a colored terminal preview of the palette
    #[arg(long, conflicts_with = "json")]
    pub preview: bool,
}

#[derive(ClapArgs, Debug)]
pub struct ColorsArgs {
    /// Path to the slide template JSON
    pub template: PathBuf,

    /// Print a colored terminal preview of the roles
    #[arg(long)]
    pub preview: bool,
}

#[derive(ClapArgs, Debug)]
pub struct RecolorArgs {
    /// Path to the slide template JSON
    pub template: PathBuf,

    /// Comma-separated target palette, e.g. "#000000,#FFFFFF,#888888"
    #[arg(short, long, required_unless_present = "from_image", conflicts_with = "from_image")]
    pub palette: Option<String>,

    /// Extract the target palette from this image
    #[arg(long, value_name = "IMAGE")]
    pub from_image: Option<PathBuf>,

    #[command(flatten)]
    pub extract: ExtractArgs,

    /// Write the recolored template to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn definition_is_valid() {
        Args::command().debug_assert();
    }

    #[test]
    fn palette_flags() {
        let args = Args::parse_from([
            "slide-palette",
            "palette",
            "logo.png",
            "-k",
            "3",
            "--seed",
            "9",
            "--method",
            "hamerly",
            "--json",
        ]);
        let Command::Palette(p) = args.command else {
            panic!("expected palette command");
        };
        assert_eq!(p.extract.colors, Some(3));
        assert_eq!(p.extract.seed, Some(9));
        assert_eq!(p.extract.method, Some(ClusterMethod::Hamerly));
        assert!(p.json);
    }

    #[test]
    fn flags_override_only_what_was_given() {
        let base = ExtractOptions {
            seed: Some(1),
            ..ExtractOptions::default()
        };
        let args = ExtractArgs {
            colors: Some(8),
            ..ExtractArgs::default()
        };
        let options = args.apply(base);
        assert_eq!(options.colors, 8);
        assert_eq!(options.seed, Some(1));
        assert_eq!(options.method, ClusterMethod::Lloyd);
    }

    #[test]
    fn preview_and_json_are_exclusive() {
        let err = Args::try_parse_from(["slide-palette", "palette", "x.png", "--json", "--preview"])
            .unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
        assert!(Args::try_parse_from(["slide-palette", "palette", "x.png", "--preview"]).is_ok());
    }

    #[test]
    fn recolor_needs_a_palette_source() {
        assert!(Args::try_parse_from(["slide-palette", "recolor", "t.json"]).is_err());
        assert!(Args::try_parse_from([
            "slide-palette",
            "recolor",
            "t.json",
            "--palette",
            "#000000",
            "--from-image",
            "x.png",
        ])
        .is_err());
        assert!(
            Args::try_parse_from(["slide-palette", "recolor", "t.json", "--from-image", "x.png"])
                .is_ok()
        );
    }
}
