use std::io::{self, Write};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use slide_palette::cli::{Args, ColorsArgs, Command, PaletteArgs, RecolorArgs};
use slide_palette::config::Config;
use slide_palette::pipeline::extract::{load_image, palette_from_image};
use slide_palette::pipeline::{CancelToken, ExtractOptions};
use slide_palette::template::{recolor_with, ColorRoleClassifier, SlideTemplate};
use slide_palette::{preview, Palette};

fn init_tracing(verbose: bool) {
    let filter = if verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

fn extract_from_file(path: &std::path::Path, options: &ExtractOptions) -> Result<Palette> {
    let img = load_image(path).with_context(|| format!("cannot load {}", path.display()))?;
    let palette = palette_from_image(&img, options, &CancelToken::new())
        .with_context(|| format!("palette extraction failed for {}", path.display()))?;
    info!(image = %path.display(), %palette, "extracted palette");
    Ok(palette)
}

fn run_palette(args: PaletteArgs, config: &Config) -> Result<()> {
    let options = args.extract.apply(config.extract_options());
    let palette = extract_from_file(&args.image, &options)?;

    let mut stdout = io::stdout().lock();
    if args.preview {
        preview::render_palette(&mut stdout, palette.colors())?;
    } else if args.json {
        writeln!(stdout, "{}", palette.to_json()?)?;
    } else {
        for hex in palette.to_hex_strings() {
            writeln!(stdout, "{hex}")?;
        }
    }
    Ok(())
}

fn run_colors(args: ColorsArgs, config: &Config) -> Result<()> {
    let template = SlideTemplate::load(&args.template)?;
    let system = config.classify.classify(&template);

    let mut stdout = io::stdout().lock();
    if args.preview {
        preview::render_color_system(&mut stdout, &system)?;
    } else {
        let json = serde_json::to_string_pretty(&system).context("failed to serialize colors")?;
        writeln!(stdout, "{json}")?;
    }
    Ok(())
}

fn run_recolor(args: RecolorArgs, config: &Config) -> Result<()> {
    let template = SlideTemplate::load(&args.template)?;

    let palette = match (&args.palette, &args.from_image) {
        (Some(list), _) => Palette::parse_list(list).context("invalid --palette")?,
        (None, Some(image)) => {
            let options = args.extract.apply(config.extract_options());
            extract_from_file(image, &options)?
        }
        (None, None) => anyhow::bail!("either --palette or --from-image is required"),
    };

    let recolored = recolor_with(&template, palette.colors(), &config.classify);
    match &args.output {
        Some(path) => {
            recolored.write_to(path)?;
            info!(path = %path.display(), "wrote recolored template");
        }
        None => writeln!(io::stdout().lock(), "{}", recolored.to_json()?)?,
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let config = Config::load(args.config.as_deref()).context("failed to load configuration")?;

    match args.command {
        Command::Palette(a) => run_palette(a, &config),
        Command::Colors(a) => run_colors(a, &config),
        Command::Recolor(a) => run_recolor(a, &config),
    }
}
