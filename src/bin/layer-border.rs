use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, ValueEnum};
use layer_border::session::config::{RecipeSpec, TimelineSpec};
use layer_border::{Border, BorderConfig, BorderOutcome, FrameIndex, RasterHost, RecipePreset};

#[derive(Parser, Debug)]
#[command(name = "layer-border", version)]
struct Cli {
    /// Border config JSON; flags below override it.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output directory for the border frames.
    #[arg(long)]
    out: PathBuf,

    /// Border thickness in pixels.
    #[arg(long)]
    thickness: Option<u32>,

    /// Border shape.
    #[arg(long, value_enum)]
    preset: Option<PresetChoice>,

    /// Writer thread count (animations only).
    #[arg(long)]
    targets: Option<usize>,

    /// Border color as `r,g,b[,a]`.
    #[arg(long, value_parser = parse_color)]
    color: Option<[u8; 4]>,

    /// More logging (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Source frames (PNG or any format `image` reads); more than one makes an animation.
    #[arg(required = true)]
    frames: Vec<PathBuf>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum PresetChoice {
    Diamond,
    Square,
    Rounded,
    Horizontal,
    Vertical,
}

impl From<PresetChoice> for RecipePreset {
    fn from(choice: PresetChoice) -> Self {
        match choice {
            PresetChoice::Diamond => RecipePreset::Diamond,
            PresetChoice::Square => RecipePreset::Square,
            PresetChoice::Rounded => RecipePreset::Rounded,
            PresetChoice::Horizontal => RecipePreset::Horizontal,
            PresetChoice::Vertical => RecipePreset::Vertical,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let level = match cli.verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let mut cfg = match &cli.config {
        Some(path) => BorderConfig::from_path(path)?,
        None => BorderConfig {
            recipe: RecipeSpec::Preset {
                preset: RecipePreset::Square,
                thickness: 4,
            },
            timeline: None,
            targets: 1,
            generators: None,
            color: layer_border::session::border::DEFAULT_COLOR,
            transparency: Default::default(),
        },
    };
    apply_overrides(&mut cfg, &cli);

    let host = RasterHost::from_paths(&cli.frames)?.with_alpha_match(cfg.transparency);
    if cli.frames.len() > 1 && cfg.timeline.is_none() {
        cfg.timeline = Some(TimelineSpec {
            start: 0,
            end: host.frame_count(),
        });
    }

    let border = Border::new(cfg.into_opts()?)?;
    let (result, host) = border.run(host);
    let report = result?;
    let surface = match report.outcome {
        BorderOutcome::Completed { surface } => surface,
        BorderOutcome::Cancelled => anyhow::bail!("border run was cancelled"),
        BorderOutcome::Failed { reasons } => {
            anyhow::bail!("border run failed: {}", reasons.join("; "))
        }
    };
    let surface = host
        .surface(surface)
        .context("border surface missing from host")?;

    std::fs::create_dir_all(&cli.out)
        .with_context(|| format!("create output dir '{}'", cli.out.display()))?;
    for (i, frame) in surface.frames().iter().enumerate() {
        let time = FrameIndex(surface.start().0 + i as u64);
        let path = cli
            .out
            .join(layer_border::pipeline::writer::export_file_name(time));
        frame
            .save_with_format(&path, image::ImageFormat::Png)
            .with_context(|| format!("write png '{}'", path.display()))?;
    }

    eprintln!(
        "wrote {} border frame(s) to {}",
        surface.frames().len(),
        cli.out.display()
    );
    Ok(())
}

fn apply_overrides(cfg: &mut BorderConfig, cli: &Cli) {
    if cli.thickness.is_some() || cli.preset.is_some() {
        let (preset, thickness) = match &cfg.recipe {
            RecipeSpec::Preset { preset, thickness } => (*preset, *thickness),
            RecipeSpec::Steps { .. } => (RecipePreset::Square, cfg.recipe.to_recipe().thickness()),
        };
        cfg.recipe = RecipeSpec::Preset {
            preset: cli.preset.map(RecipePreset::from).unwrap_or(preset),
            thickness: cli.thickness.unwrap_or(thickness),
        };
    }
    if let Some(targets) = cli.targets {
        cfg.targets = targets;
    }
    if let Some(color) = cli.color {
        cfg.color = color;
    }
}

fn parse_color(s: &str) -> Result<[u8; 4], String> {
    let parts = s
        .split(',')
        .map(|p| p.trim().parse::<u8>().map_err(|e| format!("bad channel '{p}': {e}")))
        .collect::<Result<Vec<_>, _>>()?;
    match parts.as_slice() {
        [r, g, b] => Ok([*r, *g, *b, 255]),
        [r, g, b, a] => Ok([*r, *g, *b, *a]),
        _ => Err(format!("expected 3 or 4 channels, got {}", parts.len())),
    }
}
