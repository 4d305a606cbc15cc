pub mod build;
pub mod check;
pub mod completions;
pub mod preview;

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use image::DynamicImage;

use crate::config::{Config, SpriteMode};
use crate::error::{BaseError, Result};
use crate::mapping::{build_transparency_mask, ColorTable, TransparencyMask};
use crate::output::{display_path, Printer};
use crate::render::{ColourMetric, DitherMethod, Quantizer};
use crate::types::{Palette, Sprite};
use crate::validation::validate_image;

/// pxbase - Build pixel art into base save data
#[derive(Parser, Debug)]
#[command(name = "pxbase")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Show per-step detail
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Append a sprite to a base save document
    Build(build::BuildArgs),

    /// Check a sprite against the palette and colour table
    Check(check::CheckArgs),

    /// Write the quantized sprite as a PNG
    Preview(preview::PreviewArgs),

    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}

/// Sprite options shared by build, check and preview.
///
/// Every option overrides the matching `pxbase.yaml` field.
#[derive(Args, Debug, Clone, Default)]
pub struct SpriteArgs {
    /// Project config file (default: ./pxbase.yaml if present)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Reference palette: `nes` or a PNG path
    #[arg(long)]
    pub palette: Option<String>,

    /// Colour table: `nes`, `sprites` or a YAML path
    #[arg(long)]
    pub table: Option<String>,

    /// Key pixels by palette index or by exact colour
    #[arg(long, value_enum)]
    pub mode: Option<SpriteMode>,

    /// Dithering used when quantizing
    #[arg(long, value_enum)]
    pub dither: Option<DitherMethod>,

    /// Colour distance used when quantizing
    #[arg(long, value_enum)]
    pub metric: Option<ColourMetric>,

    /// Place transparent pixels too
    #[arg(long)]
    pub no_transparency: bool,
}

impl SpriteArgs {
    /// Load the project config and apply these options on top.
    pub fn load_config(&self) -> Result<Config> {
        let mut config = Config::discover(self.config.as_deref())?;

        if let Some(palette) = &self.palette {
            config.palette = palette.clone();
        }
        if let Some(table) = &self.table {
            config.table = Some(table.clone());
        }
        if let Some(mode) = self.mode {
            config.mode = mode;
        }
        if let Some(dither) = self.dither {
            config.dither = dither;
        }
        if let Some(metric) = self.metric {
            config.metric = metric;
        }
        if self.no_transparency {
            config.transparency = false;
        }

        Ok(config)
    }
}

/// A sprite image after validation, reduction and masking.
pub struct PreparedSprite {
    pub sprite: Sprite,
    pub mask: Option<TransparencyMask>,
    pub palette: Palette,
    pub table: ColorTable,
}

/// Open an image file.
pub fn open_image(path: &Path) -> Result<DynamicImage> {
    image::open(path).map_err(|e| BaseError::Io {
        path: path.to_path_buf(),
        message: format!("Failed to open image: {}", e),
    })
}

/// Validate, quantize and mask a sprite image as the config describes.
pub fn prepare_sprite(path: &Path, config: &Config, printer: &Printer) -> Result<PreparedSprite> {
    let palette = Palette::resolve(&config.palette)?;
    let table = ColorTable::resolve(config.table_spec())?;
    printer.verbose(
        "Using",
        &format!("palette '{}', table '{}' ({} mode)", palette.name, table.name, mode_name(config.mode)),
    );

    printer.status("Loading", &display_path(path));
    let img = open_image(path)?;

    let quantizer = match config.mode {
        SpriteMode::Indexed => Some(
            Quantizer::new(palette.clone())
                .with_dither(config.dither)
                .with_metric(config.metric),
        ),
        SpriteMode::Rgba => None,
    };

    if quantizer.is_some() {
        printer.verbose(
            "Quantizing",
            &format!("{} dither, {} metric", config.dither, config.metric),
        );
    }

    // The gate hands back the quantized sprite in indexed mode.
    let sprite = match validate_image(&img, config.max_objects, quantizer.as_ref())? {
        Some(sprite) => sprite,
        None => Sprite::from_rgba(&img.to_rgba8())?,
    };

    let mask = if config.transparency {
        let mask = build_transparency_mask(&img)?;
        printer.verbose(
            "Masked",
            &format!("{} transparent of {} pixels", mask.transparent_count(), mask.len()),
        );
        Some(mask)
    } else {
        None
    };

    Ok(PreparedSprite {
        sprite,
        mask,
        palette,
        table,
    })
}

fn mode_name(mode: SpriteMode) -> &'static str {
    match mode {
        SpriteMode::Indexed => "indexed",
        SpriteMode::Rgba => "rgba",
    }
}
