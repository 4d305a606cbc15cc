//! Preview command implementation.
//!
//! Writes the sprite as the pipeline sees it: quantized to the reference
//! palette, with masked pixels cleared.

use std::path::PathBuf;

use clap::Args;

use crate::error::Result;
use crate::output::{display_path, Printer};
use crate::render::{sprite_to_image, write_png};

use super::{prepare_sprite, SpriteArgs};

/// Write the quantized sprite as a PNG
#[derive(Args, Debug)]
pub struct PreviewArgs {
    /// Sprite image to preview
    #[arg(required = true)]
    pub sprite: PathBuf,

    /// Output PNG path
    #[arg(long, short, required = true)]
    pub output: PathBuf,

    /// Scale factor for output (integer upscaling)
    #[arg(long, default_value = "1")]
    pub scale: u32,

    #[command(flatten)]
    pub sprite_args: SpriteArgs,
}

pub fn run(args: PreviewArgs, printer: &Printer) -> Result<()> {
    let config = args.sprite_args.load_config()?;
    let prepared = prepare_sprite(&args.sprite, &config, printer)?;

    let img = sprite_to_image(&prepared.sprite, &prepared.palette, prepared.mask.as_ref())?;
    write_png(&img, &args.output, args.scale)?;

    printer.success(
        "Wrote",
        &format!(
            "{} ({}x{}, scale {})",
            display_path(&args.output),
            img.width(),
            img.height(),
            args.scale.max(1)
        ),
    );

    Ok(())
}
