//! Build command implementation.
//!
//! Reads a base save document and a sprite, maps the sprite to placements
//! beside the base flag and writes the extended document.

use std::path::PathBuf;

use clap::Args;

use crate::error::Result;
use crate::mapping::{sprite_data_to_objects, ColorResolver};
use crate::output::{display_path, plural, Printer};
use crate::types::SaveDocument;

use super::{prepare_sprite, SpriteArgs};

/// Append a sprite to a base save document
#[derive(Args, Debug)]
pub struct BuildArgs {
    /// Base save document (JSON exported from a save editor)
    #[arg(required = true)]
    pub base: PathBuf,

    /// Sprite image to place
    #[arg(required = true)]
    pub sprite: PathBuf,

    /// Height above the base flag for the whole layer
    #[arg(long)]
    pub lift: Option<f64>,

    /// Distance between neighbouring tiles
    #[arg(long)]
    pub spacing: Option<f64>,

    /// Output file (default: stdout)
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub sprite_args: SpriteArgs,
}

pub fn run(args: BuildArgs, printer: &Printer) -> Result<()> {
    let mut config = args.sprite_args.load_config()?;
    if let Some(lift) = args.lift {
        config.vertical_lift = lift;
    }
    if let Some(spacing) = args.spacing {
        config.tile_spacing = spacing;
    }

    printer.status("Reading", &display_path(&args.base));
    let mut document = SaveDocument::load(&args.base)?;
    let anchor = document.anchor(&config.anchor_id)?;
    printer.verbose(
        "Anchor",
        &format!(
            "{} at [{}, {}, {}]",
            anchor.type_id, anchor.position[0], anchor.position[1], anchor.position[2]
        ),
    );

    let prepared = prepare_sprite(&args.sprite, &config, printer)?;
    let resolver = ColorResolver::new(&prepared.table);

    let records = sprite_data_to_objects(
        &prepared.sprite,
        &anchor,
        &resolver,
        &config.placement_options(),
        prepared.mask.as_ref(),
    )?;

    printer.status(
        "Mapped",
        &format!(
            "{} ({}x{})",
            plural(records.len(), "object", "objects"),
            prepared.sprite.width(),
            prepared.sprite.height()
        ),
    );

    document.append(&records)?;

    match &args.output {
        Some(path) => {
            document.save(path)?;
            printer.success("Finished", &format!("wrote {}", display_path(path)));
        }
        None => println!("{}", document.to_string_pretty()?),
    }

    Ok(())
}
