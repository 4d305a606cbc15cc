//! pxbase - Pixel art to base save data
//!
//! Turns a small sprite into placement records laid out on a grid beside a
//! base's anchor object, and appends them to the base's save document.
//!
//! ```no_run
//! use std::path::Path;
//!
//! use pxbase::{
//!     sprite_data_to_objects, ColorResolver, ColorTable, Palette, PlacementOptions, Quantizer,
//!     SaveDocument,
//! };
//!
//! # fn main() -> pxbase::Result<()> {
//! let mut doc = SaveDocument::load(Path::new("base.json"))?;
//! let anchor = doc.anchor(pxbase::mapping::BASE_FLAG_ID)?;
//!
//! let img = image::open("sprite.png").map_err(|e| pxbase::BaseError::Io {
//!     path: "sprite.png".into(),
//!     message: e.to_string(),
//! })?;
//! let sprite = Quantizer::new(Palette::nes()).quantize(&img.to_rgba8())?;
//! let mask = pxbase::build_transparency_mask(&img)?;
//!
//! let table = ColorTable::nes_default();
//! let records = sprite_data_to_objects(
//!     &sprite,
//!     &anchor,
//!     &ColorResolver::new(&table),
//!     &PlacementOptions::default(),
//!     Some(&mask),
//! )?;
//! doc.append(&records)?;
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod mapping;
pub mod output;
pub mod render;
pub mod types;
pub mod validation;

pub use config::{Config, SpriteMode, CONFIG_FILENAME};
pub use error::{BaseError, Result};
pub use mapping::{
    build_transparency_mask, create_placement, sprite_data_to_objects, ColorResolver, ColorTable,
    ColorTableBuilder, CoordinateMapper, ObjectKind, PlacementOptions, TransparencyMask,
};
pub use render::{sprite_to_image, write_png, ColourMetric, DitherMethod, Quantizer};
pub use types::{
    Axis, Colour, Palette, PixelKey, PlacementRecord, SaveDocument, Sprite, Timestamp, Vec3,
};
pub use validation::{
    check_sprite_coverage, check_table_coverage, validate_anchor_document, validate_image,
    Diagnostic, Severity, ValidationResult,
};
