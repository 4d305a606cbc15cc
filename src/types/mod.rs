//! Core domain types for pxbase.
//!
//! - `Colour` - RGBA colour values
//! - `Palette` - Ordered reference palettes
//! - `Sprite` / `PixelKey` - Sprite pixels as table keys
//! - `PlacementRecord` - Objects in a base save document
//! - `SaveDocument` - The base save document itself

mod colour;
mod document;
mod palette;
mod placement;
mod sprite;

pub use colour::Colour;
pub use document::{SaveDocument, OBJECTS_KEY};
pub use palette::{Palette, NES_PALETTE};
pub use placement::{Axis, PlacementRecord, Timestamp, Vec3};
pub use sprite::{PixelKey, Sprite};
