//! Sprite to placement mapping.
//!
//! Each opaque pixel of a sprite becomes one placement record laid out on a
//! flat grid next to the base's anchor. The pieces, leaf first:
//!
//! - `mask` - which pixels are transparent
//! - `table` / `resolver` - which object a pixel becomes
//! - `coords` - where it goes relative to the anchor
//! - `factory` - the record itself
//! - `pipeline` - all of the above, in row-major order

mod coords;
mod factory;
mod mask;
pub mod objects;
mod pipeline;
mod resolver;
mod table;

pub use coords::{CoordinateMapper, DEFAULT_TILE_SPACING};
pub use factory::create_placement;
pub use mask::{build_transparency_mask, TransparencyMask};
pub use objects::{BASE_FLAG_ID, DEFAULT_OBJECT_ID, MAX_BASE_OBJECTS};
pub use pipeline::{sprite_data_to_objects, PlacementOptions};
pub use resolver::ColorResolver;
pub use table::{ColorTable, ColorTableBuilder, ObjectKind};
