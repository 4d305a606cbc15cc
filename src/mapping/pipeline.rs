//! Sprite to placement pipeline.

use tracing::{debug, info};

use crate::error::{BaseError, Result};
use crate::types::{PlacementRecord, Sprite};

use super::coords::{CoordinateMapper, DEFAULT_TILE_SPACING};
use super::factory::create_placement;
use super::mask::TransparencyMask;
use super::objects::MAX_BASE_OBJECTS;
use super::resolver::ColorResolver;

/// Layout and limits for a pipeline run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacementOptions {
    /// Height added to the anchor for every placement
    pub vertical_lift: f64,
    /// World distance between neighbouring pixels
    pub tile_spacing: f64,
    /// Most placements a run may produce
    pub max_objects: usize,
}

impl Default for PlacementOptions {
    fn default() -> Self {
        Self {
            vertical_lift: 0.0,
            tile_spacing: DEFAULT_TILE_SPACING,
            max_objects: MAX_BASE_OBJECTS,
        }
    }
}

impl PlacementOptions {
    fn mapper(&self) -> CoordinateMapper {
        CoordinateMapper::new(self.tile_spacing, self.vertical_lift)
    }
}

/// Turn every placeable pixel of a sprite into a placement record.
///
/// Pixels are visited in row-major order and records come out in that order.
/// A pixel is skipped when the mask marks it transparent or the table maps
/// it to background. Any failure returns an error and no records.
///
/// Run validation before calling this.
pub fn sprite_data_to_objects(
    sprite: &Sprite,
    anchor: &PlacementRecord,
    resolver: &ColorResolver<'_>,
    options: &PlacementOptions,
    mask: Option<&TransparencyMask>,
) -> Result<Vec<PlacementRecord>> {
    if let Some(mask) = mask {
        if mask.len() != sprite.pixel_count() {
            return Err(BaseError::IncompatibleImage {
                message: format!(
                    "Transparency mask has {} entries for {} pixels",
                    mask.len(),
                    sprite.pixel_count()
                ),
                help: Some("Build the mask from the same image as the sprite".to_string()),
            });
        }
    }

    let mapper = options.mapper();
    let mut result = Vec::new();
    let mut skipped = 0usize;

    for (offset, &key) in sprite.pixels().iter().enumerate() {
        let (column, row) = sprite.position(offset);

        if mask.is_some_and(|m| m.is_transparent(offset)) {
            skipped += 1;
            continue;
        }

        let Some(kind) = resolver.resolve_at(key, column, row)? else {
            skipped += 1;
            continue;
        };

        let tile_offset = mapper.offset(column, row);
        debug!(offset, column, row, ?tile_offset, object = %kind.object, "placing tile");

        result.push(create_placement(anchor, tile_offset, &kind.object, kind.modifier));
    }

    if result.len() > options.max_objects {
        return Err(BaseError::ImageTooLarge {
            width: sprite.width(),
            height: sprite.height(),
            max: options.max_objects,
        });
    }

    info!(
        placed = result.len(),
        skipped,
        width = sprite.width(),
        height = sprite.height(),
        "sprite mapped"
    );

    Ok(result)
}
