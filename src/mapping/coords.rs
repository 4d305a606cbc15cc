//! Pixel grid to world-space mapping.
//!
//! The sprite is laid flat: columns run along the world's first axis, rows
//! run along the third (depth) axis, and the second (up) axis only receives
//! the constant vertical lift.

use crate::types::Vec3;

/// World distance between neighbouring tiles.
pub const DEFAULT_TILE_SPACING: f64 = 5.0;

/// Maps (column, row) pixel positions to offsets from the anchor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateMapper {
    pub tile_spacing: f64,
    pub vertical_lift: f64,
}

impl Default for CoordinateMapper {
    fn default() -> Self {
        Self {
            tile_spacing: DEFAULT_TILE_SPACING,
            vertical_lift: 0.0,
        }
    }
}

impl CoordinateMapper {
    pub fn new(tile_spacing: f64, vertical_lift: f64) -> Self {
        Self {
            tile_spacing,
            vertical_lift,
        }
    }

    /// Offset of a pixel from the anchor: `(column, lift, row)` scaled.
    pub fn offset(&self, column: u32, row: u32) -> Vec3 {
        [
            column as f64 * self.tile_spacing,
            self.vertical_lift,
            row as f64 * self.tile_spacing,
        ]
    }

    /// Absolute world position of a pixel placed relative to `anchor`.
    pub fn map(&self, column: u32, row: u32, anchor: Vec3) -> Vec3 {
        add(anchor, self.offset(column, row))
    }
}

/// Component-wise vector addition.
pub fn add(a: Vec3, b: Vec3) -> Vec3 {
    [a[0] + b[0], a[1] + b[1], a[2] + b[2]]
}
