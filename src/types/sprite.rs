//! Sprite pixel data as seen by the mapping pipeline.

use std::fmt;

use image::RgbaImage;

use crate::error::{BaseError, Result};

use super::Colour;

/// The discrete key a pixel is looked up by in a colour table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PixelKey {
    /// Index into a reference palette (quantized sprites)
    Index(u8),
    /// Exact RGBA colour (unquantized sprites)
    Colour(Colour),
}

impl From<u8> for PixelKey {
    fn from(index: u8) -> Self {
        PixelKey::Index(index)
    }
}

impl From<Colour> for PixelKey {
    fn from(colour: Colour) -> Self {
        PixelKey::Colour(colour)
    }
}

impl fmt::Display for PixelKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PixelKey::Index(i) => write!(f, "index {}", i),
            PixelKey::Colour(c) => write!(f, "{}", c),
        }
    }
}

/// A sprite reduced to pixel keys, stored row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sprite {
    width: u32,
    height: u32,
    pixels: Vec<PixelKey>,
}

impl Sprite {
    /// Create a sprite from row-major pixel keys.
    pub fn new(width: u32, height: u32, pixels: Vec<PixelKey>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(BaseError::IncompatibleImage {
                message: format!("Image has zero dimensions ({}x{})", width, height),
                help: Some("Input image must have non-zero width and height".to_string()),
            });
        }

        let expected = width as usize * height as usize;
        if pixels.len() != expected {
            return Err(BaseError::IncompatibleImage {
                message: format!(
                    "{}x{} sprite needs {} pixels, got {}",
                    width,
                    height,
                    expected,
                    pixels.len()
                ),
                help: None,
            });
        }

        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Create a sprite from palette indices.
    pub fn from_indices(width: u32, height: u32, indices: Vec<u8>) -> Result<Self> {
        Self::new(
            width,
            height,
            indices.into_iter().map(PixelKey::Index).collect(),
        )
    }

    /// Create a sprite keyed by exact RGBA colour.
    pub fn from_rgba(img: &RgbaImage) -> Result<Self> {
        Self::new(
            img.width(),
            img.height(),
            img.pixels().map(|p| PixelKey::Colour(Colour::from(*p))).collect(),
        )
    }

    /// Get the width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Get the height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Total number of pixels.
    pub fn pixel_count(&self) -> usize {
        self.pixels.len()
    }

    /// Row-major pixel keys.
    pub fn pixels(&self) -> &[PixelKey] {
        &self.pixels
    }

    /// Get the key at a (column, row) position.
    pub fn get(&self, column: u32, row: u32) -> Option<PixelKey> {
        if column >= self.width || row >= self.height {
            return None;
        }
        self.pixels
            .get(row as usize * self.width as usize + column as usize)
            .copied()
    }

    /// Convert a linear row-major offset to (column, row).
    pub fn position(&self, offset: usize) -> (u32, u32) {
        let width = self.width as usize;
        ((offset % width) as u32, (offset / width) as u32)
    }
}
