//! Transparency masks derived from a sprite's alpha channel.

use image::DynamicImage;

use crate::error::{BaseError, Result};

/// One flag per pixel, row-major; `true` means fully transparent.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TransparencyMask {
    flags: Vec<bool>,
}

impl TransparencyMask {
    /// Wrap precomputed flags.
    pub fn from_flags(flags: Vec<bool>) -> Self {
        Self { flags }
    }

    /// A mask with every pixel opaque.
    pub fn opaque(len: usize) -> Self {
        Self {
            flags: vec![false; len],
        }
    }

    /// Check whether the pixel at a row-major offset is transparent.
    pub fn is_transparent(&self, offset: usize) -> bool {
        self.flags.get(offset).copied().unwrap_or(false)
    }

    /// Number of transparent pixels.
    pub fn transparent_count(&self) -> usize {
        self.flags.iter().filter(|&&t| t).count()
    }

    /// Get the number of entries.
    pub fn len(&self) -> usize {
        self.flags.len()
    }

    /// Check if the mask is empty.
    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }

    /// The flags in row-major order.
    pub fn as_slice(&self) -> &[bool] {
        &self.flags
    }
}

/// Build the transparency mask of an image.
///
/// Fails with `InvalidPixelFormat` when the image has no alpha channel;
/// callers that don't want transparency handling skip the mask entirely.
pub fn build_transparency_mask(img: &DynamicImage) -> Result<TransparencyMask> {
    if !img.color().has_alpha() {
        return Err(BaseError::InvalidPixelFormat {
            format: format!("{:?}", img.color()),
        });
    }

    // Float conversion keeps zero at zero and every non-zero alpha above it,
    // whatever the source bit depth.
    let flags = img
        .to_rgba32f()
        .pixels()
        .map(|p| p.0[3] <= 0.0)
        .collect();

    Ok(TransparencyMask { flags })
}
