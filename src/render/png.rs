//! PNG previews of quantized sprites.
//!
//! Converts a sprite back to colours and writes it with optional integer
//! scaling, for checking what the quantizer did before building a base.

use std::path::Path;

use image::{ImageBuffer, Rgba, RgbaImage};

use crate::error::{BaseError, Result};
use crate::mapping::TransparencyMask;
use crate::types::{Colour, Palette, PixelKey, Sprite};

/// Convert a sprite to an RGBA image.
///
/// Index keys are looked up in `palette`; masked pixels come out transparent.
pub fn sprite_to_image(
    sprite: &Sprite,
    palette: &Palette,
    mask: Option<&TransparencyMask>,
) -> Result<RgbaImage> {
    let mut img: RgbaImage = ImageBuffer::new(sprite.width(), sprite.height());

    for (offset, key) in sprite.pixels().iter().enumerate() {
        let (x, y) = sprite.position(offset);

        let colour = if mask.is_some_and(|m| m.is_transparent(offset)) {
            Colour::TRANSPARENT
        } else {
            match *key {
                PixelKey::Index(i) => palette.get(i).ok_or_else(|| BaseError::IncompatibleImage {
                    message: format!(
                        "Palette index {} is outside palette '{}' ({} colours)",
                        i,
                        palette.name,
                        palette.len()
                    ),
                    help: None,
                })?,
                PixelKey::Colour(c) => c,
            }
        };

        img.put_pixel(x, y, Rgba::from(colour));
    }

    Ok(img)
}

/// Write an image to a PNG file.
///
/// # Arguments
///
/// * `img` - The image to write
/// * `path` - Output file path
/// * `scale` - Integer scale factor (1 = no scaling)
pub fn write_png(img: &RgbaImage, path: &Path, scale: u32) -> Result<()> {
    let scale = scale.max(1); // Minimum scale of 1

    let (width, height) = scaled_size(img.width(), img.height(), scale).ok_or_else(|| {
        BaseError::IncompatibleImage {
            message: format!(
                "{}x{} image scaled by {} is too large to write",
                img.width(),
                img.height(),
                scale
            ),
            help: Some("Use a smaller --scale".to_string()),
        }
    })?;
    let mut out: RgbaImage = ImageBuffer::new(width, height);

    for (x, y, pixel) in img.enumerate_pixels() {
        for sy in 0..scale {
            for sx in 0..scale {
                out.put_pixel(x * scale + sx, y * scale + sy, *pixel);
            }
        }
    }

    out.save(path).map_err(|e| BaseError::Io {
        path: path.to_path_buf(),
        message: format!("Failed to write PNG: {}", e),
    })?;

    Ok(())
}

/// Output dimensions, or `None` when the buffer size would not fit.
fn scaled_size(width: u32, height: u32, scale: u32) -> Option<(u32, u32)> {
    let width = width.checked_mul(scale)?;
    let height = height.checked_mul(scale)?;
    (width as usize)
        .checked_mul(height as usize)?
        .checked_mul(4)
        .map(|_| (width, height))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_sprite_to_image_indexed() {
        let sprite = Sprite::from_indices(2, 1, vec![0, 33]).unwrap();
        let img = sprite_to_image(&sprite, &Palette::nes(), None).unwrap();
        assert_eq!(img.get_pixel(0, 0).0, [124, 124, 124, 255]);
        assert_eq!(img.get_pixel(1, 0).0, [252, 252, 252, 255]);
    }

    #[test]
    fn test_sprite_to_image_masked() {
        let sprite = Sprite::from_indices(2, 1, vec![0, 0]).unwrap();
        let mask = TransparencyMask::from_flags(vec![false, true]);
        let img = sprite_to_image(&sprite, &Palette::nes(), Some(&mask)).unwrap();
        assert_eq!(img.get_pixel(1, 0).0, [0, 0, 0, 0]);
    }

    #[test]
    fn test_sprite_to_image_index_out_of_range() {
        let sprite = Sprite::from_indices(1, 1, vec![200]).unwrap();
        assert!(sprite_to_image(&sprite, &Palette::nes(), None).is_err());
    }

    #[test]
    fn test_write_png_scaled() {
        let mut img = RgbaImage::new(2, 1);
        img.put_pixel(0, 0, Rgba([255, 0, 0, 255]));
        img.put_pixel(1, 0, Rgba([0, 255, 0, 255]));

        let dir = tempdir().unwrap();
        let path = dir.path().join("scaled.png");

        write_png(&img, &path, 2).unwrap();

        let read = image::open(&path).unwrap().to_rgba8();
        assert_eq!(read.width(), 4);
        assert_eq!(read.height(), 2);
        assert_eq!(read.get_pixel(1, 1).0, [255, 0, 0, 255]);
        assert_eq!(read.get_pixel(2, 0).0, [0, 255, 0, 255]);
    }

    #[test]
    fn test_write_png_scale_zero_treated_as_one() {
        let img = RgbaImage::from_pixel(1, 1, Rgba([0, 0, 0, 255]));

        let dir = tempdir().unwrap();
        let path = dir.path().join("zero.png");

        write_png(&img, &path, 0).unwrap();

        let read = image::open(&path).unwrap().to_rgba8();
        assert_eq!(read.width(), 1);
    }

    #[test]
    fn test_write_png_rejects_overflowing_scale() {
        let img = RgbaImage::from_pixel(2, 1, Rgba([0, 0, 0, 255]));

        let dir = tempdir().unwrap();
        let path = dir.path().join("huge.png");

        let err = write_png(&img, &path, u32::MAX).unwrap_err();
        assert!(matches!(err, BaseError::IncompatibleImage { .. }));
        assert!(!path.exists());
    }

    #[test]
    fn test_scaled_size() {
        assert_eq!(scaled_size(3, 2, 4), Some((12, 8)));
        assert_eq!(scaled_size(2, 1, u32::MAX), None);
        assert_eq!(scaled_size(1, 2, u32::MAX / 2 + 1), None);
    }
}
