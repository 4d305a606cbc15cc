//! Input validation for pxbase.
//!
//! The gate functions (`validate_anchor_document`, `validate_image`) fail
//! fast and run before any mapping. The coverage checks collect diagnostics
//! instead, for `pxbase check`.

mod checks;
mod warning;

pub use checks::{check_sprite_coverage, check_table_coverage};
pub use warning::{Diagnostic, Severity, ValidationResult};

use image::DynamicImage;
use serde_json::Value;

use crate::error::{BaseError, Result};
use crate::render::Quantizer;
use crate::types::{Sprite, OBJECTS_KEY};

/// Check that a base document has an object collection whose first element
/// is the anchor marker.
pub fn validate_anchor_document(doc: &Value, anchor_id: &str) -> Result<()> {
    let objects = doc
        .get(OBJECTS_KEY)
        .and_then(Value::as_array)
        .ok_or_else(|| BaseError::InvalidAnchorData {
            message: "Objects array in base data was not found".to_string(),
        })?;

    let first = objects.first().ok_or_else(|| BaseError::InvalidAnchorData {
        message: "Objects array is empty".to_string(),
    })?;

    match first.get("ObjectID").and_then(Value::as_str) {
        Some(id) if id == anchor_id => Ok(()),
        Some(id) => Err(BaseError::InvalidAnchorData {
            message: format!("First object is {}, expected {}", id, anchor_id),
        }),
        None => Err(BaseError::InvalidAnchorData {
            message: "First object has no ObjectID".to_string(),
        }),
    }
}

/// Check that an image fits the object limit and reduces to the palette.
///
/// The reduction is attempted here so that an incompatible image is caught
/// before the pipeline runs, and the reduced sprite is returned for the
/// pipeline to use. Pass `None` for sprites used unquantized.
pub fn validate_image(
    img: &DynamicImage,
    max_objects: usize,
    quantizer: Option<&Quantizer>,
) -> Result<Option<Sprite>> {
    let (width, height) = (img.width(), img.height());

    if width as u64 * height as u64 > max_objects as u64 {
        return Err(BaseError::ImageTooLarge {
            width,
            height,
            max: max_objects,
        });
    }

    if width == 0 || height == 0 {
        return Err(BaseError::IncompatibleImage {
            message: format!("Image has zero dimensions ({}x{})", width, height),
            help: Some("Input image must have non-zero width and height".to_string()),
        });
    }

    let Some(quantizer) = quantizer else {
        return Ok(None);
    };

    let sprite = quantizer
        .quantize(&img.to_rgba8())
        .map_err(|e| BaseError::IncompatibleImage {
            message: format!(
                "Cannot reduce image to palette '{}': {}",
                quantizer.palette().name,
                e
            ),
            help: None,
        })?;

    Ok(Some(sprite))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::{BASE_FLAG_ID, MAX_BASE_OBJECTS};
    use crate::types::Palette;
    use image::{Rgba, RgbaImage};
    use serde_json::json;

    #[test]
    fn test_anchor_document_ok() {
        let doc = json!({ "Objects": [{ "ObjectID": "^BASE_FLAG" }, { "ObjectID": "^T_FLOOR" }] });
        assert!(validate_anchor_document(&doc, BASE_FLAG_ID).is_ok());
    }

    #[test]
    fn test_anchor_document_missing_objects() {
        let doc = json!({ "Name": "no objects" });
        let err = validate_anchor_document(&doc, BASE_FLAG_ID).unwrap_err();
        assert!(matches!(err, BaseError::InvalidAnchorData { .. }));
    }

    #[test]
    fn test_anchor_document_objects_not_array() {
        let doc = json!({ "Objects": { "ObjectID": "^BASE_FLAG" } });
        assert!(validate_anchor_document(&doc, BASE_FLAG_ID).is_err());
    }

    #[test]
    fn test_anchor_document_empty_objects() {
        let doc = json!({ "Objects": [] });
        assert!(validate_anchor_document(&doc, BASE_FLAG_ID).is_err());
    }

    #[test]
    fn test_anchor_document_first_not_flag() {
        let doc = json!({ "Objects": [{ "ObjectID": "^T_FLOOR" }, { "ObjectID": "^BASE_FLAG" }] });
        let err = validate_anchor_document(&doc, BASE_FLAG_ID).unwrap_err();
        assert!(err.to_string().contains("^T_FLOOR"));
    }

    #[test]
    fn test_anchor_document_custom_marker() {
        let doc = json!({ "Objects": [{ "ObjectID": "^FREIGHTER_CORE" }] });
        assert!(validate_anchor_document(&doc, "^FREIGHTER_CORE").is_ok());
        assert!(validate_anchor_document(&doc, BASE_FLAG_ID).is_err());
    }

    #[test]
    fn test_image_at_limit_is_ok() {
        let img = DynamicImage::ImageRgba8(RgbaImage::new(60, 50));
        assert!(validate_image(&img, MAX_BASE_OBJECTS, None).is_ok());
    }

    #[test]
    fn test_image_too_large() {
        let img = DynamicImage::ImageRgba8(RgbaImage::new(60, 51));
        let err = validate_image(&img, MAX_BASE_OBJECTS, None).unwrap_err();
        assert!(matches!(
            err,
            BaseError::ImageTooLarge {
                width: 60,
                height: 51,
                max: 3000
            }
        ));
    }

    #[test]
    fn test_image_zero_sized() {
        let img = DynamicImage::ImageRgba8(RgbaImage::new(0, 0));
        let err = validate_image(&img, MAX_BASE_OBJECTS, None).unwrap_err();
        assert!(matches!(err, BaseError::IncompatibleImage { .. }));
    }

    #[test]
    fn test_image_quantizes() {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(4, 4, Rgba([181, 49, 32, 255])));
        let quantizer = Quantizer::new(Palette::nes());
        let sprite = validate_image(&img, MAX_BASE_OBJECTS, Some(&quantizer))
            .unwrap()
            .unwrap();
        assert_eq!(sprite, quantizer.quantize(&img.to_rgba8()).unwrap());
        assert_eq!((sprite.width(), sprite.height()), (4, 4));
    }

    #[test]
    fn test_image_without_quantizer_returns_nothing() {
        let img = DynamicImage::ImageRgba8(RgbaImage::new(2, 2));
        assert!(validate_image(&img, MAX_BASE_OBJECTS, None).unwrap().is_none());
    }
}
