//! Reference palettes that sprites are quantized against.
//!
//! A palette is an ordered list of colours; a colour's position in the list is
//! its palette index, which is what index-keyed colour tables look up.

use std::collections::BTreeSet;
use std::path::Path;

use image::RgbaImage;

use crate::error::{BaseError, Result};

use super::Colour;

/// The 64 NES (NTSC) colours in hardware order, 0x00 to 0x3F.
const NES_HARDWARE: [Colour; 64] = [
    // 0x00
    Colour::rgb(124, 124, 124),
    Colour::rgb(0, 0, 252),
    Colour::rgb(0, 0, 188),
    Colour::rgb(68, 40, 188),
    Colour::rgb(148, 0, 132),
    Colour::rgb(168, 0, 32),
    Colour::rgb(168, 16, 0),
    Colour::rgb(136, 20, 0),
    Colour::rgb(80, 48, 0),
    Colour::rgb(0, 120, 0),
    Colour::rgb(0, 104, 0),
    Colour::rgb(0, 88, 0),
    Colour::rgb(0, 64, 88),
    Colour::rgb(0, 0, 0),
    Colour::rgb(0, 0, 0),
    Colour::rgb(0, 0, 0),
    // 0x10
    Colour::rgb(188, 188, 188),
    Colour::rgb(0, 120, 248),
    Colour::rgb(0, 88, 248),
    Colour::rgb(104, 68, 252),
    Colour::rgb(216, 0, 204),
    Colour::rgb(228, 0, 88),
    Colour::rgb(248, 56, 0),
    Colour::rgb(228, 92, 16),
    Colour::rgb(172, 124, 0),
    Colour::rgb(0, 184, 0),
    Colour::rgb(0, 168, 0),
    Colour::rgb(0, 168, 68),
    Colour::rgb(0, 136, 136),
    Colour::rgb(0, 0, 0),
    Colour::rgb(0, 0, 0),
    Colour::rgb(0, 0, 0),
    // 0x20
    Colour::rgb(248, 248, 248),
    Colour::rgb(60, 188, 252),
    Colour::rgb(104, 136, 252),
    Colour::rgb(152, 120, 248),
    Colour::rgb(248, 120, 248),
    Colour::rgb(248, 88, 152),
    Colour::rgb(248, 120, 88),
    Colour::rgb(252, 160, 68),
    Colour::rgb(248, 184, 0),
    Colour::rgb(184, 248, 24),
    Colour::rgb(88, 216, 84),
    Colour::rgb(88, 248, 152),
    Colour::rgb(0, 232, 216),
    Colour::rgb(120, 120, 120),
    Colour::rgb(0, 0, 0),
    Colour::rgb(0, 0, 0),
    // 0x30
    Colour::rgb(252, 252, 252),
    Colour::rgb(164, 228, 252),
    Colour::rgb(184, 184, 248),
    Colour::rgb(216, 184, 248),
    Colour::rgb(248, 184, 248),
    Colour::rgb(248, 164, 192),
    Colour::rgb(240, 208, 176),
    Colour::rgb(252, 224, 168),
    Colour::rgb(248, 216, 120),
    Colour::rgb(216, 248, 120),
    Colour::rgb(184, 248, 184),
    Colour::rgb(184, 248, 216),
    Colour::rgb(0, 252, 252),
    Colour::rgb(248, 216, 248),
    Colour::rgb(0, 0, 0),
    Colour::rgb(0, 0, 0),
];

/// The builtin NES palette in palette-sheet order.
///
/// The sheet starts with hardware colour 0x00, continues with 0x10..=0x3F and
/// ends with 0x01..=0x0F. The builtin `nes` colour table is indexed this way,
/// so the first black is index 14 and the first white index 17.
pub const NES_PALETTE: [Colour; 64] = sheet_order(NES_HARDWARE);

const fn sheet_order(hardware: [Colour; 64]) -> [Colour; 64] {
    let mut sheet = [Colour::BLACK; 64];
    sheet[0] = hardware[0];

    let mut i = 1;
    while i < 49 {
        sheet[i] = hardware[i + 15];
        i += 1;
    }
    while i < 64 {
        sheet[i] = hardware[i - 48];
        i += 1;
    }
    sheet
}

/// An ordered, indexable collection of reference colours.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    /// Palette name (builtin name or the asset's file stem)
    pub name: String,

    colours: Vec<Colour>,
}

impl Palette {
    /// Largest palette whose indices still fit in a byte.
    pub const MAX_COLOURS: usize = 256;

    /// Create a palette from an ordered list of colours.
    pub fn new(name: impl Into<String>, colours: Vec<Colour>) -> Result<Self> {
        let name = name.into();
        if colours.is_empty() || colours.len() > Self::MAX_COLOURS {
            return Err(BaseError::Parse {
                message: format!(
                    "Palette '{}' has {} colours, expected 1 to {}",
                    name,
                    colours.len(),
                    Self::MAX_COLOURS
                ),
                help: Some("Palette indices must fit in a single byte".to_string()),
            });
        }

        Ok(Self { name, colours })
    }

    /// The builtin NES palette.
    pub fn nes() -> Self {
        Self {
            name: "nes".to_string(),
            colours: NES_PALETTE.to_vec(),
        }
    }

    /// Build a palette from a palette image.
    ///
    /// Distinct opaque colours are collected in row-major order of first
    /// appearance. Transparent pixels are ignored.
    pub fn from_image(name: impl Into<String>, img: &RgbaImage) -> Result<Self> {
        let mut seen = BTreeSet::new();
        let mut colours = Vec::new();

        for pixel in img.pixels() {
            let colour = Colour::from(*pixel);
            if colour.is_transparent() {
                continue;
            }
            if seen.insert(colour) {
                colours.push(colour);
            }
        }

        Self::new(name, colours)
    }

    /// Load a palette asset from a PNG file.
    pub fn load(path: &Path) -> Result<Self> {
        let img = image::open(path)
            .map_err(|e| BaseError::Io {
                path: path.to_path_buf(),
                message: format!("Failed to load palette image: {}", e),
            })?
            .to_rgba8();

        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("palette");

        Self::from_image(name, &img)
    }

    /// Resolve a palette name: `nes` is builtin, anything else is a PNG path.
    pub fn resolve(spec: &str) -> Result<Self> {
        match spec {
            "nes" => Ok(Self::nes()),
            path => Self::load(Path::new(path)),
        }
    }

    /// Get a colour by palette index.
    pub fn get(&self, index: u8) -> Option<Colour> {
        self.colours.get(index as usize).copied()
    }

    /// All colours in index order.
    pub fn colours(&self) -> &[Colour] {
        &self.colours
    }

    /// The set of distinct colours, ignoring order and duplicates.
    pub fn colour_set(&self) -> BTreeSet<Colour> {
        self.colours.iter().copied().collect()
    }

    /// Get the number of colours.
    pub fn len(&self) -> usize {
        self.colours.len()
    }

    /// Check if the palette is empty.
    pub fn is_empty(&self) -> bool {
        self.colours.is_empty()
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::nes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_nes_palette_shape() {
        let palette = Palette::nes();
        assert_eq!(palette.len(), 64);
        assert!(palette.colours().iter().all(|c| c.is_opaque()));
        assert_eq!(palette.get(0), Some(Colour::rgb(124, 124, 124)));
        assert_eq!(palette.get(0x11), Some(Colour::rgb(248, 248, 248)));
        assert_eq!(palette.get(64), None);
    }

    #[test]
    fn test_nes_palette_sheet_order() {
        let palette = Palette::nes();
        assert_eq!(palette.get(1), Some(Colour::rgb(188, 188, 188)));
        assert_eq!(palette.get(2), Some(Colour::rgb(0, 120, 248)));
        assert_eq!(palette.get(5), Some(Colour::rgb(216, 0, 204)));
        assert_eq!(palette.get(33), Some(Colour::rgb(252, 252, 252)));
        assert_eq!(palette.get(49), Some(Colour::rgb(0, 0, 252)));
        for black in [14, 15, 16, 31, 32, 48, 61, 62, 63] {
            assert_eq!(palette.get(black), Some(Colour::BLACK), "index {black}");
        }
    }

    #[test]
    fn test_nes_palette_has_duplicate_blacks() {
        let palette = Palette::nes();
        assert!(palette.colour_set().len() < palette.len());
    }

    #[test]
    fn test_new_rejects_empty() {
        assert!(Palette::new("empty", vec![]).is_err());
    }

    #[test]
    fn test_new_rejects_oversized() {
        let colours = vec![Colour::BLACK; Palette::MAX_COLOURS + 1];
        assert!(Palette::new("huge", colours).is_err());
    }

    #[test]
    fn test_from_image_dedupes_in_order() {
        let mut img = RgbaImage::new(3, 2);
        img.put_pixel(0, 0, Rgba([255, 0, 0, 255]));
        img.put_pixel(1, 0, Rgba([0, 255, 0, 255]));
        img.put_pixel(2, 0, Rgba([255, 0, 0, 255]));
        img.put_pixel(0, 1, Rgba([0, 0, 0, 0]));
        img.put_pixel(1, 1, Rgba([0, 0, 255, 255]));
        img.put_pixel(2, 1, Rgba([0, 255, 0, 255]));

        let palette = Palette::from_image("test", &img).unwrap();
        assert_eq!(
            palette.colours(),
            &[
                Colour::rgb(255, 0, 0),
                Colour::rgb(0, 255, 0),
                Colour::rgb(0, 0, 255)
            ]
        );
    }

    #[test]
    fn test_load_from_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tiny.png");
        let mut img = RgbaImage::new(2, 1);
        img.put_pixel(0, 0, Rgba([10, 20, 30, 255]));
        img.put_pixel(1, 0, Rgba([40, 50, 60, 255]));
        img.save(&path).unwrap();

        let palette = Palette::load(&path).unwrap();
        assert_eq!(palette.name, "tiny");
        assert_eq!(palette.len(), 2);
    }

    #[test]
    fn test_resolve_builtin() {
        assert_eq!(Palette::resolve("nes").unwrap(), Palette::nes());
        assert!(Palette::resolve("/nonexistent/palette.png").is_err());
    }
}
