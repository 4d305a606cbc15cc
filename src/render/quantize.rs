//! Palette quantization.
//!
//! Reduces an RGBA sprite to indices into a reference palette, with optional
//! dithering. Alpha is ignored here; transparency is the mask's job.

use std::fmt;

use clap::ValueEnum;
use image::RgbaImage;
use palette::{IntoColor, Lab, Srgb};
use serde::{Deserialize, Serialize};

use crate::error::{BaseError, Result};
use crate::types::{Colour, Palette, Sprite};

/// Dithering method for colour quantization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum DitherMethod {
    /// No dithering; direct nearest-colour mapping.
    #[default]
    None,
    /// Ordered dithering using a Bayer 4x4 threshold matrix.
    Ordered,
    /// Floyd-Steinberg error diffusion dithering.
    FloydSteinberg,
}

impl fmt::Display for DitherMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DitherMethod::None => write!(f, "none"),
            DitherMethod::Ordered => write!(f, "ordered"),
            DitherMethod::FloydSteinberg => write!(f, "floyd-steinberg"),
        }
    }
}

/// How "nearest" is measured when picking a palette colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum ColourMetric {
    /// Red-mean weighted RGB distance.
    #[default]
    Weighted,
    /// Euclidean distance in CIE L*a*b*.
    Lab,
}

impl fmt::Display for ColourMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColourMetric::Weighted => write!(f, "weighted"),
            ColourMetric::Lab => write!(f, "lab"),
        }
    }
}

/// Bayer 4x4 ordered dithering threshold matrix.
const BAYER_4X4: [[u8; 4]; 4] = [
    [0, 8, 2, 10],
    [12, 4, 14, 6],
    [3, 11, 1, 9],
    [15, 7, 13, 5],
];

/// Ordered dither strength in channel units.
const ORDERED_SPREAD: f32 = 32.0;

/// Reduces sprites to a reference palette.
#[derive(Debug, Clone)]
pub struct Quantizer {
    palette: Palette,
    dither: DitherMethod,
    metric: ColourMetric,
    lab: Vec<Lab>,
}

impl Quantizer {
    pub fn new(palette: Palette) -> Self {
        let lab = palette.colours().iter().map(|c| to_lab(*c)).collect();
        Self {
            palette,
            dither: DitherMethod::None,
            metric: ColourMetric::Weighted,
            lab,
        }
    }

    pub fn with_dither(mut self, dither: DitherMethod) -> Self {
        self.dither = dither;
        self
    }

    pub fn with_metric(mut self, metric: ColourMetric) -> Self {
        self.metric = metric;
        self
    }

    /// The reference palette.
    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Find the palette index nearest to a colour. Ties go to the lower index.
    pub fn nearest(&self, colour: Colour) -> u8 {
        let mut best_index = 0usize;
        let mut best_dist = f32::MAX;

        match self.metric {
            ColourMetric::Weighted => {
                for (i, pc) in self.palette.colours().iter().enumerate() {
                    let dist = weighted_distance(colour, *pc) as f32;
                    if dist < best_dist {
                        best_dist = dist;
                        best_index = i;
                    }
                }
            }
            ColourMetric::Lab => {
                let target = to_lab(colour);
                for (i, pc) in self.lab.iter().enumerate() {
                    let dist = lab_distance(&target, pc);
                    if dist < best_dist {
                        best_dist = dist;
                        best_index = i;
                    }
                }
            }
        }

        best_index as u8
    }

    /// Quantize an image to palette indices.
    pub fn quantize(&self, img: &RgbaImage) -> Result<Sprite> {
        let (width, height) = img.dimensions();
        if width == 0 || height == 0 {
            return Err(BaseError::IncompatibleImage {
                message: format!("Image has zero dimensions ({}x{})", width, height),
                help: Some("Input image must have non-zero width and height".to_string()),
            });
        }

        let indices = match self.dither {
            DitherMethod::None => self.quantize_direct(img),
            DitherMethod::Ordered => self.dither_ordered(img),
            DitherMethod::FloydSteinberg => self.dither_floyd_steinberg(img),
        };

        Sprite::from_indices(width, height, indices)
    }

    fn quantize_direct(&self, img: &RgbaImage) -> Vec<u8> {
        img.pixels()
            .map(|p| self.nearest(Colour::from(*p).opaque()))
            .collect()
    }

    /// Shifts each pixel by the Bayer threshold before matching.
    fn dither_ordered(&self, img: &RgbaImage) -> Vec<u8> {
        img.enumerate_pixels()
            .map(|(x, y, p)| {
                let threshold = BAYER_4X4[y as usize % 4][x as usize % 4] as f32 / 16.0 - 0.5;
                let offset = threshold * ORDERED_SPREAD;
                let c = Colour::from(*p);

                let adjusted = Colour::rgb(
                    (c.r as f32 + offset).clamp(0.0, 255.0) as u8,
                    (c.g as f32 + offset).clamp(0.0, 255.0) as u8,
                    (c.b as f32 + offset).clamp(0.0, 255.0) as u8,
                );
                self.nearest(adjusted)
            })
            .collect()
    }

    /// Floyd-Steinberg error diffusion.
    ///
    /// ```text
    ///        *   7/16
    ///  3/16 5/16 1/16
    /// ```
    ///
    /// Transparent pixels neither receive nor spread error.
    fn dither_floyd_steinberg(&self, img: &RgbaImage) -> Vec<u8> {
        let width = img.width() as usize;
        let height = img.height() as usize;

        let mut buf: Vec<[f32; 3]> = img
            .pixels()
            .map(|p| [p.0[0] as f32, p.0[1] as f32, p.0[2] as f32])
            .collect();
        let transparent: Vec<bool> = img.pixels().map(|p| p.0[3] == 0).collect();

        let mut result = vec![0u8; width * height];
        let neighbours: [(isize, isize, f32); 4] = [
            (1, 0, 7.0 / 16.0),
            (-1, 1, 3.0 / 16.0),
            (0, 1, 5.0 / 16.0),
            (1, 1, 1.0 / 16.0),
        ];

        for y in 0..height {
            for x in 0..width {
                let i = y * width + x;
                let old = buf[i];
                let old_colour = Colour::rgb(
                    old[0].clamp(0.0, 255.0) as u8,
                    old[1].clamp(0.0, 255.0) as u8,
                    old[2].clamp(0.0, 255.0) as u8,
                );

                let idx = self.nearest(old_colour);
                result[i] = idx;

                if transparent[i] {
                    continue;
                }

                let new = self.palette.get(idx).unwrap_or(Colour::BLACK);
                let err = [
                    old[0] - new.r as f32,
                    old[1] - new.g as f32,
                    old[2] - new.b as f32,
                ];

                for (dx, dy, weight) in &neighbours {
                    let nx = x as isize + dx;
                    let ny = y as isize + dy;
                    if nx < 0 || nx >= width as isize || ny >= height as isize {
                        continue;
                    }

                    let n = ny as usize * width + nx as usize;
                    if !transparent[n] {
                        for (channel, e) in buf[n].iter_mut().zip(err) {
                            *channel += e * weight;
                        }
                    }
                }
            }
        }

        result
    }
}

/// Weighted RGB colour distance.
///
/// Low-cost approximation from https://www.compuphase.com/cmetric.htm,
/// weighting channels by the mean red value.
fn weighted_distance(a: Colour, b: Colour) -> u32 {
    let rmean = (a.r as i32 + b.r as i32) / 2;
    let dr = a.r as i32 - b.r as i32;
    let dg = a.g as i32 - b.g as i32;
    let db = a.b as i32 - b.b as i32;

    let r_weight = 512 + rmean;
    let g_weight = 1024;
    let b_weight = 512 + (255 - rmean);

    ((r_weight * dr * dr + g_weight * dg * dg + b_weight * db * db) >> 8) as u32
}

fn to_lab(colour: Colour) -> Lab {
    let rgb: Srgb<f32> = Srgb::new(
        colour.r as f32 / 255.0,
        colour.g as f32 / 255.0,
        colour.b as f32 / 255.0,
    );
    rgb.into_color()
}

fn lab_distance(a: &Lab, b: &Lab) -> f32 {
    let dl = a.l - b.l;
    let da = a.a - b.a;
    let db = a.b - b.b;
    dl * dl + da * da + db * db
}
