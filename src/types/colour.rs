//! Colour type and parsing.

use std::fmt;
use std::str::FromStr;

use image::Rgba;

use crate::error::{BaseError, Result};

/// An RGBA colour value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Colour {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Colour {
    /// Create a new colour from RGBA components.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create a new opaque colour from RGB components.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Fully transparent colour.
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);

    /// Black.
    pub const BLACK: Self = Self::rgb(0, 0, 0);

    /// White.
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    /// Parse a hex colour string.
    ///
    /// Supports `#RRGGBB` (opaque) and `#RRGGBBAA`. The leading `#` is optional.
    pub fn from_hex(s: &str) -> Result<Self> {
        let s = s.trim();
        let hex = s.strip_prefix('#').unwrap_or(s);

        if !hex.is_ascii() {
            return Err(invalid_hex(s));
        }

        match hex.len() {
            6 => Ok(Self::rgb(
                parse_hex_byte(&hex[0..2])?,
                parse_hex_byte(&hex[2..4])?,
                parse_hex_byte(&hex[4..6])?,
            )),
            8 => Ok(Self::new(
                parse_hex_byte(&hex[0..2])?,
                parse_hex_byte(&hex[2..4])?,
                parse_hex_byte(&hex[4..6])?,
                parse_hex_byte(&hex[6..8])?,
            )),
            _ => Err(invalid_hex(s)),
        }
    }

    /// Convert to RGBA tuple.
    pub fn to_rgba(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// The same colour with full opacity.
    pub fn opaque(self) -> Self {
        Self::rgb(self.r, self.g, self.b)
    }

    /// Check if the colour is fully transparent.
    pub fn is_transparent(self) -> bool {
        self.a == 0
    }

    /// Check if the colour is fully opaque.
    pub fn is_opaque(self) -> bool {
        self.a == 255
    }
}

impl From<Rgba<u8>> for Colour {
    fn from(pixel: Rgba<u8>) -> Self {
        let [r, g, b, a] = pixel.0;
        Self::new(r, g, b, a)
    }
}

impl From<Colour> for Rgba<u8> {
    fn from(colour: Colour) -> Self {
        Rgba(colour.to_rgba())
    }
}

impl FromStr for Colour {
    type Err = BaseError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_hex(s)
    }
}

impl fmt::Display for Colour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a == 255 {
            write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
        } else {
            write!(f, "#{:02X}{:02X}{:02X}{:02X}", self.r, self.g, self.b, self.a)
        }
    }
}

fn invalid_hex(s: &str) -> BaseError {
    BaseError::Parse {
        message: format!("Invalid hex colour: {}", s),
        help: Some("Use #RRGGBB or #RRGGBBAA format".to_string()),
    }
}

/// Parse a two-character hex byte.
fn parse_hex_byte(s: &str) -> Result<u8> {
    u8::from_str_radix(s, 16).map_err(|_| BaseError::Parse {
        message: format!("Invalid hex byte: {}", s),
        help: None,
    })
}
