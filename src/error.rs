use miette::Diagnostic;
use thiserror::Error;

use crate::types::PixelKey;

/// Main error type for pxbase operations
#[derive(Error, Diagnostic, Debug)]
pub enum BaseError {
    #[error("IO error: {0}")]
    #[diagnostic(code(pxbase::io))]
    IoError(#[from] std::io::Error),

    #[error("IO error with {path}: {message}")]
    #[diagnostic(code(pxbase::io))]
    Io {
        path: std::path::PathBuf,
        message: String,
    },

    #[error("Parse error: {message}")]
    #[diagnostic(code(pxbase::parse))]
    Parse {
        message: String,
        #[help]
        help: Option<String>,
    },

    /// The save document has no usable anchor.
    #[error("Invalid anchor data: {message}")]
    #[diagnostic(
        code(pxbase::anchor),
        help("The first object in the save document must be the base flag")
    )]
    InvalidAnchorData { message: String },

    /// The sprite would produce more objects than the game allows.
    #[error("Image too large: {width}x{height} exceeds the limit of {max} objects")]
    #[diagnostic(
        code(pxbase::too_large),
        help("Scale the sprite down or raise max_objects if the game allows it")
    )]
    ImageTooLarge { width: u32, height: u32, max: usize },

    /// The sprite cannot be reduced to the reference palette.
    #[error("Incompatible image: {message}")]
    #[diagnostic(code(pxbase::incompatible))]
    IncompatibleImage {
        message: String,
        #[help]
        help: Option<String>,
    },

    /// `pxbase check` found errors in one or more sprites.
    #[error("Check failed: {message}")]
    #[diagnostic(code(pxbase::check))]
    CheckFailed {
        message: String,
        #[help]
        help: Option<String>,
    },

    /// Transparency was requested for an image without an alpha channel.
    #[error("Invalid pixel format: {format} has no alpha channel")]
    #[diagnostic(
        code(pxbase::pixel_format),
        help("Use an RGBA image, or disable transparency handling with --no-transparency")
    )]
    InvalidPixelFormat { format: String },

    /// A pixel resolved to a key that the colour table does not know.
    #[error("Unmapped colour {key} at pixel ({column}, {row})")]
    #[diagnostic(
        code(pxbase::unmapped),
        help("Every colour the quantizer can produce needs an entry in the colour table")
    )]
    UnmappedColor { key: PixelKey, column: u32, row: u32 },
}

pub type Result<T> = std::result::Result<T, BaseError>;
