//! Image-side collaborators of the mapping pipeline.
//!
//! Quantization reduces arbitrary sprites to a reference palette; the PNG
//! writer renders quantized sprites back out for inspection.

mod png;
mod quantize;

pub use png::{sprite_to_image, write_png};
pub use quantize::{ColourMetric, DitherMethod, Quantizer};
