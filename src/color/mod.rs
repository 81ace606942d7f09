//! Colour family selection and colour space conversion
//!
//! This module maps free-text target labels onto the supported pigment
//! families and converts pixels to the HSV and luminance representations
//! used by segmentation and scoring.

pub mod conversion;
pub mod family;

pub use conversion::{hsv8, luminance, to_luminance};
pub use family::{AuxModality, ColorFamily};
