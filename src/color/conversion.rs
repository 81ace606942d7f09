//! Pixel colour space conversions
//!
//! - RGB to 8-bit HSV (hue in half-degrees 0..=179, saturation and value 0..=255)
//! - RGB to BT.601 luminance, matching the usual camera-to-grey reduction

use image::{GrayImage, Luma, Rgb, RgbImage};
use palette::{FromColor, Hsv, Srgb};

use crate::constants::luma;

/// Convert an RGB pixel to HSV on the 8-bit scale.
///
/// Hue is halved so a full turn fits in a byte, which is the scale the
/// threshold bands in [`crate::config::SegmentationConfig`] are written in.
pub fn hsv8(pixel: Rgb<u8>) -> [u8; 3] {
    let [r, g, b] = pixel.0;
    let srgb = Srgb::new(r, g, b).into_format::<f32>();
    let hsv: Hsv = Hsv::from_color(srgb);

    let half_degrees = (hsv.hue.into_positive_degrees() / 2.0).round() as u32 % 180;
    let saturation = (hsv.saturation * 255.0).round().clamp(0.0, 255.0) as u8;
    // Value is max(R, G, B); take it exactly rather than through floats
    let value = r.max(g).max(b);

    [half_degrees as u8, saturation, value]
}

/// BT.601 luminance of an RGB pixel, rounded to the nearest integer
#[inline]
pub fn luminance(pixel: Rgb<u8>) -> u8 {
    let [r, g, b] = pixel.0;
    let y = r as u32 * luma::R_WEIGHT
        + g as u32 * luma::G_WEIGHT
        + b as u32 * luma::B_WEIGHT
        + luma::ROUNDING;
    (y >> luma::SHIFT).min(255) as u8
}

/// Reduce an RGB image to single-channel luminance
pub fn to_luminance(image: &RgbImage) -> GrayImage {
    GrayImage::from_fn(image.width(), image.height(), |x, y| {
        Luma([luminance(*image.get_pixel(x, y))])
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hsv_primaries() {
        assert_eq!(hsv8(Rgb([255, 0, 0])), [0, 255, 255]);
        assert_eq!(hsv8(Rgb([0, 255, 0])), [60, 255, 255]);
        assert_eq!(hsv8(Rgb([0, 0, 255])), [120, 255, 255]);
    }

    #[test]
    fn test_hsv_greys_have_no_saturation() {
        assert_eq!(hsv8(Rgb([0, 0, 0])), [0, 0, 0]);
        assert_eq!(hsv8(Rgb([20, 20, 20])), [0, 0, 20]);
        assert_eq!(hsv8(Rgb([255, 255, 255])), [0, 0, 255]);
    }

    #[test]
    fn test_hsv_magenta_red_near_wrap() {
        // Hue ~350 degrees lands in the upper red band
        let [h, s, v] = hsv8(Rgb([200, 20, 50]));
        assert!(h >= 170, "hue {h} should wrap near 180");
        assert!(s > 200);
        assert_eq!(v, 200);
    }

    #[test]
    fn test_luminance_weights() {
        assert_eq!(luminance(Rgb([0, 0, 0])), 0);
        assert_eq!(luminance(Rgb([255, 255, 255])), 255);
        assert_eq!(luminance(Rgb([20, 20, 20])), 20);
        // 0.299 * 255 = 76.2
        assert_eq!(luminance(Rgb([255, 0, 0])), 76);
        // 0.587 * 255 = 149.7
        assert_eq!(luminance(Rgb([0, 255, 0])), 150);
        // 0.114 * 255 = 29.1
        assert_eq!(luminance(Rgb([0, 0, 255])), 29);
    }

    #[test]
    fn test_to_luminance_preserves_dimensions() {
        let image = RgbImage::from_pixel(7, 3, Rgb([100, 100, 100]));
        let gray = to_luminance(&image);
        assert_eq!(gray.dimensions(), (7, 3));
        assert!(gray.pixels().all(|p| p[0] == 100));
    }
}
