//! Ink patch segmentation by colour family
//!
//! Implements patch detection that:
//! - Thresholds the image in HSV with a per-family rule
//! - Removes speckle noise with a morphological opening
//! - Keeps only the dominant connected region
//! - Re-applies the per-pixel threshold inside that region so holes in the
//!   stroke stay background
//! - Erodes the boundary to avoid blended edge pixels
//!
//! The source image is never modified; only a mask is produced.

use image::{GrayImage, Luma, Rgb, RgbImage};
use imageproc::distance_transform::Norm;
use imageproc::morphology::{dilate, erode};
use tracing::debug;

use crate::color::{hsv8, ColorFamily};
use crate::config::SegmentationConfig;
use crate::detection::region::{fill_region, largest_external_contour};
use crate::{AnalysisError, Result};

const FOREGROUND: u8 = 255;

/// Paper white used behind extracted pigment
const BACKGROUND_FILL: Rgb<u8> = Rgb([255, 255, 255]);

/// Intermediate masks of one segmentation run
#[derive(Debug, Clone)]
pub struct SegmentationStages {
    /// Raw per-pixel HSV threshold result
    pub threshold_mask: GrayImage,
    /// Threshold mask after morphological opening
    pub opened_mask: GrayImage,
    /// Filled interior of the largest region (all zero when nothing matched)
    pub region_mask: GrayImage,
    /// Opened mask restricted to the region, then eroded
    pub final_mask: GrayImage,
}

/// Patch segmenter implementing HSV thresholding with region cleanup
#[derive(Debug, Clone, Default)]
pub struct PatchSegmenter {
    config: SegmentationConfig,
}

impl PatchSegmenter {
    /// Create a segmenter with the default manuscript thresholds
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a segmenter with custom thresholds
    pub fn with_config(config: SegmentationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SegmentationConfig {
        &self.config
    }

    /// Segment the ink patch of `family` in an RGB image
    ///
    /// # Returns
    ///
    /// Binary mask (0 = background, 255 = ink) with the image's dimensions.
    /// The mask is all zero when no pixel matches the family's threshold.
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::EmptyImage` if the image has no pixels.
    pub fn segment(&self, image: &RgbImage, family: ColorFamily) -> Result<GrayImage> {
        Ok(self.segment_with_stages(image, family)?.final_mask)
    }

    /// Segment and keep every intermediate mask
    pub fn segment_with_stages(
        &self,
        image: &RgbImage,
        family: ColorFamily,
    ) -> Result<SegmentationStages> {
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(AnalysisError::EmptyImage { width, height });
        }

        // Step 1: HSV threshold
        let threshold_mask = self.threshold(image, family);

        // Step 2: Opening removes isolated speckles
        let radius = self.config.kernel_radius();
        let opened_mask = dilate(&erode(&threshold_mask, Norm::LInf, radius), Norm::LInf, radius);

        // Step 3: Dominant region, intersected with the opened mask
        let region_mask = match largest_external_contour(&opened_mask) {
            Some(contour) => fill_region(&opened_mask, &contour),
            None => GrayImage::new(width, height),
        };
        let mut final_mask = intersect(&opened_mask, &region_mask);

        // Step 4: Pull the boundary inwards
        for _ in 0..self.config.boundary_erosion_iterations {
            final_mask = erode(&final_mask, Norm::LInf, radius);
        }

        debug!(
            family = %family,
            threshold = count_foreground(&threshold_mask),
            opened = count_foreground(&opened_mask),
            region = count_foreground(&region_mask),
            ink = count_foreground(&final_mask),
            "patch segmented"
        );

        Ok(SegmentationStages {
            threshold_mask,
            opened_mask,
            region_mask,
            final_mask,
        })
    }

    /// Per-pixel threshold of the family's HSV bands
    fn threshold(&self, image: &RgbImage, family: ColorFamily) -> GrayImage {
        let rule = self.config.threshold(family);
        GrayImage::from_fn(image.width(), image.height(), |x, y| {
            let hsv = hsv8(*image.get_pixel(x, y));
            Luma([if rule.matches(hsv) { FOREGROUND } else { 0 }])
        })
    }
}

/// Pixelwise logical AND of two binary masks
fn intersect(a: &GrayImage, b: &GrayImage) -> GrayImage {
    GrayImage::from_fn(a.width(), a.height(), |x, y| {
        let on = a.get_pixel(x, y)[0] > 0 && b.get_pixel(x, y)[0] > 0;
        Luma([if on { FOREGROUND } else { 0 }])
    })
}

/// Number of non-zero mask pixels
pub fn count_foreground(mask: &GrayImage) -> usize {
    mask.pixels().filter(|p| p[0] > 0).count()
}

/// Copy the pigment under `mask` onto a white background
///
/// # Errors
///
/// Returns `AnalysisError::DimensionMismatch` if the mask and image differ in size.
pub fn extract_patch(image: &RgbImage, mask: &GrayImage) -> Result<RgbImage> {
    if image.dimensions() != mask.dimensions() {
        return Err(AnalysisError::DimensionMismatch {
            what: "segmentation mask".into(),
            expected: image.dimensions(),
            actual: mask.dimensions(),
        });
    }
    Ok(RgbImage::from_fn(image.width(), image.height(), |x, y| {
        if mask.get_pixel(x, y)[0] > 0 {
            *image.get_pixel(x, y)
        } else {
            BACKGROUND_FILL
        }
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    const INK: Rgb<u8> = Rgb([20, 20, 20]);
    const PAPER: Rgb<u8> = Rgb([255, 255, 255]);

    fn half_ink_image() -> RgbImage {
        RgbImage::from_fn(10, 10, |_, y| if y < 5 { INK } else { PAPER })
    }

    fn is_binary(mask: &GrayImage) -> bool {
        mask.pixels().all(|p| p[0] == 0 || p[0] == 255)
    }

    fn rows_set(mask: &GrayImage) -> Vec<u32> {
        (0..mask.height())
            .filter(|&y| (0..mask.width()).all(|x| mask.get_pixel(x, y)[0] == 255))
            .collect()
    }

    #[test]
    fn test_segmenter_creation() {
        let segmenter = PatchSegmenter::new();
        assert_eq!(segmenter.config().morph_kernel_size, 3);
        assert_eq!(segmenter.config().boundary_erosion_iterations, 2);
    }

    #[test]
    fn test_black_threshold_covers_ink_rows() {
        let stages = PatchSegmenter::new()
            .segment_with_stages(&half_ink_image(), ColorFamily::Black)
            .unwrap();

        assert_eq!(rows_set(&stages.threshold_mask), vec![0, 1, 2, 3, 4]);
        assert_eq!(rows_set(&stages.opened_mask), vec![0, 1, 2, 3, 4]);
        assert_eq!(count_foreground(&stages.threshold_mask), 50);
        assert_eq!(count_foreground(&stages.opened_mask), 50);
    }

    #[test]
    fn test_boundary_erosion_pulls_in_two_rows() {
        let mask = PatchSegmenter::new()
            .segment(&half_ink_image(), ColorFamily::Black)
            .unwrap();

        assert_eq!(rows_set(&mask), vec![0, 1, 2]);
        assert_eq!(count_foreground(&mask), 30);
        assert!(is_binary(&mask));
    }

    #[test]
    fn test_no_erosion_keeps_full_patch() {
        let config = SegmentationConfig {
            boundary_erosion_iterations: 0,
            ..SegmentationConfig::default()
        };
        let mask = PatchSegmenter::with_config(config)
            .segment(&half_ink_image(), ColorFamily::Black)
            .unwrap();

        assert_eq!(rows_set(&mask), vec![0, 1, 2, 3, 4]);
        assert_eq!(count_foreground(&mask), 50);
    }

    #[test]
    fn test_no_match_gives_empty_mask() {
        let image = RgbImage::from_pixel(12, 12, PAPER);
        for family in ColorFamily::ALL {
            let mask = PatchSegmenter::new().segment(&image, family).unwrap();
            assert_eq!(mask.dimensions(), (12, 12));
            assert_eq!(count_foreground(&mask), 0);
        }
    }

    #[test]
    fn test_empty_image_rejected() {
        let image = RgbImage::new(0, 5);
        let err = PatchSegmenter::new().segment(&image, ColorFamily::Red).unwrap_err();
        assert!(matches!(err, AnalysisError::EmptyImage { width: 0, height: 5 }));
    }

    #[test]
    fn test_opening_removes_speckle() {
        let mut image = RgbImage::from_pixel(20, 20, PAPER);
        image.put_pixel(3, 3, INK);
        for y in 8..16 {
            for x in 8..16 {
                image.put_pixel(x, y, INK);
            }
        }
        let stages = PatchSegmenter::new()
            .segment_with_stages(&image, ColorFamily::Black)
            .unwrap();

        assert_eq!(stages.threshold_mask.get_pixel(3, 3)[0], 255);
        assert_eq!(stages.opened_mask.get_pixel(3, 3)[0], 0);
        assert_eq!(count_foreground(&stages.opened_mask), 64);
    }

    #[test]
    fn test_only_largest_region_kept() {
        let mut image = RgbImage::from_pixel(30, 30, PAPER);
        for y in 2..8 {
            for x in 2..8 {
                image.put_pixel(x, y, INK);
            }
        }
        for y in 14..26 {
            for x in 14..26 {
                image.put_pixel(x, y, INK);
            }
        }
        let mask = PatchSegmenter::new().segment(&image, ColorFamily::Black).unwrap();

        assert_eq!(mask.get_pixel(4, 4)[0], 0);
        assert_eq!(mask.get_pixel(20, 20)[0], 255);
        // 12x12 block eroded by two pixels on every side
        assert_eq!(count_foreground(&mask), 64);
    }

    #[test]
    fn test_ring_hole_stays_background() {
        let mut image = RgbImage::from_pixel(40, 40, PAPER);
        for y in 5..35 {
            for x in 5..35 {
                let in_hole = (15..25).contains(&x) && (15..25).contains(&y);
                if !in_hole {
                    image.put_pixel(x, y, INK);
                }
            }
        }
        let stages = PatchSegmenter::new()
            .segment_with_stages(&image, ColorFamily::Black)
            .unwrap();

        // Region fill covers the hole, but the final mask does not
        assert_eq!(stages.region_mask.get_pixel(20, 20)[0], 255);
        assert_eq!(stages.final_mask.get_pixel(20, 20)[0], 0);
        assert_eq!(stages.final_mask.get_pixel(9, 20)[0], 255);
    }

    #[test]
    fn test_final_mask_subset_of_opened_and_region() {
        let image = RgbImage::from_fn(32, 24, |x, y| {
            if (x * 7 + y * 3) % 11 < 6 && x > 4 && y > 3 {
                Rgb([200, 30, 30])
            } else {
                Rgb([240, 235, 220])
            }
        });
        let stages = PatchSegmenter::new()
            .segment_with_stages(&image, ColorFamily::Red)
            .unwrap();

        for (x, y, pixel) in stages.final_mask.enumerate_pixels() {
            if pixel[0] > 0 {
                assert_eq!(stages.opened_mask.get_pixel(x, y)[0], 255);
                assert_eq!(stages.region_mask.get_pixel(x, y)[0], 255);
            }
        }
        assert!(is_binary(&stages.final_mask));
    }

    #[test]
    fn test_red_patch_segmented() {
        let image = RgbImage::from_fn(20, 20, |x, y| {
            if (4..16).contains(&x) && (4..16).contains(&y) {
                Rgb([190, 25, 35])
            } else {
                Rgb([235, 225, 200])
            }
        });
        let mask = PatchSegmenter::new().segment(&image, ColorFamily::Red).unwrap();
        assert_eq!(count_foreground(&mask), 64);
        assert_eq!(mask.get_pixel(10, 10)[0], 255);
    }

    #[test]
    fn test_segmentation_is_deterministic() {
        let image = half_ink_image();
        let segmenter = PatchSegmenter::new();
        let a = segmenter.segment(&image, ColorFamily::Black).unwrap();
        let b = segmenter.segment(&image, ColorFamily::Black).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_extract_patch_whitens_background() {
        let image = half_ink_image();
        let mask = PatchSegmenter::new().segment(&image, ColorFamily::Black).unwrap();
        let extracted = extract_patch(&image, &mask).unwrap();

        assert_eq!(*extracted.get_pixel(5, 0), INK);
        assert_eq!(*extracted.get_pixel(5, 4), PAPER);
        assert_eq!(*extracted.get_pixel(5, 9), PAPER);
    }

    #[test]
    fn test_extract_patch_dimension_mismatch() {
        let image = RgbImage::new(10, 10);
        let mask = GrayImage::new(10, 9);
        assert!(matches!(
            extract_patch(&image, &mask),
            Err(AnalysisError::DimensionMismatch { .. })
        ));
    }
}
