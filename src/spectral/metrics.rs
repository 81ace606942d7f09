//! Spectral response scores of a segmented ink patch
//!
//! Compares how the ink stands out from the background under visible light
//! against how it stands out under IR (contrast retention) or UV
//! (fluorescence). All statistics are medians over the masked pixel
//! population, which keeps specular highlights and leftover edge pixels from
//! skewing the result.

use image::{GrayImage, RgbImage};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::color::to_luminance;
use crate::config::MetricsConfig;
use crate::{AnalysisError, Result};

/// Scores of one patch; `None` means the score was not measured
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpectralMetrics {
    /// Foreground pixels in the mask
    pub ink_pixel_count: usize,
    /// 1 - fraction of visible contrast retained under IR, in [0, 1]
    pub ir_score: Option<f64>,
    /// Relative brightness of ink over background under UV
    pub uv_score: Option<f64>,
}

/// Sentinel form of the scores for displays that expect plain numbers
///
/// `{0.0, 0.0}` when no ink was found; otherwise a missing IR score reads
/// `0.0` and a missing UV score reads `-1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScorePair {
    pub ir_score: f64,
    pub uv_score: f64,
}

impl SpectralMetrics {
    fn no_ink() -> Self {
        Self {
            ink_pixel_count: 0,
            ir_score: None,
            uv_score: None,
        }
    }

    /// Whether the mask contained any ink
    pub fn has_ink(&self) -> bool {
        self.ink_pixel_count > 0
    }

    pub fn score_pair(&self) -> ScorePair {
        if !self.has_ink() {
            return ScorePair {
                ir_score: 0.0,
                uv_score: 0.0,
            };
        }
        ScorePair {
            ir_score: self.ir_score.unwrap_or(0.0),
            uv_score: self.uv_score.unwrap_or(-1.0),
        }
    }
}

/// Computes spectral scores from VIS, optional IR/UV luminance and a mask
#[derive(Debug, Clone, Default)]
pub struct MetricsCalculator {
    config: MetricsConfig,
}

/// Ink and background pixel values of one channel
struct Split {
    ink: Vec<u8>,
    background: Vec<u8>,
}

impl MetricsCalculator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: MetricsConfig) -> Self {
        Self { config }
    }

    /// Compute IR and UV scores for the masked ink patch
    ///
    /// # Arguments
    ///
    /// * `vis` - Visible-light RGB image
    /// * `ir` - Infrared luminance, if captured
    /// * `uv` - Ultraviolet luminance, if captured
    /// * `mask` - Binary ink mask (non-zero = ink)
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::DimensionMismatch` if `ir`, `uv` or `mask`
    /// differ in size from `vis`.
    pub fn compute(
        &self,
        vis: &RgbImage,
        ir: Option<&GrayImage>,
        uv: Option<&GrayImage>,
        mask: &GrayImage,
    ) -> Result<SpectralMetrics> {
        let expected = vis.dimensions();
        check_dimensions("mask", expected, mask.dimensions())?;
        if let Some(ir) = ir {
            check_dimensions("IR image", expected, ir.dimensions())?;
        }
        if let Some(uv) = uv {
            check_dimensions("UV image", expected, uv.dimensions())?;
        }

        let ink_pixel_count = mask.pixels().filter(|p| p[0] > 0).count();
        if ink_pixel_count == 0 {
            debug!("empty mask, no spectral scores");
            return Ok(SpectralMetrics::no_ink());
        }
        if ink_pixel_count == mask.len() {
            warn!("mask covers the whole image, no background to compare against");
            return Ok(SpectralMetrics {
                ink_pixel_count,
                ir_score: None,
                uv_score: None,
            });
        }

        let vis = split(&to_luminance(vis), mask);
        let ink_vis = median(vis.ink);
        let bg_vis = median(vis.background);

        let ir_score = ir.map(|ir| {
            let ir = split(ir, mask);
            let vis_contrast = (bg_vis - ink_vis) + self.config.epsilon;
            let ir_contrast = median(ir.background) - median(ir.ink);
            let retention = (ir_contrast / vis_contrast).clamp(0.0, 1.0);
            1.0 - retention
        });

        let uv_score = uv.map(|uv| {
            let uv = split(uv, mask);
            let ink_uv = median(uv.ink);
            let bg_uv = median(uv.background);
            (ink_uv - bg_uv) / (bg_uv + self.config.epsilon)
        });

        debug!(ink_pixel_count, ink_vis, bg_vis, ?ir_score, ?uv_score, "spectral scores");

        Ok(SpectralMetrics {
            ink_pixel_count,
            ir_score,
            uv_score,
        })
    }
}

fn check_dimensions(what: &str, expected: (u32, u32), actual: (u32, u32)) -> Result<()> {
    if expected != actual {
        return Err(AnalysisError::DimensionMismatch {
            what: what.to_string(),
            expected,
            actual,
        });
    }
    Ok(())
}

fn split(channel: &GrayImage, mask: &GrayImage) -> Split {
    let mut ink = Vec::new();
    let mut background = Vec::new();
    for (value, m) in channel.pixels().zip(mask.pixels()) {
        if m[0] > 0 {
            ink.push(value[0]);
        } else {
            background.push(value[0]);
        }
    }
    Split { ink, background }
}

/// Median of a non-empty sample; even-sized samples average the middle pair
fn median(mut values: Vec<u8>) -> f64 {
    debug_assert!(!values.is_empty());
    let n = values.len();
    let mid = n / 2;
    let (lower, upper, _) = values.select_nth_unstable(mid);
    let upper = *upper as f64;
    if n % 2 == 1 {
        upper
    } else {
        let below = lower.iter().copied().max().map_or(upper, f64::from);
        (below + upper) / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Luma, Rgb};

    const INK: u8 = 20;
    const PAPER: u8 = 255;

    fn vis_image() -> RgbImage {
        RgbImage::from_fn(10, 10, |_, y| {
            let v = if y < 5 { INK } else { PAPER };
            Rgb([v, v, v])
        })
    }

    fn top_half_mask() -> GrayImage {
        GrayImage::from_fn(10, 10, |_, y| Luma([if y < 5 { 255 } else { 0 }]))
    }

    fn gray(ink: u8, background: u8) -> GrayImage {
        GrayImage::from_fn(10, 10, |_, y| Luma([if y < 5 { ink } else { background }]))
    }

    #[test]
    fn test_median_odd_and_even() {
        assert_eq!(median(vec![5, 1, 3]), 3.0);
        assert_eq!(median(vec![4, 1, 3, 2]), 2.5);
        assert_eq!(median(vec![7]), 7.0);
        assert_eq!(median(vec![10, 200]), 105.0);
    }

    #[test]
    fn test_empty_mask_returns_no_ink() {
        let mask = GrayImage::new(10, 10);
        let ir = gray(20, 255);
        let uv = gray(200, 100);
        let metrics = MetricsCalculator::new()
            .compute(&vis_image(), Some(&ir), Some(&uv), &mask)
            .unwrap();

        assert!(!metrics.has_ink());
        assert_eq!(metrics.ir_score, None);
        assert_eq!(metrics.uv_score, None);
        assert_eq!(
            metrics.score_pair(),
            ScorePair {
                ir_score: 0.0,
                uv_score: 0.0
            }
        );
    }

    #[test]
    fn test_ir_identical_to_vis_is_carbon_like() {
        let ir = gray(INK, PAPER);
        let metrics = MetricsCalculator::new()
            .compute(&vis_image(), Some(&ir), None, &top_half_mask())
            .unwrap();

        let score = metrics.ir_score.unwrap();
        assert!(score.abs() < 1e-6, "ir_score = {score}");
        assert_eq!(metrics.uv_score, None);
        assert_eq!(metrics.score_pair().uv_score, -1.0);
    }

    #[test]
    fn test_ir_vanishing_ink_is_iron_gall_like() {
        let ir = gray(PAPER, PAPER);
        let metrics = MetricsCalculator::new()
            .compute(&vis_image(), Some(&ir), None, &top_half_mask())
            .unwrap();

        assert!((metrics.ir_score.unwrap() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_ir_score_clamped() {
        // Ink brighter than background under IR: negative retention
        let brighter = gray(250, 100);
        let m = MetricsCalculator::new()
            .compute(&vis_image(), Some(&brighter), None, &top_half_mask())
            .unwrap();
        assert_eq!(m.ir_score, Some(1.0));

        // IR contrast larger than VIS contrast: retention above one
        let vis = RgbImage::from_fn(10, 10, |_, y| {
            let v = if y < 5 { 120 } else { 160 };
            Rgb([v, v, v])
        });
        let stronger = gray(0, 255);
        let m = MetricsCalculator::new()
            .compute(&vis, Some(&stronger), None, &top_half_mask())
            .unwrap();
        assert_eq!(m.ir_score, Some(0.0));
    }

    #[test]
    fn test_uv_fluorescence_score() {
        let uv = gray(150, 100);
        let metrics = MetricsCalculator::new()
            .compute(&vis_image(), None, Some(&uv), &top_half_mask())
            .unwrap();

        assert!((metrics.uv_score.unwrap() - 0.5).abs() < 1e-6);
        assert_eq!(metrics.ir_score, None);
        assert_eq!(metrics.score_pair().ir_score, 0.0);
    }

    #[test]
    fn test_median_resists_outliers() {
        let mut uv = gray(150, 100);
        uv.put_pixel(0, 0, Luma([255]));
        uv.put_pixel(1, 0, Luma([0]));
        uv.put_pixel(0, 9, Luma([255]));
        let metrics = MetricsCalculator::new()
            .compute(&vis_image(), None, Some(&uv), &top_half_mask())
            .unwrap();
        assert!((metrics.uv_score.unwrap() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_dimension_mismatch_rejected() {
        let ir = GrayImage::new(10, 8);
        let err = MetricsCalculator::new()
            .compute(&vis_image(), Some(&ir), None, &top_half_mask())
            .unwrap_err();
        match err {
            AnalysisError::DimensionMismatch { what, expected, actual } => {
                assert_eq!(what, "IR image");
                assert_eq!(expected, (10, 10));
                assert_eq!(actual, (10, 8));
            }
            other => panic!("Expected DimensionMismatch, got: {:?}", other),
        }

        let mask = GrayImage::new(9, 10);
        assert!(MetricsCalculator::new()
            .compute(&vis_image(), None, None, &mask)
            .is_err());
    }

    #[test]
    fn test_full_mask_has_no_background() {
        let mask = GrayImage::from_pixel(10, 10, Luma([255]));
        let ir = gray(INK, PAPER);
        let metrics = MetricsCalculator::new()
            .compute(&vis_image(), Some(&ir), None, &mask)
            .unwrap();
        assert_eq!(metrics.ink_pixel_count, 100);
        assert_eq!(metrics.ir_score, None);
    }

    #[test]
    fn test_compute_is_deterministic() {
        let ir = gray(90, 240);
        let calculator = MetricsCalculator::new();
        let a = calculator
            .compute(&vis_image(), Some(&ir), None, &top_half_mask())
            .unwrap();
        let b = calculator
            .compute(&vis_image(), Some(&ir), None, &top_half_mask())
            .unwrap();
        assert_eq!(a, b);
    }
}
