//! # Pigment Scan
//!
//! A Rust crate for classifying medieval manuscript inks and pigments from a
//! visible-light (VIS) photograph and a pixel-aligned infrared (IR) or
//! ultraviolet (UV) photograph of the same patch.
//!
//! The analysis:
//! - Segments the coloured ink patch with a per-family HSV threshold and
//!   morphological cleanup
//! - Measures how much of the ink's visible contrast survives under IR, or
//!   how strongly it fluoresces under UV
//! - Applies a per-family decision rule (Iron Gall vs. Carbon, Plant-based
//!   vs. Mineral blue, Fluorescent vs. Mineral red)
//!
//! ## Example
//!
//! ```rust,no_run
//! use pigment_scan::{analyze_files, PipelineConfig};
//! use std::path::Path;
//!
//! let analysis = analyze_files(
//!     Path::new("I32_black_VIS.bmp"),
//!     Path::new("I32_black_IR.bmp"),
//!     "Black",
//!     &PipelineConfig::default(),
//! )?;
//! if let Some(classification) = analysis.classification {
//!     println!("{}: {:.3}", classification.pigment, classification.score);
//! }
//! # Ok::<(), pigment_scan::AnalysisError>(())
//! ```

use image::{GrayImage, RgbImage};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, warn};

pub mod color;
pub mod config;
pub mod constants;
pub mod detection;
pub mod error;
pub mod gallery;
pub mod image_loader;
pub mod spectral;

pub use color::{AuxModality, ColorFamily};
pub use config::PipelineConfig;
pub use detection::{extract_patch, PatchSegmenter, SegmentationStages};
pub use error::{AnalysisError, Result};
pub use spectral::{
    Classification, Classifier, MetricsCalculator, PigmentClass, ScorePair, SpectralMetrics,
};

/// Complete analysis of one patch
#[derive(Debug, Clone)]
pub struct PatchAnalysis {
    pub family: ColorFamily,
    /// Binary ink mask over the VIS pixel grid
    pub mask: GrayImage,
    /// Ink pixels on a white background
    pub extracted: RgbImage,
    pub metrics: SpectralMetrics,
    /// `None` when no ink was found or the family's score was not measured
    pub classification: Option<Classification>,
}

/// Serialisable summary of a [`PatchAnalysis`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub family: ColorFamily,
    pub modality: AuxModality,
    pub ink_pixel_count: usize,
    pub ir_score: Option<f64>,
    pub uv_score: Option<f64>,
    /// Prediction label, e.g. "Iron Gall Ink"
    pub prediction: Option<String>,
}

impl PatchAnalysis {
    pub fn report(&self) -> AnalysisReport {
        AnalysisReport {
            family: self.family,
            modality: self.family.aux_modality(),
            ink_pixel_count: self.metrics.ink_pixel_count,
            ir_score: self.metrics.ir_score,
            uv_score: self.metrics.uv_score,
            prediction: self
                .classification
                .map(|c| c.pigment.label().to_string()),
        }
    }
}

/// Run segmentation, scoring and classification on in-memory images
///
/// The auxiliary luminance image is routed to IR or UV according to
/// `family.aux_modality()`.
///
/// # Errors
///
/// Returns `AnalysisError` if the VIS image is empty, the auxiliary image
/// differs in size, or the configuration is invalid.
pub fn analyze_patch(
    vis: &RgbImage,
    aux: Option<&GrayImage>,
    family: ColorFamily,
    config: &PipelineConfig,
) -> Result<PatchAnalysis> {
    config.validate()?;

    let segmenter = PatchSegmenter::with_config(config.segmentation.clone());
    let mask = segmenter.segment(vis, family)?;
    let extracted = extract_patch(vis, &mask)?;

    let (ir, uv) = match family.aux_modality() {
        AuxModality::Ir => (aux, None),
        AuxModality::Uv => (None, aux),
    };
    let metrics = MetricsCalculator::with_config(config.metrics.clone()).compute(vis, ir, uv, &mask)?;

    let classification = match Classifier::with_config(config.classification.clone())
        .classify(family, &metrics)
    {
        Ok(classification) => {
            info!(
                family = %family,
                pigment = %classification.pigment,
                score = classification.score,
                "patch classified"
            );
            Some(classification)
        }
        Err(e) if e.is_recoverable() => {
            warn!(family = %family, "no classification: {}", e);
            None
        }
        Err(e) => return Err(e),
    };

    Ok(PatchAnalysis {
        family,
        mask,
        extracted,
        metrics,
        classification,
    })
}

/// Load a VIS + auxiliary pair from disk and analyse it
///
/// # Arguments
///
/// * `vis_path` - Visible-light photograph
/// * `aux_path` - IR photograph for black/blue, UV photograph for red
/// * `target` - Free-text colour label ("Black", "blue", "red ink", ...)
/// * `config` - Pipeline configuration
pub fn analyze_files(
    vis_path: &Path,
    aux_path: &Path,
    target: &str,
    config: &PipelineConfig,
) -> Result<PatchAnalysis> {
    let family = ColorFamily::from_label(target)?;
    let images = image_loader::load_pair(vis_path, aux_path, family.aux_modality())?;
    analyze_patch(&images.vis, Some(&images.aux.luminance), family, config)
}
