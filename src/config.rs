//! Configuration structures for the pigment analysis pipeline.
//!
//! All empirically fitted thresholds live here so an imaging setup can be
//! recalibrated without code changes.
//!
//! # Configuration Loading
//!
//! ```no_run
//! use pigment_scan::PipelineConfig;
//! use std::path::Path;
//!
//! // Load from file
//! let config = PipelineConfig::from_json_file(Path::new("config.json"))?;
//!
//! // Or use defaults
//! let config = PipelineConfig::default_manuscript();
//! # Ok::<(), pigment_scan::AnalysisError>(())
//! ```
//!
//! # Configuration Sections
//!
//! - [`SegmentationConfig`]: per-family HSV bands and mask cleanup
//! - [`MetricsConfig`]: spectral score computation
//! - [`ClassificationConfig`]: score cutoffs of the decision rule

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::color::ColorFamily;
use crate::constants::{classification, hsv, metrics, morphology};
use crate::{AnalysisError, Result};

/// Complete pipeline configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Patch segmentation configuration
    pub segmentation: SegmentationConfig,

    /// Spectral metrics configuration
    #[serde(default)]
    pub metrics: MetricsConfig,

    /// Classification cutoffs
    #[serde(default)]
    pub classification: ClassificationConfig,
}

/// Inclusive HSV box on the 8-bit scale (H 0..=180, S and V 0..=255).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HsvRange {
    /// Lower bound `[H, S, V]`
    pub lower: [u8; 3],

    /// Upper bound `[H, S, V]`
    pub upper: [u8; 3],
}

impl HsvRange {
    pub const fn new(lower: [u8; 3], upper: [u8; 3]) -> Self {
        Self { lower, upper }
    }

    /// Whether an HSV triple lies inside the box
    #[inline]
    pub fn contains(&self, hsv: [u8; 3]) -> bool {
        (0..3).all(|i| hsv[i] >= self.lower[i] && hsv[i] <= self.upper[i])
    }
}

impl From<([u8; 3], [u8; 3])> for HsvRange {
    fn from((lower, upper): ([u8; 3], [u8; 3])) -> Self {
        Self::new(lower, upper)
    }
}

/// Threshold rule of one colour family: a pixel matches when any band contains it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FamilyThreshold {
    pub bands: Vec<HsvRange>,
}

impl FamilyThreshold {
    #[inline]
    pub fn matches(&self, hsv: [u8; 3]) -> bool {
        self.bands.iter().any(|band| band.contains(hsv))
    }
}

/// Patch segmentation parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentationConfig {
    /// Red pigment bands
    pub red: FamilyThreshold,

    /// Blue pigment bands
    pub blue: FamilyThreshold,

    /// Black ink bands
    pub black: FamilyThreshold,

    /// Square structuring element size (odd)
    pub morph_kernel_size: u32,

    /// Erosion passes pulling the final boundary inwards
    pub boundary_erosion_iterations: u32,
}

impl SegmentationConfig {
    /// Threshold rule for a colour family
    pub fn threshold(&self, family: ColorFamily) -> &FamilyThreshold {
        match family {
            ColorFamily::Red => &self.red,
            ColorFamily::Blue => &self.blue,
            ColorFamily::Black => &self.black,
        }
    }

    /// Radius of the structuring element
    pub fn kernel_radius(&self) -> u8 {
        (self.morph_kernel_size / 2).min(u8::MAX as u32) as u8
    }
}

impl Default for SegmentationConfig {
    fn default() -> Self {
        Self {
            red: FamilyThreshold {
                bands: vec![hsv::RED_LOW_BAND.into(), hsv::RED_HIGH_BAND.into()],
            },
            blue: FamilyThreshold {
                bands: vec![hsv::BLUE_BAND.into()],
            },
            black: FamilyThreshold {
                bands: vec![hsv::BLACK_BAND.into()],
            },
            morph_kernel_size: morphology::KERNEL_SIZE,
            boundary_erosion_iterations: morphology::BOUNDARY_EROSION_ITERATIONS,
        }
    }
}

/// Spectral metrics parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsConfig {
    /// Added to contrast denominators
    pub epsilon: f64,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            epsilon: metrics::EPSILON,
        }
    }
}

/// Score cutoffs of the per-family decision rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationConfig {
    /// Black: IR score strictly above this → iron gall
    pub iron_gall_min_ir: f64,

    /// Black: IR score strictly below this → carbon
    pub carbon_max_ir: f64,

    /// Blue: IR score strictly above this → plant-based
    pub plant_blue_min_ir: f64,

    /// Red: UV score strictly above this → fluorescent
    pub fluorescent_min_uv: f64,
}

impl Default for ClassificationConfig {
    fn default() -> Self {
        Self {
            iron_gall_min_ir: classification::IRON_GALL_MIN_IR,
            carbon_max_ir: classification::CARBON_MAX_IR,
            plant_blue_min_ir: classification::PLANT_BLUE_MIN_IR,
            fluorescent_min_uv: classification::FLUORESCENT_MIN_UV,
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self::default_manuscript()
    }
}

impl PipelineConfig {
    /// Create the default configuration fitted on the reference manuscript set
    pub fn default_manuscript() -> Self {
        Self {
            segmentation: SegmentationConfig::default(),
            metrics: MetricsConfig::default(),
            classification: ClassificationConfig::default(),
        }
    }

    /// Check parameter consistency
    pub fn validate(&self) -> Result<()> {
        let seg = &self.segmentation;
        if seg.morph_kernel_size == 0 || seg.morph_kernel_size % 2 == 0 {
            return Err(AnalysisError::invalid(
                "segmentation.morph_kernel_size",
                seg.morph_kernel_size,
            ));
        }

        for family in ColorFamily::ALL {
            let threshold = seg.threshold(family);
            if threshold.bands.is_empty() {
                return Err(AnalysisError::invalid(
                    format!("segmentation.{}.bands", family.name()),
                    "[]",
                ));
            }
            for band in &threshold.bands {
                let ordered = (0..3).all(|i| band.lower[i] <= band.upper[i]);
                if !ordered || band.upper[0] > hsv::MAX_HUE {
                    return Err(AnalysisError::invalid(
                        format!("segmentation.{}.bands", family.name()),
                        format!("{:?}..={:?}", band.lower, band.upper),
                    ));
                }
            }
        }

        if !(self.metrics.epsilon > 0.0) {
            return Err(AnalysisError::invalid("metrics.epsilon", self.metrics.epsilon));
        }

        let cls = &self.classification;
        if cls.carbon_max_ir > cls.iron_gall_min_ir {
            return Err(AnalysisError::invalid(
                "classification.carbon_max_ir",
                format!("{} > iron_gall_min_ir {}", cls.carbon_max_ir, cls.iron_gall_min_ir),
            ));
        }

        Ok(())
    }

    /// Load and validate configuration from a JSON file
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| AnalysisError::config(format!("cannot read {}", path.display()), e))?;
        let config: Self = serde_json::from_str(&content)
            .map_err(|e| AnalysisError::config(format!("cannot parse {}", path.display()), e))?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a JSON file
    pub fn to_json_file(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| AnalysisError::config("cannot serialize configuration", e))?;
        std::fs::write(path, json)
            .map_err(|e| AnalysisError::config(format!("cannot write {}", path.display()), e))?;
        Ok(())
    }
}
