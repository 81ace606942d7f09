//! Rule-based pigment classification from spectral scores

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::color::{AuxModality, ColorFamily};
use crate::config::ClassificationConfig;
use crate::spectral::SpectralMetrics;
use crate::{AnalysisError, Result};

/// Predicted pigment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PigmentClass {
    /// Black ink that turns transparent under IR
    IronGall,
    /// Black ink that stays dark under IR
    Carbon,
    /// Between the iron gall and carbon cutoffs
    MixedOrThick,
    /// Blue that turns transparent under IR (indigo, woad)
    PlantBasedBlue,
    /// Blue that stays dark under IR (azurite)
    MineralBlue,
    /// Red that fluoresces under UV (madder)
    FluorescentRed,
    /// Red without UV fluorescence (vermilion, minium)
    MineralRed,
}

impl PigmentClass {
    pub fn label(&self) -> &'static str {
        match self {
            PigmentClass::IronGall => "Iron Gall Ink",
            PigmentClass::Carbon => "Carbon Ink",
            PigmentClass::MixedOrThick => "Mixed / Thick Ink",
            PigmentClass::PlantBasedBlue => "Plant-based Blue",
            PigmentClass::MineralBlue => "Mineral Blue",
            PigmentClass::FluorescentRed => "Madder (Fluorescent)",
            PigmentClass::MineralRed => "Mineral Red (Non-fluo)",
        }
    }
}

impl fmt::Display for PigmentClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Classification of one patch together with the score that decided it
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub family: ColorFamily,
    pub pigment: PigmentClass,
    /// The IR score for Black/Blue, the UV score for Red
    pub score: f64,
}

impl Classification {
    /// Whether a human hypothesis agrees with the prediction.
    ///
    /// Agreement is substring containment of the hypothesis in the
    /// prediction label, so "Iron Gall Ink" agrees with `IronGall` and
    /// "Unsure" agrees with nothing.
    pub fn agrees_with(&self, hypothesis: &str) -> bool {
        let hypothesis = hypothesis.trim();
        !hypothesis.is_empty() && self.pigment.label().contains(hypothesis)
    }
}

/// Applies the per-family score cutoffs
#[derive(Debug, Clone, Default)]
pub struct Classifier {
    config: ClassificationConfig,
}

impl Classifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ClassificationConfig) -> Self {
        Self { config }
    }

    /// Classify a patch of `family` from its spectral scores
    ///
    /// # Errors
    ///
    /// - `AnalysisError::NoInkDetected` if the mask was empty
    /// - `AnalysisError::MissingMeasurement` if the family's score was not measured
    pub fn classify(&self, family: ColorFamily, metrics: &SpectralMetrics) -> Result<Classification> {
        if !metrics.has_ink() {
            return Err(AnalysisError::NoInkDetected);
        }

        let modality = family.aux_modality();
        let score = match modality {
            AuxModality::Ir => metrics.ir_score,
            AuxModality::Uv => metrics.uv_score,
        }
        .ok_or(AnalysisError::MissingMeasurement { modality })?;

        let cfg = &self.config;
        let pigment = match family {
            ColorFamily::Black if score > cfg.iron_gall_min_ir => PigmentClass::IronGall,
            ColorFamily::Black if score < cfg.carbon_max_ir => PigmentClass::Carbon,
            ColorFamily::Black => PigmentClass::MixedOrThick,
            ColorFamily::Blue if score > cfg.plant_blue_min_ir => PigmentClass::PlantBasedBlue,
            ColorFamily::Blue => PigmentClass::MineralBlue,
            ColorFamily::Red if score > cfg.fluorescent_min_uv => PigmentClass::FluorescentRed,
            ColorFamily::Red => PigmentClass::MineralRed,
        };

        Ok(Classification {
            family,
            pigment,
            score,
        })
    }
}
