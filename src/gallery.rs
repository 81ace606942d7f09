//! Reference sample gallery
//!
//! The gallery is a directory of reference patches named
//! `<base>_VIS.bmp` plus `<base>_IR.bmp` or `<base>_UV.bmp`, depending on the
//! sample's colour family.

use std::path::{Path, PathBuf};

use crate::color::ColorFamily;
use crate::image_loader::{load_pair, PatchImages};
use crate::Result;

/// One reference sample of the gallery
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DemoSample {
    /// File name stem shared by the VIS and auxiliary images
    pub base_name: &'static str,
    /// Known pigment, as recorded for the manuscript
    pub description: &'static str,
    pub family: ColorFamily,
}

impl DemoSample {
    /// Display name, e.g. "I32_black (Iron Gall)"
    pub fn display_name(&self) -> String {
        format!("{} ({})", self.base_name, self.description)
    }
}

static SAMPLES: [DemoSample; 6] = [
    DemoSample {
        base_name: "I32_black",
        description: "Iron Gall",
        family: ColorFamily::Black,
    },
    DemoSample {
        base_name: "II115_black",
        description: "Carbon-like",
        family: ColorFamily::Black,
    },
    DemoSample {
        base_name: "I32_blue",
        description: "Plant-based",
        family: ColorFamily::Blue,
    },
    DemoSample {
        base_name: "III125_blue",
        description: "Mineral",
        family: ColorFamily::Blue,
    },
    DemoSample {
        base_name: "I32_red",
        description: "Mineral/Cinnabar",
        family: ColorFamily::Red,
    },
    DemoSample {
        base_name: "VII78_red",
        description: "Mineral/Cinnabar",
        family: ColorFamily::Red,
    },
];

/// Reference samples of one colour family
pub fn samples_for(family: ColorFamily) -> impl Iterator<Item = &'static DemoSample> {
    SAMPLES.iter().filter(move |sample| sample.family == family)
}

/// Look a sample up by its base name
pub fn find_sample(base_name: &str) -> Option<&'static DemoSample> {
    SAMPLES.iter().find(|sample| sample.base_name == base_name)
}

/// Gallery rooted at a directory of reference images
#[derive(Debug, Clone)]
pub struct DemoGallery {
    root: PathBuf,
}

impl DemoGallery {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the VIS image of a sample
    pub fn vis_path(&self, sample: &DemoSample) -> PathBuf {
        self.root.join(format!("{}_VIS.bmp", sample.base_name))
    }

    /// Path of the auxiliary image matching the sample's family
    pub fn aux_path(&self, sample: &DemoSample) -> PathBuf {
        let tag = sample.family.aux_modality().tag();
        self.root.join(format!("{}_{}.bmp", sample.base_name, tag))
    }

    /// Load a sample's image pair
    ///
    /// # Errors
    ///
    /// Missing files, undecodable files and mismatched sizes are reported as
    /// distinct `AnalysisError` variants.
    pub fn load(&self, sample: &DemoSample) -> Result<PatchImages> {
        load_pair(
            &self.vis_path(sample),
            &self.aux_path(sample),
            sample.family.aux_modality(),
        )
    }
}
