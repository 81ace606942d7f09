//! Image loading for VIS and auxiliary photographs
//!
//! VIS images are decoded to RGB. Auxiliary (IR/UV) images are decoded in
//! colour as well; the colour copy is kept for display and a BT.601
//! luminance copy is used for scoring.
//!
//! ## Supported Formats
//!
//! JPEG, PNG, BMP, TIFF, GIF (first frame), WebP, PNM, TGA and QOI via the
//! `image` crate.
//!
//! ## Errors
//!
//! Loading distinguishes a missing file ([`AnalysisError::FileNotFound`]),
//! an unknown extension ([`AnalysisError::UnsupportedFormat`]), a file that
//! cannot be decoded ([`AnalysisError::ImageLoadError`]) and, for pairs, a
//! size mismatch ([`AnalysisError::DimensionMismatch`]).

use image::{DynamicImage, GrayImage, ImageReader, RgbImage};
use std::io::Cursor;
use std::path::Path;
use tracing::debug;

use crate::color::{to_luminance, AuxModality};
use crate::error::{AnalysisError, Result};

/// Supported image formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Jpeg,
    Png,
    Bmp,
    Tiff,
    /// First frame only
    Gif,
    WebP,
    /// PBM, PGM, PPM
    Pnm,
    Tga,
    Qoi,
}

impl ImageFormat {
    /// Detect format from file extension
    pub fn from_extension(path: &Path) -> Option<ImageFormat> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "jpg" | "jpeg" => Some(ImageFormat::Jpeg),
            "png" => Some(ImageFormat::Png),
            "bmp" => Some(ImageFormat::Bmp),
            "tiff" | "tif" => Some(ImageFormat::Tiff),
            "gif" => Some(ImageFormat::Gif),
            "webp" => Some(ImageFormat::WebP),
            "pbm" | "pgm" | "ppm" | "pnm" => Some(ImageFormat::Pnm),
            "tga" => Some(ImageFormat::Tga),
            "qoi" => Some(ImageFormat::Qoi),
            _ => None,
        }
    }
}

/// Auxiliary photograph in both representations
#[derive(Debug, Clone)]
pub struct AuxImage {
    /// Colour decode, for display
    pub display: RgbImage,
    /// Luminance, for scoring
    pub luminance: GrayImage,
}

impl AuxImage {
    pub fn from_rgb(display: RgbImage) -> Self {
        let luminance = to_luminance(&display);
        Self { display, luminance }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.display.dimensions()
    }
}

/// A pixel-aligned VIS + auxiliary pair
#[derive(Debug, Clone)]
pub struct PatchImages {
    pub vis: RgbImage,
    pub aux: AuxImage,
    pub modality: AuxModality,
}

impl PatchImages {
    /// Pair two images, checking that they are the same size
    pub fn new(vis: RgbImage, aux: AuxImage, modality: AuxModality) -> Result<Self> {
        if vis.dimensions() != aux.dimensions() {
            return Err(AnalysisError::DimensionMismatch {
                what: format!("{} image", modality),
                expected: vis.dimensions(),
                actual: aux.dimensions(),
            });
        }
        Ok(Self { vis, aux, modality })
    }
}

/// Load an image from disk as RGB
///
/// # Errors
///
/// - `AnalysisError::FileNotFound` if nothing exists at `path`
/// - `AnalysisError::UnsupportedFormat` for unknown extensions
/// - `AnalysisError::ImageLoadError` if the file cannot be opened or decoded
///
/// # Example
///
/// ```rust,no_run
/// use pigment_scan::image_loader::load_rgb;
/// use std::path::Path;
///
/// let vis = load_rgb(Path::new("I32_black_VIS.bmp"))?;
/// println!("Loaded image: {}x{}", vis.width(), vis.height());
/// # Ok::<(), pigment_scan::AnalysisError>(())
/// ```
pub fn load_rgb(path: &Path) -> Result<RgbImage> {
    if !path.is_file() {
        return Err(AnalysisError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    if ImageFormat::from_extension(path).is_none() {
        return Err(AnalysisError::UnsupportedFormat {
            path: path.to_path_buf(),
        });
    }

    let reader = ImageReader::open(path).map_err(|e| {
        AnalysisError::image_load(format!("Failed to open image file: {}", path.display()), e)
    })?;
    let reader = reader.with_guessed_format().map_err(|e| {
        AnalysisError::image_load(format!("Failed to read image file: {}", path.display()), e)
    })?;
    let img: DynamicImage = reader.decode().map_err(|e| {
        AnalysisError::image_load(format!("Failed to decode image: {}", path.display()), e)
    })?;

    let rgb = img.to_rgb8();
    debug!(path = %path.display(), width = rgb.width(), height = rgb.height(), "image loaded");
    Ok(rgb)
}

/// Decode an in-memory encoded image (e.g. an upload) as RGB
pub fn load_rgb_from_bytes(bytes: &[u8]) -> Result<RgbImage> {
    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| AnalysisError::image_load("Failed to read image bytes", e))?;
    let img = reader
        .decode()
        .map_err(|e| AnalysisError::image_load("Failed to decode image bytes", e))?;
    Ok(img.to_rgb8())
}

/// Load an auxiliary IR/UV image from disk
pub fn load_aux(path: &Path) -> Result<AuxImage> {
    load_rgb(path).map(AuxImage::from_rgb)
}

/// Decode an in-memory auxiliary image
pub fn load_aux_from_bytes(bytes: &[u8]) -> Result<AuxImage> {
    load_rgb_from_bytes(bytes).map(AuxImage::from_rgb)
}

/// Load a VIS + auxiliary pair and check their registration size
pub fn load_pair(vis_path: &Path, aux_path: &Path, modality: AuxModality) -> Result<PatchImages> {
    let vis = load_rgb(vis_path)?;
    let aux = load_aux(aux_path)?;
    PatchImages::new(vis, aux, modality)
}

/// Get list of all supported file extensions
pub fn supported_extensions() -> &'static [&'static str] {
    &[
        "jpg", "jpeg", "png", "bmp", "tiff", "tif", "gif", "webp", "pbm", "pgm", "ppm", "pnm",
        "tga", "qoi",
    ]
}

/// Check if a file extension is supported
pub fn is_supported_extension(ext: &str) -> bool {
    let ext_lower = ext.to_lowercase();
    supported_extensions().contains(&ext_lower.as_str())
}
