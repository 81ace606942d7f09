//! Error types for the pigment_scan library

use std::path::PathBuf;
use thiserror::Error;

use crate::color::AuxModality;

/// Result type alias for pigment_scan operations
pub type Result<T> = std::result::Result<T, AnalysisError>;

/// Comprehensive error types for pigment analysis operations
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// Image file exists but could not be decoded
    #[error("Failed to load image: {message}")]
    ImageLoadError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Image file does not exist
    #[error("Image file not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    /// File extension is not a supported raster format
    #[error("Unsupported image format: {}", path.display())]
    UnsupportedFormat { path: PathBuf },

    /// Image has zero width or height
    #[error("Image is empty ({width}x{height})")]
    EmptyImage { width: u32, height: u32 },

    /// Target label matches none of the supported colour families
    #[error("Unsupported color family: '{label}' (expected red, blue, black or ink)")]
    UnsupportedColorFamily { label: String },

    /// Two images that must be pixel-aligned have different sizes
    #[error("Dimension mismatch for {what}: expected {expected:?}, got {actual:?}")]
    DimensionMismatch {
        what: String,
        expected: (u32, u32),
        actual: (u32, u32),
    },

    /// Segmentation produced no foreground pixels
    #[error("No ink detected in the segmented patch")]
    NoInkDetected,

    /// The score needed for classification was not measured
    #[error("No {modality} measurement available for classification")]
    MissingMeasurement { modality: AuxModality },

    /// Invalid input parameters
    #[error("Invalid parameter: {parameter} = {value}")]
    InvalidParameter { parameter: String, value: String },

    /// Configuration could not be read, parsed or written
    #[error("Configuration error: {message}")]
    ConfigError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl AnalysisError {
    /// Create an image load error with context
    pub fn image_load<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::ImageLoadError {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a configuration error with context
    pub fn config<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::ConfigError {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    pub(crate) fn invalid(parameter: impl Into<String>, value: impl ToString) -> Self {
        Self::InvalidParameter {
            parameter: parameter.into(),
            value: value.to_string(),
        }
    }

    /// Check if this error indicates a recoverable condition
    ///
    /// Recoverable errors stem from the photographed patch rather than from
    /// the inputs themselves; retaking the photo or choosing another sample
    /// can fix them.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            AnalysisError::NoInkDetected | AnalysisError::MissingMeasurement { .. }
        )
    }

    /// Get user-friendly error description for application display
    pub fn user_message(&self) -> String {
        match self {
            AnalysisError::FileNotFound { path } => {
                format!("Could not find '{}'. Please check the file name.", path.display())
            }
            AnalysisError::ImageLoadError { .. } | AnalysisError::UnsupportedFormat { .. } => {
                "Could not read the image. Please check the file format and try again.".to_string()
            }
            AnalysisError::DimensionMismatch { .. } => {
                "The visible and auxiliary images must have the same size.".to_string()
            }
            AnalysisError::UnsupportedColorFamily { .. } => {
                "Please choose Black, Blue or Red as the target color.".to_string()
            }
            AnalysisError::NoInkDetected => {
                "No pigment of the selected color was found. Please check the target color or crop closer to the patch.".to_string()
            }
            AnalysisError::MissingMeasurement { modality } => {
                format!("This color needs a {} image for classification.", modality)
            }
            _ => "Pigment analysis failed. Please try with a different image.".to_string(),
        }
    }
}
