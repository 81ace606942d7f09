//! Pigment colour families and their auxiliary imaging modality

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::{AnalysisError, Result};

/// Colour family of the patch being analysed.
///
/// Determines the segmentation threshold rule, which auxiliary image is
/// meaningful and which decision rule applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColorFamily {
    Red,
    Blue,
    Black,
}

/// Auxiliary imaging modality paired with a VIS photograph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AuxModality {
    /// Infrared: tests whether ink stays opaque outside the visible spectrum
    Ir,
    /// Ultraviolet: tests for fluorescence
    Uv,
}

/// Ordered keyword table for free-text labels; first match wins.
const LABEL_KEYWORDS: [(&str, ColorFamily); 4] = [
    ("red", ColorFamily::Red),
    ("blue", ColorFamily::Blue),
    ("black", ColorFamily::Black),
    ("ink", ColorFamily::Black),
];

impl ColorFamily {
    pub const ALL: [ColorFamily; 3] = [ColorFamily::Red, ColorFamily::Blue, ColorFamily::Black];

    /// Resolve a free-text target label such as "Black" or "red pigment".
    ///
    /// Matching is a case-insensitive substring search over a fixed keyword
    /// table (`red`, `blue`, `black`, and `ink` as a synonym for black).
    pub fn from_label(label: &str) -> Result<Self> {
        let lowered = label.to_lowercase();
        LABEL_KEYWORDS
            .iter()
            .find(|(keyword, _)| lowered.contains(keyword))
            .map(|&(_, family)| family)
            .ok_or_else(|| AnalysisError::UnsupportedColorFamily {
                label: label.to_string(),
            })
    }

    /// Lowercase identifier, as used in configuration keys
    pub fn name(&self) -> &'static str {
        match self {
            ColorFamily::Red => "red",
            ColorFamily::Blue => "blue",
            ColorFamily::Black => "black",
        }
    }

    /// Auxiliary image this family is classified from
    pub fn aux_modality(&self) -> AuxModality {
        match self {
            ColorFamily::Red => AuxModality::Uv,
            ColorFamily::Blue | ColorFamily::Black => AuxModality::Ir,
        }
    }

    /// Hypotheses offered to a human inspector before the automatic analysis
    pub fn hypothesis_options(&self) -> &'static [&'static str] {
        match self {
            ColorFamily::Black => &["Iron Gall Ink", "Carbon Ink", "Unsure"],
            ColorFamily::Blue => &["Mineral Blue", "Plant-based Blue", "Unsure"],
            ColorFamily::Red => &["Madder (Fluorescent)", "Mineral Red (Non-fluo)", "Unsure"],
        }
    }
}

impl FromStr for ColorFamily {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_label(s)
    }
}

impl fmt::Display for ColorFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ColorFamily::Red => "Red",
            ColorFamily::Blue => "Blue",
            ColorFamily::Black => "Black",
        };
        f.write_str(name)
    }
}

impl AuxModality {
    /// File-name tag of the modality (`IR` / `UV`)
    pub fn tag(&self) -> &'static str {
        match self {
            AuxModality::Ir => "IR",
            AuxModality::Uv => "UV",
        }
    }
}

impl fmt::Display for AuxModality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_label_case_insensitive() {
        assert_eq!(ColorFamily::from_label("Black").unwrap(), ColorFamily::Black);
        assert_eq!(ColorFamily::from_label("BLUE").unwrap(), ColorFamily::Blue);
        assert_eq!(ColorFamily::from_label("red").unwrap(), ColorFamily::Red);
    }

    #[test]
    fn test_ink_is_black_synonym() {
        assert_eq!(ColorFamily::from_label("Ink").unwrap(), ColorFamily::Black);
        assert_eq!("iron gall ink".parse::<ColorFamily>().unwrap(), ColorFamily::Black);
    }

    #[test]
    fn test_substring_labels() {
        assert_eq!(ColorFamily::from_label("Blueish").unwrap(), ColorFamily::Blue);
        assert_eq!(ColorFamily::from_label("I32_red").unwrap(), ColorFamily::Red);
    }

    #[test]
    fn test_keyword_order_red_first() {
        // "red" is checked before "ink"
        assert_eq!(ColorFamily::from_label("red ink").unwrap(), ColorFamily::Red);
    }

    #[test]
    fn test_unsupported_label() {
        let err = ColorFamily::from_label("green").unwrap_err();
        match err {
            AnalysisError::UnsupportedColorFamily { label } => assert_eq!(label, "green"),
            other => panic!("Expected UnsupportedColorFamily, got: {:?}", other),
        }
    }

    #[test]
    fn test_aux_modality() {
        assert_eq!(ColorFamily::Red.aux_modality(), AuxModality::Uv);
        assert_eq!(ColorFamily::Blue.aux_modality(), AuxModality::Ir);
        assert_eq!(ColorFamily::Black.aux_modality(), AuxModality::Ir);
        assert_eq!(AuxModality::Uv.to_string(), "UV");
    }

    #[test]
    fn test_hypothesis_options_end_with_unsure() {
        for family in ColorFamily::ALL {
            let options = family.hypothesis_options();
            assert_eq!(options.len(), 3);
            assert_eq!(options[2], "Unsure");
        }
    }
}
