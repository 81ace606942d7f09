//! Ink patch detection module
//!
//! This module isolates the coloured ink patch from the parchment
//! background and returns a binary mask over the source pixel grid.

pub mod patch;
pub mod region;

pub use patch::{extract_patch, PatchSegmenter, SegmentationStages};
