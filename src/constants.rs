//! Default calibration constants for pigment analysis
//!
//! The HSV bounds and score cutoffs below were fitted empirically on a
//! reference set of manuscript photographs (VIS + IR/UV captured on one
//! imaging setup). They are not physical colour boundaries and are only the
//! defaults of [`crate::config::PipelineConfig`]; recalibrate them per setup.

/// HSV threshold bands on the 8-bit scale (H in half-degrees 0..=180, S and V 0..=255).
///
/// Each band is `[lower, upper]`, both inclusive, ordered `[H, S, V]`.
pub mod hsv {
    /// Red straddles the hue origin, so it is split into two bands
    pub const RED_LOW_BAND: ([u8; 3], [u8; 3]) = ([0, 130, 90], [12, 255, 255]);
    pub const RED_HIGH_BAND: ([u8; 3], [u8; 3]) = ([170, 130, 90], [180, 255, 255]);

    /// Blue inks in the reference set read as desaturated grey-blue
    pub const BLUE_BAND: ([u8; 3], [u8; 3]) = ([0, 0, 70], [180, 135, 240]);

    /// Black ink: anything darker than the parchment (which sits above ~200)
    pub const BLACK_BAND: ([u8; 3], [u8; 3]) = ([0, 0, 0], [180, 255, 180]);

    /// Largest hue value on the 8-bit scale
    pub const MAX_HUE: u8 = 180;
}

/// Mask cleanup parameters
pub mod morphology {
    /// Square structuring element side length
    pub const KERNEL_SIZE: u32 = 3;

    /// Erosion passes applied after the region intersection
    pub const BOUNDARY_EROSION_ITERATIONS: u32 = 2;
}

/// Spectral score computation
pub mod metrics {
    /// Guards the contrast ratios against division by zero
    pub const EPSILON: f64 = 1e-5;
}

/// Score cutoffs of the per-family decision rule
pub mod classification {
    /// Black: IR score above this reads as iron gall ink
    pub const IRON_GALL_MIN_IR: f64 = 0.95;

    /// Black: IR score below this reads as carbon ink
    pub const CARBON_MAX_IR: f64 = 0.85;

    /// Blue: IR score above this reads as a plant-based blue
    pub const PLANT_BLUE_MIN_IR: f64 = 0.8;

    /// Red: UV score above this reads as fluorescent (madder)
    pub const FLUORESCENT_MIN_UV: f64 = 0.2;
}

/// ITU-R BT.601 luma weights in 14-bit fixed point (R, G, B)
///
/// `Y = (R*4899 + G*9617 + B*1868 + 2^13) >> 14`, i.e. 0.299/0.587/0.114 rounded.
pub mod luma {
    pub const SHIFT: u32 = 14;
    pub const R_WEIGHT: u32 = 4899;
    pub const G_WEIGHT: u32 = 9617;
    pub const B_WEIGHT: u32 = 1868;
    pub const ROUNDING: u32 = 1 << (SHIFT - 1);
}
