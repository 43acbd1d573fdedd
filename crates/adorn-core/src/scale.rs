//! Millimeter-to-pixel scale calibration.
//!
//! A direct proportion: the accessory's real size relative to the reference
//! feature's known real size, applied to the feature's measured pixel size.
//! Camera distance and zoom cancel out of the ratio, which is the whole
//! reason for detection-based scaling over a fixed pixel size.

use crate::calibration::CategoryProfile;
use crate::types::{AccessoryDimensions, ReferenceMeasurement};

/// Target on-image accessory size in pixels.
#[derive(Debug, Clone, Copy)]
pub struct TargetSize {
    pub width_px: f64,
    pub height_px: f64,
}

/// Compute the accessory's target pixel size.
///
/// Width follows the proportion `pixel_width × (width_mm / reference_mm)`;
/// height preserves the accessory's physical aspect ratio. Inputs are
/// pre-validated: dimensions by the engine, `reference_mm > 0` by
/// calibration validation, `pixel_width > 0` by selection.
pub fn target_size(
    dimensions: AccessoryDimensions,
    measurement: &ReferenceMeasurement,
    profile: &CategoryProfile,
) -> TargetSize {
    let width_px = measurement.pixel_width * (dimensions.width_mm / profile.reference_mm);
    let height_px = width_px * dimensions.aspect_ratio();
    TargetSize { width_px, height_px }
}

/// Millimeters represented by one pixel at the reference measurement.
pub fn mm_per_pixel(measurement: &ReferenceMeasurement, profile: &CategoryProfile) -> f64 {
    profile.reference_mm / measurement.pixel_width
}
