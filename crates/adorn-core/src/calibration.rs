//! Per-category calibration profiles.
//!
//! One immutable table holds everything that varies by accessory category:
//! the real-world size of the anatomical reference feature, the empirical
//! span multiplier, region padding, and the feathering gradient. The table
//! is validated once at engine construction and never mutated afterwards,
//! so concurrent placements read it without synchronization.

use crate::error::PlacementError;
use crate::types::AccessoryCategory;
use serde::{Deserialize, Serialize};

// --- Anatomical reference constants (millimeters) ---
// Adult averages used to calibrate real-world scale against the measured
// landmark span. Empirical; re-validate against anthropometric survey data
// before trusting them for tight-tolerance rendering.

/// Average adult earlobe width.
const EARLOBE_WIDTH_MM: f64 = 15.0;
/// Average adult bigonial (jaw corner to jaw corner) width.
const BIGONIAL_WIDTH_MM: f64 = 110.0;
/// Average adult ring-finger circumference-equivalent width.
const FINGER_CIRCUMFERENCE_MM: f64 = 57.0;
/// Average adult index-to-pinky knuckle (MCP) span.
const MCP_SPAN_MM: f64 = 80.0;

// --- Span multipliers ---
// Scale a raw landmark span up to the feature the reference constant
// describes. Empirical averages; same caveat as above.

/// Ear landmark span → full lobe width.
const EAR_SPAN_SCALE: f64 = 1.2;
/// Single finger joint span → circumference-equivalent width.
const FINGER_SPAN_SCALE: f64 = 2.5;

/// Radial-gradient feathering profile for one category.
///
/// `inner_stop_pct` ends the fully-opaque core; opacity then steps down to
/// `mid_opacity` at `mid_stop_pct` and to `outer_opacity` at the gradient
/// edge. Validation enforces `0 < inner < mid <= 100` and a non-increasing
/// opacity run `1.0 >= mid >= outer`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FeatherProfile {
    pub inner_stop_pct: f64,
    pub mid_stop_pct: f64,
    pub mid_opacity: f64,
    pub outer_opacity: f64,
    pub blur_radius_px: f64,
}

/// Calibration data for one accessory category.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CategoryProfile {
    /// Real-world size of the anatomical reference feature, in millimeters.
    pub reference_mm: f64,
    /// Multiplier from raw landmark span to feature width.
    pub span_scale: f64,
    /// Multiplicative region padding (>= 1). 1.0 means no padding; larger
    /// values widen the placement region around the reference box.
    pub padding_factor: f64,
    pub feather: FeatherProfile,
}

impl CategoryProfile {
    /// Canonical earring profile: scale against the earlobe, minimal drape.
    pub fn earring() -> Self {
        Self {
            reference_mm: EARLOBE_WIDTH_MM,
            span_scale: EAR_SPAN_SCALE,
            padding_factor: 1.25,
            feather: FeatherProfile {
                inner_stop_pct: 65.0,
                mid_stop_pct: 82.0,
                mid_opacity: 0.85,
                outer_opacity: 0.15,
                blur_radius_px: 8.0,
            },
        }
    }

    /// Canonical necklace profile: widest padding and the softest gradient,
    /// because chain drape extends well past the jaw landmarks.
    pub fn necklace() -> Self {
        Self {
            reference_mm: BIGONIAL_WIDTH_MM,
            span_scale: 1.0,
            padding_factor: 1.6,
            feather: FeatherProfile {
                inner_stop_pct: 50.0,
                mid_stop_pct: 75.0,
                mid_opacity: 0.75,
                outer_opacity: 0.0,
                blur_radius_px: 16.0,
            },
        }
    }

    /// Canonical ring profile: tightest padding and gradient, to avoid
    /// covering visible finger skin.
    pub fn ring() -> Self {
        Self {
            reference_mm: FINGER_CIRCUMFERENCE_MM,
            span_scale: FINGER_SPAN_SCALE,
            padding_factor: 1.1,
            feather: FeatherProfile {
                inner_stop_pct: 75.0,
                mid_stop_pct: 88.0,
                mid_opacity: 0.9,
                outer_opacity: 0.25,
                blur_radius_px: 4.0,
            },
        }
    }

    /// Canonical bracelet profile: scale against the knuckle span.
    pub fn bracelet() -> Self {
        Self {
            reference_mm: MCP_SPAN_MM,
            span_scale: 1.0,
            padding_factor: 1.35,
            feather: FeatherProfile {
                inner_stop_pct: 60.0,
                mid_stop_pct: 80.0,
                mid_opacity: 0.8,
                outer_opacity: 0.1,
                blur_radius_px: 10.0,
            },
        }
    }

    fn validate(&self, category: AccessoryCategory) -> Result<(), PlacementError> {
        let fail = |what: &str| {
            Err(PlacementError::InvalidCalibration(format!("{category}: {what}")))
        };

        if !(self.reference_mm.is_finite() && self.reference_mm > 0.0) {
            return fail("reference_mm must be finite and positive");
        }
        if !(self.span_scale.is_finite() && self.span_scale > 0.0) {
            return fail("span_scale must be finite and positive");
        }
        if !(self.padding_factor.is_finite() && self.padding_factor >= 1.0) {
            return fail("padding_factor must be >= 1");
        }

        let f = &self.feather;
        let stops_ok = f.inner_stop_pct > 0.0
            && f.inner_stop_pct < f.mid_stop_pct
            && f.mid_stop_pct <= 100.0;
        if !stops_ok {
            return fail("feather stops must satisfy 0 < inner < mid <= 100");
        }
        let opacity_ok = (0.0..=1.0).contains(&f.mid_opacity)
            && (0.0..=1.0).contains(&f.outer_opacity)
            && f.mid_opacity >= f.outer_opacity;
        if !opacity_ok {
            return fail("feather opacities must be in [0,1] and non-increasing inner to outer");
        }
        if !(f.blur_radius_px.is_finite() && f.blur_radius_px >= 0.0) {
            return fail("feather blur_radius_px must be finite and non-negative");
        }
        Ok(())
    }
}

/// Immutable calibration table, one profile per category.
///
/// Deserializes from TOML for operator overrides; a category section that
/// is present must be complete, and omitted categories keep the canonical
/// profile. [`PlacementEngine::new`](crate::engine::PlacementEngine::new)
/// validates the table once and fails fast, so per-request code never sees
/// a configuration error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalibrationConfig {
    #[serde(default = "CategoryProfile::earring")]
    pub earring: CategoryProfile,
    #[serde(default = "CategoryProfile::necklace")]
    pub necklace: CategoryProfile,
    #[serde(default = "CategoryProfile::ring")]
    pub ring: CategoryProfile,
    #[serde(default = "CategoryProfile::bracelet")]
    pub bracelet: CategoryProfile,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            earring: CategoryProfile::earring(),
            necklace: CategoryProfile::necklace(),
            ring: CategoryProfile::ring(),
            bracelet: CategoryProfile::bracelet(),
        }
    }
}

impl CalibrationConfig {
    /// Parse a TOML override file.
    pub fn from_toml_str(text: &str) -> Result<Self, PlacementError> {
        toml::from_str(text).map_err(|e| PlacementError::InvalidCalibration(e.to_string()))
    }

    /// Profile for a category.
    pub fn profile(&self, category: AccessoryCategory) -> &CategoryProfile {
        match category {
            AccessoryCategory::Earring => &self.earring,
            AccessoryCategory::Necklace => &self.necklace,
            AccessoryCategory::Ring => &self.ring,
            AccessoryCategory::Bracelet => &self.bracelet,
        }
    }

    /// Check every profile. Errors name the offending category and field.
    pub fn validate(&self) -> Result<(), PlacementError> {
        for category in AccessoryCategory::ALL {
            self.profile(category).validate(category)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table_validates() {
        assert!(CalibrationConfig::default().validate().is_ok());
    }

    #[test]
    fn test_zero_reference_mm_rejected() {
        let mut config = CalibrationConfig::default();
        config.ring.reference_mm = 0.0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("ring"), "error names the category: {err}");
    }

    #[test]
    fn test_padding_factor_below_one_rejected() {
        let mut config = CalibrationConfig::default();
        config.necklace.padding_factor = 0.9;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_non_monotonic_opacity_rejected() {
        let mut config = CalibrationConfig::default();
        config.earring.feather.mid_opacity = 0.2;
        config.earring.feather.outer_opacity = 0.8;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_inverted_stops_rejected() {
        let mut config = CalibrationConfig::default();
        config.bracelet.feather.inner_stop_pct = 90.0;
        config.bracelet.feather.mid_stop_pct = 70.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_partial_override() {
        let text = r#"
            [earring]
            reference_mm = 18.0
            span_scale = 1.2
            padding_factor = 1.3

            [earring.feather]
            inner_stop_pct = 65.0
            mid_stop_pct = 82.0
            mid_opacity = 0.85
            outer_opacity = 0.15
            blur_radius_px = 8.0
        "#;
        let config = CalibrationConfig::from_toml_str(text).unwrap();
        assert!((config.earring.reference_mm - 18.0).abs() < 1e-9);
        // Omitted categories keep canonical values.
        assert!((config.ring.reference_mm - 57.0).abs() < 1e-9);
        assert!((config.necklace.padding_factor - 1.6).abs() < 1e-9);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_toml_garbage_rejected() {
        let err = CalibrationConfig::from_toml_str("[earring]\nreference_mm = \"wide\"").unwrap_err();
        assert!(matches!(err, PlacementError::InvalidCalibration(_)));
    }

    #[test]
    fn test_canonical_values() {
        let config = CalibrationConfig::default();
        assert!((config.earring.reference_mm - 15.0).abs() < 1e-9);
        assert!((config.earring.span_scale - 1.2).abs() < 1e-9);
        assert!((config.ring.span_scale - 2.5).abs() < 1e-9);
        assert!((config.necklace.span_scale - 1.0).abs() < 1e-9);
        assert!((config.bracelet.span_scale - 1.0).abs() < 1e-9);
    }
}
