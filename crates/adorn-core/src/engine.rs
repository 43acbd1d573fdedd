//! Placement engine façade.
//!
//! Owns the immutable calibration table and runs the pipeline for one
//! request: reference selection → scale → center/region → feathering.
//! Every step is a pure function over the request inputs, so an engine can
//! be shared across threads and called concurrently without coordination.

use crate::calibration::CalibrationConfig;
use crate::error::PlacementError;
use crate::types::{
    AccessoryCategory, AccessoryDimensions, LandmarkSet, Placement, QualitySignals,
};
use crate::{feathering, region, scale, selector};

/// Landmark-to-overlay geometry engine.
#[derive(Debug, Clone)]
pub struct PlacementEngine {
    calibration: CalibrationConfig,
}

impl PlacementEngine {
    /// Build an engine over a calibration table, validating it up front.
    ///
    /// Fails fast on a bad table so per-request paths never encounter a
    /// configuration error.
    pub fn new(calibration: CalibrationConfig) -> Result<Self, PlacementError> {
        calibration.validate()?;
        tracing::info!("placement engine ready");
        Ok(Self { calibration })
    }

    /// Engine over the canonical calibration table, which always validates.
    pub fn with_defaults() -> Self {
        Self {
            calibration: CalibrationConfig::default(),
        }
    }

    /// The active calibration table.
    pub fn calibration(&self) -> &CalibrationConfig {
        &self.calibration
    }

    /// Compute a full placement for one accessory on one landmark set.
    ///
    /// Dimensions are validated before any geometry work. Errors are
    /// terminal for the request; no partial results are returned.
    pub fn place(
        &self,
        set: &LandmarkSet,
        category: AccessoryCategory,
        dimensions: AccessoryDimensions,
        signals: Option<&QualitySignals>,
    ) -> Result<Placement, PlacementError> {
        dimensions.validate()?;

        let profile = self.calibration.profile(category);
        let measurement = selector::select_reference(set, category, profile)?;
        let target = scale::target_size(dimensions, &measurement, profile);
        let center = region::placement_center(&measurement, category);
        let pad_scale = feathering::padding_scale(signals);
        let placement_region = region::build_region(&measurement, category, profile, pad_scale)?;
        let feathering = feathering::feather(&profile.feather, signals);

        tracing::debug!(
            %category,
            reference_px = measurement.pixel_width,
            target_width_px = target.width_px,
            target_height_px = target.height_px,
            center_x = center.x,
            center_y = center.y,
            padding_px = placement_region.padding_px,
            "placement computed"
        );

        Ok(Placement {
            target_width_px: target.width_px,
            target_height_px: target.height_px,
            center,
            region: placement_region,
            feathering,
        })
    }
}

impl Default for PlacementEngine {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Landmark, LandmarkSpace};

    // Hand-skeleton indices used by the ring/bracelet candidates.
    const INDEX_MCP: usize = 5;
    const INDEX_PIP: usize = 6;
    const RING_MCP: usize = 13;
    const RING_PIP: usize = 14;
    const PINKY_MCP: usize = 17;

    fn hand_set(image_width: u32, image_height: u32) -> LandmarkSet {
        let mut points = vec![Landmark::new(f64::NAN, f64::NAN); 21];
        points[INDEX_MCP] = Landmark::new(0.40, 0.60);
        points[INDEX_PIP] = Landmark::new(0.43, 0.50);
        points[RING_MCP] = Landmark::new(0.52, 0.62);
        points[RING_PIP] = Landmark::new(0.56, 0.52);
        points[PINKY_MCP] = Landmark::new(0.60, 0.65);
        LandmarkSet {
            space: LandmarkSpace::Hand,
            points,
            image_width,
            image_height,
        }
    }

    #[test]
    fn test_place_ring_succeeds() {
        let engine = PlacementEngine::with_defaults();
        let set = hand_set(1000, 800);
        let placement = engine
            .place(&set, AccessoryCategory::Ring, AccessoryDimensions::new(8.0, 8.0), None)
            .unwrap();

        assert!(placement.target_width_px > 0.0);
        assert!(placement.target_height_px > 0.0);
        assert!(placement.region.polygon.len() >= 3);
        assert!(placement.region.bounding_box.area() > 0.0);
    }

    #[test]
    fn test_invalid_dimensions_rejected_first() {
        // Even an empty landmark set never gets inspected when the
        // dimensions are bad.
        let engine = PlacementEngine::with_defaults();
        let set = LandmarkSet {
            space: LandmarkSpace::Hand,
            points: Vec::new(),
            image_width: 100,
            image_height: 100,
        };
        let err = engine
            .place(&set, AccessoryCategory::Ring, AccessoryDimensions::new(0.0, 10.0), None)
            .unwrap_err();
        assert!(matches!(err, PlacementError::InvalidAccessoryDimensions { .. }));
    }

    #[test]
    fn test_bad_calibration_rejected_at_construction() {
        let mut config = CalibrationConfig::default();
        config.earring.reference_mm = -5.0;
        let err = PlacementEngine::new(config).unwrap_err();
        assert!(matches!(err, PlacementError::InvalidCalibration(_)));
    }

    #[test]
    fn test_scale_invariance_under_image_doubling() {
        // Doubling the image dimensions with fixed normalized landmarks
        // must double every pixel-space output.
        let engine = PlacementEngine::with_defaults();
        let dims = AccessoryDimensions::new(8.0, 10.0);

        let small = engine
            .place(&hand_set(1000, 800), AccessoryCategory::Ring, dims, None)
            .unwrap();
        let large = engine
            .place(&hand_set(2000, 1600), AccessoryCategory::Ring, dims, None)
            .unwrap();

        assert!((large.target_width_px - 2.0 * small.target_width_px).abs() < 1e-9);
        assert!((large.target_height_px - 2.0 * small.target_height_px).abs() < 1e-9);
        assert!((large.center.x - 2.0 * small.center.x).abs() < 1e-9);
        assert!((large.center.y - 2.0 * small.center.y).abs() < 1e-9);
        assert_eq!(small.region.polygon.len(), large.region.polygon.len());
        for (s, l) in small.region.polygon.iter().zip(&large.region.polygon) {
            assert!((l.x - 2.0 * s.x).abs() < 1e-9);
            assert!((l.y - 2.0 * s.y).abs() < 1e-9);
        }
    }

    #[test]
    fn test_engine_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PlacementEngine>();
    }
}
