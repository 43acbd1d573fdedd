//! adorn-core — Landmark-to-overlay geometry engine.
//!
//! Turns sparse face/hand landmarks into a physically-calibrated accessory
//! scale and a padded, feathered placement region for a downstream
//! compositor. Landmark detection and pixel compositing live outside this
//! crate; its boundary is the in-process [`PlacementEngine::place`]
//! contract.

pub mod calibration;
pub mod engine;
pub mod error;
pub mod feathering;
pub mod region;
pub mod scale;
pub mod selector;
pub mod types;

pub use calibration::{CalibrationConfig, CategoryProfile, FeatherProfile};
pub use engine::PlacementEngine;
pub use error::PlacementError;
pub use types::{
    AccessoryCategory, AccessoryDimensions, FeatheringSpec, Landmark, LandmarkSet, LandmarkSpace,
    PixelPoint, PixelRect, Placement, PlacementRegion, QualityBucket, QualitySignals,
    ReferenceMeasurement,
};
