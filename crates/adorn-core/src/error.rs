use crate::types::AccessoryCategory;
use thiserror::Error;

/// Failure modes of the placement pipeline.
///
/// All variants are terminal for the request that raised them; the engine
/// performs no internal retries and returns no partial results. Falling back
/// (e.g. to a default centered placement) is the caller's decision.
#[derive(Error, Debug)]
pub enum PlacementError {
    /// No candidate reference pair resolved from the supplied landmarks.
    /// Upstream may re-run detection on a different frame.
    #[error("no usable {0} reference landmarks in the supplied set")]
    MissingAnatomy(AccessoryCategory),

    /// Reference width or polygon area collapsed to zero. Surfaced
    /// immediately, never silently defaulted.
    #[error("degenerate geometry: {0}")]
    DegenerateGeometry(String),

    /// Physical accessory dimensions were non-finite or non-positive.
    /// A caller error, rejected before any geometry work.
    #[error("invalid accessory dimensions {width_mm}mm x {height_mm}mm (must be finite and positive)")]
    InvalidAccessoryDimensions { width_mm: f64, height_mm: f64 },

    /// The calibration table failed validation. Raised at engine
    /// construction only, never per request.
    #[error("invalid calibration: {0}")]
    InvalidCalibration(String),
}
