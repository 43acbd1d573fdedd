//! Reference landmark selection.
//!
//! Maps an accessory category to the landmark pair that calibrates its
//! real-world scale. Hand categories carry an ordered fallback list so a
//! partially-occluded hand still yields a usable width estimate; face
//! categories use a fixed triangulation of ear/jaw/chin points and fail
//! outright when it does not resolve, because face-region jewelry cannot
//! be approximated from arbitrary other points.

use crate::calibration::CategoryProfile;
use crate::error::PlacementError;
use crate::types::{AccessoryCategory, LandmarkSet, ReferenceMeasurement};

// --- Face-mesh indices (468-point numbering) ---
const FACE_EAR_TRAGION: usize = 234;
const FACE_EAR_LOBE: usize = 132;
const FACE_JAW_LEFT: usize = 172;
const FACE_JAW_RIGHT: usize = 397;
const FACE_CHIN: usize = 152;

// --- Hand-skeleton indices (21-point numbering) ---
const HAND_INDEX_MCP: usize = 5;
const HAND_INDEX_PIP: usize = 6;
const HAND_MIDDLE_MCP: usize = 9;
const HAND_MIDDLE_PIP: usize = 10;
const HAND_RING_MCP: usize = 13;
const HAND_RING_PIP: usize = 14;
const HAND_PINKY_MCP: usize = 17;

/// One candidate landmark pair spanning the feature to measure.
struct Candidate {
    base: usize,
    mid: usize,
    /// Extra landmark anchoring the placement center. When named, it must
    /// resolve for the candidate to be accepted.
    anchor: Option<usize>,
}

/// Candidate pairs for a category, in fallback priority order.
///
/// Ring tries the true ring finger first, then middle, then index: any
/// visible finger gives an acceptable width estimate. Face categories have
/// exactly one candidate.
fn candidates(category: AccessoryCategory) -> &'static [Candidate] {
    match category {
        AccessoryCategory::Earring => &[Candidate {
            base: FACE_EAR_TRAGION,
            mid: FACE_EAR_LOBE,
            anchor: Some(FACE_EAR_LOBE),
        }],
        AccessoryCategory::Necklace => &[Candidate {
            base: FACE_JAW_LEFT,
            mid: FACE_JAW_RIGHT,
            anchor: Some(FACE_CHIN),
        }],
        AccessoryCategory::Ring => &[
            Candidate { base: HAND_RING_MCP, mid: HAND_RING_PIP, anchor: None },
            Candidate { base: HAND_MIDDLE_MCP, mid: HAND_MIDDLE_PIP, anchor: None },
            Candidate { base: HAND_INDEX_MCP, mid: HAND_INDEX_PIP, anchor: None },
        ],
        AccessoryCategory::Bracelet => &[Candidate {
            base: HAND_INDEX_MCP,
            mid: HAND_PINKY_MCP,
            anchor: None,
        }],
    }
}

/// Select the reference measurement for `category` from `set`.
///
/// Candidates are tried in priority order; the first whose base, mid, and
/// anchor (when named) all resolve to finite in-range points wins. The
/// normalized→pixel conversion happens here, once, through
/// [`LandmarkSet::pixel_point`]; downstream components only see pixel
/// space. The measured width is the horizontal landmark span scaled by the
/// category's span multiplier.
pub fn select_reference(
    set: &LandmarkSet,
    category: AccessoryCategory,
    profile: &CategoryProfile,
) -> Result<ReferenceMeasurement, PlacementError> {
    // Hand indices are meaningless in face space and vice versa; a
    // mismatched set cannot contain the needed anatomy.
    if set.space != category.landmark_space() {
        return Err(PlacementError::MissingAnatomy(category));
    }

    for candidate in candidates(category) {
        let Some(base) = set.pixel_point(candidate.base) else {
            continue;
        };
        let Some(mid) = set.pixel_point(candidate.mid) else {
            continue;
        };
        let anchor = match candidate.anchor {
            Some(index) => match set.pixel_point(index) {
                Some(p) => Some(p),
                None => continue,
            },
            None => None,
        };

        let span = (base.x - mid.x).abs();
        let pixel_width = span * profile.span_scale;
        if pixel_width <= 0.0 {
            // A resolved pair with zero span cannot calibrate anything.
            return Err(PlacementError::DegenerateGeometry(format!(
                "zero-width {category} reference span between landmarks {} and {}",
                candidate.base, candidate.mid
            )));
        }

        let mut source_indices = vec![candidate.base, candidate.mid];
        if let Some(index) = candidate.anchor {
            source_indices.push(index);
        }

        tracing::debug!(
            %category,
            base = candidate.base,
            mid = candidate.mid,
            pixel_width,
            "reference pair selected"
        );

        return Ok(ReferenceMeasurement {
            pixel_width,
            base,
            mid,
            center: base.midpoint(mid),
            anchor,
            source_indices,
        });
    }

    Err(PlacementError::MissingAnatomy(category))
}
