//! Mask edge feathering parameters.
//!
//! Emits the radial-gradient profile an external renderer turns into an
//! alpha mask. Each category starts from its calibrated base profile;
//! coarse quality signals, when the caller supplies them, nudge the
//! gradient and the region padding deterministically. Higher scene
//! complexity widens the soft band so cluttered backgrounds hide the
//! blend edge; low capture quality narrows it so compression artifacts at
//! the seam are not amplified.

use crate::calibration::FeatherProfile;
use crate::types::{FeatheringSpec, QualityBucket, QualitySignals};

// --- Quality nudge factors ---

/// Region padding grows up to this fraction at full complexity.
const COMPLEXITY_PADDING_GAIN: f64 = 0.3;
/// Blur radius grows up to this fraction at full complexity.
const COMPLEXITY_BLUR_GAIN: f64 = 0.5;
/// The opaque core starts this many percentage points earlier at full
/// complexity, widening the soft band.
const COMPLEXITY_INNER_STOP_SHIFT: f64 = 10.0;
/// Outer opacity fades toward zero with complexity at this rate, so busy
/// backgrounds get a fuller fade-out.
const COMPLEXITY_OUTER_FADE: f64 = 0.5;
/// Padding multiplier under low capture quality.
const LOW_QUALITY_PADDING_SCALE: f64 = 0.85;
/// Blur multiplier under low capture quality.
const LOW_QUALITY_BLUR_SCALE: f64 = 0.75;

/// Region padding multiplier derived from quality signals.
///
/// 1.0 when no signals are supplied. Complexity widens padding up to +30%;
/// low quality scales it back down.
pub fn padding_scale(signals: Option<&QualitySignals>) -> f64 {
    let Some(s) = signals else {
        return 1.0;
    };
    let complexity = s.complexity.clamp(0.0, 1.0);
    let mut scale = 1.0 + complexity * COMPLEXITY_PADDING_GAIN;
    if s.quality == QualityBucket::Low {
        scale *= LOW_QUALITY_PADDING_SCALE;
    }
    scale
}

/// Emit the feathering spec for a category profile, optionally nudged by
/// quality signals.
///
/// Deterministic: equal inputs always produce equal specs, and nothing is
/// cached across categories. The opacity run stays non-increasing from the
/// implicit inner 1.0 through mid to outer under every nudge combination.
pub fn feather(profile: &FeatherProfile, signals: Option<&QualitySignals>) -> FeatheringSpec {
    let mut spec = FeatheringSpec {
        inner_stop_pct: profile.inner_stop_pct,
        mid_stop_pct: profile.mid_stop_pct,
        mid_opacity: profile.mid_opacity,
        outer_opacity: profile.outer_opacity,
        blur_radius_px: profile.blur_radius_px,
    };

    let Some(s) = signals else {
        return spec;
    };

    let complexity = s.complexity.clamp(0.0, 1.0);
    spec.inner_stop_pct = (profile.inner_stop_pct - complexity * COMPLEXITY_INNER_STOP_SHIFT)
        .clamp(0.0, profile.inner_stop_pct);
    spec.outer_opacity = profile.outer_opacity * (1.0 - complexity * COMPLEXITY_OUTER_FADE);
    spec.blur_radius_px = profile.blur_radius_px * (1.0 + complexity * COMPLEXITY_BLUR_GAIN);

    if s.quality == QualityBucket::Low {
        spec.blur_radius_px *= LOW_QUALITY_BLUR_SCALE;
    }

    // Nudges only lower outer opacity, but clamp anyway so the monotonic
    // invariant survives any future profile values.
    spec.mid_opacity = spec.mid_opacity.clamp(spec.outer_opacity, 1.0);
    spec
}
