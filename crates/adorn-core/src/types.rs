use serde::{Deserialize, Serialize};

/// Index-numbering convention of a landmark set.
///
/// The engine supports two detector index spaces: a face-mesh space
/// (468-point MediaPipe FaceMesh-compatible numbering) and a hand-skeleton
/// space (21-point MediaPipe Hands-compatible numbering). An index is only
/// meaningful together with its space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LandmarkSpace {
    Face,
    Hand,
}

/// A detected anatomical keypoint in normalized [0,1] image coordinates.
///
/// Detectors report occluded points as NaN; those fail resolution at the
/// selection boundary rather than here.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f64,
    pub y: f64,
    /// Optional depth when the detector produces 3-D output. Unused by the
    /// planar geometry; carried through for callers that want it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z: Option<f64>,
}

impl Landmark {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y, z: None }
    }
}

/// One detector pass over one image: normalized points plus the pixel
/// dimensions of the source image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LandmarkSet {
    pub space: LandmarkSpace,
    pub points: Vec<Landmark>,
    pub image_width: u32,
    pub image_height: u32,
}

impl LandmarkSet {
    /// Resolve a landmark index to pixel coordinates.
    ///
    /// The single normalized→pixel boundary: everything downstream of
    /// reference selection works in pixel space only. Returns `None` for
    /// out-of-range indices and for non-finite coordinates.
    pub fn pixel_point(&self, index: usize) -> Option<PixelPoint> {
        let lm = self.points.get(index)?;
        if !lm.x.is_finite() || !lm.y.is_finite() {
            return None;
        }
        Some(PixelPoint {
            x: lm.x * self.image_width as f64,
            y: lm.y * self.image_height as f64,
        })
    }
}

/// A point in pixel coordinates of the source image.
///
/// Distinct from the normalized coordinates inside [`Landmark`] so the two
/// spaces cannot be mixed in one expression.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PixelPoint {
    pub x: f64,
    pub y: f64,
}

impl PixelPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance_to(&self, other: PixelPoint) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Midpoint between this point and another.
    pub fn midpoint(&self, other: PixelPoint) -> PixelPoint {
        PixelPoint {
            x: (self.x + other.x) / 2.0,
            y: (self.y + other.y) / 2.0,
        }
    }
}

/// Axis-aligned rectangle in pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PixelRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl PixelRect {
    /// Tightest rectangle enclosing all `points`. `None` for an empty slice.
    pub fn from_points(points: &[PixelPoint]) -> Option<PixelRect> {
        let first = points.first()?;
        let (mut min_x, mut min_y) = (first.x, first.y);
        let (mut max_x, mut max_y) = (first.x, first.y);
        for p in &points[1..] {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }
        Some(PixelRect {
            x: min_x,
            y: min_y,
            width: max_x - min_x,
            height: max_y - min_y,
        })
    }

    pub fn center(&self) -> PixelPoint {
        PixelPoint {
            x: self.x + self.width / 2.0,
            y: self.y + self.height / 2.0,
        }
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// Corners in clockwise order starting at the top-left.
    pub fn corners(&self) -> [PixelPoint; 4] {
        [
            PixelPoint::new(self.x, self.y),
            PixelPoint::new(self.x + self.width, self.y),
            PixelPoint::new(self.x + self.width, self.y + self.height),
            PixelPoint::new(self.x, self.y + self.height),
        ]
    }

    /// Grow either axis symmetrically about the center until it is at least
    /// `min_width` × `min_height`. Axes already large enough are untouched.
    pub fn expand_to_min_extent(&self, min_width: f64, min_height: f64) -> PixelRect {
        let center = self.center();
        let width = self.width.max(min_width);
        let height = self.height.max(min_height);
        PixelRect {
            x: center.x - width / 2.0,
            y: center.y - height / 2.0,
            width,
            height,
        }
    }
}

/// Accessory category. Drives every per-category constant: reference
/// landmarks, calibration millimeters, padding, and feathering profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessoryCategory {
    Earring,
    Necklace,
    Ring,
    Bracelet,
}

impl AccessoryCategory {
    pub const ALL: [AccessoryCategory; 4] = [
        AccessoryCategory::Earring,
        AccessoryCategory::Necklace,
        AccessoryCategory::Ring,
        AccessoryCategory::Bracelet,
    ];

    /// The landmark space this category measures against.
    pub fn landmark_space(&self) -> LandmarkSpace {
        match self {
            AccessoryCategory::Earring | AccessoryCategory::Necklace => LandmarkSpace::Face,
            AccessoryCategory::Ring | AccessoryCategory::Bracelet => LandmarkSpace::Hand,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            AccessoryCategory::Earring => "earring",
            AccessoryCategory::Necklace => "necklace",
            AccessoryCategory::Ring => "ring",
            AccessoryCategory::Bracelet => "bracelet",
        }
    }
}

impl std::fmt::Display for AccessoryCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for AccessoryCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "earring" => Ok(AccessoryCategory::Earring),
            "necklace" => Ok(AccessoryCategory::Necklace),
            "ring" => Ok(AccessoryCategory::Ring),
            "bracelet" => Ok(AccessoryCategory::Bracelet),
            other => Err(format!(
                "unknown accessory category '{other}' (expected earring, necklace, ring, or bracelet)"
            )),
        }
    }
}

/// Physical size of the accessory artwork, in millimeters.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AccessoryDimensions {
    pub width_mm: f64,
    pub height_mm: f64,
}

impl AccessoryDimensions {
    pub fn new(width_mm: f64, height_mm: f64) -> Self {
        Self { width_mm, height_mm }
    }

    /// Both dimensions must be finite and strictly positive. Checked before
    /// any geometry work begins.
    pub fn validate(&self) -> Result<(), crate::error::PlacementError> {
        let ok = self.width_mm.is_finite()
            && self.height_mm.is_finite()
            && self.width_mm > 0.0
            && self.height_mm > 0.0;
        if ok {
            Ok(())
        } else {
            Err(crate::error::PlacementError::InvalidAccessoryDimensions {
                width_mm: self.width_mm,
                height_mm: self.height_mm,
            })
        }
    }

    /// Height over width. Preserved when converting to pixel sizes.
    pub fn aspect_ratio(&self) -> f64 {
        self.height_mm / self.width_mm
    }
}

/// Pixel-space output of reference selection, consumed immediately by the
/// scale calculator and the region builder. Never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct ReferenceMeasurement {
    /// Calibrated feature width in pixels: raw landmark span × span scale.
    /// Always > 0; a zero span fails selection.
    pub pixel_width: f64,
    /// First landmark of the measured pair.
    pub base: PixelPoint,
    /// Second landmark of the measured pair.
    pub mid: PixelPoint,
    /// Midpoint of `base` and `mid`.
    pub center: PixelPoint,
    /// Extra anchor landmark for face categories (earlobe, chin).
    pub anchor: Option<PixelPoint>,
    /// Landmark indices that produced this measurement, for diagnostics.
    pub source_indices: Vec<usize>,
}

/// The padded, orderable compositing region for one placement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlacementRegion {
    /// Ordered, non-self-intersecting polygon in pixel space (≥ 3 vertices,
    /// positive area).
    pub polygon: Vec<PixelPoint>,
    /// Axis-aligned bounds of `polygon`.
    pub bounding_box: PixelRect,
    /// Absolute padding applied during inflation, in pixels.
    pub padding_px: f64,
    /// The same padding expressed in millimeters via the calibration ratio.
    pub padding_mm_equivalent: f64,
}

/// Radial-gradient parameters an external renderer uses to soften the
/// region edge. Stops are percentages of the gradient radius; the inner
/// stop ends the fully-opaque core, so opacity runs 1.0 → `mid_opacity` →
/// `outer_opacity`, non-increasing.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FeatheringSpec {
    pub inner_stop_pct: f64,
    pub mid_stop_pct: f64,
    pub mid_opacity: f64,
    pub outer_opacity: f64,
    pub blur_radius_px: f64,
}

/// Coarse image-quality bucket derived externally from image statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityBucket {
    Low,
    Medium,
    High,
}

/// Optional per-request quality inputs for feathering and padding nudges.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct QualitySignals {
    pub quality: QualityBucket,
    /// Scene complexity in [0,1]: 0 = flat background, 1 = heavily cluttered.
    pub complexity: f64,
}

/// Full placement output for one request: resize target, compositing
/// center, mask region, and edge feathering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Placement {
    pub target_width_px: f64,
    pub target_height_px: f64,
    pub center: PixelPoint,
    pub region: PlacementRegion,
    pub feathering: FeatheringSpec,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pixel_point_conversion() {
        let set = LandmarkSet {
            space: LandmarkSpace::Face,
            points: vec![Landmark::new(0.5, 0.25)],
            image_width: 640,
            image_height: 480,
        };
        let p = set.pixel_point(0).unwrap();
        assert!((p.x - 320.0).abs() < 1e-9);
        assert!((p.y - 120.0).abs() < 1e-9);
    }

    #[test]
    fn test_pixel_point_out_of_range() {
        let set = LandmarkSet {
            space: LandmarkSpace::Hand,
            points: vec![Landmark::new(0.5, 0.5)],
            image_width: 100,
            image_height: 100,
        };
        assert!(set.pixel_point(1).is_none());
    }

    #[test]
    fn test_pixel_point_non_finite() {
        let set = LandmarkSet {
            space: LandmarkSpace::Hand,
            points: vec![Landmark::new(f64::NAN, 0.5), Landmark::new(0.5, f64::INFINITY)],
            image_width: 100,
            image_height: 100,
        };
        assert!(set.pixel_point(0).is_none());
        assert!(set.pixel_point(1).is_none());
    }

    #[test]
    fn test_distance_and_midpoint() {
        let a = PixelPoint::new(0.0, 0.0);
        let b = PixelPoint::new(3.0, 4.0);
        assert!((a.distance_to(b) - 5.0).abs() < 1e-9);
        let m = a.midpoint(b);
        assert!((m.x - 1.5).abs() < 1e-9);
        assert!((m.y - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_rect_from_points() {
        let pts = [
            PixelPoint::new(10.0, 20.0),
            PixelPoint::new(30.0, 5.0),
            PixelPoint::new(15.0, 25.0),
        ];
        let r = PixelRect::from_points(&pts).unwrap();
        assert!((r.x - 10.0).abs() < 1e-9);
        assert!((r.y - 5.0).abs() < 1e-9);
        assert!((r.width - 20.0).abs() < 1e-9);
        assert!((r.height - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_rect_from_points_empty() {
        assert!(PixelRect::from_points(&[]).is_none());
    }

    #[test]
    fn test_rect_expand_to_min_extent() {
        // Degenerate zero-height rect grows symmetrically about its center.
        let r = PixelRect { x: 0.0, y: 10.0, width: 40.0, height: 0.0 };
        let e = r.expand_to_min_extent(10.0, 10.0);
        assert!((e.width - 40.0).abs() < 1e-9, "wide axis untouched");
        assert!((e.height - 10.0).abs() < 1e-9);
        assert!((e.y - 5.0).abs() < 1e-9, "grown about center y=10");
        let c0 = r.center();
        let c1 = e.center();
        assert!((c0.x - c1.x).abs() < 1e-9);
        assert!((c0.y - c1.y).abs() < 1e-9);
    }

    #[test]
    fn test_rect_corners_ordered() {
        let r = PixelRect { x: 1.0, y: 2.0, width: 3.0, height: 4.0 };
        let c = r.corners();
        assert_eq!(c[0], PixelPoint::new(1.0, 2.0));
        assert_eq!(c[1], PixelPoint::new(4.0, 2.0));
        assert_eq!(c[2], PixelPoint::new(4.0, 6.0));
        assert_eq!(c[3], PixelPoint::new(1.0, 6.0));
    }

    #[test]
    fn test_category_landmark_space() {
        assert_eq!(AccessoryCategory::Earring.landmark_space(), LandmarkSpace::Face);
        assert_eq!(AccessoryCategory::Necklace.landmark_space(), LandmarkSpace::Face);
        assert_eq!(AccessoryCategory::Ring.landmark_space(), LandmarkSpace::Hand);
        assert_eq!(AccessoryCategory::Bracelet.landmark_space(), LandmarkSpace::Hand);
    }

    #[test]
    fn test_category_parse_roundtrip() {
        for category in AccessoryCategory::ALL {
            let parsed: AccessoryCategory = category.to_string().parse().unwrap();
            assert_eq!(parsed, category);
        }
        assert!("tiara".parse::<AccessoryCategory>().is_err());
    }

    #[test]
    fn test_dimensions_validate() {
        assert!(AccessoryDimensions::new(15.0, 30.0).validate().is_ok());
        assert!(AccessoryDimensions::new(0.0, 30.0).validate().is_err());
        assert!(AccessoryDimensions::new(15.0, -1.0).validate().is_err());
        assert!(AccessoryDimensions::new(f64::NAN, 30.0).validate().is_err());
    }

    #[test]
    fn test_dimensions_aspect_ratio() {
        let d = AccessoryDimensions::new(15.0, 30.0);
        assert!((d.aspect_ratio() - 2.0).abs() < 1e-9);
    }
}
