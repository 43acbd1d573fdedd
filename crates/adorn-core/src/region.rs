//! Placement region construction.
//!
//! Derives the compositing center and the padded mask polygon from a
//! reference measurement. Padding moves every vertex radially outward from
//! the polygon's vertex centroid by a constant absolute pixel amount, so
//! the margin reads uniform regardless of region size — a percentage
//! inflation would over-pad large regions and starve small ones.

use crate::calibration::CategoryProfile;
use crate::error::PlacementError;
use crate::scale;
use crate::types::{
    AccessoryCategory, PixelPoint, PixelRect, PlacementRegion, ReferenceMeasurement,
};

/// Minimum base-box extent per axis, as a fraction of the reference width.
/// A collinear landmark pair would otherwise yield a zero-area box that
/// radial inflation cannot recover.
const MIN_EXTENT_FRAC: f64 = 0.25;

/// Necklace centers drop below the chin by this fraction of the reference
/// width, landing at the base of the neck rather than on the chin itself.
const NECKLACE_DROP_FRAC: f64 = 0.2;

/// A vertex closer to the centroid than this has no usable direction.
const CENTROID_EPSILON: f64 = 1e-9;

/// How a category derives its placement center from the measurement.
enum CenterRule {
    /// Midpoint of the two reference landmarks.
    Midpoint,
    /// The anchor landmark itself.
    Anchor,
    /// The anchor landmark, offset downward by `width_frac` × reference width.
    AnchorBelow { width_frac: f64 },
}

fn center_rule(category: AccessoryCategory) -> CenterRule {
    match category {
        AccessoryCategory::Ring | AccessoryCategory::Bracelet => CenterRule::Midpoint,
        AccessoryCategory::Earring => CenterRule::Anchor,
        AccessoryCategory::Necklace => CenterRule::AnchorBelow { width_frac: NECKLACE_DROP_FRAC },
    }
}

/// Compositing center for the category.
///
/// Anchor rules fall back to the pair midpoint if the measurement carries
/// no anchor; the selector guarantees one for face categories.
pub fn placement_center(
    measurement: &ReferenceMeasurement,
    category: AccessoryCategory,
) -> PixelPoint {
    match center_rule(category) {
        CenterRule::Midpoint => measurement.center,
        CenterRule::Anchor => measurement.anchor.unwrap_or(measurement.center),
        CenterRule::AnchorBelow { width_frac } => {
            let anchor = measurement.anchor.unwrap_or(measurement.center);
            PixelPoint {
                x: anchor.x,
                y: anchor.y + measurement.pixel_width * width_frac,
            }
        }
    }
}

/// Build the padded placement region for the category.
///
/// The base polygon is the axis-aligned bounding box of every resolved
/// reference landmark, held to a minimum extent per axis, then inflated
/// radially. `padding_scale` is the quality nudge from
/// [`feathering::padding_scale`](crate::feathering::padding_scale); pass
/// 1.0 when no signals apply.
pub fn build_region(
    measurement: &ReferenceMeasurement,
    category: AccessoryCategory,
    profile: &CategoryProfile,
    padding_scale: f64,
) -> Result<PlacementRegion, PlacementError> {
    let mut landmarks = vec![measurement.base, measurement.mid];
    if let Some(anchor) = measurement.anchor {
        landmarks.push(anchor);
    }

    let Some(raw_box) = PixelRect::from_points(&landmarks) else {
        return Err(PlacementError::DegenerateGeometry(format!(
            "no reference landmarks to bound for {category}"
        )));
    };

    let min_extent = measurement.pixel_width * MIN_EXTENT_FRAC;
    let base_box = raw_box.expand_to_min_extent(min_extent, min_extent);

    // padding_factor >= 1 converts to a constant absolute pixel amount so
    // inflation stays uniform around the polygon.
    let padding_px = (profile.padding_factor - 1.0) * measurement.pixel_width * padding_scale;
    let polygon = inflate_polygon(&base_box.corners(), padding_px);

    if polygon_area(&polygon) <= 0.0 {
        return Err(PlacementError::DegenerateGeometry(format!(
            "placement polygon for {category} has zero area"
        )));
    }

    let Some(bounding_box) = PixelRect::from_points(&polygon) else {
        return Err(PlacementError::DegenerateGeometry(format!(
            "empty placement polygon for {category}"
        )));
    };

    let padding_mm_equivalent = padding_px * scale::mm_per_pixel(measurement, profile);

    Ok(PlacementRegion {
        polygon,
        bounding_box,
        padding_px,
        padding_mm_equivalent,
    })
}

/// Move every vertex radially outward from the vertex centroid so its
/// centroid distance grows by exactly `padding_px`.
///
/// A vertex coinciding with the centroid has no direction to move along;
/// it is pushed along +x so the result stays finite. Anatomically distinct
/// reference pairs never produce that case, but the guard keeps the
/// function total.
pub fn inflate_polygon(polygon: &[PixelPoint], padding_px: f64) -> Vec<PixelPoint> {
    let Some(centroid) = vertex_centroid(polygon) else {
        return Vec::new();
    };

    polygon
        .iter()
        .map(|v| {
            let dx = v.x - centroid.x;
            let dy = v.y - centroid.y;
            let distance = (dx * dx + dy * dy).sqrt();
            if distance < CENTROID_EPSILON {
                PixelPoint {
                    x: centroid.x + padding_px,
                    y: centroid.y,
                }
            } else {
                let scale = (distance + padding_px) / distance;
                PixelPoint {
                    x: centroid.x + dx * scale,
                    y: centroid.y + dy * scale,
                }
            }
        })
        .collect()
}

/// Average of the polygon's vertices. `None` for an empty polygon.
fn vertex_centroid(polygon: &[PixelPoint]) -> Option<PixelPoint> {
    if polygon.is_empty() {
        return None;
    }
    let n = polygon.len() as f64;
    let (sum_x, sum_y) = polygon
        .iter()
        .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
    Some(PixelPoint {
        x: sum_x / n,
        y: sum_y / n,
    })
}

/// Polygon area via the shoelace formula. Returns the absolute area, so
/// vertex winding does not matter; fewer than three vertices is zero.
pub fn polygon_area(polygon: &[PixelPoint]) -> f64 {
    if polygon.len() < 3 {
        return 0.0;
    }
    let mut twice_area = 0.0;
    for i in 0..polygon.len() {
        let a = polygon[i];
        let b = polygon[(i + 1) % polygon.len()];
        twice_area += a.x * b.y - b.x * a.y;
    }
    (twice_area / 2.0).abs()
}
