// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Hole merging for hole-unaware triangulators
//!
//! A polygon with holes is reduced to one simple loop by splicing every
//! hole into the outer boundary through a bridge between the closest pair
//! of points. Each bridge is walked there and back, so the merged loop
//! covers exactly the original region.

use crate::error::{Error, Result};
use crate::polygon::compute_signed_area;
use nalgebra::Point2;

/// Merge `holes` into `outer` and return a single simple loop.
///
/// The outer loop is made counter-clockwise and holes clockwise before
/// merging. Holes are spliced in order of proximity: at each step the
/// globally closest (outer point, hole point) pair whose bridge crosses no
/// existing edge wins, ties going to the first pair found. The outer point used by the previous bridge is never
/// used again, so two bridges cannot start from the same vertex.
///
/// The result holds `outer.len() + Σ (hole.len() + 2)` points: each hole
/// adds its own points plus the duplicated hole and outer bridge ends.
/// A bridge is inserted even when a hole touches the outer loop.
///
/// Holes with fewer than 3 points are ignored. An outer loop with fewer
/// than 3 points is a caller error.
pub fn flatten_with_holes(
    outer: &[Point2<f64>],
    holes: &[Vec<Point2<f64>>],
) -> Result<Vec<Point2<f64>>> {
    if outer.len() < 3 {
        return Err(Error::InvalidArgument(format!(
            "outer loop needs at least 3 points, got {}",
            outer.len()
        )));
    }

    let mut merged = outer.to_vec();
    if compute_signed_area(&merged) < 0.0 {
        merged.reverse();
    }

    let mut pending: Vec<Vec<Point2<f64>>> = holes
        .iter()
        .filter(|hole| hole.len() >= 3)
        .map(|hole| {
            let mut hole = hole.clone();
            if compute_signed_area(&hole) > 0.0 {
                hole.reverse();
            }
            hole
        })
        .collect();

    merged.reserve(pending.iter().map(|hole| hole.len() + 2).sum());

    let mut last_bridge: Option<Point2<f64>> = None;
    while !pending.is_empty() {
        let (hole_index, hole_point, outer_point) =
            closest_bridge(&merged, &pending, last_bridge).unwrap_or((0, 0, 0));

        let hole = pending.remove(hole_index);
        let bridge = merged[outer_point];

        let mut spliced = Vec::with_capacity(merged.len() + hole.len() + 2);
        spliced.extend_from_slice(&merged[..=outer_point]);
        spliced.extend_from_slice(&hole[hole_point..]);
        spliced.extend_from_slice(&hole[..hole_point]);
        spliced.push(hole[hole_point]);
        spliced.push(bridge);
        spliced.extend_from_slice(&merged[outer_point + 1..]);

        merged = spliced;
        last_bridge = Some(bridge);
    }

    Ok(merged)
}

/// Find (hole index, hole point index, outer point index) of the closest
/// pair whose bridge crosses no edge of the merged loop or of a pending hole.
///
/// Falls back to the closest pair overall when no bridge is clear, which
/// only happens for overlapping or non-interior holes.
fn closest_bridge(
    merged: &[Point2<f64>],
    holes: &[Vec<Point2<f64>>],
    excluded: Option<Point2<f64>>,
) -> Option<(usize, usize, usize)> {
    let mut min_distance = f64::MAX;
    let mut closest = None;
    let mut min_any = f64::MAX;
    let mut closest_any = None;

    for (h, hole) in holes.iter().enumerate() {
        for (k, hole_point) in hole.iter().enumerate() {
            for (l, outer_point) in merged.iter().enumerate() {
                if excluded == Some(*outer_point) {
                    continue;
                }
                let distance = (hole_point - outer_point).norm_squared();
                if distance < min_any {
                    min_any = distance;
                    closest_any = Some((h, k, l));
                }
                if distance < min_distance
                    && is_clear(*hole_point, *outer_point, merged, holes)
                {
                    min_distance = distance;
                    closest = Some((h, k, l));
                    if distance == 0.0 {
                        return closest;
                    }
                }
            }
        }
    }

    closest.or(closest_any)
}

/// Whether segment `a`-`b` properly crosses no edge of the given loops
fn is_clear(
    a: Point2<f64>,
    b: Point2<f64>,
    merged: &[Point2<f64>],
    holes: &[Vec<Point2<f64>>],
) -> bool {
    std::iter::once(merged)
        .chain(holes.iter().map(Vec::as_slice))
        .all(|contour| {
            (0..contour.len()).all(|i| {
                let c = contour[i];
                let d = contour[(i + 1) % contour.len()];
                !segments_cross(a, b, c, d)
            })
        })
}

fn orientation(a: Point2<f64>, b: Point2<f64>, c: Point2<f64>) -> f64 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

/// Segments cross at a single point interior to both. Touching endpoints
/// and collinear overlaps do not count.
fn segments_cross(a: Point2<f64>, b: Point2<f64>, c: Point2<f64>, d: Point2<f64>) -> bool {
    orientation(a, b, c) * orientation(a, b, d) < 0.0
        && orientation(c, d, a) * orientation(c, d, b) < 0.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::triangulation::triangulate_polygon;

    fn square(x: f64, y: f64, size: f64) -> Vec<Point2<f64>> {
        vec![
            Point2::new(x, y),
            Point2::new(x + size, y),
            Point2::new(x + size, y + size),
            Point2::new(x, y + size),
        ]
    }

    #[test]
    fn test_no_holes_returns_outer() {
        let outer = square(0.0, 0.0, 10.0);
        assert_eq!(flatten_with_holes(&outer, &[]).unwrap(), outer);
    }

    #[test]
    fn test_outer_made_counter_clockwise() {
        let mut outer = square(0.0, 0.0, 10.0);
        outer.reverse();
        let merged = flatten_with_holes(&outer, &[]).unwrap();
        assert!(compute_signed_area(&merged) > 0.0);
    }

    #[test]
    fn test_single_hole_bridge() {
        let outer = square(0.0, 0.0, 10.0);
        let hole = square(1.0, 1.0, 2.0);
        let merged = flatten_with_holes(&outer, &[hole]).unwrap();

        assert_eq!(merged.len(), 4 + 4 + 2);
        // Bridge from (0, 0) to the closest hole corner (1, 1) and back
        assert_eq!(merged[0], Point2::new(0.0, 0.0));
        assert_eq!(merged[1], Point2::new(1.0, 1.0));
        assert_eq!(merged[5], Point2::new(1.0, 1.0));
        assert_eq!(merged[6], Point2::new(0.0, 0.0));
        assert_eq!(merged[7], Point2::new(10.0, 0.0));
        // Net signed area is outer minus hole
        assert!((compute_signed_area(&merged) - 96.0).abs() < 1e-9);
    }

    #[test]
    fn test_hole_touching_outer_still_bridged() {
        let outer = square(0.0, 0.0, 10.0);
        let hole = vec![
            Point2::new(0.0, 0.0),
            Point2::new(2.0, 1.0),
            Point2::new(1.0, 2.0),
        ];
        let merged = flatten_with_holes(&outer, &[hole]).unwrap();
        assert_eq!(merged.len(), 4 + 3 + 2);
    }

    #[test]
    fn test_bridges_do_not_share_outer_point() {
        // Both holes are closest to the (0, 0) corner
        let outer = square(0.0, 0.0, 100.0);
        let hole1 = square(1.0, 1.0, 2.0);
        let hole2 = square(1.0, 10.0, 2.0);
        let merged = flatten_with_holes(&outer, &[hole1, hole2]).unwrap();
        assert_eq!(merged.len(), 4 + 6 + 6);

        let corner = Point2::new(0.0, 0.0);
        // The corner appears once for the original vertex and once for the
        // first bridge return, never for a second bridge
        assert_eq!(merged.iter().filter(|p| **p == corner).count(), 2);
    }

    #[test]
    fn test_bridge_goes_around_other_hole() {
        // The closest pair for the small hole passes through the thin hole
        let outer = vec![
            Point2::new(0.0, 0.0),
            Point2::new(500.0, 50.0),
            Point2::new(1000.0, 0.0),
            Point2::new(1000.0, 1000.0),
            Point2::new(0.0, 1000.0),
        ];
        let thin = vec![
            Point2::new(300.0, 60.0),
            Point2::new(700.0, 60.0),
            Point2::new(700.0, 70.0),
            Point2::new(300.0, 70.0),
        ];
        let small = square(490.0, 100.0, 20.0);
        let merged = flatten_with_holes(&outer, &[thin, small]).unwrap();
        assert_eq!(merged.len(), 5 + 6 + 6);

        let n = merged.len();
        for i in 0..n {
            for j in i + 2..n {
                if i == 0 && j == n - 1 {
                    continue;
                }
                assert!(
                    !segments_cross(merged[i], merged[(i + 1) % n], merged[j], merged[(j + 1) % n]),
                    "edges {} and {} cross",
                    i,
                    j
                );
            }
        }

        let expected = 975000.0 - 4000.0 - 400.0;
        assert!((compute_signed_area(&merged) - expected).abs() < 1e-6);
        let indices = triangulate_polygon(&merged).unwrap();
        let area: f64 = indices
            .chunks_exact(3)
            .map(|t| orientation(merged[t[0]], merged[t[1]], merged[t[2]]).abs() / 2.0)
            .sum();
        assert!((area - expected).abs() < 1e-3);
    }

    #[test]
    fn test_degenerate_inputs() {
        let outer = square(0.0, 0.0, 10.0);
        let tiny_hole = vec![Point2::new(1.0, 1.0), Point2::new(2.0, 2.0)];
        assert_eq!(flatten_with_holes(&outer, &[tiny_hole]).unwrap().len(), 4);
        assert!(flatten_with_holes(&outer[..2], &[]).is_err());
    }
}
