// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Outline extraction
//!
//! Turns any flattened boundary (an [`Area`] or a curved path) back into
//! ordered point loops, either as separate outer and hole lists for plain
//! outline rendering, or as hole-merged simple loops for triangulation.

use crate::area::Area;
use crate::error::{Error, Result};
use crate::hole_merge::flatten_with_holes;
use crate::polygon::{point_in_contour, PolygonLoop, Winding};
use nalgebra::Point2;
use tracing::trace;

/// One step of a flattened boundary walk.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathSegment {
    MoveTo(Point2<f64>),
    LineTo(Point2<f64>),
    Close,
}

/// A closed boundary that can be walked as straight segments.
pub trait Boundary {
    /// Walk the boundary, approximating curves with segments that stay
    /// within `flatness` of the curve. `flatness` is strictly positive.
    fn flattened_segments(&self, flatness: f64) -> Vec<PathSegment>;
}

impl Boundary for Area {
    fn flattened_segments(&self, _flatness: f64) -> Vec<PathSegment> {
        let mut segments = Vec::new();
        for polygon in self.loops() {
            let points = polygon.points();
            segments.push(PathSegment::MoveTo(points[0]));
            segments.extend(points[1..].iter().map(|p| PathSegment::LineTo(*p)));
            segments.push(PathSegment::Close);
        }
        segments
    }
}

impl<B: Boundary + ?Sized> Boundary for &B {
    fn flattened_segments(&self, flatness: f64) -> Vec<PathSegment> {
        (**self).flattened_segments(flatness)
    }
}

/// Outer and hole loops of a boundary.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AreaLoops {
    pub outers: Vec<Vec<Point2<f64>>>,
    pub holes: Vec<Vec<Point2<f64>>>,
}

impl AreaLoops {
    pub fn is_empty(&self) -> bool {
        self.outers.is_empty()
    }
}

/// Split a boundary into outer loops and hole loops.
///
/// Loops are classified by signed area before any reordering: positive is
/// an outer loop, negative a hole. Every returned loop is then
/// counter-clockwise, or clockwise when `reversed` is set. Loops with fewer
/// than 3 distinct points or no area are dropped, as are holes when no
/// outer loop exists.
pub fn extract_loops<B: Boundary + ?Sized>(
    boundary: &B,
    flatness: f64,
    reversed: bool,
) -> Result<AreaLoops> {
    let (outers, holes) = classified_loops(boundary, flatness)?;
    if outers.is_empty() {
        return Ok(AreaLoops::default());
    }

    let winding = if reversed {
        Winding::Clockwise
    } else {
        Winding::CounterClockwise
    };
    let orient = |loops: Vec<PolygonLoop>| -> Vec<Vec<Point2<f64>>> {
        loops
            .into_iter()
            .map(|polygon| polygon.with_winding(winding).into_points())
            .collect()
    };

    Ok(AreaLoops {
        outers: orient(outers),
        holes: orient(holes),
    })
}

/// Return the boundary as simple loops, holes merged into the outer loop
/// enclosing them.
///
/// Outer loops are sorted from outermost to innermost and processed from
/// the innermost one, so a hole is merged into the deepest outer loop that
/// contains its first point. Holes contained by no outer loop are dropped.
/// Loops are counter-clockwise, or clockwise when `reversed` is set.
pub fn area_points<B: Boundary + ?Sized>(
    boundary: &B,
    flatness: f64,
    reversed: bool,
) -> Result<Vec<Vec<Point2<f64>>>> {
    let (outers, holes) = classified_loops(boundary, flatness)?;
    if outers.is_empty() {
        return Ok(Vec::new());
    }

    let mut sorted: Vec<Vec<Point2<f64>>> = sort_outermost_first(outers)
        .into_iter()
        .map(PolygonLoop::into_points)
        .collect();

    let mut unclaimed: Vec<Option<Vec<Point2<f64>>>> = holes
        .into_iter()
        .map(|hole| Some(hole.into_points()))
        .collect();

    for outer in sorted.iter_mut().rev() {
        let claimed: Vec<Vec<Point2<f64>>> = unclaimed
            .iter_mut()
            .filter(|hole| {
                hole.as_ref()
                    .map_or(false, |points| point_in_contour(&points[0], outer.as_slice()))
            })
            .filter_map(Option::take)
            .collect();
        if !claimed.is_empty() {
            *outer = flatten_with_holes(outer.as_slice(), &claimed)?;
        }
    }

    let dropped = unclaimed.iter().filter(|hole| hole.is_some()).count();
    if dropped > 0 {
        trace!(dropped, "Holes outside every outer loop dropped");
    }

    if reversed {
        for outer in &mut sorted {
            outer.reverse();
        }
    }
    Ok(sorted)
}

/// Walk the boundary and classify its loops by signed area
fn classified_loops<B: Boundary + ?Sized>(
    boundary: &B,
    flatness: f64,
) -> Result<(Vec<PolygonLoop>, Vec<PolygonLoop>)> {
    if !(flatness.is_finite() && flatness > 0.0) {
        return Err(Error::InvalidArgument(format!(
            "flatness must be a positive number, got {}",
            flatness
        )));
    }

    let mut outers = Vec::new();
    let mut holes = Vec::new();
    let mut current: Vec<Point2<f64>> = Vec::new();

    let mut finish = |points: &mut Vec<Point2<f64>>| {
        if points.is_empty() {
            return;
        }
        match PolygonLoop::new(points.drain(..)) {
            Some(polygon) if polygon.is_hole() => holes.push(polygon),
            Some(polygon) => outers.push(polygon),
            None => trace!("Degenerate loop dropped"),
        }
    };

    for segment in boundary.flattened_segments(flatness) {
        match segment {
            PathSegment::MoveTo(point) => {
                // An unclosed sub-path is closed implicitly, as for any filled shape
                finish(&mut current);
                current.push(point);
            }
            PathSegment::LineTo(point) => current.push(point),
            PathSegment::Close => finish(&mut current),
        }
    }
    finish(&mut current);

    Ok((outers, holes))
}

/// Order outer loops so that no loop comes before a loop containing it
fn sort_outermost_first(mut remaining: Vec<PolygonLoop>) -> Vec<PolygonLoop> {
    let mut sorted = Vec::with_capacity(remaining.len());
    while !remaining.is_empty() {
        let outermost = (0..remaining.len())
            .find(|&i| {
                let first = remaining[i].points()[0];
                !remaining
                    .iter()
                    .enumerate()
                    .any(|(j, other)| j != i && other.contains(&first))
            })
            // Mutually containing loops cannot happen with valid input;
            // keep the input order if it does
            .unwrap_or(0);
        sorted.push(remaining.remove(outermost));
    }
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::polygon::compute_signed_area;

    fn square(x: f64, y: f64, size: f64) -> Vec<Point2<f64>> {
        vec![
            Point2::new(x, y),
            Point2::new(x + size, y),
            Point2::new(x + size, y + size),
            Point2::new(x, y + size),
        ]
    }

    struct Segments(Vec<PathSegment>);

    impl Boundary for Segments {
        fn flattened_segments(&self, _flatness: f64) -> Vec<PathSegment> {
            self.0.clone()
        }
    }

    fn closed(points: &[Point2<f64>]) -> Vec<PathSegment> {
        let mut segments = vec![PathSegment::MoveTo(points[0])];
        segments.extend(points[1..].iter().map(|p| PathSegment::LineTo(*p)));
        segments.push(PathSegment::Close);
        segments
    }

    #[test]
    fn test_extract_outer_and_hole() {
        let area = Area::from_loop(&square(0.0, 0.0, 10.0))
            .subtract(&Area::from_loop(&square(2.0, 2.0, 2.0)));
        let loops = extract_loops(&area, 1.0, false).unwrap();
        assert_eq!(loops.outers.len(), 1);
        assert_eq!(loops.holes.len(), 1);
        // Both normalized to counter-clockwise
        assert!(compute_signed_area(&loops.outers[0]) > 0.0);
        assert!(compute_signed_area(&loops.holes[0]) > 0.0);

        let reversed = extract_loops(&area, 1.0, true).unwrap();
        assert!(compute_signed_area(&reversed.outers[0]) < 0.0);
        assert!(compute_signed_area(&reversed.holes[0]) < 0.0);
    }

    #[test]
    fn test_duplicated_points_collapsed() {
        let mut points = square(0.0, 0.0, 10.0);
        points.insert(1, points[0]);
        points.push(points[0]);
        let loops = extract_loops(&Segments(closed(&points)), 1.0, false).unwrap();
        assert_eq!(loops.outers[0].len(), 4);
    }

    #[test]
    fn test_holes_without_outer_discarded() {
        let mut hole = square(0.0, 0.0, 10.0);
        hole.reverse();
        let loops = extract_loops(&Segments(closed(&hole)), 1.0, false).unwrap();
        assert!(loops.is_empty());
        assert!(loops.holes.is_empty());
        assert!(area_points(&Segments(closed(&hole)), 1.0, false)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_degenerate_loop_dropped() {
        let segments = Segments(closed(&[
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(2.0, 0.0),
        ]));
        assert!(extract_loops(&segments, 1.0, false).unwrap().is_empty());
    }

    #[test]
    fn test_invalid_flatness() {
        let area = Area::from_loop(&square(0.0, 0.0, 1.0));
        assert!(extract_loops(&area, 0.0, false).is_err());
        assert!(extract_loops(&area, f64::NAN, false).is_err());
        assert!(area_points(&area, -1.0, false).is_err());
    }

    #[test]
    fn test_area_points_merges_holes() {
        let area = Area::from_loop(&square(0.0, 0.0, 10.0))
            .subtract(&Area::from_loop(&square(2.0, 2.0, 2.0)))
            .subtract(&Area::from_loop(&square(6.0, 6.0, 2.0)));
        let loops = area_points(&area, 1.0, false).unwrap();
        assert_eq!(loops.len(), 1);
        assert_eq!(loops[0].len(), 4 + 6 + 6);
        assert!((compute_signed_area(&loops[0]) - 92.0).abs() < 1e-6);
    }

    #[test]
    fn test_area_points_nested_islands() {
        // A ring with an island inside its hole: the island stays separate
        // and the hole goes to the ring, not the island
        let ring = Area::from_loop(&square(0.0, 0.0, 30.0))
            .subtract(&Area::from_loop(&square(5.0, 5.0, 20.0)));
        let area = ring.union(&Area::from_loop(&square(10.0, 10.0, 10.0)));

        let loops = area_points(&area, 1.0, false).unwrap();
        assert_eq!(loops.len(), 2);
        assert_eq!(loops[0].len(), 4 + 6);
        assert_eq!(loops[1].len(), 4);
        let total: f64 = loops.iter().map(|l| compute_signed_area(l)).sum();
        assert!((total - (900.0 - 400.0 + 100.0)).abs() < 1e-6);
    }
}
