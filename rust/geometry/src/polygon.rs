// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Closed polygon loops and their winding
//!
//! Plan coordinates have y pointing south, but winding is always decided
//! by the sign of the shoelace sum: positive is counter-clockwise (outer
//! boundary), negative is clockwise (hole).

use crate::error::{Error, Result};
use home3d_core::PlanPoint;
use nalgebra::Point2;

/// Polygons with an absolute area below this are degenerate
pub const MIN_AREA_THRESHOLD: f64 = 1e-10;

/// Orientation of a closed loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Winding {
    CounterClockwise,
    Clockwise,
}

/// Compute the signed area of a 2D contour
/// Positive = counter-clockwise, Negative = clockwise
pub fn compute_signed_area(contour: &[Point2<f64>]) -> f64 {
    if contour.len() < 3 {
        return 0.0;
    }

    let n = contour.len();
    let mut area = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        area += contour[i].x * contour[j].y;
        area -= contour[j].x * contour[i].y;
    }

    area * 0.5
}

/// Check if a point is inside a contour using ray casting
pub fn point_in_contour(point: &Point2<f64>, contour: &[Point2<f64>]) -> bool {
    if contour.len() < 3 {
        return false;
    }

    let mut inside = false;
    let n = contour.len();
    let mut j = n - 1;
    for i in 0..n {
        let pi = &contour[i];
        let pj = &contour[j];

        if ((pi.y > point.y) != (pj.y > point.y))
            && (point.x < (pj.x - pi.x) * (point.y - pi.y) / (pj.y - pi.y) + pi.x)
        {
            inside = !inside;
        }
        j = i;
    }

    inside
}

/// Convert plan points to f64, rejecting non-finite coordinates.
///
/// This is the single entry point from plan data into geometry; NaN or
/// infinite coordinates are a caller defect, not bad plan data.
pub fn plan_points_to_f64(points: &[PlanPoint]) -> Result<Vec<Point2<f64>>> {
    points
        .iter()
        .map(|&[x, y]| {
            if x.is_finite() && y.is_finite() {
                Ok(Point2::new(x as f64, y as f64))
            } else {
                Err(Error::InvalidArgument(format!(
                    "non-finite plan coordinate ({}, {})",
                    x, y
                )))
            }
        })
        .collect()
}

/// A closed, non-degenerate loop of distinct points.
///
/// Consecutive points never coincide and the closing point is not stored.
#[derive(Debug, Clone, PartialEq)]
pub struct PolygonLoop {
    points: Vec<Point2<f64>>,
    signed_area: f64,
}

impl PolygonLoop {
    /// Build a loop, collapsing repeated points.
    ///
    /// Returns `None` when fewer than 3 points remain or the loop encloses
    /// no area (collinear points).
    pub fn new(points: impl IntoIterator<Item = Point2<f64>>) -> Option<Self> {
        let mut collapsed: Vec<Point2<f64>> = Vec::new();
        for point in points {
            if collapsed.last() != Some(&point) {
                collapsed.push(point);
            }
        }
        while collapsed.len() > 1 && collapsed.first() == collapsed.last() {
            collapsed.pop();
        }
        if collapsed.len() < 3 {
            return None;
        }

        let signed_area = compute_signed_area(&collapsed);
        if signed_area.abs() <= MIN_AREA_THRESHOLD {
            return None;
        }
        Some(Self {
            points: collapsed,
            signed_area,
        })
    }

    /// Axis-aligned rectangle loop, counter-clockwise.
    pub fn rectangle(rect: &Rect) -> Option<Self> {
        Self::new([
            rect.min,
            Point2::new(rect.max.x, rect.min.y),
            rect.max,
            Point2::new(rect.min.x, rect.max.y),
        ])
    }

    #[inline]
    pub fn points(&self) -> &[Point2<f64>] {
        &self.points
    }

    pub fn into_points(self) -> Vec<Point2<f64>> {
        self.points
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false: a loop holds at least 3 points
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[inline]
    pub fn signed_area(&self) -> f64 {
        self.signed_area
    }

    #[inline]
    pub fn area(&self) -> f64 {
        self.signed_area.abs()
    }

    #[inline]
    pub fn winding(&self) -> Winding {
        if self.signed_area > 0.0 {
            Winding::CounterClockwise
        } else {
            Winding::Clockwise
        }
    }

    /// Clockwise loops are holes
    #[inline]
    pub fn is_hole(&self) -> bool {
        self.winding() == Winding::Clockwise
    }

    pub fn reversed(&self) -> Self {
        Self {
            points: self.points.iter().rev().copied().collect(),
            signed_area: -self.signed_area,
        }
    }

    /// Same loop with the requested winding
    pub fn with_winding(self, winding: Winding) -> Self {
        if self.winding() == winding {
            self
        } else {
            self.reversed()
        }
    }

    pub fn contains(&self, point: &Point2<f64>) -> bool {
        point_in_contour(point, &self.points)
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_points(&self.points).unwrap_or_else(|| Rect::new(self.points[0], self.points[0]))
    }
}

/// Axis-aligned rectangle in plan coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub min: Point2<f64>,
    pub max: Point2<f64>,
}

impl Rect {
    pub fn new(min: Point2<f64>, max: Point2<f64>) -> Self {
        Self { min, max }
    }

    /// Rectangle from origin and size
    pub fn from_origin(x: f64, y: f64, width: f64, depth: f64) -> Self {
        Self {
            min: Point2::new(x, y),
            max: Point2::new(x + width, y + depth),
        }
    }

    /// Compute bounding box of a contour
    pub fn from_points(points: &[Point2<f64>]) -> Option<Self> {
        let first = points.first()?;
        let mut rect = Self::new(*first, *first);
        for point in &points[1..] {
            rect.add_point(point);
        }
        Some(rect)
    }

    /// Grow the rectangle so it includes `point`
    pub fn add_point(&mut self, point: &Point2<f64>) {
        self.min.x = self.min.x.min(point.x);
        self.min.y = self.min.y.min(point.y);
        self.max.x = self.max.x.max(point.x);
        self.max.y = self.max.y.max(point.y);
    }

    pub fn union(&self, other: &Rect) -> Rect {
        let mut rect = *self;
        rect.add_point(&other.min);
        rect.add_point(&other.max);
        rect
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON_2D: f64 = 1e-9;

    fn square(x: f64, y: f64, size: f64) -> Vec<Point2<f64>> {
        vec![
            Point2::new(x, y),
            Point2::new(x + size, y),
            Point2::new(x + size, y + size),
            Point2::new(x, y + size),
        ]
    }

    #[test]
    fn test_compute_signed_area_ccw() {
        let area = compute_signed_area(&square(0.0, 0.0, 1.0));
        assert!((area - 1.0).abs() < EPSILON_2D);
    }

    #[test]
    fn test_compute_signed_area_cw() {
        let mut contour = square(0.0, 0.0, 1.0);
        contour.reverse();
        assert!((compute_signed_area(&contour) + 1.0).abs() < EPSILON_2D);
    }

    #[test]
    fn test_winding_flips_with_order() {
        let outer = PolygonLoop::new(square(0.0, 0.0, 10.0)).unwrap();
        assert_eq!(outer.winding(), Winding::CounterClockwise);
        assert!(!outer.is_hole());
        assert!(outer.signed_area() > 0.0);

        let hole = outer.reversed();
        assert_eq!(hole.winding(), Winding::Clockwise);
        assert!(hole.is_hole());
        assert!(hole.signed_area() < 0.0);
    }

    #[test]
    fn test_loop_collapses_duplicates() {
        let points = vec![
            Point2::new(0.0, 0.0),
            Point2::new(0.0, 0.0),
            Point2::new(4.0, 0.0),
            Point2::new(4.0, 3.0),
            Point2::new(4.0, 3.0),
            Point2::new(0.0, 0.0),
        ];
        let polygon = PolygonLoop::new(points).unwrap();
        assert_eq!(polygon.len(), 3);
        assert!((polygon.area() - 6.0).abs() < EPSILON_2D);
    }

    #[test]
    fn test_degenerate_loops_are_dropped() {
        // Collinear
        assert!(PolygonLoop::new(vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(2.0, 0.0),
        ])
        .is_none());
        // Too few distinct points
        assert!(PolygonLoop::new(vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(0.0, 0.0),
        ])
        .is_none());
    }

    #[test]
    fn test_point_in_contour() {
        let contour = square(0.0, 0.0, 10.0);
        assert!(point_in_contour(&Point2::new(5.0, 5.0), &contour));
        assert!(!point_in_contour(&Point2::new(15.0, 5.0), &contour));
        assert!(!point_in_contour(&Point2::new(-1.0, 5.0), &contour));
    }

    #[test]
    fn test_plan_points_reject_nan() {
        assert!(plan_points_to_f64(&[[0.0, 0.0], [f32::NAN, 1.0]]).is_err());
        let points = plan_points_to_f64(&[[1.5, -2.0]]).unwrap();
        assert_eq!(points[0], Point2::new(1.5, -2.0));
    }

    #[test]
    fn test_rect_bounds() {
        let rect = Rect::from_points(&square(2.0, 3.0, 4.0)).unwrap();
        assert_eq!(rect.min, Point2::new(2.0, 3.0));
        assert_eq!(rect.max, Point2::new(6.0, 7.0));
        assert_eq!(rect.width(), 4.0);

        let far = Rect::from_origin(20.0, 20.0, 1.0, 1.0);
        let merged = rect.union(&far);
        assert_eq!(merged.max, Point2::new(21.0, 21.0));
    }
}
