// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! 2D Boolean Operations on plan areas
//!
//! [`Area`] is an immutable set of filled regions, each one counter-clockwise
//! outer loop with clockwise holes strictly inside it. Every operation
//! returns a new area computed with the i_overlay crate; inputs are never
//! modified, so an area cached for one elevation band cannot be altered by
//! a later stage.

use crate::error::Result;
use crate::polygon::{plan_points_to_f64, PolygonLoop, Rect, Winding};
use home3d_core::PlanPoint;
use i_overlay::core::fill_rule::FillRule;
use i_overlay::core::overlay_rule::OverlayRule;
use i_overlay::float::single::SingleFloatOverlay;
use nalgebra::Point2;

/// One filled region: an outer boundary and the holes it owns.
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    outer: PolygonLoop,
    holes: Vec<PolygonLoop>,
}

impl Region {
    /// Counter-clockwise outer boundary
    #[inline]
    pub fn outer(&self) -> &PolygonLoop {
        &self.outer
    }

    /// Clockwise holes, each strictly inside the outer boundary
    #[inline]
    pub fn holes(&self) -> &[PolygonLoop] {
        &self.holes
    }

    pub fn contains(&self, point: &Point2<f64>) -> bool {
        self.outer.contains(point) && !self.holes.iter().any(|hole| hole.contains(point))
    }

    /// Filled surface: outer area minus hole areas
    pub fn area(&self) -> f64 {
        self.outer.area() - self.holes.iter().map(PolygonLoop::area).sum::<f64>()
    }
}

/// A 2D region made of outer loops and hole loops.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Area {
    regions: Vec<Region>,
}

type Contours = Vec<Vec<[f64; 2]>>;

impl Area {
    /// The empty area
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an area from plan coordinates.
    ///
    /// This is the one conversion point from plan footprints to areas:
    /// non-finite coordinates are rejected, degenerate loops give an empty
    /// area. Self-intersecting footprints are filled with the non-zero rule.
    pub fn from_plan_points(points: &[PlanPoint]) -> Result<Self> {
        let points = plan_points_to_f64(points)?;
        Ok(Self::from_loop(&points))
    }

    /// Build a single-loop area. The loop winding does not matter: the
    /// enclosed region is filled.
    pub fn from_loop(points: &[Point2<f64>]) -> Self {
        Self::from_contours(std::slice::from_ref(&points.to_vec()))
    }

    /// Build an area from several loops filled with the non-zero rule.
    ///
    /// Loops with opposite windings cancel out, so a counter-clockwise
    /// loop with a clockwise loop inside it makes a region with a hole.
    pub fn from_contours(contours: &[Vec<Point2<f64>>]) -> Self {
        let subject: Contours = contours
            .iter()
            .filter(|contour| contour.len() >= 3)
            .map(|contour| contour_to_path(contour))
            .collect();
        if subject.is_empty() {
            return Self::new();
        }

        let empty: Contours = Vec::new();
        let result = subject.overlay(&empty, OverlayRule::Union, FillRule::NonZero);
        Self::from_shapes(result)
    }

    /// Axis-aligned rectangle area
    pub fn from_rect(rect: &Rect) -> Self {
        match PolygonLoop::rectangle(rect) {
            Some(outer) => Self {
                regions: vec![Region {
                    outer,
                    holes: Vec::new(),
                }],
            },
            None => Self::new(),
        }
    }

    /// Area enclosed by `polygon` with every hole filled
    pub fn filled(polygon: &PolygonLoop) -> Self {
        Self::from_loop(polygon.points())
    }

    /// Union of several areas
    pub fn union_all<'a>(areas: impl IntoIterator<Item = &'a Area>) -> Self {
        let subject: Contours = areas.into_iter().flat_map(Area::to_paths).collect();
        if subject.is_empty() {
            return Self::new();
        }
        // Regions of one area never overlap, so overlaps between areas are
        // counted twice; non-zero keeps them filled
        let empty: Contours = Vec::new();
        Self::from_shapes(subject.overlay(&empty, OverlayRule::Union, FillRule::NonZero))
    }

    /// Points inside `self` or `other`
    pub fn union(&self, other: &Area) -> Area {
        if other.is_empty() {
            return self.clone();
        }
        if self.is_empty() {
            return other.clone();
        }
        self.overlay(other, OverlayRule::Union)
    }

    /// Points inside `self` and not inside `other`
    pub fn subtract(&self, other: &Area) -> Area {
        if self.is_empty() || other.is_empty() {
            return self.clone();
        }
        self.overlay(other, OverlayRule::Difference)
    }

    /// Points inside both areas
    pub fn intersect(&self, other: &Area) -> Area {
        if self.is_empty() || other.is_empty() {
            return Self::new();
        }
        self.overlay(other, OverlayRule::Intersect)
    }

    /// Points inside exactly one of both areas
    pub fn exclusive_or(&self, other: &Area) -> Area {
        if other.is_empty() {
            return self.clone();
        }
        if self.is_empty() {
            return other.clone();
        }
        self.overlay(other, OverlayRule::Xor)
    }

    fn overlay(&self, other: &Area, rule: OverlayRule) -> Area {
        let subject = self.to_paths();
        let clip = other.to_paths();
        // Result is Vec<Vec<Vec<[f64; 2]>>> - Vec of shapes, each shape is Vec of contours
        let result = subject.overlay(&clip, rule, FillRule::EvenOdd);
        Self::from_shapes(result)
    }

    /// Convert overlay shapes back to regions.
    ///
    /// The first contour of a shape is its outer boundary. A shape whose
    /// outer boundary is degenerate is dropped along with its holes.
    fn from_shapes(shapes: Vec<Vec<Vec<[f64; 2]>>>) -> Self {
        let mut regions = Vec::with_capacity(shapes.len());
        for shape in shapes {
            let mut contours = shape.into_iter();
            let outer = match contours.next().and_then(|c| path_to_loop(&c)) {
                Some(outer) => outer.with_winding(Winding::CounterClockwise),
                None => continue,
            };
            let holes = contours
                .filter_map(|c| path_to_loop(&c))
                .map(|hole| hole.with_winding(Winding::Clockwise))
                .collect();
            regions.push(Region { outer, holes });
        }
        Self { regions }
    }

    fn to_paths(&self) -> Contours {
        self.loops().map(|polygon| contour_to_path(polygon.points())).collect()
    }

    /// An area with no outer loop is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    #[inline]
    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    /// Every loop of the area: each outer loop followed by its holes
    pub fn loops(&self) -> impl Iterator<Item = &PolygonLoop> + '_ {
        self.regions
            .iter()
            .flat_map(|region| std::iter::once(&region.outer).chain(region.holes.iter()))
    }

    pub fn outer_loops(&self) -> impl Iterator<Item = &PolygonLoop> + '_ {
        self.regions.iter().map(|region| &region.outer)
    }

    pub fn hole_loops(&self) -> impl Iterator<Item = &PolygonLoop> + '_ {
        self.regions.iter().flat_map(|region| region.holes.iter())
    }

    /// Even-odd containment over all loops.
    ///
    /// Points exactly on a boundary may be reported either way.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        let point = Point2::new(x, y);
        self.regions.iter().any(|region| region.contains(&point))
    }

    /// Axis-aligned bounds, `None` for an empty area
    pub fn bounds(&self) -> Option<Rect> {
        self.outer_loops()
            .map(PolygonLoop::bounds)
            .reduce(|bounds, other| bounds.union(&other))
    }

    /// Filled surface of the area
    pub fn area(&self) -> f64 {
        self.regions.iter().map(Region::area).sum()
    }
}

/// Convert a contour to an i_overlay path
fn contour_to_path(contour: &[Point2<f64>]) -> Vec<[f64; 2]> {
    contour.iter().map(|p| [p.x, p.y]).collect()
}

/// Convert an i_overlay path back to a loop
fn path_to_loop(path: &[[f64; 2]]) -> Option<PolygonLoop> {
    PolygonLoop::new(path.iter().map(|p| Point2::new(p[0], p[1])))
}
