// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Curved paths built with lyon
//!
//! SVG cut-out shapes and curved polylines are kept as lyon paths and only
//! flattened when an outline or an area is extracted from them.

use crate::outline::{Boundary, PathSegment};
use home3d_core::{PathCommand, PlanPoint};
use lyon_path::builder::SvgPathBuilder;
use lyon_path::geom::ArcFlags;
use lyon_path::iterator::PathIterator;
use lyon_path::math::{point, vector, Angle, Point};
use lyon_path::{Event, Path};
use nalgebra::Point2;

/// Control points of curved polylines sit on the neighbour bisector at
/// this fraction of the neighbours distance
const BISECTOR_FACTOR: f32 = 1.0 / 3.625;

/// Build a path from parsed SVG path commands.
pub fn path_from_commands(commands: &[PathCommand]) -> Path {
    let mut builder = Path::builder().with_svg();
    for command in commands {
        match *command {
            PathCommand::MoveTo { to, relative } => {
                if relative {
                    builder.relative_move_to(vector(to[0], to[1]));
                } else {
                    builder.move_to(point(to[0], to[1]));
                }
            }
            PathCommand::LineTo { to, relative } => {
                if relative {
                    builder.relative_line_to(vector(to[0], to[1]));
                } else {
                    builder.line_to(point(to[0], to[1]));
                }
            }
            PathCommand::HorizontalLineTo { x, relative } => {
                if relative {
                    builder.relative_horizontal_line_to(x);
                } else {
                    builder.horizontal_line_to(x);
                }
            }
            PathCommand::VerticalLineTo { y, relative } => {
                if relative {
                    builder.relative_vertical_line_to(y);
                } else {
                    builder.vertical_line_to(y);
                }
            }
            PathCommand::CubicTo {
                ctrl1,
                ctrl2,
                to,
                relative,
            } => {
                if relative {
                    builder.relative_cubic_bezier_to(
                        vector(ctrl1[0], ctrl1[1]),
                        vector(ctrl2[0], ctrl2[1]),
                        vector(to[0], to[1]),
                    );
                } else {
                    builder.cubic_bezier_to(
                        point(ctrl1[0], ctrl1[1]),
                        point(ctrl2[0], ctrl2[1]),
                        point(to[0], to[1]),
                    );
                }
            }
            PathCommand::SmoothCubicTo { ctrl2, to, relative } => {
                if relative {
                    builder.smooth_relative_cubic_bezier_to(
                        vector(ctrl2[0], ctrl2[1]),
                        vector(to[0], to[1]),
                    );
                } else {
                    builder.smooth_cubic_bezier_to(point(ctrl2[0], ctrl2[1]), point(to[0], to[1]));
                }
            }
            PathCommand::QuadraticTo { ctrl, to, relative } => {
                if relative {
                    builder.relative_quadratic_bezier_to(
                        vector(ctrl[0], ctrl[1]),
                        vector(to[0], to[1]),
                    );
                } else {
                    builder.quadratic_bezier_to(point(ctrl[0], ctrl[1]), point(to[0], to[1]));
                }
            }
            PathCommand::SmoothQuadraticTo { to, relative } => {
                if relative {
                    builder.smooth_relative_quadratic_bezier_to(vector(to[0], to[1]));
                } else {
                    builder.smooth_quadratic_bezier_to(point(to[0], to[1]));
                }
            }
            PathCommand::ArcTo {
                radii,
                x_rotation,
                large_arc,
                sweep,
                to,
                relative,
            } => {
                let radii = vector(radii[0], radii[1]);
                let x_rotation = Angle::degrees(x_rotation);
                let flags = ArcFlags { large_arc, sweep };
                if relative {
                    builder.relative_arc_to(radii, x_rotation, flags, vector(to[0], to[1]));
                } else {
                    builder.arc_to(radii, x_rotation, flags, point(to[0], to[1]));
                }
            }
            PathCommand::Close => builder.close(),
        }
    }
    builder.build()
}

/// Build the path of a polyline.
///
/// When `curved`, each segment is a cubic curve whose control points lie
/// along the bisector of the neighbouring points, which gives a smooth
/// curve through every point. The first and last control points of an open
/// curved polyline stay on their end points.
pub fn polyline_path(points: &[PlanPoint], curved: bool, closed: bool) -> Path {
    let mut builder = Path::builder();
    let n = points.len();
    if n == 0 {
        return builder.build();
    }

    let at = |i: usize| -> Point { point(points[i][0], points[i][1]) };
    builder.begin(at(0));

    if curved && n > 1 {
        let segments = if closed { n } else { n - 1 };
        for i in 0..segments {
            let previous = at(if i == 0 { n - 1 } else { i - 1 });
            let current = at(i);
            let next = at((i + 1) % n);
            let next_next = at((i + 2) % n);

            let ctrl1 = if i != 0 || closed {
                current + (next - previous) * BISECTOR_FACTOR
            } else {
                current
            };
            let ctrl2 = if i + 2 != n || closed {
                next + (current - next_next) * BISECTOR_FACTOR
            } else {
                next
            };
            builder.cubic_bezier_to(ctrl1, ctrl2, next);
        }
    } else {
        for i in 1..n {
            builder.line_to(at(i));
        }
    }

    builder.end(closed);
    builder.build()
}

impl Boundary for Path {
    fn flattened_segments(&self, flatness: f64) -> Vec<PathSegment> {
        let to_point = |p: Point| Point2::new(p.x as f64, p.y as f64);
        let mut segments = Vec::new();
        for event in self.iter().flattened(flatness as f32) {
            match event {
                Event::Begin { at } => segments.push(PathSegment::MoveTo(to_point(at))),
                Event::Line { to, .. } => segments.push(PathSegment::LineTo(to_point(to))),
                // Open sub-paths are closed too: boundaries enclose filled areas
                Event::End { .. } => segments.push(PathSegment::Close),
                _ => {}
            }
        }
        segments
    }
}
