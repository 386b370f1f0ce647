// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Ground footprint of furniture pieces

use crate::area::Area;
use crate::error::{Error, Result};
use crate::outline::{Boundary, PathSegment};
use crate::path::path_from_commands;
use home3d_core::{parse_path_data, Furniture};
use nalgebra::Point2;
use tracing::warn;

/// Area a piece digs in the ground.
///
/// Pieces with a cut-out shape dig that shape, given as SVG path data in
/// the unit square and fitted to the piece box. Other pieces, and pieces
/// whose cut-out shape cannot be parsed, dig their whole rectangle.
pub fn furniture_area(piece: &Furniture, flatness: f64) -> Result<Area> {
    if !(flatness.is_finite() && flatness > 0.0) {
        return Err(Error::InvalidArgument(format!(
            "flatness must be a positive number, got {}",
            flatness
        )));
    }

    if let Some(shape) = piece.cut_out_shape.as_deref() {
        match parse_path_data(shape) {
            Ok(commands) => {
                let path = path_from_commands(&commands);
                return cut_out_area(piece, &path, flatness);
            }
            Err(error) => {
                warn!(%error, shape, "Ignoring unparsable cut-out shape");
            }
        }
    }

    Area::from_plan_points(&piece.points())
}

fn cut_out_area(piece: &Furniture, shape: &impl Boundary, flatness: f64) -> Result<Area> {
    let values = [piece.x, piece.y, piece.width, piece.depth, piece.angle];
    if values.iter().any(|v| !v.is_finite()) {
        return Err(Error::InvalidArgument(format!(
            "non-finite furniture geometry {:?}",
            values
        )));
    }

    let width = piece.width as f64;
    let depth = piece.depth as f64;
    let (sin, cos) = (piece.angle as f64).sin_cos();
    let origin = Point2::new(piece.x as f64 - width / 2.0, piece.y as f64 - depth / 2.0);

    // Unit square -> piece box: mirror, scale, rotate around the box center
    let transform = |p: Point2<f64>| -> Point2<f64> {
        let x = if piece.model_mirrored { 1.0 - p.x } else { p.x };
        let dx = x * width - width / 2.0;
        let dy = p.y * depth - depth / 2.0;
        Point2::new(
            origin.x + width / 2.0 + dx * cos - dy * sin,
            origin.y + depth / 2.0 + dx * sin + dy * cos,
        )
    };

    // Curves are flattened in unit space, so scale the tolerance down
    let tolerance = flatness / width.max(depth).max(1.0);

    let mut contours: Vec<Vec<Point2<f64>>> = Vec::new();
    let mut current: Vec<Point2<f64>> = Vec::new();
    for segment in shape.flattened_segments(tolerance) {
        match segment {
            PathSegment::MoveTo(p) => {
                if !current.is_empty() {
                    contours.push(std::mem::take(&mut current));
                }
                current.push(transform(p));
            }
            PathSegment::LineTo(p) => current.push(transform(p)),
            PathSegment::Close => {
                if !current.is_empty() {
                    contours.push(std::mem::take(&mut current));
                }
            }
        }
    }
    if !current.is_empty() {
        contours.push(current);
    }

    Ok(Area::from_contours(&contours))
}
