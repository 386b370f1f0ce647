// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Texture coordinate mapping
//!
//! Only texture metadata is handled here: image loading belongs to the
//! renderer. Surfaces emit texture coordinates in plan units and a
//! [`TextureTransform`] maps them to normalized coordinates.

use crate::error::{Error, Result};
use nalgebra::{Matrix3, Point2, Vector3};

/// Size used for textures whose width or height is unknown (-1)
pub const DEFAULT_TEXTURE_SIZE: f32 = 100.0;

/// Placement of a repeated texture on a surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextureMapping {
    /// Width covered by the image, in plan units, or -1 when unknown
    pub width: f32,
    /// Height covered by the image, in plan units, or -1 when unknown
    pub height: f32,
    /// Offset along x, as a fraction of the width
    pub x_offset: f32,
    /// Offset along y, as a fraction of the height
    pub y_offset: f32,
    /// Rotation in radians
    pub angle: f32,
    pub scale: f32,
}

impl Default for TextureMapping {
    fn default() -> Self {
        Self::new(DEFAULT_TEXTURE_SIZE, DEFAULT_TEXTURE_SIZE)
    }
}

impl TextureMapping {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            x_offset: 0.0,
            y_offset: 0.0,
            angle: 0.0,
            scale: 1.0,
        }
    }

    /// Width and height with unknown sizes replaced by the default size
    pub fn size(&self) -> (f64, f64) {
        if self.width == -1.0 || self.height == -1.0 {
            (DEFAULT_TEXTURE_SIZE as f64, DEFAULT_TEXTURE_SIZE as f64)
        } else {
            (self.width as f64, self.height as f64)
        }
    }

    /// Check the mapping can be used to compute coordinates
    pub fn validate(&self) -> Result<()> {
        let (width, height) = self.size();
        if !(width.is_finite() && width > 0.0 && height.is_finite() && height > 0.0) {
            return Err(Error::InvalidArgument(format!(
                "texture size must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        if !(self.scale.is_finite() && self.scale > 0.0) {
            return Err(Error::InvalidArgument(format!(
                "texture scale must be positive, got {}",
                self.scale
            )));
        }
        if !(self.x_offset.is_finite() && self.y_offset.is_finite() && self.angle.is_finite()) {
            return Err(Error::InvalidArgument(
                "texture offsets and angle must be finite".to_string(),
            ));
        }
        Ok(())
    }

    /// Transform from plan units to texture coordinates: offset, then
    /// rotation, then scale by the texture size.
    pub fn transform(&self) -> Result<TextureTransform> {
        self.validate()?;
        let (width, height) = self.size();
        let scale = self.scale as f64;

        let translation = Matrix3::new(
            1.0, 0.0, -(self.x_offset as f64) * width * scale,
            0.0, 1.0, -(self.y_offset as f64) * height * scale,
            0.0, 0.0, 1.0,
        );
        let (sin, cos) = (self.angle as f64).sin_cos();
        let rotation = Matrix3::new(
            cos, -sin, 0.0,
            sin, cos, 0.0,
            0.0, 0.0, 1.0,
        );
        let scaling = Matrix3::new(
            1.0 / (scale * width), 0.0, 0.0,
            0.0, 1.0 / (scale * height), 0.0,
            0.0, 0.0, 1.0,
        );

        Ok(TextureTransform {
            matrix: scaling * rotation * translation,
        })
    }
}

/// 2D affine transform applied to texture coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextureTransform {
    matrix: Matrix3<f64>,
}

impl Default for TextureTransform {
    fn default() -> Self {
        Self {
            matrix: Matrix3::identity(),
        }
    }
}

impl TextureTransform {
    /// Stretch a texture once over the bounding box of `points`.
    ///
    /// With `invert_y`, points are expected with y already negated. A flat
    /// bounding box cannot be fitted and falls back to `mapping`.
    pub fn fit_to_points(
        points: &[Point2<f64>],
        invert_y: bool,
        mapping: &TextureMapping,
    ) -> Result<Self> {
        let mut min = Point2::new(f64::INFINITY, f64::INFINITY);
        let mut max = Point2::new(f64::NEG_INFINITY, f64::NEG_INFINITY);
        for p in points {
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
        }
        let (dx, dy) = (max.x - min.x, max.y - min.y);
        if !(dx > 0.0 && dy > 0.0) {
            return mapping.transform();
        }

        let ty = if invert_y { min.y } else { -min.y };
        Ok(Self {
            matrix: Matrix3::new(
                1.0 / dx, 0.0, -min.x / dx,
                0.0, 1.0 / dy, ty / dy,
                0.0, 0.0, 1.0,
            ),
        })
    }

    #[inline]
    pub fn apply(&self, point: Point2<f64>) -> Point2<f64> {
        let v = self.matrix * Vector3::new(point.x, point.y, 1.0);
        Point2::new(v.x, v.y)
    }

    pub fn matrix(&self) -> &Matrix3<f64> {
        &self.matrix
    }
}
