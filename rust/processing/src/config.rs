// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Rebuild configuration loaded from environment variables.

use home3d_geometry::{GroundConfig, Rect, TextureMapping, DEFAULT_FLATNESS, DEFAULT_GROUND_PADDING};

/// Pipeline configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Margin around removed areas, in plan units.
    pub ground_padding: f64,
    /// Curve flattening tolerance, in plan units.
    pub flatness: f64,
    /// Explicit ground extent as (x, y, width, depth).
    pub ground_extent: Option<[f64; 4]>,
    /// Ground texture placement, if the host resolved one.
    pub ground_texture: Option<TextureMapping>,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            ground_padding: std::env::var("HOME3D_GROUND_PADDING")
                .unwrap_or_else(|_| DEFAULT_GROUND_PADDING.to_string())
                .parse()
                .unwrap_or(DEFAULT_GROUND_PADDING),
            flatness: std::env::var("HOME3D_GROUND_FLATNESS")
                .unwrap_or_else(|_| DEFAULT_FLATNESS.to_string())
                .parse()
                .unwrap_or(DEFAULT_FLATNESS),
            ground_extent: std::env::var("HOME3D_GROUND_EXTENT")
                .ok()
                .and_then(|value| parse_extent(&value)),
            ground_texture: None,
        }
    }

    /// Ground builder settings for this configuration.
    pub fn to_ground_config(&self) -> GroundConfig {
        GroundConfig {
            extent: self
                .ground_extent
                .map(|[x, y, width, depth]| Rect::from_origin(x, y, width, depth)),
            padding: self.ground_padding,
            flatness: self.flatness,
            texture: self.ground_texture,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

/// Parse an extent written as `x,y,width,depth`.
///
/// Returns `None` unless there are exactly four finite numbers and the
/// size is not negative.
pub fn parse_extent(value: &str) -> Option<[f64; 4]> {
    let numbers: Vec<f64> = value
        .split(',')
        .map(|s| s.trim().parse::<f64>())
        .collect::<Result<_, _>>()
        .ok()?;
    match numbers.as_slice() {
        &[x, y, width, depth]
            if numbers.iter().all(|v| v.is_finite()) && width >= 0.0 && depth >= 0.0 =>
        {
            Some([x, y, width, depth])
        }
        _ => None,
    }
}
