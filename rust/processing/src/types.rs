// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Ground data types for serialization.

use home3d_geometry::{FragmentKind, Mesh};
use serde::{Deserialize, Serialize};

/// Kind of a serialized fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FragmentKindData {
    OutsideGround,
    Ground,
    Floor,
    Skirt,
    Lid,
}

impl From<FragmentKind> for FragmentKindData {
    fn from(kind: FragmentKind) -> Self {
        match kind {
            FragmentKind::OutsideGround => Self::OutsideGround,
            FragmentKind::Ground => Self::Ground,
            FragmentKind::Floor => Self::Floor,
            FragmentKind::Skirt => Self::Skirt,
            FragmentKind::Lid => Self::Lid,
        }
    }
}

/// Triangulated ground fragment with its metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FragmentData {
    /// What the fragment represents.
    pub kind: FragmentKindData,
    /// Elevation of the patch, or of the skirt bottom.
    pub elevation: f32,
    /// Skirt height, 0 for flat patches.
    pub height: f32,
    /// Ids of the levels of the fragment band.
    pub levels: Vec<u32>,
    /// Vertex positions (x, y, z triplets).
    pub positions: Vec<f32>,
    /// Vertex normals (x, y, z triplets).
    pub normals: Vec<f32>,
    /// Texture coordinates (u, v pairs), empty without texture.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub uvs: Vec<f32>,
    /// Triangle indices.
    pub indices: Vec<u32>,
}

impl FragmentData {
    /// Create fragment data from a triangulated mesh.
    pub fn new(kind: FragmentKindData, elevation: f32, height: f32, levels: Vec<u32>, mesh: Mesh) -> Self {
        Self {
            kind,
            elevation,
            height,
            levels,
            positions: mesh.positions,
            normals: mesh.normals,
            uvs: mesh.uvs,
            indices: mesh.indices,
        }
    }

    /// Get the number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    /// Get the number of triangles.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Check if the fragment is empty.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty() || self.indices.is_empty()
    }
}

/// Rebuild statistics.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RebuildStats {
    pub band_count: usize,
    pub fragment_count: usize,
    pub vertex_count: usize,
    pub triangle_count: usize,
    /// Builder time in milliseconds.
    pub build_time_ms: u64,
    /// Triangulation time in milliseconds.
    pub triangulation_time_ms: u64,
    pub total_time_ms: u64,
}

/// Result of one ground rebuild.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroundData {
    /// Rebuild generation, increasing with every rebuild of a scene.
    pub generation: u64,
    /// Ground patch rectangle as [min_x, min_y, max_x, max_y].
    pub ground_bounds: [f64; 4],
    /// Band elevations, shallowest first.
    pub band_elevations: Vec<f32>,
    pub fragments: Vec<FragmentData>,
    pub stats: RebuildStats,
}

impl GroundData {
    /// Serialize to a JSON string.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Fragments of one kind.
    pub fn fragments_of(&self, kind: FragmentKindData) -> impl Iterator<Item = &FragmentData> + '_ {
        self.fragments.iter().filter(move |f| f.kind == kind)
    }
}
