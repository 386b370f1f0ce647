// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Mesh data structures
//!
//! [`GroundMesh`] is the polygon-array form produced by the ground builder:
//! vertices, optional texture coordinates and strip counts. [`Mesh`] is the
//! indexed triangle form renderers consume, obtained with
//! [`GroundMesh::triangulate`].

use crate::error::Result;
use nalgebra::{Point2, Point3, Vector3};

/// How the vertices of a [`GroundMesh`] are grouped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    /// Each strip is one simple polygon, holes already merged
    Polygons,
    /// Every 4 vertices form a vertical quad
    Quads,
}

/// Renderable surface patch: a planar polygon array at a fixed elevation
/// or vertical quads between two elevations.
///
/// Vertices are `(x, elevation, y)`: plan y becomes the 3D z axis and
/// elevations go up the 3D y axis.
#[derive(Debug, Clone, PartialEq)]
pub struct GroundMesh {
    pub primitive: Primitive,
    pub coords: Vec<Point3<f64>>,
    /// One texture coordinate per vertex, when a texture is mapped
    pub tex_coords: Option<Vec<Point2<f64>>>,
    /// Vertex count of each sub-polygon; for quads, of each side loop
    pub strip_counts: Vec<usize>,
}

impl GroundMesh {
    pub fn new(primitive: Primitive) -> Self {
        Self {
            primitive,
            coords: Vec::new(),
            tex_coords: None,
            strip_counts: Vec::new(),
        }
    }

    /// Get vertex count
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.coords.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    /// Vertices of each strip
    pub fn strips(&self) -> impl Iterator<Item = &[Point3<f64>]> + '_ {
        let mut start = 0;
        self.strip_counts.iter().map(move |&count| {
            let strip = &self.coords[start..start + count];
            start += count;
            strip
        })
    }

    /// Convert to an indexed triangle mesh. Horizontal patches face up.
    pub fn triangulate(&self) -> Result<Mesh> {
        crate::triangulation::triangulate_ground_mesh(self)
    }
}

/// Triangle mesh
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    /// Vertex positions (x, y, z)
    pub positions: Vec<f32>,
    /// Vertex normals (nx, ny, nz)
    pub normals: Vec<f32>,
    /// Texture coordinates (u, v), empty when no texture is mapped
    pub uvs: Vec<f32>,
    /// Triangle indices (i0, i1, i2)
    pub indices: Vec<u32>,
}

impl Mesh {
    /// Create a new empty mesh
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mesh with capacity
    pub fn with_capacity(vertex_count: usize, index_count: usize) -> Self {
        Self {
            positions: Vec::with_capacity(vertex_count * 3),
            normals: Vec::with_capacity(vertex_count * 3),
            uvs: Vec::new(),
            indices: Vec::with_capacity(index_count),
        }
    }

    /// Add a vertex with normal
    #[inline]
    pub fn add_vertex(&mut self, position: Point3<f64>, normal: Vector3<f64>) {
        self.positions.push(position.x as f32);
        self.positions.push(position.y as f32);
        self.positions.push(position.z as f32);

        self.normals.push(normal.x as f32);
        self.normals.push(normal.y as f32);
        self.normals.push(normal.z as f32);
    }

    #[inline]
    pub fn add_uv(&mut self, uv: Point2<f64>) {
        self.uvs.push(uv.x as f32);
        self.uvs.push(uv.y as f32);
    }

    /// Add a triangle
    #[inline]
    pub fn add_triangle(&mut self, i0: u32, i1: u32, i2: u32) {
        self.indices.push(i0);
        self.indices.push(i1);
        self.indices.push(i2);
    }

    /// Get vertex count
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    /// Get triangle count
    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Check if mesh is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    #[inline]
    pub fn has_uvs(&self) -> bool {
        !self.uvs.is_empty() && self.uvs.len() / 2 == self.vertex_count()
    }
}
