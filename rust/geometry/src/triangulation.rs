// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Polygon triangulation utilities
//!
//! Wrapper around earcutr for 2D polygon triangulation, and conversion of
//! ground fragments into indexed triangle meshes.

use crate::mesh::{GroundMesh, Mesh, Primitive};
use crate::{Error, Point2, Point3, Result, Vector3};

/// Check if a polygon is convex (all cross products have same sign)
#[inline]
fn is_convex(points: &[Point2<f64>]) -> bool {
    if points.len() < 3 {
        return false;
    }

    let n = points.len();
    let mut sign = 0i8;

    for i in 0..n {
        let p0 = &points[i];
        let p1 = &points[(i + 1) % n];
        let p2 = &points[(i + 2) % n];

        // Cross product of edges
        let cross = (p1.x - p0.x) * (p2.y - p1.y) - (p1.y - p0.y) * (p2.x - p1.x);

        if cross.abs() > 1e-10 {
            let current_sign = if cross > 0.0 { 1i8 } else { -1i8 };
            if sign == 0 {
                sign = current_sign;
            } else if sign != current_sign {
                return false; // Sign changed - not convex
            }
        }
    }

    true
}

/// Simple fan triangulation for convex polygons
#[inline]
fn fan_triangulate(n: usize) -> Vec<usize> {
    let mut indices = Vec::with_capacity((n - 2) * 3);
    for i in 1..n - 1 {
        indices.push(0);
        indices.push(i);
        indices.push(i + 1);
    }
    indices
}

/// Triangulate a simple polygon (no holes)
/// Returns triangle indices into the input points
///
/// Hole-merged loops are simple polygons too: their bridge edges are
/// walked there and back and earcut handles the repeated vertices.
pub fn triangulate_polygon(points: &[Point2<f64>]) -> Result<Vec<usize>> {
    let n = points.len();

    if n < 3 {
        return Err(Error::TriangulationError(
            "Need at least 3 points to triangulate".to_string(),
        ));
    }

    // FAST PATH: Triangle - no triangulation needed
    if n == 3 {
        return Ok(vec![0, 1, 2]);
    }

    // FAST PATH: Convex polygon - use fan triangulation
    if n <= 8 && is_convex(points) {
        return Ok(fan_triangulate(n));
    }

    // Flatten points for earcutr
    let mut vertices = Vec::with_capacity(n * 2);
    for p in points {
        vertices.push(p.x);
        vertices.push(p.y);
    }

    let indices = earcutr::earcut(&vertices, &[], 2)
        .map_err(|e| Error::TriangulationError(format!("{:?}", e)))?;

    Ok(indices)
}

/// Calculate the normal of a polygon from its vertices
/// Optimized for triangles and quads using simple cross product
#[inline]
pub fn calculate_polygon_normal(points: &[Point3<f64>]) -> Vector3<f64> {
    let n = points.len();

    if n < 3 {
        return Vector3::new(0.0, 1.0, 0.0);
    }

    // FAST PATH: Triangle or quad - use simple cross product
    if n <= 4 {
        let v1 = points[1] - points[0];
        let v2 = points[2] - points[0];
        let normal = v1.cross(&v2);
        let len = normal.norm();
        if len > 1e-10 {
            return normal / len;
        }
        if n == 4 {
            // Try different edges for quad
            let v3 = points[3] - points[0];
            let normal = v2.cross(&v3);
            let len = normal.norm();
            if len > 1e-10 {
                return normal / len;
            }
        }
        return Vector3::new(0.0, 1.0, 0.0);
    }

    // Use Newell's method for robust normal calculation on complex polygons
    let mut normal = Vector3::<f64>::zeros();

    for i in 0..n {
        let current = &points[i];
        let next = &points[(i + 1) % n];

        normal.x += (current.y - next.y) * (current.z + next.z);
        normal.y += (current.z - next.z) * (current.x + next.x);
        normal.z += (current.x - next.x) * (current.y + next.y);
    }

    let len = normal.norm();
    if len > 1e-10 {
        normal.normalize()
    } else {
        Vector3::new(0.0, 1.0, 0.0)
    }
}

/// Triangulate a ground fragment.
///
/// Polygon strips are horizontal: they are triangulated in the plan and
/// wound so that they face up. Quads are split along their first diagonal
/// and keep the normal their vertex order gives them.
pub fn triangulate_ground_mesh(ground: &GroundMesh) -> Result<Mesh> {
    let counted: usize = ground.strip_counts.iter().sum();
    if counted != ground.coords.len() {
        return Err(Error::InvalidArgument(format!(
            "strip counts cover {} vertices, mesh has {}",
            counted,
            ground.coords.len()
        )));
    }
    if ground.primitive == Primitive::Quads && ground.coords.len() % 4 != 0 {
        return Err(Error::InvalidArgument(format!(
            "quad mesh vertex count {} is not a multiple of 4",
            ground.coords.len()
        )));
    }

    let tex_coords = ground
        .tex_coords
        .as_deref()
        .filter(|uvs| uvs.len() == ground.coords.len());

    let mut mesh = Mesh::with_capacity(ground.vertex_count(), ground.vertex_count() * 3);
    let mut offset = 0usize;

    match ground.primitive {
        Primitive::Polygons => {
            for strip in ground.strips() {
                let base = mesh.vertex_count() as u32;
                let plan: Vec<Point2<f64>> = strip.iter().map(|p| Point2::new(p.x, p.z)).collect();
                let indices = triangulate_polygon(&plan)?;

                // Plan y runs along 3D z, so the loop winding decides which
                // side the triangles face
                let facing_down = calculate_polygon_normal(strip).y < 0.0;
                let up = Vector3::new(0.0, 1.0, 0.0);
                for p in strip {
                    mesh.add_vertex(*p, up);
                }
                for triangle in indices.chunks_exact(3) {
                    let (i0, i1, i2) = (triangle[0] as u32, triangle[1] as u32, triangle[2] as u32);
                    if facing_down {
                        mesh.add_triangle(base + i0, base + i2, base + i1);
                    } else {
                        mesh.add_triangle(base + i0, base + i1, base + i2);
                    }
                }
                if let Some(uvs) = tex_coords {
                    for uv in &uvs[offset..offset + strip.len()] {
                        mesh.add_uv(*uv);
                    }
                }
                offset += strip.len();
            }
        }
        Primitive::Quads => {
            for (q, quad) in ground.coords.chunks_exact(4).enumerate() {
                let base = mesh.vertex_count() as u32;
                let normal = calculate_polygon_normal(quad);
                for p in quad {
                    mesh.add_vertex(*p, normal);
                }
                mesh.add_triangle(base, base + 1, base + 2);
                mesh.add_triangle(base, base + 2, base + 3);
                if let Some(uvs) = tex_coords {
                    for uv in &uvs[q * 4..q * 4 + 4] {
                        mesh.add_uv(*uv);
                    }
                }
            }
        }
    }

    Ok(mesh)
}
