// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Home3D Ground Geometry
//!
//! Planar area booleans on top of i_overlay, curve flattening with
//! lyon_path, hole merging for earcutr triangulation and the builder of
//! the ground and underground surfaces of a plan.
//!
//! ```rust
//! use home3d_core::{Furniture, Level, Plan};
//! use home3d_geometry::{build_ground, FragmentKind, GroundConfig};
//!
//! let basement = Level::new(1, "Basement", -250.0);
//! let plan = Plan::new()
//!     .with_furniture(Furniture::new(250.0, 250.0, 500.0, 500.0, Some(basement.id)))
//!     .with_level(basement);
//!
//! let ground = build_ground(&plan, &GroundConfig::default()).unwrap();
//! assert_eq!(ground.bands.len(), 1);
//! assert_eq!(ground.fragments_of(FragmentKind::Skirt).count(), 1);
//! ```

pub mod area;
pub mod error;
pub mod footprint;
pub mod ground;
pub mod hole_merge;
pub mod mesh;
pub mod outline;
pub mod path;
pub mod polygon;
pub mod texture;
pub mod triangulation;

// Re-export nalgebra types for convenience
pub use nalgebra::{Point2, Point3, Vector2, Vector3};

pub use area::{Area, Region};
pub use error::{Error, Result};
pub use footprint::furniture_area;
pub use ground::{
    build_ground, ElevationBand, FragmentKind, GroundBuilder, GroundConfig, GroundFragment,
    GroundGeometry, DEFAULT_FLATNESS, DEFAULT_GROUND_PADDING,
};
pub use hole_merge::flatten_with_holes;
pub use mesh::{GroundMesh, Mesh, Primitive};
pub use outline::{area_points, extract_loops, AreaLoops, Boundary, PathSegment};
pub use path::{path_from_commands, polyline_path};
pub use polygon::{PolygonLoop, Rect, Winding};
pub use texture::{TextureMapping, TextureTransform};
pub use triangulation::{triangulate_ground_mesh, triangulate_polygon};
