// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # Home3D Core
//!
//! Plan snapshot types and SVG path parsing shared by the ground
//! reconstruction crates.
//!
//! ## Overview
//!
//! - **Plan model**: levels, rooms, walls and furniture pieces reduced to
//!   the footprints, elevations and visibility flags geometry needs
//! - **SVG path data**: a [nom](https://docs.rs/nom) parser for the
//!   cut-out shapes attached to staircases
//!
//! ## Quick Start
//!
//! ```rust
//! use home3d_core::{Level, Plan, Room};
//!
//! let basement = Level::new(1, "Basement", -250.0);
//! let plan = Plan::new()
//!     .with_room(Room::new(
//!         vec![[0.0, 0.0], [500.0, 0.0], [500.0, 500.0], [0.0, 500.0]],
//!         Some(basement.id),
//!     ))
//!     .with_level(basement);
//! assert!(plan.validate().is_ok());
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialization support for plan types

pub mod error;
pub mod plan;
pub mod svg_path;

pub use error::{Error, Result};
pub use plan::{Furniture, Level, LevelId, LevelIndex, Plan, PlanPoint, Room, Wall};
pub use svg_path::{parse_path_data, PathCommand};
