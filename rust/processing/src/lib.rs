// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Ground rebuild pipeline shared by hosting applications.
//!
//! Loads its settings from the environment, runs the ground builder on a
//! plan snapshot and returns triangulated, serializable fragments.

pub mod config;
pub mod error;
pub mod pipeline;
pub mod types;

pub use config::{parse_extent, Config};
pub use error::{Error, Result};
pub use pipeline::{rebuild_ground, rebuild_ground_json, GroundRebuilder};
pub use types::{FragmentData, FragmentKindData, GroundData, RebuildStats};
