// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the rebuild pipeline.

use thiserror::Error;

/// Result type for pipeline operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Pipeline error types.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Plan error: {0}")]
    Core(#[from] home3d_core::Error),

    #[error("Geometry error: {0}")]
    Geometry(#[from] home3d_geometry::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
