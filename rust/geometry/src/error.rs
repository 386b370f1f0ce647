// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use thiserror::Error;

/// Result type for geometry operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during ground reconstruction
///
/// Degenerate plan data (too few points, zero area) is never an error:
/// it is dropped from the computation. Only caller defects surface here.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Triangulation failed: {0}")]
    TriangulationError(String),

    #[error("Core error: {0}")]
    CoreError(#[from] home3d_core::Error),
}
