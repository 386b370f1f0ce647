// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for plan data and path parsing.

use crate::plan::LevelId;

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the plan model and the SVG path parser.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// SVG path data could not be parsed.
    #[error("invalid SVG path data at offset {offset}: {message}")]
    SvgPath { offset: usize, message: String },

    /// An item references a level that is not part of the plan.
    #[error("item references unknown level {0:?}")]
    UnknownLevel(LevelId),

    /// Two levels share the same identifier.
    #[error("duplicate level identifier {0:?}")]
    DuplicateLevel(LevelId),

    /// A caller passed an argument that violates an API precondition.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}
