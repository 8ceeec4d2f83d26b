// SPDX-License-Identifier: MIT OR Apache-2.0
//! Train state machine errors.

use thiserror::Error;

/// Errors raised when naming states or moves from text
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TrainError {
    /// No state has this name
    #[error("Unknown train state: {0}")]
    UnknownState(String),

    /// No move has this name
    #[error("Unknown train move: {0}")]
    UnknownMove(String),
}

/// Result type for train operations
pub type Result<T> = std::result::Result<T, TrainError>;
