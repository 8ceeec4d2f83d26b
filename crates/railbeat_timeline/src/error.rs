// SPDX-License-Identifier: MIT OR Apache-2.0
//! Timeline configuration errors.

use thiserror::Error;

/// Errors raised while building or seeking a timeline
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TimelineError {
    /// The tracklist has no tracks
    #[error("Tracklist is empty")]
    EmptyTracklist,

    /// Two tracks share an id
    #[error("Track '{name}' appears more than once (duplicate id)")]
    DuplicateTrack {
        /// Name of the repeated track
        name: String,
    },

    /// A clip named by a track is not known to the audio source
    #[error("Track '{track}' uses unknown clip '{clip}'")]
    UnknownClip {
        /// Track name
        track: String,
        /// Clip name
        clip: String,
    },

    /// A track has no beats
    #[error("Track '{name}' has no beats ({beats})")]
    NoBeats {
        /// Track name
        name: String,
        /// Authored beat count
        beats: f32,
    },

    /// A track has a zero, negative or non-finite duration
    #[error("Track '{name}' has invalid duration {seconds}s")]
    InvalidDuration {
        /// Track name
        name: String,
        /// Authored duration
        seconds: f32,
    },

    /// A track's beat path is malformed
    #[error("Track '{name}' has an invalid beat path: {reason}")]
    InvalidPath {
        /// Track name
        name: String,
        /// What is wrong with the path
        reason: String,
    },

    /// A global beat offset does not land inside the tracklist
    #[error("Beat offset {offset} is outside the tracklist ({total} beats)")]
    BeatOutOfRange {
        /// Requested offset
        offset: f32,
        /// Total beats in the tracklist
        total: f32,
    },

    /// Timeline tuning values are out of range
    #[error("Invalid timeline config: {0}")]
    InvalidConfig(String),
}

/// Result type for timeline operations
pub type Result<T> = std::result::Result<T, TimelineError>;
