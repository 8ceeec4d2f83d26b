// SPDX-License-Identifier: MIT OR Apache-2.0
//! Audio-driven playback timeline for Railbeat.
//!
//! This crate turns audio playback time into level progression:
//! - Tracks with a fixed tempo and a beat-indexed path
//! - An ordered tracklist with checkpoints
//! - A playback timeline that follows an audio source clock
//! - Track and tracklist completion events
//!
//! ## Architecture
//!
//! The timeline is built on:
//! - Beat paths evaluated in track-local space
//! - A path frame mapping local offsets into the world
//! - An [`AudioSource`] seam so playback can be real or simulated
//! - Queued events drained by the owner each tick

pub mod error;
pub mod path;
pub mod track;
pub mod tracklist;
pub mod source;
pub mod playback;

pub use error::{Result, TimelineError};
pub use path::{BeatKey, BeatPath, Interpolation, PathFrame, Vec3};
pub use track::{Track, TrackId};
pub use tracklist::TrackList;
pub use source::{AudioSource, SimulatedSource};
pub use playback::{PlaybackState, PlaybackTimeline, TimelineConfig, TimelineEvent};
