// SPDX-License-Identifier: MIT OR Apache-2.0
//! Track definitions for the timeline.

use crate::error::{Result, TimelineError};
use crate::path::{BeatPath, Vec3};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a track
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TrackId(pub Uuid);

impl TrackId {
    /// Create a new random track ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TrackId {
    fn default() -> Self {
        Self::new()
    }
}

/// One audio/level segment with a fixed tempo
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Track {
    /// Unique track ID
    #[serde(default)]
    pub id: TrackId,
    /// Track name
    pub name: String,
    /// Music clip played for this track
    pub clip: String,
    /// Railway ambience clip played alongside the music
    #[serde(default)]
    pub railway_clip: Option<String>,
    /// Total beats in the track
    pub total_beats: f32,
    /// Total duration in seconds
    pub total_seconds: f32,
    /// Beat to local offset mapping
    #[serde(default)]
    pub path: BeatPath,
    /// Whether finishing this track saves a checkpoint
    #[serde(default)]
    pub checkpoint_after_finish: bool,
}

impl Track {
    /// Create a new straight track
    pub fn new(name: impl Into<String>, clip: impl Into<String>, total_beats: f32, total_seconds: f32) -> Self {
        Self {
            id: TrackId::new(),
            name: name.into(),
            clip: clip.into(),
            railway_clip: None,
            total_beats,
            total_seconds,
            path: BeatPath::default(),
            checkpoint_after_finish: false,
        }
    }

    /// Set the beat path
    pub fn with_path(mut self, path: BeatPath) -> Self {
        self.path = path;
        self
    }

    /// Mark the end of this track as a checkpoint
    pub fn with_checkpoint(mut self) -> Self {
        self.checkpoint_after_finish = true;
        self
    }

    /// Set the railway ambience clip
    pub fn with_railway(mut self, clip: impl Into<String>) -> Self {
        self.railway_clip = Some(clip.into());
        self
    }

    /// Tempo in beats per second
    pub fn beats_per_second(&self) -> f32 {
        self.total_beats / self.total_seconds
    }

    /// Beat number reached after `secs` of playback
    pub fn beat_at(&self, secs: f32) -> f32 {
        secs * self.beats_per_second()
    }

    /// Playback seconds needed to reach `beats`
    pub fn beats_to_seconds(&self, beats: f32) -> f32 {
        beats / self.beats_per_second()
    }

    /// Local offset at a beat
    pub fn offset_at_beat(&self, beat: f32) -> Vec3 {
        self.path.offset_at(beat)
    }

    /// Local offset at the end of the track (start of the next one)
    pub fn end_offset(&self) -> Vec3 {
        self.path.offset_at(self.total_beats)
    }

    /// Number of whole beats, used for beat markers
    pub fn whole_beats(&self) -> u32 {
        self.total_beats.floor() as u32
    }

    /// Check the authored values
    pub fn validate(&self) -> Result<()> {
        if !self.total_beats.is_finite() || self.total_beats <= 0.0 {
            return Err(TimelineError::NoBeats {
                name: self.name.clone(),
                beats: self.total_beats,
            });
        }
        if !self.total_seconds.is_finite() || self.total_seconds <= 0.0 {
            return Err(TimelineError::InvalidDuration {
                name: self.name.clone(),
                seconds: self.total_seconds,
            });
        }
        self.path.validate().map_err(|reason| TimelineError::InvalidPath {
            name: self.name.clone(),
            reason,
        })
    }
}
