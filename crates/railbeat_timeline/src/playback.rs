// SPDX-License-Identifier: MIT OR Apache-2.0
//! Audio-driven playback of a tracklist.
//!
//! Position is always re-derived from the audio cursor, never accumulated
//! from frame deltas, so pausing, resuming and restarting cannot drift the
//! train away from the music.

use crate::error::{Result, TimelineError};
use crate::path::{PathFrame, Vec3};
use crate::source::AudioSource;
use crate::track::Track;
use crate::tracklist::TrackList;
use serde::{Deserialize, Serialize};

/// Tuning for track completion detection.
///
/// Both values work around a timer wrap-around seen on some audio
/// backends, where the cursor jumps back to the clip start instead of
/// reaching the clip end. They are environment-specific.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineConfig {
    /// Progress ratio from which a track counts as about to finish
    pub about_to_finish_ratio: f32,
    /// Cursor values below this, seen while about to finish, mean the clip wrapped
    pub glitch_threshold_secs: f32,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            about_to_finish_ratio: 0.8,
            glitch_threshold_secs: 1.5,
        }
    }
}

impl TimelineConfig {
    /// Check the tuning values
    pub fn validate(&self) -> Result<()> {
        if !(self.about_to_finish_ratio > 0.0 && self.about_to_finish_ratio <= 1.0) {
            return Err(TimelineError::InvalidConfig(format!(
                "about_to_finish_ratio must be in (0, 1], got {}",
                self.about_to_finish_ratio
            )));
        }
        if !self.glitch_threshold_secs.is_finite() || self.glitch_threshold_secs < 0.0 {
            return Err(TimelineError::InvalidConfig(format!(
                "glitch_threshold_secs must be non-negative, got {}",
                self.glitch_threshold_secs
            )));
        }
        Ok(())
    }
}

/// Signals raised by the timeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimelineEvent {
    /// A track finished and the next one started
    TrackFinished(usize),
    /// The final track finished
    TracklistFinished,
}

/// Snapshot of where playback is
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PlaybackState {
    /// Index of the playing track
    pub track_idx: usize,
    /// Seconds elapsed within the track, as last observed
    pub elapsed: f32,
    /// Whether the track is past the about-to-finish ratio
    pub about_to_finish: bool,
    /// Whether the whole tracklist has finished
    pub finished: bool,
    /// Whether playback is paused
    pub paused: bool,
}

/// Playback timeline following an audio source
pub struct PlaybackTimeline<S: AudioSource> {
    /// Tracks in playback order
    tracks: TrackList,
    /// Completion tuning
    config: TimelineConfig,
    /// Where the run starts and which way it goes
    frame: PathFrame,
    /// Music channel, used as the clock
    music: S,
    /// Railway ambience channel, kept in step with the music
    railway: Option<S>,
    /// Current playback state
    state: PlaybackState,
    /// Whether any track has been started
    started: bool,
    /// Events raised since the last drain
    pending_events: Vec<TimelineEvent>,
}

impl<S: AudioSource> PlaybackTimeline<S> {
    /// Create a timeline; nothing plays until [`Self::restart`].
    ///
    /// Every music clip must be known to `music`.
    pub fn new(tracks: TrackList, config: TimelineConfig, frame: PathFrame, music: S) -> Result<Self> {
        config.validate()?;
        for track in tracks.tracks() {
            check_clip(&music, &track.name, &track.clip)?;
        }

        Ok(Self {
            tracks,
            config,
            frame,
            music,
            railway: None,
            state: PlaybackState::default(),
            started: false,
            pending_events: Vec::new(),
        })
    }

    /// Attach a railway ambience source knowing every railway clip
    pub fn with_railway(mut self, railway: S) -> Result<Self> {
        for track in self.tracks.tracks() {
            if let Some(clip) = &track.railway_clip {
                check_clip(&railway, &track.name, clip)?;
            }
        }
        self.railway = Some(railway);
        Ok(self)
    }

    /// Start playback at a global beat offset.
    ///
    /// Negative offsets wrap from the end of the tracklist.
    pub fn restart(&mut self, beat_offset: f32) -> Result<()> {
        let (idx, beat) = self.tracks.locate_beat(beat_offset)?;
        let secs = self.tracks[idx].beats_to_seconds(beat);
        tracing::info!("Timeline restart at beat {beat_offset}: track {idx}, beat {beat}, {secs:.3}s");
        self.start_track(idx, secs);
        Ok(())
    }

    /// Resume at the track after the last checkpoint passed, or the first track.
    ///
    /// Returns the index playback resumed at.
    pub fn restart_from_last_checkpoint(&mut self) -> usize {
        let idx = self.tracks.checkpoint_resume_index(self.state.track_idx);
        tracing::info!("Timeline restart from checkpoint: track {idx}");
        self.start_track(idx, 0.0);
        idx
    }

    /// Advance the sources by `delta_secs` and check for track completion
    pub fn tick(&mut self, delta_secs: f32) {
        if !self.started || self.state.finished || self.state.paused {
            return;
        }

        self.music.advance(delta_secs);
        if let Some(railway) = self.railway.as_mut() {
            railway.advance(delta_secs);
        }

        let time = self.music.time();

        // Cursor snapped back to the start while the clip was ending
        let glitched = self.state.about_to_finish
            && time < self.config.glitch_threshold_secs
            && time < self.state.elapsed;
        if glitched {
            tracing::warn!(
                "Timeline: track {} cursor wrapped from {:.3}s to {time:.3}s, treating as finished",
                self.state.track_idx,
                self.state.elapsed
            );
        }

        self.state.elapsed = time;
        self.update_about_to_finish();

        let done = time >= self.music.clip_length();
        if done || glitched {
            self.complete_track();
        }
    }

    /// Freeze or unfreeze playback without touching the cursor
    pub fn pause(&mut self, paused: bool) {
        if self.state.paused == paused {
            return;
        }

        tracing::info!("Timeline {}", if paused { "paused" } else { "resumed" });
        self.state.paused = paused;
        if paused {
            self.music.pause();
            if let Some(railway) = self.railway.as_mut() {
                railway.pause();
            }
        } else {
            self.music.resume();
            if let Some(railway) = self.railway.as_mut() {
                railway.resume();
            }
        }
    }

    /// World position for the current audio cursor
    pub fn position(&self) -> Vec3 {
        let secs = if self.state.finished {
            self.current_track().total_seconds
        } else {
            self.music.time()
        };
        self.position_at(secs)
    }

    /// World position after `track_secs` within the current track.
    ///
    /// The time is clamped to the track duration.
    pub fn position_at(&self, track_secs: f32) -> Vec3 {
        let track = self.current_track();
        let secs = track_secs.clamp(0.0, track.total_seconds);
        self.tracks.beat_position(&self.frame, self.state.track_idx, secs)
    }

    /// Seconds since the start of the tracklist
    pub fn global_elapsed_secs(&self) -> f32 {
        let current = if self.state.finished {
            self.current_track().total_seconds
        } else {
            self.music.time()
        };
        self.tracks.seconds_before(self.state.track_idx) + current
    }

    /// Beats since the start of the tracklist
    pub fn global_beat(&self) -> f32 {
        let track = self.current_track();
        let secs = if self.state.finished {
            track.total_seconds
        } else {
            self.music.time().clamp(0.0, track.total_seconds)
        };
        self.tracks.beats_before(self.state.track_idx) + track.beat_at(secs)
    }

    /// World position of every whole beat
    pub fn beat_positions(&self) -> Vec<Vec3> {
        self.tracks.beat_positions(&self.frame)
    }

    /// World position where each track starts
    pub fn track_start_positions(&self) -> Vec<Vec3> {
        self.tracks.track_start_positions(&self.frame)
    }

    /// World position where each track ends
    pub fn track_end_positions(&self) -> Vec<Vec3> {
        self.tracks.track_end_positions(&self.frame)
    }

    /// Get pending events and clear them
    pub fn take_events(&mut self) -> Vec<TimelineEvent> {
        std::mem::take(&mut self.pending_events)
    }

    /// Current playback state
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Index of the playing track
    pub fn track_index(&self) -> usize {
        self.state.track_idx
    }

    /// The playing track
    pub fn current_track(&self) -> &Track {
        &self.tracks[self.state.track_idx]
    }

    /// Whether the final track has finished
    pub fn is_finished(&self) -> bool {
        self.state.finished
    }

    /// Whether any track has been started
    pub fn is_started(&self) -> bool {
        self.started
    }

    /// The tracklist
    pub fn tracks(&self) -> &TrackList {
        &self.tracks
    }

    /// The completion tuning
    pub fn config(&self) -> &TimelineConfig {
        &self.config
    }

    /// The path frame
    pub fn frame(&self) -> &PathFrame {
        &self.frame
    }

    /// The music source
    pub fn music(&self) -> &S {
        &self.music
    }

    /// The music source, mutably
    pub fn music_mut(&mut self) -> &mut S {
        &mut self.music
    }

    /// The railway source
    pub fn railway(&self) -> Option<&S> {
        self.railway.as_ref()
    }

    fn start_track(&mut self, idx: usize, secs: f32) {
        tracing::debug!("Timeline start track {idx} at {secs:.3}s");
        let track = &self.tracks[idx];

        self.music.play(&track.clip, secs);
        if let Some(railway) = self.railway.as_mut() {
            match &track.railway_clip {
                Some(clip) => railway.play(clip, secs),
                None => railway.stop(),
            }
        }

        self.state = PlaybackState {
            track_idx: idx,
            elapsed: self.music.time(),
            about_to_finish: false,
            finished: false,
            paused: false,
        };
        self.started = true;
        self.update_about_to_finish();
    }

    fn complete_track(&mut self) {
        let idx = self.state.track_idx;

        if idx == self.tracks.last_index() {
            tracing::info!("Timeline: last track {idx} finished");
            self.state.finished = true;
            self.state.elapsed = self.current_track().total_seconds;
            self.pending_events.push(TimelineEvent::TracklistFinished);
        } else {
            tracing::info!("Timeline: track {idx} finished ({idx} -> {})", idx + 1);
            self.pending_events.push(TimelineEvent::TrackFinished(idx));
            self.start_track(idx + 1, 0.0);
        }
    }

    fn update_about_to_finish(&mut self) {
        let length = self.music.clip_length();
        let progress = if length > 0.0 { self.music.time() / length } else { 1.0 };
        self.state.about_to_finish = progress >= self.config.about_to_finish_ratio;
    }
}

fn check_clip(source: &impl AudioSource, track: &str, clip: &str) -> Result<()> {
    if source.has_clip(clip) {
        Ok(())
    } else {
        Err(TimelineError::UnknownClip {
            track: track.to_string(),
            clip: clip.to_string(),
        })
    }
}
