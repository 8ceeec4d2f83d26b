// SPDX-License-Identifier: MIT OR Apache-2.0
//! Audio source seam used as the timeline clock.
//!
//! The timeline never keeps its own clock: every position it reports is
//! derived from [`AudioSource::time`]. A real backend advances on its own;
//! [`SimulatedSource`] advances only when ticked, which keeps headless runs
//! and tests deterministic.

use crate::tracklist::TrackList;
use std::collections::HashMap;

/// Playback primitive for one audio channel
pub trait AudioSource {
    /// Stop whatever is playing and play `clip` from `offset_secs`
    fn play(&mut self, clip: &str, offset_secs: f32);

    /// Stop playback
    fn stop(&mut self);

    /// Pause playback, keeping the cursor
    fn pause(&mut self);

    /// Resume paused playback
    fn resume(&mut self);

    /// Current playback cursor in seconds
    fn time(&self) -> f32;

    /// Length of the loaded clip in seconds
    fn clip_length(&self) -> f32;

    /// Whether `clip` can be played.
    ///
    /// Backends that load lazily report every clip as available.
    fn has_clip(&self, _clip: &str) -> bool {
        true
    }

    /// Give the source a chance to advance by `delta_secs` of game time.
    ///
    /// Backends with their own clock ignore this.
    fn advance(&mut self, _delta_secs: f32) {}
}

/// Deterministic audio source driven by game time
#[derive(Debug, Clone, Default)]
pub struct SimulatedSource {
    /// Known clip lengths by clip name
    lengths: HashMap<String, f32>,
    /// Loaded clip
    clip: Option<String>,
    /// Loaded clip length
    length: f32,
    /// Playback cursor
    time: f32,
    /// Whether the clip is playing
    playing: bool,
    /// Whether playback is paused
    paused: bool,
    /// Wrap the cursor back to the start at the clip end
    wrap_at_end: bool,
}

impl SimulatedSource {
    /// Create a source with a table of clip lengths
    pub fn new(lengths: impl IntoIterator<Item = (String, f32)>) -> Self {
        Self {
            lengths: lengths.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Create a source knowing every music and railway clip of a tracklist
    pub fn for_tracklist(tracks: &TrackList) -> Self {
        let mut lengths = HashMap::new();
        for track in tracks.tracks() {
            lengths.insert(track.clip.clone(), track.total_seconds);
            if let Some(railway) = &track.railway_clip {
                lengths.insert(railway.clone(), track.total_seconds);
            }
        }
        Self { lengths, ..Self::default() }
    }

    /// Reproduce the timer wrap-around some platforms show at clip end
    pub fn with_wrap_at_end(mut self, wrap: bool) -> Self {
        self.wrap_at_end = wrap;
        self
    }

    /// Name of the loaded clip
    pub fn clip(&self) -> Option<&str> {
        self.clip.as_deref()
    }

    /// Whether the clip is playing (not stopped, not paused)
    pub fn is_playing(&self) -> bool {
        self.playing && !self.paused
    }

    /// Whether playback is paused
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Move the cursor directly
    pub fn seek(&mut self, secs: f32) {
        self.time = secs.clamp(0.0, self.length);
    }
}

impl AudioSource for SimulatedSource {
    fn play(&mut self, clip: &str, offset_secs: f32) {
        let length = match self.lengths.get(clip) {
            Some(length) => *length,
            None => {
                tracing::error!("SimulatedSource: unknown clip '{clip}'");
                0.0
            }
        };
        self.clip = Some(clip.to_string());
        self.length = length;
        self.time = offset_secs.clamp(0.0, length);
        self.playing = true;
        self.paused = false;
    }

    fn stop(&mut self) {
        self.playing = false;
        self.paused = false;
        self.time = 0.0;
    }

    fn pause(&mut self) {
        if self.playing {
            self.paused = true;
        }
    }

    fn resume(&mut self) {
        self.paused = false;
    }

    fn time(&self) -> f32 {
        self.time
    }

    fn clip_length(&self) -> f32 {
        self.length
    }

    fn has_clip(&self, clip: &str) -> bool {
        self.lengths.contains_key(clip)
    }

    fn advance(&mut self, delta_secs: f32) {
        if !self.is_playing() {
            return;
        }

        self.time += delta_secs;
        if self.time >= self.length {
            if self.wrap_at_end && self.length > 0.0 {
                self.time -= self.length;
            } else {
                self.time = self.length;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source() -> SimulatedSource {
        SimulatedSource::new([("loop.ogg".to_string(), 4.0)])
    }

    #[test]
    fn test_play_and_advance() {
        let mut src = source();
        src.play("loop.ogg", 1.0);
        src.advance(0.5);
        assert_eq!(src.time(), 1.5);
        assert_eq!(src.clip_length(), 4.0);
        assert_eq!(src.clip(), Some("loop.ogg"));
    }

    #[test]
    fn test_clamps_at_end() {
        let mut src = source();
        src.play("loop.ogg", 3.5);
        src.advance(1.0);
        assert_eq!(src.time(), 4.0);
    }

    #[test]
    fn test_wraps_when_glitching() {
        let mut src = source().with_wrap_at_end(true);
        src.play("loop.ogg", 3.5);
        src.advance(0.75);
        assert!((src.time() - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_pause_freezes_cursor() {
        let mut src = source();
        src.play("loop.ogg", 0.0);
        src.pause();
        src.advance(1.0);
        assert_eq!(src.time(), 0.0);
        src.resume();
        src.advance(1.0);
        assert_eq!(src.time(), 1.0);
    }

    #[test]
    fn test_unknown_clip_has_no_length() {
        let mut src = source();
        assert!(!src.has_clip("missing.ogg"));
        assert!(src.has_clip("loop.ogg"));
        src.play("missing.ogg", 2.0);
        assert_eq!(src.clip_length(), 0.0);
        assert_eq!(src.time(), 0.0);
    }
}
