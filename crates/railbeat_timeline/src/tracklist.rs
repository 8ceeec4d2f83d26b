// SPDX-License-Identifier: MIT OR Apache-2.0
//! Ordered tracklist making up a full run.

use crate::error::{Result, TimelineError};
use crate::path::{Interpolation, PathFrame, Vec3};
use crate::track::{Track, TrackId};
use indexmap::IndexMap;

/// Ordered sequence of tracks; insertion order is playback order
#[derive(Debug, Clone)]
pub struct TrackList {
    tracks: IndexMap<TrackId, Track>,
}

impl TrackList {
    /// Build a tracklist, validating every track
    pub fn new(tracks: impl IntoIterator<Item = Track>) -> Result<Self> {
        let mut map = IndexMap::new();
        for track in tracks {
            track.validate()?;
            if map.contains_key(&track.id) {
                return Err(TimelineError::DuplicateTrack { name: track.name });
            }
            map.insert(track.id, track);
        }

        if map.is_empty() {
            return Err(TimelineError::EmptyTracklist);
        }

        Ok(Self { tracks: map })
    }

    /// Get track count
    pub fn track_count(&self) -> usize {
        self.tracks.len()
    }

    /// Index of the final track
    pub fn last_index(&self) -> usize {
        self.tracks.len() - 1
    }

    /// Get a track by playback index
    pub fn track(&self, idx: usize) -> Option<&Track> {
        self.tracks.get_index(idx).map(|(_, t)| t)
    }

    /// Get a track by ID
    pub fn track_by_id(&self, id: TrackId) -> Option<&Track> {
        self.tracks.get(&id)
    }

    /// Playback index of a track
    pub fn index_of(&self, id: TrackId) -> Option<usize> {
        self.tracks.get_index_of(&id)
    }

    /// Get all tracks in playback order
    pub fn tracks(&self) -> impl Iterator<Item = &Track> {
        self.tracks.values()
    }

    /// Beats across the whole tracklist
    pub fn total_beats(&self) -> f32 {
        self.tracks.values().map(|t| t.total_beats).sum()
    }

    /// Seconds across the whole tracklist
    pub fn total_seconds(&self) -> f32 {
        self.tracks.values().map(|t| t.total_seconds).sum()
    }

    /// Resolve a global beat to `(track index, beat within track)`.
    ///
    /// Negative offsets count back from the end of the tracklist.
    pub fn locate_beat(&self, global_beat: f32) -> Result<(usize, f32)> {
        let total = self.total_beats();
        let beat = if global_beat < 0.0 { total + global_beat } else { global_beat };

        if !(0.0..total).contains(&beat) {
            return Err(TimelineError::BeatOutOfRange {
                offset: global_beat,
                total,
            });
        }

        let mut remaining = beat;
        for (idx, track) in self.tracks.values().enumerate() {
            if remaining < track.total_beats {
                return Ok((idx, remaining));
            }
            remaining -= track.total_beats;
        }

        // Rounding residue from the subtraction chain lands on the last track
        let last = self.last_index();
        let last_beats = self.tracks[last].total_beats;
        Ok((last, remaining.min(last_beats)))
    }

    /// Index to resume at after a death on track `current`.
    ///
    /// Only tracks strictly before `current` count; the resume point is the
    /// track right after the last checkpoint, or the first track.
    pub fn checkpoint_resume_index(&self, current: usize) -> usize {
        self.tracks
            .values()
            .take(current)
            .enumerate()
            .filter(|(_, t)| t.checkpoint_after_finish)
            .last()
            .map_or(0, |(i, _)| i + 1)
    }

    /// Seconds of all tracks strictly before `idx`
    pub fn seconds_before(&self, idx: usize) -> f32 {
        self.tracks.values().take(idx).map(|t| t.total_seconds).sum()
    }

    /// Beats of all tracks strictly before `idx`
    pub fn beats_before(&self, idx: usize) -> f32 {
        self.tracks.values().take(idx).map(|t| t.total_beats).sum()
    }

    /// Local offset where track `idx` starts
    pub fn offset_before(&self, idx: usize) -> Vec3 {
        self.tracks
            .values()
            .take(idx)
            .fold([0.0; 3], |sum, t| Interpolation::add(sum, t.end_offset()))
    }

    /// Local offset after `track_secs` of playback in track `idx`
    pub fn local_offset(&self, idx: usize, track_secs: f32) -> Vec3 {
        let Some(track) = self.track(idx) else {
            return self.offset_before(self.track_count());
        };
        let beat = track.beat_at(track_secs);
        Interpolation::add(self.offset_before(idx), track.offset_at_beat(beat))
    }

    /// World position after `track_secs` of playback in track `idx`
    pub fn beat_position(&self, frame: &PathFrame, idx: usize, track_secs: f32) -> Vec3 {
        frame.to_world(self.local_offset(idx, track_secs))
    }

    /// World position of every whole beat in the run
    pub fn beat_positions(&self, frame: &PathFrame) -> Vec<Vec3> {
        let mut positions = Vec::new();
        let mut offset = [0.0; 3];
        for track in self.tracks.values() {
            for beat in 0..track.whole_beats() {
                let local = Interpolation::add(offset, track.offset_at_beat(beat as f32));
                positions.push(frame.to_world(local));
            }
            offset = Interpolation::add(offset, track.end_offset());
        }
        positions
    }

    /// World position where each track starts
    pub fn track_start_positions(&self, frame: &PathFrame) -> Vec<Vec3> {
        (0..self.track_count())
            .map(|idx| frame.to_world(self.offset_before(idx)))
            .collect()
    }

    /// World position where each track ends
    pub fn track_end_positions(&self, frame: &PathFrame) -> Vec<Vec3> {
        (1..=self.track_count())
            .map(|idx| frame.to_world(self.offset_before(idx)))
            .collect()
    }
}

impl std::ops::Index<usize> for TrackList {
    type Output = Track;

    fn index(&self, idx: usize) -> &Track {
        &self.tracks[idx]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::{BeatKey, BeatPath};

    fn two_tracks() -> TrackList {
        TrackList::new([
            Track::new("TrackA", "a.ogg", 30.0, 10.0),
            Track::new("TrackB", "b.ogg", 20.0, 8.0),
        ])
        .unwrap()
    }

    #[test]
    fn test_empty_tracklist_rejected() {
        assert_eq!(TrackList::new([]).unwrap_err(), TimelineError::EmptyTracklist);
    }

    #[test]
    fn test_invalid_track_rejected() {
        let result = TrackList::new([Track::new("bad", "a", 0.0, 1.0)]);
        assert!(matches!(result, Err(TimelineError::NoBeats { .. })));
    }

    #[test]
    fn test_duplicate_track_rejected() {
        let repeated = Track::new("loop", "loop.ogg", 4.0, 2.0);
        let result = TrackList::new([repeated.clone(), Track::new("mid", "mid.ogg", 8.0, 4.0), repeated]);
        assert_eq!(result.unwrap_err(), TimelineError::DuplicateTrack { name: "loop".into() });
    }

    #[test]
    fn test_locate_beat_scenario() {
        let list = two_tracks();
        assert_eq!(list.locate_beat(25.0).unwrap(), (0, 25.0));
        assert_eq!(list.locate_beat(-5.0).unwrap(), (1, 15.0));
        assert_eq!(list.locate_beat(30.0).unwrap(), (1, 0.0));
        assert_eq!(list.locate_beat(0.0).unwrap(), (0, 0.0));
    }

    #[test]
    fn test_negative_offset_matches_wrapped_offset() {
        let list = two_tracks();
        let total = list.total_beats();
        for offset in [-1.0, -12.5, -20.0, -33.0, -50.0] {
            assert_eq!(list.locate_beat(offset).unwrap(), list.locate_beat(total + offset).unwrap());
        }
    }

    #[test]
    fn test_locate_beat_out_of_range() {
        let list = two_tracks();
        assert!(matches!(list.locate_beat(50.0), Err(TimelineError::BeatOutOfRange { .. })));
        assert!(matches!(list.locate_beat(-51.0), Err(TimelineError::BeatOutOfRange { .. })));
    }

    #[test]
    fn test_checkpoint_resume_index() {
        let list = TrackList::new([
            Track::new("0", "0", 4.0, 2.0).with_checkpoint(),
            Track::new("1", "1", 4.0, 2.0),
            Track::new("2", "2", 4.0, 2.0).with_checkpoint(),
            Track::new("3", "3", 4.0, 2.0),
        ])
        .unwrap();

        assert_eq!(list.checkpoint_resume_index(0), 0);
        assert_eq!(list.checkpoint_resume_index(1), 1);
        assert_eq!(list.checkpoint_resume_index(2), 1);
        assert_eq!(list.checkpoint_resume_index(3), 3);
    }

    #[test]
    fn test_tracks_are_contiguous() {
        let list = TrackList::new([
            Track::new("bend", "a", 4.0, 2.0).with_path(BeatPath::Keyed(vec![
                BeatKey::new(0.0, [0.0; 3]),
                BeatKey::new(4.0, [2.0, 0.0, 4.0]),
            ])),
            Track::new("straight", "b", 10.0, 5.0),
        ])
        .unwrap();
        let frame = PathFrame::default();

        let end_of_first = list.beat_position(&frame, 0, 2.0);
        let start_of_second = list.beat_position(&frame, 1, 0.0);
        assert_eq!(end_of_first, start_of_second);
        assert_eq!(list.track_end_positions(&frame), vec![[2.0, 0.0, 4.0], [2.0, 0.0, 14.0]]);
        assert_eq!(list.track_start_positions(&frame), vec![[0.0; 3], [2.0, 0.0, 4.0]]);
    }

    #[test]
    fn test_beat_markers() {
        let list = two_tracks();
        let markers = list.beat_positions(&PathFrame::default());
        assert_eq!(markers.len(), 50);
        assert_eq!(markers[30], [0.0, 0.0, 30.0]);
        assert_eq!(markers[49], [0.0, 0.0, 49.0]);
    }

    #[test]
    fn test_seconds_before() {
        let list = two_tracks();
        assert_eq!(list.seconds_before(0), 0.0);
        assert_eq!(list.seconds_before(1), 10.0);
        assert_eq!(list.total_seconds(), 18.0);
        assert_eq!(list.beats_before(1), 30.0);
    }
}
