// SPDX-License-Identifier: MIT OR Apache-2.0
//! Obstacles placed on the global beat line.

use railbeat_train::{MoveCue, ObstacleResolver, TrainMove};
use serde::{Deserialize, Serialize};

fn default_window() -> f32 {
    0.5
}

/// One obstacle as written in a level file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObstacleSpec {
    /// Name, used in logs and miss reports
    pub name: String,
    /// Global beat the train reaches the obstacle at
    pub beat: f32,
    /// Move that gets past it
    pub clears_with: TrainMove,
    /// Cue handed back to the train when cleared
    #[serde(default)]
    pub cue: Option<String>,
    /// Beats either side of `beat` the move is accepted
    #[serde(default = "default_window")]
    pub window_beats: f32,
}

impl ObstacleSpec {
    /// Obstacle with the default window and no cue
    pub fn new(name: impl Into<String>, beat: f32, clears_with: TrainMove) -> Self {
        Self {
            name: name.into(),
            beat,
            clears_with,
            cue: None,
            window_beats: default_window(),
        }
    }

    /// Attach a cue
    pub fn with_cue(mut self, cue: impl Into<String>) -> Self {
        self.cue = Some(cue.into());
        self
    }

    fn accepts_at(&self, beat: f32) -> bool {
        (beat - self.beat).abs() <= self.window_beats
    }

    fn passed_at(&self, beat: f32) -> bool {
        beat > self.beat + self.window_beats
    }
}

/// Progress on a single obstacle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ObstacleStatus {
    /// Not reached or still in its window
    #[default]
    Pending,
    /// Got past with the right move
    Cleared,
    /// Window passed without the right move
    Missed,
    /// Behind the beat a run started at
    Skipped,
}

/// Every obstacle of a level, with their status
#[derive(Debug, Clone, Default)]
pub struct ObstacleCourse {
    obstacles: Vec<(ObstacleSpec, ObstacleStatus)>,
    beat: f32,
}

impl ObstacleCourse {
    /// Build a course, ordered by beat
    pub fn new(specs: impl IntoIterator<Item = ObstacleSpec>) -> Self {
        let mut obstacles: Vec<_> = specs.into_iter().map(|s| (s, ObstacleStatus::Pending)).collect();
        obstacles.sort_by(|a, b| a.0.beat.total_cmp(&b.0.beat));
        Self { obstacles, beat: 0.0 }
    }

    /// Move the train to `global_beat`; returns obstacles missed by this step
    pub fn set_beat(&mut self, global_beat: f32) -> Vec<String> {
        self.beat = global_beat;

        let mut missed = Vec::new();
        for (spec, status) in &mut self.obstacles {
            if *status == ObstacleStatus::Pending && spec.passed_at(global_beat) {
                *status = ObstacleStatus::Missed;
                tracing::debug!("Missed obstacle '{}' at beat {:.2}", spec.name, global_beat);
                missed.push(spec.name.clone());
            }
        }
        missed
    }

    /// Make every obstacle from `global_beat` onwards pending again
    pub fn reset_from(&mut self, global_beat: f32) {
        self.beat = global_beat;
        for (spec, status) in &mut self.obstacles {
            if spec.beat + spec.window_beats >= global_beat {
                *status = ObstacleStatus::Pending;
            }
        }
    }

    /// Fresh run starting at `global_beat`; obstacles already behind it are skipped
    pub fn restart_at(&mut self, global_beat: f32) {
        self.beat = global_beat;
        for (spec, status) in &mut self.obstacles {
            *status = if spec.passed_at(global_beat) {
                ObstacleStatus::Skipped
            } else {
                ObstacleStatus::Pending
            };
        }
    }

    /// Status of the named obstacle
    pub fn status(&self, name: &str) -> Option<ObstacleStatus> {
        self.obstacles.iter().find(|(s, _)| s.name == name).map(|(_, st)| *st)
    }

    /// Number of obstacles with `status`
    pub fn count(&self, status: ObstacleStatus) -> usize {
        self.obstacles.iter().filter(|(_, st)| *st == status).count()
    }

    /// Number of obstacles
    pub fn len(&self) -> usize {
        self.obstacles.len()
    }

    /// Whether the course has no obstacles
    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }
}

impl ObstacleResolver for ObstacleCourse {
    fn resolve(&mut self, mv: TrainMove) -> Option<MoveCue> {
        let beat = self.beat;
        let (spec, status) = self
            .obstacles
            .iter_mut()
            .find(|(s, st)| *st == ObstacleStatus::Pending && s.clears_with == mv && s.accepts_at(beat))?;

        *status = ObstacleStatus::Cleared;
        tracing::debug!("Cleared obstacle '{}' with {} at beat {:.2}", spec.name, mv.name(), beat);
        spec.cue.as_deref().map(MoveCue::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn course() -> ObstacleCourse {
        ObstacleCourse::new(vec![
            ObstacleSpec::new("cow", 8.0, TrainMove::Honk).with_cue("cow_flee"),
            ObstacleSpec::new("log", 4.0, TrainMove::Jump),
        ])
    }

    #[test]
    fn test_clear_in_window() {
        let mut course = course();
        course.set_beat(7.7);
        assert_eq!(course.resolve(TrainMove::Jump), None);
        assert_eq!(course.resolve(TrainMove::Honk), Some(MoveCue::new("cow_flee")));
        assert_eq!(course.status("cow"), Some(ObstacleStatus::Cleared));

        // Already cleared
        assert_eq!(course.resolve(TrainMove::Honk), None);
    }

    #[test]
    fn test_clear_without_cue() {
        let mut course = course();
        course.set_beat(4.2);
        assert_eq!(course.resolve(TrainMove::Jump), None);
        assert_eq!(course.status("log"), Some(ObstacleStatus::Cleared));
    }

    #[test]
    fn test_too_early() {
        let mut course = course();
        course.set_beat(2.0);
        course.resolve(TrainMove::Jump);
        assert_eq!(course.status("log"), Some(ObstacleStatus::Pending));
    }

    #[test]
    fn test_miss_reported_once() {
        let mut course = course();
        assert!(course.set_beat(4.4).is_empty());
        assert_eq!(course.set_beat(4.6), vec!["log".to_string()]);
        assert!(course.set_beat(5.0).is_empty());
        assert_eq!(course.count(ObstacleStatus::Missed), 1);
    }

    #[test]
    fn test_reset_from_checkpoint() {
        let mut course = course();
        course.set_beat(4.2);
        course.resolve(TrainMove::Jump);
        course.set_beat(9.0);
        assert_eq!(course.status("cow"), Some(ObstacleStatus::Missed));

        course.reset_from(6.0);
        assert_eq!(course.status("cow"), Some(ObstacleStatus::Pending));
        assert_eq!(course.status("log"), Some(ObstacleStatus::Cleared));

        course.restart_at(0.0);
        assert_eq!(course.count(ObstacleStatus::Pending), 2);
    }

    #[test]
    fn test_restart_past_obstacles() {
        let mut course = course();
        course.restart_at(6.0);
        assert_eq!(course.status("log"), Some(ObstacleStatus::Skipped));
        assert_eq!(course.status("cow"), Some(ObstacleStatus::Pending));
        assert!(course.set_beat(6.5).is_empty());
    }

    #[test]
    fn test_spec_ron_defaults() {
        let spec: ObstacleSpec = ron::from_str("(name: \"gate\", beat: 12.0, clears_with: Duck)").unwrap();
        assert_eq!(spec.window_beats, 0.5);
        assert_eq!(spec.cue, None);
    }
}
