// SPDX-License-Identifier: MIT OR Apache-2.0
//! Train controller owning the active state.

use crate::moves::{MoveInput, TrainMove};
use crate::obstacle::{MoveCue, ObstacleResolver};
use crate::state::{StateTimings, TrainStateKind};
use crate::transition;

/// Output of the state machine, drained by the host each tick
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrainEvent {
    /// The active state changed
    StateChanged {
        /// Previous state
        from: TrainStateKind,
        /// New state
        to: TrainStateKind,
        /// Animation trigger of the new state
        anim_trigger: Option<&'static str>,
        /// Cue supplied by the obstacle, if any
        cue: Option<MoveCue>,
    },
    /// Play the sound for a move
    PlaySfx(TrainMove),
}

/// Owns the active train state and its timer
#[derive(Debug, Clone)]
pub struct TrainController {
    /// Active state
    state: TrainStateKind,
    /// Durations of the timed states
    timings: StateTimings,
    /// Seconds since the active state was entered
    time_in_state: f32,
    /// Events raised since the last drain
    pending_events: Vec<TrainEvent>,
}

impl TrainController {
    /// Create a controller driving, with no events queued
    pub fn new(timings: StateTimings) -> Self {
        Self {
            state: TrainStateKind::Drive,
            timings,
            time_in_state: 0.0,
            pending_events: Vec::new(),
        }
    }

    /// Run one tick of the state machine.
    ///
    /// Timed exits are checked before input, so an expired jump lands even
    /// if a key went down on the same tick.
    pub fn update(&mut self, delta_secs: f32, input: &impl MoveInput, obstacles: &mut impl ObstacleResolver) {
        self.time_in_state += delta_secs;

        if let Some(exit) = self.state.auto_exit(&self.timings) {
            if self.time_in_state >= exit.duration {
                self.transition(exit.successor, None);
                return;
            }
        }

        let Some(rule) = transition::next_transition(self.state, input) else {
            return;
        };

        let cue = rule.attempted_move().and_then(|mv| obstacles.resolve(mv));
        self.transition(rule.target, cue);
    }

    /// Enter `target`, queueing its animation trigger and move sound
    pub fn transition(&mut self, target: TrainStateKind, cue: Option<MoveCue>) {
        let from = self.state;
        tracing::debug!("Train: {} -> {} (cue: {:?})", from.name(), target.name(), cue.as_ref().map(|c| &c.name));

        self.state = target;
        self.time_in_state = 0.0;
        self.pending_events.push(TrainEvent::StateChanged {
            from,
            to: target,
            anim_trigger: target.anim_trigger(),
            cue,
        });

        if let Some(mv) = target.move_tag() {
            self.pending_events.push(TrainEvent::PlaySfx(mv));
        }
    }

    /// Back to driving with a clean timer, as after a checkpoint restart
    pub fn reset(&mut self) {
        self.transition(TrainStateKind::Drive, None);
    }

    /// Get pending events and clear them
    pub fn take_events(&mut self) -> Vec<TrainEvent> {
        std::mem::take(&mut self.pending_events)
    }

    /// Active state
    pub fn state(&self) -> TrainStateKind {
        self.state
    }

    /// Seconds since the active state was entered
    pub fn time_in_state(&self) -> f32 {
        self.time_in_state
    }

    /// Durations of the timed states
    pub fn timings(&self) -> &StateTimings {
        &self.timings
    }
}

impl Default for TrainController {
    fn default() -> Self {
        Self::new(StateTimings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::moves::InputFrame;
    use crate::obstacle::NoObstacles;

    /// Resolver that records every consultation and hands out a fixed cue
    struct RecordingObstacle {
        asked: Vec<TrainMove>,
        cue: Option<MoveCue>,
    }

    impl ObstacleResolver for RecordingObstacle {
        fn resolve(&mut self, mv: TrainMove) -> Option<MoveCue> {
            self.asked.push(mv);
            self.cue.clone()
        }
    }

    fn sfx_count(events: &[TrainEvent]) -> usize {
        events.iter().filter(|e| matches!(e, TrainEvent::PlaySfx(_))).count()
    }

    #[test]
    fn test_jump_plays_once_and_lands() {
        let mut train = TrainController::default();
        let idle = InputFrame::new();

        train.update(0.016, &InputFrame::new().with_pressed(TrainMove::Jump), &mut NoObstacles);
        assert_eq!(train.state(), TrainStateKind::Jump);
        let events = train.take_events();
        assert_eq!(events.last(), Some(&TrainEvent::PlaySfx(TrainMove::Jump)));
        assert_eq!(sfx_count(&events), 1);

        train.update(0.5, &idle, &mut NoObstacles);
        assert_eq!(train.state(), TrainStateKind::Jump);
        train.update(0.25, &idle, &mut NoObstacles);
        assert_eq!(train.state(), TrainStateKind::Drive);

        let events = train.take_events();
        assert_eq!(sfx_count(&events), 0);
        assert_eq!(
            events,
            vec![TrainEvent::StateChanged {
                from: TrainStateKind::Jump,
                to: TrainStateKind::Drive,
                anim_trigger: Some("Idle"),
                cue: None,
            }]
        );
    }

    #[test]
    fn test_duck_release_returns_to_drive() {
        let mut train = TrainController::default();
        train.update(0.016, &InputFrame::new().with_pressed(TrainMove::Duck), &mut NoObstacles);
        assert_eq!(train.state(), TrainStateKind::Duck);

        for _ in 0..100 {
            train.update(0.016, &InputFrame::new().with_held(TrainMove::Duck), &mut NoObstacles);
        }
        assert_eq!(train.state(), TrainStateKind::Duck);

        train.update(0.016, &InputFrame::new().with_released(TrainMove::Duck), &mut NoObstacles);
        assert_eq!(train.state(), TrainStateKind::Drive);
    }

    #[test]
    fn test_jump_while_ducking() {
        let mut train = TrainController::default();
        train.transition(TrainStateKind::Duck, None);
        train.take_events();

        let input = InputFrame::new().with_held(TrainMove::Duck).with_pressed(TrainMove::Jump);
        train.update(0.016, &input, &mut NoObstacles);
        assert_eq!(train.state(), TrainStateKind::Jump);
        assert_eq!(sfx_count(&train.take_events()), 1);
    }

    #[test]
    fn test_duck_interrupts_jump() {
        let mut train = TrainController::default();
        train.transition(TrainStateKind::Jump, None);
        train.update(0.2, &InputFrame::new().with_pressed(TrainMove::Duck), &mut NoObstacles);
        assert_eq!(train.state(), TrainStateKind::Duck);
        assert_eq!(train.time_in_state(), 0.0);

        // Jump timer no longer applies
        train.update(5.0, &InputFrame::new().with_held(TrainMove::Duck), &mut NoObstacles);
        assert_eq!(train.state(), TrainStateKind::Duck);
    }

    #[test]
    fn test_honk_is_time_gated() {
        let mut train = TrainController::default();
        train.update(0.016, &InputFrame::new().with_pressed(TrainMove::Honk), &mut NoObstacles);
        assert_eq!(train.state(), TrainStateKind::Honk);

        train.update(0.1, &InputFrame::new().with_pressed(TrainMove::Jump), &mut NoObstacles);
        assert_eq!(train.state(), TrainStateKind::Honk);

        train.update(0.45, &InputFrame::new(), &mut NoObstacles);
        assert_eq!(train.state(), TrainStateKind::Drive);
    }

    #[test]
    fn test_timer_wins_over_input() {
        let mut train = TrainController::default();
        train.transition(TrainStateKind::Jump, None);
        train.update(1.0, &InputFrame::new().with_pressed(TrainMove::Duck), &mut NoObstacles);
        assert_eq!(train.state(), TrainStateKind::Drive);
    }

    #[test]
    fn test_null_ignores_everything() {
        let mut train = TrainController::default();
        train.transition(TrainStateKind::Null, None);
        assert_eq!(sfx_count(&train.take_events()), 0);

        let input = InputFrame::new()
            .with_pressed(TrainMove::Jump)
            .with_pressed(TrainMove::Duck)
            .with_pressed(TrainMove::Honk);
        train.update(10.0, &input, &mut NoObstacles);
        assert_eq!(train.state(), TrainStateKind::Null);
        assert!(train.take_events().is_empty());
    }

    #[test]
    fn test_obstacle_cue_forwarded() {
        let mut train = TrainController::default();
        let mut obstacle = RecordingObstacle {
            asked: Vec::new(),
            cue: Some(MoveCue::new("cow_flee")),
        };

        train.update(0.016, &InputFrame::new().with_pressed(TrainMove::Honk), &mut obstacle);
        assert_eq!(obstacle.asked, vec![TrainMove::Honk]);
        let events = train.take_events();
        assert!(matches!(
            &events[0],
            TrainEvent::StateChanged { to: TrainStateKind::Honk, cue: Some(cue), .. } if cue.name == "cow_flee"
        ));
    }

    #[test]
    fn test_release_and_timeout_skip_obstacles() {
        let mut train = TrainController::default();
        let mut obstacle = RecordingObstacle { asked: Vec::new(), cue: None };

        train.update(0.016, &InputFrame::new().with_pressed(TrainMove::Duck), &mut obstacle);
        train.update(0.016, &InputFrame::new().with_released(TrainMove::Duck), &mut obstacle);
        train.update(0.016, &InputFrame::new().with_pressed(TrainMove::Jump), &mut obstacle);
        train.update(1.0, &InputFrame::new(), &mut obstacle);

        assert_eq!(obstacle.asked, vec![TrainMove::Duck, TrainMove::Jump]);
        assert_eq!(train.state(), TrainStateKind::Drive);
    }

    #[test]
    fn test_reset_goes_back_to_drive_silently() {
        let mut train = TrainController::default();
        train.transition(TrainStateKind::Null, None);
        train.take_events();
        train.reset();
        assert_eq!(train.state(), TrainStateKind::Drive);
        assert_eq!(sfx_count(&train.take_events()), 0);
    }
}
