// SPDX-License-Identifier: MIT OR Apache-2.0
//! Headless run loop.

use crate::clock::RunClock;
use crate::input::Keyboard;
use crate::script::{InputScript, ScriptPlayer};
use crate::session::{GameSession, RunPhase, SessionEvent};
use railbeat_timeline::{AudioSource, Vec3};
use railbeat_train::TrainEvent;

/// Limits for a headless run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunOptions {
    /// Simulation steps per second
    pub steps_per_second: u32,
    /// Frame delta fed to the clock each frame
    pub frame_secs: f64,
    /// Simulated seconds per frame second
    pub time_scale: f32,
    /// Stop after this much simulated time
    pub max_secs: f32,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            steps_per_second: 60,
            frame_secs: 1.0 / 30.0,
            time_scale: 1.0,
            max_secs: 600.0,
        }
    }
}

/// What happened during a run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunSummary {
    /// Frames fed to the clock
    pub frames: u64,
    /// Steps simulated
    pub steps: u64,
    /// Seconds simulated
    pub simulated_secs: f32,
    /// Tracks finished, not counting the last
    pub tracks_finished: usize,
    /// Deaths
    pub deaths: u32,
    /// Outcome, if the run ended
    pub win: Option<bool>,
    /// Train position on the last step
    pub final_position: Vec3,
}

/// Drive `session` with `script` until the run ends and the script is spent,
/// or the time limit is hit
pub fn run_headless<S: AudioSource>(
    session: &mut GameSession<S>,
    script: &InputScript,
    options: &RunOptions,
) -> RunSummary {
    let mut clock = RunClock::new(options.steps_per_second);
    let mut player = ScriptPlayer::new(script);
    let mut keyboard = Keyboard::new();
    let mut summary = RunSummary::default();
    let step_secs = clock.step_secs();

    clock.set_time_scale(options.time_scale);
    if !(options.frame_secs > 0.0 && clock.time_scale > 0.0) {
        tracing::warn!(
            "Nothing to run: frame {}s at scale {} never produces a step",
            options.frame_secs,
            clock.time_scale
        );
        return summary;
    }

    clock.start();
    'run: while summary.simulated_secs < options.max_secs {
        summary.frames += 1;
        for _ in 0..clock.update(options.frame_secs) {
            player.advance(step_secs, &mut keyboard);
            summary.final_position = session.update(step_secs, &keyboard);
            keyboard.end_frame();
            summary.steps += 1;
            summary.simulated_secs += step_secs;

            for event in session.take_events() {
                record(&mut summary, &event);
            }

            let settled = matches!(session.phase(), RunPhase::Over { .. } | RunPhase::Idle);
            if settled && player.is_done() {
                break 'run;
            }
        }
    }
    clock.stop();

    tracing::info!(
        "Run finished after {:.2}s ({} frames): {} tracks, {} deaths, outcome {:?}",
        summary.simulated_secs,
        summary.frames,
        summary.tracks_finished,
        summary.deaths,
        summary.win
    );
    summary
}

fn record(summary: &mut RunSummary, event: &SessionEvent) {
    match event {
        SessionEvent::TrackFinished(idx) => {
            summary.tracks_finished += 1;
            tracing::info!("Track {idx} finished");
        }
        SessionEvent::TrainDied { lives_remaining, obstacle } => {
            summary.deaths += 1;
            tracing::info!("Train died on {:?}, {lives_remaining} lives left", obstacle);
        }
        SessionEvent::GameOver { win } => {
            summary.win = Some(*win);
            tracing::info!("Game over: {}", if *win { "win" } else { "lose" });
        }
        SessionEvent::Train(TrainEvent::StateChanged { to, cue, .. }) => {
            tracing::debug!("{to} (cue: {:?})", cue.as_ref().map(|c| &c.name));
        }
        SessionEvent::Train(TrainEvent::PlaySfx(mv)) => tracing::debug!("Sfx: {}", mv.name()),
        other => tracing::debug!("{other:?}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::input::Key;
    use crate::obstacles::ObstacleSpec;
    use railbeat_timeline::Track;
    use railbeat_train::TrainMove;

    fn config() -> GameConfig {
        let mut config = GameConfig::new(
            "run",
            vec![
                Track::new("a", "a.ogg", 8.0, 4.0),
                Track::new("b", "b.ogg", 8.0, 4.0),
            ],
        );
        config.obstacles.push(ObstacleSpec::new("log", 4.0, TrainMove::Jump));
        config
    }

    #[test]
    fn test_scripted_win() {
        let mut session = GameSession::simulated(&config()).unwrap();
        let script = InputScript::default().tap(Key::Jump, 2.0, 0.1);
        let summary = run_headless(&mut session, &script, &RunOptions::default());

        assert_eq!(summary.win, Some(true));
        assert_eq!(summary.deaths, 0);
        assert_eq!(summary.tracks_finished, 1);
        assert_eq!(summary.final_position, [0.0, 0.0, 16.0]);
        assert!(summary.simulated_secs < 8.5);
    }

    #[test]
    fn test_unscripted_run_dies() {
        let mut session = GameSession::simulated(&config()).unwrap();
        let options = RunOptions { max_secs: 30.0, ..RunOptions::default() };
        let summary = run_headless(&mut session, &InputScript::default(), &options);

        assert_eq!(summary.deaths, 3);
        assert_eq!(summary.win, Some(false));
    }

    #[test]
    fn test_demo_script_clears_demo_level() {
        let config = GameConfig::from_ron(include_str!("../levels/demo.ron")).unwrap();
        let script: InputScript = ron::from_str(include_str!("../levels/demo_script.ron")).unwrap();
        let mut session = GameSession::simulated(&config).unwrap();
        let summary = run_headless(&mut session, &script, &RunOptions::default());

        assert_eq!(summary.deaths, 0);
        assert_eq!(summary.tracks_finished, 2);
        assert_eq!(summary.win, Some(true));
    }

    #[test]
    fn test_time_limit() {
        let mut session = GameSession::simulated(&config()).unwrap();
        let options = RunOptions { max_secs: 1.0, ..RunOptions::default() };
        let summary = run_headless(&mut session, &InputScript::default(), &options);
        assert_eq!(summary.win, None);
        assert!(summary.simulated_secs >= 1.0 && summary.simulated_secs < 1.1);
    }

    #[test]
    fn test_frames_split_into_steps() {
        let mut session = GameSession::simulated(&config()).unwrap();
        let options = RunOptions { max_secs: 1.0, ..RunOptions::default() };
        let summary = run_headless(&mut session, &InputScript::default(), &options);
        assert_eq!(summary.steps, summary.frames * 2);
        assert!((30..=31).contains(&summary.frames));

        let mut session = GameSession::simulated(&config()).unwrap();
        let options = RunOptions { max_secs: 1.0, time_scale: 2.0, ..RunOptions::default() };
        let summary = run_headless(&mut session, &InputScript::default(), &options);
        assert_eq!(summary.steps, summary.frames * 4);
        assert!((15..=16).contains(&summary.frames));
        assert_eq!(summary.deaths, 0);
    }

    #[test]
    fn test_stalled_clock_runs_nothing() {
        let mut session = GameSession::simulated(&config()).unwrap();
        let options = RunOptions { time_scale: 0.0, ..RunOptions::default() };
        let summary = run_headless(&mut session, &InputScript::default(), &options);
        assert_eq!(summary, RunSummary::default());
    }
}
