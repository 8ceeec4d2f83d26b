// SPDX-License-Identifier: MIT OR Apache-2.0
//! Scripted key input for headless runs.

use crate::config::{self, load_ron};
use crate::input::{Key, Keyboard};
use serde::{Deserialize, Serialize};
use std::path::Path;

fn default_down() -> bool {
    true
}

/// A key going down or up at a point in run time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyEvent {
    /// Seconds since the run began
    pub at_secs: f32,
    /// Key affected
    pub key: Key,
    /// Down (true) or up (false)
    #[serde(default = "default_down")]
    pub down: bool,
}

/// Timed key events
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputScript {
    /// Events in any order
    pub events: Vec<KeyEvent>,
}

impl InputScript {
    /// Load a script file
    pub fn load(path: &Path) -> config::Result<Self> {
        let script: Self = load_ron(path)?;
        tracing::info!("Loaded input script with {} events from {}", script.events.len(), path.display());
        Ok(script)
    }

    /// Press `key` at `at_secs` and release it `hold_secs` later
    pub fn tap(mut self, key: Key, at_secs: f32, hold_secs: f32) -> Self {
        self.events.push(KeyEvent { at_secs, key, down: true });
        self.events.push(KeyEvent {
            at_secs: at_secs + hold_secs,
            key,
            down: false,
        });
        self
    }
}

/// Replays an [`InputScript`] onto a [`Keyboard`]
#[derive(Debug, Clone)]
pub struct ScriptPlayer {
    events: Vec<KeyEvent>,
    next: usize,
    time: f32,
}

impl ScriptPlayer {
    /// Player positioned at time zero
    pub fn new(script: &InputScript) -> Self {
        let mut events = script.events.clone();
        events.sort_by(|a, b| a.at_secs.total_cmp(&b.at_secs));
        Self { events, next: 0, time: 0.0 }
    }

    /// Advance by `delta_secs` and apply every event that came due
    pub fn advance(&mut self, delta_secs: f32, keyboard: &mut Keyboard) {
        self.time += delta_secs;
        while let Some(event) = self.events.get(self.next) {
            if event.at_secs > self.time {
                break;
            }
            keyboard.set_down(event.key, event.down);
            self.next += 1;
        }
    }

    /// Every event has been applied
    pub fn is_done(&self) -> bool {
        self.next >= self.events.len()
    }

    /// Script time
    pub fn time(&self) -> f32 {
        self.time
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replay_in_time_order() {
        let script = InputScript::default().tap(Key::Jump, 1.0, 0.25).tap(Key::Duck, 0.5, 1.0);
        let mut player = ScriptPlayer::new(&script);
        let mut keyboard = Keyboard::new();

        player.advance(0.5, &mut keyboard);
        assert!(keyboard.is_down(Key::Duck));
        assert!(!keyboard.is_down(Key::Jump));

        player.advance(0.5, &mut keyboard);
        assert!(keyboard.is_down(Key::Jump));

        player.advance(0.5, &mut keyboard);
        assert!(!keyboard.is_down(Key::Jump));
        assert!(!keyboard.is_down(Key::Duck));
        assert!(player.is_done());
    }

    #[test]
    fn test_parse_script() {
        let script: InputScript = ron::from_str(
            "(events: [(at_secs: 2.0, key: Honk), (at_secs: 2.5, key: Honk, down: false)])",
        )
        .unwrap();
        assert_eq!(script.events.len(), 2);
        assert!(script.events[0].down);
        assert!(!script.events[1].down);
    }
}
