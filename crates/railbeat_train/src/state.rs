// SPDX-License-Identifier: MIT OR Apache-2.0
//! Train state kinds and their static definitions.

use crate::error::TrainError;
use crate::moves::TrainMove;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The state the train is in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum TrainStateKind {
    /// Neutral driving
    #[default]
    Drive,
    /// Airborne for a fixed time
    Jump,
    /// Ducking while the key is held
    Duck,
    /// Honking for a fixed time
    Honk,
    /// Inactive; no transitions out
    Null,
}

/// Static data attached to a state kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateDef {
    /// Display name (for logs)
    pub name: &'static str,
    /// Animation trigger fired on entry
    pub anim_trigger: Option<&'static str>,
    /// Move whose sound plays on entry
    pub move_tag: Option<TrainMove>,
}

/// Timed exit of a state
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AutoExit {
    /// Seconds spent in the state before leaving it
    pub duration: f32,
    /// State entered when the time is up
    pub successor: TrainStateKind,
}

/// How long the timed states last
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StateTimings {
    /// Jump duration in seconds
    pub jump_secs: f32,
    /// Honk duration in seconds
    pub honk_secs: f32,
}

impl Default for StateTimings {
    fn default() -> Self {
        Self {
            jump_secs: 0.75,
            honk_secs: 0.5,
        }
    }
}

impl TrainStateKind {
    /// Every state kind
    pub const ALL: [TrainStateKind; 5] = [
        TrainStateKind::Drive,
        TrainStateKind::Jump,
        TrainStateKind::Duck,
        TrainStateKind::Honk,
        TrainStateKind::Null,
    ];

    /// Static definition of this state
    pub const fn def(self) -> StateDef {
        match self {
            Self::Drive => StateDef {
                name: "Drive",
                anim_trigger: Some("Idle"),
                move_tag: None,
            },
            Self::Jump => StateDef {
                name: "Jump",
                anim_trigger: Some("Jump"),
                move_tag: Some(TrainMove::Jump),
            },
            Self::Duck => StateDef {
                name: "Duck",
                anim_trigger: Some("Duck"),
                move_tag: Some(TrainMove::Duck),
            },
            Self::Honk => StateDef {
                name: "Honk",
                anim_trigger: Some("Honk"),
                move_tag: Some(TrainMove::Honk),
            },
            Self::Null => StateDef {
                name: "NONE",
                anim_trigger: None,
                move_tag: None,
            },
        }
    }

    /// Display name
    pub fn name(self) -> &'static str {
        self.def().name
    }

    /// Animation trigger fired on entry
    pub fn anim_trigger(self) -> Option<&'static str> {
        self.def().anim_trigger
    }

    /// Move whose sound plays on entry
    pub fn move_tag(self) -> Option<TrainMove> {
        self.def().move_tag
    }

    /// Timed exit for this state, if it has one
    pub fn auto_exit(self, timings: &StateTimings) -> Option<AutoExit> {
        match self {
            Self::Jump => Some(AutoExit {
                duration: timings.jump_secs,
                successor: Self::Drive,
            }),
            Self::Honk => Some(AutoExit {
                duration: timings.honk_secs,
                successor: Self::Drive,
            }),
            Self::Drive | Self::Duck | Self::Null => None,
        }
    }
}

impl fmt::Display for TrainStateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[TrainState] {}", self.name())
    }
}

impl FromStr for TrainStateKind {
    type Err = TrainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.name().eq_ignore_ascii_case(s) || format!("{k:?}").eq_ignore_ascii_case(s))
            .ok_or_else(|| TrainError::UnknownState(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_definitions() {
        assert_eq!(TrainStateKind::Drive.anim_trigger(), Some("Idle"));
        assert_eq!(TrainStateKind::Drive.move_tag(), None);
        assert_eq!(TrainStateKind::Jump.move_tag(), Some(TrainMove::Jump));
        assert_eq!(TrainStateKind::Null.anim_trigger(), None);
        assert_eq!(TrainStateKind::Null.name(), "NONE");
        assert_eq!(TrainStateKind::Honk.to_string(), "[TrainState] Honk");
    }

    #[test]
    fn test_only_timed_states_auto_exit() {
        let timings = StateTimings::default();
        let jump = TrainStateKind::Jump.auto_exit(&timings).unwrap();
        assert_eq!(jump.duration, 0.75);
        assert_eq!(jump.successor, TrainStateKind::Drive);
        assert!(TrainStateKind::Honk.auto_exit(&timings).is_some());
        assert!(TrainStateKind::Duck.auto_exit(&timings).is_none());
        assert!(TrainStateKind::Drive.auto_exit(&timings).is_none());
        assert!(TrainStateKind::Null.auto_exit(&timings).is_none());
    }

    #[test]
    fn test_parse_state() {
        assert_eq!("duck".parse::<TrainStateKind>(), Ok(TrainStateKind::Duck));
        assert_eq!("NONE".parse::<TrainStateKind>(), Ok(TrainStateKind::Null));
        assert_eq!("null".parse::<TrainStateKind>(), Ok(TrainStateKind::Null));
        assert!(matches!("Fly".parse::<TrainStateKind>(), Err(TrainError::UnknownState(_))));
    }

    #[test]
    fn test_timings_defaults_in_ron() {
        let timings: StateTimings = ron::from_str("(jump_secs: 1.25)").unwrap();
        assert_eq!(timings.jump_secs, 1.25);
        assert_eq!(timings.honk_secs, 0.5);
    }
}
