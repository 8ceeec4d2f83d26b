// SPDX-License-Identifier: MIT OR Apache-2.0
//! Input-driven transition table.
//!
//! Rules are listed per state in priority order; the first rule whose
//! trigger fires this tick wins.

use crate::moves::{MoveInput, TrainMove};
use crate::state::TrainStateKind;

/// Input edge that fires a rule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// Key went down
    Pressed(TrainMove),
    /// Key went up
    Released(TrainMove),
}

/// One row of the transition table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionRule {
    /// Input edge
    pub trigger: Trigger,
    /// State entered when the rule fires
    pub target: TrainStateKind,
}

impl TransitionRule {
    const fn on_press(mv: TrainMove, target: TrainStateKind) -> Self {
        Self {
            trigger: Trigger::Pressed(mv),
            target,
        }
    }

    const fn on_release(mv: TrainMove, target: TrainStateKind) -> Self {
        Self {
            trigger: Trigger::Released(mv),
            target,
        }
    }

    /// Move the player is attempting, which obstacles get to react to
    pub fn attempted_move(&self) -> Option<TrainMove> {
        match self.trigger {
            Trigger::Pressed(mv) => Some(mv),
            Trigger::Released(_) => None,
        }
    }

    /// Whether the trigger fires for this input
    pub fn fires(&self, input: &impl MoveInput) -> bool {
        match self.trigger {
            Trigger::Pressed(mv) => input.pressed(mv),
            Trigger::Released(mv) => input.released(mv),
        }
    }
}

const DRIVE_RULES: [TransitionRule; 3] = [
    TransitionRule::on_press(TrainMove::Honk, TrainStateKind::Honk),
    TransitionRule::on_press(TrainMove::Duck, TrainStateKind::Duck),
    TransitionRule::on_press(TrainMove::Jump, TrainStateKind::Jump),
];

const DUCK_RULES: [TransitionRule; 3] = [
    TransitionRule::on_press(TrainMove::Jump, TrainStateKind::Jump),
    TransitionRule::on_press(TrainMove::Honk, TrainStateKind::Honk),
    TransitionRule::on_release(TrainMove::Duck, TrainStateKind::Drive),
];

const JUMP_RULES: [TransitionRule; 1] = [TransitionRule::on_press(TrainMove::Duck, TrainStateKind::Duck)];

/// Rules for a state, in priority order
pub fn rules(kind: TrainStateKind) -> &'static [TransitionRule] {
    match kind {
        TrainStateKind::Drive => &DRIVE_RULES,
        TrainStateKind::Duck => &DUCK_RULES,
        TrainStateKind::Jump => &JUMP_RULES,
        TrainStateKind::Honk | TrainStateKind::Null => &[],
    }
}

/// First rule of `kind` that fires for this input
pub fn next_transition(kind: TrainStateKind, input: &impl MoveInput) -> Option<TransitionRule> {
    rules(kind).iter().find(|rule| rule.fires(input)).copied()
}
