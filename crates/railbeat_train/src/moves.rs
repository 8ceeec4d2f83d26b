// SPDX-License-Identifier: MIT OR Apache-2.0
//! Player moves and per-tick input.

use crate::error::TrainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A move the player can make
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrainMove {
    /// Jump over low obstacles
    Jump,
    /// Duck under high obstacles
    Duck,
    /// Honk at things on the rails
    Honk,
}

impl TrainMove {
    /// Every move, in input polling order
    pub const ALL: [TrainMove; 3] = [TrainMove::Jump, TrainMove::Duck, TrainMove::Honk];

    /// Get the display name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Jump => "Jump",
            Self::Duck => "Duck",
            Self::Honk => "Honk",
        }
    }

    fn bit(self) -> u8 {
        match self {
            Self::Jump => 1,
            Self::Duck => 1 << 1,
            Self::Honk => 1 << 2,
        }
    }
}

impl FromStr for TrainMove {
    type Err = TrainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|m| m.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| TrainError::UnknownMove(s.to_string()))
    }
}

/// Per-tick input queries for the logical moves
pub trait MoveInput {
    /// Key went down this tick
    fn pressed(&self, mv: TrainMove) -> bool;

    /// Key is down
    fn held(&self, mv: TrainMove) -> bool;

    /// Key went up this tick
    fn released(&self, mv: TrainMove) -> bool;
}

/// Snapshot of move keys for one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputFrame {
    pressed: u8,
    held: u8,
    released: u8,
}

impl InputFrame {
    /// No keys touched
    pub fn new() -> Self {
        Self::default()
    }

    /// Derive edges from the keys held last tick and the keys held now
    pub fn from_held(previous: &InputFrame, held: impl IntoIterator<Item = TrainMove>) -> Self {
        let now = held.into_iter().fold(0, |bits, mv| bits | mv.bit());
        Self {
            pressed: now & !previous.held,
            held: now,
            released: previous.held & !now,
        }
    }

    /// Press a key this tick (it is also held)
    pub fn with_pressed(mut self, mv: TrainMove) -> Self {
        self.pressed |= mv.bit();
        self.held |= mv.bit();
        self
    }

    /// Keep a key held
    pub fn with_held(mut self, mv: TrainMove) -> Self {
        self.held |= mv.bit();
        self
    }

    /// Release a key this tick
    pub fn with_released(mut self, mv: TrainMove) -> Self {
        self.released |= mv.bit();
        self.held &= !mv.bit();
        self
    }

    /// Whether nothing was pressed, held or released
    pub fn is_idle(&self) -> bool {
        self.pressed == 0 && self.held == 0 && self.released == 0
    }
}

impl MoveInput for InputFrame {
    fn pressed(&self, mv: TrainMove) -> bool {
        self.pressed & mv.bit() != 0
    }

    fn held(&self, mv: TrainMove) -> bool {
        self.held & mv.bit() != 0
    }

    fn released(&self, mv: TrainMove) -> bool {
        self.released & mv.bit() != 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edges_from_held() {
        let first = InputFrame::from_held(&InputFrame::new(), [TrainMove::Duck]);
        assert!(first.pressed(TrainMove::Duck));
        assert!(first.held(TrainMove::Duck));

        let second = InputFrame::from_held(&first, [TrainMove::Duck, TrainMove::Jump]);
        assert!(!second.pressed(TrainMove::Duck));
        assert!(second.pressed(TrainMove::Jump));

        let third = InputFrame::from_held(&second, []);
        assert!(third.released(TrainMove::Duck));
        assert!(third.released(TrainMove::Jump));
        assert!(!third.held(TrainMove::Duck));
    }

    #[test]
    fn test_builders() {
        let frame = InputFrame::new().with_pressed(TrainMove::Honk).with_released(TrainMove::Duck);
        assert!(frame.pressed(TrainMove::Honk));
        assert!(frame.held(TrainMove::Honk));
        assert!(frame.released(TrainMove::Duck));
        assert!(!frame.is_idle());
        assert!(InputFrame::new().is_idle());
    }

    #[test]
    fn test_parse_move() {
        assert_eq!("jump".parse::<TrainMove>(), Ok(TrainMove::Jump));
        assert_eq!("HONK".parse::<TrainMove>(), Ok(TrainMove::Honk));
        assert_eq!("fly".parse::<TrainMove>(), Err(TrainError::UnknownMove("fly".to_string())));
    }

    #[test]
    fn test_move_ron() {
        let mv: TrainMove = ron::from_str("Duck").unwrap();
        assert_eq!(mv, TrainMove::Duck);
    }
}
