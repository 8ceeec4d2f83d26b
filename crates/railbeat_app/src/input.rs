// SPDX-License-Identifier: MIT OR Apache-2.0
//! Keyboard state fed to the session each frame.

use railbeat_train::{MoveInput, TrainMove};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Logical keys the game reads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Key {
    /// Jump move
    Jump,
    /// Duck move
    Duck,
    /// Honk move
    Honk,
    /// Open/close the pause menu, leave end menus
    Escape,
    /// Confirm in menus
    Submit,
    /// Any other key, used by the restart combo
    Char(char),
}

impl Key {
    /// Key bound to a move
    pub fn for_move(mv: TrainMove) -> Self {
        match mv {
            TrainMove::Jump => Key::Jump,
            TrainMove::Duck => Key::Duck,
            TrainMove::Honk => Key::Honk,
        }
    }
}

/// Keys held this frame and last frame
#[derive(Debug, Clone, Default)]
pub struct Keyboard {
    down: BTreeSet<Key>,
    previous: BTreeSet<Key>,
}

impl Keyboard {
    /// Nothing held
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether a key is down
    pub fn set_down(&mut self, key: Key, down: bool) {
        if down {
            self.down.insert(key);
        } else {
            self.down.remove(&key);
        }
    }

    /// Roll this frame's keys into last frame's
    pub fn end_frame(&mut self) {
        self.previous.clone_from(&self.down);
    }

    /// Release everything
    pub fn clear(&mut self) {
        self.down.clear();
        self.previous.clear();
    }

    /// Key is down
    pub fn is_down(&self, key: Key) -> bool {
        self.down.contains(&key)
    }

    /// Key went down this frame
    pub fn key_pressed(&self, key: Key) -> bool {
        self.down.contains(&key) && !self.previous.contains(&key)
    }

    /// Key went up this frame
    pub fn key_released(&self, key: Key) -> bool {
        !self.down.contains(&key) && self.previous.contains(&key)
    }

    /// All keys are down; false for an empty combo
    pub fn all_down(&self, keys: &[Key]) -> bool {
        !keys.is_empty() && keys.iter().all(|k| self.down.contains(k))
    }
}

impl MoveInput for Keyboard {
    fn pressed(&self, mv: TrainMove) -> bool {
        self.key_pressed(Key::for_move(mv))
    }

    fn held(&self, mv: TrainMove) -> bool {
        self.is_down(Key::for_move(mv))
    }

    fn released(&self, mv: TrainMove) -> bool {
        self.key_released(Key::for_move(mv))
    }
}
