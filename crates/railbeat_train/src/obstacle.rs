// SPDX-License-Identifier: MIT OR Apache-2.0
//! Obstacle resolution seam.

use crate::moves::TrainMove;
use serde::{Deserialize, Serialize};

/// Side-effect payload an obstacle hands back for an accepted move
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveCue {
    /// Cue name (animation or VFX trigger on the obstacle side)
    pub name: String,
}

impl MoveCue {
    /// Create a new cue
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Consulted whenever the player attempts a move
pub trait ObstacleResolver {
    /// React to an attempted move; the returned cue travels with the transition
    fn resolve(&mut self, mv: TrainMove) -> Option<MoveCue>;
}

/// Resolver for runs without obstacles
#[derive(Debug, Clone, Copy, Default)]
pub struct NoObstacles;

impl ObstacleResolver for NoObstacles {
    fn resolve(&mut self, _mv: TrainMove) -> Option<MoveCue> {
        None
    }
}
