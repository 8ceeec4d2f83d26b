// SPDX-License-Identifier: MIT OR Apache-2.0
//! Train state machine for Railbeat.
//!
//! The train is always in exactly one state:
//! - Drive: neutral, accepts every move
//! - Jump and Honk: timed, return to Drive on their own
//! - Duck: held for as long as the duck key is held
//! - Null: inactive, ignores input
//!
//! ## Architecture
//!
//! States are plain enum values with a static definition table. Input-driven
//! transitions come from a per-state rule table evaluated once per tick, and
//! every change goes through [`TrainController::transition`], which queues
//! animation and sound events for the host to drain.

pub mod error;
pub mod moves;
pub mod state;
pub mod transition;
pub mod obstacle;
pub mod controller;

pub use error::{Result, TrainError};
pub use moves::{InputFrame, MoveInput, TrainMove};
pub use state::{AutoExit, StateDef, StateTimings, TrainStateKind};
pub use transition::{Trigger, TransitionRule};
pub use obstacle::{MoveCue, NoObstacles, ObstacleResolver};
pub use controller::{TrainController, TrainEvent};
