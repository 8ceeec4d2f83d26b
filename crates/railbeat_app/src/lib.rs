// SPDX-License-Identifier: MIT OR Apache-2.0
//! Railbeat game session
//!
//! Ties the playback timeline and the train state machine together into a
//! playable run:
//! - Level configuration loaded from RON
//! - Lives, deaths and checkpoint restarts
//! - Menu flow with delayed reveals
//! - Obstacles on the global beat line
//! - Scripted headless runs

pub mod clock;
pub mod config;
pub mod input;
pub mod menu;
pub mod obstacles;
pub mod run;
pub mod script;
pub mod session;
pub mod timer;

pub use clock::{ClockState, RunClock};
pub use config::{ConfigError, GameConfig, MenuSettings, SessionSettings};
pub use input::{Key, Keyboard};
pub use menu::{DelayedReveal, Menu, MenuType};
pub use obstacles::{ObstacleCourse, ObstacleSpec, ObstacleStatus};
pub use run::{run_headless, RunOptions, RunSummary};
pub use script::{InputScript, KeyEvent, ScriptPlayer};
pub use session::{GameSession, RunPhase, SessionEvent};
pub use timer::{TimerId, TimerQueue};
