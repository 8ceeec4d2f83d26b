// SPDX-License-Identifier: MIT OR Apache-2.0
//! Level configuration loaded from RON.

use crate::input::Key;
use crate::menu::{DelayedReveal, MenuType};
use crate::obstacles::ObstacleSpec;
use railbeat_timeline::{PathFrame, TimelineConfig, TimelineError, Track, TrackList};
use railbeat_train::StateTimings;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Errors raised while loading or checking a level
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File could not be read
    #[error("Failed to read {path}: {source}")]
    Io {
        /// File that failed
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },
    /// File is not valid RON for the expected type
    #[error("Parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),
    /// Value could not be written as RON
    #[error("Serialize error: {0}")]
    Serialize(#[from] ron::Error),
    /// Tracks or timeline tuning rejected
    #[error(transparent)]
    Timeline(#[from] TimelineError),
    /// Other invalid setting
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Result type for config operations
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Read a RON file into `T`
pub fn load_ron<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(ron::from_str(&content)?)
}

/// Lives, death timing and debug restart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSettings {
    /// Lives at the start of a run
    pub start_lives: u32,
    /// Seconds between a death and the checkpoint restart
    pub death_delay_secs: f32,
    /// Seconds between the last death and the lose menu
    pub final_death_delay_secs: f32,
    /// Global beat a level restart begins at
    pub debug_start_beat_offset: f32,
    /// Keys that, held together, restart the level
    pub restart_combo: Vec<Key>,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            start_lives: 3,
            death_delay_secs: 2.0,
            final_death_delay_secs: 5.0,
            debug_start_beat_offset: 0.0,
            restart_combo: Vec::new(),
        }
    }
}

/// Menu shown at launch and delayed elements
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MenuSettings {
    /// Menu open when the session is created
    pub initial_menu: MenuType,
    /// Elements revealed some time after their menu opens
    pub delayed_reveals: Vec<DelayedReveal>,
}

/// A complete level
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    /// Level name
    pub name: String,
    /// Tracks in play order
    pub tracks: Vec<Track>,
    /// World placement of the tracklist
    #[serde(default)]
    pub frame: PathFrame,
    /// Completion detection tuning
    #[serde(default)]
    pub timeline: TimelineConfig,
    /// Timed train state durations
    #[serde(default)]
    pub train: StateTimings,
    /// Lives and restarts
    #[serde(default)]
    pub session: SessionSettings,
    /// Obstacles on the global beat line
    #[serde(default)]
    pub obstacles: Vec<ObstacleSpec>,
    /// Menu setup
    #[serde(default)]
    pub menu: MenuSettings,
}

impl GameConfig {
    /// Level with the given tracks and everything else default
    pub fn new(name: impl Into<String>, tracks: Vec<Track>) -> Self {
        Self {
            name: name.into(),
            tracks,
            frame: PathFrame::default(),
            timeline: TimelineConfig::default(),
            train: StateTimings::default(),
            session: SessionSettings::default(),
            obstacles: Vec::new(),
            menu: MenuSettings::default(),
        }
    }

    /// Load and check a level file
    pub fn load(path: &Path) -> Result<Self> {
        let config: Self = load_ron(path)?;
        config.validate()?;
        tracing::info!("Loaded level '{}' ({} tracks) from {}", config.name, config.tracks.len(), path.display());
        Ok(config)
    }

    /// Parse and check a level from a RON string
    pub fn from_ron(source: &str) -> Result<Self> {
        let config: Self = ron::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Write as pretty RON
    pub fn to_ron(&self) -> Result<String> {
        Ok(ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())?)
    }

    /// Check values that serde cannot
    pub fn validate(&self) -> Result<()> {
        self.timeline.validate()?;
        let tracks = self.build_tracklist()?;

        let timings = &self.train;
        if !(timings.jump_secs > 0.0 && timings.honk_secs > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "state durations must be positive (jump {}, honk {})",
                timings.jump_secs, timings.honk_secs
            )));
        }

        let session = &self.session;
        if session.start_lives == 0 {
            return Err(ConfigError::Invalid("start_lives must be at least 1".into()));
        }
        if session.death_delay_secs < 0.0 || session.final_death_delay_secs < 0.0 {
            return Err(ConfigError::Invalid("death delays must not be negative".into()));
        }
        tracks.locate_beat(session.debug_start_beat_offset)?;

        for obstacle in &self.obstacles {
            if !(obstacle.beat >= 0.0 && obstacle.window_beats >= 0.0) {
                return Err(ConfigError::Invalid(format!(
                    "obstacle '{}' needs a non-negative beat and window",
                    obstacle.name
                )));
            }
        }

        Ok(())
    }

    /// Ordered, validated tracklist
    pub fn build_tracklist(&self) -> Result<TrackList> {
        Ok(TrackList::new(self.tracks.iter().cloned())?)
    }
}
