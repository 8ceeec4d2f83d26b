// SPDX-License-Identifier: MIT OR Apache-2.0
//! Game session: lives, deaths, restarts and menus around the timeline and
//! the train.
//!
//! The session owns both gameplay components and is the only thing that
//! mutates them. Each frame the host feeds it a delta and the keyboard, gets
//! back the train position, and drains [`SessionEvent`]s for presentation.

use crate::config::{ConfigError, GameConfig, SessionSettings};
use crate::input::{Key, Keyboard};
use crate::menu::{Menu, MenuType};
use crate::obstacles::ObstacleCourse;
use crate::timer::TimerQueue;
use railbeat_timeline::{AudioSource, PlaybackTimeline, SimulatedSource, TimelineEvent, Vec3};
use railbeat_train::{TrainController, TrainEvent, TrainStateKind};

/// Where the run is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunPhase {
    /// No run yet, or back at the main menu
    #[default]
    Idle,
    /// Train is driving
    Running,
    /// Train died; waiting for the death to resolve
    Dying,
    /// Run ended
    Over {
        /// Reached the end of the tracklist
        win: bool,
    },
}

impl RunPhase {
    /// Timeline and timers advance in this phase
    pub fn is_in_play(&self) -> bool {
        matches!(self, RunPhase::Running | RunPhase::Dying)
    }
}

/// Delayed session work
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SessionAction {
    ResolveDeath,
}

/// Things the host presents
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// A run started from the configured start beat
    RunStarted,
    /// A track finished and the next one started
    TrackFinished(usize),
    /// The last track finished
    TracklistFinished,
    /// The train died
    TrainDied {
        /// Lives left after this death
        lives_remaining: u32,
        /// Obstacle that was missed, if any
        obstacle: Option<String>,
    },
    /// Restarted from the last checkpoint after a death
    Reset {
        /// Track playback resumed at
        track_idx: usize,
    },
    /// The run ended
    GameOver {
        /// Reached the end of the tracklist
        win: bool,
    },
    /// A menu opened (or `None` when the last one closed)
    MenuShown(MenuType),
    /// A delayed menu element appeared
    ElementRevealed(String),
    /// Left an end menu for the main menu
    ExitToMenu,
    /// Train state machine output
    Train(TrainEvent),
}

/// One player's run through a level
pub struct GameSession<S: AudioSource> {
    timeline: PlaybackTimeline<S>,
    train: TrainController,
    obstacles: ObstacleCourse,
    menu: Menu,
    timers: TimerQueue<SessionAction>,
    settings: SessionSettings,
    phase: RunPhase,
    lives: u32,
    paused: bool,
    combo_held: bool,
    pending_events: Vec<SessionEvent>,
}

impl<S: AudioSource> GameSession<S> {
    /// Build a session over the given audio channels.
    ///
    /// With no initial menu the run starts right away.
    pub fn new(config: &GameConfig, music: S, railway: Option<S>) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut timeline = PlaybackTimeline::new(config.build_tracklist()?, config.timeline, config.frame, music)?;
        if let Some(railway) = railway {
            timeline = timeline.with_railway(railway)?;
        }

        let mut session = Self {
            timeline,
            train: TrainController::new(config.train),
            obstacles: ObstacleCourse::new(config.obstacles.iter().cloned()),
            menu: Menu::new(MenuType::None, config.menu.delayed_reveals.clone()),
            timers: TimerQueue::new(),
            settings: config.session.clone(),
            phase: RunPhase::Idle,
            lives: config.session.start_lives,
            paused: false,
            combo_held: false,
            pending_events: Vec::new(),
        };

        match config.menu.initial_menu {
            MenuType::None => session.restart_level()?,
            initial => session.show_menu(initial),
        }

        Ok(session)
    }

    /// Run one frame; returns the train's world position.
    ///
    /// `keyboard` must hold this frame's keys; the host rolls it over with
    /// [`Keyboard::end_frame`] afterwards.
    pub fn update(&mut self, delta_secs: f32, keyboard: &Keyboard) -> Vec3 {
        self.check_restart_combo(keyboard);

        for element in self.menu.update(delta_secs) {
            self.pending_events.push(SessionEvent::ElementRevealed(element));
        }

        self.handle_menu_keys(keyboard);

        if self.paused || !self.phase.is_in_play() {
            return self.timeline.position();
        }

        for action in self.timers.advance(delta_secs) {
            match action {
                SessionAction::ResolveDeath => self.resolve_death(),
            }
        }
        if !self.phase.is_in_play() {
            return self.timeline.position();
        }

        self.timeline.tick(delta_secs);
        for event in self.timeline.take_events() {
            match event {
                TimelineEvent::TrackFinished(idx) => self.pending_events.push(SessionEvent::TrackFinished(idx)),
                TimelineEvent::TracklistFinished => {
                    self.pending_events.push(SessionEvent::TracklistFinished);
                    self.on_win();
                }
            }
        }

        let missed = self.obstacles.set_beat(self.timeline.global_beat());
        if let Some(obstacle) = missed.into_iter().next() {
            self.kill_train(Some(obstacle));
        }

        self.train.update(delta_secs, keyboard, &mut self.obstacles);
        self.drain_train_events();

        self.timeline.position()
    }

    /// Start the level over from the configured start beat with full lives
    pub fn restart_level(&mut self) -> railbeat_timeline::Result<()> {
        let start = self.settings.debug_start_beat_offset;
        self.timeline.restart(start)?;
        tracing::info!("Level restart at beat {start} with {} lives", self.settings.start_lives);

        self.lives = self.settings.start_lives;
        self.phase = RunPhase::Running;
        self.paused = false;
        self.timers.cancel_all();
        self.obstacles.restart_at(self.timeline.global_beat());
        self.train.reset();
        self.drain_train_events();
        self.show_menu(MenuType::None);
        self.pending_events.push(SessionEvent::RunStarted);
        Ok(())
    }

    /// Kill the train; ignored unless it is driving.
    ///
    /// The death resolves after the configured delay, or the longer final
    /// delay when this was the last life.
    pub fn kill_train(&mut self, obstacle: Option<String>) {
        if self.phase != RunPhase::Running {
            return;
        }

        self.lives = self.lives.saturating_sub(1);
        self.phase = RunPhase::Dying;
        tracing::info!("Train died at beat {:.2} ({} lives left)", self.timeline.global_beat(), self.lives);
        self.pending_events.push(SessionEvent::TrainDied {
            lives_remaining: self.lives,
            obstacle,
        });

        self.train.transition(TrainStateKind::Null, None);
        self.drain_train_events();

        let delay = if self.lives == 0 {
            self.settings.final_death_delay_secs
        } else {
            self.settings.death_delay_secs
        };
        self.timers.schedule(delay, SessionAction::ResolveDeath);
    }

    /// Open or close the pause menu
    pub fn set_paused(&mut self, paused: bool) {
        if self.paused == paused {
            return;
        }

        self.paused = paused;
        self.timeline.pause(paused);
        self.show_menu(if paused { MenuType::Pause } else { MenuType::None });
    }

    fn resolve_death(&mut self) {
        if self.lives == 0 {
            tracing::info!("Game over");
            self.phase = RunPhase::Over { win: false };
            self.timeline.pause(true);
            self.show_menu(MenuType::Lose);
            self.pending_events.push(SessionEvent::GameOver { win: false });
            return;
        }

        let track_idx = self.timeline.restart_from_last_checkpoint();
        self.obstacles.reset_from(self.timeline.global_beat());
        self.timers.cancel_all();
        self.train.reset();
        self.drain_train_events();
        self.phase = RunPhase::Running;
        self.show_menu(MenuType::None);
        self.pending_events.push(SessionEvent::Reset { track_idx });
    }

    fn on_win(&mut self) {
        // A dead train does not win; the pending death resolves as usual
        if self.phase != RunPhase::Running {
            return;
        }

        tracing::info!("Reached the end of the tracklist");
        self.phase = RunPhase::Over { win: true };
        self.show_menu(MenuType::Win);
        self.pending_events.push(SessionEvent::GameOver { win: true });
    }

    fn exit_to_menu(&mut self) {
        tracing::info!("Exit to main menu");
        self.phase = RunPhase::Idle;
        self.paused = false;
        self.timers.cancel_all();
        self.timeline.pause(true);
        self.show_menu(MenuType::Main);
        self.pending_events.push(SessionEvent::ExitToMenu);
    }

    fn check_restart_combo(&mut self, keyboard: &Keyboard) {
        let held = keyboard.all_down(&self.settings.restart_combo);
        if held && !self.combo_held {
            tracing::info!("Restart combo");
            if let Err(err) = self.restart_level() {
                tracing::error!("Restart failed: {err}");
            }
        }
        self.combo_held = held;
    }

    fn handle_menu_keys(&mut self, keyboard: &Keyboard) {
        if keyboard.key_pressed(Key::Escape) {
            match self.menu.current() {
                MenuType::None if self.phase.is_in_play() => self.set_paused(true),
                MenuType::Pause => self.set_paused(false),
                MenuType::Lose | MenuType::Win => self.exit_to_menu(),
                _ => {}
            }
        } else if keyboard.key_pressed(Key::Submit) {
            match self.menu.current() {
                MenuType::Pause => self.set_paused(false),
                MenuType::Main => {
                    if let Err(err) = self.restart_level() {
                        tracing::error!("Failed to start run: {err}");
                    }
                }
                _ => {}
            }
        }
    }

    fn show_menu(&mut self, menu: MenuType) {
        if self.menu.current() != menu {
            let revealed = self.menu.show(menu);
            self.pending_events.push(SessionEvent::MenuShown(menu));
            self.pending_events
                .extend(revealed.into_iter().map(SessionEvent::ElementRevealed));
        }
    }

    fn drain_train_events(&mut self) {
        self.pending_events
            .extend(self.train.take_events().into_iter().map(SessionEvent::Train));
    }

    /// Get pending events and clear them
    pub fn take_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.pending_events)
    }

    /// Train world position
    pub fn position(&self) -> Vec3 {
        self.timeline.position()
    }

    /// Current phase
    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    /// Lives left
    pub fn lives(&self) -> u32 {
        self.lives
    }

    /// Whether the pause menu is holding the run
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Menu state
    pub fn menu(&self) -> &Menu {
        &self.menu
    }

    /// Playback timeline
    pub fn timeline(&self) -> &PlaybackTimeline<S> {
        &self.timeline
    }

    /// Train state machine
    pub fn train(&self) -> &TrainController {
        &self.train
    }

    /// Obstacles and their status
    pub fn obstacles(&self) -> &ObstacleCourse {
        &self.obstacles
    }
}

impl GameSession<SimulatedSource> {
    /// Session over simulated music and railway channels
    pub fn simulated(config: &GameConfig) -> Result<Self, ConfigError> {
        let music = SimulatedSource::for_tracklist(&config.build_tracklist()?);
        let railway = music.clone();
        Self::new(config, music, Some(railway))
    }
}
