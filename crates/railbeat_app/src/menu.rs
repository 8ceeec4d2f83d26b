// SPDX-License-Identifier: MIT OR Apache-2.0
//! Menu state and delayed element reveals.

use crate::timer::TimerQueue;
use serde::{Deserialize, Serialize};

/// Which menu is open
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MenuType {
    /// In game, no menu
    #[default]
    None,
    /// Title menu
    Main,
    /// Pause menu
    Pause,
    /// Game over
    Lose,
    /// Reached the end of the tracklist
    Win,
}

/// An element shown some time after its menu opens
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DelayedReveal {
    /// Menu the element belongs to
    pub menu: MenuType,
    /// Element name
    pub element: String,
    /// Seconds after the menu opens
    pub delay_secs: f32,
}

/// Tracks the open menu and reveals its delayed elements
#[derive(Debug, Clone)]
pub struct Menu {
    current: MenuType,
    reveals: Vec<DelayedReveal>,
    timers: TimerQueue<String>,
    revealed: Vec<String>,
}

impl Menu {
    /// Open `initial`
    pub fn new(initial: MenuType, reveals: Vec<DelayedReveal>) -> Self {
        let mut menu = Self {
            current: MenuType::None,
            reveals,
            timers: TimerQueue::new(),
            revealed: Vec::new(),
        };
        menu.show(initial);
        menu
    }

    /// Open a menu; reveals pending for the previous one are dropped.
    ///
    /// Returns the elements visible straight away.
    pub fn show(&mut self, menu: MenuType) -> Vec<String> {
        if menu != self.current {
            tracing::info!("Menu: {:?} -> {:?}", self.current, menu);
        }

        self.timers.cancel_all();
        self.revealed.clear();
        self.current = menu;

        for reveal in self.reveals.iter().filter(|r| r.menu == menu) {
            if reveal.delay_secs <= 0.0 {
                self.revealed.push(reveal.element.clone());
            } else {
                self.timers.schedule(reveal.delay_secs, reveal.element.clone());
            }
        }
        self.revealed.clone()
    }

    /// Close whatever is open
    pub fn hide(&mut self) {
        self.show(MenuType::None);
    }

    /// Advance reveal timers; returns the elements that appeared
    pub fn update(&mut self, delta_secs: f32) -> Vec<String> {
        let shown = self.timers.advance(delta_secs);
        self.revealed.extend(shown.iter().cloned());
        shown
    }

    /// Open menu
    pub fn current(&self) -> MenuType {
        self.current
    }

    /// Whether any menu is open
    pub fn is_open(&self) -> bool {
        self.current != MenuType::None
    }

    /// Element is visible
    pub fn is_revealed(&self, element: &str) -> bool {
        self.revealed.iter().any(|e| e == element)
    }
}
