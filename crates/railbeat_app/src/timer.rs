// SPDX-License-Identifier: MIT OR Apache-2.0
//! Cancellable delayed actions advanced by game time.

/// Handle to a scheduled action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

#[derive(Debug, Clone)]
struct PendingTimer<A> {
    id: TimerId,
    remaining: f32,
    action: A,
}

/// Queue of actions that fire after a delay
#[derive(Debug, Clone)]
pub struct TimerQueue<A> {
    next_id: u64,
    pending: Vec<PendingTimer<A>>,
}

impl<A> TimerQueue<A> {
    /// Create an empty queue
    pub fn new() -> Self {
        Self {
            next_id: 0,
            pending: Vec::new(),
        }
    }

    /// Fire `action` after `delay_secs`
    pub fn schedule(&mut self, delay_secs: f32, action: A) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.pending.push(PendingTimer {
            id,
            remaining: delay_secs,
            action,
        });
        id
    }

    /// Drop a pending action, returning it if it had not fired
    pub fn cancel(&mut self, id: TimerId) -> Option<A> {
        let idx = self.pending.iter().position(|t| t.id == id)?;
        Some(self.pending.remove(idx).action)
    }

    /// Drop every pending action, returning how many were dropped
    pub fn cancel_all(&mut self) -> usize {
        let count = self.pending.len();
        self.pending.clear();
        count
    }

    /// Advance time; returns the actions that came due, earliest first
    pub fn advance(&mut self, delta_secs: f32) -> Vec<A> {
        for timer in &mut self.pending {
            timer.remaining -= delta_secs;
        }

        let (mut due, rest): (Vec<_>, Vec<_>) = std::mem::take(&mut self.pending)
            .into_iter()
            .partition(|t| t.remaining <= 0.0);
        self.pending = rest;

        due.sort_by(|a, b| a.remaining.total_cmp(&b.remaining).then(a.id.0.cmp(&b.id.0)));
        due.into_iter().map(|t| t.action).collect()
    }

    /// Seconds left before `id` fires
    pub fn remaining(&self, id: TimerId) -> Option<f32> {
        self.pending.iter().find(|t| t.id == id).map(|t| t.remaining)
    }

    /// Number of pending actions
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Whether nothing is pending
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

impl<A> Default for TimerQueue<A> {
    fn default() -> Self {
        Self::new()
    }
}
