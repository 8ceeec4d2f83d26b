// SPDX-License-Identifier: MIT OR Apache-2.0
//! Fixed-step clock for headless runs.
//!
//! Wall-clock frame deltas are scaled and accumulated, then handed out as a
//! whole number of fixed simulation steps.

/// Clock state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClockState {
    /// Not started, or stopped
    #[default]
    Stopped,
    /// Producing steps
    Running,
}

/// Upper bound on steps handed out for a single frame
const MAX_STEPS_PER_FRAME: u32 = 8;

/// Rounding slack when comparing accumulated time against a step
const STEP_EPSILON: f64 = 1e-9;

/// Turns variable frame deltas into fixed simulation steps
#[derive(Debug, Clone)]
pub struct RunClock {
    /// Current state
    pub state: ClockState,
    /// Seconds per simulation step
    pub fixed_step: f64,
    /// Time scale for simulation (1.0 = normal speed)
    pub time_scale: f32,
    /// Unconsumed scaled time
    accumulated_time: f64,
    /// Frames fed since start
    pub frame_count: u64,
    /// Scaled seconds since start
    pub elapsed_time: f64,
}

impl RunClock {
    /// Clock producing `steps_per_second` steps per scaled second
    pub fn new(steps_per_second: u32) -> Self {
        Self {
            state: ClockState::Stopped,
            fixed_step: 1.0 / f64::from(steps_per_second.max(1)),
            time_scale: 1.0,
            accumulated_time: 0.0,
            frame_count: 0,
            elapsed_time: 0.0,
        }
    }

    /// Start from zero; returns false if already running
    pub fn start(&mut self) -> bool {
        if self.state == ClockState::Running {
            return false;
        }
        self.state = ClockState::Running;
        self.frame_count = 0;
        self.elapsed_time = 0.0;
        self.accumulated_time = 0.0;
        tracing::info!("Clock started at {:.1} steps/s (scale {})", 1.0 / self.fixed_step, self.time_scale);
        true
    }

    /// Stop and drop any accumulated time
    pub fn stop(&mut self) {
        if self.state == ClockState::Running {
            tracing::info!("Clock stopped after {} frames ({:.2}s)", self.frame_count, self.elapsed_time);
        }
        self.state = ClockState::Stopped;
        self.accumulated_time = 0.0;
    }

    /// Feed one frame; returns the number of fixed steps to run
    pub fn update(&mut self, delta_time: f64) -> u32 {
        if self.state != ClockState::Running {
            return 0;
        }

        let scaled_delta = delta_time * f64::from(self.time_scale);
        self.elapsed_time += scaled_delta;
        self.accumulated_time += scaled_delta;
        self.frame_count += 1;

        let mut steps = 0;
        while self.accumulated_time + STEP_EPSILON >= self.fixed_step {
            self.accumulated_time = (self.accumulated_time - self.fixed_step).max(0.0);
            steps += 1;

            if steps >= MAX_STEPS_PER_FRAME {
                self.accumulated_time = 0.0;
                break;
            }
        }

        steps
    }

    /// Step length in seconds, as handed to the session
    pub fn step_secs(&self) -> f32 {
        self.fixed_step as f32
    }

    /// Set time scale (clamped to reasonable range)
    pub fn set_time_scale(&mut self, scale: f32) {
        self.time_scale = scale.clamp(0.0, 10.0);
    }
}

impl Default for RunClock {
    fn default() -> Self {
        Self::new(60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_steps_accumulate() {
        let mut clock = RunClock::new(10);
        assert_eq!(clock.update(1.0), 0);
        clock.start();
        assert_eq!(clock.update(0.25), 2);
        assert_eq!(clock.update(0.05), 1);
        assert_eq!(clock.frame_count, 2);
    }

    #[test]
    fn test_spiral_guard() {
        let mut clock = RunClock::new(60);
        clock.start();
        assert_eq!(clock.update(10.0), MAX_STEPS_PER_FRAME);
        assert_eq!(clock.update(0.0), 0);
    }

    #[test]
    fn test_stop_drops_remainder() {
        let mut clock = RunClock::new(10);
        clock.start();
        assert!(!clock.start());
        assert_eq!(clock.update(0.09), 0);
        clock.stop();
        assert_eq!(clock.update(1.0), 0);
        clock.start();
        assert_eq!(clock.update(0.02), 0);
        assert_eq!(clock.frame_count, 1);
    }

    #[test]
    fn test_thirds_add_up() {
        let mut clock = RunClock::new(60);
        clock.start();
        let steps: u32 = (0..90).map(|_| clock.update(1.0 / 30.0)).sum();
        assert_eq!(steps, 180);
    }

    #[test]
    fn test_time_scale() {
        let mut clock = RunClock::new(10);
        clock.start();
        clock.set_time_scale(2.0);
        assert_eq!(clock.update(0.25), 5);
        clock.set_time_scale(100.0);
        assert_eq!(clock.time_scale, 10.0);
    }
}
