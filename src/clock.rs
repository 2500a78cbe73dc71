/*
 * Simulation Clock Module
 *
 * Turns host frame timestamps into integration steps. The clock is either
 * Running or Paused. While paused it keeps following the timestamps but
 * produces no step, so resuming never sees the paused interval. While running
 * the step is clamped so one stalled frame cannot launch agents across the
 * arena.
 */

use std::time::Duration;

// Longest step ever handed to the integrator
pub const MAX_DELTA: Duration = Duration::from_millis(300);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockState {
    Running,
    Paused,
}

#[derive(Debug, Clone)]
pub struct SimulationClock {
    state: ClockState,
    last_timestamp: Option<Duration>,
    max_delta: Duration,
}

impl Default for SimulationClock {
    fn default() -> Self {
        Self::new(MAX_DELTA)
    }
}

impl SimulationClock {
    pub fn new(max_delta: Duration) -> Self {
        Self {
            state: ClockState::Running,
            last_timestamp: None,
            max_delta,
        }
    }

    pub fn state(&self) -> ClockState {
        self.state
    }

    // Advance to `now`. Returns the step in seconds, or None while paused.
    // The first frame and any frame with a timestamp earlier than the last one yield 0.
    pub fn tick(&mut self, now: Duration, paused: bool) -> Option<f32> {
        let previous = self.last_timestamp.replace(now);

        if paused {
            self.state = ClockState::Paused;
            return None;
        }
        self.state = ClockState::Running;

        let elapsed = previous.map_or(Duration::ZERO, |previous| now.saturating_sub(previous));
        Some(elapsed.min(self.max_delta).as_secs_f32())
    }
}
