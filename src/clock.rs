//! Fixed-step scheduling
//!
//! Hosts feed wall-clock time in and get back how many simulation ticks to
//! run. The simulation itself never looks at a clock.

use std::time::Duration;

use crate::consts::{MAX_SUBSTEPS, TICK_MS};
use crate::sim::{GameState, tick};

/// Accumulator that converts elapsed time into whole ticks
#[derive(Debug, Clone)]
pub struct FixedClock {
    step: Duration,
    accumulator: Duration,
    max_substeps: u32,
}

impl Default for FixedClock {
    fn default() -> Self {
        Self::new(Duration::from_millis(TICK_MS), MAX_SUBSTEPS)
    }
}

impl FixedClock {
    pub fn new(step: Duration, max_substeps: u32) -> Self {
        Self {
            step,
            accumulator: Duration::ZERO,
            max_substeps: max_substeps.max(1),
        }
    }

    pub fn step(&self) -> Duration {
        self.step
    }

    /// Add elapsed time and return how many ticks are due.
    ///
    /// At most `max_substeps` ticks are returned per call; backlog beyond
    /// that is dropped so a stalled host can't spiral.
    pub fn advance(&mut self, elapsed: Duration) -> u32 {
        self.accumulator += elapsed;

        let mut ticks = 0;
        while self.accumulator >= self.step && ticks < self.max_substeps {
            self.accumulator -= self.step;
            ticks += 1;
        }

        if self.accumulator >= self.step {
            log::warn!(
                "Simulation fell behind, dropping {:?} of backlog",
                self.accumulator
            );
            self.accumulator = Duration::ZERO;
        }
        ticks
    }

    /// Time left until the next tick boundary
    pub fn until_next(&self) -> Duration {
        self.step.saturating_sub(self.accumulator)
    }

    /// Advance the clock and run every due tick on `state`
    pub fn pump(&mut self, state: &mut GameState, elapsed: Duration) -> u32 {
        let ticks = self.advance(elapsed);
        for _ in 0..ticks {
            tick(state);
        }
        ticks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::Tuning;

    #[test]
    fn test_whole_ticks() {
        let mut clock = FixedClock::default();
        assert_eq!(clock.advance(Duration::from_millis(50)), 1);
        assert_eq!(clock.advance(Duration::from_millis(120)), 2);
        assert_eq!(clock.until_next(), Duration::from_millis(30));
    }

    #[test]
    fn test_partial_steps_accumulate() {
        let mut clock = FixedClock::default();
        assert_eq!(clock.advance(Duration::from_millis(30)), 0);
        assert_eq!(clock.advance(Duration::from_millis(30)), 1);
        assert_eq!(clock.until_next(), Duration::from_millis(40));
    }

    #[test]
    fn test_backlog_is_capped() {
        let mut clock = FixedClock::default();
        assert_eq!(clock.advance(Duration::from_secs(10)), MAX_SUBSTEPS);
        assert_eq!(clock.until_next(), clock.step());
    }

    #[test]
    fn test_pump_runs_ticks() {
        let mut state = GameState::new(3, 800.0, 600.0, Tuning::default()).unwrap();
        let mut clock = FixedClock::default();
        assert_eq!(clock.pump(&mut state, Duration::from_millis(160)), 3);
        assert_eq!(state.time_ticks, 3);
    }
}
