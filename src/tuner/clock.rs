//! Phase state machine and elapsed-time bookkeeping.
//!
//! The clock never reads wall-clock time itself: every operation takes `now`,
//! a monotonic timestamp owned by the caller.

use std::time::Duration;

use crate::config::{MAX_BREATHS, ROUNDING_MS};
use crate::error::{BreathError, Result};
use crate::state::{ClockState, Phase};

/// Rounds milliseconds to the nearest [`ROUNDING_MS`], halves rounding up.
///
/// The displayed timer and the rendered geometry both consume this value.
pub fn round_elapsed(ms: u64) -> u64 {
    (ms + ROUNDING_MS / 2) / ROUNDING_MS * ROUNDING_MS
}

/// Tracks the running phase, the breath index and when the phase started
#[derive(Debug, Clone)]
pub struct PhaseClock {
    state: ClockState,
    /// Phase of the running or most recently stopped half-breath
    last_phase: Option<Phase>,
    /// Index of the breath in progress or last completed; -1 before the first
    breath_index: i32,
    phase_start: Option<Duration>,
}

impl Default for PhaseClock {
    fn default() -> Self {
        Self {
            state: ClockState::Idle,
            last_phase: None,
            breath_index: -1,
            phase_start: None,
        }
    }
}

impl PhaseClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ClockState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state.is_running()
    }

    /// Running phase, or the last one while paused
    pub fn phase(&self) -> Option<Phase> {
        self.last_phase
    }

    pub fn breath_index(&self) -> i32 {
        self.breath_index
    }

    pub fn phase_start(&self) -> Option<Duration> {
        self.phase_start
    }

    /// Phase the next start will enter: the opposite of the last one, or a
    /// fresh exhale when there is none
    pub fn next_phase(&self) -> Phase {
        self.last_phase.map_or(Phase::Exhaling, Phase::flipped)
    }

    /// Checks that the next start fits within [`MAX_BREATHS`]
    pub fn check_capacity(&self) -> Result<Phase> {
        let next = self.next_phase();
        if next == Phase::Exhaling && self.breath_index + 1 >= MAX_BREATHS {
            return Err(BreathError::CapacityExceeded { max: MAX_BREATHS });
        }
        Ok(next)
    }

    /// Unrounded milliseconds since the running phase started
    pub fn raw_elapsed_ms(&self, now: Duration) -> Option<u64> {
        self.phase_start
            .map(|start| now.saturating_sub(start).as_millis() as u64)
    }

    /// Milliseconds since the running phase started, rounded for display
    pub fn elapsed_ms(&self, now: Duration) -> Option<u64> {
        self.raw_elapsed_ms(now).map(round_elapsed)
    }

    /// Starts the next phase. Entering an exhale opens a new breath.
    ///
    /// Must only be called while idle.
    pub fn start(&mut self, now: Duration) -> Result<Phase> {
        debug_assert!(!self.is_running(), "phase started while another runs");
        let phase = self.check_capacity()?;
        if phase == Phase::Exhaling {
            self.breath_index += 1;
        }
        self.state = ClockState::Running(phase);
        self.last_phase = Some(phase);
        self.phase_start = Some(now);
        Ok(phase)
    }

    /// Freezes the running phase and returns it with its rounded duration.
    ///
    /// Returns `None` when idle.
    pub fn halt(&mut self, now: Duration) -> Option<(Phase, u64)> {
        let ClockState::Running(phase) = self.state else {
            return None;
        };
        let elapsed = self.elapsed_ms(now).unwrap_or(0);
        self.state = ClockState::Idle;
        self.phase_start = None;
        Some((phase, elapsed))
    }

    /// Steps back one breath so the next start opens a fresh exhale at the
    /// removed index. Returns the removed index, or `None` with no breaths.
    ///
    /// Must only be called while idle.
    pub fn rewind(&mut self) -> Option<i32> {
        debug_assert!(!self.is_running(), "rewind while a phase runs");
        if self.breath_index <= -1 {
            return None;
        }
        let removed = self.breath_index;
        self.breath_index -= 1;
        self.last_phase = None;
        Some(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    #[test]
    fn rounding_is_half_up_to_deciseconds() {
        assert_eq!(round_elapsed(0), 0);
        assert_eq!(round_elapsed(49), 0);
        assert_eq!(round_elapsed(50), 100);
        assert_eq!(round_elapsed(1049), 1000);
        assert_eq!(round_elapsed(1050), 1100);
        assert_eq!(round_elapsed(2299), 2300);
    }

    #[test]
    fn first_start_opens_breath_zero_with_an_exhale() {
        let mut clock = PhaseClock::new();
        assert_eq!(clock.breath_index(), -1);
        assert_eq!(clock.start(ms(10)).unwrap(), Phase::Exhaling);
        assert_eq!(clock.breath_index(), 0);
        assert_eq!(clock.state(), ClockState::Running(Phase::Exhaling));
        assert_eq!(clock.phase_start(), Some(ms(10)));
    }

    #[test]
    fn halt_reports_rounded_duration_and_keeps_phase() {
        let mut clock = PhaseClock::new();
        clock.start(ms(1_000)).unwrap();
        assert_eq!(clock.halt(ms(3_349)), Some((Phase::Exhaling, 2_300)));
        assert_eq!(clock.state(), ClockState::Idle);
        assert_eq!(clock.phase(), Some(Phase::Exhaling));
        assert_eq!(clock.phase_start(), None);
        assert_eq!(clock.halt(ms(4_000)), None);
    }

    #[test]
    fn resuming_after_a_paused_exhale_inhales_the_same_breath() {
        let mut clock = PhaseClock::new();
        clock.start(ms(0)).unwrap();
        clock.halt(ms(1_000));
        assert_eq!(clock.start(ms(5_000)).unwrap(), Phase::Inhaling);
        assert_eq!(clock.breath_index(), 0);
        clock.halt(ms(6_000));
        assert_eq!(clock.start(ms(7_000)).unwrap(), Phase::Exhaling);
        assert_eq!(clock.breath_index(), 1);
    }

    #[test]
    fn elapsed_before_start_saturates() {
        let mut clock = PhaseClock::new();
        clock.start(ms(500)).unwrap();
        assert_eq!(clock.elapsed_ms(ms(100)), Some(0));
    }

    #[test]
    fn rewind_forces_a_fresh_exhale() {
        let mut clock = PhaseClock::new();
        assert_eq!(clock.rewind(), None);

        clock.start(ms(0)).unwrap();
        clock.halt(ms(1_000));
        clock.start(ms(1_000)).unwrap();
        clock.halt(ms(2_000));
        assert_eq!(clock.rewind(), Some(0));
        assert_eq!(clock.breath_index(), -1);
        assert_eq!(clock.phase(), None);
        assert_eq!(clock.next_phase(), Phase::Exhaling);
    }

    #[test]
    fn capacity_blocks_only_new_breaths() {
        let mut clock = PhaseClock::new();
        for breath in 0..MAX_BREATHS as u64 {
            clock.start(ms(breath * 2)).unwrap();
            clock.halt(ms(breath * 2 + 1));
            clock.start(ms(breath * 2 + 1)).unwrap();
            clock.halt(ms(breath * 2 + 2));
        }
        assert_eq!(clock.breath_index(), MAX_BREATHS - 1);
        assert!(matches!(
            clock.start(ms(1_000)),
            Err(BreathError::CapacityExceeded { max }) if max == MAX_BREATHS
        ));
        assert_eq!(clock.breath_index(), MAX_BREATHS - 1);
        assert!(!clock.is_running());
    }
}
