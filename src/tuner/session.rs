//! The tuner core: phase commands, live ticking and display queries.

use std::time::Duration;

use bevy::log::{debug, error, info, warn};
use bevy::prelude::Resource;

use crate::config::DOUBLE_PRESS_WINDOW_MS;
use crate::error::BreathError;
use crate::metrics::{format_seconds, StatsDisplay, StatsEngine, StatsRow};
use crate::state::{ClockState, Phase};
use crate::tuner::clock::PhaseClock;
use crate::tuner::report::SessionReport;
use crate::tuner::timeline::{ColumnPosition, DrawCommand, TimelineRenderer};

/// Breath tuning session.
///
/// Commands (`toggle`, `stop`, `undo`, `on_tick`) take the caller's monotonic
/// `now` and must be serialized. Draw output accumulates in an ordered queue
/// that the display drains with [`BreathTuner::take_draw_commands`].
#[derive(Resource, Debug, Default)]
pub struct BreathTuner {
    clock: PhaseClock,
    timeline: TimelineRenderer,
    stats: StatsEngine,
    draw_queue: Vec<DrawCommand>,
    /// Last displayed exhale time
    exhale_ms: u64,
    /// Last displayed inhale time
    inhale_ms: u64,
}

impl BreathTuner {
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Commands
    // =========================================================================

    /// Stops the running phase (if any) and starts the alternating one.
    ///
    /// A toggle that would open a breath past [`crate::config::MAX_BREATHS`]
    /// changes nothing.
    pub fn toggle(&mut self, now: Duration) {
        if let Err(err) = self.clock.check_capacity() {
            debug!("Toggle ignored: {}", err);
            return;
        }

        if let Some(since_start) = self.clock.raw_elapsed_ms(now) {
            if since_start < DOUBLE_PRESS_WINDOW_MS {
                debug!("Rapid toggle {}ms into the phase", since_start);
            }
        }

        self.stop(now);
        self.start(now);
    }

    fn start(&mut self, now: Duration) {
        let phase = match self.clock.start(now) {
            Ok(phase) => phase,
            Err(err) => {
                debug!("Phase not started: {}", err);
                return;
            }
        };

        let index = self.clock.breath_index();
        if phase == Phase::Exhaling {
            self.timeline.advance_column(index);
        }
        self.timeline.reset_cursor();
        self.set_displayed(phase, 0);
        info!("Breath {}: {}", index + 1, phase.name());
    }

    /// Renders the remainder of the running phase and records its duration
    pub fn stop(&mut self, now: Duration) {
        let Some((phase, elapsed)) = self.clock.halt(now) else {
            return;
        };
        let index = self.clock.breath_index();
        self.flush(phase, elapsed, index);

        let recorded = match phase {
            Phase::Exhaling => self.stats.record_exhale(index, elapsed).map(|_| ()),
            Phase::Inhaling => self.stats.record_inhale(index, elapsed).map(|_| ()),
        };
        if let Err(err) = &recorded {
            error!("Could not record breath {} {}: {}", index + 1, phase.name(), err);
        }
        debug_assert!(recorded.is_ok(), "statistics ledger out of sequence");

        info!(
            "Breath {} {} for {}s",
            index + 1,
            phase.name(),
            format_seconds(elapsed as f64)
        );
    }

    /// Stops, then removes the newest breath from the canvas and the ledger.
    /// The next toggle starts a fresh exhale at the removed index.
    pub fn undo(&mut self, now: Duration) {
        if self.clock.breath_index() <= -1 {
            debug!("Undo ignored: {}", BreathError::Empty);
            return;
        }

        self.stop(now);
        let Some(removed) = self.clock.rewind() else {
            return;
        };

        let erase = self.timeline.undo_last_breath(removed);
        self.draw_queue.extend(erase);

        match self.stats.pop_last() {
            Ok(row) => {
                if row.index != removed {
                    error!(
                        "Undo removed statistics for breath {} instead of {}",
                        row.index + 1,
                        removed + 1
                    );
                }
                debug_assert_eq!(row.index, removed, "statistics ledger out of sequence");
            }
            Err(err) => warn!("Undo found no statistics for breath {}: {}", removed + 1, err),
        }

        self.timeline.advance_column(self.clock.breath_index());
        self.timeline.reset_cursor();
        self.exhale_ms = 0;
        self.inhale_ms = 0;
        info!("Removed breath {}", removed + 1);
    }

    /// Renders the running phase up to `now`; ignored while idle
    pub fn on_tick(&mut self, now: Duration) {
        let ClockState::Running(phase) = self.clock.state() else {
            return;
        };
        let elapsed = self.clock.elapsed_ms(now).unwrap_or(0);
        self.flush(phase, elapsed, self.clock.breath_index());
    }

    fn flush(&mut self, phase: Phase, elapsed_ms: u64, index: i32) {
        let commands = self.timeline.render(elapsed_ms, phase, index);
        self.draw_queue.extend(commands);
        self.set_displayed(phase, elapsed_ms);
    }

    fn set_displayed(&mut self, phase: Phase, elapsed_ms: u64) {
        match phase {
            Phase::Exhaling => self.exhale_ms = elapsed_ms,
            Phase::Inhaling => self.inhale_ms = elapsed_ms,
        }
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn state(&self) -> ClockState {
        self.clock.state()
    }

    pub fn is_running(&self) -> bool {
        self.clock.is_running()
    }

    /// Running phase, or the last one while paused
    pub fn phase(&self) -> Option<Phase> {
        self.clock.phase()
    }

    pub fn breath_index(&self) -> i32 {
        self.clock.breath_index()
    }

    /// One-based breath number for display
    pub fn breath_number(&self) -> i32 {
        self.clock.breath_index() + 1
    }

    /// Whether the next toggle would be refused for lack of capacity
    pub fn at_capacity(&self) -> bool {
        self.clock.check_capacity().is_err()
    }

    /// Displayed time of a phase, rounded to deciseconds
    pub fn phase_ms(&self, phase: Phase) -> u64 {
        match phase {
            Phase::Exhaling => self.exhale_ms,
            Phase::Inhaling => self.inhale_ms,
        }
    }

    /// Phase time in seconds with one decimal
    pub fn phase_text(&self, phase: Phase) -> String {
        format_seconds(self.phase_ms(phase) as f64)
    }

    pub fn stats(&self) -> &StatsEngine {
        &self.stats
    }

    /// Statistics of the newest completed breath
    pub fn latest_stats(&self) -> Option<&StatsRow> {
        self.stats.latest_complete()
    }

    /// Formatted statistics table; zeros before the first completed breath
    pub fn stats_display(&self) -> StatsDisplay {
        self.latest_stats().map(StatsDisplay::from).unwrap_or_default()
    }

    pub fn column(&self) -> ColumnPosition {
        self.timeline.column()
    }

    /// Phase time already on the canvas for the current phase
    pub fn rendered_ms(&self) -> u64 {
        self.timeline.cursor_ms()
    }

    pub fn pending_draw_commands(&self) -> &[DrawCommand] {
        &self.draw_queue
    }

    /// Hands the queued draw commands, in order, to the display
    pub fn take_draw_commands(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.draw_queue)
    }

    /// Snapshot of the recorded breaths for export
    pub fn report(&self) -> SessionReport {
        SessionReport::from_stats(&self.stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MAX_BREATHS;
    use crate::tuner::timeline::ColorBand;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    fn paints(commands: &[DrawCommand]) -> usize {
        commands
            .iter()
            .filter(|command| matches!(command, DrawCommand::Paint { .. }))
            .count()
    }

    #[test]
    fn exhale_inhale_scenario_fills_the_first_row() {
        let mut tuner = BreathTuner::new();
        tuner.toggle(ms(0));
        tuner.on_tick(ms(2_300));
        tuner.toggle(ms(2_300));
        tuner.on_tick(ms(4_100));
        tuner.stop(ms(4_100));

        let row = *tuner.latest_stats().unwrap();
        assert_eq!(row.index, 0);
        assert_eq!((row.exh_sum, row.inh_sum, row.breath_sum), (2_300, 1_800, 4_100));

        let display = tuner.stats_display();
        assert_eq!(display.exh_ratio, "56.1%");
        assert_eq!(display.inh_ratio, "43.9%");
        assert_eq!(tuner.phase_text(Phase::Exhaling), "2.3");
        assert_eq!(tuner.phase_text(Phase::Inhaling), "1.8");
        assert_eq!(tuner.state(), ClockState::Idle);
        assert_eq!(tuner.phase(), Some(Phase::Inhaling));
    }

    #[test]
    fn timer_and_geometry_share_the_rounded_time() {
        let mut tuner = BreathTuner::new();
        tuner.toggle(ms(0));
        tuner.on_tick(ms(1_049));
        assert_eq!(tuner.phase_ms(Phase::Exhaling), 1_000);
        assert_eq!(tuner.rendered_ms(), 1_000);
        assert_eq!(paints(&tuner.take_draw_commands()), 5);

        tuner.on_tick(ms(1_049));
        assert!(tuner.take_draw_commands().is_empty());
    }

    #[test]
    fn stop_flushes_the_remainder_without_a_tick() {
        let mut tuner = BreathTuner::new();
        tuner.toggle(ms(0));
        tuner.stop(ms(3_000));
        let commands = tuner.take_draw_commands();
        assert_eq!(paints(&commands), 15);
        assert!(matches!(
            commands.last(),
            Some(DrawCommand::Paint { band: ColorBand::Orange, .. })
        ));
        assert_eq!(tuner.stats().row_at(0).unwrap().exhale_ms, 3_000);
    }

    #[test]
    fn rapid_toggle_still_switches_and_renders() {
        let mut tuner = BreathTuner::new();
        tuner.toggle(ms(0));
        tuner.toggle(ms(600));
        assert_eq!(tuner.state(), ClockState::Running(Phase::Inhaling));
        assert_eq!(paints(&tuner.take_draw_commands()), 3);
        assert_eq!(tuner.stats().row_at(0).unwrap().exhale_ms, 600);
    }

    #[test]
    fn stop_and_tick_are_ignored_while_idle() {
        let mut tuner = BreathTuner::new();
        tuner.stop(ms(1_000));
        tuner.on_tick(ms(2_000));
        tuner.undo(ms(3_000));
        assert_eq!(tuner.breath_index(), -1);
        assert!(tuner.stats().is_empty());
        assert!(tuner.pending_draw_commands().is_empty());
        assert_eq!(tuner.stats_display(), StatsDisplay::default());
    }

    #[test]
    fn undo_mid_exhale_discards_the_current_breath() {
        let mut tuner = BreathTuner::new();
        tuner.toggle(ms(0));
        tuner.toggle(ms(2_000));
        tuner.toggle(ms(4_000));
        tuner.on_tick(ms(5_000));
        assert_eq!(tuner.breath_number(), 2);

        tuner.take_draw_commands();
        tuner.undo(ms(5_500));
        let commands = tuner.take_draw_commands();
        assert!(matches!(commands.as_slice(), [.., DrawCommand::Erase { .. }, DrawCommand::Erase { rect }] if rect.x == 24));

        assert!(!tuner.is_running());
        assert_eq!(tuner.breath_number(), 1);
        assert_eq!(tuner.stats().len(), 1);
        assert_eq!(tuner.phase_ms(Phase::Exhaling), 0);
        assert_eq!(tuner.phase_ms(Phase::Inhaling), 0);
        assert_eq!(tuner.column(), ColumnPosition::for_breath(0));

        tuner.toggle(ms(6_000));
        assert_eq!(tuner.state(), ClockState::Running(Phase::Exhaling));
        assert_eq!(tuner.breath_number(), 2);
    }

    #[test]
    fn capacity_rejects_the_next_breath_silently() {
        let mut tuner = BreathTuner::new();
        let mut now = 0;
        for _ in 0..MAX_BREATHS * 2 {
            tuner.toggle(ms(now));
            now += 1_000;
        }
        assert_eq!(tuner.state(), ClockState::Running(Phase::Inhaling));
        assert!(tuner.at_capacity());
        tuner.take_draw_commands();

        tuner.toggle(ms(now));
        assert_eq!(tuner.breath_index(), MAX_BREATHS - 1);
        assert_eq!(tuner.state(), ClockState::Running(Phase::Inhaling));
        assert!(tuner.pending_draw_commands().is_empty());

        tuner.stop(ms(now));
        tuner.toggle(ms(now + 1_000));
        assert_eq!(tuner.breath_index(), MAX_BREATHS - 1);
        assert!(!tuner.is_running());
    }
}
