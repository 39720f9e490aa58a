//! Per-breath running statistics and their display formatting.
//!
//! Rows form an append-only ledger indexed by breath: row `i` is derived from
//! row `i - 1` (or the all-zero row for the first breath) plus breath `i`'s
//! phase durations. Only the newest row may be rewritten or removed, which
//! keeps every later row consistent with its predecessor.

use serde::{Deserialize, Serialize};

use crate::error::{BreathError, Result};

/// Cumulative statistics up to and including one breath
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatsRow {
    pub index: i32,
    /// This breath's exhale
    pub exhale_ms: u64,
    /// This breath's inhale, unset until the inhale completes
    pub inhale_ms: Option<u64>,
    pub exh_sum: u64,
    pub exh_avg: f64,
    /// Inhale-side fields of an incomplete row still describe its predecessor
    pub inh_sum: u64,
    pub inh_avg: f64,
    pub breath_sum: u64,
    pub breath_avg: f64,
    /// Percentage of `breath_sum`; `None` while `breath_sum` is zero
    pub exh_ratio: Option<f64>,
    pub inh_ratio: Option<f64>,
}

impl StatsRow {
    /// Predecessor of the first breath
    pub const ZERO: StatsRow = StatsRow {
        index: -1,
        exhale_ms: 0,
        inhale_ms: Some(0),
        exh_sum: 0,
        exh_avg: 0.0,
        inh_sum: 0,
        inh_avg: 0.0,
        breath_sum: 0,
        breath_avg: 0.0,
        exh_ratio: None,
        inh_ratio: None,
    };

    pub fn is_complete(&self) -> bool {
        self.inhale_ms.is_some()
    }

    /// Exhale plus inhale of this breath alone
    pub fn breath_ms(&self) -> Option<u64> {
        self.inhale_ms.map(|inhale| self.exhale_ms + inhale)
    }
}

fn ratio(part: u64, whole: u64) -> Option<f64> {
    (whole > 0).then(|| 100.0 * part as f64 / whole as f64)
}

/// Append-only ledger of [`StatsRow`]s with pop-last undo
#[derive(Debug, Clone, Default)]
pub struct StatsEngine {
    rows: Vec<StatsRow>,
}

impl StatsEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rows(&self) -> &[StatsRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Highest recorded index, -1 when empty
    pub fn last_index(&self) -> i32 {
        self.rows.len() as i32 - 1
    }

    fn predecessor(&self, index: i32) -> StatsRow {
        if index <= 0 {
            StatsRow::ZERO
        } else {
            self.rows[index as usize - 1]
        }
    }

    /// Rejects indexes other than the newest row or the one after it
    fn check_writable(&self, index: i32, append_allowed: bool) -> Result<()> {
        let next = self.rows.len() as i32;
        let reason = if index < 0 {
            "negative breath index"
        } else if index > next || (index == next && !append_allowed) {
            if append_allowed {
                "exhale skips a breath"
            } else {
                "inhale without a recorded exhale"
            }
        } else if index < next - 1 {
            "only the latest breath can be rewritten"
        } else {
            return Ok(());
        };
        Err(BreathError::Sequence { index, reason })
    }

    /// Creates or overwrites row `index` with a new exhale. Overwriting clears
    /// the breath's inhale.
    pub fn record_exhale(&mut self, index: i32, duration_ms: u64) -> Result<&StatsRow> {
        self.check_writable(index, true)?;
        let prev = self.predecessor(index);
        let count = (index + 1) as f64;
        let exh_sum = prev.exh_sum + duration_ms;

        let row = StatsRow {
            index,
            exhale_ms: duration_ms,
            inhale_ms: None,
            exh_sum,
            exh_avg: exh_sum as f64 / count,
            inh_sum: prev.inh_sum,
            inh_avg: prev.inh_avg,
            breath_sum: prev.breath_sum,
            breath_avg: prev.breath_avg,
            exh_ratio: prev.exh_ratio,
            inh_ratio: prev.inh_ratio,
        };

        self.rows.truncate(index as usize);
        self.rows.push(row);
        Ok(&self.rows[index as usize])
    }

    /// Completes row `index` with its inhale and derives the breath totals
    pub fn record_inhale(&mut self, index: i32, duration_ms: u64) -> Result<&StatsRow> {
        self.check_writable(index, false)?;
        let prev = self.predecessor(index);
        let count = (index + 1) as f64;
        let row = &mut self.rows[index as usize];

        let inh_sum = prev.inh_sum + duration_ms;
        let breath_sum = prev.breath_sum + row.exhale_ms + duration_ms;

        row.inhale_ms = Some(duration_ms);
        row.inh_sum = inh_sum;
        row.inh_avg = inh_sum as f64 / count;
        row.breath_sum = breath_sum;
        row.breath_avg = breath_sum as f64 / count;
        row.exh_ratio = ratio(row.exh_sum, breath_sum);
        row.inh_ratio = ratio(inh_sum, breath_sum);
        Ok(&*row)
    }

    /// Removes the newest row
    pub fn pop_last(&mut self) -> Result<StatsRow> {
        self.rows.pop().ok_or(BreathError::Empty)
    }

    /// Row for `index`; index -1 yields [`StatsRow::ZERO`]
    pub fn row_at(&self, index: i32) -> Option<StatsRow> {
        match index {
            -1 => Some(StatsRow::ZERO),
            i if i < -1 => None,
            i => self.rows.get(i as usize).copied(),
        }
    }

    /// Newest row whose breath has both phases recorded
    pub fn latest_complete(&self) -> Option<&StatsRow> {
        self.rows.iter().rev().find(|row| row.is_complete())
    }
}

/// Formats milliseconds as seconds with one decimal ("2.3")
pub fn format_seconds(ms: f64) -> String {
    let deciseconds = (ms.max(0.0) / 100.0).round() as u64;
    format!("{}.{}", deciseconds / 10, deciseconds % 10)
}

/// Formats milliseconds as minutes and seconds ("1:05.3")
pub fn format_minutes(ms: u64) -> String {
    let deciseconds = (ms + 50) / 100;
    let minutes = deciseconds / 600;
    let rest = deciseconds % 600;
    format!("{}:{:02}.{}", minutes, rest / 10, rest % 10)
}

/// Formats a percentage with one decimal; undefined ratios become a dash
pub fn format_ratio(ratio: Option<f64>) -> String {
    match ratio {
        Some(value) if value.is_finite() => {
            let tenths = (value * 10.0).round() as i64;
            format!("{}.{}%", tenths / 10, tenths % 10)
        }
        _ => "—".to_string(),
    }
}

/// Pre-formatted statistics table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatsDisplay {
    pub exh_sum: String,
    pub exh_avg: String,
    pub exh_ratio: String,
    pub inh_sum: String,
    pub inh_avg: String,
    pub inh_ratio: String,
    pub breath_sum: String,
    pub breath_avg: String,
}

impl From<&StatsRow> for StatsDisplay {
    fn from(row: &StatsRow) -> Self {
        Self {
            exh_sum: format_minutes(row.exh_sum),
            exh_avg: format_seconds(row.exh_avg),
            exh_ratio: format_ratio(row.exh_ratio),
            inh_sum: format_minutes(row.inh_sum),
            inh_avg: format_seconds(row.inh_avg),
            inh_ratio: format_ratio(row.inh_ratio),
            breath_sum: format_minutes(row.breath_sum),
            breath_avg: format_seconds(row.breath_avg),
        }
    }
}

impl Default for StatsDisplay {
    fn default() -> Self {
        Self::from(&StatsRow::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn breath(engine: &mut StatsEngine, index: i32, exhale: u64, inhale: u64) -> StatsRow {
        engine.record_exhale(index, exhale).unwrap();
        *engine.record_inhale(index, inhale).unwrap()
    }

    #[test]
    fn single_breath_totals_and_ratios() {
        let mut engine = StatsEngine::new();
        let row = breath(&mut engine, 0, 2_300, 1_800);
        assert_eq!(row.exh_sum, 2_300);
        assert_eq!(row.inh_sum, 1_800);
        assert_eq!(row.breath_sum, 4_100);
        assert!((row.exh_ratio.unwrap() - 56.097_56).abs() < 1e-3);
        assert!((row.inh_ratio.unwrap() - 43.902_43).abs() < 1e-3);

        let display = StatsDisplay::from(&row);
        assert_eq!(display.exh_ratio, "56.1%");
        assert_eq!(display.inh_ratio, "43.9%");
        assert_eq!(display.breath_sum, "0:04.1");
        assert_eq!(display.breath_avg, "4.1");
    }

    #[test]
    fn rows_accumulate_from_their_predecessor() {
        let mut engine = StatsEngine::new();
        breath(&mut engine, 0, 2_000, 2_000);
        let row = breath(&mut engine, 1, 4_000, 2_000);
        assert_eq!(row.exh_sum, 6_000);
        assert_eq!(row.inh_sum, 4_000);
        assert_eq!(row.breath_sum, 10_000);
        assert_eq!(row.exh_avg, 3_000.0);
        assert_eq!(row.inh_avg, 2_000.0);
        assert_eq!(row.breath_avg, 5_000.0);
        assert_eq!(row.breath_sum, row.exh_sum + row.inh_sum);
        assert!((row.exh_ratio.unwrap() + row.inh_ratio.unwrap() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn inhale_without_exhale_is_a_sequence_error() {
        let mut engine = StatsEngine::new();
        assert!(matches!(
            engine.record_inhale(0, 1_000),
            Err(BreathError::Sequence { index: 0, .. })
        ));
        breath(&mut engine, 0, 1_000, 1_000);
        assert!(matches!(
            engine.record_inhale(1, 1_000),
            Err(BreathError::Sequence { index: 1, .. })
        ));
        assert!(matches!(
            engine.record_exhale(3, 1_000),
            Err(BreathError::Sequence { index: 3, .. })
        ));
    }

    #[test]
    fn only_the_latest_row_can_be_rewritten() {
        let mut engine = StatsEngine::new();
        breath(&mut engine, 0, 1_000, 1_000);
        breath(&mut engine, 1, 1_000, 1_000);
        assert!(engine.record_exhale(0, 500).is_err());
        assert!(engine.record_inhale(0, 500).is_err());

        let row = *engine.record_exhale(1, 3_000).unwrap();
        assert_eq!(row.inhale_ms, None);
        assert_eq!(row.exh_sum, 4_000);
        assert_eq!(engine.len(), 2);
    }

    #[test]
    fn zero_length_breath_has_undefined_ratios() {
        let mut engine = StatsEngine::new();
        let row = breath(&mut engine, 0, 0, 0);
        assert_eq!(row.breath_sum, 0);
        assert_eq!(row.exh_ratio, None);
        assert_eq!(format_ratio(row.inh_ratio), "—");
        assert_eq!(format_ratio(Some(f64::NAN)), "—");
    }

    #[test]
    fn pop_last_restores_the_previous_ledger() {
        let mut engine = StatsEngine::new();
        assert!(matches!(engine.pop_last(), Err(BreathError::Empty)));

        let first = breath(&mut engine, 0, 2_000, 2_000);
        breath(&mut engine, 1, 4_000, 2_000);
        assert_eq!(engine.pop_last().unwrap().index, 1);
        assert_eq!(engine.row_at(0), Some(first));
        assert_eq!(engine.last_index(), 0);
        assert_eq!(breath(&mut engine, 1, 4_000, 2_000).breath_sum, 10_000);
    }

    #[test]
    fn row_lookup_has_a_zero_base_case() {
        let engine = StatsEngine::new();
        assert_eq!(engine.row_at(-1), Some(StatsRow::ZERO));
        assert_eq!(engine.row_at(-2), None);
        assert_eq!(engine.row_at(0), None);
        assert!(engine.latest_complete().is_none());
    }

    #[test]
    fn latest_complete_skips_a_pending_inhale() {
        let mut engine = StatsEngine::new();
        breath(&mut engine, 0, 1_000, 2_000);
        engine.record_exhale(1, 3_000).unwrap();
        assert_eq!(engine.latest_complete().map(|row| row.index), Some(0));
    }

    #[test]
    fn formats_match_the_stats_table() {
        assert_eq!(format_seconds(2_300.0), "2.3");
        assert_eq!(format_seconds(1_366.67), "1.4");
        assert_eq!(format_seconds(0.0), "0.0");
        assert_eq!(format_minutes(4_100), "0:04.1");
        assert_eq!(format_minutes(65_300), "1:05.3");
        assert_eq!(format_minutes(600_000), "10:00.0");
        assert_eq!(format_ratio(Some(100.0)), "100.0%");
        assert_eq!(StatsDisplay::default().exh_ratio, "—");
        assert_eq!(StatsDisplay::default().breath_sum, "0:00.0");
    }
}
