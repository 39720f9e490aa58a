//! Session export: the recorded breaths and latest statistics as JSON.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::MAX_BREATHS;
use crate::error::ExportError;
use crate::metrics::{StatsEngine, StatsRow};

/// One breath's phase durations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreathRecord {
    pub index: i32,
    pub exhale_ms: u64,
    /// Unset when the session was exported mid-breath
    pub inhale_ms: Option<u64>,
}

/// Complete session report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionReport {
    pub timestamp: String,
    pub max_breaths: i32,
    pub breaths: Vec<BreathRecord>,
    /// Statistics of the newest completed breath
    pub summary: Option<StatsRow>,
}

impl SessionReport {
    pub fn from_stats(stats: &StatsEngine) -> Self {
        Self {
            timestamp: chrono::Utc::now().to_rfc3339(),
            max_breaths: MAX_BREATHS,
            breaths: stats
                .rows()
                .iter()
                .map(|row| BreathRecord {
                    index: row.index,
                    exhale_ms: row.exhale_ms,
                    inhale_ms: row.inhale_ms,
                })
                .collect(),
            summary: stats.latest_complete().copied(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.breaths.is_empty()
    }

    /// Save report to a timestamped JSON file inside `dir`
    pub fn save(&self, dir: impl AsRef<Path>) -> Result<PathBuf, ExportError> {
        if self.is_empty() {
            return Err(ExportError::NothingRecorded);
        }

        // Ensure directory exists
        let dir = dir.as_ref();
        if !dir.exists() {
            fs::create_dir_all(dir).map_err(ExportError::CreateDir)?;
        }

        let path = dir.join(format!(
            "session_{}.json",
            chrono::Utc::now().format("%Y%m%d_%H%M%S")
        ));

        let json = serde_json::to_string_pretty(self)?;
        fs::write(&path, json).map_err(ExportError::Write)?;

        Ok(path)
    }
}
