//! Correction counters persisted as `stats.json`.
//!
//! Tracks the all-time total, per-day counts for the last
//! [`DAILY_RETENTION_DAYS`] days, and a weekly counter.  The weekly counter
//! restarts when 7 or more days have passed since the last restart, or on a
//! Monday when the last restart was not on a Monday.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::{Datelike, Local, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::config::AppPaths;

pub const DAILY_RETENTION_DAYS: i64 = 30;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorrectionStats {
    pub total: u64,
    pub daily: BTreeMap<NaiveDate, u32>,
    pub weekly: u32,
    /// Day the weekly counter last restarted; `None` before the first record.
    pub last_reset: Option<NaiveDate>,
}

/// Counters as shown to the user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatsSummary {
    pub total: u64,
    pub today: u32,
    pub weekly: u32,
}

impl CorrectionStats {
    /// Count one successful correction on `today`.
    pub fn record(&mut self, today: NaiveDate) {
        if self.weekly_reset_due(today) {
            self.weekly = 0;
            self.last_reset = Some(today);
        }

        self.total += 1;
        self.weekly += 1;
        *self.daily.entry(today).or_insert(0) += 1;

        let cutoff = today - chrono::Duration::days(DAILY_RETENTION_DAYS);
        self.daily.retain(|day, _| *day >= cutoff);
    }

    pub fn summary(&self, today: NaiveDate) -> StatsSummary {
        StatsSummary {
            total: self.total,
            today: self.daily.get(&today).copied().unwrap_or(0),
            weekly: if self.weekly_reset_due(today) {
                0
            } else {
                self.weekly
            },
        }
    }

    fn weekly_reset_due(&self, today: NaiveDate) -> bool {
        match self.last_reset {
            None => true,
            Some(last) => {
                (today - last).num_days() >= 7
                    || (today.weekday() == Weekday::Mon && last.weekday() != Weekday::Mon)
            }
        }
    }
}

// ---------------------------------------------------------------------------
// StatsStore
// ---------------------------------------------------------------------------

/// JSON file holding one [`CorrectionStats`].
#[derive(Debug, Clone)]
pub struct StatsStore {
    path: PathBuf,
}

impl StatsStore {
    /// Store at the platform-appropriate `stats.json`.
    pub fn open() -> Self {
        Self::at(AppPaths::new().stats_file)
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current counters; a missing file yields zeroes.
    pub fn load(&self) -> Result<CorrectionStats> {
        if !self.path.exists() {
            return Ok(CorrectionStats::default());
        }
        let data = std::fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&data)?)
    }

    pub fn save(&self, stats: &CorrectionStats) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, serde_json::to_string_pretty(stats)?)?;
        Ok(())
    }

    /// Load, count one correction on `today`, save.
    pub fn record(&self, today: NaiveDate) -> Result<CorrectionStats> {
        let mut stats = self.load()?;
        stats.record(today);
        self.save(&stats)?;
        log::debug!(
            "Recorded correction #{} ({})",
            stats.total,
            self.path.display()
        );
        Ok(stats)
    }

    /// Same as [`record`](Self::record) for the local calendar day.
    pub fn record_now(&self) -> Result<CorrectionStats> {
        self.record(Local::now().date_naive())
    }

    pub fn summary_now(&self) -> Result<StatsSummary> {
        Ok(self.load()?.summary(Local::now().date_naive()))
    }
}
