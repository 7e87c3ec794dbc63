use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::clock::{Clock, LocalClock};
use crate::format::format_hours_minutes;

/// Minutes credited to each completed focus session in summaries.
pub const FOCUS_MINUTES_PER_SESSION: u64 = 25;

/// Completed-focus counters.
///
/// `today_sessions` counts completions on `last_session_date`;
/// `total_sessions` never decreases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerStats {
    #[serde(default)]
    pub today_sessions: u32,
    #[serde(default)]
    pub total_sessions: u64,
    #[serde(default = "today")]
    pub last_session_date: NaiveDate,
}

fn today() -> NaiveDate {
    LocalClock.today()
}

impl Default for TimerStats {
    fn default() -> Self {
        Self::starting(today())
    }
}

impl TimerStats {
    /// Fresh counters dated `date`.
    pub fn starting(date: NaiveDate) -> Self {
        Self {
            today_sessions: 0,
            total_sessions: 0,
            last_session_date: date,
        }
    }

    /// Count one completed focus session on `today`.
    pub fn record_focus(&mut self, today: NaiveDate) {
        if self.last_session_date != today {
            self.today_sessions = 1;
            self.last_session_date = today;
        } else {
            self.today_sessions = self.today_sessions.saturating_add(1);
        }
        self.total_sessions = self.total_sessions.saturating_add(1);
    }

    /// Clear a stale daily count. Returns true if the date moved.
    pub fn roll_over(&mut self, today: NaiveDate) -> bool {
        if self.last_session_date == today {
            return false;
        }
        self.today_sessions = 0;
        self.last_session_date = today;
        true
    }
}

/// Counters plus derived focus time, as printed by `stats show`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsSummary {
    #[serde(flatten)]
    pub stats: TimerStats,
    pub today_focus_minutes: u64,
    pub total_focus_minutes: u64,
    pub today_focus: String,
    pub total_focus: String,
}

impl From<&TimerStats> for StatsSummary {
    fn from(stats: &TimerStats) -> Self {
        let today = u64::from(stats.today_sessions).saturating_mul(FOCUS_MINUTES_PER_SESSION);
        let total = stats.total_sessions.saturating_mul(FOCUS_MINUTES_PER_SESSION);
        Self {
            stats: stats.clone(),
            today_focus_minutes: today,
            total_focus_minutes: total,
            today_focus: format_hours_minutes(today),
            total_focus: format_hours_minutes(total),
        }
    }
}

impl TimerStats {
    pub fn summary(&self) -> StatsSummary {
        StatsSummary::from(self)
    }
}
