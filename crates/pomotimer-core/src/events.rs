use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::{SessionType, TimerSettings, TimerStats};

/// Every state change of the session engine produces an Event.
/// Observers receive them; the CLI prints them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all_fields = "camelCase")]
pub enum Event {
    TimerStarted {
        session_type: SessionType,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerPaused {
        session_type: SessionType,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerReset {
        session_type: SessionType,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    SessionSkipped {
        from: SessionType,
        to: SessionType,
        current_session: u32,
        at: DateTime<Utc>,
    },
    SessionCompleted {
        completed: SessionType,
        next: SessionType,
        current_session: u32,
        /// Whether the completion was added to the statistics.
        counted: bool,
        at: DateTime<Utc>,
    },
    SettingsUpdated {
        settings: TimerSettings,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    DailyReset {
        date: NaiveDate,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        session_type: SessionType,
        current_session: u32,
        sessions_before_long_break: u32,
        is_running: bool,
        remaining_secs: u64,
        total_secs: u64,
        /// Remaining fraction of the current session, 1.0 .. 0.0.
        progress: f64,
        settings: TimerSettings,
        stats: TimerStats,
        at: DateTime<Utc>,
    },
}

impl Event {
    /// Short machine-readable name, matching the serde tag.
    pub fn kind(&self) -> &'static str {
        match self {
            Event::TimerStarted { .. } => "TimerStarted",
            Event::TimerPaused { .. } => "TimerPaused",
            Event::TimerReset { .. } => "TimerReset",
            Event::SessionSkipped { .. } => "SessionSkipped",
            Event::SessionCompleted { .. } => "SessionCompleted",
            Event::SettingsUpdated { .. } => "SettingsUpdated",
            Event::DailyReset { .. } => "DailyReset",
            Event::StateSnapshot { .. } => "StateSnapshot",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_are_tagged_by_type() {
        let event = Event::SessionSkipped {
            from: SessionType::Focus,
            to: SessionType::ShortBreak,
            current_session: 1,
            at: Utc::now(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], event.kind());
        assert_eq!(json["to"], "shortBreak");
    }

    #[test]
    fn event_fields_use_the_record_key_style() {
        let event = Event::TimerReset {
            session_type: SessionType::LongBreak,
            remaining_secs: 900,
            at: Utc::now(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["sessionType"], "longBreak");
        assert_eq!(json["remainingSecs"], 900);
        assert!(json.get("remaining_secs").is_none());

        let back: Event = serde_json::from_value(json).unwrap();
        assert_eq!(back, event);
    }
}
