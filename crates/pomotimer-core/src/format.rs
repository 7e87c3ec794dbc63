//! Display helpers for countdowns and session names.

use crate::timer::SessionType;

/// `MM:SS`. Minutes keep counting past 59 (`90:00` for an hour and a half).
pub fn format_time(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// Accumulated focus time: `45m`, `2h`, `2h 5m`.
pub fn format_hours_minutes(minutes: u64) -> String {
    if minutes < 60 {
        return format!("{minutes}m");
    }
    match (minutes / 60, minutes % 60) {
        (hours, 0) => format!("{hours}h"),
        (hours, mins) => format!("{hours}h {mins}m"),
    }
}

pub fn session_label(session_type: SessionType) -> &'static str {
    match session_type {
        SessionType::Focus => "Focus",
        SessionType::ShortBreak => "Short Break",
        SessionType::LongBreak => "Long Break",
    }
}

/// Cycle dots, filled up to `current_session`: `●●○○`.
pub fn cycle_dots(current_session: u32, sessions_before_long_break: u32) -> String {
    (1..=sessions_before_long_break)
        .map(|i| if i <= current_session { '●' } else { '○' })
        .collect()
}
