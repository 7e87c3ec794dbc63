//! Session engine.
//!
//! A synchronous state machine over the countdown, the focus/break cycle,
//! settings and statistics. It has no internal threads or timers: the host
//! calls `tick()` once per second while the timer runs (see
//! [`CountdownDriver`](super::CountdownDriver)).
//!
//! ## Cycle
//!
//! ```text
//! Focus(1) -> ShortBreak(1) -> Focus(2) -> ... -> Focus(N) -> LongBreak(0) -> Focus(1)
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = TimerEngine::from_record(load_state(&store, key))
//!     .with_observer(PersistenceObserver::new(store, key));
//! engine.check_daily_reset();
//! engine.start();
//! // once per second:
//! engine.tick(); // Some(Event::SessionCompleted { .. }) when a session ends
//! ```

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::clock::{Clock, LocalClock};
use super::session::{CyclePosition, SessionType, SESSIONS_BEFORE_LONG_BREAK};
use super::settings::{SettingsPatch, TimerSettings};
use super::stats::TimerStats;
use crate::events::Event;
use crate::feedback::{CompletionFeedback, FeedbackRequest};
use crate::storage::PersistedState;

/// Receives every change the engine makes.
pub trait StateObserver: Send {
    fn on_change(&mut self, event: &Event, record: &PersistedState);
}

/// The countdown and cycle position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerState {
    /// Seconds left in the current session.
    pub time_remaining: u64,
    pub is_running: bool,
    pub session_type: SessionType,
    /// Index of the focus session within the current long-break cycle.
    pub current_session: u32,
}

impl TimerState {
    fn position(&self) -> CyclePosition {
        CyclePosition::new(self.session_type, self.current_session)
    }
}

/// Core session engine.
pub struct TimerEngine {
    state: TimerState,
    settings: TimerSettings,
    stats: TimerStats,
    sessions_before_long_break: u32,
    clock: Box<dyn Clock>,
    feedback: Option<Box<dyn CompletionFeedback>>,
    observers: Vec<Box<dyn StateObserver>>,
}

impl std::fmt::Debug for TimerEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimerEngine")
            .field("state", &self.state)
            .field("settings", &self.settings)
            .field("stats", &self.stats)
            .field("sessions_before_long_break", &self.sessions_before_long_break)
            .field("observers", &self.observers.len())
            .finish_non_exhaustive()
    }
}

impl Default for TimerEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TimerEngine {
    /// A stopped engine at the first focus session with default settings.
    pub fn new() -> Self {
        Self::from_record(PersistedState::default())
    }

    /// Rebuild an engine from a persisted record.
    ///
    /// The countdown is not persisted, so the timer comes back stopped with
    /// the full duration of the stored session type. Call
    /// [`check_daily_reset`](Self::check_daily_reset) once the clock and
    /// observers are in place.
    pub fn from_record(record: PersistedState) -> Self {
        let PersistedState {
            settings,
            stats,
            session_type,
            current_session,
        } = record;
        let state = TimerState {
            time_remaining: settings.duration_secs(session_type),
            is_running: false,
            session_type,
            current_session,
        };
        Self {
            state,
            settings,
            stats,
            sessions_before_long_break: SESSIONS_BEFORE_LONG_BREAK,
            clock: Box::new(LocalClock),
            feedback: None,
            observers: Vec::new(),
        }
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Cycle length. Not validated: 0 makes every focus session lead to a
    /// long break.
    pub fn with_sessions_before_long_break(mut self, sessions: u32) -> Self {
        self.sessions_before_long_break = sessions;
        self
    }

    pub fn with_feedback(mut self, feedback: impl CompletionFeedback + 'static) -> Self {
        self.feedback = Some(Box::new(feedback));
        self
    }

    pub fn with_observer(mut self, observer: impl StateObserver + 'static) -> Self {
        self.add_observer(observer);
        self
    }

    pub fn add_observer(&mut self, observer: impl StateObserver + 'static) {
        self.observers.push(Box::new(observer));
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn time_remaining(&self) -> u64 {
        self.state.time_remaining
    }

    pub fn is_running(&self) -> bool {
        self.state.is_running
    }

    pub fn session_type(&self) -> SessionType {
        self.state.session_type
    }

    pub fn current_session(&self) -> u32 {
        self.state.current_session
    }

    pub fn settings(&self) -> &TimerSettings {
        &self.settings
    }

    pub fn stats(&self) -> &TimerStats {
        &self.stats
    }

    pub fn sessions_before_long_break(&self) -> u32 {
        self.sessions_before_long_break
    }

    /// Full duration of the current session type, in seconds.
    pub fn total_secs(&self) -> u64 {
        self.settings.duration_secs(self.state.session_type)
    }

    /// Remaining fraction of the current session.
    ///
    /// 1.0 at the start, falling toward 0.0. Can exceed 1.0 when the
    /// duration was shortened mid-session.
    pub fn progress(&self) -> f64 {
        let total = self.total_secs();
        if total == 0 {
            return 0.0;
        }
        self.state.time_remaining as f64 / total as f64
    }

    /// The record observers persist.
    pub fn record(&self) -> PersistedState {
        PersistedState {
            settings: self.settings.clone(),
            stats: self.stats.clone(),
            session_type: self.state.session_type,
            current_session: self.state.current_session,
        }
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            session_type: self.state.session_type,
            current_session: self.state.current_session,
            sessions_before_long_break: self.sessions_before_long_break,
            is_running: self.state.is_running,
            remaining_secs: self.state.time_remaining,
            total_secs: self.total_secs(),
            progress: self.progress(),
            settings: self.settings.clone(),
            stats: self.stats.clone(),
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Start or resume the countdown. Allowed with nothing left on the
    /// clock; the next tick then completes the session.
    pub fn start(&mut self) -> Event {
        self.state.is_running = true;
        let event = Event::TimerStarted {
            session_type: self.state.session_type,
            remaining_secs: self.state.time_remaining,
            at: Utc::now(),
        };
        self.emit(event)
    }

    pub fn pause(&mut self) -> Event {
        self.state.is_running = false;
        let event = Event::TimerPaused {
            session_type: self.state.session_type,
            remaining_secs: self.state.time_remaining,
            at: Utc::now(),
        };
        self.emit(event)
    }

    /// Refill the current session and stop. Cycle position and stats stay.
    pub fn reset(&mut self) -> Event {
        self.state.time_remaining = self.total_secs();
        self.state.is_running = false;
        let event = Event::TimerReset {
            session_type: self.state.session_type,
            remaining_secs: self.state.time_remaining,
            at: Utc::now(),
        };
        self.emit(event)
    }

    /// Move to the next session without counting the current one.
    pub fn skip(&mut self) -> Event {
        let from = self.state.session_type;
        self.advance();
        debug!(?from, to = ?self.state.session_type, "session skipped");
        let event = Event::SessionSkipped {
            from,
            to: self.state.session_type,
            current_session: self.state.current_session,
            at: Utc::now(),
        };
        self.emit(event)
    }

    /// One second of countdown. Returns the completion event when the
    /// session ends.
    ///
    /// A session completes on the tick that would take it from 1 to 0, so a
    /// running timer never sits at 0.
    pub fn tick(&mut self) -> Option<Event> {
        if !self.state.is_running {
            return None;
        }
        if self.state.time_remaining <= 1 {
            return Some(self.complete_session());
        }
        self.state.time_remaining -= 1;
        None
    }

    /// Finish the current session: advance the cycle, count focus sessions,
    /// and signal completion feedback.
    pub fn complete_session(&mut self) -> Event {
        let completed = self.state.session_type;
        self.advance();

        let counted = completed.is_focus();
        if counted {
            let today = self.clock.today();
            self.stats.record_focus(today);
        }
        info!(
            ?completed,
            next = ?self.state.session_type,
            today = self.stats.today_sessions,
            total = self.stats.total_sessions,
            "session completed"
        );

        if self.settings.wants_feedback() {
            if let Some(feedback) = &self.feedback {
                feedback.play(FeedbackRequest {
                    completed,
                    sound: self.settings.sound_enabled,
                    vibration: self.settings.vibration_enabled,
                });
            }
        }

        let event = Event::SessionCompleted {
            completed,
            next: self.state.session_type,
            current_session: self.state.current_session,
            counted,
            at: Utc::now(),
        };
        self.emit(event)
    }

    /// Merge `patch` into the settings.
    ///
    /// An idle timer picks up the new duration at once; a running countdown
    /// is left alone until the next reset, skip or completion.
    pub fn update_settings(&mut self, patch: &SettingsPatch) -> Event {
        self.settings.apply(patch);
        if !self.state.is_running {
            self.state.time_remaining = self.total_secs();
        }
        let event = Event::SettingsUpdated {
            settings: self.settings.clone(),
            remaining_secs: self.state.time_remaining,
            at: Utc::now(),
        };
        self.emit(event)
    }

    /// Clear a daily count left over from a previous day.
    ///
    /// Meant to run once after loading persisted stats. Returns `None` when
    /// the stored date is already today.
    pub fn check_daily_reset(&mut self) -> Option<Event> {
        let today = self.clock.today();
        if !self.stats.roll_over(today) {
            return None;
        }
        debug!(%today, "daily session count reset");
        let event = Event::DailyReset {
            date: today,
            at: Utc::now(),
        };
        Some(self.emit(event))
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn advance(&mut self) {
        let next = self.state.position().next(self.sessions_before_long_break);
        self.state.session_type = next.session_type;
        self.state.current_session = next.current_session;
        self.state.time_remaining = self.settings.duration_secs(next.session_type);
        self.state.is_running = false;
    }

    fn emit(&mut self, event: Event) -> Event {
        if !self.observers.is_empty() {
            let record = self.record();
            for observer in &mut self.observers {
                observer.on_change(&event, &record);
            }
        }
        event
    }
}
