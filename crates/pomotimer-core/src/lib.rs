//! # pomotimer core library
//!
//! Business logic for a Pomodoro timer: focus/break cycles, a per-second
//! countdown, and simple session statistics. The `pomotimer` CLI is a thin
//! host over this crate.
//!
//! ## Architecture
//!
//! - **Session Engine**: a synchronous state machine; the host calls `tick()`
//!   once per second while the timer runs
//! - **Countdown Driver**: a tokio interval that feeds those ticks and is
//!   armed/disarmed with the running flag
//! - **Session Host**: the single loop that owns engine and driver
//! - **Storage**: SQLite key-value store for the persisted record, TOML
//!   configuration
//!
//! ## Key Components
//!
//! - [`TimerEngine`]: Core timer state machine
//! - [`CountdownDriver`]: Tick source
//! - [`SessionHost`]: Command/tick loop
//! - [`PersistenceObserver`]: Writes state after every change
//! - [`Config`]: Application configuration management

pub mod error;
pub mod events;
pub mod feedback;
pub mod format;
pub mod host;
pub mod storage;
pub mod timer;

pub use error::{ConfigError, CoreError, StorageError};
pub use events::Event;
pub use feedback::{CompletionFeedback, FeedbackRequest, TerminalBell};
pub use host::{Command, SessionHost, Update};
pub use storage::{
    Config, KeyValueStore, MemoryStore, PersistedState, PersistenceObserver, SqliteStore,
};
pub use timer::{
    Clock, CountdownDriver, FixedClock, LocalClock, SessionType, SettingsPatch, StateObserver,
    StatsSummary, TimerEngine, TimerSettings, TimerState, TimerStats,
};
