//! The persisted timer record and the observer that writes it.
//!
//! Only settings, stats and the cycle position are stored. The countdown
//! itself is never persisted: on load the timer comes back stopped with a
//! full session.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::KeyValueStore;
use crate::events::Event;
use crate::timer::{SessionType, StateObserver, TimerSettings, TimerStats};

/// Key the record is stored under unless configured otherwise.
pub const DEFAULT_STATE_KEY: &str = "pomodoro-timer-state";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedState {
    #[serde(default)]
    pub settings: TimerSettings,
    #[serde(default)]
    pub stats: TimerStats,
    #[serde(default)]
    pub session_type: SessionType,
    #[serde(default = "default_current_session")]
    pub current_session: u32,
}

fn default_current_session() -> u32 {
    1
}

impl Default for PersistedState {
    fn default() -> Self {
        Self {
            settings: TimerSettings::default(),
            stats: TimerStats::default(),
            session_type: SessionType::Focus,
            current_session: default_current_session(),
        }
    }
}

/// Read the record, falling back to defaults if it is missing or unreadable.
pub fn load_state<S: KeyValueStore>(store: &S, key: &str) -> PersistedState {
    match store.get(key) {
        Ok(Some(json)) => match serde_json::from_str::<PersistedState>(&json) {
            Ok(state) => state,
            Err(e) => {
                warn!(key, error = %e, "stored timer state is malformed; using defaults");
                PersistedState::default()
            }
        },
        Ok(None) => {
            debug!(key, "no stored timer state; using defaults");
            PersistedState::default()
        }
        Err(e) => {
            warn!(key, error = %e, "failed to read timer state; using defaults");
            PersistedState::default()
        }
    }
}

/// Serialize and write the record.
///
/// # Errors
/// Returns an error if serialization or the store write fails.
pub fn save_state<S: KeyValueStore>(
    store: &S,
    key: &str,
    state: &PersistedState,
) -> crate::error::Result<()> {
    let json = serde_json::to_string(state)?;
    store.set(key, &json)?;
    Ok(())
}

/// Writes the record after every engine change.
///
/// Write failures are logged and dropped; the next change writes again.
pub struct PersistenceObserver<S> {
    store: S,
    key: String,
    failures: u64,
}

impl<S: KeyValueStore> PersistenceObserver<S> {
    pub fn new(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
            failures: 0,
        }
    }

    /// Number of writes that have failed so far.
    pub fn failures(&self) -> u64 {
        self.failures
    }
}

impl<S: KeyValueStore + Send> StateObserver for PersistenceObserver<S> {
    fn on_change(&mut self, event: &Event, record: &PersistedState) {
        match save_state(&self.store, &self.key, record) {
            Ok(()) => debug!(event = event.kind(), key = %self.key, "timer state saved"),
            Err(e) => {
                self.failures += 1;
                warn!(
                    event = event.kind(),
                    key = %self.key,
                    error = %e,
                    "failed to save timer state"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StorageError;
    use crate::storage::MemoryStore;

    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Locked)
        }

        fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Locked)
        }
    }

    #[test]
    fn missing_record_loads_defaults() {
        let store = MemoryStore::new();
        assert_eq!(load_state(&store, DEFAULT_STATE_KEY), PersistedState::default());
    }

    #[test]
    fn malformed_record_loads_defaults() {
        let store = MemoryStore::new();
        store.set(DEFAULT_STATE_KEY, "{not json").unwrap();
        assert_eq!(load_state(&store, DEFAULT_STATE_KEY), PersistedState::default());
    }

    #[test]
    fn unreadable_store_loads_defaults() {
        assert_eq!(load_state(&BrokenStore, "any"), PersistedState::default());
    }

    #[test]
    fn saved_record_uses_camel_case_keys() {
        let store = MemoryStore::new();
        let mut state = PersistedState::default();
        state.session_type = SessionType::LongBreak;
        state.current_session = 0;
        save_state(&store, "k", &state).unwrap();

        let raw = store.get("k").unwrap().unwrap();
        let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(json["sessionType"], "longBreak");
        assert_eq!(json["currentSession"], 0);
        assert_eq!(json["settings"]["focusDuration"], 25);
        assert_eq!(load_state(&store, "k"), state);
    }

    #[test]
    fn partial_record_fills_in_defaults() {
        let store = MemoryStore::new();
        store
            .set("k", r#"{"settings": {"focusDuration": 40}}"#)
            .unwrap();
        let state = load_state(&store, "k");
        assert_eq!(state.settings.focus_duration, 40);
        assert_eq!(state.current_session, 1);
        assert_eq!(state.session_type, SessionType::Focus);
    }

    #[test]
    fn observer_counts_failed_writes() {
        let mut observer = PersistenceObserver::new(BrokenStore, "k");
        let event = Event::DailyReset {
            date: "2024-01-02".parse().unwrap(),
            at: chrono::Utc::now(),
        };
        observer.on_change(&event, &PersistedState::default());
        observer.on_change(&event, &PersistedState::default());
        assert_eq!(observer.failures(), 2);
    }
}
