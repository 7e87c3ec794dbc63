pub mod config;
pub mod settings;
pub mod stats;
pub mod timer;

use pomotimer_core::storage::load_state;
use pomotimer_core::{Config, PersistenceObserver, SqliteStore, TimerEngine};

/// Open the store, rehydrate the engine and wire persistence to it.
///
/// The daily rollover check runs here, so every command sees today's count.
pub fn open_engine(config: &Config) -> Result<TimerEngine, Box<dyn std::error::Error>> {
    let key = config.storage.state_key.as_str();
    let store = SqliteStore::open()?;
    let record = load_state(&store, key);
    let mut engine = TimerEngine::from_record(record)
        .with_sessions_before_long_break(config.timer.sessions_before_long_break)
        .with_observer(PersistenceObserver::new(store, key));
    engine.check_daily_reset();
    Ok(engine)
}
