mod clock;
mod driver;
mod engine;
mod session;
mod settings;
mod stats;

pub use clock::{Clock, FixedClock, LocalClock};
pub use driver::{CountdownDriver, DriverTick, TICK_PERIOD};
pub use engine::{StateObserver, TimerEngine, TimerState};
pub use session::{CyclePosition, SessionType, SESSIONS_BEFORE_LONG_BREAK};
pub use settings::{SettingsPatch, TimerSettings};
pub use stats::{StatsSummary, TimerStats, FOCUS_MINUTES_PER_SESSION};
