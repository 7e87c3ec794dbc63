//! Session host: the single loop that owns the engine.
//!
//! Host commands and driver ticks arrive on channels and are applied one at
//! a time, so the engine has exactly one mutator. After every step the
//! driver is re-synced with the running flag: it is armed when the timer
//! starts and disarmed as soon as any operation stops it.

use std::time::Duration;

use tokio::sync::mpsc;
use tracing::debug;

use crate::events::Event;
use crate::timer::{CountdownDriver, DriverTick, SettingsPatch, TimerEngine};

/// Operations a host can request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start,
    Pause,
    /// Start when paused, pause when running.
    Toggle,
    Reset,
    Skip,
    Complete,
    UpdateSettings(SettingsPatch),
    Quit,
}

/// What the `on_update` callback is told about each step.
#[derive(Debug, Clone, PartialEq)]
pub enum Update {
    /// A decrementing tick; nothing but the countdown moved.
    Tick,
    /// An operation produced an event.
    Event(Event),
}

pub struct SessionHost {
    engine: TimerEngine,
    driver: CountdownDriver,
    ticks: mpsc::UnboundedReceiver<DriverTick>,
}

impl SessionHost {
    pub fn new(engine: TimerEngine, period: Duration) -> Self {
        let (driver, ticks) = CountdownDriver::channel(period);
        Self {
            engine,
            driver,
            ticks,
        }
    }

    pub fn engine(&self) -> &TimerEngine {
        &self.engine
    }

    pub fn driver(&self) -> &CountdownDriver {
        &self.driver
    }

    /// Apply one command. Returns `None` for `Quit`.
    pub fn apply(&mut self, command: Command) -> Option<Event> {
        let event = match command {
            Command::Start => self.engine.start(),
            Command::Pause => self.engine.pause(),
            Command::Toggle if self.engine.is_running() => self.engine.pause(),
            Command::Toggle => self.engine.start(),
            Command::Reset => self.engine.reset(),
            Command::Skip => self.engine.skip(),
            Command::Complete => self.engine.complete_session(),
            Command::UpdateSettings(patch) => self.engine.update_settings(&patch),
            Command::Quit => return None,
        };
        self.driver.sync(self.engine.is_running());
        Some(event)
    }

    /// Run until the command channel closes or `Quit` arrives.
    ///
    /// `on_update` sees the engine after every applied command and every
    /// accepted tick. Returns the engine so the caller can inspect or keep it.
    pub async fn run<F>(
        mut self,
        mut commands: mpsc::UnboundedReceiver<Command>,
        mut on_update: F,
    ) -> TimerEngine
    where
        F: FnMut(&TimerEngine, &Update),
    {
        self.driver.sync(self.engine.is_running());

        loop {
            let update = tokio::select! {
                biased;
                command = commands.recv() => {
                    let Some(command) = command else { break };
                    match self.apply(command) {
                        Some(event) => Update::Event(event),
                        None => break,
                    }
                }
                Some(tick) = self.ticks.recv() => {
                    if !self.driver.accepts(tick) {
                        debug!(generation = tick.generation, "dropping stale tick");
                        continue;
                    }
                    let update = match self.engine.tick() {
                        Some(event) => Update::Event(event),
                        None => Update::Tick,
                    };
                    self.driver.sync(self.engine.is_running());
                    update
                }
            };
            on_update(&self.engine, &update);
        }

        self.driver.disarm();
        self.engine
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::{SessionType, TICK_PERIOD};

    #[tokio::test(start_paused = true)]
    async fn apply_arms_and_disarms_driver() {
        let mut host = SessionHost::new(TimerEngine::new(), TICK_PERIOD);
        host.apply(Command::Start);
        assert!(host.driver().is_armed());
        host.apply(Command::Skip);
        assert!(!host.driver().is_armed());
        host.apply(Command::Toggle);
        assert!(host.driver().is_armed());
        host.apply(Command::Toggle);
        assert!(!host.driver().is_armed());
        assert!(host.apply(Command::Quit).is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn run_counts_down_and_completes() {
        let engine = TimerEngine::new().with_sessions_before_long_break(4);
        let host = SessionHost::new(engine, TICK_PERIOD);
        let (tx, rx) = mpsc::unbounded_channel();
        tx.send(Command::UpdateSettings(SettingsPatch::focus_duration(1)))
            .unwrap();
        tx.send(Command::Start).unwrap();

        let mut ticks = 0;
        let engine = host
            .run(rx, |engine, update| match update {
                Update::Tick => ticks += 1,
                Update::Event(Event::SessionCompleted { .. }) => {
                    assert!(!engine.is_running());
                    tx.send(Command::Quit).unwrap();
                }
                Update::Event(_) => {}
            })
            .await;

        assert_eq!(ticks, 59);
        assert_eq!(engine.session_type(), SessionType::ShortBreak);
        assert_eq!(engine.stats().total_sessions, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn closed_command_channel_ends_the_loop() {
        let host = SessionHost::new(TimerEngine::new(), TICK_PERIOD);
        let (tx, rx) = mpsc::unbounded_channel();
        tx.send(Command::Pause).unwrap();
        drop(tx);
        let engine = host.run(rx, |_, _| {}).await;
        assert!(!engine.is_running());
    }
}
