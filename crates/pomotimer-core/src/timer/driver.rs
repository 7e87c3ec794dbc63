//! Countdown driver.
//!
//! Fires one [`DriverTick`] per period on a channel while armed. Each arm
//! starts a new generation; ticks from an earlier generation are rejected by
//! [`CountdownDriver::accepts`], so a tick already queued when the driver was
//! disarmed can never reach the engine.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::trace;

/// Default countdown period.
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DriverTick {
    pub generation: u64,
}

/// Arms and disarms the interval task that feeds `tick()`.
///
/// At most one interval task exists at a time. Dropping the driver disarms
/// it. `arm` must be called from within a tokio runtime.
#[derive(Debug)]
pub struct CountdownDriver {
    period: Duration,
    tx: mpsc::UnboundedSender<DriverTick>,
    handle: Option<JoinHandle<()>>,
    generation: u64,
}

impl CountdownDriver {
    pub fn new(period: Duration, tx: mpsc::UnboundedSender<DriverTick>) -> Self {
        Self {
            period,
            tx,
            handle: None,
            generation: 0,
        }
    }

    /// A driver with its tick channel.
    pub fn channel(period: Duration) -> (Self, mpsc::UnboundedReceiver<DriverTick>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(period, tx), rx)
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_armed(&self) -> bool {
        self.handle.is_some()
    }

    /// Start firing. Any previous interval is cancelled first.
    pub fn arm(&mut self) {
        self.disarm();
        self.generation += 1;

        let generation = self.generation;
        let period = self.period;
        let tx = self.tx.clone();
        self.handle = Some(tokio::spawn(async move {
            let mut interval = time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if tx.send(DriverTick { generation }).is_err() {
                    break;
                }
            }
        }));
        trace!(generation, "countdown armed");
    }

    /// Stop firing. Idempotent.
    pub fn disarm(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            trace!(generation = self.generation, "countdown disarmed");
        }
    }

    /// Arm or disarm to match the engine's running flag.
    pub fn sync(&mut self, running: bool) {
        match (running, self.is_armed()) {
            (true, false) => self.arm(),
            (false, true) => self.disarm(),
            _ => {}
        }
    }

    /// Whether `tick` belongs to the live interval.
    pub fn accepts(&self, tick: DriverTick) -> bool {
        self.is_armed() && tick.generation == self.generation
    }
}

impl Drop for CountdownDriver {
    fn drop(&mut self) {
        self.disarm();
    }
}
