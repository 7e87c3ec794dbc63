//! Source of "today" for daily rollover.

use std::sync::{Arc, Mutex};

use chrono::{Local, NaiveDate};

pub trait Clock: Send {
    /// Current calendar date in local time.
    fn today(&self) -> NaiveDate;
}

/// Wall-clock local date.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalClock;

impl Clock for LocalClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// A settable date shared between clones.
///
/// Hand one clone to the engine and keep another to move the date forward.
#[derive(Debug, Clone)]
pub struct FixedClock {
    date: Arc<Mutex<NaiveDate>>,
}

impl FixedClock {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date: Arc::new(Mutex::new(date)),
        }
    }

    pub fn set(&self, date: NaiveDate) {
        match self.date.lock() {
            Ok(mut guard) => *guard = date,
            Err(poisoned) => *poisoned.into_inner() = date,
        }
    }
}

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        match self.date.lock() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_clock_clones_share_the_date() {
        let clock = FixedClock::new("2024-01-01".parse().unwrap());
        let handle = clock.clone();
        handle.set("2024-01-02".parse().unwrap());
        assert_eq!(clock.today().to_string(), "2024-01-02");
    }
}
