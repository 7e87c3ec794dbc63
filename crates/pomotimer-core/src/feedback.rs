//! Completion feedback collaborators.
//!
//! The engine only says "a session finished, here are the user's sound and
//! vibration flags". Implementations decide how to render that and must
//! swallow their own failures.

use std::io::Write;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::timer::SessionType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackRequest {
    /// The session that just finished.
    pub completed: SessionType,
    pub sound: bool,
    pub vibration: bool,
}

pub trait CompletionFeedback: Send {
    /// Render completion feedback. Must not block or panic.
    fn play(&self, request: FeedbackRequest);
}

/// Rings the terminal bell on stderr.
///
/// Terminals have no haptics, so vibration requests are only logged.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalBell;

impl CompletionFeedback for TerminalBell {
    fn play(&self, request: FeedbackRequest) {
        if request.sound {
            let mut stderr = std::io::stderr();
            if let Err(e) = stderr.write_all(b"\x07").and_then(|_| stderr.flush()) {
                debug!(error = %e, "terminal bell unavailable");
            }
        }
        if request.vibration {
            debug!(completed = ?request.completed, "vibration requested; no haptics on this host");
        }
    }
}
