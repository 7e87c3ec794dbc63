use serde::{Deserialize, Serialize};

/// Default number of focus sessions in one long-break cycle.
pub const SESSIONS_BEFORE_LONG_BREAK: u32 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SessionType {
    #[default]
    Focus,
    ShortBreak,
    LongBreak,
}

impl SessionType {
    pub fn is_focus(self) -> bool {
        self == SessionType::Focus
    }
}

/// Position in the focus/break cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CyclePosition {
    pub session_type: SessionType,
    pub current_session: u32,
}

impl CyclePosition {
    pub fn new(session_type: SessionType, current_session: u32) -> Self {
        Self {
            session_type,
            current_session,
        }
    }

    /// The position that follows this one.
    ///
    /// A long break resets the counter to 0 and the focus session after it
    /// restarts at 1; a short break keeps the cycle going.
    pub fn next(self, sessions_before_long_break: u32) -> Self {
        match self.session_type {
            SessionType::Focus if self.current_session >= sessions_before_long_break => {
                Self::new(SessionType::LongBreak, 0)
            }
            SessionType::Focus => Self::new(SessionType::ShortBreak, self.current_session),
            SessionType::ShortBreak => {
                Self::new(SessionType::Focus, self.current_session.saturating_add(1))
            }
            SessionType::LongBreak => Self::new(SessionType::Focus, 1),
        }
    }
}

impl Default for CyclePosition {
    fn default() -> Self {
        Self::new(SessionType::Focus, 1)
    }
}
