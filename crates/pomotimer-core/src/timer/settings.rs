//! Timer settings and partial updates.
//!
//! Durations are whole minutes. The engine trusts whatever it is given:
//! a zero duration is legal and simply completes on the next tick.

use serde::{Deserialize, Serialize};

use super::session::SessionType;
use crate::error::ConfigError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerSettings {
    #[serde(default = "default_focus_duration")]
    pub focus_duration: u32,
    #[serde(default = "default_short_break")]
    pub short_break_duration: u32,
    #[serde(default = "default_long_break")]
    pub long_break_duration: u32,
    #[serde(default = "default_true")]
    pub sound_enabled: bool,
    #[serde(default = "default_true")]
    pub vibration_enabled: bool,
}

fn default_focus_duration() -> u32 {
    25
}
fn default_short_break() -> u32 {
    5
}
fn default_long_break() -> u32 {
    15
}
fn default_true() -> bool {
    true
}

impl Default for TimerSettings {
    fn default() -> Self {
        Self {
            focus_duration: default_focus_duration(),
            short_break_duration: default_short_break(),
            long_break_duration: default_long_break(),
            sound_enabled: true,
            vibration_enabled: true,
        }
    }
}

impl TimerSettings {
    /// Configured duration in minutes for a session type.
    pub fn duration_min(&self, session_type: SessionType) -> u32 {
        match session_type {
            SessionType::Focus => self.focus_duration,
            SessionType::ShortBreak => self.short_break_duration,
            SessionType::LongBreak => self.long_break_duration,
        }
    }

    /// Configured duration in seconds for a session type.
    pub fn duration_secs(&self, session_type: SessionType) -> u64 {
        u64::from(self.duration_min(session_type)).saturating_mul(60)
    }

    /// Whether a completion should be signalled to the feedback collaborator.
    pub fn wants_feedback(&self) -> bool {
        self.sound_enabled || self.vibration_enabled
    }

    /// Shallow merge: only the fields present in `patch` change.
    pub fn apply(&mut self, patch: &SettingsPatch) {
        if let Some(v) = patch.focus_duration {
            self.focus_duration = v;
        }
        if let Some(v) = patch.short_break_duration {
            self.short_break_duration = v;
        }
        if let Some(v) = patch.long_break_duration {
            self.long_break_duration = v;
        }
        if let Some(v) = patch.sound_enabled {
            self.sound_enabled = v;
        }
        if let Some(v) = patch.vibration_enabled {
            self.vibration_enabled = v;
        }
    }
}

/// A partial settings update. Unset fields keep their previous value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub focus_duration: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_break_duration: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub long_break_duration: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sound_enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vibration_enabled: Option<bool>,
}

impl SettingsPatch {
    pub fn focus_duration(minutes: u32) -> Self {
        Self {
            focus_duration: Some(minutes),
            ..Self::default()
        }
    }

    /// Build a single-field patch from a user-supplied key and value.
    ///
    /// Accepts both `focus_duration` and `focusDuration` spellings.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value does not parse
    /// as the field's type.
    pub fn from_key_value(key: &str, value: &str) -> Result<Self, ConfigError> {
        let normalized: String = key
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .flat_map(char::to_lowercase)
            .collect();

        let mut patch = Self::default();
        match normalized.as_str() {
            "focusduration" | "focus" => patch.focus_duration = Some(parse_minutes(key, value)?),
            "shortbreakduration" | "shortbreak" => {
                patch.short_break_duration = Some(parse_minutes(key, value)?)
            }
            "longbreakduration" | "longbreak" => {
                patch.long_break_duration = Some(parse_minutes(key, value)?)
            }
            "soundenabled" | "sound" => patch.sound_enabled = Some(parse_bool(key, value)?),
            "vibrationenabled" | "vibration" => {
                patch.vibration_enabled = Some(parse_bool(key, value)?)
            }
            _ => return Err(ConfigError::UnknownKey(key.to_string())),
        }
        Ok(patch)
    }
}

fn parse_minutes(key: &str, value: &str) -> Result<u32, ConfigError> {
    value.trim().parse::<u32>().map_err(|e| ConfigError::InvalidValue {
        key: key.to_string(),
        message: format!("expected whole minutes: {e}"),
    })
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "on" | "yes" | "1" => Ok(true),
        "false" | "off" | "no" | "0" => Ok(false),
        other => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            message: format!("expected a boolean, got '{other}'"),
        }),
    }
}
