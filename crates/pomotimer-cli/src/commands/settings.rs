use clap::Subcommand;
use pomotimer_core::{Config, SettingsPatch};

use super::open_engine;

#[derive(Subcommand)]
pub enum SettingsAction {
    /// Print the current timer settings as JSON
    Show,
    /// Change one setting (e.g. "focus_duration 30", "sound_enabled false")
    Set {
        /// Setting name
        key: String,
        /// New value
        value: String,
    },
}

pub fn run(action: SettingsAction, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let mut engine = open_engine(config)?;

    match action {
        SettingsAction::Show => {
            println!("{}", serde_json::to_string_pretty(engine.settings())?);
        }
        SettingsAction::Set { key, value } => {
            let patch = SettingsPatch::from_key_value(&key, &value)?;
            let event = engine.update_settings(&patch);
            println!("{}", serde_json::to_string_pretty(&event)?);
        }
    }
    Ok(())
}
