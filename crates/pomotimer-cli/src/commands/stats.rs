use clap::Subcommand;
use pomotimer_core::Config;

use super::open_engine;

#[derive(Subcommand)]
pub enum StatsAction {
    /// Today's and all-time focus session counts and focus time
    Show,
}

pub fn run(action: StatsAction, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let engine = open_engine(config)?;

    match action {
        StatsAction::Show => {
            println!("{}", serde_json::to_string_pretty(&engine.stats().summary())?);
        }
    }
    Ok(())
}
