use std::io::{BufRead, Write};
use std::time::Duration;

use clap::Subcommand;
use pomotimer_core::format::{cycle_dots, format_time, session_label};
use pomotimer_core::{
    Command, Config, Event, SessionHost, SettingsPatch, TerminalBell, TimerEngine, Update,
};
use tokio::sync::mpsc;
use tracing::{debug, info};

use super::open_engine;

#[derive(Subcommand)]
pub enum TimerAction {
    /// Run the countdown in the foreground (keys: s start, p pause,
    /// enter toggle, r reset, k skip, set <key> <value>, q quit)
    Run {
        /// Wait for a start key instead of starting right away
        #[arg(long)]
        paused: bool,
    },
    /// Skip to the next session without counting the current one
    Skip,
    /// Refill the current session
    Reset,
    /// Mark the current session as completed
    Complete,
    /// Print current timer state as JSON
    Status,
}

pub fn run(action: TimerAction, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let mut engine = open_engine(config)?;

    match action {
        TimerAction::Run { paused } => run_foreground(engine, config, !paused)?,
        TimerAction::Skip => {
            let event = engine.skip();
            println!("{}", serde_json::to_string_pretty(&event)?);
        }
        TimerAction::Reset => {
            let event = engine.reset();
            println!("{}", serde_json::to_string_pretty(&event)?);
        }
        TimerAction::Complete => {
            let event = engine.complete_session();
            println!("{}", serde_json::to_string_pretty(&event)?);
        }
        TimerAction::Status => {
            println!("{}", serde_json::to_string_pretty(&engine.snapshot())?);
        }
    }
    Ok(())
}

/// Map one line of keyboard input to a host command.
const KEY_HELP: &str =
    "keys: s start, p pause, enter toggle, r reset, k skip, set <key> <value>, q quit";

fn parse_input(line: &str) -> Result<Option<Command>, String> {
    let mut words = line.split_whitespace();
    let command = match words.next() {
        None => Command::Toggle,
        Some("s" | "start") => Command::Start,
        Some("p" | "pause") => Command::Pause,
        Some("r" | "reset") => Command::Reset,
        Some("k" | "skip") => Command::Skip,
        Some("q" | "quit" | "exit") => Command::Quit,
        Some("set") => {
            let (Some(key), Some(value)) = (words.next(), words.next()) else {
                return Err("usage: set <key> <value>".into());
            };
            let patch = SettingsPatch::from_key_value(key, value).map_err(|e| e.to_string())?;
            Command::UpdateSettings(patch)
        }
        Some("h" | "help" | "?") => return Ok(None),
        Some(other) => return Err(format!("unknown command: {other}")),
    };
    Ok(Some(command))
}

fn status_line(engine: &TimerEngine) -> String {
    format!(
        "{:<11} {}  {}  {}",
        session_label(engine.session_type()),
        format_time(engine.time_remaining()),
        cycle_dots(engine.current_session(), engine.sessions_before_long_break()),
        if engine.is_running() { "running" } else { "paused" },
    )
}

fn render(engine: &TimerEngine, update: &Update) {
    let mut out = std::io::stdout().lock();
    if let Update::Event(Event::SessionCompleted { completed, .. }) = update {
        let _ = writeln!(out, "\r{} complete.", session_label(*completed));
    }
    let _ = write!(out, "\r\x1b[2K{}", status_line(engine));
    let _ = out.flush();
}

fn run_foreground(
    engine: TimerEngine,
    config: &Config,
    autostart: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let period = Duration::from_millis(config.timer.tick_interval_ms.max(1));
    let engine = engine.with_feedback(TerminalBell);

    let (tx, rx) = mpsc::unbounded_channel();
    if autostart {
        tx.send(Command::Start)?;
    }

    // Blocking stdin reads live on their own thread; the host loop only
    // sees parsed commands. End of input quits.
    let input_tx = tx;
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            match parse_input(&line) {
                Ok(Some(command)) => {
                    let quit = command == Command::Quit;
                    if input_tx.send(command).is_err() || quit {
                        return;
                    }
                }
                Ok(None) => eprintln!("\n{KEY_HELP}"),
                Err(e) => eprintln!("\n{e}"),
            }
        }
        let _ = input_tx.send(Command::Quit);
    });

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    let host = SessionHost::new(engine, period);
    print!("{}", status_line(host.engine()));
    std::io::stdout().flush()?;
    info!(period_ms = period.as_millis() as u64, autostart, "foreground session started");

    let engine = runtime.block_on(host.run(rx, render));
    println!();
    debug!(total = engine.stats().total_sessions, "foreground session ended");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_line_toggles() {
        assert_eq!(parse_input("").unwrap(), Some(Command::Toggle));
        assert_eq!(parse_input("   ").unwrap(), Some(Command::Toggle));
    }

    #[test]
    fn short_and_long_keys() {
        assert_eq!(parse_input("k").unwrap(), Some(Command::Skip));
        assert_eq!(parse_input("skip").unwrap(), Some(Command::Skip));
        assert_eq!(parse_input("q").unwrap(), Some(Command::Quit));
    }

    #[test]
    fn set_builds_a_settings_patch() {
        assert_eq!(
            parse_input("set focus_duration 30").unwrap(),
            Some(Command::UpdateSettings(SettingsPatch::focus_duration(30)))
        );
        assert!(parse_input("set focus_duration").is_err());
        assert!(parse_input("set colour red").is_err());
    }

    #[test]
    fn help_is_not_a_command() {
        assert_eq!(parse_input("?").unwrap(), None);
        assert!(parse_input("dance").is_err());
    }

    #[test]
    fn status_line_shows_countdown_and_dots() {
        let engine = TimerEngine::new();
        let line = status_line(&engine);
        assert!(line.starts_with("Focus"));
        assert!(line.contains("25:00"));
        assert!(line.contains("●○○○"));
        assert!(line.ends_with("paused"));
    }
}
