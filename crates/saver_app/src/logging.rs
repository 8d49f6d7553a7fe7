//! Logging setup for the saver binary.

use std::fs::File;

use log::LevelFilter;
use simplelog::{
    ColorChoice, CombinedLogger, Config, ConfigBuilder, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};

const LOG_FILE: &str = "./saver.log";
const LEVEL: LevelFilter = LevelFilter::Info;

/// Destination for log output.
pub enum LogDestination {
    /// Write to ./saver.log in the current directory.
    File,
    /// Write to terminal (stdout).
    Terminal,
    /// Write to both file and terminal.
    Both,
}

/// Sets up the global logger. A log file that cannot be created degrades
/// to whatever sinks could still be built instead of failing the command.
pub fn initialize(destination: LogDestination) {
    let mut sinks: Vec<Box<dyn SharedLogger>> = Vec::new();

    if matches!(destination, LogDestination::Terminal | LogDestination::Both) {
        sinks.push(TermLogger::new(
            LEVEL,
            config(),
            TerminalMode::Mixed,
            ColorChoice::Auto,
        ));
    }
    if matches!(destination, LogDestination::File | LogDestination::Both) {
        match File::create(LOG_FILE) {
            Ok(file) => sinks.push(WriteLogger::new(LEVEL, config(), file)),
            Err(err) => eprintln!("Warning: could not create log file {LOG_FILE}: {err}"),
        }
    }

    if !sinks.is_empty() {
        let _ = CombinedLogger::init(sinks);
    }
}

fn config() -> Config {
    ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_target_level(LevelFilter::Error)
        .build()
}
