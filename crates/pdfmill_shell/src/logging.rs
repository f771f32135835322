//! Logger setup for the shell.
//!
//! One global logger per process, wired to the terminal, a log file, or
//! both. The file is opened in append mode so successive runs of the
//! same working directory share one `pdfmill.log`.

use std::fs::OpenOptions;
use std::path::PathBuf;

use log::LevelFilter;
use simplelog::{
    ColorChoice, CombinedLogger, Config, ConfigBuilder, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};

/// Destination for log output.
pub enum LogDestination {
    /// Append to the log file in the current directory.
    File,
    /// Write to the terminal only.
    Terminal,
    /// Terminal plus the log file.
    Both,
}

/// How the global logger is wired up.
pub struct LogSettings {
    pub destination: LogDestination,
    /// Path of the log file, used by `File` and `Both`.
    pub path: PathBuf,
    pub level: LevelFilter,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            destination: LogDestination::Both,
            path: PathBuf::from("./pdfmill.log"),
            level: default_level(),
        }
    }
}

/// Initialize the global logger for the given destination, with the
/// default file path and build-profile level.
pub fn initialize(destination: LogDestination) {
    initialize_with(LogSettings {
        destination,
        ..LogSettings::default()
    });
}

/// Initialize the global logger from explicit settings. Safe to call
/// more than once; later calls lose against the logger already set.
pub fn initialize_with(settings: LogSettings) {
    let config = build_config();

    let mut loggers: Vec<Box<dyn SharedLogger>> = Vec::new();
    if matches!(
        settings.destination,
        LogDestination::Terminal | LogDestination::Both
    ) {
        loggers.push(TermLogger::new(
            settings.level,
            config.clone(),
            TerminalMode::Mixed,
            ColorChoice::Auto,
        ));
    }
    if matches!(
        settings.destination,
        LogDestination::File | LogDestination::Both
    ) {
        match OpenOptions::new()
            .create(true)
            .append(true)
            .open(&settings.path)
        {
            Ok(file) => loggers.push(WriteLogger::new(settings.level, config, file)),
            Err(err) => {
                eprintln!("log file {} unavailable: {err}", settings.path.display());
            }
        }
    }

    if !loggers.is_empty() {
        let _ = CombinedLogger::init(loggers);
    }
}

/// Debug in debug builds, info in release builds.
fn default_level() -> LevelFilter {
    if cfg!(debug_assertions) {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    }
}

fn build_config() -> Config {
    // Only the workspace crates log through this logger; dependency
    // noise stays out of the operation trail.
    ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_target_level(LevelFilter::Error)
        .add_filter_allow_str("pdfmill_core")
        .add_filter_allow_str("pdfmill_engine")
        .add_filter_allow_str("pdfmill_shell")
        .build()
}
