//! Platform logging initialization for the infinityad binary.
//!
//! Logs go to stderr by default so they never interleave with rendered panels
//! on stdout. `--log-file` redirects them to a file instead.

use std::fs::File;
use std::path::{Path, PathBuf};

use log::LevelFilter;
use simplelog::{
    ColorChoice, CombinedLogger, Config, ConfigBuilder, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};

/// Destination for log output.
pub enum LogDestination {
    /// Write to the given file, truncating it.
    File(PathBuf),
    /// Write to the terminal (stderr).
    Terminal,
}

impl LogDestination {
    pub fn from_option(path: Option<&Path>) -> Self {
        match path {
            Some(path) => LogDestination::File(path.to_path_buf()),
            None => LogDestination::Terminal,
        }
    }
}

/// Initialize the global logger. A second call is a no-op.
pub fn initialize(destination: LogDestination, level: LevelFilter) {
    if level == LevelFilter::Off {
        return;
    }
    let config = build_config();

    let logger: Box<dyn SharedLogger> = match destination {
        LogDestination::File(path) => match create_file_logger(&path, level, config.clone()) {
            Some(file_logger) => file_logger,
            None => terminal_logger(level, config),
        },
        LogDestination::Terminal => terminal_logger(level, config),
    };

    let _ = CombinedLogger::init(vec![logger]);
}

fn terminal_logger(level: LevelFilter, config: Config) -> Box<TermLogger> {
    TermLogger::new(level, config, TerminalMode::Stderr, ColorChoice::Auto)
}

fn build_config() -> Config {
    ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_target_level(LevelFilter::Error)
        .build()
}

fn create_file_logger(
    path: &Path,
    level: LevelFilter,
    config: Config,
) -> Option<Box<WriteLogger<File>>> {
    match File::create(path) {
        Ok(file) => Some(WriteLogger::new(level, config, file)),
        Err(err) => {
            eprintln!("Warning: Could not create log file at {:?}: {}", path, err);
            None
        }
    }
}
