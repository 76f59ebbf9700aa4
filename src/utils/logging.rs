// SV1 Mock Pool - Free and Open Source Software Statement
//
// This project, sv1-mock-pool, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/utils/logging.rs
// Version: 1.0.0
// Developer: OIEIEIO <oieieio@protonmail.com>
//
// Console + append-only file logging via log4rs.

use log::LevelFilter;
use log4rs::append::console::ConsoleAppender;
use log4rs::append::file::FileAppender;
use log4rs::config::{Appender, Config, Root};
use log4rs::encode::pattern::PatternEncoder;
use std::io;
use std::path::Path;
use thiserror::Error;

/// Every log line: `[2026-10-16 12:00:00] message`
pub const LOG_PATTERN: &str = "[{d(%Y-%m-%d %H:%M:%S)}] {m}{n}";

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("Log file error: {0}")]
    Io(#[from] io::Error),
    #[error("Invalid logging configuration: {0}")]
    Config(String),
    #[error("Logger already initialised: {0}")]
    AlreadyInitialised(#[from] log::SetLoggerError),
}

/// Remove a stale log file unless it should be kept
pub fn prepare_log_file(path: &Path, keep: bool) -> Result<(), LoggingError> {
    if keep {
        return Ok(());
    }
    match std::fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

/// Build the console + file configuration without installing it
pub fn build_config(path: &Path, level: LevelFilter) -> Result<Config, LoggingError> {
    let stdout = ConsoleAppender::builder()
        .encoder(Box::new(PatternEncoder::new(LOG_PATTERN)))
        .build();
    let file = FileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(LOG_PATTERN)))
        .append(true)
        .build(path)?;

    Config::builder()
        .appender(Appender::builder().build("stdout", Box::new(stdout)))
        .appender(Appender::builder().build("file", Box::new(file)))
        .build(Root::builder().appender("stdout").appender("file").build(level))
        .map_err(|e| LoggingError::Config(e.to_string()))
}

/// Install the global logger. Call once at startup.
pub fn init_logging(path: &Path, keep: bool, level: LevelFilter) -> Result<(), LoggingError> {
    prepare_log_file(path, keep)?;
    let config = build_config(path, level)?;
    log4rs::init_config(config)?;
    Ok(())
}
