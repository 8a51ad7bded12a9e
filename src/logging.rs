//! log4rs backend for the `log` facade, built from the `[logging]` section.

use crate::config::LoggingConfig;
use log4rs::append::console::ConsoleAppender;
use log4rs::append::file::FileAppender;
use log4rs::config::{Appender, Config, Root};
use log4rs::encode::pattern::PatternEncoder;
use std::path::PathBuf;
use thiserror::Error;

const PATTERN: &str = "{d(%Y-%m-%d %H:%M:%S)} {l} {t} - {m}{n}";
const STDOUT_APPENDER: &str = "stdout";
const FILE_APPENDER: &str = "file";

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("Failed to open log file '{0}'")]
    LogFile(PathBuf, #[source] std::io::Error),

    #[error("Invalid logging configuration")]
    Config(#[from] log4rs::config::runtime::ConfigErrors),

    #[error("A logger is already installed")]
    SetLogger(#[from] log::SetLoggerError),
}

/// Builds the log4rs configuration: a console appender when `log_to_stdout`
/// is set and an appending file appender when `log_path` is.
pub fn build_config(config: &LoggingConfig) -> Result<Config, LoggingError> {
    let mut builder = Config::builder();
    let mut root = Root::builder();

    if config.log_to_stdout {
        let stdout = ConsoleAppender::builder()
            .encoder(Box::new(PatternEncoder::new(PATTERN)))
            .build();
        builder = builder.appender(Appender::builder().build(STDOUT_APPENDER, Box::new(stdout)));
        root = root.appender(STDOUT_APPENDER);
    }

    if let Some(path) = &config.log_path {
        let file = FileAppender::builder()
            .encoder(Box::new(PatternEncoder::new(PATTERN)))
            .append(true)
            .build(path)
            .map_err(|e| LoggingError::LogFile(path.clone(), e))?;
        builder = builder.appender(Appender::builder().build(FILE_APPENDER, Box::new(file)));
        root = root.appender(FILE_APPENDER);
    }

    Ok(builder.build(root.build(config.level))?)
}

/// Installs the global logger. Call once, at startup.
pub fn init(config: &LoggingConfig) -> Result<(), LoggingError> {
    log4rs::init_config(build_config(config)?)?;
    Ok(())
}
