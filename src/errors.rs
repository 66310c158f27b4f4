use std::io;

use petcore_config::ConfigError;
use petcore_core::{CoreError, DataSourceError};
use rustyline::error::ReadlineError;
use thiserror::Error;

/// Failures from the library layers below the shell.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error(transparent)]
    DataSource(#[from] DataSourceError),
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// User-facing CLI error wrapper.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    App(#[from] AppError),
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Line editor error: {0}")]
    Readline(#[from] ReadlineError),
    #[error("Prompt failed: {0}")]
    Prompt(#[from] dialoguer::Error),
    #[error("Invalid input: {0}")]
    Input(String),
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        CliError::App(AppError::Config(err))
    }
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        CliError::App(AppError::Core(err))
    }
}
