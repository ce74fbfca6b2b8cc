pub mod output;
pub mod presenter;
mod shell;

use std::io;

use rustyline::error::ReadlineError;
use thiserror::Error;

use crate::errors::{LedgerError, StorageError};

pub use shell::run_cli;

/// User-facing CLI error wrapper.
#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] LedgerError),
    #[error("Invalid input: {0}")]
    Input(String),
    #[error("Command failed: {0}")]
    Command(String),
}

impl From<StorageError> for CliError {
    fn from(err: StorageError) -> Self {
        CliError::Core(LedgerError::Storage(err))
    }
}

impl From<io::Error> for CliError {
    fn from(err: io::Error) -> Self {
        CliError::Command(err.to_string())
    }
}

impl From<ReadlineError> for CliError {
    fn from(err: ReadlineError) -> Self {
        CliError::Command(err.to_string())
    }
}

impl From<dialoguer::Error> for CliError {
    fn from(err: dialoguer::Error) -> Self {
        CliError::Command(err.to_string())
    }
}
