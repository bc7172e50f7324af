//! Error handling for the pairalign CLI

use std::path::PathBuf;
use std::process::ExitCode;
use thiserror::Error;

use pairalign_core::types::ParseValueError;

/// Main error type for pairalign CLI operations
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{message}")]
    Usage { message: String },

    #[error("{message}")]
    Format { message: String },

    #[error("Cannot open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Input/Output error: {message}")]
    Io { message: String },
}

impl CliError {
    pub fn usage<S: Into<String>>(message: S) -> Self {
        Self::Usage { message: message.into() }
    }

    pub fn format<S: Into<String>>(message: S) -> Self {
        Self::Format { message: message.into() }
    }

    pub fn open(path: PathBuf, source: std::io::Error) -> Self {
        Self::Open { path, source }
    }

    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config { message: message.into() }
    }

    pub fn io<S: Into<String>>(message: S) -> Self {
        Self::Io { message: message.into() }
    }

    /// Every failure exits with status 1.
    pub fn exit_code(&self) -> ExitCode {
        ExitCode::from(1)
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        Self::io(err.to_string())
    }
}

impl From<ParseValueError> for CliError {
    fn from(err: ParseValueError) -> Self {
        let message = match err {
            ParseValueError::Mode(_) => "Invalid mode (-m)!",
            ParseValueError::PathFormat(_) => "Invalid alignment path format (-f)!",
        };
        log::debug!("{}", err);
        Self::format(message)
    }
}

impl From<anyhow::Error> for CliError {
    fn from(err: anyhow::Error) -> Self {
        Self::config(format!("{:#}", err))
    }
}

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;

/// Print error on one line and return the process exit code
pub fn report_error(error: &CliError) -> ExitCode {
    eprintln!("Error: {}", error);
    error.exit_code()
}
