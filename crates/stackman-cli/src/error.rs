//! CLI error handling.

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use thiserror::Error;

/// CLI error type
#[derive(Debug, Error)]
pub enum CliError {
    #[error("{message}")]
    Config {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("{message}: {source}")]
    Io {
        message: String,
        #[source]
        source: io::Error,
        path: Option<PathBuf>,
    },

    /// Splitting or uniting failed.
    #[error(transparent)]
    Template(#[from] stackman_core::Error),

    /// The influx CLI could not be run or reported failure.
    #[error("{message}")]
    Command {
        message: String,
        command: String,
        #[source]
        source: Option<io::Error>,
    },

    #[error("{0}")]
    Log(#[from] stackman_log::LogError),
}

impl CliError {
    /// Numeric status per error class.
    pub fn code(&self) -> u8 {
        match self {
            Self::Config { .. } => 2,
            Self::Io { .. } => 3,
            Self::Template(stackman_core::Error::Io { .. } | stackman_core::Error::Encode { .. }) => 3,
            Self::Template(_) => 4,
            Self::Command { .. } => 5,
            Self::Log(_) => 1,
        }
    }

    /// Get the exit code for this error
    pub fn exit_code(&self) -> ExitCode {
        ExitCode::from(self.code())
    }

    /// Create an IO error
    pub fn io(message: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
            path: None,
        }
    }

    /// Create an IO error with path
    pub fn io_with_path(message: impl Into<String>, source: io::Error, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self::Io {
            message: format!("{} {}", message.into(), path.display()),
            source,
            path: Some(path),
        }
    }

    /// Create a command error
    pub fn command(message: impl Into<String>, command: impl Into<String>) -> Self {
        Self::Command {
            message: message.into(),
            command: command.into(),
            source: None,
        }
    }
}

impl From<stackman_config::ConfigError> for CliError {
    fn from(err: stackman_config::ConfigError) -> Self {
        Self::Config {
            message: format!("Configuration error: {err}"),
            source: Some(Box::new(err)),
        }
    }
}
