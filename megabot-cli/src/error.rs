//! CLI-specific error types for MegaBot
//!
//! These errors wrap core errors and add the I/O-facing variants: storage,
//! configuration and terminal failures.

use std::path::PathBuf;

use thiserror::Error;

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] megabot_core::CoreError),

    #[error("Could not load tasks from {path}: {message}")]
    StorageRead {
        path: PathBuf,
        message: String,
        #[source]
        source: Option<std::io::Error>,
    },

    #[error("Could not save tasks to {path}: {source}")]
    StorageWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Terminal error: {context}")]
    Terminal {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

impl CliError {
    /// Create a storage read error with a message
    pub fn storage_read(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::StorageRead {
            path: path.into(),
            message: message.into(),
            source: None,
        }
    }

    /// Create a storage read error with source
    pub fn storage_read_with_source(
        path: impl Into<PathBuf>,
        message: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        Self::StorageRead {
            path: path.into(),
            message: message.into(),
            source: Some(source),
        }
    }

    /// Create a storage write error
    pub fn storage_write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::StorageWrite {
            path: path.into(),
            source,
        }
    }

    /// Create a config error with source
    pub fn config_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Config {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Create a terminal error with context
    pub fn terminal(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Terminal {
            context: context.into(),
            source,
        }
    }
}

impl From<confy::ConfyError> for CliError {
    fn from(err: confy::ConfyError) -> Self {
        Self::config_with_source("Failed to load configuration", err)
    }
}

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;
