use std::path::PathBuf;

use thiserror::Error;

/// Unified error type for chart-sync operations
#[derive(Error, Debug)]
pub enum ChartSyncError {
    #[error("Usage error: {0}")]
    Usage(String),

    #[error("{what} not found: {}", .path.display())]
    NotFound { what: String, path: PathBuf },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Metadata error: {0}")]
    Metadata(String),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in chart-sync
pub type Result<T> = std::result::Result<T, ChartSyncError>;

impl ChartSyncError {
    /// Create a usage error (missing or invalid argument)
    pub fn usage(msg: impl Into<String>) -> Self {
        ChartSyncError::Usage(msg.into())
    }

    /// Create a not-found error for a referenced file
    pub fn not_found(what: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        ChartSyncError::NotFound {
            what: what.into(),
            path: path.into(),
        }
    }

    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        ChartSyncError::Config(msg.into())
    }

    /// Create a metadata document error with context
    pub fn metadata(msg: impl Into<String>) -> Self {
        ChartSyncError::Metadata(msg.into())
    }

    /// Process exit code for this error: 2 for usage errors, 1 otherwise
    pub fn exit_code(&self) -> i32 {
        match self {
            ChartSyncError::Usage(_) => 2,
            _ => 1,
        }
    }
}
