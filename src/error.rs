//! Error types for MirrorCP
//!
//! Two tiers of failure exist: fatal configuration errors that stop the run
//! before any thread is spawned, and per-item I/O failures that are counted
//! and logged while the run continues. Only the first tier is represented
//! here; the second never crosses a thread boundary as an error value.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for MirrorCP operations
#[derive(Error, Debug)]
pub enum MirrorError {
    /// I/O error during file operations
    #[error("I/O error at '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Source root could not be opened; nothing has been copied
    #[error("cannot open source root '{path}': {source}")]
    SourceRootUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration error (bad arguments, non-positive sizes)
    #[error("configuration error: {0}")]
    Config(String),
}

impl MirrorError {
    /// Create an I/O error with path context
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Get the path associated with this error, if any
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            Self::Io { path, .. } | Self::SourceRootUnreadable { path, .. } => Some(path),
            _ => None,
        }
    }
}

/// Result type alias for MirrorCP operations
pub type Result<T> = std::result::Result<T, MirrorError>;

/// Extension trait for adding path context to std::io::Result
pub trait IoResultExt<T> {
    /// Add path context to an I/O error
    fn with_path(self, path: impl Into<PathBuf>) -> Result<T>;
}

impl<T> IoResultExt<T> for std::io::Result<T> {
    fn with_path(self, path: impl Into<PathBuf>) -> Result<T> {
        self.map_err(|e| MirrorError::io(path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_with_path() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = MirrorError::io("/test/path", io_err);
        assert!(err.path().is_some());
        assert_eq!(err.path().unwrap(), &PathBuf::from("/test/path"));
    }

    #[test]
    fn test_config_error_has_no_path() {
        let err = MirrorError::config("buffer size must be positive");
        assert!(err.path().is_none());
        assert!(err.to_string().contains("buffer size"));
    }

    #[test]
    fn test_with_path_extension() {
        let result: std::io::Result<()> =
            Err(std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"));
        let err = result.with_path("/locked").unwrap_err();
        assert_eq!(err.path().unwrap(), &PathBuf::from("/locked"));
    }
}
