use std::io;
use std::path::PathBuf;

/// Errors returned by queue construction, configuration and persistence.
///
/// Persistence failures only surface through [`crate::BoundedUniqueQueue::try_save`]
/// and [`crate::record_file`]; construction swallows load failures.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum QueueError {
    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("invalid identifier '{input}': {reason}")]
    InvalidIdentifier { input: String, reason: String },

    #[error("no persistence path configured")]
    NoPersistencePath,

    #[error("i/o error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("config parse error: {0}")]
    Config(#[from] toml::de::Error),
}

impl QueueError {
    /// Convenience constructor for a rejected capacity value.
    pub fn invalid_capacity(value: usize) -> Self {
        Self::InvalidConfiguration {
            message: format!("capacity must be at least 1 (got {value})"),
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }

    /// Returns `true` for errors caused by caller-supplied settings rather
    /// than the environment.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::InvalidConfiguration { .. } | Self::Config(_))
    }
}
