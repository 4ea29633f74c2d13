//! Error types for keepal operations.

use std::path::PathBuf;
use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced while opening, querying or saving a database.
#[derive(Debug, Error)]
pub enum Error {
    /// No usable credential source, or a required setting is missing.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A file could not be read, written or replaced.
    #[error("{action} {}: {source}", path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Wrong credential, corrupt container or unsupported format version.
    #[error("failed to open database {}: {message}", path.display())]
    Decode { path: PathBuf, message: String },

    /// The tree could not be serialized back into the container format.
    #[error("failed to encode database: {0}")]
    Encode(String),

    /// An entry or attribute does not resolve.
    #[error("{0} not found")]
    NotFound(String),

    /// A required command argument is missing or empty.
    #[error("usage error: {0}")]
    Usage(String),
}

/// Coarse error classification, used by frontends to pick an exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Configuration,
    Io,
    Decode,
    Encode,
    NotFound,
    Usage,
}

impl Error {
    pub(crate) fn io(action: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            action,
            path: path.into(),
            source,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Configuration(_) => ErrorKind::Configuration,
            Error::Io { .. } => ErrorKind::Io,
            Error::Decode { .. } => ErrorKind::Decode,
            Error::Encode(_) => ErrorKind::Encode,
            Error::NotFound(_) => ErrorKind::NotFound,
            Error::Usage(_) => ErrorKind::Usage,
        }
    }

    /// Process exit status for this error (sysexits-style).
    pub fn exit_code(&self) -> i32 {
        match self.kind() {
            ErrorKind::NotFound => 1,
            ErrorKind::Usage => 64,
            ErrorKind::Decode => 65,
            ErrorKind::Io | ErrorKind::Encode => 74,
            ErrorKind::Configuration => 78,
        }
    }
}
