use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using RecordLogError
pub type Result<T> = std::result::Result<T, RecordLogError>;

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code that can be used for programmatic
/// error handling, testing, and diagnostic events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// File system failure (directory creation, open, append, rotate, purge)
    Io,
    /// Context or extra data could not be serialized
    Serialization,
    /// A lock guarding shared state was poisoned by a panicking thread
    Concurrency,
}

impl ErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::Io => "ERR_IO",
            ErrorKind::Serialization => "ERR_SERIALIZATION",
            ErrorKind::Concurrency => "ERR_CONCURRENCY",
        }
    }
}

/// Errors surfaced by the logging facade
///
/// Configuration and level problems are never errors: they are defaulted or
/// coerced. Only failures of the underlying file I/O reach the caller.
#[derive(Error, Debug)]
pub enum RecordLogError {
    /// Log directory could not be created
    #[error("Cannot create log directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Log file could not be opened for appending
    #[error("Cannot open log file {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Appending a line failed
    #[error("Cannot write to log file {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Renaming the active file at a period boundary failed
    #[error("Cannot rotate log file {}: {source}", path.display())]
    Rotate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Removing an expired rotated file failed
    #[error("Cannot purge rotated log file {}: {source}", path.display())]
    Purge {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Record field group could not be rendered
    #[error("Cannot format record: {0}")]
    Format(#[from] serde_json::Error),

    /// Shared state lock poisoned
    #[error("Lock poisoned: {what}")]
    LockPoisoned { what: &'static str },
}

impl RecordLogError {
    /// Get the error kind
    pub fn kind(&self) -> ErrorKind {
        match self {
            RecordLogError::CreateDir { .. }
            | RecordLogError::Open { .. }
            | RecordLogError::Write { .. }
            | RecordLogError::Rotate { .. }
            | RecordLogError::Purge { .. } => ErrorKind::Io,
            RecordLogError::Format(_) => ErrorKind::Serialization,
            RecordLogError::LockPoisoned { .. } => ErrorKind::Concurrency,
        }
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind().code()
    }

    /// Path of the file involved, if any
    pub fn path(&self) -> Option<&std::path::Path> {
        match self {
            RecordLogError::CreateDir { path, .. }
            | RecordLogError::Open { path, .. }
            | RecordLogError::Write { path, .. }
            | RecordLogError::Rotate { path, .. }
            | RecordLogError::Purge { path, .. } => Some(path),
            RecordLogError::Format(_) | RecordLogError::LockPoisoned { .. } => None,
        }
    }
}
