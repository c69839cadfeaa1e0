use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Underlying reason an I/O operation failed, classified by `io::ErrorKind`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorCause {
    NotFound,
    PermissionDenied,
    NotADirectory,
    Other(String),
}

impl ErrorCause {
    pub fn as_str(&self) -> &str {
        match self {
            ErrorCause::NotFound => "no such file or directory",
            ErrorCause::PermissionDenied => "permission denied",
            ErrorCause::NotADirectory => "not a directory",
            ErrorCause::Other(message) => message,
        }
    }
}

impl From<&io::Error> for ErrorCause {
    fn from(err: &io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => ErrorCause::NotFound,
            io::ErrorKind::PermissionDenied => ErrorCause::PermissionDenied,
            io::ErrorKind::NotADirectory => ErrorCause::NotADirectory,
            _ => ErrorCause::Other(err.to_string()),
        }
    }
}

impl fmt::Display for ErrorCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScanError {
    /// The path could not be classified. Fatal for a top-level target.
    #[error("{}: {cause}", path.display())]
    Stat { path: PathBuf, cause: ErrorCause },

    /// A directory could not be listed; the walk continues without it.
    #[error("{}: {cause}", path.display())]
    Listing { path: PathBuf, cause: ErrorCause },

    /// A candidate file could not be opened or read to the end.
    #[error("{}: {cause}", path.display())]
    Hash { path: PathBuf, cause: ErrorCause },
}

impl ScanError {
    pub fn stat(path: &Path, err: &io::Error) -> Self {
        ScanError::Stat {
            path: path.to_path_buf(),
            cause: err.into(),
        }
    }

    pub fn listing(path: &Path, err: &io::Error) -> Self {
        ScanError::Listing {
            path: path.to_path_buf(),
            cause: err.into(),
        }
    }

    pub fn hash(path: &Path, err: &io::Error) -> Self {
        ScanError::Hash {
            path: path.to_path_buf(),
            cause: err.into(),
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            ScanError::Stat { path, .. }
            | ScanError::Listing { path, .. }
            | ScanError::Hash { path, .. } => path,
        }
    }

    pub fn cause(&self) -> &ErrorCause {
        match self {
            ScanError::Stat { cause, .. }
            | ScanError::Listing { cause, .. }
            | ScanError::Hash { cause, .. } => cause,
        }
    }

    pub fn kind_str(&self) -> &'static str {
        match self {
            ScanError::Stat { .. } => "stat",
            ScanError::Listing { .. } => "listing",
            ScanError::Hash { .. } => "hash",
        }
    }
}
