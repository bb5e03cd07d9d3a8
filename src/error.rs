use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Application-wide result type alias.
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error types.
#[derive(Debug, Error)]
pub enum AppError {
    /// I/O errors from terminal setup or log file creation.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Terminal initialization or rendering errors.
    #[error("Terminal error: {0}")]
    Terminal(String),

    /// Invalid path provided by the user.
    #[error("Invalid path: {0}")]
    InvalidPath(String),
}

/// Failure reported by a filesystem accessor call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FsError {
    #[error("{} not found", .0.display())]
    NotFound(PathBuf),

    #[error("permission denied: {}", .0.display())]
    PermissionDenied(PathBuf),

    #[error("{}: {message}", path.display())]
    Io { path: PathBuf, message: String },
}

impl FsError {
    /// Classify an `io::Error` raised while touching `path`.
    pub fn from_io(path: &Path, err: &io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => FsError::NotFound(path.to_path_buf()),
            io::ErrorKind::PermissionDenied => FsError::PermissionDenied(path.to_path_buf()),
            _ => FsError::Io {
                path: path.to_path_buf(),
                message: err.to_string(),
            },
        }
    }
}

/// Recoverable browsing failures, always rendered inline.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BrowseError {
    /// Enumeration of a directory failed.
    #[error("Error reading directory: {source}")]
    DirectoryUnreadable {
        path: PathBuf,
        #[source]
        source: FsError,
    },

    /// A listed path could no longer be stat'ed or opened.
    #[error("Error: {source}")]
    PathVanished {
        path: PathBuf,
        #[source]
        source: FsError,
    },

    /// Reading the bounded file prefix failed.
    #[error("Error reading content: {source}")]
    ReadTruncated {
        path: PathBuf,
        #[source]
        source: FsError,
    },
}
