use crate::fs::FileRef;
use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OpenError {
    #[error("Path {path} already registered with object {existing:?}")]
    AlreadyRegistered { path: String, existing: FileRef },

    #[error("No object registered for path {0}")]
    NotRegistered(String),

    #[error("File {0} not found in open stub")]
    FileNotFound(String),

    #[error("{0} is not a valid fallback policy. Valid options: raise, delegate, placeholder")]
    InvalidFallback(String),

    #[error("Both open and io_open already patched")]
    DualInterception,

    #[error("Open call has no path: pass a `file` keyword or a positional path")]
    MissingPath,

    #[error("Invalid open mode: {0:?}")]
    InvalidMode(String),

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl OpenError {
    /// The `io::ErrorKind` a caller would see from a real open.
    pub fn kind(&self) -> io::ErrorKind {
        match self {
            OpenError::AlreadyRegistered { .. } => io::ErrorKind::AlreadyExists,
            OpenError::NotRegistered(_) | OpenError::FileNotFound(_) => io::ErrorKind::NotFound,
            OpenError::InvalidFallback(_) | OpenError::MissingPath | OpenError::InvalidMode(_) => {
                io::ErrorKind::InvalidInput
            }
            OpenError::DualInterception => io::ErrorKind::Other,
            OpenError::Io(e) => e.kind(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.kind() == io::ErrorKind::NotFound
    }
}

impl From<OpenError> for io::Error {
    fn from(err: OpenError) -> Self {
        match err {
            OpenError::Io(e) => e,
            other => io::Error::new(other.kind(), other),
        }
    }
}
