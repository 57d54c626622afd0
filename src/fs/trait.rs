//! Handle and opener traits

use crate::error::OpenError;
use crate::fs::OpenCall;
use std::fmt;
use std::io;
use std::ops::Deref;
use std::sync::Arc;

/// Shared reference to an opened handle, real or substitute.
pub type FileRef = Arc<dyn FileHandle>;

/// Per-method call counters recorded by stub handles
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallCounts {
    pub read: usize,
    pub write: usize,
    pub enter: usize,
    pub exit: usize,
}

/// Something returned from an open call
pub trait FileHandle: Send + Sync + fmt::Debug {
    /// Read the remaining contents
    fn read(&self) -> io::Result<Vec<u8>>;

    /// Read the remaining contents as UTF-8
    fn read_to_string(&self) -> io::Result<String> {
        String::from_utf8(self.read()?).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    /// Write a buffer, returning the number of bytes written
    fn write(&self, buf: &[u8]) -> io::Result<usize>;

    /// Start of a scoped acquisition
    fn enter(&self) -> io::Result<()> {
        Ok(())
    }

    /// End of a scoped acquisition
    fn exit(&self) -> io::Result<()> {
        Ok(())
    }

    /// Recorded call counts, for handles that track them
    fn call_counts(&self) -> Option<CallCounts> {
        None
    }
}

/// The file-open primitive
pub trait Opener: Send + Sync {
    fn open(&self, call: &OpenCall) -> Result<FileRef, OpenError>;
}

/// Scoped acquisition of a handle.
///
/// Calls [`FileHandle::enter`] on creation and [`FileHandle::exit`] on drop.
pub struct Scoped {
    handle: FileRef,
}

impl Scoped {
    pub fn enter(handle: FileRef) -> io::Result<Self> {
        handle.enter()?;
        Ok(Self { handle })
    }

    pub fn handle(&self) -> &FileRef {
        &self.handle
    }
}

impl Deref for Scoped {
    type Target = dyn FileHandle;

    fn deref(&self) -> &Self::Target {
        self.handle.as_ref()
    }
}

impl Drop for Scoped {
    fn drop(&mut self) {
        if let Err(e) = self.handle.exit() {
            tracing::warn!(error = %e, handle = ?self.handle, "Failed to exit scoped handle");
        }
    }
}
