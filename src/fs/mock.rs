use super::{CallCounts, FileHandle};
use std::io;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Permissive stand-in handle.
///
/// Reads return the preset data (empty when none was given), writes are
/// recorded, and every call is counted.
#[derive(Debug, Default)]
pub struct StubFile {
    read_data: Option<Vec<u8>>,
    written: Mutex<Vec<u8>>,
    calls: Mutex<CallCounts>,
}

impl StubFile {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_read_data(data: impl Into<Vec<u8>>) -> Self {
        Self {
            read_data: Some(data.into()),
            ..Self::default()
        }
    }

    pub fn read_data(&self) -> Option<&[u8]> {
        self.read_data.as_deref()
    }

    /// Everything written so far
    pub fn written(&self) -> Vec<u8> {
        lock(&self.written).clone()
    }

    pub fn calls(&self) -> CallCounts {
        *lock(&self.calls)
    }

    fn record(&self, f: impl FnOnce(&mut CallCounts)) {
        f(&mut lock(&self.calls));
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl FileHandle for StubFile {
    fn read(&self) -> io::Result<Vec<u8>> {
        self.record(|c| c.read += 1);
        Ok(self.read_data.clone().unwrap_or_default())
    }

    fn write(&self, buf: &[u8]) -> io::Result<usize> {
        self.record(|c| c.write += 1);
        lock(&self.written).extend_from_slice(buf);
        Ok(buf.len())
    }

    fn enter(&self) -> io::Result<()> {
        self.record(|c| c.enter += 1);
        Ok(())
    }

    fn exit(&self) -> io::Result<()> {
        self.record(|c| c.exit += 1);
        Ok(())
    }

    fn call_counts(&self) -> Option<CallCounts> {
        Some(self.calls())
    }
}
