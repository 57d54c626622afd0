//! Path-keyed substitute for the open primitive

use crate::config::{Fallback, StubConfig};
use crate::error::OpenError;
use crate::fs::{FileRef, OpenCall, Opener, RealOpener, StubFile};
use crate::intercept::OpenTable;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard, Weak};
use tracing::debug;

/// Stand-in for the open primitive that answers from a path registry.
///
/// Registered paths always return the identical handle. Unregistered paths
/// go through the [`Fallback`] policy, which the test may change at any time.
pub struct OpenStub {
    fallback: RwLock<Fallback>,
    registry: RwLock<HashMap<String, FileRef>>,
    table: RwLock<Weak<OpenTable>>,
}

impl OpenStub {
    pub fn new() -> Self {
        Self::with_fallback(Fallback::default())
    }

    pub fn with_fallback(fallback: impl Into<Fallback>) -> Self {
        Self {
            fallback: RwLock::new(fallback.into()),
            registry: RwLock::new(HashMap::new()),
            table: RwLock::new(Weak::new()),
        }
    }

    pub fn from_config(config: &StubConfig) -> Self {
        Self::with_fallback(config.fallback.clone())
    }

    pub fn fallback(&self) -> Fallback {
        read(&self.fallback).clone()
    }

    /// Takes effect on the next invocation. Unknown values are only
    /// rejected when an unregistered path is opened.
    pub fn set_fallback(&self, fallback: impl Into<Fallback>) {
        let fallback = fallback.into();
        debug!(%fallback, "Fallback policy changed");
        *write(&self.fallback) = fallback;
    }

    pub fn register(&self, path: impl Into<String>, handle: FileRef) -> Result<(), OpenError> {
        let path = path.into();
        match write(&self.registry).entry(path) {
            Entry::Occupied(entry) => Err(OpenError::AlreadyRegistered {
                path: entry.key().clone(),
                existing: entry.get().clone(),
            }),
            Entry::Vacant(entry) => {
                debug!(path = %entry.key(), "Registered handle");
                entry.insert(handle);
                Ok(())
            }
        }
    }

    pub fn update(&self, path: impl Into<String>, handle: FileRef) {
        let path = path.into();
        debug!(path = %path, "Updated handle");
        write(&self.registry).insert(path, handle);
    }

    pub fn unregister(&self, path: &str) -> Result<FileRef, OpenError> {
        let removed = write(&self.registry)
            .remove(path)
            .ok_or_else(|| OpenError::NotRegistered(path.to_string()))?;
        debug!(path = %path, "Unregistered handle");
        Ok(removed)
    }

    /// Registers a [`StubFile`] whose reads return `data`.
    pub fn set_read_data(
        &self,
        path: impl Into<String>,
        data: impl Into<Vec<u8>>,
    ) -> Result<Arc<StubFile>, OpenError> {
        let stub = Arc::new(StubFile::with_read_data(data));
        self.register(path, stub.clone())?;
        Ok(stub)
    }

    pub fn lookup(&self, path: &str) -> Result<FileRef, OpenError> {
        read(&self.registry)
            .get(path)
            .cloned()
            .ok_or_else(|| OpenError::NotRegistered(path.to_string()))
    }

    pub fn contains(&self, path: &str) -> bool {
        read(&self.registry).contains_key(path)
    }

    /// Registered paths, sorted
    pub fn paths(&self) -> Vec<String> {
        let mut paths: Vec<String> = read(&self.registry).keys().cloned().collect();
        paths.sort();
        paths
    }

    pub fn len(&self) -> usize {
        read(&self.registry).len()
    }

    pub fn is_empty(&self) -> bool {
        read(&self.registry).is_empty()
    }

    pub fn invoke(&self, call: impl Into<OpenCall>) -> Result<FileRef, OpenError> {
        let call = call.into();
        let path = call.resolve_path()?;

        if let Some(handle) = read(&self.registry).get(path) {
            debug!(path = %path, "Returning registered handle");
            return Ok(handle.clone());
        }

        match self.fallback() {
            Fallback::Raise => Err(OpenError::FileNotFound(path.to_string())),
            Fallback::Delegate => self.delegate(&call),
            Fallback::Placeholder => {
                let mut registry = write(&self.registry);
                let handle = registry.entry(path.to_string()).or_insert_with(|| {
                    debug!(path = %path, "Created placeholder handle");
                    Arc::new(StubFile::new())
                });
                Ok(handle.clone())
            }
            Fallback::Unrecognized(value) => {
                Err(OpenError::InvalidFallback(value.as_str().to_string()))
            }
        }
    }

    pub(crate) fn attach(&self, table: Weak<OpenTable>) {
        *write(&self.table) = table;
    }

    fn delegate(&self, call: &OpenCall) -> Result<FileRef, OpenError> {
        let table = read(&self.table).upgrade();
        match table {
            Some(table) => table.delegate(call),
            None => {
                debug!(call = ?call, "Delegating to the real opener");
                RealOpener::new().open(call)
            }
        }
    }
}

fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

impl Default for OpenStub {
    fn default() -> Self {
        Self::new()
    }
}

impl Opener for OpenStub {
    fn open(&self, call: &OpenCall) -> Result<FileRef, OpenError> {
        self.invoke(call)
    }
}

impl fmt::Debug for OpenStub {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenStub")
            .field("fallback", &self.fallback())
            .field("paths", &self.paths())
            .finish()
    }
}
