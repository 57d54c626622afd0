//! Interception points for the open primitive
//!
//! An [`OpenTable`] has two call sites, [`Point::Open`] and [`Point::IoOpen`],
//! that both reach the same genuine opener. A test replaces either one with an
//! [`OpenStub`] for its duration through a [`Patch`] guard. Patches stack per
//! point: the newest one answers calls, and dropping any guard removes only
//! its own stub, whatever order the guards go in.
//!
//! A stub that delegates to the genuine opener must go through a point that is
//! not itself replaced, otherwise the call would land in stub behavior again.
//! With both points replaced there is no such route and delegation fails with
//! [`OpenError::DualInterception`].

use crate::error::OpenError;
use crate::fs::{FileRef, OpenCall, Opener, RealOpener};
use crate::stub::OpenStub;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Point {
    Open,
    IoOpen,
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Point::Open => write!(f, "open"),
            Point::IoOpen => write!(f, "io_open"),
        }
    }
}

pub struct OpenTable {
    open: RwLock<Vec<Arc<OpenStub>>>,
    io_open: RwLock<Vec<Arc<OpenStub>>>,
    genuine: Arc<dyn Opener>,
}

impl OpenTable {
    pub fn new() -> Arc<Self> {
        Self::with_genuine(Arc::new(RealOpener::new()))
    }

    pub fn with_genuine(genuine: Arc<dyn Opener>) -> Arc<Self> {
        Arc::new(Self {
            open: RwLock::new(Vec::new()),
            io_open: RwLock::new(Vec::new()),
            genuine,
        })
    }

    fn slot(&self, point: Point) -> &RwLock<Vec<Arc<OpenStub>>> {
        match point {
            Point::Open => &self.open,
            Point::IoOpen => &self.io_open,
        }
    }

    fn occupant(&self, point: Point) -> Option<Arc<OpenStub>> {
        self.slot(point)
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
    }

    fn push(&self, point: Point, stub: Arc<OpenStub>) {
        self.slot(point)
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(stub);
    }

    /// Removes the most recent installation of `stub` at `point`.
    fn remove(&self, point: Point, stub: &Arc<OpenStub>) {
        let mut slot = self.slot(point).write().unwrap_or_else(PoisonError::into_inner);
        if let Some(index) = slot.iter().rposition(|s| Arc::ptr_eq(s, stub)) {
            slot.remove(index);
        }
    }

    pub fn is_patched(&self, point: Point) -> bool {
        self.occupant(point).is_some()
    }

    /// The stub currently installed at `point`, if any
    pub fn stub(&self, point: Point) -> Option<Arc<OpenStub>> {
        self.occupant(point)
    }

    /// Calls through `point`, reaching either its stub or the genuine opener.
    pub fn call(&self, point: Point, call: impl Into<OpenCall>) -> Result<FileRef, OpenError> {
        let call = call.into();
        match self.occupant(point) {
            Some(stub) => stub.invoke(call),
            None => self.genuine.open(&call),
        }
    }

    pub fn open(&self, call: impl Into<OpenCall>) -> Result<FileRef, OpenError> {
        self.call(Point::Open, call)
    }

    pub fn io_open(&self, call: impl Into<OpenCall>) -> Result<FileRef, OpenError> {
        self.call(Point::IoOpen, call)
    }

    /// Installs `stub` at `point` until the returned guard is dropped.
    pub fn install(self: &Arc<Self>, point: Point, stub: Arc<OpenStub>) -> Patch {
        stub.attach(Arc::downgrade(self));
        self.push(point, stub.clone());
        debug!(%point, "Installed open stub");
        Patch {
            table: Arc::clone(self),
            point,
            stub,
        }
    }

    /// Installs a fresh stub with the default fallback.
    pub fn patch(self: &Arc<Self>, point: Point) -> Patch {
        self.install(point, Arc::new(OpenStub::new()))
    }

    pub(crate) fn delegate(&self, call: &OpenCall) -> Result<FileRef, OpenError> {
        let route = match (self.is_patched(Point::Open), self.is_patched(Point::IoOpen)) {
            (true, true) => {
                warn!(call = ?call, "Cannot delegate: open and io_open are both patched");
                return Err(OpenError::DualInterception);
            }
            (false, true) => Point::Open,
            (_, false) => Point::IoOpen,
        };

        debug!(%route, call = ?call, "Delegating to the genuine opener");
        self.call(route, call)
    }
}

impl fmt::Debug for OpenTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenTable")
            .field("open", &self.occupant(Point::Open))
            .field("io_open", &self.occupant(Point::IoOpen))
            .finish_non_exhaustive()
    }
}

/// Restores an interception point when dropped
#[must_use = "the point is restored as soon as the patch is dropped"]
pub struct Patch {
    table: Arc<OpenTable>,
    point: Point,
    stub: Arc<OpenStub>,
}

impl Patch {
    pub fn stub(&self) -> &Arc<OpenStub> {
        &self.stub
    }

    pub fn point(&self) -> Point {
        self.point
    }
}

impl Drop for Patch {
    fn drop(&mut self) {
        self.table.remove(self.point, &self.stub);
        debug!(point = %self.point, "Restored open point");
    }
}
