use super::{FileHandle, FileRef, OpenCall, OpenMode, Opener};
use crate::error::OpenError;
use std::fs::File;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// The genuine open primitive, backed by `std::fs`
#[derive(Debug, Clone, Copy, Default)]
pub struct RealOpener;

impl RealOpener {
    pub fn new() -> Self {
        Self
    }
}

impl Opener for RealOpener {
    fn open(&self, call: &OpenCall) -> Result<FileRef, OpenError> {
        let path = call.resolve_path()?;
        let mode = call.resolve_mode()?;
        let file = RealFile::open(path, mode)?;
        Ok(Arc::new(file))
    }
}

/// A real file opened by [`RealOpener`]
#[derive(Debug)]
pub struct RealFile {
    path: PathBuf,
    mode: OpenMode,
    file: Mutex<File>,
}

impl RealFile {
    pub fn open(path: impl AsRef<Path>, mode: OpenMode) -> io::Result<Self> {
        let path = path.as_ref();
        let file = mode.to_options().open(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            mode,
            file: Mutex::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn mode(&self) -> OpenMode {
        self.mode
    }

    fn file(&self) -> MutexGuard<'_, File> {
        self.file.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl FileHandle for RealFile {
    fn read(&self) -> io::Result<Vec<u8>> {
        let mut buffer = Vec::new();
        self.file().read_to_end(&mut buffer)?;
        Ok(buffer)
    }

    fn write(&self, buf: &[u8]) -> io::Result<usize> {
        self.file().write_all(buf)?;
        Ok(buf.len())
    }

    fn exit(&self) -> io::Result<()> {
        self.file().flush()
    }
}
