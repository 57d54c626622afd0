//! Open call descriptor

use crate::error::OpenError;
use crate::fs::OpenMode;
use std::path::{Path, PathBuf};

/// Arguments of a single open call.
///
/// The path comes from the `file` keyword when it is set and non-empty,
/// otherwise from the first positional value. The mode comes from the `mode`
/// keyword, otherwise from the positional value right after the path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OpenCall {
    pub file: Option<String>,
    pub positional: Vec<String>,
    pub mode: Option<String>,
}

impl OpenCall {
    pub fn new() -> Self {
        Self::default()
    }

    /// `open(path)`
    pub fn path(path: impl Into<String>) -> Self {
        Self {
            positional: vec![path.into()],
            ..Self::default()
        }
    }

    /// `open(file=path)`
    pub fn keyword(file: impl Into<String>) -> Self {
        Self {
            file: Some(file.into()),
            ..Self::default()
        }
    }

    pub fn arg(mut self, value: impl Into<String>) -> Self {
        self.positional.push(value.into());
        self
    }

    pub fn with_mode(mut self, mode: impl Into<String>) -> Self {
        self.mode = Some(mode.into());
        self
    }

    fn keyword_file(&self) -> Option<&str> {
        self.file.as_deref().filter(|f| !f.is_empty())
    }

    pub fn resolve_path(&self) -> Result<&str, OpenError> {
        self.keyword_file()
            .or_else(|| self.positional.first().map(String::as_str))
            .ok_or(OpenError::MissingPath)
    }

    pub fn resolve_mode(&self) -> Result<OpenMode, OpenError> {
        if let Some(mode) = &self.mode {
            return OpenMode::parse(mode);
        }

        let index = if self.keyword_file().is_some() { 0 } else { 1 };
        match self.positional.get(index) {
            Some(mode) => OpenMode::parse(mode),
            None => Ok(OpenMode::default()),
        }
    }
}

impl From<&str> for OpenCall {
    fn from(path: &str) -> Self {
        Self::path(path)
    }
}

impl From<String> for OpenCall {
    fn from(path: String) -> Self {
        Self::path(path)
    }
}

impl From<&Path> for OpenCall {
    fn from(path: &Path) -> Self {
        Self::path(path.to_string_lossy())
    }
}

impl From<PathBuf> for OpenCall {
    fn from(path: PathBuf) -> Self {
        Self::from(path.as_path())
    }
}

impl From<&OpenCall> for OpenCall {
    fn from(call: &OpenCall) -> Self {
        call.clone()
    }
}
