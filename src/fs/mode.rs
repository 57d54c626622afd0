//! Open mode strings (`r`, `rb`, `w+`, `a`, `x`, ...)

use crate::error::OpenError;
use std::fs::OpenOptions;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Read,
    Write,
    Append,
    CreateNew,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpenMode {
    pub access: Access,
    /// `+`: the mode also gets the other direction
    pub update: bool,
    pub binary: bool,
}

impl Default for OpenMode {
    fn default() -> Self {
        Self {
            access: Access::Read,
            update: false,
            binary: false,
        }
    }
}

impl OpenMode {
    pub fn parse(mode: &str) -> Result<Self, OpenError> {
        if mode.is_empty() {
            return Ok(Self::default());
        }

        let invalid = || OpenError::InvalidMode(mode.to_string());
        let mut access = None;
        let mut update = false;
        let mut binary = None;
        let mut seen = Vec::with_capacity(mode.len());

        for c in mode.chars() {
            if seen.contains(&c) {
                return Err(invalid());
            }
            seen.push(c);

            match c {
                'r' | 'w' | 'a' | 'x' => {
                    if access.is_some() {
                        return Err(invalid());
                    }
                    access = Some(match c {
                        'r' => Access::Read,
                        'w' => Access::Write,
                        'a' => Access::Append,
                        _ => Access::CreateNew,
                    });
                }
                '+' => update = true,
                'b' | 't' => {
                    if binary.is_some() {
                        return Err(invalid());
                    }
                    binary = Some(c == 'b');
                }
                _ => return Err(invalid()),
            }
        }

        Ok(Self {
            access: access.ok_or_else(invalid)?,
            update,
            binary: binary.unwrap_or(false),
        })
    }

    pub fn readable(&self) -> bool {
        self.access == Access::Read || self.update
    }

    pub fn writable(&self) -> bool {
        self.access != Access::Read || self.update
    }

    pub fn to_options(&self) -> OpenOptions {
        let mut options = OpenOptions::new();
        options.read(self.readable());
        match self.access {
            Access::Read => {
                options.write(self.update);
            }
            Access::Write => {
                options.write(true).create(true).truncate(true);
            }
            Access::Append => {
                options.append(true).create(true);
            }
            Access::CreateNew => {
                options.write(true).create_new(true);
            }
        }
        options
    }
}
