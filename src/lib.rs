//! openstub - a path-keyed stand-in for the file-open primitive in tests
//!
//! Code under test opens files through an [`Opener`]. In tests that opener is
//! an [`OpenStub`], which answers each open call from a registry keyed by path
//! and never touches the disk unless told to.
//!
//! # Core Concepts
//!
//! - **Registry**: maps a path to the handle returned for it. Repeated opens
//!   of a registered path return the identical [`FileRef`].
//! - **Fallback**: what happens for an unregistered path. [`Fallback::Raise`]
//!   fails with a not-found error, [`Fallback::Delegate`] opens the real file,
//!   [`Fallback::Placeholder`] registers and returns a fresh [`StubFile`].
//! - **Interception points**: an [`OpenTable`] exposes two call sites that
//!   share one genuine opener; either can be patched for a test's duration.
//!
//! # Example Usage
//!
//! ```
//! use openstub::{Fallback, OpenStub, Scoped};
//!
//! let stub = OpenStub::new();
//! stub.set_read_data("/etc/app.conf", "debug = true\n").unwrap();
//!
//! let file = Scoped::enter(stub.invoke("/etc/app.conf").unwrap()).unwrap();
//! assert_eq!(file.read_to_string().unwrap(), "debug = true\n");
//!
//! stub.set_fallback(Fallback::Placeholder);
//! let first = stub.invoke("/var/log/app.log").unwrap();
//! let second = stub.invoke("/var/log/app.log").unwrap();
//! assert!(std::sync::Arc::ptr_eq(&first, &second));
//! ```

pub mod config;
pub mod error;
pub mod fs;
pub mod intercept;
pub mod stub;
pub mod util;

pub use config::{ConfigError, Fallback, StubConfig, UnknownPolicy};
pub use error::OpenError;
pub use fs::{
    CallCounts, FileHandle, FileRef, OpenCall, OpenMode, Opener, RealFile, RealOpener, Scoped,
    StubFile,
};
pub use intercept::{OpenTable, Patch, Point};
pub use stub::OpenStub;
pub use util::{init_default, init_from_env, init_logging, LoggingConfig};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_exists() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_name_is_openstub() {
        assert_eq!(NAME, "openstub");
    }
}
