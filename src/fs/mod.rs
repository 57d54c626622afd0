//! Open primitive abstraction: handles, call descriptors, real and stub files

mod call;
mod mock;
pub mod mode;
mod real;
mod r#trait;

pub use call::OpenCall;
pub use mock::StubFile;
pub use mode::OpenMode;
pub use r#trait::{CallCounts, FileHandle, FileRef, Opener, Scoped};
pub use real::{RealFile, RealOpener};
