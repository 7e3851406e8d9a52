mod file_source;
mod memory;
#[cfg(feature = "os")]
mod os;

pub use crate::file_source::FileSource;
pub use crate::memory::MemoryFileSource;
#[cfg(feature = "os")]
pub use os::OsFileSource;
