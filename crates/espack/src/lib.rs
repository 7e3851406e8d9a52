mod analyze;
mod bundler;
mod module_loader;
mod result;
mod rewrite;
mod types;

pub use crate::bundler::ModuleBundler;
pub use crate::types::SharedParser;
pub use espack_common::*;
pub use espack_error::{BuildResult, BundleError, BundlingError, BundlingErrorKind};
