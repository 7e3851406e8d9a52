use indexmap::IndexMap;
use rustc_hash::FxHashMap;

use crate::ModuleFile;

/// Exported name → renamed identifier in the bundle, in export order.
pub type ExportMap = IndexMap<String, String>;

#[derive(Debug, Default)]
pub struct BundleOutput {
  /// The merged, rewritten module bodies.
  pub content: String,
  /// Per root module, how its exports surface in the bundle.
  pub exports: FxHashMap<ModuleFile, ExportMap>,
}

/// Terminal outcome of a bundling run. Recoverable errors collapse into
/// `Failure` (after being logged); cancellation produces neither variant.
#[derive(Debug)]
pub enum ModuleBundlingResult {
  Failure,
  Success(BundleOutput),
}

impl ModuleBundlingResult {
  pub fn is_failure(&self) -> bool {
    matches!(self, Self::Failure)
  }

  pub fn into_output(self) -> Option<BundleOutput> {
    match self {
      Self::Failure => None,
      Self::Success(output) => Some(output),
    }
  }
}
