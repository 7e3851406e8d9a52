use std::borrow::Cow;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use arcstr::ArcStr;
use espack_fs::FileSource;

/// The identity of one module: which file source it lives in, its normalized
/// path within that source, and whether that path compares case-sensitively.
/// Used as the unique key in the module set.
#[derive(Clone)]
pub struct ModuleFile {
  source: Arc<dyn FileSource>,
  path: ArcStr,
  case_sensitive: bool,
}

/// Key for root files supplied without a path, so anonymous in-memory
/// entries remain distinct from each other.
pub fn synthesized_root_path(index: usize) -> String {
  format!("<>{index}")
}

impl ModuleFile {
  pub fn new(source: Arc<dyn FileSource>, path: impl Into<ArcStr>, case_sensitive: bool) -> Self {
    Self { source, path: path.into(), case_sensitive }
  }

  pub fn source(&self) -> &Arc<dyn FileSource> {
    &self.source
  }

  pub fn path(&self) -> &str {
    &self.path
  }

  pub fn case_sensitive(&self) -> bool {
    self.case_sensitive
  }

  pub fn source_hint(&self) -> String {
    self.source.hint()
  }

  /// Same source and case-sensitivity, different path. Referenced modules
  /// inherit both from their importer.
  pub fn sibling(&self, path: impl Into<ArcStr>) -> Self {
    Self { source: Arc::clone(&self.source), path: path.into(), case_sensitive: self.case_sensitive }
  }

  /// The directory part of the path, up to and including the last `/`.
  /// Empty for placeholder keys, which have no directory.
  pub fn dir_path(&self) -> &str {
    match self.path.rfind('/') {
      Some(idx) => &self.path[..=idx],
      None => "",
    }
  }

  fn source_addr(&self) -> usize {
    Arc::as_ptr(&self.source).cast::<()>() as usize
  }

  fn key_path(&self) -> Cow<'_, str> {
    if self.case_sensitive {
      Cow::Borrowed(self.path.as_str())
    } else {
      Cow::Owned(self.path.to_lowercase())
    }
  }
}

impl PartialEq for ModuleFile {
  fn eq(&self, other: &Self) -> bool {
    self.case_sensitive == other.case_sensitive
      && self.source_addr() == other.source_addr()
      && self.key_path() == other.key_path()
  }
}

impl Eq for ModuleFile {}

impl Hash for ModuleFile {
  fn hash<H: Hasher>(&self, state: &mut H) {
    self.source_addr().hash(state);
    self.case_sensitive.hash(state);
    self.key_path().hash(state);
  }
}

impl std::fmt::Debug for ModuleFile {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("ModuleFile")
      .field("source", &self.source.hint())
      .field("path", &self.path)
      .field("case_sensitive", &self.case_sensitive)
      .finish()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use espack_fs::MemoryFileSource;

  #[test]
  fn equality_follows_the_case_sensitivity_flag() {
    let source: Arc<dyn FileSource> = Arc::new(MemoryFileSource::new());

    let exact = ModuleFile::new(Arc::clone(&source), "/App/Main.js", true);
    let folded = ModuleFile::new(Arc::clone(&source), "/app/main.js", false);

    assert_ne!(exact, ModuleFile::new(Arc::clone(&source), "/app/main.js", true));
    assert_eq!(folded, ModuleFile::new(Arc::clone(&source), "/APP/MAIN.JS", false));
    // The flag itself is part of the key.
    assert_ne!(exact, ModuleFile::new(Arc::clone(&source), "/App/Main.js", false));
  }

  #[test]
  fn distinct_sources_never_compare_equal() {
    let first: Arc<dyn FileSource> = Arc::new(MemoryFileSource::new());
    let second: Arc<dyn FileSource> = Arc::new(MemoryFileSource::new());

    let a = ModuleFile::new(first, "/a.js", true);
    let b = ModuleFile::new(second, "/a.js", true);
    assert_ne!(a, b);
  }

  #[test]
  fn dir_path_splits_after_the_last_slash() {
    let source: Arc<dyn FileSource> = Arc::new(MemoryFileSource::new());
    assert_eq!(ModuleFile::new(Arc::clone(&source), "/dir/sub/foo.js", true).dir_path(), "/dir/sub/");
    assert_eq!(ModuleFile::new(Arc::clone(&source), synthesized_root_path(0), true).dir_path(), "");
  }
}
