use std::path::{Path, PathBuf};

use sugar_path::SugarPath;

use crate::FileSource;

/// File source rooted at a directory on the local disk. Virtual bundle paths
/// (`/app/main.js`) resolve to entries below the root.
pub struct OsFileSource {
  root: PathBuf,
}

impl OsFileSource {
  pub fn new(root: impl Into<PathBuf>) -> Self {
    Self { root: root.into().normalize() }
  }

  fn locate(&self, path: &str) -> PathBuf {
    self.root.join(path.trim_start_matches('/')).normalize()
  }

  pub fn root(&self) -> &Path {
    &self.root
  }
}

impl FileSource for OsFileSource {
  fn hint(&self) -> String {
    format!("OsFileSource[{}]", self.root.display())
  }

  fn exists(&self, path: &str) -> bool {
    self.locate(path).is_file()
  }

  fn read_to_string(&self, path: &str) -> anyhow::Result<String> {
    let located = self.locate(path);
    std::fs::read_to_string(&located)
      .map_err(|err| anyhow::anyhow!("{}: {err}", located.display()))
  }
}
