use std::sync::Arc;

use arcstr::ArcStr;
use espack_fs::FileSource;

/// One root file handed to the bundler. `path: None` entries are anonymous
/// in-memory roots; they receive a synthesized module key and must carry
/// their content inline.
#[derive(Clone)]
pub struct InputItem {
  pub source: Arc<dyn FileSource>,
  pub path: Option<String>,
  pub content: Option<ArcStr>,
  pub case_sensitive: bool,
}

impl InputItem {
  pub fn new(source: Arc<dyn FileSource>, path: impl Into<String>) -> Self {
    Self { source, path: Some(path.into()), content: None, case_sensitive: true }
  }

  pub fn anonymous(source: Arc<dyn FileSource>, content: impl Into<ArcStr>) -> Self {
    Self { source, path: None, content: Some(content.into()), case_sensitive: true }
  }
}

impl std::fmt::Debug for InputItem {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("InputItem")
      .field("source", &self.source.hint())
      .field("path", &self.path)
      .field("case_sensitive", &self.case_sensitive)
      .finish()
  }
}
