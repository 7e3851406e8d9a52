use std::sync::Mutex;

use rustc_hash::FxHashMap;

use crate::FileSource;

/// In-memory file source. Counts reads per path, which makes it suitable for
/// asserting that concurrently discovered modules are loaded exactly once.
#[derive(Default)]
pub struct MemoryFileSource {
  files: FxHashMap<String, String>,
  reads: Mutex<FxHashMap<String, usize>>,
}

impl MemoryFileSource {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn insert(&mut self, path: impl Into<String>, content: impl Into<String>) {
    self.files.insert(path.into(), content.into());
  }

  pub fn read_count(&self, path: &str) -> usize {
    self.reads.lock().expect("reads lock poisoned").get(path).copied().unwrap_or(0)
  }

  pub fn total_reads(&self) -> usize {
    self.reads.lock().expect("reads lock poisoned").values().sum()
  }
}

impl FileSource for MemoryFileSource {
  fn hint(&self) -> String {
    "MemoryFileSource".to_owned()
  }

  fn exists(&self, path: &str) -> bool {
    self.files.contains_key(path)
  }

  fn read_to_string(&self, path: &str) -> anyhow::Result<String> {
    *self.reads.lock().expect("reads lock poisoned").entry(path.to_owned()).or_insert(0) += 1;
    self
      .files
      .get(path)
      .cloned()
      .ok_or_else(|| anyhow::anyhow!("no file registered under {path}"))
  }
}

#[test]
fn counts_reads_per_path() {
  let mut fs = MemoryFileSource::new();
  fs.insert("/a.js", "export const a = 1;");

  assert!(fs.exists("/a.js"));
  assert!(!fs.exists("/b.js"));

  assert!(fs.read_to_string("/a.js").is_ok());
  assert!(fs.read_to_string("/a.js").is_ok());
  assert!(fs.read_to_string("/b.js").is_err());

  assert_eq!(fs.read_count("/a.js"), 2);
  assert_eq!(fs.read_count("/b.js"), 1);
  assert_eq!(fs.total_reads(), 3);
}
