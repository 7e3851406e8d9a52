use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BundlerOptions {
  /// Line separator between emitted module bodies. Defaults to `"\n"`.
  pub new_line: Option<String>,
  /// Keep per-module region markers and spacing in the output for
  /// debuggability instead of favoring compactness.
  pub development_mode: Option<bool>,
}

impl BundlerOptions {
  pub fn new_line(&self) -> &str {
    self.new_line.as_deref().unwrap_or("\n")
  }

  pub fn development_mode(&self) -> bool {
    self.development_mode.unwrap_or(false)
  }
}
