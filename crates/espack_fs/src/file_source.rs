/// The capability a module store must provide to the bundler.
///
/// Paths handed to a file source are virtual, `/`-separated and already
/// normalized; how they map onto actual storage is the implementation's
/// business.
pub trait FileSource: Send + Sync {
  /// Human-readable identity of this source, used in diagnostics
  /// (e.g. `OsFileSource[/srv/assets]`).
  fn hint(&self) -> String;

  fn exists(&self, path: &str) -> bool;

  fn read_to_string(&self, path: &str) -> anyhow::Result<String>;
}
