use std::fmt;

/// Whether a module failed while being read from its file source or while
/// being parsed into a syntax tree. Both are the same recoverable kind as far
/// as the bundler is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BundlingErrorKind {
  Read,
  Parse,
}

/// A recoverable bundling failure, carrying the identity of the offending
/// module and a human-readable hint for the file source it came from.
#[derive(Debug)]
pub struct BundlingError {
  pub kind: BundlingErrorKind,
  pub file_path: String,
  pub source_hint: String,
  pub cause: anyhow::Error,
}

impl BundlingError {
  pub fn read(file_path: impl Into<String>, source_hint: impl Into<String>, cause: anyhow::Error) -> Self {
    Self { kind: BundlingErrorKind::Read, file_path: file_path.into(), source_hint: source_hint.into(), cause }
  }

  pub fn parse(file_path: impl Into<String>, source_hint: impl Into<String>, cause: anyhow::Error) -> Self {
    Self { kind: BundlingErrorKind::Parse, file_path: file_path.into(), source_hint: source_hint.into(), cause }
  }
}

impl fmt::Display for BundlingError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self.kind {
      BundlingErrorKind::Read => {
        write!(f, "Failed to read file {} via {}.", self.file_path, self.source_hint)
      }
      BundlingErrorKind::Parse => {
        write!(f, "Failed to parse file {} provided by {}.", self.file_path, self.source_hint)
      }
    }
  }
}

impl std::error::Error for BundlingError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    Some(self.cause.as_ref())
  }
}

#[derive(Debug, thiserror::Error)]
pub enum BundleError {
  /// Recoverable: logged once at the top level and converted into the
  /// failure result, never surfaced as `Err` by the bundler itself.
  #[error(transparent)]
  Bundling(Box<BundlingError>),
  /// The merged cancellation signal fired. Never logged; the run unwinds
  /// without producing any result.
  #[error("the bundling operation was cancelled")]
  Cancelled,
}

impl From<BundlingError> for BundleError {
  fn from(error: BundlingError) -> Self {
    Self::Bundling(Box::new(error))
  }
}

impl BundleError {
  pub fn is_cancellation(&self) -> bool {
    matches!(self, Self::Cancelled)
  }
}

pub type BuildResult<T> = Result<T, BundleError>;

#[test]
fn bundling_error_messages() {
  let read = BundlingError::read("/app/main.js", "OsFileSource[/srv]", anyhow::anyhow!("no such file"));
  assert_eq!(read.to_string(), "Failed to read file /app/main.js via OsFileSource[/srv].");

  let parse = BundlingError::parse("/app/main.js", "MemoryFileSource", anyhow::anyhow!("bad token"));
  assert_eq!(parse.to_string(), "Failed to parse file /app/main.js provided by MemoryFileSource.");
}
