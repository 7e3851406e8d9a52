use crate::Program;

/// The parsing capability the bundler consumes. Implementations should be
/// tolerant of minor syntax issues but may still fail outright; failures are
/// treated like read failures and abort the run.
pub trait ModuleParser: Send + Sync {
  fn parse(&self, source: &str) -> anyhow::Result<Program>;
}
