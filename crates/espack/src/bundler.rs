use std::sync::Arc;

use espack_common::{BundlerOptions, CancelToken, InputItem, ModuleBundlingResult};
use espack_ecmascript::EcmaParser;
use espack_error::{BuildResult, BundleError};
use espack_resolver::PathResolver;

use crate::module_loader::fetch_module_graph;
use crate::result::build_output;
use crate::rewrite::rewrite_modules;
use crate::types::SharedParser;

/// Bundles a set of root modules and everything they transitively import
/// into one merged artifact.
///
/// A bundler holds no state between runs; it is however a single-run-at-a-
/// time engine, which `bundle(&mut self, …)` makes explicit.
pub struct ModuleBundler {
  parser: SharedParser,
  line_break: String,
  development_mode: bool,
}

impl ModuleBundler {
  pub fn new(options: BundlerOptions) -> Self {
    Self::with_parser(Arc::new(EcmaParser), options)
  }

  pub fn with_parser(parser: SharedParser, options: BundlerOptions) -> Self {
    Self {
      parser,
      line_break: options.new_line().to_owned(),
      development_mode: options.development_mode(),
    }
  }

  /// Runs the two bundling phases over `root_files`.
  ///
  /// Every recoverable failure — a module that cannot be read, a module that
  /// cannot be parsed — is logged exactly once and collapsed into
  /// `ModuleBundlingResult::Failure`; it is never returned as `Err`.
  /// Cancelling `cancel_signal` unwinds with `Err(BundleError::Cancelled)`
  /// and produces neither success nor failure. Anything else is a defect and
  /// propagates as a panic.
  pub async fn bundle(
    &mut self,
    root_files: Vec<InputItem>,
    cancel_signal: CancelToken,
  ) -> BuildResult<ModuleBundlingResult> {
    match self.bundle_inner(root_files, &cancel_signal).await {
      Ok(output) => Ok(ModuleBundlingResult::Success(output)),
      Err(BundleError::Cancelled) => Err(BundleError::Cancelled),
      Err(BundleError::Bundling(error)) => {
        log::error!("{error} ({:#})", error.cause);
        Ok(ModuleBundlingResult::Failure)
      }
    }
  }

  async fn bundle_inner(
    &self,
    root_files: Vec<InputItem>,
    cancel: &CancelToken,
  ) -> BuildResult<espack_common::BundleOutput> {
    let resolver = Arc::new(PathResolver::new());

    // Phase 1: discover and analyze the reachable graph. Hard barrier — the
    // module set is stable from here on.
    let mut graph =
      fetch_module_graph(Arc::clone(&self.parser), resolver, root_files, cancel).await?;

    // Phase 2: data-parallel rewrite of the now-stable module set.
    rewrite_modules(&mut graph, cancel, &self.line_break, self.development_mode)?;

    // A late cancel would only waste synthesis work.
    if cancel.is_cancelled() {
      return Err(BundleError::Cancelled);
    }

    Ok(build_output(&graph, &self.line_break))
  }
}
