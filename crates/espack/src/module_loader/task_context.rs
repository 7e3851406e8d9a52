use std::sync::Arc;

use espack_resolver::PathResolver;

use crate::module_loader::ModuleLoaderMsg;
use crate::types::{MergedCancelToken, SharedParser, SourcePrefixes};

/// Data shared between all phase-1 load tasks.
pub(crate) struct TaskContext {
  pub parser: SharedParser,
  pub resolver: Arc<PathResolver>,
  pub prefixes: Arc<SourcePrefixes>,
  pub cancel: MergedCancelToken,
  pub tx: tokio::sync::mpsc::Sender<ModuleLoaderMsg>,
}
