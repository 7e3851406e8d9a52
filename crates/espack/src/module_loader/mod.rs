pub(crate) mod module_task;
pub(crate) mod task_context;

use std::sync::Arc;

use arcstr::ArcStr;
use espack_common::{synthesized_root_path, CancelToken, InputItem, ModuleFile};
use espack_error::{BuildResult, BundleError};
use espack_resolver::{normalize_path, PathResolver};
use module_task::{read_module_content, ModuleTask};
use rustc_hash::FxHashMap;
use task_context::TaskContext;

use crate::types::{MergedCancelToken, ModuleGraph, ModuleRecord, SharedParser, SourcePrefixes};

pub(crate) enum ModuleLoaderMsg {
  ModuleDone(Box<ModuleRecord>),
  BuildError(BundleError),
}

/// Phase 1: discovers and analyzes the whole reachable module graph.
///
/// Roots are registered and eagerly read up front; from there an mpsc loop
/// owns the module set, so "is this identity known, and if not, insert it"
/// is naturally atomic and at most one load task ever runs per module. The
/// loop drains until the transitive closure of spawned tasks has completed —
/// the hard barrier in front of the rewrite phase.
pub(crate) async fn fetch_module_graph(
  parser: SharedParser,
  resolver: Arc<PathResolver>,
  root_files: Vec<InputItem>,
  caller_cancel: &CancelToken,
) -> BuildResult<ModuleGraph> {
  let mut prefixes = SourcePrefixes::default();
  let mut modules: FxHashMap<ModuleFile, Option<ModuleRecord>> = FxHashMap::default();
  let mut roots = Vec::with_capacity(root_files.len());
  let mut pending: Vec<(ModuleFile, ArcStr)> = Vec::with_capacity(root_files.len());

  for (index, item) in root_files.into_iter().enumerate() {
    if caller_cancel.is_cancelled() {
      return Err(BundleError::Cancelled);
    }
    let InputItem { source, path, content, case_sensitive } = item;
    let path = match path {
      Some(path) => normalize_path(&path),
      None => synthesized_root_path(index),
    };
    let file = ModuleFile::new(source, path, case_sensitive);
    prefixes.register(file.source());
    roots.push(file.clone());

    // First occurrence wins for duplicate root references.
    if modules.contains_key(&file) {
      continue;
    }
    let content = match content {
      Some(content) => content,
      None => read_module_content(&file)?,
    };
    modules.insert(file.clone(), None);
    pending.push((file, content));
  }
  prefixes.collapse_single();
  let prefixes = Arc::new(prefixes);

  let internal_cancel = CancelToken::new();
  let cancel = MergedCancelToken::new(caller_cancel.clone(), internal_cancel.clone());

  // 1024 queued task results is plenty; tasks block on send past that.
  let (tx, mut rx) = tokio::sync::mpsc::channel(1024);
  let ctx = Arc::new(TaskContext {
    parser,
    resolver,
    prefixes: Arc::clone(&prefixes),
    cancel: cancel.clone(),
    tx,
  });

  let mut remaining: u32 = 0;
  for (file, content) in pending {
    remaining += 1;
    tokio::spawn(ModuleTask::new(Arc::clone(&ctx), file, Some(content)).run());
  }

  let mut first_error: Option<BundleError> = None;
  while remaining > 0 {
    let Some(msg) = rx.recv().await else {
      break;
    };
    match msg {
      ModuleLoaderMsg::ModuleDone(record) => {
        remaining -= 1;
        for dep in record.module_refs.keys() {
          // Cancellation stops new spawns quickly; in-flight tasks run to
          // their natural completion.
          if cancel.is_cancelled() {
            break;
          }
          if !modules.contains_key(dep) {
            modules.insert(dep.clone(), None);
            remaining += 1;
            tokio::spawn(ModuleTask::new(Arc::clone(&ctx), dep.clone(), None).run());
          }
        }
        modules.insert(record.file.clone(), Some(*record));
      }
      ModuleLoaderMsg::BuildError(error) => {
        remaining -= 1;
        match error {
          BundleError::Cancelled => {}
          error => {
            // First failure wins and aborts the rest of the phase; later
            // sibling errors drain silently.
            internal_cancel.cancel();
            if first_error.is_none() {
              first_error = Some(error);
            }
          }
        }
      }
    }
  }

  if let Some(error) = first_error {
    return Err(error);
  }
  if caller_cancel.is_cancelled() {
    return Err(BundleError::Cancelled);
  }

  let modules = modules
    .into_iter()
    .map(|(file, record)| {
      let record = record.expect("all load tasks completed before the barrier lifted");
      (file, record)
    })
    .collect();

  Ok(ModuleGraph { modules, roots, prefixes })
}
