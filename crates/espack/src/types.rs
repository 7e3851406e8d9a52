use std::sync::Arc;

use arcstr::ArcStr;
use espack_common::{CancelToken, FileSource, ModuleFile, ModuleParser, Program};
use indexmap::IndexMap;
use rustc_hash::{FxHashMap, FxHashSet};

pub type SharedParser = Arc<dyn ModuleParser>;

/// One raw export entry, in declaration order.
#[derive(Debug)]
pub(crate) struct ExportRecord {
  pub exported: String,
  pub local: String,
  /// For re-exports, the module the binding actually originates from.
  pub source: Option<ModuleFile>,
}

/// Where an imported local name comes from.
#[derive(Debug)]
pub(crate) struct ImportRecord {
  pub source: ModuleFile,
  /// Export name in the source module; `*` for namespace imports.
  pub imported: String,
}

/// Per-module working state. Created the instant an identity is first
/// discovered, populated across read/parse/analyze, rewritten in phase 2 and
/// discarded when the run completes.
#[derive(Debug)]
pub(crate) struct ModuleRecord {
  pub file: ModuleFile,
  pub content: ArcStr,
  pub program: Program,
  /// Dependency edges, in first-reference order, mapped to the referenced
  /// module's namespace alias.
  pub module_refs: IndexMap<ModuleFile, String>,
  pub imports: FxHashMap<String, ImportRecord>,
  pub exports: Vec<ExportRecord>,
  /// `export * from` edges, kept separately so the result builder can
  /// expand them.
  pub star_exports: Vec<ModuleFile>,
  /// Top-level declared names.
  pub bindings: FxHashSet<String>,
  pub rewritten: Option<String>,
}

impl ModuleRecord {
  pub fn new(file: ModuleFile, content: ArcStr, program: Program) -> Self {
    Self {
      file,
      content,
      program,
      module_refs: IndexMap::new(),
      imports: FxHashMap::default(),
      exports: Vec::new(),
      star_exports: Vec::new(),
      bindings: FxHashSet::default(),
      rewritten: None,
    }
  }
}

/// Short stable prefix per distinct file source, assigned in root order so
/// identifiers synthesized from paths in different sources cannot collide.
/// Collapses to the empty prefix when only one source participates.
#[derive(Default)]
pub(crate) struct SourcePrefixes {
  entries: Vec<(Arc<dyn FileSource>, String)>,
}

impl SourcePrefixes {
  pub fn register(&mut self, source: &Arc<dyn FileSource>) {
    if self.position(source).is_none() {
      let prefix = format!("{}:", self.entries.len());
      self.entries.push((Arc::clone(source), prefix));
    }
  }

  pub fn collapse_single(&mut self) {
    if self.entries.len() == 1 {
      self.entries[0].1 = String::new();
    }
  }

  pub fn prefix_of(&self, source: &Arc<dyn FileSource>) -> &str {
    self
      .position(source)
      .map(|at| self.entries[at].1.as_str())
      .expect("modules only reference registered file sources")
  }

  fn position(&self, source: &Arc<dyn FileSource>) -> Option<usize> {
    self.entries.iter().position(|(registered, _)| Arc::ptr_eq(registered, source))
  }
}

/// The caller's signal logically ORed with the internal first-error signal;
/// tasks poll this at every suspension point.
#[derive(Clone)]
pub(crate) struct MergedCancelToken {
  caller: CancelToken,
  internal: CancelToken,
}

impl MergedCancelToken {
  pub fn new(caller: CancelToken, internal: CancelToken) -> Self {
    Self { caller, internal }
  }

  pub fn is_cancelled(&self) -> bool {
    self.caller.is_cancelled() || self.internal.is_cancelled()
  }
}

/// Phase-1 output: the stable, fully analyzed module set.
pub(crate) struct ModuleGraph {
  pub modules: FxHashMap<ModuleFile, ModuleRecord>,
  pub roots: Vec<ModuleFile>,
  pub prefixes: Arc<SourcePrefixes>,
}
