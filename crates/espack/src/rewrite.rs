use std::sync::Arc;

use espack_common::{
  module_stem, renamed_identifier, CancelToken, ExportDecl, ModuleFile, Statement, StatementKind,
  DEFAULT_EXPORT_NAME, NAMESPACE_IMPORT_NAME,
};
use espack_error::{BuildResult, BundleError};
use espack_utils::concat_string;
use espack_utils::rayon::{ParallelBridge, ParallelIterator};
use indexmap::IndexMap;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::types::{ModuleGraph, ModuleRecord, SourcePrefixes};

/// Phase 2: renames every module's top-level bindings to bundle-unique
/// identifiers and statically links imported references to the producing
/// module's renamed bindings. Fully data-parallel; each rewrite touches only
/// its own record. The first failure short-circuits the phase and any panic
/// (a defect) propagates.
pub(crate) fn rewrite_modules(
  graph: &mut ModuleGraph,
  cancel: &CancelToken,
  line_break: &str,
  development_mode: bool,
) -> BuildResult<()> {
  // Modules some importer references as a namespace; computed between the
  // phases so each module can emit its own namespace object in isolation.
  let mut namespace_required: FxHashSet<ModuleFile> = FxHashSet::default();
  for record in graph.modules.values() {
    for import in record.imports.values() {
      if import.imported == NAMESPACE_IMPORT_NAME {
        namespace_required.insert(import.source.clone());
      }
    }
    for export in &record.exports {
      if export.local == NAMESPACE_IMPORT_NAME {
        if let Some(source) = &export.source {
          namespace_required.insert(source.clone());
        }
      }
    }
  }

  let prefixes = Arc::clone(&graph.prefixes);
  graph.modules.values_mut().par_bridge().try_for_each(|record| {
    if cancel.is_cancelled() {
      return Err(BundleError::Cancelled);
    }
    rewrite_module(record, &prefixes, &namespace_required, line_break, development_mode);
    Ok(())
  })
}

fn stem_of(prefixes: &SourcePrefixes, file: &ModuleFile) -> String {
  module_stem(prefixes.prefix_of(file.source()), file.path())
}

fn rewrite_module(
  record: &mut ModuleRecord,
  prefixes: &SourcePrefixes,
  namespace_required: &FxHashSet<ModuleFile>,
  line_break: &str,
  development_mode: bool,
) {
  let stem = stem_of(prefixes, &record.file);
  let body = {
    // Local declared names first, then imported locals on top: a reference
    // to an import must link to the producing module's binding.
    let mut renames: FxHashMap<&str, String> = FxHashMap::default();
    for name in &record.bindings {
      renames.insert(name.as_str(), renamed_identifier(&stem, name));
    }
    for (local, import) in &record.imports {
      let dep_stem = stem_of(prefixes, &import.source);
      let replacement = if import.imported == NAMESPACE_IMPORT_NAME {
        dep_stem
      } else {
        renamed_identifier(&dep_stem, &import.imported)
      };
      renames.insert(local.as_str(), replacement);
    }

    let source = record.content.as_str();
    let mut emitted: Vec<String> = Vec::with_capacity(record.program.statements.len() + 4);
    for statement in &record.program.statements {
      match &statement.kind {
        // Imports and pure export statements carry no runtime code of their
        // own; the records already hold everything they said.
        StatementKind::Import(_) => {}
        StatementKind::Export(ExportDecl::Named { .. } | ExportDecl::All { .. }) => {}
        StatementKind::Export(ExportDecl::Declaration { prefix_end }) => {
          emitted.push(render_statement(source, statement, Some((*prefix_end, String::new())), &renames));
        }
        StatementKind::Export(ExportDecl::Default { prefix_end, binding }) => {
          let replacement = if binding.is_some() {
            // A named default declaration stays a declaration; the alias
            // below binds its default name.
            String::new()
          } else {
            concat_string!("var ", renamed_identifier(&stem, DEFAULT_EXPORT_NAME), " =")
          };
          emitted.push(render_statement(source, statement, Some((*prefix_end, replacement)), &renames));
        }
        StatementKind::Script => {
          emitted.push(render_statement(source, statement, None, &renames));
        }
      }
    }

    // Exports whose bundle name differs from the renamed right-hand side
    // (aliases, re-exports, named defaults) get a linking `var`.
    for export in &record.exports {
      let lhs = renamed_identifier(&stem, &export.exported);
      let rhs = match &export.source {
        Some(dep) => {
          let dep_stem = stem_of(prefixes, dep);
          if export.local == NAMESPACE_IMPORT_NAME {
            dep_stem
          } else {
            renamed_identifier(&dep_stem, &export.local)
          }
        }
        None => renames
          .get(export.local.as_str())
          .cloned()
          .unwrap_or_else(|| renamed_identifier(&stem, &export.local)),
      };
      if lhs != rhs {
        emitted.push(concat_string!("var ", lhs, " = ", rhs, ";"));
      }
    }

    if namespace_required.contains(&record.file) {
      emitted.push(render_namespace_object(&stem, record));
    }

    let mut parts = emitted;
    if development_mode {
      let mut wrapped = Vec::with_capacity(parts.len() + 2);
      wrapped.push(concat_string!("//#region ", record.file.path()));
      wrapped.append(&mut parts);
      wrapped.push("//#endregion".to_owned());
      parts = wrapped;
    }
    parts.join(line_break)
  };
  record.rewritten = Some(body);
}

fn render_namespace_object(stem: &str, record: &ModuleRecord) -> String {
  let mut entries: IndexMap<&str, String> = IndexMap::new();
  for export in &record.exports {
    entries
      .entry(export.exported.as_str())
      .or_insert_with(|| renamed_identifier(stem, &export.exported));
  }
  if entries.is_empty() {
    return concat_string!("var ", stem, " = {};");
  }
  let mut body = String::new();
  for (index, (exported, identifier)) in entries.iter().enumerate() {
    if index > 0 {
      body.push_str(", ");
    }
    body.push_str(exported);
    body.push_str(": ");
    body.push_str(identifier);
  }
  concat_string!("var ", stem, " = { ", body, " };")
}

/// Splices a statement's text: an optional prefix replacement (stripping
/// `export` / rewriting `export default`) plus the identifier renames, in
/// source order.
fn render_statement(
  source: &str,
  statement: &Statement,
  prefix: Option<(usize, String)>,
  renames: &FxHashMap<&str, String>,
) -> String {
  let mut out = String::with_capacity(statement.span.end - statement.span.start + 16);
  let mut cursor = statement.span.start;
  if let Some((prefix_end, replacement)) = prefix {
    out.push_str(&replacement);
    cursor = prefix_end;
  }
  for ident in &statement.idents {
    if ident.span.start < cursor {
      continue;
    }
    let Some(renamed) = renames.get(ident.name.as_str()) else {
      continue;
    };
    out.push_str(&source[cursor..ident.span.start]);
    if ident.shorthand {
      out.push_str(&ident.name);
      out.push_str(": ");
    }
    out.push_str(renamed);
    cursor = ident.span.end;
  }
  out.push_str(&source[cursor..statement.span.end]);
  out.trim_start().to_owned()
}
