use espack_common::{
  module_stem, renamed_identifier, BundleOutput, ExportMap, ModuleFile, DEFAULT_EXPORT_NAME,
};
use espack_utils::concat_string;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::types::{ModuleGraph, SourcePrefixes};

enum Visit {
  Enter(ModuleFile),
  Exit(ModuleFile),
}

/// Dependency order over the rewritten module set: an explicit two-state
/// stack walk from the roots, emitting a module only after everything it
/// references. Revisits — including cycles — are skipped rather than
/// re-descended, so cyclic graphs still produce a bundle, with live-binding
/// semantics inside the cycle only partially honored.
fn dependency_order(graph: &ModuleGraph) -> Vec<ModuleFile> {
  let mut stack: Vec<Visit> =
    graph.roots.iter().rev().map(|root| Visit::Enter(root.clone())).collect();
  let mut visited: FxHashSet<ModuleFile> = FxHashSet::default();
  let mut ordered = Vec::with_capacity(graph.modules.len());

  while let Some(visit) = stack.pop() {
    match visit {
      Visit::Enter(file) => {
        if !visited.insert(file.clone()) {
          continue;
        }
        stack.push(Visit::Exit(file.clone()));
        if let Some(record) = graph.modules.get(&file) {
          stack.extend(record.module_refs.keys().rev().map(|dep| Visit::Enter(dep.clone())));
        }
      }
      Visit::Exit(file) => ordered.push(file),
    }
  }
  ordered
}

/// A module's visible exports as `exported name → bundle identifier`,
/// following `export *` edges recursively. Own exports shadow star
/// re-exports and a star never forwards a default export.
fn export_closure(
  graph: &ModuleGraph,
  prefixes: &SourcePrefixes,
  file: &ModuleFile,
  seen: &mut FxHashSet<ModuleFile>,
) -> ExportMap {
  let mut map = ExportMap::new();
  if !seen.insert(file.clone()) {
    return map;
  }
  let Some(record) = graph.modules.get(file) else {
    return map;
  };
  let stem = module_stem(prefixes.prefix_of(file.source()), file.path());
  for export in &record.exports {
    map
      .entry(export.exported.clone())
      .or_insert_with(|| renamed_identifier(&stem, &export.exported));
  }
  for dep in &record.star_exports {
    for (exported, identifier) in export_closure(graph, prefixes, dep, seen) {
      if exported != DEFAULT_EXPORT_NAME {
        map.entry(exported).or_insert(identifier);
      }
    }
  }
  map
}

/// Composes the success payload: bodies joined in dependency order (with
/// `export *` fixup aliases placed directly after the re-exporting module)
/// and the per-root export maps.
pub(crate) fn build_output(graph: &ModuleGraph, line_break: &str) -> BundleOutput {
  let prefixes = &graph.prefixes;
  let ordered = dependency_order(graph);

  let mut sources: Vec<String> = Vec::with_capacity(ordered.len());
  for file in &ordered {
    let Some(record) = graph.modules.get(file) else {
      continue;
    };
    if let Some(body) = &record.rewritten {
      if !body.is_empty() {
        sources.push(body.clone());
      }
    }
    if record.star_exports.is_empty() {
      continue;
    }
    // Importers link against this module's own renamed names, so every
    // star-forwarded export gets a local alias. The dependencies were
    // emitted above, so the right-hand sides already exist.
    let stem = module_stem(prefixes.prefix_of(file.source()), file.path());
    let mut seen = FxHashSet::default();
    for (exported, identifier) in export_closure(graph, prefixes, file, &mut seen) {
      let alias = renamed_identifier(&stem, &exported);
      if alias != identifier {
        sources.push(concat_string!("var ", alias, " = ", identifier, ";"));
      }
    }
  }

  let mut exports: FxHashMap<ModuleFile, ExportMap> = FxHashMap::default();
  for root in &graph.roots {
    exports.entry(root.clone()).or_insert_with(|| {
      let mut seen = FxHashSet::default();
      export_closure(graph, prefixes, root, &mut seen)
    });
  }

  BundleOutput { content: sources.join(line_break), exports }
}
