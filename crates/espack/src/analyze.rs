use espack_common::{
  module_stem, ExportDecl, ModuleFile, StatementKind, DEFAULT_EXPORT_NAME, NAMESPACE_IMPORT_NAME,
};
use espack_resolver::PathResolver;

use crate::types::{ExportRecord, ImportRecord, ModuleRecord, SourcePrefixes};

/// Walks a module's top-level statements exactly once, resolving import
/// specifiers against the importer's directory and filling in the record's
/// dependency edges, import map, export list and top-level bindings.
/// Top-level forms the frontend left untracked simply contribute nothing —
/// they are not errors.
pub(crate) fn analyze_declarations(
  record: &mut ModuleRecord,
  resolver: &PathResolver,
  prefixes: &SourcePrefixes,
) {
  let importer = record.file.clone();
  let base_path = importer.dir_path().to_owned();
  let program = std::mem::take(&mut record.program);

  let mut reference = |record: &mut ModuleRecord, specifier: &str| -> ModuleFile {
    let dep = importer.sibling(resolver.resolve(&base_path, specifier));
    if !record.module_refs.contains_key(&dep) {
      let alias = module_stem(prefixes.prefix_of(dep.source()), dep.path());
      record.module_refs.insert(dep.clone(), alias);
    }
    dep
  };

  for statement in &program.statements {
    match &statement.kind {
      StatementKind::Import(decl) => {
        let dep = reference(record, &decl.specifier);
        if let Some(default) = &decl.default {
          record.imports.insert(
            default.name.clone(),
            ImportRecord { source: dep.clone(), imported: DEFAULT_EXPORT_NAME.to_owned() },
          );
        }
        if let Some(namespace) = &decl.namespace {
          record.imports.insert(
            namespace.name.clone(),
            ImportRecord { source: dep.clone(), imported: NAMESPACE_IMPORT_NAME.to_owned() },
          );
        }
        for specifier in &decl.named {
          record.imports.insert(
            specifier.local.name.clone(),
            ImportRecord { source: dep.clone(), imported: specifier.imported.clone() },
          );
        }
      }
      StatementKind::Export(decl) => match decl {
        ExportDecl::Named { specifiers, from } => {
          let dep = from.as_deref().map(|specifier| reference(record, specifier));
          for specifier in specifiers {
            record.exports.push(ExportRecord {
              exported: specifier.exported.clone(),
              local: specifier.local.clone(),
              source: dep.clone(),
            });
          }
        }
        ExportDecl::Declaration { .. } => {
          for binding in &statement.bindings {
            record.exports.push(ExportRecord {
              exported: binding.name.clone(),
              local: binding.name.clone(),
              source: None,
            });
          }
        }
        ExportDecl::Default { binding, .. } => {
          record.exports.push(ExportRecord {
            exported: DEFAULT_EXPORT_NAME.to_owned(),
            local: binding.clone().unwrap_or_else(|| DEFAULT_EXPORT_NAME.to_owned()),
            source: None,
          });
        }
        ExportDecl::All { from, alias } => {
          let dep = reference(record, from);
          match alias {
            Some(name) => record.exports.push(ExportRecord {
              exported: name.clone(),
              local: NAMESPACE_IMPORT_NAME.to_owned(),
              source: Some(dep),
            }),
            None => record.star_exports.push(dep),
          }
        }
      },
      StatementKind::Script => {}
    }

    for binding in &statement.bindings {
      record.bindings.insert(binding.name.clone());
    }
  }

  record.program = program;
}
