mod ast;
mod bundler_options;
mod bundling_result;
mod cancellation;
mod input_item;
mod module_file;
mod parser;
mod symbols;

pub use espack_fs::FileSource;

pub use crate::{
  ast::{
    ExportDecl, ExportSpecifier, IdentRef, ImportDecl, ImportSpecifier, Program, Span, Statement,
    StatementKind, DEFAULT_EXPORT_NAME, NAMESPACE_IMPORT_NAME,
  },
  bundler_options::BundlerOptions,
  bundling_result::{BundleOutput, ExportMap, ModuleBundlingResult},
  cancellation::CancelToken,
  input_item::InputItem,
  module_file::{synthesized_root_path, ModuleFile},
  parser::ModuleParser,
  symbols::{module_stem, renamed_identifier},
};
