//! The syntax-tree model the bundler operates on.
//!
//! This is deliberately not a full ECMAScript grammar: the bundler only needs
//! module-level structure (import/export statements, top-level declarations)
//! plus the identifier reference sites inside each statement. Nodes strictly
//! own their children; any ancestor context needed later is recomputed by a
//! top-down walk instead of stored as a back-pointer.

/// Half-open byte range into the module source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
  pub start: usize,
  pub end: usize,
}

impl Span {
  pub fn new(start: usize, end: usize) -> Self {
    Self { start, end }
  }

  pub fn text<'s>(&self, source: &'s str) -> &'s str {
    &source[self.start..self.end]
  }
}

/// One identifier occurrence. `shorthand` marks object-literal shorthand
/// positions (`{ name }`), where a rename must expand to `name: renamed`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentRef {
  pub name: String,
  pub span: Span,
  pub shorthand: bool,
}

impl IdentRef {
  pub fn new(name: impl Into<String>, span: Span) -> Self {
    Self { name: name.into(), span, shorthand: false }
  }
}

#[derive(Debug, Default)]
pub struct Program {
  pub statements: Vec<Statement>,
}

#[derive(Debug)]
pub struct Statement {
  pub span: Span,
  pub kind: StatementKind,
  /// Renameable identifier reference sites within the span. Property
  /// accesses and object keys are already excluded.
  pub idents: Vec<IdentRef>,
  /// Top-level names this statement introduces into module scope.
  pub bindings: Vec<IdentRef>,
}

#[derive(Debug)]
pub enum StatementKind {
  Import(ImportDecl),
  Export(ExportDecl),
  /// Anything else: an opaque run of top-level code, emitted as-is apart
  /// from identifier renaming.
  Script,
}

#[derive(Debug)]
pub struct ImportDecl {
  /// The module specifier exactly as written in source.
  pub specifier: String,
  /// `import name from '…'`
  pub default: Option<IdentRef>,
  /// `import * as name from '…'`
  pub namespace: Option<IdentRef>,
  /// `import { a, b as c } from '…'`
  pub named: Vec<ImportSpecifier>,
}

#[derive(Debug)]
pub struct ImportSpecifier {
  /// Export name in the source module.
  pub imported: String,
  /// Binding introduced in the importing module.
  pub local: IdentRef,
}

#[derive(Debug)]
pub enum ExportDecl {
  /// `export { a, b as c }` or `export { a } from '…'`.
  Named { specifiers: Vec<ExportSpecifier>, from: Option<String> },
  /// `export <declaration>`; `prefix_end` is where the `export` keyword
  /// (plus trailing whitespace) stops and the declaration itself begins.
  Declaration { prefix_end: usize },
  /// `export default …`; `binding` is the function/class name when present.
  Default { prefix_end: usize, binding: Option<String> },
  /// `export * from '…'` / `export * as ns from '…'`.
  All { from: String, alias: Option<String> },
}

#[derive(Debug)]
pub struct ExportSpecifier {
  /// Name bound (or imported) in this module.
  pub local: String,
  /// Name the outside world sees.
  pub exported: String,
}

/// Export name carried by `import d from` / `export default`.
pub const DEFAULT_EXPORT_NAME: &str = "default";

/// Pseudo export name recorded for `import * as ns` bindings.
pub const NAMESPACE_IMPORT_NAME: &str = "*";
