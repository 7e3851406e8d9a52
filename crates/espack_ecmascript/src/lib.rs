//! Tolerant ECMAScript module frontend.
//!
//! The bundler only needs module-level structure: import/export statements,
//! top-level declarations and identifier reference sites. This frontend
//! recovers exactly that from raw source — everything it does not recognize
//! is passed through as opaque script — and stays tolerant of constructs a
//! full grammar would reject.

mod keywords;
mod lexer;
mod scanner;

use espack_common::{ModuleParser, Program};

pub use crate::scanner::parse_module;

/// The default parser implementation plugged into the bundler.
#[derive(Debug, Default, Clone, Copy)]
pub struct EcmaParser;

impl ModuleParser for EcmaParser {
  fn parse(&self, source: &str) -> anyhow::Result<Program> {
    parse_module(source)
  }
}
