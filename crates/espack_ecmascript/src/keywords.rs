/// Words that are never treated as renameable identifier references.
/// Contextual keywords (`from`, `as`, `of`, `async`) are included; `get`,
/// `set` and `static` are not — they are ordinary identifiers outside member
/// positions and the scanner handles those positions contextually.
pub(crate) static KEYWORDS: phf::Set<&'static str> = phf::phf_set! {
  "as", "async", "await", "break", "case", "catch", "class", "const",
  "continue", "debugger", "default", "delete", "do", "else", "enum", "export",
  "extends", "false", "finally", "for", "from", "function", "if", "import",
  "in", "instanceof", "let", "new", "null", "of", "return", "super", "switch",
  "this", "throw", "true", "try", "typeof", "var", "void", "while", "with",
  "yield",
};

/// Keywords after which a `/` starts a regular expression literal rather
/// than a division.
pub(crate) static REGEX_PRECEDING_KEYWORDS: phf::Set<&'static str> = phf::phf_set! {
  "await", "case", "delete", "do", "else", "in", "instanceof", "new", "of",
  "return", "throw", "typeof", "void", "yield",
};

/// Keywords a `{` can follow while still opening an object literal.
pub(crate) static OBJECT_PRECEDING_KEYWORDS: phf::Set<&'static str> = phf::phf_set! {
  "await", "case", "default", "delete", "in", "instanceof", "new", "of",
  "return", "throw", "typeof", "void", "yield",
};

/// Member-name modifiers inside object literals and class bodies.
pub(crate) static MEMBER_MODIFIERS: phf::Set<&'static str> = phf::phf_set! {
  "async", "get", "set", "static",
};
