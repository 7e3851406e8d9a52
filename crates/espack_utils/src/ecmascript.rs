pub fn is_identifier_start(ch: char) -> bool {
  ch == '_' || ch == '$' || ch.is_alphabetic()
}

pub fn is_identifier_part(ch: char) -> bool {
  ch == '_' || ch == '$' || ch.is_alphanumeric()
}

pub fn is_valid_identifier_name(name: &str) -> bool {
  let mut chars = name.chars();
  chars.next().is_some_and(is_identifier_start) && chars.all(is_identifier_part)
}

/// Turns an arbitrary string into something usable as part of a synthesized
/// identifier. `$` is intentionally not preserved — callers reserve it as a
/// separator that sanitized text can never contain.
pub fn sanitize_identifier(text: &str) -> String {
  let mut out = String::with_capacity(text.len() + 1);
  for ch in text.chars() {
    if ch == '_' || ch.is_ascii_alphanumeric() {
      out.push(ch);
    } else {
      out.push('_');
    }
  }
  if !out.chars().next().is_some_and(|ch| ch == '_' || ch.is_ascii_alphabetic()) {
    out.insert(0, '_');
  }
  out
}

#[test]
fn test_is_valid_identifier_name() {
  assert!(is_valid_identifier_name("foo"));
  assert!(is_valid_identifier_name("$foo_1"));
  assert!(!is_valid_identifier_name("1aaaa"));
  assert!(!is_valid_identifier_name("a-b"));
  assert!(!is_valid_identifier_name(""));
}

#[test]
fn test_sanitize_identifier() {
  assert_eq!(sanitize_identifier("/dir/foo.js"), "_dir_foo_js");
  assert_eq!(sanitize_identifier("0:/a.js"), "_0__a_js");
  assert_eq!(sanitize_identifier("name$with$dollars"), "name_with_dollars");
  assert_eq!(sanitize_identifier(""), "_");
}
