use espack_utils::concat_string;
use espack_utils::ecmascript::sanitize_identifier;
use xxhash_rust::xxh3::xxh3_64;

/// Identifier stem for one module: the sanitized `prefix + path` plus a
/// 32-bit fingerprint of the raw text. Sanitizing alone can map distinct
/// paths onto the same text (`/a/b_c.js` vs `/a/b/c.js`); the fingerprint
/// keeps stems unique per module while remaining a pure function of the
/// inputs, so renamed identifiers are reproducible across runs.
///
/// The stem doubles as the module's namespace-object identifier. Binding
/// names are appended after a `$`, which sanitized text never contains, so
/// the two name spaces cannot collide.
pub fn module_stem(source_prefix: &str, module_path: &str) -> String {
  let raw = concat_string!(source_prefix, module_path);
  let fingerprint = xxh3_64(raw.as_bytes()) & 0xffff_ffff;
  format!("{}_{fingerprint:08x}", sanitize_identifier(&raw))
}

/// Bundle-unique name for a binding of the module identified by `stem`.
pub fn renamed_identifier(stem: &str, name: &str) -> String {
  concat_string!(stem, "$", name)
}

#[test]
fn stems_are_stable_and_distinct() {
  let a = module_stem("", "/a/b_c.js");
  let b = module_stem("", "/a/b/c.js");
  assert_ne!(a, b);
  assert_eq!(a, module_stem("", "/a/b_c.js"));

  // The prefix participates in the stem.
  assert_ne!(module_stem("0:", "/a.js"), module_stem("1:", "/a.js"));
}

#[test]
fn renamed_identifiers_are_valid_and_separated() {
  let stem = module_stem("", "/dir/foo.js");
  let renamed = renamed_identifier(&stem, "count");
  assert!(espack_utils::ecmascript::is_valid_identifier_name(&renamed));
  assert!(renamed.ends_with("$count"));
  // A stem never contains `$`, so binding names cannot collide with
  // namespace identifiers.
  assert!(!stem.contains('$'));
}
