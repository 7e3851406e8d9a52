use dashmap::DashMap;

/// Canonicalizes a virtual `/`-separated path: resolves `.` and `..`
/// segments, collapses duplicate separators and anchors the result at `/`.
/// Idempotent, so already-normalized paths pass through unchanged.
pub fn normalize_path(path: &str) -> String {
  let mut segments: Vec<&str> = Vec::new();
  for segment in path.split('/') {
    match segment {
      "" | "." => {}
      ".." => {
        segments.pop();
      }
      other => segments.push(other),
    }
  }

  let mut normalized = String::with_capacity(path.len() + 1);
  for segment in &segments {
    normalized.push('/');
    normalized.push_str(segment);
  }
  if normalized.is_empty() {
    normalized.push('/');
  }
  normalized
}

/// Resolves an import specifier against the importing module's directory
/// into a canonical module path.
///
/// The specifier is scanned from the end for the last `/` or `.`: when that
/// character is a `.` an extension is assumed present and the specifier is
/// kept as written, otherwise `.js` is appended. Specifiers starting with
/// `/` are absolute and ignore the base path.
pub fn resolve_module_path(base_path: &str, specifier: &str) -> String {
  let mut specifier = specifier.to_owned();
  match specifier.rfind(|ch| ch == '/' || ch == '.') {
    Some(idx) if specifier.as_bytes()[idx] == b'.' => {}
    _ => specifier.push_str(".js"),
  }

  if specifier.starts_with('/') {
    normalize_path(&specifier)
  } else {
    let mut combined = String::with_capacity(base_path.len() + specifier.len());
    combined.push_str(base_path);
    combined.push_str(&specifier);
    normalize_path(&combined)
  }
}

/// Specifier resolution fronted by a concurrent cache; module graphs resolve
/// the same `(base, specifier)` pairs over and over.
#[derive(Debug, Default)]
pub struct PathResolver {
  cache: DashMap<(String, String), String>,
}

impl PathResolver {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn resolve(&self, base_path: &str, specifier: &str) -> String {
    let key = (base_path.to_owned(), specifier.to_owned());
    if let Some(hit) = self.cache.get(&key) {
      return hit.clone();
    }
    let resolved = resolve_module_path(base_path, specifier);
    self.cache.insert(key, resolved.clone());
    resolved
  }
}

#[test]
fn appends_the_default_extension_by_last_slash_or_dot() {
  assert_eq!(resolve_module_path("/dir/", "./foo"), "/dir/foo.js");
  assert_eq!(resolve_module_path("/dir/", "./foo.json"), "/dir/foo.json");
  assert_eq!(resolve_module_path("/dir/", "/abs/bar"), "/abs/bar.js");
  // A dot before a later slash does not count as an extension.
  assert_eq!(resolve_module_path("/dir/", "../other/mod"), "/other/mod.js");
  assert_eq!(resolve_module_path("/dir/", "bare"), "/dir/bare.js");
}

#[test]
fn normalization_is_idempotent_and_collapsing() {
  assert_eq!(normalize_path("/dir//sub/./x.js"), "/dir/sub/x.js");
  assert_eq!(normalize_path("/dir/sub/../x.js"), "/dir/x.js");
  assert_eq!(normalize_path("a/b.js"), "/a/b.js");
  assert_eq!(normalize_path("/../../x.js"), "/x.js");
  assert_eq!(normalize_path(""), "/");

  let once = normalize_path("/dir/../dir//foo.js");
  assert_eq!(normalize_path(&once), once);
}

#[test]
fn cache_returns_the_computed_path() {
  let resolver = PathResolver::new();
  assert_eq!(resolver.resolve("/dir/", "./foo"), "/dir/foo.js");
  assert_eq!(resolver.resolve("/dir/", "./foo"), "/dir/foo.js");
}
