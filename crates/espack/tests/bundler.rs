use std::sync::Arc;

use espack::{
  module_stem, renamed_identifier, BundleError, BundleOutput, BundlerOptions, CancelToken,
  InputItem, ModuleBundler, ModuleBundlingResult,
};
use espack_fs::MemoryFileSource;
use pretty_assertions::assert_eq;

fn memory_source(files: &[(&str, &str)]) -> Arc<MemoryFileSource> {
  let mut fs = MemoryFileSource::new();
  for (path, content) in files {
    fs.insert(*path, *content);
  }
  Arc::new(fs)
}

async fn bundle_roots(
  fs: &Arc<MemoryFileSource>,
  roots: &[&str],
  options: BundlerOptions,
) -> ModuleBundlingResult {
  let items = roots.iter().map(|path| InputItem::new(fs.clone(), *path)).collect();
  ModuleBundler::new(options)
    .bundle(items, CancelToken::new())
    .await
    .expect("not cancelled")
}

async fn bundle_one(fs: &Arc<MemoryFileSource>, root: &str) -> BundleOutput {
  bundle_roots(fs, &[root], BundlerOptions::default())
    .await
    .into_output()
    .expect("bundling succeeds")
}

#[tokio::test]
async fn orders_dependencies_before_dependents() {
  let fs = memory_source(&[
    ("/main.js", "import { greet } from './lib/greet';\nconsole.log(greet('world'));\n"),
    (
      "/lib/greet.js",
      "import { upper } from './case';\nexport function greet(name) { return upper(name); }\n",
    ),
    ("/lib/case.js", "export function upper(text) { return text.toUpperCase(); }\n"),
  ]);
  let output = bundle_one(&fs, "/main.js").await;

  let case_stem = module_stem("", "/lib/case.js");
  let greet_stem = module_stem("", "/lib/greet.js");

  let upper_def = output
    .content
    .find(&format!("function {}", renamed_identifier(&case_stem, "upper")))
    .expect("dependency body present");
  let greet_def = output
    .content
    .find(&format!("function {}", renamed_identifier(&greet_stem, "greet")))
    .expect("intermediate body present");
  let greet_use = output.content.find("console.log").expect("root body present");

  assert!(upper_def < greet_def && greet_def < greet_use);
  // The cross-module call is statically linked.
  assert!(output.content.contains(&format!("return {}(name)", renamed_identifier(&case_stem, "upper"))));
}

#[tokio::test]
async fn concurrent_discovery_loads_each_module_once() {
  let fs = memory_source(&[
    ("/main.js", "import { a } from './a';\nimport { b } from './b';\nexport const total = a + b;\n"),
    ("/a.js", "import { shared } from './shared';\nexport const a = shared + 1;\n"),
    ("/b.js", "import { shared } from './lib/../shared.js';\nexport const b = shared + 2;\n"),
    ("/shared.js", "export const shared = 40;\n"),
  ]);
  let output = bundle_one(&fs, "/main.js").await;

  // Two different import paths normalize to one identity: one record, one read.
  assert_eq!(fs.read_count("/shared.js"), 1);
  assert_eq!(fs.read_count("/a.js"), 1);
  assert_eq!(fs.read_count("/b.js"), 1);

  let shared_stem = module_stem("", "/shared.js");
  assert_eq!(
    output.content.matches(&format!("const {} =", renamed_identifier(&shared_stem, "shared"))).count(),
    1
  );
}

#[tokio::test]
async fn missing_module_produces_the_failure_result() {
  let fs = memory_source(&[("/main.js", "import { x } from './nope';\nexport const y = x;\n")]);
  let result = bundle_roots(&fs, &["/main.js"], BundlerOptions::default()).await;
  assert!(result.is_failure());
}

#[tokio::test]
async fn invalid_syntax_produces_the_failure_result() {
  let fs = memory_source(&[("/broken.js", "const s = 'unterminated\nconsole.log(s);\n")]);
  let result = bundle_roots(&fs, &["/broken.js"], BundlerOptions::default()).await;
  assert!(result.is_failure());
}

#[tokio::test]
async fn byte_identical_inputs_bundle_byte_identically() {
  let files = [
    ("/main.js", "import { a } from './a';\nexport const doubled = a + a;\n"),
    ("/a.js", "import { b } from './b';\nexport const a = b * 2;\n"),
    ("/b.js", "export const b = 10;\nexport default b;\n"),
  ];
  let first = bundle_one(&memory_source(&files), "/main.js").await;
  let second = bundle_one(&memory_source(&files), "/main.js").await;

  assert_eq!(first.content, second.content);
  assert_eq!(
    first.exports.values().next().expect("one root"),
    second.exports.values().next().expect("one root")
  );
}

#[tokio::test]
async fn cancelling_before_phase_two_yields_neither_success_nor_failure() {
  let fs = memory_source(&[("/main.js", "export const x = 1;\n")]);
  let cancel = CancelToken::new();
  cancel.cancel();

  let outcome = ModuleBundler::new(BundlerOptions::default())
    .bundle(vec![InputItem::new(fs.clone(), "/main.js")], cancel)
    .await;
  assert!(matches!(outcome, Err(BundleError::Cancelled)));
}

#[tokio::test]
async fn distinct_file_sources_get_distinct_prefixes() {
  let first = memory_source(&[("/entry.js", "export const value = 1;\n")]);
  let second = memory_source(&[("/entry.js", "export const value = 2;\n")]);

  let output = ModuleBundler::new(BundlerOptions::default())
    .bundle(
      vec![InputItem::new(first.clone(), "/entry.js"), InputItem::new(second.clone(), "/entry.js")],
      CancelToken::new(),
    )
    .await
    .expect("not cancelled")
    .into_output()
    .expect("bundling succeeds");

  assert_eq!(output.exports.len(), 2);
  let mut identifiers: Vec<String> =
    output.exports.values().map(|map| map.get("value").expect("exported").clone()).collect();
  identifiers.sort();

  let mut expected = vec![
    renamed_identifier(&module_stem("0:", "/entry.js"), "value"),
    renamed_identifier(&module_stem("1:", "/entry.js"), "value"),
  ];
  expected.sort();
  assert_eq!(identifiers, expected);
}

#[tokio::test]
async fn a_single_file_source_collapses_to_an_empty_prefix() {
  let fs = memory_source(&[("/entry.js", "export const value = 1;\n")]);
  let output = bundle_one(&fs, "/entry.js").await;

  let map = output.exports.values().next().expect("one root");
  assert_eq!(
    map.get("value").expect("exported"),
    &renamed_identifier(&module_stem("", "/entry.js"), "value")
  );
}

#[tokio::test]
async fn namespace_imports_link_to_a_namespace_object() {
  let fs = memory_source(&[
    ("/main.js", "import * as math from './math';\nexport const result = math.double(21);\n"),
    ("/math.js", "export function double(x) { return x * 2; }\nexport const zero = 0;\n"),
  ]);
  let output = bundle_one(&fs, "/main.js").await;

  let math_stem = module_stem("", "/math.js");
  let expected_object = format!(
    "var {math_stem} = {{ double: {double}, zero: {zero} }};",
    double = renamed_identifier(&math_stem, "double"),
    zero = renamed_identifier(&math_stem, "zero"),
  );
  assert!(output.content.contains(&expected_object));
  // The `math.double(…)` reference goes through the renamed namespace.
  assert!(output.content.contains(&format!("{math_stem}.double(21)")));
}

#[tokio::test]
async fn re_exports_and_defaults_resolve_to_the_producing_module() {
  let fs = memory_source(&[
    ("/main.js", "import calc, { meaning } from './facade';\nconsole.log(calc(), meaning);\n"),
    (
      "/facade.js",
      "import { answer } from './answers';\nexport { answer as meaning };\nexport default function calc() { return answer; }\n",
    ),
    ("/answers.js", "export const answer = 42;\n"),
  ]);
  let output = bundle_one(&fs, "/main.js").await;

  let facade_stem = module_stem("", "/facade.js");
  let answers_stem = module_stem("", "/answers.js");
  let answer = renamed_identifier(&answers_stem, "answer");
  let meaning = renamed_identifier(&facade_stem, "meaning");
  let default = renamed_identifier(&facade_stem, "default");
  let calc = renamed_identifier(&facade_stem, "calc");

  assert!(output.content.contains(&format!("var {meaning} = {answer};")));
  assert!(output.content.contains(&format!("var {default} = {calc};")));
  // The importing side references the default binding directly.
  assert!(output.content.contains(&format!("console.log({default}(), {meaning})")));
}

#[tokio::test]
async fn export_all_forwards_through_the_barrel() {
  let fs = memory_source(&[
    ("/main.js", "import { alpha, beta } from './barrel';\nexport const sum = alpha + beta;\n"),
    ("/barrel.js", "export * from './greek';\n"),
    ("/greek.js", "export const alpha = 1;\nexport const beta = 2;\n"),
  ]);
  let output = bundle_one(&fs, "/main.js").await;

  let barrel_stem = module_stem("", "/barrel.js");
  let greek_stem = module_stem("", "/greek.js");

  let fixup = format!(
    "var {} = {};",
    renamed_identifier(&barrel_stem, "alpha"),
    renamed_identifier(&greek_stem, "alpha")
  );
  assert!(output.content.contains(&fixup));

  let definition = output
    .content
    .find(&format!("const {} =", renamed_identifier(&greek_stem, "alpha")))
    .expect("origin body present");
  let alias = output.content.find(&fixup).expect("fixup alias present");
  let usage = output
    .content
    .find(&format!("const {} =", renamed_identifier(&module_stem("", "/main.js"), "sum")))
    .expect("root body present");
  assert!(definition < alias && alias < usage);
}

#[tokio::test]
async fn cyclic_imports_emit_every_body_exactly_once() {
  let fs = memory_source(&[
    ("/a.js", "import { b } from './b';\nexport const a = 'a';\nexport function readB() { return b; }\n"),
    ("/b.js", "import { a } from './a';\nexport const b = 'b';\nexport function readA() { return a; }\n"),
  ]);
  let output = bundle_one(&fs, "/a.js").await;

  let a_stem = module_stem("", "/a.js");
  let b_stem = module_stem("", "/b.js");
  assert_eq!(
    output.content.matches(&format!("const {} =", renamed_identifier(&a_stem, "a"))).count(),
    1
  );
  assert_eq!(
    output.content.matches(&format!("const {} =", renamed_identifier(&b_stem, "b"))).count(),
    1
  );
}

#[tokio::test]
async fn development_mode_wraps_bodies_in_region_markers() {
  let files = [("/main.js", "export const x = 1;\n")];

  let dev = bundle_roots(
    &memory_source(&files),
    &["/main.js"],
    BundlerOptions { development_mode: Some(true), ..BundlerOptions::default() },
  )
  .await
  .into_output()
  .expect("bundling succeeds");
  assert!(dev.content.contains("//#region /main.js"));
  assert!(dev.content.contains("//#endregion"));

  let compact = bundle_one(&memory_source(&files), "/main.js").await;
  assert!(!compact.content.contains("//#region"));
}

#[tokio::test]
async fn anonymous_roots_get_a_synthesized_identity() {
  let fs = memory_source(&[("/lib/x.js", "export const x = 21;\n")]);
  let item =
    InputItem::anonymous(fs.clone(), "import { x } from '/lib/x';\nexport const doubled = x * 2;\n");

  let output = ModuleBundler::new(BundlerOptions::default())
    .bundle(vec![item], CancelToken::new())
    .await
    .expect("not cancelled")
    .into_output()
    .expect("bundling succeeds");

  assert_eq!(output.exports.len(), 1);
  let map = output.exports.values().next().expect("one root");
  let placeholder_stem = module_stem("", &espack::synthesized_root_path(0));
  assert_eq!(map.get("doubled").expect("exported"), &renamed_identifier(&placeholder_stem, "doubled"));
}

#[tokio::test]
async fn duplicate_roots_collapse_to_one_module() {
  let fs = memory_source(&[("/main.js", "export const once = true;\n")]);
  let output = bundle_roots(&fs, &["/main.js", "/main.js"], BundlerOptions::default())
    .await
    .into_output()
    .expect("bundling succeeds");

  assert_eq!(output.exports.len(), 1);
  let stem = module_stem("", "/main.js");
  assert_eq!(output.content.matches(&format!("const {} =", renamed_identifier(&stem, "once"))).count(), 1);
}
