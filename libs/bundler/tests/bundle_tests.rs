// Copyright 2018-2026 the Esbundle authors. MIT license.

//! End-to-end bundling scenarios: fixture modules are written to a
//! temporary directory, bundled through the public API and the emitted
//! script is evaluated on an embedded ECMAScript engine.

use std::path::Path;
use std::path::PathBuf;

use boa_engine::js_string;
use boa_engine::Context;
use boa_engine::JsString;
use boa_engine::JsValue;
use boa_engine::Source;
use esbundle::bundle;
use esbundle::bundle_source;
use esbundle::BundleError;
use esbundle::FsLoader;
use esbundle::FsResolver;
use tempfile::TempDir;

fn write_module(dir: &TempDir, name: &str, source: &str) -> PathBuf {
  let path = dir.path().join(name);
  std::fs::write(&path, source).unwrap();
  path
}

fn eval_entry(entry: &Path) -> (JsValue, Context) {
  let bundle = bundle(entry).unwrap();
  let code = bundle.emit().unwrap();
  eval_code(&code)
}

fn eval_code(code: &str) -> (JsValue, Context) {
  let mut context = Context::default();
  let value = context
    .eval(Source::from_bytes(code))
    .unwrap_or_else(|err| panic!("bundle evaluation failed: {err}\n{code}"));
  (value, context)
}

fn property(value: &JsValue, name: &str, context: &mut Context) -> JsValue {
  value
    .as_object()
    .expect("expected the entry exports object")
    .get(JsString::from(name), context)
    .unwrap()
}

#[test]
fn single_module_default_export() {
  let dir = TempDir::new().unwrap();
  let entry = write_module(&dir, "a.js", "export default 42;\n");
  let (exports, mut context) = eval_entry(&entry);
  let default = property(&exports, "default", &mut context);
  assert_eq!(default.as_number(), Some(42.0));
}

#[test]
fn default_import_across_modules() {
  let dir = TempDir::new().unwrap();
  let entry = write_module(
    &dir,
    "a.js",
    "import x from \"./b\";\nexport default x + 1;\n",
  );
  write_module(&dir, "b.js", "export default 41;\n");
  let (exports, mut context) = eval_entry(&entry);
  let default = property(&exports, "default", &mut context);
  assert_eq!(default.as_number(), Some(42.0));
}

#[test]
fn named_reexport_renames_and_hides_the_original() {
  let dir = TempDir::new().unwrap();
  let entry =
    write_module(&dir, "a.js", "export { y as z } from \"./b\";\n");
  write_module(&dir, "b.js", "export var y = 7;\n");
  let (exports, mut context) = eval_entry(&entry);
  let z = property(&exports, "z", &mut context);
  assert_eq!(z.as_number(), Some(7.0));
  let has_y = exports
    .as_object()
    .unwrap()
    .has_own_property(js_string!("y"), &mut context)
    .unwrap();
  assert!(!has_y);
}

#[test]
fn namespace_import() {
  let dir = TempDir::new().unwrap();
  let entry = write_module(
    &dir,
    "a.js",
    "import * as B from \"./b\";\nexport default B.f();\n",
  );
  write_module(&dir, "b.js", "export function f() { return 9; }\n");
  let (exports, mut context) = eval_entry(&entry);
  let default = property(&exports, "default", &mut context);
  assert_eq!(default.as_number(), Some(9.0));
}

#[test]
fn diamond_dependency_evaluates_once() {
  let dir = TempDir::new().unwrap();
  let entry = write_module(
    &dir,
    "a.js",
    "import b from \"./b\";\nimport c from \"./c\";\nexport default b + c;\n",
  );
  write_module(&dir, "b.js", "import d from \"./d\";\nexport default d;\n");
  write_module(&dir, "c.js", "import d from \"./d\";\nexport default d;\n");
  write_module(
    &dir,
    "d.js",
    "globalThis.tick = (globalThis.tick || 0) + 1;\nexport default 1;\n",
  );
  let (exports, mut context) = eval_entry(&entry);
  let default = property(&exports, "default", &mut context);
  assert_eq!(default.as_number(), Some(2.0));
  let tick = context
    .global_object()
    .get(js_string!("tick"), &mut context)
    .unwrap();
  assert_eq!(tick.as_number(), Some(1.0));
}

#[test]
fn unresolved_specifier_fails_without_a_bundle() {
  let dir = TempDir::new().unwrap();
  let entry =
    write_module(&dir, "a.js", "import x from \"./missing\";\n");
  let err = bundle(&entry).unwrap_err();
  match err {
    BundleError::Resolve(err) => {
      assert_eq!(err.specifier, "./missing");
      assert!(err.referrer_dir.ends_with('/'));
    }
    other => panic!("expected a resolve error, got {:?}", other),
  }
}

#[test]
fn import_cycles_terminate() {
  let dir = TempDir::new().unwrap();
  let entry = write_module(
    &dir,
    "a.js",
    "import \"./b\";\nglobalThis.cycleTicks = (globalThis.cycleTicks || 0) + 1;\nexport default \"a\";\n",
  );
  write_module(&dir, "b.js", "import \"./a\";\nexport default \"b\";\n");
  let (exports, mut context) = eval_entry(&entry);
  let default = property(&exports, "default", &mut context);
  assert_eq!(
    default.as_string().unwrap().to_std_string_escaped(),
    "a"
  );
  // Each cyclic partner's body ran exactly once.
  let ticks = context
    .global_object()
    .get(js_string!("cycleTicks"), &mut context)
    .unwrap();
  assert_eq!(ticks.as_number(), Some(1.0));
}

#[test]
fn export_all_copies_everything_but_default() {
  let dir = TempDir::new().unwrap();
  let entry = write_module(
    &dir,
    "a.js",
    "export * from \"./b\";\nexport default \"entry\";\n",
  );
  write_module(
    &dir,
    "b.js",
    "export var x = 1;\nexport var y = 2;\nexport default \"dep\";\n",
  );
  let (exports, mut context) = eval_entry(&entry);
  assert_eq!(property(&exports, "x", &mut context).as_number(), Some(1.0));
  assert_eq!(property(&exports, "y", &mut context).as_number(), Some(2.0));
  let default = property(&exports, "default", &mut context);
  assert_eq!(
    default.as_string().unwrap().to_std_string_escaped(),
    "entry"
  );
}

#[test]
fn module_top_level_this_is_undefined() {
  let dir = TempDir::new().unwrap();
  let entry = write_module(&dir, "a.js", "export default this;\n");
  let (exports, mut context) = eval_entry(&entry);
  let default = property(&exports, "default", &mut context);
  assert!(default.is_undefined());
}

#[test]
fn side_effect_order_follows_require_chains() {
  let dir = TempDir::new().unwrap();
  let entry = write_module(
    &dir,
    "a.js",
    "import \"./b\";\nglobalThis.order = (globalThis.order || \"\") + \"a\";\nexport default 0;\n",
  );
  write_module(
    &dir,
    "b.js",
    "import \"./c\";\nglobalThis.order = (globalThis.order || \"\") + \"b\";\nexport default 0;\n",
  );
  write_module(
    &dir,
    "c.js",
    "globalThis.order = (globalThis.order || \"\") + \"c\";\nexport default 0;\n",
  );
  let (_, mut context) = eval_entry(&entry);
  let order = context
    .global_object()
    .get(js_string!("order"), &mut context)
    .unwrap();
  assert_eq!(
    order.as_string().unwrap().to_std_string_escaped(),
    "cba"
  );
}

#[test]
fn bundle_source_skips_the_entry_read() {
  let dir = TempDir::new().unwrap();
  write_module(&dir, "b.js", "export default 5;\n");
  // The entry module never exists on disk; only its location matters.
  let entry = dir.path().join("virtual.js");
  let bundle = bundle_source(
    "import x from \"./b\";\nexport default x * 2;\n",
    &entry,
    &FsResolver,
    &FsLoader,
  )
  .unwrap();
  let (exports, mut context) = eval_code(&bundle.emit().unwrap());
  let default = property(&exports, "default", &mut context);
  assert_eq!(default.as_number(), Some(10.0));
}

#[test]
fn repeated_bundling_is_deterministic() {
  let dir = TempDir::new().unwrap();
  let entry = write_module(
    &dir,
    "a.js",
    "import b from \"./b\";\nimport c from \"./c\";\nexport default b + c;\n",
  );
  write_module(&dir, "b.js", "export default 1;\n");
  write_module(&dir, "c.js", "export default 2;\n");
  let first = bundle(&entry).unwrap().emit().unwrap();
  let second = bundle(&entry).unwrap().emit().unwrap();
  assert_eq!(first, second);
}
