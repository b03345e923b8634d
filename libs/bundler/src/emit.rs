// Copyright 2018-2026 the Esbundle authors. MIT license.

//! Synthesis of the self-contained bundle script: the `require` runtime
//! scaffold, one `require.define` per module and the entry invocation,
//! all wrapped in a single immediately-invoked function.

use std::fmt;
use std::io;

use swc_core::common::sync::Lrc;
use swc_core::common::SourceMap;
use swc_core::common::DUMMY_SP;
use swc_core::ecma::ast::*;

use crate::ast;
use crate::ast::builder;
use crate::ast::EmitOptions;
use crate::graph::ModuleGraph;

/// The finished bundle: a script AST whose single top-level statement
/// is the harness IIFE. Evaluating the script yields the entry module's
/// exports object and reproduces its side effects.
pub struct Bundle {
  program: Script,
  source_map: Lrc<SourceMap>,
}

impl fmt::Debug for Bundle {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Bundle")
      .field("program", &self.program)
      .finish_non_exhaustive()
  }
}

impl Bundle {
  pub fn script(&self) -> &Script {
    &self.program
  }

  /// Prints the bundle to source text.
  pub fn emit(&self) -> io::Result<String> {
    self.emit_with(&EmitOptions::default())
  }

  pub fn emit_with(&self, options: &EmitOptions) -> io::Result<String> {
    ast::emit_script(&self.program, self.source_map.clone(), options)
  }
}

/// Wraps a lowered module graph into the final script.
///
/// ```text
/// (function(global) {
///   "use strict";
///   function require(file, parentModule) { … }
///   require.modules = {};
///   require.cache = {};
///   require.resolve = function(file) { … };
///   require.define = function(file, fn) { … };
///   require.define("1", function(module, exports, __dirname, __filename) { … });
///   …
///   return require("1");
/// }).call(this, this)
/// ```
pub fn emit_bundle(graph: ModuleGraph, source_map: Lrc<SourceMap>) -> Bundle {
  let entry_id = graph.entry().id.clone();

  let mut body = vec![builder::expr_stmt(builder::str("use strict"))];
  body.push(require_decl());
  body.push(require_prop("modules", builder::object(vec![])));
  body.push(require_prop("cache", builder::object(vec![])));
  body.push(require_prop("resolve", resolve_fn()));
  body.push(require_prop("define", define_fn()));

  for record in graph.into_records() {
    let stmts = record
      .module
      .body
      .into_iter()
      .filter_map(|item| match item {
        ModuleItem::Stmt(stmt) => Some(stmt),
        ModuleItem::ModuleDecl(_) => None,
      })
      .collect();
    body.push(builder::expr_stmt(builder::call(
      builder::member(builder::ident_expr("require"), "define"),
      vec![
        builder::str(record.id.as_str()),
        builder::fn_expr(
          &["module", "exports", "__dirname", "__filename"],
          stmts,
        ),
      ],
    )));
  }

  body.push(builder::ret(Some(builder::call(
    builder::ident_expr("require"),
    vec![builder::str(entry_id.as_str())],
  ))));

  let iife = builder::expr_stmt(builder::call(
    builder::member(
      builder::paren(builder::fn_expr(&["global"], body)),
      "call",
    ),
    vec![builder::this(), builder::this()],
  ));

  Bundle {
    program: Script {
      span: DUMMY_SP,
      body: vec![iife],
      shebang: None,
    },
    source_map,
  }
}

/// `require.<name> = value;`
fn require_prop(name: &str, value: Expr) -> Stmt {
  builder::expr_stmt(builder::assign(
    builder::member(builder::ident_expr("require"), name),
    value,
  ))
}

/// `{}.hasOwnProperty.call(owner, key)`: own-property probe that keeps
/// working when a module shadows `hasOwnProperty` on the probed object.
fn has_own(owner: Expr, key: Expr) -> Expr {
  builder::call(
    builder::member(
      builder::member(builder::object(vec![]), "hasOwnProperty"),
      "call",
    ),
    vec![owner, key],
  )
}

fn require_cache() -> Expr {
  builder::member(builder::ident_expr("require"), "cache")
}

fn require_modules() -> Expr {
  builder::member(builder::ident_expr("require"), "modules")
}

/// The `require` function: memoized lookup, module-object creation,
/// cache publication before the body runs (cycle tolerance) and
/// re-publication afterwards (`module.exports` reassignment).
fn require_decl() -> Stmt {
  let file = || builder::ident_expr("file");
  let module = || builder::ident_expr("module$");

  let stmts = vec![
    // if ({}.hasOwnProperty.call(require.cache, file)) return require.cache[file];
    builder::if_stmt(
      has_own(require_cache(), file()),
      builder::ret(Some(builder::computed_member(require_cache(), file()))),
    ),
    // var resolved = require.resolve(file);
    builder::var_stmt(vec![builder::declarator(
      builder::ident("resolved"),
      Some(builder::call(
        builder::member(builder::ident_expr("require"), "resolve"),
        vec![file()],
      )),
    )]),
    // if (!resolved) throw new Error("Failed to resolve module " + file);
    builder::if_stmt(
      builder::not(builder::ident_expr("resolved")),
      builder::throw(builder::new_expr(
        builder::ident_expr("Error"),
        vec![builder::add(
          builder::str("Failed to resolve module "),
          file(),
        )],
      )),
    ),
    // var module$ = { id: file, require: require, filename: file,
    //   exports: {}, loaded: false, parent: parentModule, children: [] };
    builder::var_stmt(vec![builder::declarator(
      builder::ident("module$"),
      Some(builder::object(vec![
        ("id", file()),
        ("require", builder::ident_expr("require")),
        ("filename", file()),
        ("exports", builder::object(vec![])),
        ("loaded", builder::bool(false)),
        ("parent", builder::ident_expr("parentModule")),
        ("children", builder::array(vec![])),
      ])),
    )]),
    // if (parentModule) parentModule.children.push(module$);
    builder::if_stmt(
      builder::ident_expr("parentModule"),
      builder::expr_stmt(builder::call(
        builder::member(
          builder::member(builder::ident_expr("parentModule"), "children"),
          "push",
        ),
        vec![module()],
      )),
    ),
    // var dirname = file.slice(0, file.lastIndexOf("/") + 1);
    builder::var_stmt(vec![builder::declarator(
      builder::ident("dirname"),
      Some(builder::call(
        builder::member(file(), "slice"),
        vec![
          builder::num(0.0),
          builder::add(
            builder::call(
              builder::member(file(), "lastIndexOf"),
              vec![builder::str("/")],
            ),
            builder::num(1.0),
          ),
        ],
      )),
    )]),
    // require.cache[file] = module$.exports;
    builder::expr_stmt(builder::assign(
      builder::computed_member(require_cache(), file()),
      builder::member(module(), "exports"),
    )),
    // resolved.call(undefined, module$, module$.exports, dirname, file);
    // An undefined receiver keeps module top-level `this` undefined.
    builder::expr_stmt(builder::call(
      builder::member(builder::ident_expr("resolved"), "call"),
      vec![
        builder::ident_expr("undefined"),
        module(),
        builder::member(module(), "exports"),
        builder::ident_expr("dirname"),
        file(),
      ],
    )),
    // module$.loaded = true;
    builder::expr_stmt(builder::assign(
      builder::member(module(), "loaded"),
      builder::bool(true),
    )),
    // return require.cache[file] = module$.exports;
    builder::ret(Some(builder::assign(
      builder::computed_member(require_cache(), file()),
      builder::member(module(), "exports"),
    ))),
  ];

  builder::fn_decl("require", &["file", "parentModule"], stmts)
}

/// `require.resolve = function(file) { return {}.hasOwnProperty.call(
/// require.modules, file) ? require.modules[file] : undefined; };`
fn resolve_fn() -> Expr {
  builder::fn_expr(
    &["file"],
    vec![builder::ret(Some(builder::cond(
      has_own(require_modules(), builder::ident_expr("file")),
      builder::computed_member(
        require_modules(),
        builder::ident_expr("file"),
      ),
      builder::ident_expr("undefined"),
    )))],
  )
}

/// `require.define = function(file, fn) { require.modules[file] = fn; };`
fn define_fn() -> Expr {
  builder::fn_expr(
    &["file", "fn"],
    vec![builder::expr_stmt(builder::assign(
      builder::computed_member(
        require_modules(),
        builder::ident_expr("file"),
      ),
      builder::ident_expr("fn"),
    ))],
  )
}
