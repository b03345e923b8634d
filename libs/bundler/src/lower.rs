// Copyright 2018-2026 the Esbundle authors. MIT license.

//! Lowering of `import`/`export` declarations into plain statements
//! over the ambient `module`, `exports` and `require` bindings, so that
//! a module body can run as an ordinary function.
//!
//! Exported values are snapshots taken at export time: the live-binding
//! aspect of ES modules is not preserved. A module that reassigns a
//! module-level `let` after exporting it will not propagate the new
//! value to its importers.

use swc_core::ecma::ast::*;

use crate::ast::builder;

/// Rewrites `module.body` in place. Afterwards the body consists solely
/// of `ModuleItem::Stmt` items: a leading directive prologue, then the
/// statements lowered from `import` declarations, then everything else
/// in source order.
pub fn lower_module(module: &mut Module) {
  let items = std::mem::take(&mut module.body);
  let mut directives = Vec::new();
  let mut hoisted = Vec::new();
  let mut body = Vec::new();

  let mut items = items.into_iter().peekable();
  while let Some(item) = items.peek() {
    if is_directive(item) {
      match items.next() {
        Some(ModuleItem::Stmt(stmt)) => directives.push(stmt),
        _ => break,
      }
    } else {
      break;
    }
  }

  for item in items {
    match item {
      ModuleItem::Stmt(stmt) => body.push(stmt),
      ModuleItem::ModuleDecl(decl) => match decl {
        ModuleDecl::Import(import) => hoisted.push(lower_import(import)),
        ModuleDecl::ExportDecl(export) => lower_export_decl(export, &mut body),
        ModuleDecl::ExportNamed(export) => {
          lower_named_export(export, &mut body)
        }
        ModuleDecl::ExportDefaultDecl(export) => {
          lower_default_decl(export, &mut body)
        }
        ModuleDecl::ExportDefaultExpr(export) => {
          body.push(publish("default", *export.expr));
        }
        ModuleDecl::ExportAll(export) => body.push(lower_export_all(export)),
        // TypeScript-only module forms cannot come out of the ES parser
        // configuration.
        _ => {}
      },
    }
  }

  module.body = directives
    .into_iter()
    .chain(hoisted)
    .chain(body)
    .map(ModuleItem::Stmt)
    .collect();
}

fn is_directive(item: &ModuleItem) -> bool {
  matches!(
    item,
    ModuleItem::Stmt(Stmt::Expr(ExprStmt { expr, .. }))
      if matches!(&**expr, Expr::Lit(Lit::Str(_)))
  )
}

/// `require("<id>", module)`: the exports object of the referenced
/// module.
fn require_call(src: &Str) -> Expr {
  builder::call(
    builder::ident_expr("require"),
    vec![builder::str(&src.value), builder::ident_expr("module")],
  )
}

/// `exports.<name> = value;`
fn publish(name: &str, value: Expr) -> Stmt {
  builder::expr_stmt(builder::assign(
    builder::member(builder::ident_expr("exports"), name),
    value,
  ))
}

/// `exports.<name> = value;` where the export name may be an arbitrary
/// string.
fn publish_name(name: &ModuleExportName, value: Expr) -> Stmt {
  builder::expr_stmt(builder::assign(
    named_member(builder::ident_expr("exports"), name),
    value,
  ))
}

/// Member access for a name that is either an identifier or a string
/// literal (`export { x as "a-b" }`).
fn named_member(obj: Expr, name: &ModuleExportName) -> Expr {
  match name {
    ModuleExportName::Ident(ident) => builder::member(obj, &ident.sym),
    ModuleExportName::Str(name) => {
      builder::computed_member(obj, builder::str(&name.value))
    }
  }
}

fn lower_import(import: ImportDecl) -> Stmt {
  if import.specifiers.is_empty() {
    // Bare side-effect import.
    return builder::expr_stmt(require_call(&import.src));
  }
  let decls = import
    .specifiers
    .into_iter()
    .map(|specifier| match specifier {
      ImportSpecifier::Default(specifier) => builder::declarator(
        specifier.local,
        Some(builder::member(require_call(&import.src), "default")),
      ),
      ImportSpecifier::Named(specifier) => {
        let init = match &specifier.imported {
          Some(imported) => named_member(require_call(&import.src), imported),
          None => {
            builder::member(require_call(&import.src), &specifier.local.sym)
          }
        };
        builder::declarator(specifier.local, Some(init))
      }
      ImportSpecifier::Namespace(specifier) => {
        builder::declarator(specifier.local, Some(require_call(&import.src)))
      }
    })
    .collect();
  builder::var_stmt(decls)
}

fn lower_export_decl(export: ExportDecl, body: &mut Vec<Stmt>) {
  let mut names = Vec::new();
  match &export.decl {
    Decl::Class(class) => names.push(class.ident.clone()),
    Decl::Fn(function) => names.push(function.ident.clone()),
    Decl::Var(var) => {
      for decl in &var.decls {
        collect_pat_idents(&decl.name, &mut names);
      }
    }
    _ => {}
  }
  body.push(Stmt::Decl(export.decl));
  for name in names {
    let key = name.sym.to_string();
    body.push(publish(&key, Expr::Ident(name)));
  }
}

fn lower_named_export(export: NamedExport, body: &mut Vec<Stmt>) {
  match export.src {
    Some(src) => {
      for specifier in export.specifiers {
        match specifier {
          ExportSpecifier::Named(specifier) => {
            let exported =
              specifier.exported.unwrap_or_else(|| specifier.orig.clone());
            body.push(publish_name(
              &exported,
              named_member(require_call(&src), &specifier.orig),
            ));
          }
          ExportSpecifier::Namespace(specifier) => {
            body.push(publish_name(&specifier.name, require_call(&src)));
          }
          ExportSpecifier::Default(specifier) => {
            let key = specifier.exported.sym.to_string();
            body.push(publish(
              &key,
              builder::member(require_call(&src), "default"),
            ));
          }
        }
      }
    }
    None => {
      for specifier in export.specifiers {
        if let ExportSpecifier::Named(specifier) = specifier {
          let exported =
            specifier.exported.unwrap_or_else(|| specifier.orig.clone());
          if let ModuleExportName::Ident(orig) = specifier.orig {
            body.push(publish_name(&exported, Expr::Ident(orig)));
          }
        }
      }
    }
  }
}

fn lower_default_decl(export: ExportDefaultDecl, body: &mut Vec<Stmt>) {
  match export.decl {
    DefaultDecl::Fn(function) => match function.ident.clone() {
      // Keep named defaults as declarations so the local name stays
      // bound for recursion.
      Some(ident) => {
        body.push(Stmt::Decl(Decl::Fn(FnDecl {
          ident: ident.clone(),
          declare: false,
          function: function.function,
        })));
        body.push(publish("default", Expr::Ident(ident)));
      }
      None => body.push(publish("default", Expr::Fn(function))),
    },
    DefaultDecl::Class(class) => match class.ident.clone() {
      Some(ident) => {
        body.push(Stmt::Decl(Decl::Class(ClassDecl {
          ident: ident.clone(),
          declare: false,
          class: class.class,
        })));
        body.push(publish("default", Expr::Ident(ident)));
      }
      None => body.push(publish("default", Expr::Class(class))),
    },
    DefaultDecl::TsInterfaceDecl(_) => {}
  }
}

/// `export * from "<id>"`: copy every own enumerable key except
/// `default` at evaluation time, without introducing any module-scope
/// binding.
///
/// ```text
/// Object.keys(require("<id>", module)).forEach(function (key) {
///   if (key !== "default") exports[key] = require("<id>", module)[key];
/// });
/// ```
fn lower_export_all(export: ExportAll) -> Stmt {
  let copy_one = builder::if_stmt(
    builder::strict_not_eq(
      builder::ident_expr("key"),
      builder::str("default"),
    ),
    builder::expr_stmt(builder::assign(
      builder::computed_member(
        builder::ident_expr("exports"),
        builder::ident_expr("key"),
      ),
      builder::computed_member(
        require_call(&export.src),
        builder::ident_expr("key"),
      ),
    )),
  );
  builder::expr_stmt(builder::call(
    builder::member(
      builder::call(
        builder::member(builder::ident_expr("Object"), "keys"),
        vec![require_call(&export.src)],
      ),
      "forEach",
    ),
    vec![builder::fn_expr(&["key"], vec![copy_one])],
  ))
}

/// Names bound by a declarator pattern, recursing through array and
/// object destructuring.
fn collect_pat_idents(pat: &Pat, names: &mut Vec<Ident>) {
  match pat {
    Pat::Ident(ident) => names.push(ident.id.clone()),
    Pat::Array(array) => {
      for pat in array.elems.iter().flatten() {
        collect_pat_idents(pat, names);
      }
    }
    Pat::Rest(rest) => collect_pat_idents(&rest.arg, names),
    Pat::Object(object) => {
      for prop in &object.props {
        match prop {
          ObjectPatProp::Assign(assign) => names.push(assign.key.clone()),
          ObjectPatProp::KeyValue(key_value) => {
            collect_pat_idents(&key_value.value, names)
          }
          ObjectPatProp::Rest(rest) => collect_pat_idents(&rest.arg, names),
        }
      }
    }
    Pat::Assign(assign) => collect_pat_idents(&assign.left, names),
    // Expressions and invalid patterns introduce no bindings.
    _ => {}
  }
}

#[cfg(test)]
mod tests {
  use swc_core::common::sync::Lrc;
  use swc_core::common::SourceMap;
  use swc_core::common::DUMMY_SP;

  use super::*;
  use crate::ast;
  use crate::ast::EmitOptions;
  use crate::resolver::ModuleLocation;

  /// Parses, lowers and prints a module body for string-level
  /// assertions.
  fn lowered(source: &str) -> String {
    let source_map: Lrc<SourceMap> = Default::default();
    let mut module = ast::parse_module(
      &source_map,
      &ModuleLocation::new("/test.js"),
      source,
    )
    .unwrap();
    lower_module(&mut module);
    let body = module
      .body
      .iter()
      .map(|item| match item {
        ModuleItem::Stmt(stmt) => stmt.clone(),
        ModuleItem::ModuleDecl(decl) => {
          panic!("module declaration survived lowering: {:?}", decl)
        }
      })
      .collect();
    let script = Script {
      span: DUMMY_SP,
      body,
      shebang: None,
    };
    ast::emit_script(&script, source_map, &EmitOptions::default()).unwrap()
  }

  #[test]
  fn default_import() {
    let out = lowered("import x from \"1\";");
    assert!(out.contains("var x = require(\"1\", module).default;"));
  }

  #[test]
  fn named_imports_share_one_declaration() {
    let out = lowered("import { a, b as c } from \"1\";");
    assert!(out.contains(
      "var a = require(\"1\", module).a, c = require(\"1\", module).b;"
    ));
  }

  #[test]
  fn namespace_import() {
    let out = lowered("import * as ns from \"1\";");
    assert!(out.contains("var ns = require(\"1\", module);"));
  }

  #[test]
  fn bare_import_keeps_the_side_effect() {
    let out = lowered("import \"1\";");
    assert!(out.contains("require(\"1\", module);"));
  }

  #[test]
  fn default_export_expression() {
    let out = lowered("export default 40 + 2;");
    assert!(out.contains("exports.default = 40 + 2;"));
  }

  #[test]
  fn named_default_function_stays_callable() {
    let out = lowered("export default function f() { return f; }");
    assert!(out.contains("function f() {"));
    assert!(out.contains("exports.default = f;"));
  }

  #[test]
  fn anonymous_default_function_becomes_an_expression() {
    let out = lowered("export default function () { return 1; }");
    assert!(out.contains("exports.default = function() {"));
  }

  #[test]
  fn exported_var_declaration() {
    let out = lowered("export var y = 7;");
    assert!(out.contains("var y = 7;"));
    assert!(out.contains("exports.y = y;"));
  }

  #[test]
  fn exported_destructuring_publishes_every_binding() {
    let out = lowered("export const { a, b: c, ...rest } = obj;");
    assert!(out.contains("exports.a = a;"));
    assert!(out.contains("exports.c = c;"));
    assert!(out.contains("exports.rest = rest;"));
  }

  #[test]
  fn exported_function_declaration() {
    let out = lowered("export function f() { return 9; }");
    assert!(out.contains("function f() {"));
    assert!(out.contains("exports.f = f;"));
  }

  #[test]
  fn local_named_export_with_rename() {
    let out = lowered("var a = 1, b = 2;\nexport { a, b as c };");
    assert!(out.contains("exports.a = a;"));
    assert!(out.contains("exports.c = b;"));
  }

  #[test]
  fn named_reexport() {
    let out = lowered("export { y as z } from \"1\";");
    assert!(out.contains("exports.z = require(\"1\", module).y;"));
  }

  #[test]
  fn default_reexport() {
    let out = lowered("export { default as d } from \"1\";");
    assert!(out.contains("exports.d = require(\"1\", module).default;"));
  }

  #[test]
  fn namespace_reexport() {
    let out = lowered("export * as ns from \"1\";");
    assert!(out.contains("exports.ns = require(\"1\", module);"));
  }

  #[test]
  fn string_export_name_uses_computed_access() {
    let out = lowered("var x = 1;\nexport { x as \"a-b\" };");
    assert!(out.contains("exports[\"a-b\"] = x;"));
  }

  #[test]
  fn export_all_filters_default() {
    let out = lowered("export * from \"1\";");
    assert!(out.contains("Object.keys(require(\"1\", module)).forEach"));
    assert!(out.contains("key !== \"default\""));
    assert!(out.contains("exports[key] = require(\"1\", module)[key];"));
  }

  #[test]
  fn imports_are_hoisted_above_other_statements() {
    let out = lowered("var first = 1;\nimport x from \"1\";");
    let import_at = out.find("var x = require").unwrap();
    let stmt_at = out.find("var first").unwrap();
    assert!(import_at < stmt_at);
  }

  #[test]
  fn directives_stay_first() {
    let out = lowered("\"use strict\";\nimport x from \"1\";\nvar y = x;");
    assert!(out.trim_start().starts_with("\"use strict\";"));
    let directive_at = out.find("\"use strict\"").unwrap();
    let import_at = out.find("var x = require").unwrap();
    assert!(directive_at < import_at);
  }

  #[test]
  fn no_module_declarations_survive() {
    // `lowered` panics if any module declaration remains.
    let _ = lowered(
      "import a from \"1\";\n\
       import * as b from \"2\";\n\
       import \"3\";\n\
       export { c } from \"4\";\n\
       export * from \"5\";\n\
       export default a;\n\
       export var d = 1;\n",
    );
  }
}
