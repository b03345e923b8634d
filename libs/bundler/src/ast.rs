// Copyright 2018-2026 the Esbundle authors. MIT license.

//! Boundary to the external ECMAScript parser and printer (swc).

pub mod builder;

use std::io;

use swc_core::common::sync::Lrc;
use swc_core::common::FileName;
use swc_core::common::SourceMap;
use swc_core::common::Spanned;
use swc_core::ecma::ast::EsVersion;
use swc_core::ecma::ast::Module;
use swc_core::ecma::ast::Script;
use swc_core::ecma::codegen::text_writer::JsWriter;
use swc_core::ecma::codegen::Config as CodegenConfig;
use swc_core::ecma::codegen::Emitter;
use swc_core::ecma::codegen::Node;
use swc_core::ecma::parser::error::Error as SwcError;
use swc_core::ecma::parser::lexer::Lexer;
use swc_core::ecma::parser::Parser;
use swc_core::ecma::parser::StringInput;
use swc_core::ecma::parser::Syntax;

use crate::errors::BundleError;
use crate::errors::ParseDiagnostic;
use crate::resolver::ModuleLocation;

/// Parses one module's source text. Every module of a bundle is parsed
/// into the same shared [`SourceMap`] so that diagnostics and the final
/// printing step see consistent positions.
pub fn parse_module(
  source_map: &Lrc<SourceMap>,
  location: &ModuleLocation,
  source: &str,
) -> Result<Module, BundleError> {
  let source_file = source_map
    .new_source_file(FileName::Custom(location.to_string()), source.to_string());
  let lexer = Lexer::new(
    Syntax::Es(Default::default()),
    EsVersion::latest(),
    StringInput::from(&*source_file),
    None,
  );
  let mut parser = Parser::new_from(lexer);
  let module = parser
    .parse_module()
    .map_err(|err| parse_error(source_map, location, err))?;
  // The parser recovers from some syntax errors; a module that needed
  // recovery is still a rejected module for bundling purposes.
  if let Some(err) = parser.take_errors().into_iter().next() {
    return Err(parse_error(source_map, location, err));
  }
  Ok(module)
}

fn parse_error(
  source_map: &Lrc<SourceMap>,
  location: &ModuleLocation,
  err: SwcError,
) -> BundleError {
  let loc = source_map.lookup_char_pos(err.span().lo);
  BundleError::Parse {
    location: location.to_string(),
    diagnostic: ParseDiagnostic {
      message: err.kind().msg().to_string(),
      line: loc.line,
      col: loc.col_display + 1,
    },
  }
}

/// Options adjusting how the bundled script is printed.
#[derive(Debug, Clone, Default)]
pub struct EmitOptions {
  /// Print without insignificant whitespace.
  pub minify: bool,
}

/// Prints a script AST back to source text.
pub fn emit_script(
  script: &Script,
  source_map: Lrc<SourceMap>,
  options: &EmitOptions,
) -> io::Result<String> {
  let mut buf = Vec::new();
  {
    let mut cfg = CodegenConfig::default();
    cfg.minify = options.minify;
    let writer = JsWriter::new(source_map.clone(), "\n", &mut buf, None);
    let mut emitter = Emitter {
      cfg,
      comments: None,
      cm: source_map,
      wr: writer,
    };
    script.emit_with(&mut emitter)?;
  }
  String::from_utf8(buf)
    .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))
}

#[cfg(test)]
mod tests {
  use swc_core::common::DUMMY_SP;
  use swc_core::ecma::ast::Stmt;

  use super::builder;
  use super::*;

  fn parse(source: &str) -> Result<Module, BundleError> {
    let source_map: Lrc<SourceMap> = Default::default();
    parse_module(&source_map, &ModuleLocation::new("/test.js"), source)
  }

  #[test]
  fn parses_module_with_imports() {
    let module = parse("import x from \"./b\";\nexport default x;\n").unwrap();
    assert_eq!(module.body.len(), 2);
  }

  #[test]
  fn rejected_source_reports_position() {
    let err = parse("let x = ;\n").unwrap_err();
    match err {
      BundleError::Parse {
        location,
        diagnostic,
      } => {
        assert_eq!(location, "/test.js");
        assert_eq!(diagnostic.line, 1);
        assert!(diagnostic.col > 1);
        assert!(!diagnostic.message.is_empty());
      }
      other => panic!("expected parse error, got {:?}", other),
    }
  }

  #[test]
  fn emits_script_text() {
    let script = Script {
      span: DUMMY_SP,
      body: vec![builder::expr_stmt(builder::str("hello"))],
      shebang: None,
    };
    let source_map: Lrc<SourceMap> = Default::default();
    let printed =
      emit_script(&script, source_map, &EmitOptions::default()).unwrap();
    assert_eq!(printed.trim(), "\"hello\";");
  }

  #[test]
  fn minified_output_is_denser() {
    let script = Script {
      span: DUMMY_SP,
      body: vec![Stmt::Expr(swc_core::ecma::ast::ExprStmt {
        span: DUMMY_SP,
        expr: Box::new(builder::call(
          builder::ident_expr("f"),
          vec![builder::num(1.0), builder::num(2.0)],
        )),
      })],
      shebang: None,
    };
    let source_map: Lrc<SourceMap> = Default::default();
    let pretty =
      emit_script(&script, source_map.clone(), &EmitOptions { minify: false })
        .unwrap();
    let minified =
      emit_script(&script, source_map, &EmitOptions { minify: true }).unwrap();
    assert!(minified.len() <= pretty.len());
  }
}
