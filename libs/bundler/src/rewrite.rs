// Copyright 2018-2026 the Esbundle authors. MIT license.

//! In-place rewriting of the module specifier carried by `import … from`,
//! `export … from` and `export * from` items. Used twice per bundle:
//! once to canonicalize specifiers to absolute locations and once to
//! replace those locations with short module ids.

use swc_core::ecma::ast::ExportAll;
use swc_core::ecma::ast::ImportDecl;
use swc_core::ecma::ast::Module;
use swc_core::ecma::ast::NamedExport;
use swc_core::ecma::ast::Str;
use swc_core::ecma::visit::noop_visit_mut_type;
use swc_core::ecma::visit::VisitMut;
use swc_core::ecma::visit::VisitMutWith;

struct SpecifierRewriter<F>
where
  F: FnMut(&str) -> Option<String>,
{
  rename: F,
}

impl<F> SpecifierRewriter<F>
where
  F: FnMut(&str) -> Option<String>,
{
  fn rewrite(&mut self, src: &mut Str) {
    if let Some(renamed) = (self.rename)(&src.value) {
      src.value = renamed.into();
      src.raw = None;
    }
  }
}

impl<F> VisitMut for SpecifierRewriter<F>
where
  F: FnMut(&str) -> Option<String>,
{
  noop_visit_mut_type!();

  fn visit_mut_import_decl(&mut self, node: &mut ImportDecl) {
    self.rewrite(&mut node.src);
  }

  fn visit_mut_named_export(&mut self, node: &mut NamedExport) {
    if let Some(src) = &mut node.src {
      self.rewrite(src);
    }
  }

  fn visit_mut_export_all(&mut self, node: &mut ExportAll) {
    self.rewrite(&mut node.src);
  }
}

/// Replaces every module specifier in `module` with `rename(specifier)`.
/// A `None` from `rename` leaves the specifier untouched, which lets a
/// fallible caller latch its first error and stop renaming. No other
/// part of the tree is modified.
pub fn rewrite_specifiers<F>(module: &mut Module, rename: F)
where
  F: FnMut(&str) -> Option<String>,
{
  let mut rewriter = SpecifierRewriter { rename };
  module.visit_mut_with(&mut rewriter);
}
