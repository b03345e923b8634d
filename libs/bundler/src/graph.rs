// Copyright 2018-2026 the Esbundle authors. MIT license.

//! Module graph construction: breadth-first loading of every statically
//! reachable module, specifier canonicalization and module-id
//! assignment.

use std::collections::VecDeque;
use std::fmt;

use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use swc_core::common::sync::Lrc;
use swc_core::common::SourceMap;
use swc_core::ecma::ast::Module;
use swc_core::ecma::ast::ModuleDecl;
use swc_core::ecma::ast::ModuleItem;

use crate::ast;
use crate::errors::BundleError;
use crate::resolver::Load;
use crate::resolver::ModuleLocation;
use crate::resolver::Resolve;
use crate::rewrite::rewrite_specifiers;

/// Short opaque identifier under which a module is registered inside
/// the emitted bundle. Ids are decimal strings starting at `"1"`,
/// assigned in graph discovery order, so the entry module is always
/// `"1"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ModuleId(String);

impl ModuleId {
  fn nth(position: usize) -> Self {
    Self((position + 1).to_string())
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl fmt::Display for ModuleId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.pad(&self.0)
  }
}

/// A reached module: its canonical location, its bundle id and its
/// progressively rewritten AST.
#[derive(Debug)]
pub struct ModuleRecord {
  pub location: ModuleLocation,
  pub id: ModuleId,
  pub module: Module,
}

/// Map of every statically reachable module, keyed by canonical
/// location. Iteration order is discovery order (entry first, then
/// breadth-first), which fixes id assignment and emission order.
#[derive(Debug)]
pub struct ModuleGraph {
  modules: IndexMap<ModuleLocation, ModuleRecord>,
}

impl ModuleGraph {
  /// Builds the graph rooted at `entry`, whose source text is supplied
  /// by the caller. Every discovered module is parsed and has its
  /// specifiers canonicalized before its own dependencies are walked,
  /// so the first resolve, load or parse failure in breadth-first order
  /// aborts the build.
  pub fn load(
    entry: ModuleLocation,
    entry_source: &str,
    resolver: &dyn Resolve,
    loader: &dyn Load,
    source_map: &Lrc<SourceMap>,
  ) -> Result<Self, BundleError> {
    log::debug!("building module graph from {}", entry);
    let mut modules = IndexMap::new();
    let mut queue = VecDeque::new();

    let module = parse_and_resolve(source_map, &entry, entry_source, resolver)?;
    insert(&mut modules, entry.clone(), module);
    queue.push_back(entry);

    while let Some(location) = queue.pop_front() {
      for specifier in direct_dependencies(&modules[&location].module) {
        let dep = ModuleLocation::new(specifier);
        if modules.contains_key(&dep) {
          continue;
        }
        log::debug!("discovered module {}", dep);
        let source = loader.load(&dep)?;
        let module = parse_and_resolve(source_map, &dep, &source, resolver)?;
        insert(&mut modules, dep.clone(), module);
        queue.push_back(dep);
      }
    }

    log::debug!("module graph complete: {} module(s)", modules.len());
    Ok(Self { modules })
  }

  /// Replaces every canonical-location specifier in every module with
  /// the id of the module it names. After this pass the ASTs no longer
  /// mention absolute locations.
  pub fn rewrite_to_ids(&mut self) {
    let ids: FxHashMap<String, String> = self
      .modules
      .values()
      .map(|record| (record.location.to_string(), record.id.to_string()))
      .collect();
    for record in self.modules.values_mut() {
      rewrite_specifiers(&mut record.module, |specifier| {
        ids.get(specifier).cloned()
      });
    }
  }

  /// The entry module's record. The graph always contains the entry;
  /// it is the first insertion.
  pub fn entry(&self) -> &ModuleRecord {
    let (_, record) = self
      .modules
      .first()
      .expect("graph contains at least the entry");
    record
  }

  pub fn len(&self) -> usize {
    self.modules.len()
  }

  pub fn is_empty(&self) -> bool {
    self.modules.is_empty()
  }

  pub fn get(&self, location: &ModuleLocation) -> Option<&ModuleRecord> {
    self.modules.get(location)
  }

  pub fn records(&self) -> impl Iterator<Item = &ModuleRecord> {
    self.modules.values()
  }

  pub fn records_mut(&mut self) -> impl Iterator<Item = &mut ModuleRecord> {
    self.modules.values_mut()
  }

  pub fn into_records(self) -> impl Iterator<Item = ModuleRecord> {
    self.modules.into_values()
  }
}

fn insert(
  modules: &mut IndexMap<ModuleLocation, ModuleRecord>,
  location: ModuleLocation,
  module: Module,
) {
  let record = ModuleRecord {
    id: ModuleId::nth(modules.len()),
    location: location.clone(),
    module,
  };
  modules.insert(location, record);
}

/// Parses a module and canonicalizes its specifiers against its own
/// directory.
fn parse_and_resolve(
  source_map: &Lrc<SourceMap>,
  location: &ModuleLocation,
  source: &str,
  resolver: &dyn Resolve,
) -> Result<Module, BundleError> {
  let mut module = ast::parse_module(source_map, location, source)?;
  resolve_pass(&mut module, location.directory(), resolver)?;
  Ok(module)
}

/// Rewrites every specifier in `module` to the canonical location the
/// resolver maps it to. The first resolution failure, in source order,
/// fails the whole pass.
fn resolve_pass(
  module: &mut Module,
  referrer_dir: &str,
  resolver: &dyn Resolve,
) -> Result<(), BundleError> {
  let mut first_error = None;
  rewrite_specifiers(module, |specifier| {
    if first_error.is_some() {
      return None;
    }
    match resolver.resolve(specifier, referrer_dir) {
      Ok(location) => Some(location.to_string()),
      Err(err) => {
        first_error = Some(err);
        None
      }
    }
  });
  match first_error {
    Some(err) => Err(err.into()),
    None => Ok(()),
  }
}

/// The specifiers of a module's top-level static module references, in
/// source order: `import … from`, `import "x"`, `export … from` and
/// `export * from`. A plain `export { x }` references no module.
pub fn direct_dependencies(module: &Module) -> Vec<String> {
  let mut specifiers = Vec::new();
  for item in &module.body {
    if let ModuleItem::ModuleDecl(decl) = item {
      match decl {
        ModuleDecl::Import(import) => {
          specifiers.push(import.src.value.to_string());
        }
        ModuleDecl::ExportNamed(export) => {
          if let Some(src) = &export.src {
            specifiers.push(src.value.to_string());
          }
        }
        ModuleDecl::ExportAll(export) => {
          specifiers.push(export.src.value.to_string());
        }
        _ => {}
      }
    }
  }
  specifiers
}
