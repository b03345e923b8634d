// Copyright 2018-2026 the Esbundle authors. MIT license.

//! Core of a JavaScript module bundler.
//!
//! Starting from an entry ECMAScript module, the bundler resolves and
//! loads every statically reachable module, lowers each module's
//! `import`/`export` declarations into plain statements over a
//! synthesized `module`/`exports` pair, and wraps the result into a
//! single self-contained script. Evaluating that script needs no
//! loader, no filesystem and no module host: it carries its own module
//! registry and a `require` runtime, and yields the entry module's
//! exports object.
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let bundle = esbundle::bundle("src/main.js")?;
//! println!("{}", bundle.emit()?);
//! # Ok(())
//! # }
//! ```
//!
//! Resolution and loading are injectable: [`bundle_with`] and
//! [`bundle_source`] accept any [`Resolve`]/[`Load`] pair, which is how
//! non-filesystem module stores are bundled and how the scenarios in
//! the test suite run hermetically.

mod ast;
mod emit;
mod errors;
mod graph;
mod lower;
mod resolver;
mod rewrite;

use std::path::Path;

use swc_core::common::sync::Lrc;
use swc_core::common::SourceMap;

pub use crate::ast::EmitOptions;
pub use crate::emit::Bundle;
pub use crate::errors::BundleError;
pub use crate::errors::LoadError;
pub use crate::errors::ParseDiagnostic;
pub use crate::errors::ResolveError;
pub use crate::resolver::FsLoader;
pub use crate::resolver::FsResolver;
pub use crate::resolver::Load;
pub use crate::resolver::ModuleLocation;
pub use crate::resolver::Resolve;

/// Bundles the module at `entry` with the default filesystem resolver
/// and loader.
pub fn bundle(entry: impl AsRef<Path>) -> Result<Bundle, BundleError> {
  bundle_with(entry, &FsResolver, &FsLoader)
}

/// Bundles the module at `entry`, resolving and loading through the
/// supplied implementations. The entry source itself is obtained from
/// `loader`.
pub fn bundle_with(
  entry: impl AsRef<Path>,
  resolver: &dyn Resolve,
  loader: &dyn Load,
) -> Result<Bundle, BundleError> {
  let location = ModuleLocation::from_path(entry.as_ref());
  let source = loader.load(&location)?;
  bundle_inner(&source, location, resolver, loader)
}

/// Bundles with the entry module's source text supplied directly;
/// `entry` only names its location for resolution and diagnostics.
pub fn bundle_source(
  source: &str,
  entry: impl AsRef<Path>,
  resolver: &dyn Resolve,
  loader: &dyn Load,
) -> Result<Bundle, BundleError> {
  let location = ModuleLocation::from_path(entry.as_ref());
  bundle_inner(source, location, resolver, loader)
}

fn bundle_inner(
  source: &str,
  entry: ModuleLocation,
  resolver: &dyn Resolve,
  loader: &dyn Load,
) -> Result<Bundle, BundleError> {
  let source_map: Lrc<SourceMap> = Default::default();
  let mut graph =
    graph::ModuleGraph::load(entry, source, resolver, loader, &source_map)?;
  graph.rewrite_to_ids();
  for record in graph.records_mut() {
    lower::lower_module(&mut record.module);
  }
  Ok(emit::emit_bundle(graph, source_map))
}
