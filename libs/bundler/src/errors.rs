// Copyright 2018-2026 the Esbundle authors. MIT license.

use std::fmt;
use std::io;

use thiserror::Error;

/// A diagnostic produced when the ECMAScript parser rejects a source
/// text. `line` is 1-based, `col` is 1-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseDiagnostic {
  pub message: String,
  pub line: usize,
  pub col: usize,
}

impl fmt::Display for ParseDiagnostic {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{} at {}:{}", self.message, self.line, self.col)
  }
}

/// The resolver could not canonicalize a specifier.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Failed to resolve \"{specifier}\" from \"{referrer_dir}\"")]
pub struct ResolveError {
  pub specifier: String,
  pub referrer_dir: String,
}

/// The loader could not produce the source text for a canonical
/// location.
#[derive(Debug, Error)]
#[error("Failed to load \"{location}\"")]
pub struct LoadError {
  pub location: String,
  #[source]
  pub source: io::Error,
}

/// All the ways a bundle call can fail. The first failure encountered
/// while building the module graph aborts the whole call; no partial
/// bundle is ever produced.
#[derive(Debug, Error)]
pub enum BundleError {
  #[error("Failed to parse \"{location}\": {diagnostic}")]
  Parse {
    location: String,
    diagnostic: ParseDiagnostic,
  },
  #[error(transparent)]
  Load(#[from] LoadError),
  #[error(transparent)]
  Resolve(#[from] ResolveError),
}
