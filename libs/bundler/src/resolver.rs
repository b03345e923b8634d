// Copyright 2018-2026 the Esbundle authors. MIT license.

//! Specifier resolution and module loading.
//!
//! The bundler core never implements filesystem semantics itself: it
//! asks a [`Resolve`] implementation to canonicalize every specifier it
//! encounters and a [`Load`] implementation for the source text of each
//! canonical location. [`FsResolver`] and [`FsLoader`] are the defaults
//! used by [`bundle`](crate::bundle).

use std::fmt;
use std::fs;
use std::path::Path;

use crate::errors::LoadError;
use crate::errors::ResolveError;

/// Canonical absolute location of a module, as produced by a resolver.
///
/// Equality is string equality; two specifiers denoting the same module
/// must resolve to equal locations. The directory separator is always
/// `/`, regardless of platform.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ModuleLocation(String);

impl ModuleLocation {
  pub fn new(location: impl Into<String>) -> Self {
    Self(location.into())
  }

  /// Canonical location for a filesystem path: absolutized against the
  /// process working directory and normalized without resolving
  /// symlinks.
  pub fn from_path(path: &Path) -> Self {
    let absolute = if path.is_absolute() {
      path.to_path_buf()
    } else {
      match std::env::current_dir() {
        Ok(cwd) => cwd.join(path),
        Err(_) => path.to_path_buf(),
      }
    };
    Self(normalize_path(&absolute))
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }

  /// The directory containing this module: everything up to and
  /// including the final `/`.
  pub fn directory(&self) -> &str {
    match self.0.rfind('/') {
      Some(index) => &self.0[..=index],
      None => "",
    }
  }
}

impl fmt::Display for ModuleLocation {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.pad(&self.0)
  }
}

impl AsRef<str> for ModuleLocation {
  fn as_ref(&self) -> &str {
    &self.0
  }
}

/// Maps a textual specifier plus the directory of the referencing module
/// to a canonical location. Must be deterministic for equal inputs and
/// pure with respect to a snapshot of whatever store backs it.
pub trait Resolve {
  fn resolve(
    &self,
    specifier: &str,
    referrer_dir: &str,
  ) -> Result<ModuleLocation, ResolveError>;
}

/// Produces the source text of the module at a canonical location.
pub trait Load {
  fn load(&self, location: &ModuleLocation) -> Result<String, LoadError>;
}

/// Filesystem-relative resolver. Joins the specifier onto the referrer
/// directory, normalizes `.` and `..` away, and probes the result
/// against the filesystem: the joined path itself, then the path with
/// `.js` appended when the specifier carries no extension. The first
/// existing candidate wins.
#[derive(Debug, Default)]
pub struct FsResolver;

impl Resolve for FsResolver {
  fn resolve(
    &self,
    specifier: &str,
    referrer_dir: &str,
  ) -> Result<ModuleLocation, ResolveError> {
    let joined = Path::new(referrer_dir).join(specifier);
    let normalized = normalize_path(&joined);
    for candidate in candidates(&normalized) {
      log::debug!("resolve probe: {}", candidate);
      if fs::metadata(&candidate).map(|m| m.is_file()).unwrap_or(false) {
        return Ok(ModuleLocation(candidate));
      }
    }
    Err(ResolveError {
      specifier: specifier.to_string(),
      referrer_dir: referrer_dir.to_string(),
    })
  }
}

fn candidates(path: &str) -> Vec<String> {
  let mut out = vec![path.to_string()];
  if Path::new(path).extension().is_none() {
    out.push(format!("{}.js", path));
  }
  out
}

/// Default loader: reads the file at the canonical location.
#[derive(Debug, Default)]
pub struct FsLoader;

impl Load for FsLoader {
  fn load(&self, location: &ModuleLocation) -> Result<String, LoadError> {
    fs::read_to_string(location.as_str()).map_err(|source| LoadError {
      location: location.to_string(),
      source,
    })
  }
}

/// Normalizes `.` and `..` segments textually, producing `/`-separated
/// output. Symlinks are deliberately not resolved, and `..` at the root
/// stays at the root.
fn normalize_path(path: &Path) -> String {
  let raw = path.to_string_lossy().replace('\\', "/");
  let absolute = raw.starts_with('/');
  let mut segments: Vec<&str> = Vec::new();
  for segment in raw.split('/') {
    match segment {
      "" | "." => {}
      ".." => {
        segments.pop();
      }
      _ => segments.push(segment),
    }
  }
  if absolute {
    format!("/{}", segments.join("/"))
  } else {
    segments.join("/")
  }
}
