//! Typed failure conditions.
//!
//! Operations return `anyhow::Result`; the conditions a caller may want to
//! react to are raised as [`VendError`] and recovered with
//! `err.downcast_ref::<VendError>()`.

use crate::golang::SyntaxError;
use crate::package::Package;
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum VendError {
    /// Copy destination is already present and `--force` was not given.
    #[error("destination already exists : {}", .0.display())]
    DestinationExists(PathBuf),

    /// Symlinks, devices, pipes and sockets are never vendored.
    #[error("non regular file : {}", .0.display())]
    IrregularFile(PathBuf),

    /// Reference to a builtin pseudo package such as `C`. Carries the partial
    /// package (import path, standard flag, doc) so callers can still use it.
    #[error("pseudo package : {}", .0.import_path)]
    PseudoPackage(Box<Package>),

    #[error("no buildable Go source files in {}", .0.display())]
    NoGoFiles(PathBuf),

    #[error("cannot find package \"{0}\" in any of the workspace roots")]
    PackageNotFound(String),

    /// Several package clauses in one directory. Soft during discovery.
    #[error("found packages {} in {}", .names.join(", "), .dir.display())]
    MultiplePackages { dir: PathBuf, names: Vec<String> },

    /// Files whose header does not parse. Soft during discovery.
    #[error("invalid Go files in {} : {}", .dir.display(), .files.join(", "))]
    InvalidGoFiles { dir: PathBuf, files: Vec<String> },

    #[error("package has no directory : {0}")]
    NoDirectory(String),

    #[error("package has no import path : {}", .0.display())]
    NoImportPath(PathBuf),

    #[error("{0}")]
    Duplicates(DuplicateReport),

    #[error("standard package specified : {0}")]
    StandardPackage(String),

    #[error("path not located in any workspace root : {}", .0.display())]
    NotInRoot(PathBuf),

    #[error("{child} is not a child package of {parent}")]
    NotChildPackage { parent: String, child: String },

    #[error("cannot move {} into its own subdirectory {}", .src.display(), .dst.display())]
    MoveIntoSelf { src: PathBuf, dst: PathBuf },

    #[error("{}:{line}:{column}: {message}", .path.display())]
    Parse {
        path: PathBuf,
        line: usize,
        column: usize,
        message: String,
    },
}

impl VendError {
    pub fn parse(path: &Path, err: SyntaxError) -> Self {
        VendError::Parse {
            path: path.to_path_buf(),
            line: err.line,
            column: err.column,
            message: err.message,
        }
    }

    /// Conditions that still leave a usable package behind.
    pub fn is_soft(&self) -> bool {
        matches!(
            self,
            VendError::MultiplePackages { .. } | VendError::InvalidGoFiles { .. }
        )
    }
}

/// Package name to every import path that would be vendored under it.
///
/// Only names claimed by more than one import path are collisions; the rest
/// of the map is kept so the report mirrors everything `init` planned.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DuplicateReport(pub BTreeMap<String, Vec<String>>);

impl DuplicateReport {
    pub fn insert(&mut self, name: &str, import_path: &str) {
        let paths = self.0.entry(name.to_string()).or_default();
        if !paths.iter().any(|p| p == import_path) {
            paths.push(import_path.to_string());
        }
    }

    pub fn collisions(&self) -> impl Iterator<Item = (&String, &Vec<String>)> {
        self.0.iter().filter(|(_, paths)| paths.len() > 1)
    }

    pub fn has_collisions(&self) -> bool {
        self.collisions().next().is_some()
    }

    pub fn paths(&self, name: &str) -> Option<&[String]> {
        self.0.get(name).map(Vec::as_slice)
    }
}

impl fmt::Display for DuplicateReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "duplicate package names found :")?;
        for (name, paths) in self.collisions() {
            write!(f, "\n{} found at {}", name, paths.join(", "))?;
        }
        Ok(())
    }
}
