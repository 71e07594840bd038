//! Workspace context and per-invocation options.
//!
//! A [`Context`] is built once in `main` from `GOROOT`/`GOPATH` and handed to
//! every operation. Tests construct one directly over a temporary tree.

use anyhow::{Context as _, Result};
use std::env;
use std::path::{Component, Path, PathBuf};

/// Fallback standard library root when `GOROOT` is unset.
pub const DEFAULT_GOROOT: &str = "/usr/local/go";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Context {
    /// Standard library root. Packages live under `<goroot>/src`.
    pub goroot: PathBuf,
    /// Workspace roots, searched in order. Packages live under `<root>/src`.
    pub gopath: Vec<PathBuf>,
    /// Directory relative paths are resolved against.
    pub cwd: PathBuf,
}

impl Context {
    pub fn new(goroot: impl Into<PathBuf>, gopath: Vec<PathBuf>, cwd: impl Into<PathBuf>) -> Self {
        let cwd = cwd.into();
        Self {
            goroot: absolutize(&cwd, &goroot.into()),
            gopath: gopath.iter().map(|p| absolutize(&cwd, p)).collect(),
            cwd: clean(&cwd),
        }
    }

    /// Reads `GOROOT` and `GOPATH` from the environment, defaulting to
    /// `/usr/local/go` and `~/go`.
    pub fn from_env() -> Result<Self> {
        let cwd = env::current_dir().context("Failed to read current directory")?;

        let goroot = match env::var_os("GOROOT") {
            Some(root) if !root.is_empty() => PathBuf::from(root),
            _ => PathBuf::from(DEFAULT_GOROOT),
        };

        let mut gopath: Vec<PathBuf> = match env::var_os("GOPATH") {
            Some(paths) => env::split_paths(&paths)
                .filter(|p| !p.as_os_str().is_empty())
                .collect(),
            None => Vec::new(),
        };
        if gopath.is_empty() {
            let home = dirs::home_dir().context("Could not find home directory")?;
            gopath.push(home.join("go"));
        }

        log::debug!("GOROOT={} GOPATH={:?}", goroot.display(), gopath);
        Ok(Self::new(goroot, gopath, cwd))
    }

    /// Same roots, different working directory.
    pub fn with_cwd(&self, cwd: impl AsRef<Path>) -> Self {
        Self {
            goroot: self.goroot.clone(),
            gopath: self.gopath.clone(),
            cwd: absolutize(&self.cwd, cwd.as_ref()),
        }
    }

    /// Resolves `path` against the working directory.
    pub fn abs(&self, path: impl AsRef<Path>) -> PathBuf {
        absolutize(&self.cwd, path.as_ref())
    }

    /// Every `src` directory packages are resolved under, standard library
    /// first, paired with whether packages found there are standard.
    pub fn src_roots(&self) -> Vec<(PathBuf, bool)> {
        std::iter::once((self.goroot.join("src"), true))
            .chain(self.gopath.iter().map(|p| (p.join("src"), false)))
            .collect()
    }
}

/// `path` joined onto `base` when relative, then lexically cleaned.
pub fn absolutize(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        clean(path)
    } else {
        clean(&base.join(path))
    }
}

/// Removes `.` components and folds `..` into its parent without touching
/// the filesystem.
pub fn clean(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() && !out.has_root() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    if out.as_os_str().is_empty() {
        out.push(".");
    }
    out
}

/// Flags shared by the mutating subcommands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Options {
    /// Print every copied file and every rewritten import.
    pub verbose: bool,
    /// Replace an existing destination.
    pub force: bool,
    /// Rewrite references in every package below the working directory.
    pub recurse: bool,
    /// Copy files and directories whose names start with a dot.
    pub hidden: bool,
}

/// Flags for `list` and `info`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListOptions {
    /// Import paths only.
    pub quiet: bool,
    pub verbose: bool,
    pub recurse: bool,
    /// Include test and external test imports.
    pub tests: bool,
    pub omit_standard: bool,
    pub omit_child: bool,
}
