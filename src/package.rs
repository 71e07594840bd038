//! Package resolution.
//!
//! Maps directories and import paths to [`Package`] metadata by reading the
//! package clause and imports of every Go file in a directory. Build
//! constraints are ignored: every file counts, so vendoring sees the imports
//! of all platforms at once.

use crate::context::Context;
use crate::error::VendError;
use crate::golang::ast::{is_valid_import_path, parse_header, synopsis};
use anyhow::{Context as _, Result};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Component, Path, PathBuf};

/// Import path of the cgo pseudo package.
pub const PSEUDO_C: &str = "C";

const PSEUDO_C_DOC: &str = "Package C is a pseudo package that enables calls to C code via cgo.";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Package {
    pub import_path: String,
    /// Absolute directory. Empty for pseudo packages.
    pub dir: PathBuf,
    pub name: String,
    /// Synopsis of the package comment.
    pub doc: String,
    /// Lives under GOROOT, or is a pseudo package.
    pub standard: bool,
    pub go_files: Vec<String>,
    pub test_go_files: Vec<String>,
    pub xtest_go_files: Vec<String>,
    pub imports: Vec<String>,
    pub test_imports: Vec<String>,
    pub xtest_imports: Vec<String>,
    pub all_tags: Vec<String>,
    /// Files whose package clause or imports do not parse. Their imports are
    /// unknown.
    pub invalid_go_files: Vec<String>,
    /// Every package name found when the files disagree, in file order.
    pub conflicting_names: Vec<String>,
}

impl Package {
    fn pseudo(import_path: &str) -> Self {
        Self {
            import_path: import_path.to_string(),
            standard: true,
            doc: PSEUDO_C_DOC.to_string(),
            ..Self::default()
        }
    }

    pub fn is_pseudo(&self) -> bool {
        self.dir.as_os_str().is_empty() && self.import_path == PSEUDO_C
    }

    /// Imports, plus test and external test imports when asked. Sorted and
    /// unique.
    pub fn imports_with_tests(&self, include_tests: bool) -> Vec<String> {
        let mut all: BTreeSet<&String> = self.imports.iter().collect();
        if include_tests {
            all.extend(&self.test_imports);
            all.extend(&self.xtest_imports);
        }
        all.into_iter().cloned().collect()
    }

    /// The non-fatal condition left over from resolution, if any.
    pub fn soft_error(&self) -> Option<VendError> {
        if !self.invalid_go_files.is_empty() {
            return Some(VendError::InvalidGoFiles {
                dir: self.dir.clone(),
                files: self.invalid_go_files.clone(),
            });
        }
        (self.conflicting_names.len() > 1).then(|| VendError::MultiplePackages {
            dir: self.dir.clone(),
            names: self.conflicting_names.clone(),
        })
    }
}

/// Where a package lives, without reading its files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub dir: PathBuf,
    pub import_path: String,
    pub standard: bool,
}

/// Import path and standard flag for an absolute directory.
fn root_of(ctx: &Context, dir: &Path) -> Option<(String, bool)> {
    for (root, standard) in ctx.src_roots() {
        let Ok(rel) = dir.strip_prefix(&root) else {
            continue;
        };
        let segments: Vec<String> = rel
            .components()
            .filter_map(|c| match c {
                Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
                _ => None,
            })
            .collect();
        if segments.is_empty() {
            continue;
        }
        return Some((segments.join("/"), standard));
    }
    None
}

/// Import path of `path` (resolved against `cwd`) under the first root that
/// contains it.
pub fn import_path_of(ctx: &Context, cwd: &Path, path: impl AsRef<Path>) -> Result<String> {
    let abs = crate::context::absolutize(cwd, path.as_ref());
    match root_of(ctx, &abs) {
        Some((import_path, _)) => Ok(import_path),
        None => Err(VendError::NotInRoot(abs).into()),
    }
}

fn is_go_source(name: &str) -> bool {
    name.ends_with(".go") && !name.starts_with('_') && !name.starts_with('.')
}

/// Reads the package in `dir`. The directory must be inside one of the
/// context's roots.
///
/// Several package names in one directory, or files that do not parse, do
/// not fail resolution; the package is returned with
/// [`Package::conflicting_names`] or [`Package::invalid_go_files`] set and
/// [`Package::soft_error`] reporting it.
pub fn import_dir(ctx: &Context, dir: impl AsRef<Path>) -> Result<Package> {
    let dir = ctx.abs(dir);
    let entries =
        fs::read_dir(&dir).with_context(|| format!("Failed to read directory {}", dir.display()))?;

    let mut names: Vec<String> = Vec::new();
    for entry in entries {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if is_go_source(&name) && entry.path().is_file() {
            names.push(name);
        }
    }
    names.sort();

    let mut pkg = Package {
        dir: dir.clone(),
        ..Package::default()
    };
    let mut imports = BTreeSet::new();
    let mut test_imports = BTreeSet::new();
    let mut xtest_imports = BTreeSet::new();
    let mut tags = BTreeSet::new();

    for name in names {
        let path = dir.join(&name);
        let src =
            fs::read(&path).with_context(|| format!("Failed to read {}", path.display()))?;
        let file = match parse_header(&src) {
            Ok(file) => file,
            Err(err) => {
                log::debug!("{}", VendError::parse(&path, err));
                pkg.invalid_go_files.push(name);
                continue;
            }
        };

        let mut pkg_name = file.package_name.as_str();
        if pkg_name == "documentation" {
            continue;
        }
        let is_test = name.ends_with("_test.go");
        let mut is_xtest = false;
        if is_test && let Some(base) = pkg_name.strip_suffix("_test") {
            is_xtest = true;
            pkg_name = base;
        }

        if pkg.name.is_empty() {
            pkg.name = pkg_name.to_string();
        }
        if !pkg.conflicting_names.iter().any(|n| n == pkg_name) {
            pkg.conflicting_names.push(pkg_name.to_string());
        }
        if !is_test && pkg.doc.is_empty() && !file.doc.is_empty() {
            pkg.doc = synopsis(&file.doc);
        }
        tags.extend(file.build_tags);

        let (files, set) = if is_xtest {
            (&mut pkg.xtest_go_files, &mut xtest_imports)
        } else if is_test {
            (&mut pkg.test_go_files, &mut test_imports)
        } else {
            (&mut pkg.go_files, &mut imports)
        };
        files.push(name);
        set.extend(file.imports.into_iter().map(|spec| spec.path));
    }

    if pkg.go_files.is_empty()
        && pkg.test_go_files.is_empty()
        && pkg.xtest_go_files.is_empty()
        && pkg.invalid_go_files.is_empty()
    {
        return Err(VendError::NoGoFiles(dir).into());
    }
    if pkg.conflicting_names.len() == 1 {
        pkg.conflicting_names.clear();
    }

    let (import_path, standard) =
        root_of(ctx, &dir).ok_or_else(|| VendError::NotInRoot(dir.clone()))?;
    pkg.import_path = import_path;
    pkg.standard = standard;
    pkg.imports = imports.into_iter().collect();
    pkg.test_imports = test_imports.into_iter().collect();
    pkg.xtest_imports = xtest_imports.into_iter().collect();
    pkg.all_tags = tags.into_iter().collect();

    if let Some(soft) = pkg.soft_error() {
        log::debug!("{soft}");
    }
    Ok(pkg)
}

/// Directory of `import_path` under the standard library or a workspace
/// root, probed in that order.
fn find_import(ctx: &Context, import_path: &str) -> Result<PathBuf> {
    if import_path == PSEUDO_C {
        return Err(VendError::PseudoPackage(Box::new(Package::pseudo(import_path))).into());
    }
    let relative = import_path.starts_with("./") || import_path.starts_with("../");
    if !is_valid_import_path(import_path) || relative || import_path.starts_with('/') {
        return Err(VendError::PackageNotFound(import_path.to_string()).into());
    }
    for (root, _) in ctx.src_roots() {
        let dir = root.join(import_path);
        if dir.is_dir() {
            return Ok(dir);
        }
    }
    Err(VendError::PackageNotFound(import_path.to_string()).into())
}

/// Resolves a logical import path.
///
/// The pseudo package `C` is reported as [`VendError::PseudoPackage`]
/// carrying its partial package.
pub fn import(ctx: &Context, import_path: &str) -> Result<Package> {
    let dir = find_import(ctx, import_path)?;
    import_dir(ctx, dir)
}

/// Resolves `path` to a directory and import path without reading files:
/// an existing directory relative to `cwd` first, otherwise an import path.
pub fn locate(ctx: &Context, cwd: &Path, path: &str) -> Result<Location> {
    let abs = crate::context::absolutize(cwd, Path::new(path));
    let dir = if abs.is_dir() {
        abs
    } else {
        find_import(ctx, path)?
    };
    let (import_path, standard) =
        root_of(ctx, &dir).ok_or_else(|| VendError::NotInRoot(dir.clone()))?;
    Ok(Location {
        dir,
        import_path,
        standard,
    })
}

/// Resolves `path` as a directory relative to `cwd` when one exists, as an
/// import path otherwise.
pub fn get_package(ctx: &Context, cwd: &Path, path: &str) -> Result<Package> {
    let abs = crate::context::absolutize(cwd, Path::new(path));
    if abs.is_dir() {
        import_dir(ctx, abs)
    } else {
        import(ctx, path)
    }
}

/// Whether `path` names a standard library or pseudo package. Paths that do
/// not resolve are not standard.
pub fn is_standard_package(ctx: &Context, cwd: &Path, path: &str) -> bool {
    match locate(ctx, cwd, path) {
        Ok(location) => location.standard,
        Err(err) => matches!(
            err.downcast_ref::<VendError>(),
            Some(VendError::PseudoPackage(_))
        ),
    }
}
