//! `vend path`: rewrite references to an import path without copying.

use crate::context::{Context, Options};
use crate::error::VendError;
use crate::package::{Package, import_dir};
use crate::vendor::{for_each_package, plan_rewrites, rewrite_dir};
use anyhow::Result;
use std::path::{Path, PathBuf};

/// Rewrites the imports of one package from `from` (and its sub-packages)
/// to `to`. Returns the files written.
pub fn update_package(pkg: &Package, from: &str, to: &str, verbose: bool) -> Result<Vec<PathBuf>> {
    if pkg.import_path.is_empty() {
        return Err(VendError::NoImportPath(pkg.dir.clone()).into());
    }
    if pkg.dir.as_os_str().is_empty() {
        return Err(VendError::NoDirectory(pkg.import_path.clone()).into());
    }

    let imports = pkg.imports_with_tests(true);
    let map = plan_rewrites(from, to, imports.iter().map(String::as_str))?;
    if map.is_empty() {
        return Ok(Vec::new());
    }
    log::debug!("{}: {} rewrites planned", pkg.import_path, map.len());
    rewrite_dir(&pkg.dir, &map, verbose)
}

/// Rewrites references to `from` in the package at `dir`, or with
/// `opts.recurse` in every package below it. Returns the number of files
/// written.
///
/// A directory without Go files has nothing to rewrite unless recursing.
pub fn update(ctx: &Context, dir: &Path, from: &str, to: &str, opts: &Options) -> Result<usize> {
    let mut written = 0;
    if opts.recurse {
        for_each_package(ctx, dir, |pkg, _| {
            written += update_package(pkg, from, to, opts.verbose)?.len();
            Ok(())
        })?;
        return Ok(written);
    }

    let dir = ctx.abs(dir);
    let pkg = match import_dir(ctx, &dir) {
        Ok(pkg) => pkg,
        Err(err) => match err.downcast_ref::<VendError>() {
            Some(VendError::NoGoFiles(dir)) => {
                log::warn!("no Go files in {}, nothing to update", dir.display());
                return Ok(0);
            }
            _ => return Err(err),
        },
    };
    if let Some(soft) = pkg.soft_error() {
        log::warn!("{soft}");
    }
    written += update_package(&pkg, from, to, opts.verbose)?.len();
    Ok(written)
}
