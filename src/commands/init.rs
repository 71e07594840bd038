//! `vend init`: vendor every external dependency of the working package.

use crate::commands::cp::cp;
use crate::context::{Context, Options};
use crate::error::{DuplicateReport, VendError};
use crate::package::{get_package, import_dir, import_path_of, is_standard_package};
use crate::ui;
use crate::vendor::{is_child_package, walk_packages};
use anyhow::Result;
use std::collections::BTreeSet;
use std::path::PathBuf;

/// External imports of the working package (or, with `opts.recurse`, of
/// every package below the working directory): neither standard nor a
/// parent or child of the working package.
pub fn external_imports(ctx: &Context, opts: &Options) -> Result<Vec<String>> {
    let (root, packages) = if opts.recurse {
        let root = import_path_of(ctx, &ctx.cwd, ".")?;
        (root, walk_packages(ctx, &ctx.cwd)?)
    } else {
        let pkg = import_dir(ctx, &ctx.cwd)?;
        (pkg.import_path.clone(), vec![pkg])
    };

    let mut all = BTreeSet::new();
    for pkg in &packages {
        all.extend(pkg.imports_with_tests(true));
    }
    Ok(all
        .into_iter()
        .filter(|i| !is_child_package(&root, i) && !is_child_package(i, &root))
        .filter(|i| !is_standard_package(ctx, &ctx.cwd, i))
        .collect())
}

/// Copies each external import into `<dst>/<package name>` and rewrites the
/// references to it. Returns `(old, new)` import path pairs.
///
/// Fails with [`VendError::Duplicates`] before copying anything when two
/// imports share a package name.
pub fn init(ctx: &Context, dst: &str, opts: &Options) -> Result<Vec<(String, String)>> {
    let dst_root = ctx.abs(dst);

    let mut report = DuplicateReport::default();
    let mut planned: Vec<(String, PathBuf)> = Vec::new();
    for import in external_imports(ctx, opts)? {
        let pkg = get_package(ctx, &ctx.cwd, &import)?;
        report.insert(&pkg.name, &pkg.import_path);
        planned.push((pkg.import_path, dst_root.join(&pkg.name)));
    }
    if report.has_collisions() {
        return Err(VendError::Duplicates(report).into());
    }

    let mut copied = Vec::with_capacity(planned.len());
    for (import, dir) in planned {
        ui::print_bold(&format!("{} => {}", import, dir.display()));
        let to = cp(ctx, &import, &dir.to_string_lossy(), opts)?;
        copied.push((import, to));
    }
    Ok(copied)
}
