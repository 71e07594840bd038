//! `vend list`: the imports of a package.

use crate::commands::info::{print_package, resolve};
use crate::context::{Context, ListOptions};
use crate::package::{get_package, is_standard_package, locate};
use crate::vendor::{is_child_package, walk_packages};
use anyhow::Result;
use colored::*;
use std::collections::BTreeSet;

/// Imports of the package at `path`, or of every package below it with
/// `opts.recurse`, filtered by `opts`. Sorted and unique.
pub fn imports(ctx: &Context, path: &str, opts: &ListOptions) -> Result<Vec<String>> {
    let (parent, packages) = if opts.recurse {
        let location = locate(ctx, &ctx.cwd, path)?;
        (location.import_path, walk_packages(ctx, &location.dir)?)
    } else {
        let pkg = get_package(ctx, &ctx.cwd, path)?;
        (pkg.import_path.clone(), vec![pkg])
    };

    let mut all = BTreeSet::new();
    for pkg in &packages {
        all.extend(pkg.imports_with_tests(opts.tests));
    }
    Ok(all
        .into_iter()
        .filter(|i| !(opts.omit_child && is_child_package(&parent, i)))
        .filter(|i| !(opts.omit_standard && is_standard_package(ctx, &ctx.cwd, i)))
        .collect())
}

/// Prints each import of `path` the way `info` would.
pub fn list(ctx: &Context, path: &str, opts: &ListOptions) -> Result<()> {
    for import in imports(ctx, path, opts)? {
        if opts.quiet {
            println!("{import}");
            continue;
        }
        match resolve(ctx, &import) {
            Ok(pkg) => print_package(&pkg, opts.verbose),
            Err(err) => {
                log::warn!("{import}: {err:#}");
                println!("{}", import.cyan().bold());
                println!("{}", format!("Unresolved : {err}").dimmed());
                println!();
            }
        }
    }
    Ok(())
}
