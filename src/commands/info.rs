//! `vend info`: describe a package.

use crate::context::Context;
use crate::error::VendError;
use crate::package::{Package, get_package};
use crate::ui;
use anyhow::Result;

const WRAP: usize = 72;

/// Resolves `path`, letting the pseudo package through.
pub fn resolve(ctx: &Context, path: &str) -> Result<Package> {
    get_package(ctx, &ctx.cwd, path).or_else(|err| match err.downcast_ref::<VendError>() {
        Some(VendError::PseudoPackage(pkg)) => Ok((**pkg).clone()),
        _ => Err(err),
    })
}

pub fn print_package(pkg: &Package, verbose: bool) {
    ui::print_bold(&pkg.import_path);
    if pkg.doc.is_empty() {
        println!("No package documentation.");
    } else {
        ui::print_wrap(WRAP, &pkg.doc);
    }
    if verbose {
        println!();
        if !pkg.name.is_empty() {
            println!("  Name :  {}", pkg.name);
        }
        println!("  Standard :  {}", pkg.standard);
        println!("  Directory :  {}", pkg.dir.display());
        if !pkg.all_tags.is_empty() {
            println!("  Tags :  {}", pkg.all_tags.join(" "));
        }
    }
    println!();
}

/// Prints the package at `path`.
pub fn info(ctx: &Context, path: &str, verbose: bool) -> Result<()> {
    let pkg = resolve(ctx, path)?;
    print_package(&pkg, verbose);
    Ok(())
}
