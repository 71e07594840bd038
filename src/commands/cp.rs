//! `vend cp`: copy a package and point every reference at the copy.

use crate::commands::update::update;
use crate::context::{Context, Options};
use crate::error::VendError;
use crate::package::{import_path_of, locate};
use crate::vendor::{copy_tree, strip_canonical_import_paths};
use anyhow::{Context as _, Result};
use std::fs;
use std::io;
use std::path::Path;

/// Removes whatever is at `path`.
fn remove_existing(path: &Path) -> Result<()> {
    let meta = fs::symlink_metadata(path)?;
    if meta.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    }
    .with_context(|| format!("Failed to remove {}", path.display()))
}

/// Copies the package at `src` (directory or import path) to the directory
/// `dst` and returns the copy's import path.
///
/// The copy loses its canonical import comments and its own references to
/// the old path are rewritten. References in the working directory's
/// package, or every package below it with `opts.recurse`, follow.
pub fn cp(ctx: &Context, src: &str, dst: &str, opts: &Options) -> Result<String> {
    let from = locate(ctx, &ctx.cwd, src)?;
    if from.import_path.is_empty() {
        return Err(VendError::NoImportPath(from.dir).into());
    }
    let dst_dir = ctx.abs(dst);
    let to = import_path_of(ctx, &ctx.cwd, &dst_dir)?;

    match fs::symlink_metadata(&dst_dir) {
        Ok(_) if opts.force && !from.dir.starts_with(&dst_dir) => {
            log::debug!("removing existing {}", dst_dir.display());
            remove_existing(&dst_dir)?;
        }
        Ok(_) => return Err(VendError::DestinationExists(dst_dir).into()),
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(err) => {
            return Err::<String, _>(err)
                .with_context(|| format!("Failed to stat {}", dst_dir.display()));
        }
    }

    log::info!("copying {} to {}", from.import_path, to);
    copy_tree(&from.dir, &dst_dir, opts.hidden, opts.verbose)?;
    strip_canonical_import_paths(&dst_dir)?;

    let inside = Options {
        recurse: true,
        ..*opts
    };
    update(ctx, &dst_dir, &from.import_path, &to, &inside)?;
    update(ctx, &ctx.cwd, &from.import_path, &to, opts)?;
    Ok(to)
}
