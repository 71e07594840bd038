//! `vend mv`: copy, then remove the original.

use crate::commands::cp::cp;
use crate::context::{Context, Options};
use crate::error::VendError;
use crate::package::locate;
use anyhow::{Context as _, Result};
use std::fs;

/// Moves the package at `src` to `dst`. Standard packages cannot be moved,
/// and neither can a package into its own subtree.
pub fn mv(ctx: &Context, src: &str, dst: &str, opts: &Options) -> Result<String> {
    let from = match locate(ctx, &ctx.cwd, src) {
        Ok(from) => from,
        Err(err) => match err.downcast_ref::<VendError>() {
            Some(VendError::PseudoPackage(_)) => {
                return Err(VendError::StandardPackage(src.to_string()).into());
            }
            _ => return Err(err),
        },
    };
    if from.standard {
        return Err(VendError::StandardPackage(src.to_string()).into());
    }
    let dst_dir = ctx.abs(dst);
    if dst_dir.starts_with(&from.dir) {
        return Err(VendError::MoveIntoSelf {
            src: from.dir,
            dst: dst_dir,
        }
        .into());
    }

    let to = cp(ctx, src, dst, opts)?;
    fs::remove_dir_all(&from.dir)
        .with_context(|| format!("Failed to remove {}", from.dir.display()))?;
    Ok(to)
}
