//! # vend - Go package vendoring
//!
//! vend copies Go package trees into a project and rewrites every import
//! that pointed at the original location, sub-packages included.
//!
//! ## Features
//!
//! - **Copy and move**: `vend cp` / `vend mv` copy a package tree and
//!   update references in the working package or the whole workspace
//! - **Init**: `vend init` vendors every external dependency in one pass
//! - **Path rewrites**: `vend path` updates imports without copying
//! - **Canonical import comments**: stripped from vendored copies
//! - **Minimal diffs**: only import declarations are touched
//!
//! ## Quick Start
//!
//! ```bash
//! # Vendor all external dependencies into ./lib
//! vend init lib
//!
//! # Copy one package and rewrite references in every package below .
//! vend cp -r github.com/lib/pq internal/pq
//! ```
//!
//! ## Module Organization
//!
//! - [`golang`] - Go scanner, import parser and import printer
//! - [`package`] - Package resolution against GOROOT and GOPATH
//! - [`vendor`] - Copy, strip, plan, discover and rewrite
//! - [`commands`] - CLI command handlers

/// CLI command handlers.
pub mod commands;

/// Workspace roots and per-invocation options.
pub mod context;

/// Typed failure conditions.
pub mod error;

/// Go source handling.
pub mod golang;

/// Package resolution.
pub mod package;

/// Terminal output helpers.
pub mod ui;

/// The vendoring engine.
pub mod vendor;

pub use context::{Context, ListOptions, Options};
pub use error::{DuplicateReport, VendError};
pub use package::Package;
