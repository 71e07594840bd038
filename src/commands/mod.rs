//! CLI command handlers.
//!
//! Each subcommand is a library function taking the [`Context`] and its
//! options, so the binary only parses arguments and reports errors.
//!
//! [`Context`]: crate::context::Context

pub mod cp;
pub mod info;
pub mod init;
pub mod list;
pub mod mv;
pub mod update;

pub use cp::cp;
pub use info::info;
pub use init::init;
pub use list::list;
pub use mv::mv;
pub use update::update;
