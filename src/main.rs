//! # vend CLI Entry Point
//!
//! Parses arguments with clap and routes subcommands to the handlers in
//! [`vend::commands`]. Any error is printed in bold red and the process
//! exits with status 1.

use anyhow::Result;
use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::{Shell, generate};
use env_logger::Env;

use vend::commands;
use vend::ui;
use vend::{Context, ListOptions, Options};

#[derive(Parser)]
#[command(name = "vend")]
#[command(about = "A Swiss Army knife for vending your own Go packages", version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable debug logging (RUST_LOG overrides)
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args, Clone, Copy)]
struct CopyFlags {
    /// Print every copied file and rewritten import
    #[arg(short, long)]
    verbose: bool,
    /// Replace the destination if it exists
    #[arg(short, long)]
    force: bool,
    /// Update references in every package below the working directory
    #[arg(short, long)]
    recurse: bool,
    /// Include files and directories starting with a dot
    #[arg(short = 'i', long = "hidden")]
    hidden: bool,
}

impl From<CopyFlags> for Options {
    fn from(flags: CopyFlags) -> Self {
        Options {
            verbose: flags.verbose,
            force: flags.force,
            recurse: flags.recurse,
            hidden: flags.hidden,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// List the imports of a package
    ///
    /// The path may be a directory relative to the working directory or an
    /// import path resolved through GOROOT and GOPATH.
    List {
        /// Package directory or import path
        #[arg(default_value = ".")]
        path: String,
        /// Only print import paths
        #[arg(short, long)]
        quiet: bool,
        /// Print directory, standard flag and build tags
        #[arg(short, long)]
        verbose: bool,
        /// Include imports of every package below the path
        #[arg(short, long)]
        recurse: bool,
        /// Include test imports
        #[arg(short, long)]
        tests: bool,
        /// Omit standard packages
        #[arg(short = 's', long = "no-standard")]
        omit_standard: bool,
        /// Omit child packages
        #[arg(short = 'c', long = "no-child")]
        omit_child: bool,
    },
    /// Print information about a package
    Info {
        /// Package directory or import path
        #[arg(default_value = ".")]
        path: String,
        /// Print directory, standard flag and build tags
        #[arg(short, long)]
        verbose: bool,
    },
    /// Copy a package and update the import paths that reference it
    Cp {
        /// Import path or directory of the package to copy
        from: String,
        /// Destination directory
        to: String,
        #[command(flatten)]
        flags: CopyFlags,
    },
    /// Move a package and update the import paths that reference it
    ///
    /// Standard packages cannot be moved, use cp instead.
    Mv {
        /// Import path or directory of the package to move
        from: String,
        /// Destination directory
        to: String,
        #[command(flatten)]
        flags: CopyFlags,
    },
    /// Copy every external dependency into a directory
    ///
    /// Packages are copied into a subdirectory named after the package. If
    /// several dependencies share a package name nothing is copied and every
    /// duplicate is reported; place those with `vend cp` first.
    Init {
        /// Directory the dependencies are copied into
        directory: String,
        #[command(flatten)]
        flags: CopyFlags,
    },
    /// Rewrite import paths without copying anything
    #[command(alias = "update")]
    Path {
        /// Import path being replaced
        from: String,
        /// Replacement import path
        to: String,
        /// Print every rewritten import
        #[arg(short, long)]
        verbose: bool,
        /// Rewrite every package below the working directory
        #[arg(short, long)]
        recurse: bool,
    },
    /// Generate shell completion scripts
    Completion { shell: Shell },
}

fn main() {
    let cli = Cli::parse();

    let env = if cli.debug {
        Env::default().default_filter_or("debug")
    } else {
        Env::default().default_filter_or("warn")
    };
    env_logger::Builder::from_env(env).init();

    if let Err(e) = run(cli) {
        ui::print_err(&format!("Error : {e:#}"));
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        anyhow::bail!("subcommand not specified");
    };

    if let Commands::Completion { shell } = command {
        let mut cmd = Cli::command();
        let bin_name = cmd.get_name().to_string();
        generate(shell, &mut cmd, bin_name, &mut std::io::stdout());
        return Ok(());
    }

    let ctx = Context::from_env()?;
    match command {
        Commands::List {
            path,
            quiet,
            verbose,
            recurse,
            tests,
            omit_standard,
            omit_child,
        } => {
            let opts = ListOptions {
                quiet,
                verbose,
                recurse,
                tests,
                omit_standard,
                omit_child,
            };
            commands::list(&ctx, &path, &opts)
        }
        Commands::Info { path, verbose } => commands::info(&ctx, &path, verbose),
        Commands::Cp { from, to, flags } => {
            commands::cp(&ctx, &from, &to, &flags.into()).map(|_| ())
        }
        Commands::Mv { from, to, flags } => {
            commands::mv(&ctx, &from, &to, &flags.into()).map(|_| ())
        }
        Commands::Init { directory, flags } => {
            commands::init(&ctx, &directory, &flags.into()).map(|_| ())
        }
        Commands::Path {
            from,
            to,
            verbose,
            recurse,
        } => {
            let opts = Options {
                verbose,
                recurse,
                ..Options::default()
            };
            let cwd = ctx.cwd.clone();
            commands::update(&ctx, &cwd, &from, &to, &opts).map(|_| ())
        }
        Commands::Completion { .. } => Ok(()),
    }
}
