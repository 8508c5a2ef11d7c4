// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//
//! Depscope CLI - dependency and namespace analysis for Composer projects

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use depscope::{commands, config};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "depscope")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Configuration file path
    #[arg(short, long, env = "DEPSCOPE_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, env = "NO_COLOR", global = true)]
    no_color: bool,

    /// Output in JSON format
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show direct requirements and the locked dependency graph
    Deps {
        /// Project root containing composer.json
        #[arg(default_value = ".")]
        path: PathBuf,
    },

    /// Detect circular dependencies among locked packages
    Cycles {
        /// Project root containing composer.json
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Exit with an error when cycles are found
        #[arg(long)]
        strict: bool,
    },

    /// Check source files against the PSR-4 autoload mappings
    Compliance {
        /// Project root containing composer.json
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Exit with an error when violations are found
        #[arg(long)]
        strict: bool,
    },

    /// Catalog the namespaces declared in source files
    Namespaces {
        /// Directory to scan
        #[arg(default_value = ".")]
        path: PathBuf,
    },

    /// Show where a namespace is defined and imported
    Usage {
        /// Namespace to look up (prefix match)
        namespace: String,

        /// Directory to scan
        #[arg(default_value = ".")]
        path: PathBuf,
    },

    /// Export the dependency graph
    Export {
        /// Project root containing composer.json
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Output format (dot, json)
        #[arg(short, long, default_value = "dot")]
        format: String,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Only export packages reachable from this one
        #[arg(long)]
        focus: Option<String>,

        /// Maximum hops from --focus (0 = unlimited)
        #[arg(long, default_value_t = 0, requires = "focus")]
        depth: usize,

        /// Leave out development packages
        #[arg(long)]
        no_dev: bool,
    },

    /// Compare direct requirements across several repositories
    Shared {
        /// Repository roots containing composer.json
        #[arg(required = true, num_args = 1..)]
        paths: Vec<PathBuf>,

        /// Exit with an error when version constraints conflict
        #[arg(long)]
        strict: bool,
    },

    /// Show the effective configuration
    Config {
        /// Dotted key to show, e.g. scan.exclude
        key: Option<String>,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate for
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = config::load(cli.config.as_deref())?;

    // Initialize logging: RUST_LOG wins, then -v/-q, then the config file
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => {
            let level = match cli.verbose {
                0 if cli.quiet => "error",
                0 => config.log_level.as_str(),
                1 => "debug",
                _ => "trace",
            };
            EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"))
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let out = commands::Output {
        json: cli.json,
        color: !cli.no_color,
    };

    let run = || match cli.command {
        Commands::Deps { path } => commands::deps::run(&path, out),
        Commands::Cycles { path, strict } => commands::cycles::run(&path, strict, out),
        Commands::Compliance { path, strict } => {
            commands::compliance::run(&path, &config.scan, strict, out)
        }
        Commands::Namespaces { path } => commands::namespaces::run(&path, &config.scan, out),
        Commands::Usage { namespace, path } => {
            commands::namespaces::run_usage(&path, &namespace, &config.scan, out)
        }
        Commands::Export {
            path,
            format,
            output,
            focus,
            depth,
            no_dev,
        } => commands::export::run(
            &path,
            &format,
            output,
            &commands::export::View {
                focus,
                depth,
                no_dev,
            },
        ),
        Commands::Shared { paths, strict } => commands::shared::run(&paths, strict, out),
        Commands::Config { key } => commands::config::run(&config, key.as_deref(), out),
        Commands::Completions { shell } => commands::completions::run(shell, &mut Cli::command()),
    };

    match config.thread_pool()? {
        Some(pool) => pool.install(run),
        None => run(),
    }
}
