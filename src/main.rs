// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//
//! Repolist CLI - list, resolve and open the git repositories below your roots

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "repolist")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Configuration file path
    #[arg(short, long, env = "REPOLIST_CONFIG", global = true)]
    config: Option<std::path::PathBuf>,

    /// Directory to scan (repeatable, replaces configured repositories)
    #[arg(long = "root", global = true)]
    roots: Vec<std::path::PathBuf>,

    /// Repository path to hide (repeatable, added to configured ones)
    #[arg(long, global = true)]
    hidden: Vec<std::path::PathBuf>,

    /// Resolve repository names ignoring case
    #[arg(long, global = true)]
    case_insensitive: bool,

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
    /// List discovered repositories
    List,

    /// Resolve a repository name to its stored spelling and path
    Resolve {
        /// Repository name (case-insensitive when enabled)
        name: String,
    },

    /// Open a repository and show what it is
    Show {
        /// Repository name
        name: String,
    },

    /// Create a new repository
    Init {
        /// Where to create it
        path: std::path::PathBuf,

        /// Create a bare repository
        #[arg(long)]
        bare: bool,
    },

    /// Print the effective configuration
    Config,

    /// Generate shell completions
    Completions {
        /// Shell type (bash, zsh, fish, powershell)
        shell: clap_complete::Shell,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = repolist::config::load(cli.config.as_deref())
        .context("Failed to load configuration")?;
    if !cli.roots.is_empty() {
        config.repositories = cli.roots.clone();
    }
    config.hidden.extend(cli.hidden.iter().cloned());
    if cli.case_insensitive {
        config.case_insensitive_url = true;
    }

    // Initialize logging
    let log_level = match cli.verbose {
        0 if cli.quiet => "error".to_string(),
        0 => config.log_level.clone(),
        1 => "debug".to_string(),
        _ => "trace".to_string(),
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let output = commands::Output {
        json: cli.json,
        color: !cli.no_color,
    };

    // Execute command
    match cli.command {
        Commands::List => commands::list::run(&config, output),
        Commands::Resolve { name } => commands::resolve::run(&config, &name, output),
        Commands::Show { name } => commands::show::run(&config, &name, output),
        Commands::Init { path, bare } => commands::init::run(&config, &path, bare),
        Commands::Config => commands::config::run(&config),
        Commands::Completions { shell } => commands::completions::run(shell, &mut Cli::command()),
    }
}
