//! portfix CLI - Fix host port conflicts in Docker Compose files
//!
//! A command-line tool for finding services that publish the same host
//! port and rewriting the file so each one gets its own.

mod commands;
mod render;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt as tracing_fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "portfix")]
#[command(author, version, about = "Fix host port conflicts in Docker Compose files")]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output in JSON format
    #[arg(long, global = true)]
    json: bool,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Report port conflicts without changing anything
    Check {
        /// Compose files to check ("-" for stdin)
        files: Vec<PathBuf>,

        /// Exit with status 0 even when conflicts are found
        #[arg(long)]
        no_fail: bool,
    },

    /// Reassign conflicting host ports
    Fix {
        /// Compose files to fix ("-" for stdin)
        files: Vec<PathBuf>,

        /// Rewrite the files in place instead of printing the result
        #[arg(short, long)]
        write: bool,

        /// Do not keep a backup of files rewritten in place
        #[arg(long)]
        no_backup: bool,
    },

    /// Show or change configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show current configuration
    Show,
    /// Change a setting
    Set {
        /// Setting name (createBackup, backupSuffix, timestampBackups)
        key: String,
        /// New value
        value: String,
    },
    /// Print the configuration file location
    Path,
}

fn init_logging(verbose: u8) -> anyhow::Result<()> {
    let filter = if std::env::var_os("RUST_LOG").is_some() {
        EnvFilter::try_from_default_env()?
    } else {
        let level = match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        };
        EnvFilter::new(format!("warn,portfix={level},portfix_core={level}"))
    };

    // Logs go to stderr; stdout carries documents and JSON.
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_fmt::layer().with_writer(std::io::stderr))
        .init();

    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;

    match cli.command {
        Commands::Check { files, no_fail } => {
            let found = commands::check::run(&files, cli.json).await?;
            if found && !no_fail {
                return Ok(ExitCode::from(1));
            }
        }
        Commands::Fix {
            files,
            write,
            no_backup,
        } => {
            commands::fix::run(&files, write, no_backup, cli.json).await?;
        }
        Commands::Config { action } => match action.unwrap_or(ConfigAction::Show) {
            ConfigAction::Show => commands::config::show(cli.json).await?,
            ConfigAction::Set { key, value } => {
                commands::config::set(&key, &value, cli.json).await?
            }
            ConfigAction::Path => commands::config::path()?,
        },
    }

    Ok(ExitCode::SUCCESS)
}
