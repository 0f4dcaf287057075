//! # mnemo-cli
//!
//! Command-line interface for mnemo.
//!
//! Provides the human side of the review workflow for agent-proposed
//! memory edits:
//! - `mnemo block init/show/export/import/list` — inspect and hand-edit blocks
//! - `mnemo propose` — stage an edit for review (agent side, for scripting)
//! - `mnemo review list/view/approve/reject` — review pending diffs
//!
//! Data lives under a root directory (default `.mnemo`): `schemas.toml`
//! declares the block schemas, `blocks/` holds content, `diffs/` holds
//! pending diff records, and an optional `mnemo.toml` sets the default
//! owner and proposer ids.

mod commands;
mod config;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// mnemo CLI — review and approve agent memory edits.
#[derive(Parser)]
#[command(name = "mnemo", version, about)]
struct Cli {
    /// Data root directory (schemas, blocks, pending diffs).
    #[arg(long, default_value = ".mnemo")]
    root: PathBuf,

    /// Acting user id (overrides the config default).
    #[arg(long)]
    owner: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect and edit memory blocks.
    Block {
        #[command(subcommand)]
        command: commands::block::BlockCommands,
    },
    /// Stage a proposed edit for review.
    Propose(commands::review::ProposeArgs),
    /// Review pending diffs.
    Review {
        #[command(subcommand)]
        command: commands::review::ReviewCommands,
    },
}

fn main() -> Result<()> {
    // Logs go to stderr so command output stays pipeable.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let cli = Cli::parse();
    let ctx = commands::Context::load(&cli.root, cli.owner)?;

    match cli.command {
        Commands::Block { command } => commands::block::run(&ctx, command),
        Commands::Propose(args) => commands::review::run_propose(&ctx, args),
        Commands::Review { command } => commands::review::run(&ctx, command),
    }
}
