// block.rs — Block inspection and hand-editing commands.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context as _, Result};
use clap::Subcommand;

use super::Context;

#[derive(Subcommand)]
pub enum BlockCommands {
    /// Initialize a block from its schema defaults.
    Init {
        /// Block label (must be declared in schemas.toml).
        label: String,
    },
    /// Print a block's raw structured content.
    Show { label: String },
    /// Print (or write) a block as editable Markdown.
    Export {
        label: String,
        /// Write to a file instead of stdout.
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Save an edited Markdown file back into a block.
    Import {
        label: String,
        /// The Markdown file to import.
        file: PathBuf,
    },
    /// List the owner's blocks.
    List,
}

pub fn run(ctx: &Context, command: BlockCommands) -> Result<()> {
    match command {
        BlockCommands::Init { label } => {
            let created = ctx.workflow.init_block(&ctx.owner, &label)?;
            if created {
                println!("initialized {}/{}", ctx.owner, label);
            } else {
                println!("{}/{} already exists", ctx.owner, label);
            }
            Ok(())
        }
        BlockCommands::Show { label } => {
            match ctx.workflow.store().read(&ctx.owner, &label)? {
                Some(content) => print!("{content}"),
                None => println!("{}/{} has not been initialized", ctx.owner, label),
            }
            Ok(())
        }
        BlockCommands::Export { label, output } => {
            let markdown = ctx.workflow.get_block_markdown(&ctx.owner, &label)?;
            match output {
                Some(path) => {
                    fs::write(&path, &markdown)
                        .with_context(|| format!("writing {}", path.display()))?;
                    println!("exported {}/{} to {}", ctx.owner, label, path.display());
                }
                None => print!("{markdown}"),
            }
            Ok(())
        }
        BlockCommands::Import { label, file } => {
            let markdown =
                fs::read_to_string(&file).with_context(|| format!("reading {}", file.display()))?;
            ctx.workflow
                .save_block_markdown(&ctx.owner, &label, &markdown)?;
            println!("saved {}/{}", ctx.owner, label);
            Ok(())
        }
        BlockCommands::List => {
            let labels = ctx.workflow.store().list_labels(&ctx.owner)?;
            if labels.is_empty() {
                println!("no blocks for {}", ctx.owner);
            }
            for label in labels {
                let pending = ctx.workflow.list_pending(&ctx.owner, &label)?.len();
                if pending > 0 {
                    println!("{label}  ({pending} pending)");
                } else {
                    println!("{label}");
                }
            }
            Ok(())
        }
    }
}
