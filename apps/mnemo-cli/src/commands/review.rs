// review.rs — Proposing edits and reviewing the pending queue.

use anyhow::Result;
use clap::{Args, Subcommand};
use uuid::Uuid;

use mnemo_workflow::ProposeRequest;

use super::Context;

#[derive(Args)]
pub struct ProposeArgs {
    /// Block label to edit.
    pub label: String,

    /// The new content to insert or substitute.
    #[arg(long)]
    pub content: String,

    /// Edit strategy: append, replace, or full_replace.
    #[arg(long, default_value = "append")]
    pub strategy: String,

    /// Why this edit should be made.
    #[arg(long)]
    pub reasoning: String,

    /// Target field (omit for block-level edits).
    #[arg(long)]
    pub field: Option<String>,

    /// Exact current substring being replaced (required for replace).
    #[arg(long)]
    pub old: Option<String>,

    /// Confidence: low, medium, or high.
    #[arg(long)]
    pub confidence: Option<String>,
}

#[derive(Subcommand)]
pub enum ReviewCommands {
    /// List pending diffs for a block.
    List { label: String },
    /// Show one pending diff in full.
    View { diff_id: Uuid },
    /// Approve a pending diff (merges it into the block).
    Approve { diff_id: Uuid },
    /// Reject a pending diff (block content untouched).
    Reject { diff_id: Uuid },
}

pub fn run_propose(ctx: &Context, args: ProposeArgs) -> Result<()> {
    let diff_id = ctx.workflow.propose_edit(ProposeRequest {
        owner_id: ctx.owner.clone(),
        block: args.label,
        field: args.field,
        content: args.content,
        strategy: args.strategy,
        reasoning: args.reasoning,
        confidence: args.confidence,
        old_content: args.old,
        proposer_id: ctx.proposer.clone(),
    })?;
    println!("staged diff {diff_id}");
    Ok(())
}

pub fn run(ctx: &Context, command: ReviewCommands) -> Result<()> {
    match command {
        ReviewCommands::List { label } => {
            let pending = ctx.workflow.list_pending(&ctx.owner, &label)?;
            if pending.is_empty() {
                println!("nothing pending for {}/{}", ctx.owner, label);
            }
            for view in pending {
                println!("{}", view.summary());
            }
            Ok(())
        }
        ReviewCommands::View { diff_id } => {
            match ctx.workflow.get_pending(diff_id)? {
                Some(view) => print!("{}", view.render()),
                None => println!("no pending diff {diff_id}"),
            }
            Ok(())
        }
        ReviewCommands::Approve { diff_id } => {
            ctx.workflow.approve(&ctx.owner, diff_id)?;
            println!("approved {diff_id}");
            Ok(())
        }
        ReviewCommands::Reject { diff_id } => {
            ctx.workflow.reject(diff_id)?;
            println!("rejected {diff_id}");
            Ok(())
        }
    }
}
