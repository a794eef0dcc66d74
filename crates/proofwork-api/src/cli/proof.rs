//! Proof CLI subcommands: register, publish, withdraw.

use anyhow::Result;
use clap::Subcommand;
use console::style;

use proofwork_types::principal::Principal;
use proofwork_types::proof::{CreateProofRequest, ProofId, ProofStatus};
use proofwork_types::talent::TalentId;

use crate::cli::{operator, print_json};
use crate::state::AppState;

/// Proof subcommands.
#[derive(Subcommand)]
pub enum ProofCommand {
    /// Register a DRAFT proof for a talent.
    Add {
        /// Authoring talent ID.
        #[arg(long)]
        talent: TalentId,

        #[arg(long)]
        title: String,

        #[arg(long)]
        summary: String,

        #[arg(long)]
        content: String,

        /// Icon URL.
        #[arg(long)]
        icon: Option<String>,
    },

    /// Publish a proof so it can receive kudos.
    Publish {
        /// Proof ID.
        id: ProofId,
    },

    /// Return a proof to DRAFT. Existing kudos are kept.
    Unpublish {
        /// Proof ID.
        id: ProofId,
    },
}

/// Handle a proof subcommand.
pub async fn handle_proof_command(cmd: ProofCommand, state: &AppState, json: bool) -> Result<()> {
    match cmd {
        ProofCommand::Add {
            talent,
            title,
            summary,
            content,
            icon,
        } => {
            let proof = state
                .profiles
                .create_proof(
                    &Principal::talent(talent),
                    CreateProofRequest {
                        title,
                        summary,
                        content,
                        icon,
                    },
                )
                .await?;
            if json {
                return print_json(&proof);
            }
            println!();
            println!(
                "  {} Proof {} created as {}",
                style("✓").green().bold(),
                style(&proof.title).cyan(),
                style(proof.status).yellow()
            );
            println!("  {}  {}", style("ID:").bold(), style(proof.id).dim());
            println!();
            Ok(())
        }
        ProofCommand::Publish { id } => set_status(state, id, ProofStatus::Published, json).await,
        ProofCommand::Unpublish { id } => set_status(state, id, ProofStatus::Draft, json).await,
    }
}

async fn set_status(state: &AppState, id: ProofId, status: ProofStatus, json: bool) -> Result<()> {
    let proof = state
        .profiles
        .set_proof_status(&operator(), &id, status)
        .await?;
    if json {
        return print_json(&proof);
    }
    println!();
    println!(
        "  {} Proof {} is now {}",
        style("✓").green().bold(),
        style(&proof.title).cyan(),
        style(proof.status).yellow()
    );
    println!();
    Ok(())
}
