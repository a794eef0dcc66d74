//! Talent CLI subcommands.

use anyhow::Result;
use clap::Subcommand;
use console::style;

use proofwork_types::talent::CreateTalentRequest;

use crate::cli::{print_json, resolve_skill_refs};
use crate::state::AppState;

/// Talent subcommands.
#[derive(Subcommand)]
pub enum TalentCommand {
    /// Register a talent with a declared skill set.
    Add {
        /// Full name.
        #[arg(long)]
        name: String,

        /// Avatar URL.
        #[arg(long)]
        avatar: Option<String>,

        /// Skill held, by name or ID (repeatable).
        #[arg(long = "skill")]
        skills: Vec<String>,
    },
}

/// Handle a talent subcommand.
pub async fn handle_talent_command(cmd: TalentCommand, state: &AppState, json: bool) -> Result<()> {
    match cmd {
        TalentCommand::Add {
            name,
            avatar,
            skills,
        } => {
            let skill_ids = resolve_skill_refs(state, &skills).await?;
            let talent = state
                .profiles
                .register_talent(CreateTalentRequest {
                    fullname: name,
                    avatar,
                    skill_ids,
                })
                .await?;
            if json {
                return print_json(&talent);
            }
            println!();
            println!(
                "  {} Talent {} registered with {} skill(s)",
                style("✓").green().bold(),
                style(&talent.fullname).cyan(),
                skills.len()
            );
            println!("  {}  {}", style("ID:").bold(), style(talent.id).dim());
            println!();
            Ok(())
        }
    }
}
