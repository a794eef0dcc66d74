//! CLI command definitions and dispatch for the `pwork` binary.
//!
//! Uses clap derive macros for argument parsing. The CLI follows a
//! noun-verb pattern (e.g., `pwork sponsor add`, `pwork kudos post`).
//!
//! The CLI is an operator console: commands act as the principal named by
//! `--sponsor` / `--talent`, or as an administrator when no role is implied.

pub mod key;
pub mod kudos;
pub mod proof;
pub mod skill;
pub mod sponsor;
pub mod talent;
pub mod vacancy;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use clap_complete::Shell;
use serde::Serialize;
use uuid::Uuid;

use proofwork_types::principal::{Principal, Role};
use proofwork_types::skill::SkillId;

use crate::state::AppState;

/// Run a proof-of-work talent marketplace: kudos, vacancies, submissions.
#[derive(Parser)]
#[command(name = "pwork", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Export spans through OpenTelemetry (stdout exporter).
    #[arg(long, global = true)]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage the skill catalog.
    Skill {
        #[command(subcommand)]
        action: skill::SkillCommand,
    },

    /// Manage sponsor accounts and their kudos balance.
    Sponsor {
        #[command(subcommand)]
        action: sponsor::SponsorCommand,
    },

    /// Register talents.
    Talent {
        #[command(subcommand)]
        action: talent::TalentCommand,
    },

    /// Register and publish proofs.
    Proof {
        #[command(subcommand)]
        action: proof::ProofCommand,
    },

    /// Post kudos and inspect the ledger.
    Kudos {
        #[command(subcommand)]
        action: kudos::KudosCommand,
    },

    /// Manage vacancies.
    Vacancy {
        #[command(subcommand)]
        action: vacancy::VacancyCommand,
    },

    /// Issue and list API keys for the REST API.
    Key {
        #[command(subcommand)]
        action: key::KeyCommand,
    },

    /// Start the REST API server.
    Serve {
        /// Port to listen on.
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to.
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

/// The principal used for administrative commands.
pub fn operator() -> Principal {
    Principal {
        id: Uuid::nil(),
        role: Role::Admin,
    }
}

/// Pretty-print a value as JSON on stdout.
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Resolve a skill reference given as an id or a catalog name.
///
/// Names match case-insensitively.
pub async fn resolve_skill_ref(state: &AppState, reference: &str) -> Result<SkillId> {
    if let Ok(id) = reference.parse::<SkillId>() {
        return Ok(id);
    }
    let skills = state.skills.list_skills().await?;
    skills
        .iter()
        .find(|s| s.name.eq_ignore_ascii_case(reference))
        .map(|s| s.id)
        .with_context(|| format!("Skill '{reference}' not found"))
}

/// Resolve several skill references, preserving order.
pub async fn resolve_skill_refs(state: &AppState, references: &[String]) -> Result<Vec<SkillId>> {
    let mut ids = Vec::with_capacity(references.len());
    for reference in references {
        ids.push(resolve_skill_ref(state, reference).await?);
    }
    Ok(ids)
}
