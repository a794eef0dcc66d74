//! Skill catalog CLI subcommands.

use anyhow::Result;
use clap::Subcommand;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;

use proofwork_types::skill::CreateSkillRequest;

use crate::cli::print_json;
use crate::state::AppState;

/// Skill subcommands.
#[derive(Subcommand)]
pub enum SkillCommand {
    /// Add a skill to the catalog.
    Add {
        /// Skill name (unique, case-insensitive).
        name: String,
    },

    /// List every skill in the catalog.
    #[command(alias = "ls")]
    List,
}

/// Handle a skill subcommand.
pub async fn handle_skill_command(cmd: SkillCommand, state: &AppState, json: bool) -> Result<()> {
    match cmd {
        SkillCommand::Add { name } => add_skill(state, name, json).await,
        SkillCommand::List => list_skills(state, json).await,
    }
}

async fn add_skill(state: &AppState, name: String, json: bool) -> Result<()> {
    let skill = state
        .skills
        .create_skill(CreateSkillRequest { name })
        .await?;

    if json {
        return print_json(&skill);
    }

    println!();
    println!(
        "  {} Added skill {} {}",
        style("✓").green().bold(),
        style(&skill.name).cyan(),
        style(skill.id.to_string()).dim()
    );
    println!();
    Ok(())
}

async fn list_skills(state: &AppState, json: bool) -> Result<()> {
    let skills = state.skills.list_skills().await?;

    if json {
        return print_json(&skills);
    }

    if skills.is_empty() {
        println!();
        println!("  No skills yet. Add one with {}", style("pwork skill add <NAME>").cyan());
        println!();
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Name").fg(Color::White),
        Cell::new("ID").fg(Color::White),
    ]);
    for skill in &skills {
        table.add_row(vec![
            Cell::new(&skill.name).fg(Color::Cyan),
            Cell::new(skill.id.to_string()).fg(Color::DarkGrey),
        ]);
    }

    println!();
    println!("{table}");
    println!();
    Ok(())
}
