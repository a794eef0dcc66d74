//! Vacancy CLI subcommands: create, modify, show, list.

use anyhow::Result;
use clap::{Args, Subcommand};
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;

use proofwork_core::service::page_request;
use proofwork_types::page::Page;
use proofwork_types::principal::Principal;
use proofwork_types::sponsor::SponsorId;
use proofwork_types::vacancy::{
    CreateVacancyRequest, ModifyVacancyRequest, Vacancy, VacancyDetail, VacancyId, VacancyStatus,
};

use crate::cli::{operator, print_json, resolve_skill_refs};
use crate::state::AppState;

/// Fields shared by `create` and `modify`.
#[derive(Args)]
pub struct VacancyFields {
    #[arg(long)]
    title: String,

    #[arg(long)]
    content: String,

    /// DRAFT, PUBLISHED or HIDDEN.
    #[arg(long, default_value = "DRAFT")]
    status: VacancyStatus,

    /// Required skill, by name or ID (repeatable).
    #[arg(long = "skill")]
    skills: Vec<String>,
}

/// Vacancy subcommands.
#[derive(Subcommand)]
pub enum VacancyCommand {
    /// Create a vacancy as DRAFT or PUBLISHED.
    Create {
        /// Owning sponsor.
        #[arg(long)]
        sponsor: SponsorId,

        #[command(flatten)]
        fields: VacancyFields,

        /// Minimum skill match (0-100) a talent needs to submit.
        #[arg(long)]
        match_percent: Option<u8>,
    },

    /// Apply the transition selected by --status.
    Modify {
        /// Vacancy ID.
        id: VacancyId,

        /// Owning sponsor.
        #[arg(long)]
        sponsor: SponsorId,

        #[command(flatten)]
        fields: VacancyFields,
    },

    /// Show a vacancy with its skills and author.
    Show {
        /// Vacancy ID.
        id: VacancyId,
    },

    /// List published vacancies, or every vacancy of one sponsor.
    #[command(alias = "ls")]
    List {
        #[arg(long)]
        sponsor: Option<SponsorId>,

        #[arg(long)]
        page: Option<u32>,

        #[arg(long)]
        size: Option<u32>,
    },
}

/// Handle a vacancy subcommand.
pub async fn handle_vacancy_command(
    cmd: VacancyCommand,
    state: &AppState,
    json: bool,
) -> Result<()> {
    match cmd {
        VacancyCommand::Create {
            sponsor,
            fields,
            match_percent,
        } => {
            let skill_ids = resolve_skill_refs(state, &fields.skills).await?;
            let vacancy = state
                .vacancies
                .create_vacancy(
                    &Principal::sponsor(sponsor),
                    CreateVacancyRequest {
                        title: fields.title,
                        content: fields.content,
                        status: fields.status,
                        skill_ids,
                        skills_matched_percent: match_percent,
                    },
                )
                .await?;
            print_detail(&vacancy, "created", json)
        }
        VacancyCommand::Modify {
            id,
            sponsor,
            fields,
        } => {
            let skill_ids = resolve_skill_refs(state, &fields.skills).await?;
            let vacancy = state
                .vacancies
                .modify_vacancy(
                    &Principal::sponsor(sponsor),
                    &id,
                    ModifyVacancyRequest {
                        title: fields.title,
                        content: fields.content,
                        status: fields.status,
                        skill_ids,
                    },
                )
                .await?;
            print_detail(&vacancy, "updated", json)
        }
        VacancyCommand::Show { id } => {
            let vacancy = state.vacancies.get_vacancy(&operator(), &id).await?;
            print_detail(&vacancy, "", json)
        }
        VacancyCommand::List {
            sponsor,
            page,
            size,
        } => {
            let request = page_request(&state.config, page, size);
            let vacancies = match sponsor {
                Some(sponsor) => {
                    state
                        .vacancies
                        .list_sponsor_vacancies(&Principal::sponsor(sponsor), &sponsor, request)
                        .await?
                }
                None => state.vacancies.list_published(request).await?,
            };
            print_list(&vacancies, json)
        }
    }
}

fn status_cell(status: VacancyStatus) -> Cell {
    match status {
        VacancyStatus::Draft => Cell::new("○ draft").fg(Color::Yellow),
        VacancyStatus::Published => Cell::new("● published").fg(Color::Green),
        VacancyStatus::Hidden => Cell::new("◌ hidden").fg(Color::DarkGrey),
    }
}

fn print_detail(vacancy: &VacancyDetail, verb: &str, json: bool) -> Result<()> {
    if json {
        return print_json(vacancy);
    }

    println!();
    if !verb.is_empty() {
        println!("  {} Vacancy {verb}", style("✓").green().bold());
        println!();
    }
    println!("  {}  {}", style("Title:").bold(), style(&vacancy.title).cyan());
    println!("  {}  {}", style("Status:").bold(), vacancy.status);
    println!(
        "  {}  {}",
        style("Author:").bold(),
        vacancy.author.fullname
    );
    let skills = vacancy
        .skills
        .iter()
        .map(|s| s.name.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    println!(
        "  {}  {} (match {}%)",
        style("Skills:").bold(),
        if skills.is_empty() { "-" } else { skills.as_str() },
        vacancy.skills_matched_percent
    );
    if let Some(published) = vacancy.published_at {
        println!(
            "  {}  {}",
            style("Published:").bold(),
            published.format("%Y-%m-%d %H:%M")
        );
    }
    println!("  {}  {}", style("ID:").bold(), style(vacancy.id).dim());
    println!();
    Ok(())
}

fn print_list(vacancies: &Page<Vacancy>, json: bool) -> Result<()> {
    if json {
        return print_json(vacancies);
    }

    if vacancies.items.is_empty() {
        println!();
        println!("  No vacancies found.");
        println!();
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Title").fg(Color::White),
        Cell::new("Status").fg(Color::White),
        Cell::new("Skills").fg(Color::White),
        Cell::new("ID").fg(Color::White),
    ]);
    for vacancy in &vacancies.items {
        table.add_row(vec![
            Cell::new(&vacancy.title).fg(Color::Cyan),
            status_cell(vacancy.status),
            Cell::new(vacancy.skill_ids.len()),
            Cell::new(vacancy.id.to_string()).fg(Color::DarkGrey),
        ]);
    }

    println!();
    println!("{table}");
    println!(
        "  {}",
        style(format!("page {} · {} total", vacancies.page, vacancies.total)).dim()
    );
    println!();
    Ok(())
}
