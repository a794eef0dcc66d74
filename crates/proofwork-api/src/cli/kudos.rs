//! Kudos CLI subcommands: post, history, endorsed proofs, ledger verification.

use anyhow::{Context, Result, bail};
use clap::Subcommand;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;

use proofwork_core::service::page_request;
use proofwork_types::kudos::{KudosLine, KudosedProofOrder};
use proofwork_types::principal::Principal;
use proofwork_types::proof::ProofId;
use proofwork_types::sponsor::SponsorId;

use crate::cli::{print_json, resolve_skill_ref};
use crate::state::AppState;

/// Kudos subcommands.
#[derive(Subcommand)]
pub enum KudosCommand {
    /// Spend kudos on a published proof.
    Post {
        /// Sponsor spending the kudos.
        #[arg(long)]
        sponsor: SponsorId,

        /// Proof ID.
        proof: ProofId,

        /// Skill lines as SKILL=AMOUNT (skill by name or ID).
        #[arg(required = true)]
        lines: Vec<String>,
    },

    /// A sponsor's submission history on a proof, newest first.
    History {
        #[arg(long)]
        sponsor: SponsorId,

        /// Proof ID.
        proof: ProofId,

        #[arg(long)]
        page: Option<u32>,

        #[arg(long)]
        size: Option<u32>,
    },

    /// Proofs a sponsor has endorsed.
    Proofs {
        #[arg(long)]
        sponsor: SponsorId,

        /// Sort order: newest or total.
        #[arg(long, default_value = "newest")]
        sort: KudosedProofOrder,

        #[arg(long)]
        page: Option<u32>,

        #[arg(long)]
        size: Option<u32>,
    },

    /// Compare a proof's cached kudos totals against the ledger.
    Verify {
        /// Proof ID.
        proof: ProofId,
    },
}

/// Handle a kudos subcommand.
pub async fn handle_kudos_command(cmd: KudosCommand, state: &AppState, json: bool) -> Result<()> {
    match cmd {
        KudosCommand::Post {
            sponsor,
            proof,
            lines,
        } => post(state, sponsor, proof, &lines, json).await,
        KudosCommand::History {
            sponsor,
            proof,
            page,
            size,
        } => history(state, sponsor, proof, page, size, json).await,
        KudosCommand::Proofs {
            sponsor,
            sort,
            page,
            size,
        } => proofs(state, sponsor, sort, page, size, json).await,
        KudosCommand::Verify { proof } => verify(state, proof, json).await,
    }
}

/// Split a `SKILL=AMOUNT` argument.
fn split_line(raw: &str) -> Result<(&str, i64)> {
    let (skill, amount) = raw
        .rsplit_once('=')
        .with_context(|| format!("Invalid kudos line '{raw}', expected SKILL=AMOUNT"))?;
    let skill = skill.trim();
    if skill.is_empty() {
        bail!("Invalid kudos line '{raw}', skill is empty");
    }
    let amount = amount
        .trim()
        .parse::<i64>()
        .with_context(|| format!("Invalid amount in kudos line '{raw}'"))?;
    Ok((skill, amount))
}

async fn post(
    state: &AppState,
    sponsor: SponsorId,
    proof: ProofId,
    raw_lines: &[String],
    json: bool,
) -> Result<()> {
    let mut lines = Vec::with_capacity(raw_lines.len());
    for raw in raw_lines {
        let (skill, amount) = split_line(raw)?;
        lines.push(KudosLine::new(resolve_skill_ref(state, skill).await?, amount));
    }

    let receipt = state
        .kudos_ledger
        .post_kudos(&Principal::sponsor(sponsor), &proof, &lines)
        .await?;

    if json {
        return print_json(&receipt);
    }

    let spent: i64 = lines.iter().map(|l| l.amount).sum();
    println!();
    println!(
        "  {} Posted {} kudos across {} skill(s)",
        style("✓").green().bold(),
        style(spent).yellow().bold(),
        lines.len()
    );
    println!(
        "  {}  {}",
        style("Proof total:").bold(),
        receipt.current_count_kudos
    );
    println!(
        "  {}  {}",
        style("Your total:").bold(),
        receipt.current_sum_kudos_by_sponsor
    );
    println!(
        "  {}  {}",
        style("Balance:").bold(),
        style(receipt.current_sponsor_balance).yellow()
    );
    println!();
    Ok(())
}

async fn history(
    state: &AppState,
    sponsor: SponsorId,
    proof: ProofId,
    page: Option<u32>,
    size: Option<u32>,
    json: bool,
) -> Result<()> {
    let request = page_request(&state.config, page, size);
    let history = state
        .endorsement
        .history(&Principal::sponsor(sponsor), &sponsor, &proof, request)
        .await?;

    if json {
        return print_json(&history);
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Sent").fg(Color::White),
        Cell::new("Kudos").fg(Color::White),
    ]);
    for item in &history.items {
        table.add_row(vec![
            Cell::new(item.sent_at.format("%Y-%m-%d %H:%M:%S").to_string()),
            Cell::new(item.kudos).fg(Color::Yellow),
        ]);
    }

    println!();
    println!("{table}");
    println!(
        "  {}",
        style(format!(
            "page {} · {} of {} submission(s)",
            history.page,
            history.items.len(),
            history.total
        ))
        .dim()
    );
    println!();
    Ok(())
}

async fn proofs(
    state: &AppState,
    sponsor: SponsorId,
    sort: KudosedProofOrder,
    page: Option<u32>,
    size: Option<u32>,
    json: bool,
) -> Result<()> {
    let request = page_request(&state.config, page, size);
    let proofs = state
        .endorsement
        .ranked_proofs(&Principal::sponsor(sponsor), &sponsor, request, sort)
        .await?;

    if json {
        return print_json(&proofs);
    }

    if proofs.items.is_empty() {
        println!();
        println!("  No endorsed proofs yet.");
        println!();
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Title").fg(Color::White),
        Cell::new("Your Kudos").fg(Color::White),
        Cell::new("Last Sent").fg(Color::White),
        Cell::new("ID").fg(Color::White),
    ]);
    for proof in &proofs.items {
        table.add_row(vec![
            Cell::new(&proof.title).fg(Color::Cyan),
            Cell::new(proof.total_kudos_from_sponsor).fg(Color::Yellow),
            Cell::new(proof.sent_at.format("%Y-%m-%d %H:%M").to_string()),
            Cell::new(proof.proof_id.to_string()).fg(Color::DarkGrey),
        ]);
    }

    println!();
    println!("{table}");
    println!(
        "  {}",
        style(format!("sorted by {sort} · {} total", proofs.total)).dim()
    );
    println!();
    Ok(())
}

async fn verify(state: &AppState, proof: ProofId, json: bool) -> Result<()> {
    let report = state.endorsement.verify_totals(&proof).await?;

    if json {
        print_json(&serde_json::json!({
            "proof_id": report.proof_id,
            "cached": report.cached,
            "ledger": report.ledger,
            "consistent": report.is_consistent(),
        }))?;
    } else {
        println!();
        let mark = if report.is_consistent() {
            style("✓").green().bold()
        } else {
            style("✗").red().bold()
        };
        println!("  {mark} Ledger check for proof {}", style(proof).dim());
        println!("  {}  {}", style("Cached:").bold(), report.cached);
        println!("  {}  {}", style("Ledger:").bold(), report.ledger);
        println!();
    }

    if !report.is_consistent() {
        bail!(
            "kudos totals diverge for proof {proof}: cached {} vs ledger {}",
            report.cached,
            report.ledger
        );
    }
    Ok(())
}
