//! Sponsor account CLI subcommands: register, top up, show.

use anyhow::Result;
use clap::Subcommand;
use console::style;

use proofwork_types::sponsor::{CreateSponsorRequest, SponsorId};

use crate::cli::print_json;
use crate::state::AppState;

/// Sponsor subcommands.
#[derive(Subcommand)]
pub enum SponsorCommand {
    /// Register a sponsor with an opening kudos balance.
    Add {
        /// Full name.
        #[arg(long)]
        name: String,

        /// Avatar URL.
        #[arg(long)]
        avatar: Option<String>,

        /// Opening kudos balance.
        #[arg(long, default_value = "0")]
        kudos: i64,
    },

    /// Credit kudos to a sponsor's balance.
    #[command(name = "top-up")]
    TopUp {
        /// Sponsor ID.
        id: SponsorId,

        /// Amount to credit (positive).
        amount: i64,
    },

    /// Show a sponsor and its current balance.
    Show {
        /// Sponsor ID.
        id: SponsorId,
    },
}

/// Handle a sponsor subcommand.
pub async fn handle_sponsor_command(
    cmd: SponsorCommand,
    state: &AppState,
    json: bool,
) -> Result<()> {
    match cmd {
        SponsorCommand::Add {
            name,
            avatar,
            kudos,
        } => {
            let sponsor = state
                .profiles
                .register_sponsor(CreateSponsorRequest {
                    fullname: name,
                    avatar,
                    kudos,
                })
                .await?;
            if json {
                return print_json(&sponsor);
            }
            println!();
            println!(
                "  {} Sponsor {} registered with {} kudos",
                style("✓").green().bold(),
                style(&sponsor.fullname).cyan(),
                style(sponsor.kudos).yellow()
            );
            println!("  {}  {}", style("ID:").bold(), style(sponsor.id).dim());
            println!();
            Ok(())
        }
        SponsorCommand::TopUp { id, amount } => {
            let balance = state.kudos_ledger.increase_kudos(&id, amount).await?;
            if json {
                return print_json(&serde_json::json!({
                    "sponsor_id": id,
                    "credited": amount,
                    "balance": balance,
                }));
            }
            println!();
            println!(
                "  {} Credited {} kudos, balance is now {}",
                style("✓").green().bold(),
                amount,
                style(balance).yellow().bold()
            );
            println!();
            Ok(())
        }
        SponsorCommand::Show { id } => {
            let sponsor = state.profiles.get_sponsor(&id).await?;
            if json {
                return print_json(&sponsor);
            }
            println!();
            println!("  {}  {}", style("Name:").bold(), style(&sponsor.fullname).cyan());
            println!("  {}  {}", style("Kudos:").bold(), style(sponsor.kudos).yellow());
            if let Some(avatar) = &sponsor.avatar {
                println!("  {}  {}", style("Avatar:").bold(), avatar);
            }
            println!(
                "  {}  {}",
                style("Since:").bold(),
                sponsor.created_at.format("%Y-%m-%d %H:%M")
            );
            println!("  {}  {}", style("ID:").bold(), style(sponsor.id).dim());
            println!();
            Ok(())
        }
    }
}
