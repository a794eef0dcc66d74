//! API key CLI subcommands.

use anyhow::{Result, bail};
use clap::Subcommand;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;
use uuid::Uuid;

use proofwork_types::principal::{Principal, Role};

use crate::cli::{operator, print_json};
use crate::state::AppState;

/// API key subcommands.
#[derive(Subcommand)]
pub enum KeyCommand {
    /// Issue a key bound to a principal. The key is shown once.
    Issue {
        /// Label for the key.
        #[arg(long)]
        name: String,

        /// talent, sponsor or admin.
        #[arg(long)]
        role: Role,

        /// ID of the talent or sponsor the key acts as. Omit for admin keys.
        #[arg(long)]
        id: Option<Uuid>,
    },

    /// List issued keys (metadata only).
    #[command(alias = "ls")]
    List,
}

/// Handle a key subcommand.
pub async fn handle_key_command(cmd: KeyCommand, state: &AppState, json: bool) -> Result<()> {
    match cmd {
        KeyCommand::Issue { name, role, id } => {
            let principal = match (role, id) {
                (Role::Admin, None) => operator(),
                (_, Some(id)) => Principal { id, role },
                (_, None) => bail!("--id is required for {role} keys"),
            };
            let issued = state.api_keys.issue(&name, &principal).await?;

            if json {
                return print_json(&issued);
            }
            println!();
            println!(
                "  {} API key issued (save this -- it won't be shown again):",
                style("🔑").bold()
            );
            println!();
            println!("  {}", style(&issued.key).yellow().bold());
            println!();
            Ok(())
        }
        KeyCommand::List => {
            let keys = state.api_keys.list().await?;
            if json {
                return print_json(&keys);
            }

            let mut table = Table::new();
            table.load_preset(presets::UTF8_FULL_CONDENSED);
            table.set_content_arrangement(ContentArrangement::Dynamic);
            table.set_header(vec![
                Cell::new("Name").fg(Color::White),
                Cell::new("Role").fg(Color::White),
                Cell::new("Principal").fg(Color::White),
                Cell::new("Last Used").fg(Color::White),
            ]);
            for key in &keys {
                let last_used = key
                    .last_used_at
                    .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                    .unwrap_or_else(|| "never".to_string());
                table.add_row(vec![
                    Cell::new(&key.name).fg(Color::Cyan),
                    Cell::new(key.principal.role),
                    Cell::new(key.principal.id.to_string()).fg(Color::DarkGrey),
                    Cell::new(last_used),
                ]);
            }

            println!();
            println!("{table}");
            println!();
            Ok(())
        }
    }
}
