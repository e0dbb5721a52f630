//! Integration commands

use colored::Colorize;
use serde::Serialize;
use striform_core::{IntegrationKind, Integrations};
use tabled::Tabled;

use super::Context;
use crate::error::{CliError, CliResult};
use crate::IntegrationCommands;

#[derive(Debug, Serialize, Tabled)]
pub struct IntegrationRow {
    pub id: &'static str,
    pub name: &'static str,
    pub connected: bool,
    pub url: String,
}

pub fn rows(integrations: &Integrations) -> Vec<IntegrationRow> {
    IntegrationKind::ALL
        .iter()
        .map(|&kind| IntegrationRow {
            id: kind.id(),
            name: kind.name(),
            connected: integrations.is_connected(kind),
            url: integrations.url(kind).unwrap_or_default().to_string(),
        })
        .collect()
}

fn parse_kind(value: &str) -> CliResult<IntegrationKind> {
    value.parse().map_err(CliError::Invalid)
}

pub async fn handle(form_id: &str, action: IntegrationCommands, ctx: &Context) -> CliResult<()> {
    ctx.require_signup()?;
    match action {
        IntegrationCommands::List => {
            let integrations = ctx.library.integrations(form_id)?;
            ctx.format.print_rows(&rows(&integrations));
        }
        IntegrationCommands::Connect { kind, url } => {
            let kind = parse_kind(&kind)?;
            let integrations = ctx.library.connect_integration(form_id, kind, url)?;
            if integrations.is_connected(kind) {
                println!("{} connected", kind.name().green());
                println!("{}", kind.instructions());
            } else {
                println!("{} disconnected (empty URL)", kind.name());
            }
        }
        IntegrationCommands::Disconnect { kind } => {
            let kind = parse_kind(&kind)?;
            ctx.library.disconnect_integration(form_id, kind)?;
            println!("{} disconnected", kind.name());
        }
    }
    Ok(())
}
