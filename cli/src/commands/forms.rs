//! Form dashboard commands

use colored::Colorize;
use serde::Serialize;
use striform_core::library::{embed_code, share_url};
use striform_core::Form;
use tabled::Tabled;

use super::Context;
use crate::error::CliResult;
use crate::FormCommands;

#[derive(Debug, Serialize, Tabled)]
pub struct FormRow {
    pub id: String,
    pub title: String,
    pub questions: usize,
    pub responses: u64,
}

impl From<&Form> for FormRow {
    fn from(form: &Form) -> Self {
        Self {
            id: form.id.clone(),
            title: form.title.clone(),
            questions: form.questions.len(),
            responses: form.response_count,
        }
    }
}

pub async fn handle(action: FormCommands, ctx: &Context) -> CliResult<()> {
    match action {
        FormCommands::List => {
            let rows: Vec<FormRow> = ctx.library.forms()?.iter().map(FormRow::from).collect();
            if rows.is_empty() {
                println!("No forms yet. Create one with `striform forms create`.");
            } else {
                ctx.format.print_rows(&rows);
            }
        }
        FormCommands::Create => {
            ctx.require_signup()?;
            let form = ctx.library.create_form().await?;
            println!("Created form: {}", form.id.green());
        }
        FormCommands::Show { id } => {
            let form = ctx.library.load_form(&id).await?;
            ctx.format.print(&form);
        }
        FormCommands::Delete { id } => {
            ctx.require_signup()?;
            if ctx.library.delete_form(&id).await? {
                println!("Deleted form: {}", id);
            } else {
                println!("{} form {} was not stored locally", "warning:".yellow(), id);
            }
        }
        FormCommands::Sync { id } => {
            if ctx.library.sync_form(&id).await? {
                println!("Synced form: {}", id.green());
            } else {
                println!("{} API unreachable, form {} kept locally", "warning:".yellow(), id);
            }
        }
        FormCommands::Share { id } => {
            println!("{}", share_url(ctx.config.app_url(), &id));
        }
        FormCommands::Embed { id } => {
            println!("{}", embed_code(ctx.config.app_url(), &id));
        }
    }
    Ok(())
}
