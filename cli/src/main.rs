//! Striform CLI
//!
//! Build forms, fill them in and review responses from the terminal.
//!
//! # Usage
//!
//! ```bash
//! striform signup
//! striform forms create
//! striform build <form-id> title "Customer feedback"
//! striform build <form-id> add singleSelect "How did you hear about us?"
//! striform fill <form-id>
//! striform responses <form-id> --format json
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;
mod error;
mod output;

use config::{Config, DEFAULT_API_URL};
use error::CliResult;

#[derive(Parser)]
#[command(name = "striform")]
#[command(author = "Striform")]
#[command(version)]
#[command(about = "Striform Command Line Interface", long_about = None)]
struct Cli {
    /// API endpoint URL
    #[arg(long, env = "STRIFORM_API_URL")]
    api_url: Option<String>,

    /// Work from the local store only
    #[arg(long)]
    offline: bool,

    /// Output format
    #[arg(long, short)]
    format: Option<output::OutputFormat>,

    /// Profile name from config file
    #[arg(long, short)]
    profile: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage forms
    Forms {
        #[command(subcommand)]
        action: FormCommands,
    },
    /// Edit a form's content and style
    Build {
        /// Form ID
        form: String,
        #[command(subcommand)]
        action: BuildCommands,
    },
    /// Fill in a form interactively
    Fill {
        /// Form ID
        form: String,
        /// Walk through the form without recording anything
        #[arg(long)]
        preview: bool,
    },
    /// List responses collected for a form
    Responses {
        /// Form ID
        form: String,
        /// Include partial snapshots
        #[arg(long)]
        partial: bool,
    },
    /// Manage a form's integrations
    Integrations {
        /// Form ID
        form: String,
        #[command(subcommand)]
        action: IntegrationCommands,
    },
    /// Sign up as a form operator on this machine
    Signup {
        /// Clear the signed-up flag instead
        #[arg(long)]
        sign_out: bool,
    },
    /// Configure CLI
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum FormCommands {
    /// List all forms
    List,
    /// Create an untitled form
    Create,
    /// Show a form
    Show { id: String },
    /// Delete a form with its responses and integrations
    Delete { id: String },
    /// Push the local copy to the API
    Sync { id: String },
    /// Print the public link
    Share { id: String },
    /// Print an HTML embed snippet
    Embed { id: String },
}

#[derive(Subcommand)]
enum BuildCommands {
    /// Set the form title
    Title { text: String },
    /// Set or style the markdown description
    Description {
        /// Replace the description
        #[arg(long)]
        text: Option<String>,
        /// Remove the description
        #[arg(long, conflicts_with = "text")]
        clear: bool,
        /// Wrap a byte range as bold, e.g. 0..5
        #[arg(long, value_parser = parse_range)]
        bold: Option<std::ops::Range<usize>>,
        /// Wrap a byte range as italic
        #[arg(long, value_parser = parse_range)]
        italic: Option<std::ops::Range<usize>>,
        /// Wrap a byte range as a link
        #[arg(long, value_parser = parse_range)]
        link: Option<std::ops::Range<usize>>,
    },
    /// Colors, alignment, button and completion behaviour
    Style {
        #[arg(long)]
        title_color: Option<String>,
        #[arg(long)]
        question_color: Option<String>,
        #[arg(long)]
        description_color: Option<String>,
        #[arg(long)]
        button_color: Option<String>,
        /// left, center or right
        #[arg(long)]
        align: Option<String>,
        #[arg(long)]
        button_text: Option<String>,
        /// Where respondents go after submitting; empty clears it
        #[arg(long)]
        redirect_url: Option<String>,
        /// Record partial submissions (paid tier)
        #[arg(long)]
        capture_partial: Option<bool>,
    },
    /// Append a question
    Add {
        /// Question type tag, e.g. text, singleSelect, fileUpload
        kind: String,
        /// Question text
        prompt: Option<String>,
        /// Body for statement blocks
        #[arg(long)]
        statement: Option<String>,
    },
    /// Edit a question
    Update {
        /// Question ID
        question: String,
        #[arg(long = "type")]
        kind: Option<String>,
        #[arg(long)]
        prompt: Option<String>,
        /// Comma-separated options
        #[arg(long, value_delimiter = ',')]
        options: Option<Vec<String>>,
        #[arg(long)]
        statement: Option<String>,
        #[arg(long)]
        image_url: Option<String>,
        /// stack, split or wallpaper
        #[arg(long)]
        image_placement: Option<String>,
        /// left or right
        #[arg(long)]
        image_position: Option<String>,
        #[arg(long)]
        max_files: Option<u32>,
        /// Comma-separated MIME types, wildcards or extensions
        #[arg(long, value_delimiter = ',')]
        accept: Option<Vec<String>>,
        /// Bytes
        #[arg(long)]
        max_file_size: Option<u64>,
    },
    /// Remove a question
    Remove { question: String },
    /// Move the question at one position to another (zero-based)
    Move { from: usize, to: usize },
}

#[derive(Subcommand)]
enum IntegrationCommands {
    /// List integrations and their state
    List,
    /// Connect an integration to a URL
    Connect { kind: String, url: String },
    /// Disconnect an integration
    Disconnect { kind: String },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Set configuration value
    Set { key: String, value: String },
    /// Get configuration value
    Get { key: String },
    /// List all configuration
    List,
    /// Initialize configuration
    Init,
}

fn parse_range(s: &str) -> Result<std::ops::Range<usize>, String> {
    let (start, end) = s
        .split_once("..")
        .ok_or_else(|| format!("expected START..END, got {}", s))?;
    let start = start.trim().parse().map_err(|_| format!("bad range start: {}", start))?;
    let end = end.trim().parse().map_err(|_| format!("bad range end: {}", end))?;
    Ok(start..end)
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> CliResult<()> {
    if let Commands::Config { action } = cli.command {
        return commands::config::handle(action, cli.profile.as_deref()).await;
    }

    let config = Config::load(cli.profile.as_deref())?;
    let format = cli
        .format
        .or_else(|| {
            config
                .default_format
                .as_deref()
                .and_then(|f| <output::OutputFormat as clap::ValueEnum>::from_str(f, true).ok())
        })
        .unwrap_or_default();
    let api_url = (!cli.offline).then(|| {
        cli.api_url
            .clone()
            .or_else(|| config.api_url.clone())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string())
    });

    let ctx = commands::Context::open(config, api_url.as_deref(), format)?;

    match cli.command {
        Commands::Forms { action } => commands::forms::handle(action, &ctx).await,
        Commands::Build { form, action } => commands::build::handle(&form, action, &ctx).await,
        Commands::Fill { form, preview } => commands::fill::handle(&form, preview, &ctx).await,
        Commands::Responses { form, partial } => commands::responses::handle(&form, partial, &ctx).await,
        Commands::Integrations { form, action } => {
            commands::integrations::handle(&form, action, &ctx).await
        }
        Commands::Signup { sign_out } => commands::signup::handle(&ctx, sign_out).await,
        Commands::Config { .. } => Ok(()),
    }
}
