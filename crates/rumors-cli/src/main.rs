#![forbid(unsafe_code)]

mod cmd;
mod identity;
mod output;

use clap::{CommandFactory, Parser, Subcommand};
use output::OutputMode;
use rumors_core::config;
use rumors_core::error::ErrorCode;
use std::env;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "rumors: browse fact-check article listings",
    long_about = None
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON output instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    /// Output format; overrides --json, FORMAT, and the config file.
    #[arg(long, global = true, value_enum)]
    format: Option<OutputMode>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        next_help_heading = "Listing",
        about = "Show the ListArticles variables for a listing",
        long_about = "Translate list-page query parameters into ListArticles variables without fetching.",
        after_help = "EXAMPLES:\n    # Variables for a shared page URL\n    rumors vars --url 'https://cofacts.tw/articles?filters=askedManyTimes'\n\n    # Replies page, ordered by request count\n    rumors vars --page replies --order-by replyRequestCount"
    )]
    Vars(cmd::vars::VarsArgs),

    #[command(
        next_help_heading = "Listing",
        about = "Fetch and print an article listing",
        long_about = "Fetch a listing from the GraphQL API, loading up to --pages pages.",
        after_help = "EXAMPLES:\n    # First page of the default listing\n    rumors list\n\n    # Three pages of unanswered articles as JSON\n    rumors list --filters NO_USEFUL_REPLY_YET --pages 3 --json"
    )]
    List(cmd::list::ListArgs),

    #[command(
        next_help_heading = "Setup",
        about = "Generate shell completion scripts",
        after_help = "EXAMPLES:\n    # Bash completions\n    rumors completions bash > ~/.local/share/bash-completion/completions/rumors"
    )]
    Completions(cmd::completions::CompletionsArgs),
}

impl Cli {
    fn user_flag(&self) -> Option<&str> {
        match &self.command {
            Commands::Vars(args) => args.listing.user.as_deref(),
            Commands::List(args) => args.listing.user.as_deref(),
            Commands::Completions(_) => None,
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("RUMORS_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if env::var("DEBUG").is_ok() {
            "rumors=debug,rumors_core=debug,info"
        } else {
            "rumors=info,rumors_core=info,warn"
        })
    });

    let format = env::var("RUMORS_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}

fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();

    if cli.verbose {
        info!("Verbose mode enabled");
    }

    let effective = match config::resolve_config(cli.json) {
        Ok(effective) => effective,
        Err(err) => {
            let mode = cli.format.unwrap_or(OutputMode::Text);
            let message = format!("{err:#}");
            output::render_error(
                mode,
                &output::CliError::with_code(message, ErrorCode::ConfigParseError),
            )?;
            return Err(err);
        }
    };
    let output = output::resolve_output_mode(cli.format, &effective.resolved_output);
    let user = identity::resolve_user(cli.user_flag(), effective.client.user.id.as_deref());
    debug!(?output, identified = user.is_some(), "resolved invocation");

    match cli.command {
        Commands::Vars(ref args) => cmd::vars::run_vars(args, user.as_deref(), output),
        Commands::List(ref args) => {
            cmd::list::run_list(args, user.as_deref(), &effective.client.api, output)
        }
        Commands::Completions(args) => {
            let mut command = Cli::command();
            cmd::completions::run_completions(args.shell, &mut command)
        }
    }
}
