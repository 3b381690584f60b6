//! CLI frontend for the oracle spread engine.

mod commands;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

use commands::Context;
use oracle_spread::config::DEFAULT_ENDPOINT;

#[derive(Parser)]
#[command(
    name = "oracle",
    about = "Oracle card spreads: draw, interpret, and journal",
    version,
    propagate_version = true
)]
struct Cli {
    /// Directory where saved spreads and the daily draw are kept
    #[arg(long, global = true, env = "ORACLE_DATA_DIR", default_value = ".oracle")]
    data_dir: PathBuf,

    /// Load the deck from a JSON file instead of the built-in deck
    #[arg(long, global = true)]
    deck: Option<PathBuf>,

    /// Unlock premium spreads and cards
    #[arg(long, global = true)]
    premium: bool,

    /// Bearer token for the interpretation service
    #[arg(long, global = true, env = "ORACLE_API_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Interpretation service endpoint
    #[arg(long, global = true, env = "ORACLE_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
    endpoint: String,

    /// RNG seed for reproducible draws
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Log engine activity to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Draw a spread, choosing each card by number
    Draw {
        /// Spread type: daily, three, seasonal, growth
        spread: String,

        /// Astrological context passed along to the interpreter
        #[arg(short, long)]
        context: Option<String>,
    },

    /// Draw today's single card (once per calendar day)
    Daily {
        /// Record the draw as part of onboarding
        #[arg(long)]
        onboarding: bool,
    },

    /// List saved spreads, newest first
    List,

    /// Show a saved spread
    Show {
        /// Spread id or unique id prefix
        id: String,

        /// Output format: text, md
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Set the journal entry of a saved spread (empty text clears it)
    Journal {
        /// Spread id or unique id prefix
        id: String,

        /// Journal text
        text: String,
    },

    /// Delete a saved spread
    Delete {
        /// Spread id or unique id prefix
        id: String,
    },
}

fn init_tracing(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_env("ORACLE_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    // A second subscriber can only come from a test harness; keep the first.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let ctx = Context {
        data_dir: cli.data_dir,
        deck: cli.deck,
        premium: cli.premium,
        token: cli.token,
        endpoint: cli.endpoint,
        seed: cli.seed,
    };

    let result = match cli.command {
        Commands::Draw { spread, context } => {
            commands::draw::run(&ctx, &spread, context.as_deref()).await
        }
        Commands::Daily { onboarding } => commands::daily::run(&ctx, onboarding).await,
        Commands::List => commands::list::run(&ctx),
        Commands::Show { id, format } => commands::show::run(&ctx, &id, &format),
        Commands::Journal { id, text } => commands::journal::run(&ctx, &id, &text),
        Commands::Delete { id } => commands::delete::run(&ctx, &id),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
