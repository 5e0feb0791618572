//! # Policy Grounding CLI (`ground`)
//!
//! ## Usage
//!
//! ```bash
//! ground --config ./config/ground.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `ground sources` | List corpus documents (no embedding) |
//! | `ground search "<query>"` | Rank corpus documents against a query |
//! | `ground context "<question>"` | Print the grounding block and citations |

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use policy_grounding::{config, grounding, search, sources};

/// Policy Grounding CLI: ground questions in a small corpus of policy
/// documents with embedding-based retrieval.
#[derive(Parser)]
#[command(
    name = "ground",
    about = "Ground questions in a small corpus of policy documents",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./config/ground.toml")]
    config: PathBuf,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List corpus documents with their ids and titles.
    ///
    /// Reads the corpus directory only; nothing is embedded.
    Sources,

    /// Rank corpus documents against a query.
    ///
    /// Embeds the corpus on first use, then prints the top `k` snippets
    /// with their cosine similarity scores.
    Search {
        /// Free-text query.
        query: String,

        /// Number of snippets to return (defaults to `retrieval.default_k`).
        #[arg(short = 'k', long, allow_hyphen_values = true)]
        k: Option<i64>,

        /// Print results as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Print the numbered notes block and citations for a question.
    Context {
        /// The user's question.
        question: String,

        /// Number of snippets to include (defaults to `retrieval.default_k`).
        #[arg(short = 'k', long, allow_hyphen_values = true)]
        k: Option<i64>,

        /// Print the block and citations as JSON.
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("fatal: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let cfg = config::load_config(&cli.config)?;

    match cli.command {
        Commands::Sources => sources::list_sources(&cfg)?,
        Commands::Search { query, k, json } => search::run_search(&cfg, &query, k, json).await?,
        Commands::Context { question, k, json } => {
            grounding::run_context(&cfg, &question, k, json).await?
        }
    }

    Ok(())
}
