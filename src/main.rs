//! # MediFind CLI (`medifind`)
//!
//! Starts the HTTP API or runs the search pipeline directly from the
//! terminal against the same dataset.
//!
//! ## Usage
//!
//! ```bash
//! medifind --config ./config/medifind.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `medifind serve` | Start the HTTP API |
//! | `medifind search "<query>"` | Search medicines, cheapest first |
//! | `medifind pharmacies` | List pharmacies, optionally by location |
//! | `medifind alternatives "<name>"` | Suggest substitute medicines |
//! | `medifind check` | Report dataset sizes and dangling references |

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use medifind::{alternatives, check, config, data, pharmacies, search, server};

const DEFAULT_CONFIG: &str = "./config/medifind.toml";

/// MediFind: medicine price and availability search across pharmacies.
#[derive(Parser)]
#[command(
    name = "medifind",
    about = "MediFind: search medicine prices and availability across pharmacies",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    ///
    /// If the default path does not exist, built-in defaults are used.
    /// A path given explicitly must exist.
    #[arg(long, global = true, default_value = DEFAULT_CONFIG)]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP API.
    ///
    /// Binds to `[server].bind` (or `PORT`) and serves `/api/health`,
    /// `/api/pharmacies`, `/api/medicines/search` and `/api/ai/alternatives`.
    Serve,

    /// Search medicines by name or generic name.
    Search {
        /// Query text. Multi-word queries match when every word appears.
        query: String,

        /// Only show pharmacies whose location contains this text.
        #[arg(long)]
        location: Option<String>,

        /// Print JSON instead of a table.
        #[arg(long)]
        json: bool,
    },

    /// List pharmacies.
    Pharmacies {
        /// Only show pharmacies whose location contains this text.
        #[arg(long)]
        location: Option<String>,

        /// Print JSON instead of a table.
        #[arg(long)]
        json: bool,
    },

    /// Suggest substitutes for a medicine.
    Alternatives {
        /// Medicine name.
        name: String,

        /// Print JSON instead of a list.
        #[arg(long)]
        json: bool,
    },

    /// Validate the dataset and report dangling inventory references.
    Check,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so command output on stdout stays parseable.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("medifind=info,tower_http=info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    let cfg = if cli.config == PathBuf::from(DEFAULT_CONFIG) {
        config::load_config_or_default(&cli.config)?
    } else {
        config::load_config(&cli.config)?
    };
    let dataset = data::load_dataset(&cfg)?;

    match cli.command {
        Commands::Serve => {
            server::run_server(&cfg, dataset).await?;
        }
        Commands::Search {
            query,
            location,
            json,
        } => {
            search::run_search(&dataset, &query, location.as_deref(), json)?;
        }
        Commands::Pharmacies { location, json } => {
            pharmacies::run_pharmacies(&dataset, location.as_deref(), json)?;
        }
        Commands::Alternatives { name, json } => {
            alternatives::run_alternatives(&dataset, &name, json)?;
        }
        Commands::Check => {
            check::run_check(&dataset)?;
        }
    }

    Ok(())
}
