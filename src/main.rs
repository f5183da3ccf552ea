//! # Yojana Sahayak CLI (`sahayak`)
//!
//! The `sahayak` binary manages the welfare-scheme assistant: database
//! initialization, sample-data seeding, scheme search, language
//! detection, and the JSON API server.
//!
//! ## Usage
//!
//! ```bash
//! sahayak --config ./config/sahayak.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `sahayak init` | Create the SQLite database and run schema migrations |
//! | `sahayak seed` | Upsert the sample scheme records (idempotent) |
//! | `sahayak detect "<text>"` | Detect the language of a text |
//! | `sahayak schemes` | Search schemes from the terminal |
//! | `sahayak serve api` | Start the JSON API server |

mod assistant;
mod chat;
mod config;
mod db;
mod detect;
mod error;
mod language;
mod migrate;
mod models;
mod prompts;
mod server;
mod store;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::language::LanguageCode;
use crate::models::SchemeQuery;

/// Yojana Sahayak — a multilingual assistant for discovering Indian
/// government welfare schemes.
///
/// All commands accept a `--config` flag pointing to a TOML configuration
/// file. See `config/sahayak.example.toml` for a full example.
#[derive(Parser)]
#[command(
    name = "sahayak",
    about = "Yojana Sahayak — a multilingual assistant for Indian government welfare schemes",
    version,
    long_about = "Yojana Sahayak serves a JSON API for a citizen-facing chat assistant: \
    a SQLite-backed welfare scheme repository, a generative-model client for query \
    understanding and response generation, and a heuristic script/keyword language detector."
)]
struct Cli {
    /// Path to configuration file (TOML).
    ///
    /// Defaults to `./config/sahayak.toml`. Database, server, and
    /// assistant settings are read from this file.
    #[arg(long, global = true, default_value = "./config/sahayak.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Initialize the database schema.
    ///
    /// Creates the SQLite database file and the schemes table. This
    /// command is idempotent — running it multiple times is safe.
    Init,

    /// Upsert the sample scheme records.
    ///
    /// Seeds the repository with one scheme per category. Keyed on the
    /// English scheme name, so reseeding never duplicates rows.
    Seed,

    /// Detect the language of a text.
    ///
    /// Runs the heuristic script/keyword detector and prints the winning
    /// language with its confidence. Works without a config file.
    Detect {
        /// The text to analyze.
        text: String,
    },

    /// Search schemes from the terminal.
    ///
    /// With no filters, lists every active scheme. Search results are
    /// capped at 10.
    Schemes {
        /// Keyword matched against scheme names and descriptions.
        #[arg(long)]
        query: Option<String>,

        /// Exact category filter (agriculture, education, health, ...).
        #[arg(long)]
        category: Option<String>,

        /// State filter; nationwide schemes always match.
        #[arg(long)]
        state: Option<String>,

        /// Language for the displayed names and descriptions.
        #[arg(long, default_value = "en")]
        language: String,
    },

    /// Start a server.
    Serve {
        #[command(subcommand)]
        service: ServeService,
    },
}

/// Server subcommands.
#[derive(Subcommand)]
enum ServeService {
    /// Start the JSON API server.
    ///
    /// Binds to the address configured in `[server].bind` (overridable
    /// with the PORT environment variable) and serves the chat and
    /// scheme endpoints.
    Api,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    // Detect works without a config file.
    if let Commands::Detect { text } = &cli.command {
        let result = detect::detect(text);
        println!(
            "{} ({}) confidence={:.2}",
            result.language,
            result.language.english_name(),
            result.confidence
        );
        return Ok(());
    }

    let cfg = config::load_config(&cli.config)?;

    match cli.command {
        Commands::Init => {
            migrate::run_migrations(&cfg).await?;
            println!("Database initialized successfully.");
        }
        Commands::Seed => {
            let pool = db::connect(&cfg.db).await?;
            migrate::apply(&pool).await?;
            let count = store::seed(&pool).await?;
            pool.close().await;
            println!("Seeded {} schemes.", count);
        }
        Commands::Schemes {
            query,
            category,
            state,
            language,
        } => {
            let lang = LanguageCode::from_code(&language)
                .ok_or_else(|| anyhow::anyhow!("Unknown language code: {}", language))?;

            let pool = db::connect(&cfg.db).await?;
            let params = SchemeQuery {
                query,
                category,
                state,
            };
            let schemes = if params.is_empty() {
                store::all_active(&pool).await?
            } else {
                store::search(&pool, &params).await?
            };
            pool.close().await;

            if schemes.is_empty() {
                println!("No schemes found.");
            } else {
                for scheme in &schemes {
                    println!(
                        "{}  [{}]  {}",
                        scheme.id,
                        scheme.category.as_str(),
                        scheme.name.get(lang)
                    );
                    println!("    {}", scheme.description.get(lang));
                }
                println!("{} scheme(s).", schemes.len());
            }
        }
        Commands::Serve { service } => match service {
            ServeService::Api => {
                server::run_server(&cfg).await?;
            }
        },
        Commands::Detect { .. } => {
            // Handled above (before config loading)
            unreachable!()
        }
    }

    Ok(())
}
