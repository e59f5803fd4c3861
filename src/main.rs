mod cli;
mod server;
mod tools;

use anima::config::AnimaConfig;
use anima::memory::types::MemoryType;
use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "anima",
    version,
    about = "Memory, emotion and personality engine for companion characters"
)]
struct Cli {
    /// Config file (defaults to ~/.anima/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Start the MCP server
    Serve {
        /// Transport: stdio or http (defaults to server.transport)
        #[arg(long)]
        transport: Option<String>,
    },
    /// Rank a user's memories, optionally re-ranked by a query
    Search {
        /// User the memories belong to
        user_id: String,
        /// Text to re-rank by
        query: Option<String>,
        #[arg(long)]
        character: Option<String>,
        /// Only this memory type
        #[arg(long = "type")]
        memory_type: Option<MemoryType>,
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Show store-wide statistics
    Stats,
    /// Show one memory with its audit log
    Inspect {
        id: String,
    },
    /// Show a character's current emotion and recent history
    Mood {
        user_id: String,
        #[arg(long)]
        character: Option<String>,
        /// History window in hours
        #[arg(long)]
        hours: Option<u32>,
        /// Also score a move from the current emotion to this one
        #[arg(long)]
        target: Option<String>,
    },
    /// List a user's preferences grouped by topic
    Preferences {
        user_id: String,
        #[arg(long)]
        character: Option<String>,
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Show the context a character gets before replying
    Context {
        user_id: String,
        #[arg(long)]
        character: Option<String>,
    },
    /// Record one conversation turn
    Turn {
        user_id: String,
        /// What the user said
        user_message: String,
        /// What the character replied
        character_response: String,
        #[arg(long)]
        character: Option<String>,
        /// Emotion detected in the exchange
        #[arg(long)]
        emotion: Option<String>,
        /// Intensity of the detected emotion (default 0.5)
        #[arg(long)]
        intensity: Option<f64>,
        /// Importance of both memories (default 0.4)
        #[arg(long)]
        importance: Option<f64>,
        #[arg(long)]
        turn_id: Option<String>,
    },
    /// Extract keywords from a text
    Keywords {
        text: String,
        /// Maximum keywords (defaults to retrieval.max_keywords)
        #[arg(long)]
        max: Option<usize>,
    },
    /// Show a character's personality
    Personality {
        user_id: String,
        #[arg(long)]
        character: Option<String>,
        /// Seed a new character from a preset (tsundere, kuudere, genki, ...)
        #[arg(long)]
        preset: Option<String>,
    },
    /// Delete old, unimportant, rarely used memories
    Cleanup {
        /// Override maintenance.retention_days
        #[arg(long)]
        days: Option<u32>,
        /// List candidates without deleting
        #[arg(long)]
        dry_run: bool,
    },
    /// Dump memories, emotions and traits as JSON to stdout
    Export,
    /// Check database health
    Doctor,
    /// Delete all stored state
    Reset,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => AnimaConfig::load_from(path)?,
        None => AnimaConfig::load()?,
    };

    // Log to stderr so stdout stays clean for MCP JSON-RPC.
    let filter =
        EnvFilter::try_new(&config.server.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Serve { transport } => {
            let transport = transport.unwrap_or_else(|| config.server.transport.clone());
            match transport.as_str() {
                "stdio" => server::serve_stdio(config).await?,
                "http" => server::serve_http(config).await?,
                other => bail!("unknown transport '{other}' (expected stdio or http)"),
            }
        }
        Command::Search {
            user_id,
            query,
            character,
            memory_type,
            limit,
        } => cli::search::search(
            &config,
            cli::search::SearchArgs {
                user_id: &user_id,
                character: character.as_deref(),
                query: query.as_deref(),
                memory_type,
                limit,
            },
        )?,
        Command::Stats => cli::stats::stats(&config)?,
        Command::Inspect { id } => cli::inspect::inspect(&config, &id)?,
        Command::Mood {
            user_id,
            character,
            hours,
            target,
        } => cli::mood::mood(
            &config,
            &user_id,
            character.as_deref(),
            hours,
            target.as_deref(),
        )?,
        Command::Preferences {
            user_id,
            character,
            limit,
        } => cli::preferences::preferences(&config, &user_id, character.as_deref(), limit)?,
        Command::Context { user_id, character } => {
            cli::conversation::context(&config, &user_id, character.as_deref())?
        }
        Command::Turn {
            user_id,
            user_message,
            character_response,
            character,
            emotion,
            intensity,
            importance,
            turn_id,
        } => cli::conversation::turn(
            &config,
            cli::conversation::TurnArgs {
                user_id: &user_id,
                character: character.as_deref(),
                user_message,
                character_response,
                emotion,
                intensity,
                importance,
                turn_id,
            },
        )?,
        Command::Keywords { text, max } => cli::keywords::keywords(&config, &text, max)?,
        Command::Personality {
            user_id,
            character,
            preset,
        } => cli::personality::personality(
            &config,
            &user_id,
            character.as_deref(),
            preset.as_deref(),
        )?,
        Command::Cleanup { days, dry_run } => {
            cli::maintenance::cleanup(&config, days, dry_run)?
        }
        Command::Export => cli::export::export(&config)?,
        Command::Doctor => cli::doctor::doctor(&config)?,
        Command::Reset => cli::reset::reset(&config)?,
    }

    Ok(())
}
