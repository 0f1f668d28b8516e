//! # Stowage CLI Module
//!
//! This module implements the CLI interface for stowage.
//!
//! ## Available Commands
//!
//! - `server` - Start the HTTP server
//! - `import` - Import character records from a JSON file
//! - `list` - List stored characters
//! - `sheet` - Prepare a sheet and sync the `encumbered` condition
//! - `toggle` - Flip a condition on a character
//! - `stow` / `unstow` / `activate` - Change an item's active state
//! - `indicator` - Draw a level indicator
//! - `check` - Check whether an actor kind may own an item type

mod commands;

use crate::config::AppConfig;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use stowage_core::{ActiveState, StowageError};

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// Stowage - inventory and encumbrance rules for tabletop character sheets
#[derive(Parser, Debug)]
#[command(name = "stowage")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress banner output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to the roster database
    #[arg(short = 'D', long, global = true, default_value = "stowage.redb")]
    pub database: PathBuf,

    /// Storage backend: "redb" (ACID database) or "memory" (discarded on exit)
    #[arg(short = 'B', long, global = true, default_value = "redb")]
    pub backend: String,

    /// Path to a TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start HTTP server
    Server {
        /// Host to bind to (overrides the config file)
        #[arg(short = 'H', long)]
        host: Option<String>,

        /// Port to bind to (overrides the config file)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Import character records (one object or an array) from a JSON file
    Import {
        /// Path to the input file
        #[arg(short, long)]
        file: PathBuf,
    },

    /// List stored characters
    List,

    /// Show a character sheet, syncing the encumbered condition
    Sheet {
        /// Character ID
        id: String,
    },

    /// Toggle a condition on a character
    Toggle {
        /// Character ID
        id: String,

        /// Condition key
        condition: String,
    },

    /// Stow an item in the locker (excluded from carried weight)
    Stow {
        /// Character ID
        id: String,

        /// Item ID
        item: String,
    },

    /// Take an item out of the locker
    Unstow {
        /// Character ID
        id: String,

        /// Item ID
        item: String,
    },

    /// Mark an item as active
    Activate {
        /// Character ID
        id: String,

        /// Item ID
        item: String,
    },

    /// Draw a level indicator
    Indicator {
        /// Current level
        level: u32,

        /// Number of marks
        max: u32,
    },

    /// Check whether an actor kind may own an item type
    Check {
        /// Actor kind (character, synthetic, vehicles, creature, territory)
        actor_kind: String,

        /// Item type tag
        item_type: String,
    },
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments.
pub async fn execute(cli: Cli) -> Result<(), StowageError> {
    let config = AppConfig::load(cli.config.as_deref())?;
    let json_mode = cli.json_mode;

    if cli.verbose {
        tracing::debug!(rules = ?config.rules, "Active house rules");
    }

    // Commands that never touch the roster.
    match &cli.command {
        Some(Commands::Indicator { level, max }) => return cmd_indicator(*level, *max, json_mode),
        Some(Commands::Check {
            actor_kind,
            item_type,
        }) => return cmd_check(actor_kind, item_type, json_mode),
        _ => {}
    }

    let mut roster = open_roster(&cli.database, &cli.backend, config.rules.clone())?;

    match cli.command {
        Some(Commands::Server { host, port }) => {
            let mut server = config.server;
            if let Some(host) = host {
                server.host = host;
            }
            if let Some(port) = port {
                server.port = port;
            }
            cmd_server(roster, &server, &cli.backend, &cli.database).await
        }
        Some(Commands::Import { file }) => cmd_import(&mut roster, &file, json_mode),
        Some(Commands::Sheet { id }) => cmd_sheet(&mut roster, &id, json_mode),
        Some(Commands::Toggle { id, condition }) => {
            cmd_toggle(&mut roster, &id, &condition, json_mode)
        }
        Some(Commands::Stow { id, item }) => {
            cmd_item_state(&mut roster, &id, &item, ActiveState::Locked, json_mode)
        }
        Some(Commands::Unstow { id, item }) => {
            cmd_item_state(&mut roster, &id, &item, ActiveState::Inactive, json_mode)
        }
        Some(Commands::Activate { id, item }) => {
            cmd_item_state(&mut roster, &id, &item, ActiveState::Active, json_mode)
        }
        Some(Commands::Indicator { level, max }) => cmd_indicator(level, max, json_mode),
        Some(Commands::Check {
            actor_kind,
            item_type,
        }) => cmd_check(&actor_kind, &item_type, json_mode),
        // No subcommand - list the roster by default
        Some(Commands::List) | None => cmd_list(&roster, json_mode),
    }
}
