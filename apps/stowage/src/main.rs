//! # Stowage
//!
//! The main binary for the stowage inventory and encumbrance rules.
//!
//! This application provides:
//! - HTTP REST API server (axum-based)
//! - CLI interface for roster and sheet operations
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────┐
//! │           apps/stowage (THE BINARY)           │
//! │                                               │
//! │   ┌─────────────┐        ┌─────────────┐      │
//! │   │   CLI       │        │   HTTP API  │      │
//! │   │  (clap)     │        │   (axum)    │      │
//! │   └──────┬──────┘        └──────┬──────┘      │
//! │          └───────────┬──────────┘             │
//! │                      ▼                        │
//! │              ┌───────────────┐                │
//! │              │ stowage-core  │                │
//! │              │ (THE LOGIC)   │                │
//! │              └───────────────┘                │
//! └───────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! # Start the HTTP server
//! stowage server --host 0.0.0.0 --port 8080
//!
//! # CLI operations
//! stowage import -f party.json
//! stowage sheet drake
//! stowage stow drake ammo-crate
//! stowage indicator 3 10
//! ```

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

#[tokio::main]
async fn main() {
    // STOWAGE_LOG_FORMAT=json enables machine-parseable output.
    let log_format = std::env::var("STOWAGE_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "stowage=info,tower_http=debug".into());

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer())
                .init();
        }
    }

    let cli = stowage::cli::Cli::parse();

    if !cli.quiet && !cli.json_mode {
        print_banner();
    }

    if let Err(e) = stowage::cli::execute(cli).await {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Print the startup banner.
fn print_banner() {
    println!(
        r#"
  stowage v{}
  inventory, weight and encumbrance for character sheets
"#,
        env!("CARGO_PKG_VERSION")
    );
}
