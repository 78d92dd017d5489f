//! # Tillpoint Register
//!
//! The register service behind the POS screen: one cart, one bill at a
//! time, served over HTTP.
//!
//! ## Module Organization
//! ```text
//! tillpoint_register/
//! ├── lib.rs          ◄─── You are here (startup & serve)
//! ├── routes.rs       ◄─── axum router, thin handlers
//! ├── commands/
//! │   ├── catalog.rs  ◄─── Catalog load (with retry), debounced search
//! │   ├── cart.rs     ◄─── Cart edits
//! │   ├── customer.rs ◄─── Customer lookup
//! │   ├── checkout.rs ◄─── Pay / Save / Print / Just Save
//! │   └── held.rs     ◄─── Hold and resume
//! ├── state/          ◄─── Cart, catalog, session, bill numbers, config
//! ├── print.rs        ◄─── Receipt print surfaces
//! └── error.rs        ◄─── API error type
//! ```

pub mod commands;
pub mod error;
pub mod print;
pub mod routes;
pub mod state;

#[cfg(test)]
mod test_support;

use anyhow::Context;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use tillpoint_db::{Database, DbConfig};
use tillpoint_remote::{BackendClient, RegisterConfig};

use state::AppState;

/// Runs the register service until Ctrl-C.
///
/// ## Startup Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  1. Initialize logging (RUST_LOG, default info,tillpoint=debug)        │
/// │  2. Load register.toml + TILLPOINT_* overrides                         │
/// │  3. Open the side store (SQLite, WAL, migrations)                      │
/// │  4. Build backend client, printer and state                            │
/// │  5. Load the catalog (retried; an empty catalog if it never arrives)   │
/// │  6. Serve the POS screen on bind_addr                                  │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub async fn run(config_path: Option<PathBuf>) -> anyhow::Result<()> {
    init_tracing();

    info!("Starting Tillpoint register");

    let config = RegisterConfig::load(config_path).context("Failed to load configuration")?;

    let db_path = config.database_path();
    if let Some(parent) = db_path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Could not create {}", parent.display()))?;
    }
    info!(?db_path, "Database path determined");
    let db = Database::new(DbConfig::new(db_path))
        .await
        .context("Failed to open side store")?;

    let backend = Arc::new(BackendClient::new(config.client_config()?)?);
    let printer = print::from_settings(&config.printer);
    let bind_addr = config.register.bind_addr.clone();

    let state = AppState::new(config, db.clone(), backend, printer);
    info!(bill_numbers = ?state.bill_numbers.mode(), "State initialized");

    // the operator can retry from the screen
    if let Err(e) = commands::catalog::load_catalog(&state).await {
        warn!(error = %e, "Starting with an empty catalog");
    }

    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", bind_addr))?;
    info!(addr = %bind_addr, "Register listening");

    axum::serve(listener, routes::router(state))
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
            info!("Register shutting down");
        })
        .await?;

    db.close().await;
    Ok(())
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug logs
/// - `RUST_LOG=tillpoint=trace` - Show trace for tillpoint crates only
/// - Default: `info,tillpoint=debug,sqlx=warn`
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tillpoint=debug,sqlx=warn"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}
