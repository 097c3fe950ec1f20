//! # enquire-server
//!
//! HTTP front end for the contact and account forms.
//!
//! This binary provides:
//! - **Live field validation** answering each keystroke with an HTML
//!   fragment (success, warning, error or a password-strength meter)
//! - **Contact and newsletter submission** endpoints
//! - **Staff notifications** over a WebSocket that announces every new
//!   inquiry together with refreshed pending/total counts
//! - **Staff JSON API** for listing and resolving inquiries
//! - **Per-IP rate limiting** on the validation routes

mod api;
mod auth;
mod config;
mod db;
mod error;
mod fragments;
mod notify;
mod rate_limit;
mod staff;
mod submissions;
mod validation;
mod ws;

use std::sync::Arc;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use enquire_store::Database;

use crate::api::AppState;
use crate::config::ServerConfig;
use crate::db::SharedDb;
use crate::fragments::Fragments;
use crate::notify::NotificationHub;
use crate::rate_limit::RateLimiter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // -----------------------------------------------------------------------
    // 1. Initialize tracing (respects RUST_LOG env var)
    // -----------------------------------------------------------------------
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,enquire_server=debug")),
        )
        .init();

    info!("Starting enquire server v{}", env!("CARGO_PKG_VERSION"));

    // -----------------------------------------------------------------------
    // 2. Load configuration
    // -----------------------------------------------------------------------
    let config = ServerConfig::from_env();
    info!(?config, "Loaded configuration");

    // -----------------------------------------------------------------------
    // 3. Initialize subsystems
    // -----------------------------------------------------------------------
    let database = Database::open_at(&config.database_path).with_context(|| {
        format!("failed to open database at {}", config.database_path.display())
    })?;

    let fragments = Fragments::new().context("failed to load fragment templates")?;

    let rate_limiter = RateLimiter::new(config.validation_rate, config.validation_burst);

    let app_state = AppState {
        db: SharedDb::new(database),
        hub: NotificationHub::new(config.notify_buffer),
        fragments: Arc::new(fragments),
        rate_limiter: rate_limiter.clone(),
        config: Arc::new(config.clone()),
    };

    // -----------------------------------------------------------------------
    // 4. Spawn background tasks
    // -----------------------------------------------------------------------

    // Periodic rate limiter cleanup (every 5 minutes, evict buckets idle >10 min)
    let rl = rate_limiter.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(std::time::Duration::from_secs(300));
        loop {
            interval.tick().await;
            rl.purge_stale(600.0).await;
        }
    });

    // -----------------------------------------------------------------------
    // 5. Run the HTTP server (blocks until shutdown)
    // -----------------------------------------------------------------------
    tokio::select! {
        result = api::serve(app_state, config.http_addr) => {
            if let Err(e) = result {
                tracing::error!(error = %e, "HTTP server failed");
                return Err(e);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl+C, shutting down");
        }
    }

    Ok(())
}
