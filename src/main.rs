// SPDX-FileCopyrightText: 2026 Formgate Contributors
// SPDX-License-Identifier: Apache-2.0

//! Formgate server
//!
//! Runs the admission gate as a standalone HTTP service in front of the back
//! office's form endpoints. The limiter state is process-local and ephemeral;
//! a restart clears all counters, which is acceptable for an abuse deterrent.
//!
//! ## Configuration
//!
//! Environment variables:
//!
//! - `BIND_ADDR`: Server bind address (default: 0.0.0.0:8080)
//! - `CONTACT_MAX_REQUESTS`: Contact form submissions per 5-minute window (default: 3)
//! - `HONEYPOT_FIELD`: Primary honeypot field name (default: website)
//! - `MIN_FILL_MS`: Minimum believable form fill time in ms (default: 2000)

use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use formgate::{
    config::Config,
    handlers::{self, AppState},
    BotDetector, Gate,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer().json())
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    // Load configuration
    let config = load_config();
    info!(
        bind_addr = %config.bind_addr,
        contact_max = config.policies.contact_form.max_requests,
        honeypot_field = %config.detection.honeypot_field,
        min_fill_ms = config.detection.min_fill_ms,
        "Starting formgate"
    );

    // Limiters and detector are explicit instances built once here and
    // injected through state, never module-level singletons
    let state = Arc::new(AppState {
        gate: Gate::new(&config.policies),
        detector: BotDetector::new(config.detection.clone()),
        config: config.clone(),
    });

    // Spawn the entry sweep task. Housekeeping only: check() handles expired
    // windows on access even if this never runs.
    let sweep_state = state.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(60));
        loop {
            interval.tick().await;
            sweep_state.gate.sweep().await;
        }
    });

    // Build router
    let mut app = Router::new()
        .route("/health", get(handlers::health))
        .route("/healthz", get(handlers::health))
        .route("/contact", post(handlers::contact))
        .route("/chat", post(handlers::chat))
        .route("/newsletter", post(handlers::newsletter))
        .route("/login", post(handlers::login))
        .route("/api/submit", post(handlers::api_submit));

    if config.metrics.enabled {
        app = app.route(config.metrics.path.as_str(), get(handlers::metrics_text));
    }

    let app = app.layer(TraceLayer::new_for_http()).with_state(state);

    // Start server
    let addr: SocketAddr = config.bind_addr.parse()?;
    let listener = TcpListener::bind(addr).await?;
    info!(addr = %addr, "Server listening");

    axum::serve(listener, app).await?;

    Ok(())
}

/// Load configuration from environment variables.
fn load_config() -> Config {
    let mut config = Config::default();

    if let Ok(addr) = std::env::var("BIND_ADDR") {
        config.bind_addr = addr;
    }
    if let Some(max) = env_parse("CONTACT_MAX_REQUESTS") {
        config.policies.contact_form.max_requests = max;
    }
    if let Ok(field) = std::env::var("HONEYPOT_FIELD") {
        config.detection.honeypot_field = field;
    }
    if let Some(min) = env_parse("MIN_FILL_MS") {
        config.detection.min_fill_ms = min;
    }

    config
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|v| v.parse().ok())
}
