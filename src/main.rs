//! price-scout — binary entrypoint.
//! Boots the Axum HTTP server with the comparison service injected as state.

use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use price_scout::{build_state, metrics::Metrics, router, ScoutConfig};

/// Verbose by default; `RUST_LOG` overrides and `PRICE_SCOUT_LOG_JSON=1`
/// switches to JSON lines.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("price_scout=debug,tower_http=debug,info"));

    let json = std::env::var("PRICE_SCOUT_LOG_JSON")
        .ok()
        .is_some_and(|v| v == "1");

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer().compact()).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env in local/dev; no-op when absent.
    let _ = dotenvy::dotenv();
    init_tracing();

    let config = Arc::new(ScoutConfig::load().context("loading price-scout config")?);
    info!(
        base_url = %config.base_url,
        platform = %config.platform_name,
        country = %config.country_code,
        timeout_secs = config.timeout_secs,
        key_present = config.has_api_key(),
        "config loaded"
    );
    if !config.has_api_key() {
        warn!("RAPIDAPI_KEY is not set; every search will return 404");
    }

    let state = build_state(config.clone())?;
    let mut app = router(state);

    match Metrics::init() {
        Ok(m) => app = app.merge(m.router()),
        Err(e) => warn!(error = %e, "metrics disabled"),
    }

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("binding {}", config.bind_addr))?;
    info!(addr = %config.bind_addr, "price-scout listening");

    axum::serve(listener, app).await?;
    Ok(())
}
