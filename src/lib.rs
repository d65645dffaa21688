// src/lib.rs
// Public library surface for the binary and integration tests.

pub mod affiliate;
pub mod api;
pub mod config;
pub mod fetcher;
pub mod metrics;
pub mod model;
pub mod ranker;
pub mod service;

// ---- Re-exports for stable public API ----
pub use crate::api::{router, AppState};
pub use crate::config::ScoutConfig;
pub use crate::fetcher::{PriceFetcher, PriceSource};
pub use crate::service::ComparisonService;

use std::sync::Arc;

/// Wire config → fetcher → service → state, the same way the binary does.
pub fn build_state(config: Arc<ScoutConfig>) -> anyhow::Result<AppState> {
    let fetcher = PriceFetcher::new(config.clone())?;
    let service = ComparisonService::new(Arc::new(fetcher), config.affiliate_id.clone());
    Ok(AppState::new(service))
}
