// src/service.rs
use tracing::{debug, info};

use crate::affiliate::annotate;
use crate::fetcher::DynPriceSource;
use crate::model::AnnotatedResult;
use crate::ranker::rank;

/// Fetch → annotate → rank. Built once at startup and shared through `AppState`.
pub struct ComparisonService {
    source: DynPriceSource,
    affiliate_id: String,
}

impl ComparisonService {
    pub fn new(source: DynPriceSource, affiliate_id: impl Into<String>) -> Self {
        Self {
            source,
            affiliate_id: affiliate_id.into(),
        }
    }

    /// Cheapest first, or `None` when nothing usable came back. An unreachable
    /// upstream and an upstream with zero valid items both end up as `None`.
    pub async fn compare(&self, product: &str) -> Option<Vec<AnnotatedResult>> {
        let fetched = self.source.fetch(product).await;
        if fetched.is_empty() {
            debug!(product, "no usable results");
            return None;
        }

        let annotated = fetched
            .into_iter()
            .map(|item| AnnotatedResult {
                affiliate_link: annotate(&item.link_base, &self.affiliate_id),
                item,
            })
            .collect::<Vec<_>>();

        let ranked = rank(annotated);
        info!(
            product,
            count = ranked.len(),
            cheapest = ranked.first().map(|r| r.item.price),
            "comparison ready"
        );
        Some(ranked)
    }
}
