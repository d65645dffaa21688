//! Upstream price fetcher: one bounded GET against the price API, mapped into
//! [`NormalizedResult`]s through a configurable [`ResponseSchema`].
//!
//! Every failure (missing key, transport, timeout, non-2xx, undecodable body)
//! ends in an empty list from [`PriceSource::fetch`]; callers never see errors.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use metrics::counter;
use reqwest::Url;
use serde_json::Value;
use tracing::{debug, error, warn};

use crate::config::{ResponseSchema, ScoutConfig};
use crate::model::NormalizedResult;

/// Link used when an upstream item carries none.
pub const PLACEHOLDER_LINK: &str = "#";

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("RAPIDAPI_KEY is not configured")]
    MissingApiKey,
    #[error("base url has no host: {0}")]
    InvalidBaseUrl(String),
    #[error("upstream request timed out")]
    Timeout,
    #[error("upstream transport error: {0}")]
    Transport(String),
    #[error("upstream returned HTTP {0}")]
    Status(u16),
    #[error("upstream body is not valid JSON: {0}")]
    Decode(String),
}

impl FetchError {
    /// Short label for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            FetchError::MissingApiKey => "missing_api_key",
            FetchError::InvalidBaseUrl(_) => "invalid_base_url",
            FetchError::Timeout => "timeout",
            FetchError::Transport(_) => "transport",
            FetchError::Status(_) => "status",
            FetchError::Decode(_) => "decode",
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            FetchError::Timeout
        } else if e.is_decode() {
            FetchError::Decode(e.to_string())
        } else {
            FetchError::Transport(e.to_string())
        }
    }
}

/// Seam between the comparison service and wherever prices come from.
#[async_trait]
pub trait PriceSource: Send + Sync {
    /// Normalized results for `product`; empty on any failure.
    async fn fetch(&self, product: &str) -> Vec<NormalizedResult>;
}

pub type DynPriceSource = Arc<dyn PriceSource>;

pub struct PriceFetcher {
    http: reqwest::Client,
    config: Arc<ScoutConfig>,
}

impl PriceFetcher {
    pub fn new(config: Arc<ScoutConfig>) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("price-scout/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { http, config })
    }

    /// Same as [`PriceSource::fetch`] but keeps the reason a fetch came back empty.
    pub async fn try_fetch(&self, product: &str) -> Result<Vec<NormalizedResult>, FetchError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(FetchError::MissingApiKey)?;
        let host = upstream_host(&self.config.base_url)
            .ok_or_else(|| FetchError::InvalidBaseUrl(self.config.base_url.clone()))?;

        let resp = self
            .http
            .get(&self.config.base_url)
            .header("X-RapidAPI-Key", api_key)
            .header("X-RapidAPI-Host", host)
            .query(&[
                ("query", product),
                ("country_code", self.config.country_code.as_str()),
            ])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body: Value = resp.json().await?;
        Ok(normalize_items(&body, &self.config.schema))
    }
}

#[async_trait]
impl PriceSource for PriceFetcher {
    async fn fetch(&self, product: &str) -> Vec<NormalizedResult> {
        match self.try_fetch(product).await {
            Ok(items) => {
                let outcome = if items.is_empty() { "empty" } else { "ok" };
                counter!("price_scout_upstream_calls_total", "outcome" => outcome).increment(1);
                debug!(product, count = items.len(), "upstream returned usable items");
                items
            }
            Err(FetchError::MissingApiKey) => {
                counter!("price_scout_upstream_calls_total", "outcome" => "missing_api_key")
                    .increment(1);
                error!("RAPIDAPI_KEY not set; skipping upstream fetch");
                Vec::new()
            }
            Err(e) => {
                counter!("price_scout_upstream_calls_total", "outcome" => e.kind()).increment(1);
                warn!(product, kind = e.kind(), error = %e, "upstream price request failed");
                Vec::new()
            }
        }
    }
}

/// Authority (host plus explicit non-default port) of `base_url`.
pub fn upstream_host(base_url: &str) -> Option<String> {
    let url = Url::parse(base_url).ok()?;
    let host = url.host_str()?;
    Some(match url.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    })
}

/// Map an upstream body into normalized results. Items without a usable price
/// are skipped; a missing results array yields nothing.
pub fn normalize_items(body: &Value, schema: &ResponseSchema) -> Vec<NormalizedResult> {
    let Some(items) = body.get(&schema.results_field).and_then(Value::as_array) else {
        return Vec::new();
    };

    items
        .iter()
        .filter_map(|item| {
            let price = item.get(&schema.price_field).and_then(parse_price)?;
            let link_base = item
                .get(&schema.link_field)
                .and_then(Value::as_str)
                .unwrap_or(PLACEHOLDER_LINK)
                .to_string();
            Some(NormalizedResult {
                platform: schema.platform.clone(),
                price,
                link_base,
            })
        })
        .collect()
}

/// Numeric strings and JSON numbers; anything non-finite is rejected.
fn parse_price(v: &Value) -> Option<f64> {
    let p = match v {
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        Value::Number(n) => n.as_f64()?,
        _ => return None,
    };
    p.is_finite().then_some(p)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn skips_bad_prices_and_keeps_order() {
        let body = json!({"results": [
            {"new_price": "3.50", "url": "https://x/a"},
            {"new_price": "2.00", "url": "https://x/b"},
            {"new_price": "bad",  "url": "https://x/c"}
        ]});
        let out = normalize_items(&body, &ResponseSchema::default());
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].price, 3.5);
        assert_eq!(out[0].link_base, "https://x/a");
        assert_eq!(out[1].price, 2.0);
        assert!(out.iter().all(|r| r.platform == "coles"));
    }

    #[test]
    fn price_edge_cases() {
        let body = json!({"results": [
            {"new_price": " 4.25 "},
            {"new_price": 7},
            {"new_price": null},
            {"url": "https://x/none"},
            {"new_price": true},
            {"new_price": "NaN"},
            {"new_price": "inf"},
            {"new_price": ""}
        ]});
        let out = normalize_items(&body, &ResponseSchema::default());
        let prices: Vec<f64> = out.iter().map(|r| r.price).collect();
        assert_eq!(prices, vec![4.25, 7.0]);
        assert!(out.iter().all(|r| r.link_base == PLACEHOLDER_LINK));
    }

    #[test]
    fn missing_or_malformed_results_field() {
        let schema = ResponseSchema::default();
        assert!(normalize_items(&json!({}), &schema).is_empty());
        assert!(normalize_items(&json!({"results": {"new_price": "1"}}), &schema).is_empty());
        assert!(normalize_items(&json!([1, 2]), &schema).is_empty());
    }

    #[test]
    fn custom_schema_fields() {
        let schema = ResponseSchema {
            results_field: "items".into(),
            price_field: "amount".into(),
            link_field: "href".into(),
            platform: "woolworths".into(),
        };
        let body = json!({"items": [{"amount": "1.10", "href": "https://w/1"}]});
        let out = normalize_items(&body, &schema);
        assert_eq!(
            out,
            vec![NormalizedResult {
                platform: "woolworths".into(),
                price: 1.1,
                link_base: "https://w/1".into(),
            }]
        );
    }

    #[test]
    fn host_is_extracted_from_base_url() {
        assert_eq!(
            upstream_host("https://coles-product-price-api.p.rapidapi.com/coles/price-changes/?page=1")
                .as_deref(),
            Some("coles-product-price-api.p.rapidapi.com")
        );
        assert_eq!(
            upstream_host("http://127.0.0.1:9123/prices").as_deref(),
            Some("127.0.0.1:9123")
        );
        assert_eq!(upstream_host("not a url"), None);
    }

    #[tokio::test]
    async fn missing_key_short_circuits() {
        let fetcher = PriceFetcher::new(Arc::new(ScoutConfig::default())).unwrap();
        let err = fetcher.try_fetch("milk").await.unwrap_err();
        assert!(matches!(err, FetchError::MissingApiKey));
        assert!(fetcher.fetch("milk").await.is_empty());
    }
}
