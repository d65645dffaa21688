//! Records produced by the comparison pipeline.

use serde::{Deserialize, Serialize};

/// One upstream item after parsing. `price` is always finite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedResult {
    pub platform: String,
    pub price: f64,
    pub link_base: String,
}

/// A normalized result carrying the affiliate-tagged link.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotatedResult {
    #[serde(flatten)]
    pub item: NormalizedResult,
    pub affiliate_link: String,
}

/// Anything with a price can be ranked.
pub trait Priced {
    fn price(&self) -> f64;
}

impl Priced for NormalizedResult {
    fn price(&self) -> f64 {
        self.price
    }
}

impl Priced for AnnotatedResult {
    fn price(&self) -> f64 {
        self.item.price
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn annotated_serializes_flat() {
        let a = AnnotatedResult {
            item: NormalizedResult {
                platform: "coles".into(),
                price: 2.0,
                link_base: "https://x/b".into(),
            },
            affiliate_link: "https://x/b&affid=A1".into(),
        };
        let v = serde_json::to_value(&a).unwrap();
        assert_eq!(v["platform"], "coles");
        assert_eq!(v["price"], 2.0);
        assert_eq!(v["link_base"], "https://x/b");
        assert_eq!(v["affiliate_link"], "https://x/b&affid=A1");
        assert!(v.get("item").is_none());
    }
}
