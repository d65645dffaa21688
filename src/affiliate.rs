// src/affiliate.rs

/// Append the affiliate id to a product link.
///
/// The link's existing query delimiter is not inspected; upstream links are
/// expected to already carry a `?`.
pub fn annotate(link_base: &str, affiliate_id: &str) -> String {
    format!("{link_base}&affid={affiliate_id}")
}
