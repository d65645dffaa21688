// src/ranker.rs
use crate::model::Priced;

/// Sort ascending by price. `sort_by` is stable, so equal prices keep their
/// upstream order.
pub fn rank<T: Priced>(mut results: Vec<T>) -> Vec<T> {
    results.sort_by(|a, b| a.price().total_cmp(&b.price()));
    results
}
