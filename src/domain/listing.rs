//! Listing rules: publication filtering and recency ordering per locale.

use std::cmp::Ordering;

use time::OffsetDateTime;

use crate::domain::content::{Category, ContentItem, Locale};
use crate::domain::registry::ContentRegistry;

/// Published items for one category and locale, most recent first.
///
/// An item without a date sorts ahead of every dated item: the effective
/// date of an undated item is treated as unbounded-future. The sort is
/// stable, so equal effective dates keep manifest order.
pub fn published_for(
    registry: &ContentRegistry,
    category: Category,
    lang: Locale,
) -> Vec<&ContentItem> {
    let mut items: Vec<&ContentItem> = registry
        .list_all()
        .iter()
        .filter(|item| item.category == category && item.published && item.lang == lang)
        .collect();

    items.sort_by(|a, b| compare_recency(b.date, a.date));
    items
}

fn compare_recency(a: Option<OffsetDateTime>, b: Option<OffsetDateTime>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(a), Some(b)) => a.cmp(&b),
    }
}
