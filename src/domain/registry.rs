//! The immutable registry of all content items for one build.

use std::collections::HashSet;

use crate::domain::content::{Category, ContentItem, Locale};
use crate::domain::error::DomainError;

/// Build-time content snapshot. Populated once at startup and never
/// mutated; every lookup is a pure read over manifest order.
#[derive(Debug)]
pub struct ContentRegistry {
    items: Vec<ContentItem>,
}

impl ContentRegistry {
    /// Ingest a validated item collection, enforcing the identity
    /// invariant: `(category, slug, lang)` is unique across the registry.
    pub fn from_items(items: Vec<ContentItem>) -> Result<Self, DomainError> {
        let mut seen = HashSet::new();
        for item in &items {
            if item.slug.is_empty() {
                return Err(DomainError::validation(format!(
                    "{} item with empty slug",
                    item.category
                )));
            }
            if !seen.insert((item.category, item.slug.clone(), item.lang)) {
                return Err(DomainError::validation(format!(
                    "duplicate {} item `{}` for locale `{}`",
                    item.category, item.slug, item.lang
                )));
            }
        }
        Ok(Self { items })
    }

    /// Exact match on category, slug, and locale. No locale fallback.
    pub fn find_one(&self, category: Category, slug: &str, lang: Locale) -> Option<&ContentItem> {
        self.items
            .iter()
            .find(|item| item.category == category && item.slug == slug && item.lang == lang)
    }

    /// Slug-only lookup for the legacy locale-less detail route. Returns
    /// the first manifest-order match, published or not.
    pub fn find_by_slug(&self, category: Category, slug: &str) -> Option<&ContentItem> {
        self.items
            .iter()
            .find(|item| item.category == category && item.slug == slug)
    }

    pub fn list_all(&self) -> &[ContentItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
