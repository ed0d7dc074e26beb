//! Request-scoped composition of registry lookups with counter reads.

use std::collections::HashMap;
use std::sync::Arc;

use metrics::counter;
use tracing::warn;

use crate::application::views::{ViewKey, ViewStore, ViewStoreError};
use crate::domain::content::{Category, ContentItem, Locale};
use crate::domain::listing::published_for;
use crate::domain::registry::ContentRegistry;

const SOURCE: &str = "application::assembler::PageAssembler";

/// One resolved item with its counter snapshot.
#[derive(Debug)]
pub struct DetailPage<'a> {
    pub item: &'a ContentItem,
    pub views: u64,
}

#[derive(Debug)]
pub struct ListingEntry<'a> {
    pub item: &'a ContentItem,
    pub views: u64,
}

#[derive(Debug)]
pub struct ListingPage<'a> {
    pub entries: Vec<ListingEntry<'a>>,
    pub views_by_slug: HashMap<String, u64>,
}

/// Stateless per-request orchestrator. Holds the process-wide registry
/// snapshot and the shared store client; every call is an idempotent read.
#[derive(Clone)]
pub struct PageAssembler {
    registry: Arc<ContentRegistry>,
    views: Arc<dyn ViewStore>,
}

impl PageAssembler {
    pub fn new(registry: Arc<ContentRegistry>, views: Arc<dyn ViewStore>) -> Self {
        Self { registry, views }
    }

    /// Resolve one item and its counter. `lang` qualifies the lookup when
    /// supplied; the locale-less form matches the legacy routes. A store
    /// outage degrades the counter to zero instead of failing the page.
    pub async fn detail(
        &self,
        category: Category,
        slug: &str,
        lang: Option<Locale>,
    ) -> Result<Option<DetailPage<'_>>, ViewStoreError> {
        let item = match lang {
            Some(lang) => self.registry.find_one(category, slug, lang),
            None => self.registry.find_by_slug(category, slug),
        };
        let Some(item) = item else {
            return Ok(None);
        };

        let key = ViewKey::new(category, &item.slug)?;
        let views = match self.views.get(&key).await {
            Ok(views) => views,
            Err(err @ (ViewStoreError::Unavailable { .. } | ViewStoreError::Protocol { .. })) => {
                degraded("detail", &err, 1);
                0
            }
            Err(err) => return Err(err),
        };

        Ok(Some(DetailPage { item, views }))
    }

    /// Published items for a locale with counters zipped back by position.
    /// The whole listing is satisfied by one batched store read.
    pub async fn listing(
        &self,
        category: Category,
        lang: Locale,
    ) -> Result<ListingPage<'_>, ViewStoreError> {
        let items = published_for(&self.registry, category, lang);

        let keys = items
            .iter()
            .map(|item| ViewKey::new(category, &item.slug))
            .collect::<Result<Vec<_>, _>>()?;

        let counts = if keys.is_empty() {
            Vec::new()
        } else {
            match self.views.get_many(&keys).await {
                Ok(counts) => counts,
                Err(
                    err @ (ViewStoreError::Unavailable { .. } | ViewStoreError::Protocol { .. }),
                ) => {
                    degraded("listing", &err, keys.len());
                    vec![0; keys.len()]
                }
                Err(err) => return Err(err),
            }
        };

        let mut views_by_slug = HashMap::with_capacity(items.len());
        let entries = items
            .into_iter()
            .zip(counts)
            .map(|(item, views)| {
                views_by_slug.insert(item.slug.clone(), views);
                ListingEntry { item, views }
            })
            .collect();

        Ok(ListingPage {
            entries,
            views_by_slug,
        })
    }
}

fn degraded(operation: &'static str, err: &ViewStoreError, keys: usize) {
    counter!("brezza_view_store_degraded_total").increment(1);
    warn!(
        target = SOURCE,
        operation,
        keys,
        error = %err,
        "view store read failed, serving zero counters"
    );
}
