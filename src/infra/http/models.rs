//! JSON view models for the public surface.

use std::collections::HashMap;

use serde::Serialize;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

use crate::application::assembler::{DetailPage, ListingPage};
use crate::domain::content::{Category, Locale};

#[derive(Debug, Serialize)]
pub struct DetailResponse {
    pub slug: String,
    pub lang: Locale,
    pub category: Category,
    pub title: String,
    pub description: String,
    pub date: Option<String>,
    pub views: u64,
    pub body_html: String,
}

impl DetailResponse {
    pub fn from_page(page: &DetailPage<'_>) -> Self {
        Self {
            slug: page.item.slug.clone(),
            lang: page.item.lang,
            category: page.item.category,
            title: page.item.title.clone(),
            description: page.item.description.clone(),
            date: format_date(page.item.date),
            views: page.views,
            body_html: page.item.body_html.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ListingItem {
    pub slug: String,
    pub title: String,
    pub description: String,
    pub date: Option<String>,
    pub views: u64,
}

#[derive(Debug, Serialize)]
pub struct ListingResponse {
    pub category: Category,
    pub lang: Locale,
    pub items: Vec<ListingItem>,
    pub views_by_slug: HashMap<String, u64>,
}

impl ListingResponse {
    pub fn from_page(category: Category, lang: Locale, page: ListingPage<'_>) -> Self {
        let items = page
            .entries
            .iter()
            .map(|entry| ListingItem {
                slug: entry.item.slug.clone(),
                title: entry.item.title.clone(),
                description: entry.item.description.clone(),
                date: format_date(entry.item.date),
                views: entry.views,
            })
            .collect();

        Self {
            category,
            lang,
            items,
            views_by_slug: page.views_by_slug,
        }
    }
}

fn format_date(date: Option<OffsetDateTime>) -> Option<String> {
    date.and_then(|date| date.format(&Rfc3339).ok())
}
