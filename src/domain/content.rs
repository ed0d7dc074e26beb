//! Content records produced by the external compiler, typed at the boundary.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use time::OffsetDateTime;

use crate::domain::error::DomainError;

/// Locale tag for the site. A closed set: routes carrying anything else
/// resolve to not-found rather than falling back to a default language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    En,
    Id,
}

impl Locale {
    pub fn as_str(self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Id => "id",
        }
    }

    pub const ALL: [Locale; 2] = [Locale::En, Locale::Id];
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Locale {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "en" => Ok(Locale::En),
            "id" => Ok(Locale::Id),
            other => Err(DomainError::validation(format!(
                "unknown locale `{other}`"
            ))),
        }
    }
}

/// Content section. Fixed per route and per counter-key namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Blogs,
    Projects,
}

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Blogs => "blogs",
            Category::Projects => "projects",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "blogs" => Ok(Category::Blogs),
            "projects" => Ok(Category::Projects),
            other => Err(DomainError::validation(format!(
                "unknown category `{other}`"
            ))),
        }
    }
}

/// One precompiled article or project.
///
/// Instances are created once when the manifest is ingested and are
/// read-only for the process lifetime. `body_html` is owned by the content
/// compiler; this crate only passes it through.
#[derive(Debug, Clone, PartialEq)]
pub struct ContentItem {
    pub slug: String,
    pub lang: Locale,
    pub category: Category,
    pub title: String,
    pub description: String,
    pub date: Option<OffsetDateTime>,
    pub published: bool,
    pub body_html: String,
}
