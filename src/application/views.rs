//! View-counter seam: key construction, error taxonomy, and the store trait.

use std::fmt;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::content::Category;

const KEY_NAMESPACE: &str = "pageviews";

#[derive(Debug, Error)]
pub enum ViewStoreError {
    #[error("malformed counter key: {reason}")]
    MalformedKey { reason: String },
    #[error("view store unavailable: {message}")]
    Unavailable { message: String },
    #[error("view store protocol error: {message}")]
    Protocol { message: String },
}

impl ViewStoreError {
    pub fn malformed_key(reason: impl Into<String>) -> Self {
        Self::MalformedKey {
            reason: reason.into(),
        }
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    pub fn protocol(message: impl Into<String>) -> Self {
        Self::Protocol {
            message: message.into(),
        }
    }
}

/// A validated counter key of the form `pageviews:<category>:<slug>`.
///
/// Construction rejects slugs that would break the key structure before
/// any store call is issued; the category segment is a closed enum and
/// never comes from user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewKey(String);

impl ViewKey {
    pub fn new(category: Category, slug: &str) -> Result<Self, ViewStoreError> {
        if slug.is_empty() {
            return Err(ViewStoreError::malformed_key("empty slug"));
        }
        if slug.contains(':') || slug.contains('/') || slug.chars().any(char::is_whitespace) {
            return Err(ViewStoreError::malformed_key(format!(
                "slug `{slug}` contains key-structure characters"
            )));
        }
        Ok(Self(format!("{KEY_NAMESPACE}:{category}:{slug}")))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ViewKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Read-only client for the external counter store.
///
/// Implementations must resolve an absent key to `0` rather than an error,
/// and must satisfy `get_many` with a single round trip whose result order
/// matches the input key order exactly.
#[async_trait]
pub trait ViewStore: Send + Sync {
    async fn get(&self, key: &ViewKey) -> Result<u64, ViewStoreError>;

    async fn get_many(&self, keys: &[ViewKey]) -> Result<Vec<u64>, ViewStoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_layout_is_namespace_category_slug() {
        let key = ViewKey::new(Category::Blogs, "hello-world").unwrap();
        assert_eq!(key.as_str(), "pageviews:blogs:hello-world");

        let key = ViewKey::new(Category::Projects, "brezza").unwrap();
        assert_eq!(key.as_str(), "pageviews:projects:brezza");
    }

    #[test]
    fn structurally_unsafe_slugs_are_rejected() {
        assert!(ViewKey::new(Category::Blogs, "").is_err());
        assert!(ViewKey::new(Category::Blogs, "a:b").is_err());
        assert!(ViewKey::new(Category::Blogs, "a/b").is_err());
        assert!(ViewKey::new(Category::Blogs, "a b").is_err());
    }
}
