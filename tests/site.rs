use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use time::macros::datetime;
use tower::ServiceExt;

use brezza::application::assembler::PageAssembler;
use brezza::application::views::{ViewKey, ViewStore, ViewStoreError};
use brezza::domain::content::{Category, ContentItem, Locale};
use brezza::domain::registry::ContentRegistry;
use brezza::infra::http::{HttpState, build_router};

#[derive(Default)]
struct FakeStore {
    counts: HashMap<String, u64>,
    unavailable: bool,
}

impl FakeStore {
    fn with_counts(counts: &[(&str, u64)]) -> Self {
        Self {
            counts: counts
                .iter()
                .map(|(key, value)| (key.to_string(), *value))
                .collect(),
            unavailable: false,
        }
    }

    fn down() -> Self {
        Self {
            unavailable: true,
            ..Self::default()
        }
    }
}

#[async_trait]
impl ViewStore for FakeStore {
    async fn get(&self, key: &ViewKey) -> Result<u64, ViewStoreError> {
        if self.unavailable {
            return Err(ViewStoreError::unavailable("connection refused"));
        }
        Ok(self.counts.get(key.as_str()).copied().unwrap_or(0))
    }

    async fn get_many(&self, keys: &[ViewKey]) -> Result<Vec<u64>, ViewStoreError> {
        if self.unavailable {
            return Err(ViewStoreError::unavailable("connection refused"));
        }
        Ok(keys
            .iter()
            .map(|key| self.counts.get(key.as_str()).copied().unwrap_or(0))
            .collect())
    }
}

fn item(
    slug: &str,
    lang: Locale,
    category: Category,
    published: bool,
    date: Option<time::OffsetDateTime>,
) -> ContentItem {
    ContentItem {
        slug: slug.to_string(),
        lang,
        category,
        title: format!("Title: {slug}"),
        description: format!("About {slug}"),
        date,
        published,
        body_html: format!("<p>{slug}</p>"),
    }
}

fn site_items() -> Vec<ContentItem> {
    vec![
        item(
            "hello-world",
            Locale::En,
            Category::Blogs,
            true,
            Some(datetime!(2024-01-01 0:00 UTC)),
        ),
        item(
            "second-post",
            Locale::En,
            Category::Blogs,
            true,
            Some(datetime!(2024-03-01 0:00 UTC)),
        ),
        item("undated-note", Locale::En, Category::Blogs, true, None),
        item(
            "halo-dunia",
            Locale::Id,
            Category::Blogs,
            true,
            Some(datetime!(2024-02-01 0:00 UTC)),
        ),
        item("hidden-draft", Locale::En, Category::Blogs, false, None),
        item("brezza", Locale::En, Category::Projects, true, None),
    ]
}

fn router_with(store: FakeStore) -> Router {
    let registry = ContentRegistry::from_items(site_items()).unwrap();
    let assembler = Arc::new(PageAssembler::new(Arc::new(registry), Arc::new(store)));
    build_router(HttpState { assembler })
}

async fn get_json(router: &Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let response = router
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null)
    };
    (status, json)
}

#[tokio::test]
async fn health_endpoint_responds_no_content() {
    let router = router_with(FakeStore::default());
    let response = router
        .oneshot(
            Request::builder()
                .uri("/_health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn listing_orders_by_recency_and_zips_views() {
    let router = router_with(FakeStore::with_counts(&[
        ("pageviews:blogs:hello-world", 42),
        ("pageviews:blogs:second-post", 7),
    ]));

    let (status, body) = get_json(&router, "/blogs/en").await;
    assert_eq!(status, StatusCode::OK);

    let items = body["items"].as_array().unwrap();
    let slugs: Vec<&str> = items
        .iter()
        .map(|item| item["slug"].as_str().unwrap())
        .collect();
    assert_eq!(slugs, vec!["undated-note", "second-post", "hello-world"]);

    assert_eq!(items[0]["views"], 0);
    assert_eq!(items[1]["views"], 7);
    assert_eq!(items[2]["views"], 42);

    assert_eq!(body["views_by_slug"]["hello-world"], 42);
    assert_eq!(body["views_by_slug"]["undated-note"], 0);
    assert_eq!(body["lang"], "en");
    assert_eq!(body["category"], "blogs");
}

#[tokio::test]
async fn listing_excludes_drafts_and_other_locales() {
    let router = router_with(FakeStore::default());

    let (status, body) = get_json(&router, "/blogs/id").await;
    assert_eq!(status, StatusCode::OK);

    let slugs: Vec<&str> = body["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["slug"].as_str().unwrap())
        .collect();
    assert_eq!(slugs, vec!["halo-dunia"]);
}

#[tokio::test]
async fn localized_detail_returns_item_with_counter() {
    let router = router_with(FakeStore::with_counts(&[(
        "pageviews:blogs:hello-world",
        42,
    )]));

    let (status, body) = get_json(&router, "/blogs/en/hello-world").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["slug"], "hello-world");
    assert_eq!(body["views"], 42);
    assert_eq!(body["body_html"], "<p>hello-world</p>");
    assert_eq!(body["date"], "2024-01-01T00:00:00Z");
}

#[tokio::test]
async fn localized_detail_misses_on_wrong_locale() {
    let router = router_with(FakeStore::default());
    let (status, _) = get_json(&router, "/blogs/id/hello-world").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn legacy_detail_matches_slug_without_locale() {
    let router = router_with(FakeStore::with_counts(&[(
        "pageviews:projects:brezza",
        9,
    )]));

    let (status, body) = get_json(&router, "/projects/brezza").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["slug"], "brezza");
    assert_eq!(body["views"], 9);
}

#[tokio::test]
async fn unknown_slug_is_not_found() {
    let router = router_with(FakeStore::default());
    let (status, _) = get_json(&router, "/blogs/en/ghost").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = get_json(&router, "/blogs/ghost").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unknown_category_and_locale_are_not_found() {
    let router = router_with(FakeStore::default());

    let (status, _) = get_json(&router, "/pages/en").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = get_json(&router, "/blogs/fr/hello-world").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn store_outage_degrades_counters_to_zero() {
    let router = router_with(FakeStore::down());

    let (status, body) = get_json(&router, "/blogs/en").await;
    assert_eq!(status, StatusCode::OK);
    assert!(
        body["items"]
            .as_array()
            .unwrap()
            .iter()
            .all(|item| item["views"] == 0)
    );

    let (status, body) = get_json(&router, "/blogs/en/hello-world").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["views"], 0);
}

#[tokio::test]
async fn repeated_reads_are_identical() {
    let router = router_with(FakeStore::with_counts(&[(
        "pageviews:blogs:hello-world",
        42,
    )]));

    let (_, first) = get_json(&router, "/blogs/en").await;
    let (_, second) = get_json(&router, "/blogs/en").await;
    assert_eq!(first, second);
}
