use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::get,
};

use crate::application::assembler::PageAssembler;
use crate::application::error::HttpError;
use crate::domain::content::{Category, Locale};

use super::middleware::{log_responses, set_request_context};
use super::models::{DetailResponse, ListingResponse};

#[derive(Clone)]
pub struct HttpState {
    pub assembler: Arc<PageAssembler>,
}

pub fn build_router(state: HttpState) -> Router {
    Router::new()
        .route("/_health", get(health))
        .route("/{category}/{segment}", get(listing_or_legacy_detail))
        .route("/{category}/{lang}/{slug}", get(localized_detail))
        .with_state(state)
        .layer(middleware::from_fn(log_responses))
        .layer(middleware::from_fn(set_request_context))
}

async fn health() -> StatusCode {
    StatusCode::NO_CONTENT
}

/// `/{category}/{lang}/{slug}`: locale-qualified detail lookup.
async fn localized_detail(
    State(state): State<HttpState>,
    Path((category, lang, slug)): Path<(String, String, String)>,
) -> Response {
    const SOURCE: &str = "infra::http::public::localized_detail";

    let Ok(category) = category.parse::<Category>() else {
        return unknown_route(SOURCE, &category).into_response();
    };
    let Ok(lang) = lang.parse::<Locale>() else {
        return HttpError::not_found(SOURCE, format!("unknown locale `{lang}`")).into_response();
    };

    detail_response(SOURCE, &state.assembler, category, &slug, Some(lang)).await
}

/// `/{category}/{segment}`: a locale tag selects the listing for that
/// locale; anything else is the legacy locale-less detail lookup.
async fn listing_or_legacy_detail(
    State(state): State<HttpState>,
    Path((category, segment)): Path<(String, String)>,
) -> Response {
    const SOURCE: &str = "infra::http::public::listing_or_legacy_detail";

    let Ok(category) = category.parse::<Category>() else {
        return unknown_route(SOURCE, &category).into_response();
    };

    match segment.parse::<Locale>() {
        Ok(lang) => match state.assembler.listing(category, lang).await {
            Ok(page) => Json(ListingResponse::from_page(category, lang, page)).into_response(),
            Err(err) => HttpError::from(err).into_response(),
        },
        Err(_) => detail_response(SOURCE, &state.assembler, category, &segment, None).await,
    }
}

async fn detail_response(
    source: &'static str,
    assembler: &PageAssembler,
    category: Category,
    slug: &str,
    lang: Option<Locale>,
) -> Response {
    match assembler.detail(category, slug, lang).await {
        Ok(Some(page)) => Json(DetailResponse::from_page(&page)).into_response(),
        Ok(None) => HttpError::not_found(
            source,
            format!("no {category} item for slug `{slug}`"),
        )
        .into_response(),
        Err(err) => HttpError::from(err).into_response(),
    }
}

fn unknown_route(source: &'static str, category: &str) -> HttpError {
    HttpError::not_found(source, format!("unknown category `{category}`"))
}
