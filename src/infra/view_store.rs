//! REST adapter for the external counter store (Upstash-style Redis REST).
//!
//! One client is constructed at startup and shared across request handlers;
//! each call is an independent request/response exchange. `get_many` maps to
//! the store's `MGET` form so a whole listing costs one round trip.

use std::time::Instant;

use async_trait::async_trait;
use metrics::{counter, histogram};
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde::Deserialize;
use serde_json::Value;
use url::Url;

use crate::application::views::{ViewKey, ViewStore, ViewStoreError};
use crate::config::ViewStoreSettings;
use crate::infra::error::InfraError;

const SOURCE: &str = "infra::view_store::RestViewStore";

#[derive(Debug, Deserialize)]
struct Envelope {
    result: Value,
}

pub struct RestViewStore {
    client: reqwest::Client,
    base: Url,
}

impl RestViewStore {
    pub fn new(settings: &ViewStoreSettings) -> Result<Self, InfraError> {
        let base = settings
            .url
            .clone()
            .ok_or_else(|| InfraError::configuration("view_store.url is not configured"))?;
        if base.cannot_be_a_base() {
            return Err(InfraError::configuration(
                "view_store.url cannot carry path segments",
            ));
        }

        let mut headers = HeaderMap::new();
        if let Some(token) = settings.token.as_deref() {
            let value = HeaderValue::from_str(&format!("Bearer {token}")).map_err(|_| {
                InfraError::configuration("view_store.token contains invalid header characters")
            })?;
            headers.insert(AUTHORIZATION, value);
        }

        let client = reqwest::Client::builder()
            .timeout(settings.timeout)
            .default_headers(headers)
            .build()
            .map_err(|err| {
                InfraError::configuration(format!("failed to build store client: {err}"))
            })?;

        Ok(Self { client, base })
    }

    fn endpoint<'a>(&self, command: &str, keys: impl Iterator<Item = &'a str>) -> Url {
        let mut url = self.base.clone();
        {
            // checked at construction: the base URL accepts path segments
            let mut segments = url.path_segments_mut().expect("base url accepts segments");
            segments.pop_if_empty().push(command);
            for key in keys {
                segments.push(key);
            }
        }
        url
    }

    async fn round_trip(&self, url: Url) -> Result<Value, ViewStoreError> {
        let started = Instant::now();
        let result = self.execute(url).await;
        histogram!("brezza_view_store_roundtrip_ms")
            .record(started.elapsed().as_secs_f64() * 1000.0);
        if result.is_err() {
            counter!("brezza_view_store_error_total").increment(1);
        }
        result
    }

    async fn execute(&self, url: Url) -> Result<Value, ViewStoreError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|err| ViewStoreError::unavailable(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ViewStoreError::unavailable(format!(
                "store responded with status {status}"
            )));
        }

        let envelope: Envelope = response
            .json()
            .await
            .map_err(|err| ViewStoreError::protocol(format!("undecodable envelope: {err}")))?;
        Ok(envelope.result)
    }
}

#[async_trait]
impl ViewStore for RestViewStore {
    async fn get(&self, key: &ViewKey) -> Result<u64, ViewStoreError> {
        let url = self.endpoint("get", std::iter::once(key.as_str()));
        let result = self.round_trip(url).await?;
        decode_count(&result)
    }

    async fn get_many(&self, keys: &[ViewKey]) -> Result<Vec<u64>, ViewStoreError> {
        if keys.is_empty() {
            return Ok(Vec::new());
        }
        let url = self.endpoint("mget", keys.iter().map(ViewKey::as_str));
        let result = self.round_trip(url).await?;
        decode_counts(result, keys.len())
    }
}

/// A counter value in the envelope: `null` for an absent key, otherwise a
/// decimal string or a plain number.
fn decode_count(value: &Value) -> Result<u64, ViewStoreError> {
    match value {
        Value::Null => Ok(0),
        Value::Number(number) => number
            .as_u64()
            .ok_or_else(|| ViewStoreError::protocol(format!("non-counter number `{number}`"))),
        Value::String(text) => text
            .parse::<u64>()
            .map_err(|_| ViewStoreError::protocol(format!("non-counter value `{text}`"))),
        other => Err(ViewStoreError::protocol(format!(
            "unexpected counter payload `{other}`"
        ))),
    }
}

fn decode_counts(value: Value, expected: usize) -> Result<Vec<u64>, ViewStoreError> {
    let Value::Array(values) = value else {
        return Err(ViewStoreError::protocol(format!(
            "expected an array of {expected} counters"
        )));
    };
    if values.len() != expected {
        return Err(ViewStoreError::protocol(format!(
            "expected {expected} counters, store returned {}",
            values.len()
        )));
    }
    values.iter().map(decode_count).collect()
}
