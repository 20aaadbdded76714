// SPDX-FileCopyrightText: 2026 VCTR Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Supabase (PostgREST) implementation of the DataStore trait.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde::Deserialize;
use tracing::{debug, warn};

use vctr_config::model::SupabaseConfig;
use vctr_core::{
    AdapterType, Category, DataStore, HealthStatus, PluginAdapter, Row, RowPage, VctrError,
};

/// PostgREST error body.
#[derive(Debug, Deserialize)]
struct PostgrestError {
    message: String,
}

/// Read-only store over a Supabase project's REST endpoint.
///
/// Every category maps to the table of the same name in the `public`
/// schema. Requests authenticate with the anon key.
#[derive(Debug, Clone)]
pub struct SupabaseStore {
    client: reqwest::Client,
    rest_url: String,
    timeout: Duration,
}

impl SupabaseStore {
    /// Creates the store from configuration. `Ok(None)` when the URL or
    /// anon key is missing.
    pub fn from_config(config: &SupabaseConfig) -> Result<Option<Self>, VctrError> {
        let Some((url, anon_key)) = config.credentials() else {
            tracing::info!("Supabase URL or anon key not configured, chat disabled");
            return Ok(None);
        };
        Self::new(url, anon_key, Duration::from_secs(config.timeout_secs)).map(Some)
    }

    /// Creates a store for the project at `url`.
    pub fn new(url: &str, anon_key: &str, timeout: Duration) -> Result<Self, VctrError> {
        let invalid = |e: reqwest::header::InvalidHeaderValue| {
            VctrError::Config(format!("invalid anon key header value: {e}"))
        };
        let mut apikey = HeaderValue::from_str(anon_key).map_err(invalid)?;
        apikey.set_sensitive(true);
        let mut bearer = HeaderValue::from_str(&format!("Bearer {anon_key}")).map_err(invalid)?;
        bearer.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert("apikey", apikey);
        headers.insert(AUTHORIZATION, bearer);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| VctrError::Storage {
                message: format!("failed to build HTTP client: {e}"),
                details: Vec::new(),
            })?;

        Ok(Self {
            client,
            rest_url: format!("{}/rest/v1", url.trim_end_matches('/')),
            timeout,
        })
    }

    async fn get(
        &self,
        category: Category,
        query: &str,
        exact_count: bool,
    ) -> Result<(Vec<Row>, Option<u64>), VctrError> {
        let url = format!("{}/{}?select=*{query}", self.rest_url, category.table());
        let mut request = self.client.get(&url);
        if exact_count {
            request = request.header("Prefer", "count=exact");
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                VctrError::Timeout {
                    duration: self.timeout,
                }
            } else {
                VctrError::storage(format!("request to {} failed: {e}", category.table()))
            }
        })?;

        let status = response.status();
        let total = response
            .headers()
            .get("content-range")
            .and_then(|v| v.to_str().ok())
            .and_then(parse_content_range_total);

        let body = response
            .text()
            .await
            .map_err(|e| VctrError::storage(format!("failed to read response: {e}")))?;

        if !status.is_success() {
            let message = serde_json::from_str::<PostgrestError>(&body)
                .map(|e| e.message)
                .unwrap_or_else(|_| format!("{} - {body}", status.as_u16()));
            return Err(VctrError::storage(message));
        }

        let rows: Vec<Row> = serde_json::from_str(&body)
            .map_err(|e| VctrError::storage(format!("unexpected response body: {e}")))?;
        debug!(table = category.table(), rows = rows.len(), "query complete");
        Ok((rows, total))
    }
}

/// Total from a `Content-Range` header such as `0-1/5` or `*/0`.
fn parse_content_range_total(value: &str) -> Option<u64> {
    value.rsplit_once('/')?.1.trim().parse().ok()
}

#[async_trait]
impl PluginAdapter for SupabaseStore {
    fn name(&self) -> &str {
        "supabase"
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, VctrError> {
        Ok(match self.get(Category::Profile, "&limit=1", false).await {
            Ok(_) => HealthStatus::Healthy,
            Err(e) => HealthStatus::Unhealthy(e.public_message()),
        })
    }
}

#[async_trait]
impl DataStore for SupabaseStore {
    async fn select_all(&self, category: Category) -> Result<Vec<Row>, VctrError> {
        self.get(category, "", false).await.map(|(rows, _)| rows)
    }

    async fn select_page(
        &self,
        category: Category,
        offset: u64,
        limit: u64,
    ) -> Result<RowPage, VctrError> {
        let query = format!("&offset={offset}&limit={limit}");
        let (rows, total) = self.get(category, &query, true).await?;
        let total = total.unwrap_or_else(|| {
            warn!(table = category.table(), "response carried no exact count");
            0
        });
        Ok(RowPage { rows, total })
    }
}
