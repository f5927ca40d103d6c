//! REST client for the portfolio CMS backend.
//!
//! Listing endpoints follow the simple-rest convention: `_start`/`_end` query
//! parameters select a window and the `x-total-count` header carries the total.
//! Bodies are either a bare JSON array or an object with a `data` array.

use crate::config::ApiConfig;
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode, header};
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

const TOTAL_COUNT_HEADER: &str = "x-total-count";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} answered {status}")]
    Status { url: String, status: StatusCode },
    #[error("could not decode {resource} rows: {source}")]
    Decode {
        resource: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid header value: {0}")]
    Header(#[from] header::InvalidHeaderValue),
    #[error("could not build http client: {0}")]
    Client(#[source] reqwest::Error),
}

/// One window of a paginated listing, rows still untyped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub rows: Vec<Value>,
    pub total: usize,
}

/// The two fetch shapes the selectors need. Implemented by [`ApiClient`] and by
/// in-memory fakes in tests.
#[async_trait]
pub trait ListingBackend: Send + Sync {
    /// `page` is 1-based.
    async fn list_page(&self, resource: &str, page: usize, page_size: usize)
    -> Result<Page, ApiError>;

    async fn list_all(&self, resource: &str) -> Result<Vec<Value>, ApiError>;
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    http: Client,
    user_agent: String,
}

impl ApiClient {
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let mut default_headers = header::HeaderMap::new();
        default_headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );
        if let Some(token) = &config.token {
            let mut value = header::HeaderValue::from_str(&format!("Bearer {token}"))?;
            value.set_sensitive(true);
            default_headers.insert(header::AUTHORIZATION, value);
        }

        let http = Client::builder()
            .default_headers(default_headers)
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(ApiError::Client)?;

        Ok(Self {
            base_url: config.base_url.clone(),
            http,
            user_agent: format!(
                "portfolio-admin/{}; {}",
                env!("CARGO_PKG_VERSION"),
                std::env::consts::OS
            ),
        })
    }

    fn get(&self, path: &str) -> (String, RequestBuilder) {
        let url = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        debug!(%url, "building request");
        let builder = self
            .http
            .get(&url)
            .header(header::USER_AGENT, &self.user_agent);
        (url, builder)
    }

    async fn send(&self, url: &str, builder: RequestBuilder) -> Result<reqwest::Response, ApiError> {
        let response = builder.send().await.map_err(|source| ApiError::Transport {
            url: url.to_string(),
            source,
        })?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                url: url.to_string(),
                status,
            });
        }
        Ok(response)
    }

    async fn read_json(url: &str, response: reqwest::Response) -> Result<Value, ApiError> {
        response.json::<Value>().await.map_err(|source| ApiError::Transport {
            url: url.to_string(),
            source,
        })
    }
}

#[async_trait]
impl ListingBackend for ApiClient {
    async fn list_page(
        &self,
        resource: &str,
        page: usize,
        page_size: usize,
    ) -> Result<Page, ApiError> {
        let (start, end) = page_window(page, page_size);
        let (url, builder) = self.get(resource);
        let builder = builder.query(&[("_start", start), ("_end", end)]);
        let response = self.send(&url, builder).await?;

        let header_total = response
            .headers()
            .get(TOTAL_COUNT_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<usize>().ok());
        let rows = rows_from_body(Self::read_json(&url, response).await?);
        let total = page_total(header_total, start, rows.len(), page_size);
        debug!(resource, page, rows = rows.len(), total, "listing page loaded");
        Ok(Page { rows, total })
    }

    async fn list_all(&self, resource: &str) -> Result<Vec<Value>, ApiError> {
        let (url, builder) = self.get(resource);
        let response = self.send(&url, builder).await?;
        let rows = rows_from_body(Self::read_json(&url, response).await?);
        debug!(resource, rows = rows.len(), "full list loaded");
        Ok(rows)
    }
}

/// `_start`/`_end` for a 1-based page.
pub fn page_window(page: usize, page_size: usize) -> (usize, usize) {
    let start = page.saturating_sub(1) * page_size;
    (start, start + page_size)
}

/// Listing total for a page. Without an `x-total-count` header a full page
/// means there may be more, so the total is reported one past what was seen.
pub fn page_total(header_total: Option<usize>, start: usize, rows: usize, page_size: usize) -> usize {
    match header_total {
        Some(total) => total,
        None if rows > 0 && rows >= page_size => start + rows + 1,
        None => start + rows,
    }
}

/// Coalesce the accepted body shapes into a row list. Missing data is empty.
pub fn rows_from_body(body: Value) -> Vec<Value> {
    match body {
        Value::Array(rows) => rows,
        Value::Object(mut obj) => match obj.remove("data") {
            Some(Value::Array(rows)) => rows,
            _ => Vec::new(),
        },
        _ => Vec::new(),
    }
}

/// Typed decoding shared by the row sources.
pub fn decode_rows<T: serde::de::DeserializeOwned>(
    resource: &str,
    rows: Vec<Value>,
) -> Result<Vec<T>, ApiError> {
    serde_json::from_value(Value::Array(rows)).map_err(|source| ApiError::Decode {
        resource: resource.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Label;
    use serde_json::json;

    #[test]
    fn page_window_is_one_based() {
        assert_eq!(page_window(1, 10), (0, 10));
        assert_eq!(page_window(3, 25), (50, 75));
        assert_eq!(page_window(0, 10), (0, 10));
    }

    #[test]
    fn missing_total_header_keeps_paging_open_after_a_full_page() {
        assert_eq!(page_total(Some(25), 0, 10, 10), 25);
        assert_eq!(page_total(None, 0, 10, 10), 11);
        assert_eq!(page_total(None, 20, 5, 10), 25);
        assert_eq!(page_total(None, 30, 0, 10), 30);
    }

    #[test]
    fn body_shapes_coalesce_to_rows() {
        assert_eq!(rows_from_body(json!([{"id": 1}])).len(), 1);
        assert_eq!(rows_from_body(json!({"data": [{"id": 1}, {"id": 2}]})).len(), 2);
        assert!(rows_from_body(json!({"data": null})).is_empty());
        assert!(rows_from_body(json!({})).is_empty());
        assert!(rows_from_body(Value::Null).is_empty());
    }

    #[test]
    fn decode_reports_the_resource_name() {
        let ok: Vec<Label> = decode_rows("labels", vec![json!({"id": 1, "name": "a"})]).unwrap();
        assert_eq!(ok[0].id, 1);

        let err = decode_rows::<Label>("labels", vec![json!({"name": "no id"})]).unwrap_err();
        assert!(err.to_string().contains("labels"));
    }

    #[test]
    fn client_builds_with_and_without_token() {
        let mut config = ApiConfig {
            base_url: "http://localhost:3000/api".into(),
            token: None,
            page_size: 10,
        };
        assert!(ApiClient::new(&config).is_ok());
        config.token = Some("abc".into());
        assert!(ApiClient::new(&config).is_ok());
        config.token = Some("bad\ntoken".into());
        assert!(matches!(ApiClient::new(&config), Err(ApiError::Header(_))));
    }
}
