//! # Backend Client
//!
//! [`Backend`] over HTTP with `reqwest`.
//!
//! ## Status Mapping
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  reqwest outcome                 →  RemoteError                        │
//! │  ─────────────────────────────────────────────────────────────────     │
//! │  timed out                       →  Timeout(secs)                      │
//! │  connect / request failure       →  ConnectionFailed                   │
//! │  non-2xx status                  →  Api { status, message }            │
//! │  body is not the expected JSON   →  DeserializationFailed              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

use tillpoint_core::{Customer, Product, SaleSnapshot};

use crate::backend::Backend;
use crate::error::{RemoteError, RemoteResult};
use crate::protocol::{
    extract_sale_id, CommitSaleRequest, CustomerRecord, ListEnvelope, NextBillNumberResponse,
    ProductRecord,
};

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Longest error body echoed into an `Api` error.
const MAX_ERROR_BODY: usize = 200;

// =============================================================================
// Configuration
// =============================================================================

#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Always ends with `/` so relative joins append.
    pub base_url: Url,
    pub api_token: Option<String>,
    pub request_timeout: Duration,
}

impl ClientConfig {
    pub fn new(base_url: &str) -> RemoteResult<Self> {
        let mut url = Url::parse(base_url)?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(RemoteError::InvalidUrl(format!(
                "Backend URL must start with http:// or https://, got: {}",
                base_url
            )));
        }
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }

        Ok(ClientConfig {
            base_url: url,
            api_token: None,
            request_timeout: DEFAULT_TIMEOUT,
        })
    }

    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.api_token = token.filter(|t| !t.is_empty());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

// =============================================================================
// Client
// =============================================================================

#[derive(Debug, Clone)]
pub struct BackendClient {
    http: Client,
    config: ClientConfig,
}

impl BackendClient {
    pub fn new(config: ClientConfig) -> RemoteResult<Self> {
        let http = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| RemoteError::InvalidConfig(e.to_string()))?;

        info!(base_url = %config.base_url, "Backend client ready");
        Ok(BackendClient { http, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn endpoint(&self, path: &str) -> RemoteResult<Url> {
        Ok(self.config.base_url.join(path)?)
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.config.api_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    fn transport_error(&self, err: reqwest::Error) -> RemoteError {
        if err.is_timeout() {
            RemoteError::Timeout(self.config.request_timeout.as_secs())
        } else if err.is_decode() {
            RemoteError::DeserializationFailed(err.to_string())
        } else {
            RemoteError::ConnectionFailed(err.to_string())
        }
    }

    async fn read_json(&self, response: Response) -> RemoteResult<Value> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message: String = body.chars().take(MAX_ERROR_BODY).collect();
            return Err(RemoteError::Api {
                status: status.as_u16(),
                message: if message.is_empty() {
                    status.to_string()
                } else {
                    message
                },
            });
        }
        response.json().await.map_err(|e| self.transport_error(e))
    }

    async fn get(&self, url: Url) -> RemoteResult<Value> {
        debug!(%url, "GET");
        let response = self
            .authorize(self.http.get(url))
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;
        self.read_json(response).await
    }

    /// `{ data: [...] }` or a bare array.
    fn list_items(body: Value) -> RemoteResult<Vec<Value>> {
        match body {
            Value::Array(items) => Ok(items),
            other => Ok(serde_json::from_value::<ListEnvelope<Value>>(other)?.data),
        }
    }
}

#[async_trait]
impl Backend for BackendClient {
    async fn fetch_catalog(&self) -> RemoteResult<Vec<Product>> {
        let body = self.get(self.endpoint("api/products")?).await?;
        let items = Self::list_items(body)?;
        let total = items.len();

        let products: Vec<Product> = items
            .into_iter()
            .filter_map(|item| {
                serde_json::from_value::<ProductRecord>(item)
                    .ok()
                    .and_then(ProductRecord::into_product)
            })
            .collect();

        if products.len() < total {
            warn!(
                skipped = total - products.len(),
                "Skipped unusable product records"
            );
        }
        debug!(count = products.len(), "Fetched catalog");
        Ok(products)
    }

    async fn next_bill_number(&self) -> RemoteResult<String> {
        let body = self.get(self.endpoint("api/next-bill-number")?).await?;
        let response: NextBillNumberResponse = serde_json::from_value(body)?;
        response.number().ok_or_else(|| {
            RemoteError::DeserializationFailed("next_bill_number missing".to_string())
        })
    }

    async fn search_customers(&self, query: &str) -> RemoteResult<Vec<Customer>> {
        let mut url = self.endpoint("api/customers")?;
        url.query_pairs_mut().append_pair("search", query);

        let items = Self::list_items(self.get(url).await?)?;
        Ok(items
            .into_iter()
            .filter_map(|item| {
                serde_json::from_value::<CustomerRecord>(item)
                    .ok()
                    .and_then(CustomerRecord::into_customer)
            })
            .collect())
    }

    async fn commit_sale(&self, sale: &SaleSnapshot) -> RemoteResult<String> {
        let url = self.endpoint("api/sales")?;
        let body = CommitSaleRequest::from_snapshot(sale);
        debug!(%url, bill_number = %body.bill_number, items = body.items.len(), "POST sale");

        let response = self
            .authorize(self.http.post(url).json(&body))
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;
        let record = self.read_json(response).await?;

        extract_sale_id(&record).ok_or_else(|| {
            RemoteError::DeserializationFailed("sale id missing from response".to_string())
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
