//! # Catalog Commands
//!
//! Loading the product cache and searching it.
//!
//! ## Search Debounce
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  keystroke "r"    ─► ticket 1 ─► wait 250ms ─► ticket 1 stale → superseded
//! │  keystroke "ri"   ─► ticket 2 ─► wait 250ms ─► ticket 2 stale → superseded
//! │  keystroke "ric"  ─► ticket 3 ─► wait 250ms ─► still latest  → results  │
//! │                                                                         │
//! │  Only the newest query is ever answered with results.                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use backoff::backoff::Backoff;
use backoff::ExponentialBackoff;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error, info, warn};

use tillpoint_core::validation::validate_search_query;
use tillpoint_core::{Catalog, Product, SearchFilter};

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogSummary {
    pub product_count: usize,
    pub categories: Vec<String>,
    /// Ids of products whose MRP is below a price tier.
    pub price_anomalies: Vec<String>,
    pub loaded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    #[serde(default)]
    pub q: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub in_stock: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    /// A newer search arrived during the debounce window; `products` is
    /// empty and the screen should keep waiting.
    pub superseded: bool,
    pub products: Vec<Product>,
}

/// Fetches the catalog from the backend and replaces the cache.
///
/// Transient failures (timeouts, refused connections, 5xx) are retried
/// with exponential backoff until the configured budget runs out.
pub async fn load_catalog(state: &AppState) -> Result<CatalogSummary, ApiError> {
    let mut backoff = ExponentialBackoff {
        initial_interval: Duration::from_millis(500),
        max_interval: Duration::from_secs(5),
        multiplier: 2.0,
        max_elapsed_time: Some(state.config.get().catalog_load_budget()),
        ..Default::default()
    };

    let mut attempt = 0u32;
    let products = loop {
        attempt += 1;
        match state.backend.fetch_catalog().await {
            Ok(products) => break products,
            Err(e) if e.is_transient() => match backoff.next_backoff() {
                Some(wait) => {
                    warn!(error = %e, attempt, ?wait, "Catalog load failed, retrying");
                    tokio::time::sleep(wait).await;
                }
                None => {
                    error!(error = %e, attempt, "Catalog load gave up");
                    return Err(e.into());
                }
            },
            Err(e) => {
                error!(error = %e, "Catalog load failed");
                return Err(e.into());
            }
        }
    };

    let catalog = Catalog::new(products, Utc::now());
    let summary = summarize(&catalog);
    for id in &summary.price_anomalies {
        warn!(product_id = %id, "MRP below a price tier, item discount clamped to zero");
    }

    state.catalog.replace(catalog);
    info!(products = summary.product_count, attempt, "Catalog loaded");
    Ok(summary)
}

fn summarize(catalog: &Catalog) -> CatalogSummary {
    CatalogSummary {
        product_count: catalog.len(),
        categories: catalog.categories().into_iter().map(str::to_string).collect(),
        price_anomalies: catalog
            .price_anomalies()
            .into_iter()
            .map(|p| p.id.clone())
            .collect(),
        loaded_at: catalog.loaded_at(),
    }
}

/// Debounced product search.
pub async fn search(state: &AppState, request: SearchRequest) -> Result<SearchResponse, ApiError> {
    let query = validate_search_query(&request.q).map_err(|e| ApiError::validation(e.to_string()))?;
    let ticket = state.catalog.issue_ticket();

    tokio::time::sleep(state.config.search_debounce()).await;

    if !state.catalog.is_current(ticket) {
        debug!(ticket = ticket.sequence(), "Search superseded");
        return Ok(SearchResponse {
            superseded: true,
            products: Vec::new(),
        });
    }

    let filter = SearchFilter {
        category: request.category.filter(|c| !c.trim().is_empty()),
        in_stock_only: request.in_stock,
    };
    let products = state.catalog.with_catalog(|c| {
        c.search(&query, &filter, state.config.search_limit())
            .into_iter()
            .cloned()
            .collect::<Vec<_>>()
    });

    debug!(query = %query, results = products.len(), "Search");
    Ok(SearchResponse {
        superseded: false,
        products,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{harness, product, rice, tea, FakeBackend};

    fn search_for(q: &str) -> SearchRequest {
        SearchRequest {
            q: q.to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_only_latest_search_answers() {
        let h = harness(FakeBackend::new().with_products(vec![rice(), tea()])).await;
        tokio::time::pause();

        let (first, second) = tokio::join!(
            search(&h.state, search_for("ri")),
            search(&h.state, search_for("rice"))
        );

        let first = first.unwrap();
        assert!(first.superseded);
        assert!(first.products.is_empty());

        let second = second.unwrap();
        assert!(!second.superseded);
        assert_eq!(second.products.len(), 1);
        assert_eq!(second.products[0].id, "rice");
    }

    #[tokio::test]
    async fn test_search_filters_out_of_stock() {
        let sold_out = product("chai", "Masala Tea", 700, 650, 800, 0);
        let h = harness(FakeBackend::new().with_products(vec![tea(), sold_out])).await;
        tokio::time::pause();

        let all = search(&h.state, search_for("tea")).await.unwrap();
        assert_eq!(all.products.len(), 2);

        let request = SearchRequest {
            q: "tea".to_string(),
            in_stock: true,
            ..Default::default()
        };
        let in_stock = search(&h.state, request).await.unwrap();
        assert_eq!(in_stock.products.len(), 1);
        assert_eq!(in_stock.products[0].id, "tea");
    }

    #[tokio::test]
    async fn test_overlong_query_rejected() {
        let h = harness(FakeBackend::new()).await;
        let err = search(&h.state, search_for(&"x".repeat(101))).await.unwrap_err();
        assert_eq!(err.code, crate::error::ErrorCode::ValidationError);
    }

    #[tokio::test]
    async fn test_load_catalog_retries_transient_failures() {
        // the harness consumes one failure while building the initial catalog
        let anomalous = product("odd", "Odd Item", 1200, 1000, 1100, 4);
        let h = harness(
            FakeBackend::new()
                .with_products(vec![rice(), anomalous])
                .with_catalog_failures(3),
        )
        .await;
        assert!(h.state.catalog.with_catalog(|c| c.is_empty()));
        tokio::time::pause();

        let summary = load_catalog(&h.state).await.unwrap();
        assert_eq!(summary.product_count, 2);
        assert_eq!(summary.price_anomalies, vec!["odd".to_string()]);
        assert!(h.state.catalog.product("rice").is_some());
    }
}
