//! Customer lookup for the payment screen.

use serde::Deserialize;
use tracing::debug;

use tillpoint_core::validation::validate_search_query;
use tillpoint_core::Customer;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CustomerQuery {
    #[serde(default)]
    pub search: String,
}

/// Searches the backend's customers. An empty query asks nothing.
pub async fn search_customers(
    state: &AppState,
    query: CustomerQuery,
) -> Result<Vec<Customer>, ApiError> {
    let query = validate_search_query(&query.search).map_err(|e| ApiError::validation(e.to_string()))?;
    if query.is_empty() {
        return Ok(Vec::new());
    }

    let customers = state.backend.search_customers(&query).await?;
    debug!(query = %query, results = customers.len(), "Customer search");
    Ok(customers)
}
