//! Store connectivity check.

use serde::Serialize;
use serde_json::Value;
use tracing::instrument;

use storekeep_core::Result;

use crate::client::ApiClient;

/// Outcome of [`test_connection`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionReport {
    /// False when the backend reports that the store is not configured.
    pub success: bool,
    /// Number of products in the probe response (at most one).
    pub sample_size: usize,
}

/// Probe the store with a one-product listing.
#[instrument(skip(client))]
pub async fn test_connection(client: &ApiClient) -> Result<ConnectionReport> {
    let body = client
        .get_with("/products", &[("per_page", 1)])
        .await?
        .value()?;

    if body.get("code").and_then(Value::as_str) == Some("SETUP_REQUIRED") {
        return Ok(ConnectionReport {
            success: false,
            sample_size: 0,
        });
    }

    let sample_size = body
        .as_array()
        .or_else(|| body.get("products").and_then(Value::as_array))
        .map_or(0, Vec::len);
    Ok(ConnectionReport {
        success: true,
        sample_size,
    })
}
