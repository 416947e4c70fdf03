//! Sales reports.

use serde_json::Value;

use storekeep_core::Result;
use storekeep_core::resources::{SalesPeriod, TopSeller};

use super::unwrap_key;
use crate::client::ApiClient;

#[derive(Debug, Clone)]
pub struct ReportsApi {
    client: ApiClient,
}

impl ReportsApi {
    pub fn new(client: &ApiClient) -> Self {
        Self {
            client: client.clone(),
        }
    }

    /// Sales totals for a period, as reported by the store.
    pub async fn sales(&self, period: SalesPeriod) -> Result<Value> {
        self.client
            .get_with("/reports/sales", &[("period", period.as_str())])
            .await?
            .value()
    }

    pub async fn top_sellers(&self, period: SalesPeriod) -> Result<Vec<TopSeller>> {
        let body = self
            .client
            .get_with("/reports/top_sellers", &[("period", period.as_str())])
            .await?
            .value()?;
        match unwrap_key(body, "top_sellers") {
            Value::Null => Ok(Vec::new()),
            rows => Ok(serde_json::from_value(rows)?),
        }
    }
}
