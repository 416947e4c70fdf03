//! Paged collection types.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Page size assumed when the caller did not ask for one.
pub const DEFAULT_PER_PAGE: u32 = 25;

/// One page of a backend collection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub total_pages: u64,
}

impl<T> Page<T> {
    /// The page returned before the store has been connected.
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            total: 0,
            total_pages: 0,
        }
    }
}

/// Query parameters shared by every collection endpoint.
///
/// Resource-specific filters (`category`, `sku`, `min_price`, ...) go in
/// `filters` and are sent as plain query parameters.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct ListQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub orderby: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<String>,
    #[serde(flatten)]
    pub filters: BTreeMap<String, String>,
}

impl ListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    #[must_use]
    pub fn per_page(mut self, per_page: u32) -> Self {
        self.per_page = Some(per_page);
        self
    }

    #[must_use]
    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    #[must_use]
    pub fn status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    #[must_use]
    pub fn filter(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.filters.insert(key.into(), value.to_string());
        self
    }

    /// Page size used to estimate totals.
    pub fn effective_per_page(&self) -> u32 {
        self.per_page.filter(|n| *n > 0).unwrap_or(DEFAULT_PER_PAGE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filters_serialize_flat() {
        let query = ListQuery::new().page(2).filter("sku", "TS-01");
        let value = serde_json::to_value(&query).unwrap();
        assert_eq!(value, serde_json::json!({"page": 2, "sku": "TS-01"}));
    }

    #[test]
    fn per_page_defaults() {
        assert_eq!(ListQuery::new().effective_per_page(), DEFAULT_PER_PAGE);
        assert_eq!(ListQuery::new().per_page(0).effective_per_page(), DEFAULT_PER_PAGE);
        assert_eq!(ListQuery::new().per_page(10).effective_per_page(), 10);
    }
}
