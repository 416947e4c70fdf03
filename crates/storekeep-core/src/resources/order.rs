//! Order models.

use serde::{Deserialize, Serialize};

use super::Extra;

/// A customer order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Order {
    pub id: u64,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub total: Option<String>,
    #[serde(default)]
    pub date_created: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

/// Body for order updates. Orders are never created from the dashboard.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct OrderUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_note: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}
