//! Dashboard account.

use serde::{Deserialize, Serialize};

use super::Extra;

/// The signed-in dashboard user (not a store customer).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    /// Numeric or string id, depending on the backend's user store.
    #[serde(default)]
    pub id: Option<serde_json::Value>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}
