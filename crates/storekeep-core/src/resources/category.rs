//! Product category models.

use serde::{Deserialize, Serialize};

use super::Extra;
use crate::sanitize::sanitize_opt;

/// A product category.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Category {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub parent: u64,
    #[serde(default)]
    pub count: u64,
    #[serde(flatten)]
    pub extra: Extra,
}

/// Body for category create and update calls.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CategoryInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<u64>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl CategoryInput {
    #[must_use]
    pub fn sanitized(self) -> Self {
        Self {
            name: sanitize_opt(self.name.as_deref()),
            slug: sanitize_opt(self.slug.as_deref()),
            description: sanitize_opt(self.description.as_deref()),
            ..self
        }
    }
}
