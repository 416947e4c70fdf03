//! Product models.

use serde::{Deserialize, Serialize};

use super::{Extra, ListQuery};
use crate::sanitize::sanitize_opt;

/// A catalogue product.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(default)]
    pub price: Option<String>,
    #[serde(default)]
    pub regular_price: Option<String>,
    #[serde(default)]
    pub sale_price: Option<String>,
    #[serde(default)]
    pub stock_status: Option<String>,
    #[serde(default)]
    pub stock_quantity: Option<i64>,
    #[serde(flatten)]
    pub extra: Extra,
}

/// Body for product create and update calls.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ProductInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub short_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub regular_price: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sale_price: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl ProductInput {
    /// Sanitise the free-text fields before they leave the client.
    #[must_use]
    pub fn sanitized(self) -> Self {
        Self {
            name: sanitize_opt(self.name.as_deref()),
            slug: sanitize_opt(self.slug.as_deref()),
            description: sanitize_opt(self.description.as_deref()),
            short_description: sanitize_opt(self.short_description.as_deref()),
            sku: sanitize_opt(self.sku.as_deref()),
            ..self
        }
    }
}

/// Product listing filters, with the dashboard's defaults.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub search: Option<String>,
    pub category: Option<u64>,
    pub status: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
    pub sku: Option<String>,
}

impl From<ProductQuery> for ListQuery {
    fn from(q: ProductQuery) -> Self {
        let mut query = ListQuery {
            page: Some(q.page.unwrap_or(1)),
            per_page: Some(q.per_page.unwrap_or(10)),
            search: Some(q.search.unwrap_or_default()),
            status: Some(q.status.unwrap_or_else(|| "publish".to_string())),
            orderby: Some("date".to_string()),
            order: Some("desc".to_string()),
            ..ListQuery::default()
        };
        if let Some(category) = q.category {
            query = query.filter("category", category);
        }
        if let Some(min) = q.min_price {
            query = query.filter("min_price", min);
        }
        if let Some(max) = q.max_price {
            query = query.filter("max_price", max);
        }
        if let Some(sku) = q.sku {
            query = query.filter("sku", sku);
        }
        query
    }
}

/// A product variation. Variations are edited as raw attribute maps.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Variation {
    pub id: u64,
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(default)]
    pub price: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn product_keeps_unknown_fields() {
        let product: Product = serde_json::from_value(serde_json::json!({
            "id": 42,
            "name": "Hoodie",
            "slug": "hoodie",
            "price": "35.00",
            "images": [{"src": "https://cdn.example.com/h.png"}]
        }))
        .unwrap();
        assert_eq!(product.id, 42);
        assert!(product.extra.contains_key("images"));
    }

    #[test]
    fn input_sanitises_text_fields_only() {
        let input = ProductInput {
            name: Some(" <Hoodie> ".to_string()),
            sku: Some("HD-1 ".to_string()),
            regular_price: Some(" 35.00".to_string()),
            ..ProductInput::default()
        }
        .sanitized();
        assert_eq!(input.name.as_deref(), Some("Hoodie"));
        assert_eq!(input.sku.as_deref(), Some("HD-1"));
        assert_eq!(input.regular_price.as_deref(), Some(" 35.00"));
    }

    #[test]
    fn product_query_defaults() {
        let query: ListQuery = ProductQuery {
            category: Some(7),
            ..ProductQuery::default()
        }
        .into();
        assert_eq!(query.page, Some(1));
        assert_eq!(query.per_page, Some(10));
        assert_eq!(query.status.as_deref(), Some("publish"));
        assert_eq!(query.order.as_deref(), Some("desc"));
        assert_eq!(query.filters.get("category").map(String::as_str), Some("7"));
    }
}
