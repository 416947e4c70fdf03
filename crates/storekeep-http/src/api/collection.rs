//! Paged collection fetching.

use reqwest::header::HeaderMap;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, instrument};

use storekeep_core::Result;
use storekeep_core::resources::{ListQuery, Page};

use crate::client::ApiClient;

/// Body code returned before the store connection has been configured.
const SETUP_REQUIRED: &str = "SETUP_REQUIRED";

/// Fallback items key; the backend wraps most collections in `products`.
const DEFAULT_ITEMS_KEY: &str = "products";

/// GET a collection and normalise its paging metadata.
///
/// Items are read from `body[items_key]`, then `body.products`, then the
/// body itself when it is an array. Totals come from the body first and
/// the `X-WP-Total` / `X-WP-TotalPages` headers second.
#[instrument(skip(client, query), fields(page = ?query.page))]
pub async fn fetch_collection<T: DeserializeOwned>(
    client: &ApiClient,
    route: &str,
    items_key: &str,
    query: &ListQuery,
) -> Result<Page<T>> {
    let response = client.get_with(route, query).await?;
    let body = response.value()?;
    parse_page(body, response.headers(), items_key, query.effective_per_page())
}

pub(crate) fn parse_page<T: DeserializeOwned>(
    body: Value,
    headers: &HeaderMap,
    items_key: &str,
    per_page: u32,
) -> Result<Page<T>> {
    if body.get("code").and_then(Value::as_str) == Some(SETUP_REQUIRED) {
        debug!("store not configured, returning empty page");
        return Ok(Page::empty());
    }

    let total_pages = body_number(&body, "totalPages")
        .unwrap_or_else(|| header_number(headers, "x-wp-totalpages").unwrap_or(1));
    let total = body_number(&body, "total")
        .unwrap_or_else(|| header_number(headers, "x-wp-total").unwrap_or(0));

    let items: Vec<T> = serde_json::from_value(extract_items(body, items_key))?;

    let total = if total == 0 && total_pages > 0 {
        (total_pages - 1)
            .saturating_mul(u64::from(per_page))
            .saturating_add(items.len() as u64)
    } else {
        total
    };

    Ok(Page {
        items,
        total,
        total_pages,
    })
}

fn extract_items(body: Value, items_key: &str) -> Value {
    match body {
        Value::Array(_) => body,
        Value::Object(mut map) => map
            .remove(items_key)
            .or_else(|| map.remove(DEFAULT_ITEMS_KEY))
            .filter(Value::is_array)
            .unwrap_or_else(|| Value::Array(Vec::new())),
        _ => Value::Array(Vec::new()),
    }
}

/// A positive number from the body; zero counts as absent.
fn body_number(body: &Value, key: &str) -> Option<u64> {
    body.get(key).and_then(Value::as_u64).filter(|n| *n > 0)
}

fn header_number(headers: &HeaderMap, name: &str) -> Option<u64> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;
    use serde_json::json;

    fn headers(total: Option<&'static str>, pages: Option<&'static str>) -> HeaderMap {
        let mut map = HeaderMap::new();
        if let Some(total) = total {
            map.insert("x-wp-total", HeaderValue::from_static(total));
        }
        if let Some(pages) = pages {
            map.insert("x-wp-totalpages", HeaderValue::from_static(pages));
        }
        map
    }

    #[test]
    fn setup_required_is_empty() {
        let page: Page<Value> =
            parse_page(json!({"code": "SETUP_REQUIRED"}), &headers(None, None), "products", 25)
                .unwrap();
        assert_eq!(page, Page::empty());
    }

    #[test]
    fn body_totals_win() {
        let page: Page<Value> = parse_page(
            json!({"products": [{"id": 1}, {"id": 2}], "total": 42, "totalPages": 3}),
            &headers(Some("7"), Some("9")),
            "products",
            25,
        )
        .unwrap();
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.total, 42);
        assert_eq!(page.total_pages, 3);
    }

    #[test]
    fn headers_fill_in_for_bare_arrays() {
        let page: Page<Value> = parse_page(
            json!([{"id": 1}]),
            &headers(Some("31"), Some("4")),
            "orders",
            10,
        )
        .unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.total, 31);
        assert_eq!(page.total_pages, 4);
    }

    #[test]
    fn total_is_estimated_from_pages() {
        let page: Page<Value> = parse_page(
            json!({"products": [{"id": 1}, {"id": 2}, {"id": 3}], "total": 0, "totalPages": 4}),
            &headers(None, None),
            "products",
            25,
        )
        .unwrap();
        assert_eq!(page.total, 3 * 25 + 3);
    }

    #[test]
    fn absurd_page_count_saturates_estimate() {
        let page: Page<Value> = parse_page(
            json!([{"id": 1}]),
            &headers(None, Some("18446744073709551615")),
            "orders",
            25,
        )
        .unwrap();
        assert_eq!(page.total_pages, u64::MAX);
        assert_eq!(page.total, u64::MAX);
    }

    #[test]
    fn missing_metadata_defaults_to_one_page() {
        let page: Page<Value> =
            parse_page(json!({"coupons": []}), &headers(None, None), "coupons", 25).unwrap();
        assert_eq!(page.total_pages, 1);
        assert_eq!(page.total, 0);
    }

    #[test]
    fn resource_key_then_products_fallback() {
        let page: Page<Value> = parse_page(
            json!({"products": [{"id": 5}]}),
            &headers(Some("1"), Some("1")),
            "categories",
            25,
        )
        .unwrap();
        assert_eq!(page.items, vec![json!({"id": 5})]);
    }
}
