//! Coupon models.

use serde::{Deserialize, Serialize};

use super::Extra;
use crate::sanitize::{is_valid_email, sanitize_input, sanitize_opt};

/// A discount coupon.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Coupon {
    pub id: u64,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub discount_type: Option<String>,
    #[serde(default)]
    pub amount: Option<String>,
    #[serde(default)]
    pub usage_count: Option<u64>,
    #[serde(flatten)]
    pub extra: Extra,
}

/// Body for coupon create and update calls.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CouponInput {
    #[serde(default)]
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_restrictions: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_ids: Option<Vec<i64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclude_product_ids: Option<Vec<i64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_categories: Option<Vec<i64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclude_product_categories: Option<Vec<i64>>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl CouponInput {
    /// Sanitise text, drop malformed emails and non-positive ids.
    #[must_use]
    pub fn sanitized(self) -> Self {
        Self {
            code: sanitize_input(&self.code),
            description: sanitize_opt(self.description.as_deref()),
            email_restrictions: self.email_restrictions.map(|emails| {
                emails
                    .iter()
                    .filter(|email| is_valid_email(email))
                    .map(|email| email.trim().to_lowercase())
                    .collect()
            }),
            product_ids: self.product_ids.map(positive_ids),
            exclude_product_ids: self.exclude_product_ids.map(positive_ids),
            product_categories: self.product_categories.map(positive_ids),
            exclude_product_categories: self.exclude_product_categories.map(positive_ids),
            ..self
        }
    }
}

fn positive_ids(ids: Vec<i64>) -> Vec<i64> {
    ids.into_iter().filter(|id| *id > 0).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitises_restrictions_and_ids() {
        let input = CouponInput {
            code: " <SUMMER10> ".to_string(),
            email_restrictions: Some(vec![
                " VIP@Example.com ".to_string(),
                "not-an-email".to_string(),
            ]),
            product_ids: Some(vec![12, 0, -3, 40]),
            exclude_product_categories: Some(vec![-1]),
            ..CouponInput::default()
        }
        .sanitized();

        assert_eq!(input.code, "SUMMER10");
        assert_eq!(input.email_restrictions, Some(vec!["vip@example.com".to_string()]));
        assert_eq!(input.product_ids, Some(vec![12, 40]));
        assert_eq!(input.exclude_product_categories, Some(vec![]));
        assert!(input.exclude_product_ids.is_none());
    }
}
