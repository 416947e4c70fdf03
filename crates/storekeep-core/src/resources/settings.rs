//! Store connection settings.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::Extra;
use crate::sanitize::sanitize_input;

/// Settings as returned by `GET /settings`.
#[derive(Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StoreSettings {
    #[serde(default)]
    pub store_url: Option<String>,
    #[serde(default)]
    pub consumer_key: Option<String>,
    #[serde(default)]
    pub consumer_secret: Option<String>,
    #[serde(default)]
    pub wordpress_username: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl fmt::Debug for StoreSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreSettings")
            .field("store_url", &self.store_url)
            .field("consumer_key", &self.consumer_key.as_ref().map(|_| "[REDACTED]"))
            .field("consumer_secret", &self.consumer_secret.as_ref().map(|_| "[REDACTED]"))
            .field("wordpress_username", &self.wordpress_username)
            .finish()
    }
}

/// Caller-facing settings edit.
///
/// `woocommerce_url` is the name the onboarding flow uses; it wins over
/// `store_url` when both are given.
#[derive(Clone, Default)]
pub struct SettingsUpdate {
    pub store_url: Option<String>,
    pub woocommerce_url: Option<String>,
    pub consumer_key: Option<String>,
    pub consumer_secret: Option<String>,
    pub wordpress_username: Option<String>,
    pub wordpress_app_password: Option<String>,
}

impl SettingsUpdate {
    /// Build the wire payload. The app password is sent verbatim.
    pub fn into_payload(self, csrf: Option<String>) -> SettingsPayload {
        let store_url = self.woocommerce_url.or(self.store_url).unwrap_or_default();
        SettingsPayload {
            store_url: sanitize_input(&store_url),
            consumer_key: sanitize_input(self.consumer_key.as_deref().unwrap_or_default()),
            consumer_secret: sanitize_input(self.consumer_secret.as_deref().unwrap_or_default()),
            wordpress_username: sanitize_input(
                self.wordpress_username.as_deref().unwrap_or_default(),
            ),
            wordpress_app_password: self.wordpress_app_password,
            csrf: csrf.unwrap_or_default(),
        }
    }
}

impl fmt::Debug for SettingsUpdate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SettingsUpdate")
            .field("store_url", &self.woocommerce_url.as_ref().or(self.store_url.as_ref()))
            .field("wordpress_username", &self.wordpress_username)
            .field("secrets", &"[REDACTED]")
            .finish()
    }
}

/// Body of `POST /settings`.
#[derive(Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsPayload {
    pub store_url: String,
    pub consumer_key: String,
    pub consumer_secret: String,
    pub wordpress_username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wordpress_app_password: Option<String>,
    #[serde(rename = "_csrf")]
    pub csrf: String,
}

impl fmt::Debug for SettingsPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SettingsPayload")
            .field("store_url", &self.store_url)
            .field("wordpress_username", &self.wordpress_username)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_prefers_woocommerce_url_and_keeps_password() {
        let payload = SettingsUpdate {
            store_url: Some("https://old.example.com".to_string()),
            woocommerce_url: Some(" https://shop.example.com ".to_string()),
            consumer_key: Some("ck_<123>".to_string()),
            wordpress_app_password: Some(" abcd efgh <ij> ".to_string()),
            ..SettingsUpdate::default()
        }
        .into_payload(Some("csrf-1".to_string()));

        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["storeUrl"], "https://shop.example.com");
        assert_eq!(json["consumerKey"], "ck_123");
        assert_eq!(json["consumerSecret"], "");
        assert_eq!(json["wordpressAppPassword"], " abcd efgh <ij> ");
        assert_eq!(json["_csrf"], "csrf-1");
    }

    #[test]
    fn debug_hides_secrets() {
        let update = SettingsUpdate {
            consumer_secret: Some("cs_topsecret".to_string()),
            ..SettingsUpdate::default()
        };
        assert!(!format!("{:?}", update).contains("topsecret"));
    }
}
