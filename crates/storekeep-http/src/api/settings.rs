//! Store connection settings.

use reqwest::StatusCode;
use serde_json::Value;
use tracing::{debug, instrument};

use storekeep_core::resources::{SettingsUpdate, StoreSettings};
use storekeep_core::{Error, Result};

use super::unwrap_key;
use crate::client::ApiClient;

const SETTINGS: &str = "/settings";

#[derive(Debug, Clone)]
pub struct SettingsApi {
    client: ApiClient,
}

impl SettingsApi {
    pub fn new(client: &ApiClient) -> Self {
        Self {
            client: client.clone(),
        }
    }

    /// Current settings, or `None` when none have been saved yet.
    pub async fn get(&self) -> Result<Option<StoreSettings>> {
        let body = match self.client.get(SETTINGS).await {
            Ok(response) => response.value()?,
            Err(Error::Api(err)) if err.status == StatusCode::NOT_FOUND.as_u16() => {
                debug!("no settings saved yet");
                return Ok(None);
            }
            Err(err) => return Err(err),
        };

        match body {
            Value::Null => Ok(None),
            Value::Object(ref map) if map.get("settings").is_some_and(Value::is_null) => Ok(None),
            body => Ok(Some(serde_json::from_value(unwrap_key(body, "settings"))?)),
        }
    }

    /// Save settings. Text fields are sanitised; the app password is sent
    /// as typed.
    #[instrument(skip(self, update))]
    pub async fn update(&self, update: SettingsUpdate) -> Result<StoreSettings> {
        let csrf = self.client.csrf_token().map(|t| t.as_str().to_string());
        let payload = update.into_payload(csrf);
        let body = self.client.post(SETTINGS, &payload).await?.value()?;
        Ok(serde_json::from_value(unwrap_key(body, "settings"))?)
    }
}
