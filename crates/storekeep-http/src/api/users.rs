//! The dashboard user's own profile.

use serde_json::Value;

use storekeep_core::Result;
use storekeep_core::resources::{Extra, User};

use super::unwrap_key;
use crate::client::ApiClient;

const PROFILE: &str = "/users/me";

#[derive(Debug, Clone)]
pub struct UsersApi {
    client: ApiClient,
}

impl UsersApi {
    pub fn new(client: &ApiClient) -> Self {
        Self {
            client: client.clone(),
        }
    }

    pub async fn profile(&self) -> Result<User> {
        let body = self.client.get(PROFILE).await?.value()?;
        Ok(serde_json::from_value(unwrap_key(body, "user"))?)
    }

    /// Update profile fields; the CSRF token is echoed in `_csrf`.
    pub async fn update_profile(&self, mut profile: Extra) -> Result<User> {
        let csrf = self
            .client
            .csrf_token()
            .map_or(Value::Null, |t| Value::String(t.as_str().to_string()));
        profile.insert("_csrf".to_string(), csrf);

        let body = self.client.put(PROFILE, &profile).await?.value()?;
        Ok(serde_json::from_value(unwrap_key(body, "user"))?)
    }
}
