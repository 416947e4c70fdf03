//! Login, logout and session endpoints.

use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use storekeep_core::error::AuthError;
use storekeep_core::resources::User;
use storekeep_core::{AccessToken, Credentials, Error, Registration, Result};

use super::unwrap_key;
use crate::client::{ApiClient, ApiResponse};
use crate::interceptor::REFRESH_ROUTE;
use crate::refresh::TokenResponse;

const LOGIN: &str = "/auth/login";
const REGISTER: &str = "/auth/register";
const GOOGLE: &str = "/auth/google";
const LOGOUT: &str = "/auth/logout";
const ME: &str = "/auth/me";

/// What the backend says about a freshly authenticated user.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AuthSession {
    #[serde(default)]
    pub user: Option<User>,
}

/// Result of [`AuthApi::logout`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogoutOutcome {
    pub success: bool,
    /// The backend session was already gone; only local state was cleared.
    pub local_only: bool,
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
    #[serde(rename = "_csrf")]
    csrf: Option<String>,
}

#[derive(Serialize)]
struct GoogleRequest<'a> {
    credential: &'a str,
    #[serde(rename = "_csrf")]
    csrf: Option<String>,
}

/// Authentication endpoints. Successful logins store the access token in
/// the client's [`AuthStateStore`](storekeep_core::AuthStateStore).
#[derive(Debug, Clone)]
pub struct AuthApi {
    client: ApiClient,
}

impl AuthApi {
    pub fn new(client: &ApiClient) -> Self {
        Self {
            client: client.clone(),
        }
    }

    #[instrument(skip(self, credentials), fields(email = %credentials.email()))]
    pub async fn login(&self, credentials: &Credentials) -> Result<AuthSession> {
        let body = LoginRequest {
            email: credentials.email(),
            password: credentials.password(),
            name: None,
            csrf: self.csrf(),
        };
        let response = self.client.post(LOGIN, &body).await?;
        info!("logged in");
        self.accept_session(&response, LOGIN)
    }

    #[instrument(skip(self, registration), fields(email = %registration.credentials().email()))]
    pub async fn register(&self, registration: &Registration) -> Result<AuthSession> {
        let body = LoginRequest {
            email: registration.credentials().email(),
            password: registration.credentials().password(),
            name: Some(registration.name()),
            csrf: self.csrf(),
        };
        let response = self.client.post(REGISTER, &body).await?;
        info!("account registered");
        self.accept_session(&response, REGISTER)
    }

    /// Exchange a Google identity credential for a session.
    #[instrument(skip_all)]
    pub async fn google_login(&self, credential: &str) -> Result<AuthSession> {
        let body = GoogleRequest {
            credential,
            csrf: self.csrf(),
        };
        let response = self.client.post(GOOGLE, &body).await?;
        self.accept_session(&response, GOOGLE)
    }

    /// End the session. A 401 or 404 means the backend session is already
    /// gone and still counts as success. The local token is cleared in
    /// every case.
    #[instrument(skip(self))]
    pub async fn logout(&self) -> Result<LogoutOutcome> {
        let result = self.send_logout().await;
        self.client.auth_store().clear();

        match result {
            Ok(response) => {
                let success = response
                    .value()
                    .ok()
                    .and_then(|body| body.get("success").and_then(Value::as_bool))
                    .unwrap_or(true);
                info!("logged out");
                Ok(LogoutOutcome {
                    success,
                    local_only: false,
                })
            }
            Err(Error::Api(err)) if err.status == 401 || err.status == 404 => {
                debug!(status = err.status, "backend session already gone");
                Ok(LogoutOutcome {
                    success: true,
                    local_only: true,
                })
            }
            Err(err) => Err(err),
        }
    }

    /// The signed-in user.
    pub async fn me(&self) -> Result<User> {
        let body = self.client.get(ME).await?.value()?;
        Ok(serde_json::from_value(unwrap_key(body, "user"))?)
    }

    /// Explicitly refresh the access token from the refresh cookie.
    ///
    /// Unlike the silent refresh this does not notify refresh subscribers.
    #[instrument(skip(self))]
    pub async fn refresh_token(&self) -> Result<AccessToken> {
        let response = self
            .client
            .post(REFRESH_ROUTE, &serde_json::json!({}))
            .await?;
        let token = TokenResponse::from_slice(response.bytes())
            .into_token()
            .ok_or_else(|| AuthError::MissingAccessToken {
                endpoint: REFRESH_ROUTE.to_string(),
            })?;
        self.client.auth_store().set_token(Some(token.clone()));
        debug!("access token refreshed explicitly");
        Ok(token)
    }

    async fn send_logout(&self) -> Result<ApiResponse> {
        let request = self.client.request(Method::POST, LOGOUT)?;
        self.client.execute(request).await
    }

    fn csrf(&self) -> Option<String> {
        self.client.csrf_token().map(|t| t.as_str().to_string())
    }

    fn accept_session(&self, response: &ApiResponse, endpoint: &str) -> Result<AuthSession> {
        match TokenResponse::from_slice(response.bytes()).into_token() {
            Some(token) => self.client.auth_store().set_token(Some(token)),
            None => warn!(endpoint, "no access token in response"),
        }
        let body = response.value()?;
        Ok(serde_json::from_value(body).unwrap_or_default())
    }
}
