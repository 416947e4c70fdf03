//! Incoming response handling that does not need the network.

use std::time::Duration;

use reqwest::header::HeaderMap;
use tracing::warn;

use storekeep_core::error::GENERIC_FAILURE_MESSAGE;
use storekeep_core::{ApiError, ApiUrl, Environment, Error};

use super::CSRF_HEADER;
use crate::attempt::RequestAttempt;
use crate::events::{ClientEvent, EventBus};
use crate::jar::SharedCookieJar;

pub(crate) const REFRESH_ROUTE: &str = "/auth/refresh";

/// Routes whose 401s are answers, not expired sessions.
const AUTH_ROUTES: [&str; 6] = [
    "/auth/me",
    "/auth/login",
    "/auth/register",
    "/auth/logout",
    REFRESH_ROUTE,
    "/auth/google",
];

/// New accounts have no store settings yet; that 404 is routine.
const SETTINGS_ROUTE: &str = "/settings";

pub(crate) fn is_auth_endpoint(route: &str) -> bool {
    AUTH_ROUTES.contains(&route.trim_end_matches('/'))
}

/// True when a failed response should be recovered by refreshing.
pub(crate) fn should_refresh(error: &ApiError, attempt: RequestAttempt) -> bool {
    error.is_unauthorized()
        && error.is_token_expired()
        && !is_auth_endpoint(&error.path)
        && attempt.can_retry()
}

/// Post-response bookkeeping shared by the pipeline and the refresh call.
pub(crate) struct ResponseInterceptor<'a> {
    pub(crate) jar: &'a SharedCookieJar,
    pub(crate) api_url: &'a ApiUrl,
    pub(crate) csrf_max_age: Duration,
    pub(crate) environment: Environment,
    pub(crate) events: &'a EventBus,
}

impl ResponseInterceptor<'_> {
    /// Rewrite the CSRF cookie when a successful response carries a new token.
    pub(crate) fn rotate_csrf(&self, headers: &HeaderMap) {
        let token = headers
            .get(CSRF_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|t| !t.is_empty());

        if let Some(token) = token {
            self.jar.store_csrf(token, self.api_url, self.csrf_max_age);
        }
    }

    /// Log a failure that is being handed back to the caller and broadcast
    /// it to UI listeners.
    pub(crate) fn report(&self, error: &Error) {
        let message = match error {
            Error::Api(api) => {
                self.log_api_error(api);
                api.broadcast_message()
            }
            other => {
                if self.environment.is_production() {
                    warn!(code = %other.error_code(), "request failed");
                } else {
                    warn!(error = %other, "request failed");
                }
                GENERIC_FAILURE_MESSAGE.to_string()
            }
        };
        self.events.emit(ClientEvent::ApiError { message });
    }

    fn log_api_error(&self, api: &ApiError) {
        if api.status == 404 && api.path == SETTINGS_ROUTE {
            return;
        }
        if self.environment.is_production() {
            warn!(status = api.status, "API request failed");
        } else {
            warn!(
                status = api.status,
                path = %api.path,
                code = ?api.code,
                message = ?api.message,
                error = ?api.error,
                "API request failed"
            );
        }
    }
}
