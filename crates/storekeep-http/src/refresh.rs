//! Silent access-token refresh with single-flight semantics.
//!
//! Every request that hits an expired token asks the coordinator for a new
//! one. The first caller starts `POST /auth/refresh`; callers arriving while
//! it is in flight await the same shared future. The token update,
//! subscriber notification and session teardown run inside that future, so
//! they happen exactly once per refresh regardless of how many requests
//! were waiting.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use futures_util::future::{BoxFuture, FutureExt, Shared};
use serde::Deserialize;
use tracing::{debug, info, instrument, warn};
use url::Url;

use storekeep_core::auth::RefreshFailureKind;
use storekeep_core::{
    AccessToken, ApiUrl, AuthStateStore, Environment, LOGIN_ROUTE, Navigator, RefreshFailure,
};

use crate::events::{ClientEvent, EventBus};
use crate::interceptor::ResponseInterceptor;
use crate::jar::SharedCookieJar;

type RefreshOutcome = Result<AccessToken, RefreshFailure>;
type RefreshFlight = Shared<BoxFuture<'static, RefreshOutcome>>;

/// Token-bearing response body. Older backends answer with `token`.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct TokenResponse {
    #[serde(default, rename = "accessToken")]
    access_token: Option<String>,
    #[serde(default)]
    token: Option<String>,
}

impl TokenResponse {
    pub(crate) fn from_slice(body: &[u8]) -> Self {
        serde_json::from_slice(body).unwrap_or_default()
    }

    pub(crate) fn into_token(self) -> Option<AccessToken> {
        let non_empty = |t: &String| !t.is_empty();
        self.access_token
            .filter(non_empty)
            .or(self.token.filter(non_empty))
            .map(AccessToken::new)
    }
}

/// Everything a refresh needs, detached from the client so the in-flight
/// future does not keep the client alive.
pub(crate) struct RefreshContext {
    pub(crate) http: reqwest::Client,
    pub(crate) refresh_url: Url,
    pub(crate) api_url: ApiUrl,
    pub(crate) environment: Environment,
    pub(crate) timeout: Duration,
    pub(crate) csrf_max_age: Duration,
    pub(crate) auth: Arc<AuthStateStore>,
    pub(crate) jar: Arc<SharedCookieJar>,
    pub(crate) navigator: Arc<dyn Navigator>,
    pub(crate) events: EventBus,
}

impl RefreshContext {
    async fn run(self: Arc<Self>) -> RefreshOutcome {
        let outcome = match tokio::time::timeout(self.timeout, self.request_token()).await {
            Ok(outcome) => outcome,
            Err(_) => Err(RefreshFailure::new(
                RefreshFailureKind::TimedOut {
                    duration_ms: u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX),
                },
                "",
            )),
        };

        match outcome {
            Ok(token) => {
                self.auth.set_token(Some(token.clone()));
                self.auth.notify_refreshed(&token);
                self.events.emit(ClientEvent::TokenRefreshed);
                info!("access token refreshed");
                Ok(token)
            }
            Err(failure) => {
                self.teardown(&failure);
                Err(failure)
            }
        }
    }

    #[instrument(skip(self), fields(url = %self.refresh_url))]
    async fn request_token(&self) -> RefreshOutcome {
        debug!("requesting new access token");
        let response = self
            .http
            .post(self.refresh_url.clone())
            .json(&serde_json::json!({}))
            .send()
            .await
            .map_err(|e| RefreshFailure::new(RefreshFailureKind::Transport, e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            self.responses().rotate_csrf(response.headers());
        }
        let body = response
            .bytes()
            .await
            .map_err(|e| RefreshFailure::new(RefreshFailureKind::Transport, e.to_string()))?;

        if !status.is_success() {
            return Err(RefreshFailure::new(
                RefreshFailureKind::Rejected {
                    status: status.as_u16(),
                },
                "",
            ));
        }

        TokenResponse::from_slice(&body)
            .into_token()
            .ok_or_else(|| RefreshFailure::new(RefreshFailureKind::MissingToken, ""))
    }

    fn teardown(&self, failure: &RefreshFailure) {
        warn!(%failure, "token refresh failed, ending session");
        self.auth.clear();

        let redirect_to = if self.navigator.is_on_login() {
            None
        } else {
            self.navigator.navigate(LOGIN_ROUTE);
            Some(LOGIN_ROUTE.to_string())
        };
        self.events.emit(ClientEvent::SessionExpired { redirect_to });
    }

    fn responses(&self) -> ResponseInterceptor<'_> {
        ResponseInterceptor {
            jar: &self.jar,
            api_url: &self.api_url,
            csrf_max_age: self.csrf_max_age,
            environment: self.environment,
            events: &self.events,
        }
    }
}

/// Hands out the in-flight refresh, starting one when none is running.
pub(crate) struct RefreshCoordinator {
    context: Arc<RefreshContext>,
    in_flight: Mutex<Option<(u64, RefreshFlight)>>,
    next_flight: AtomicU64,
}

impl RefreshCoordinator {
    pub(crate) fn new(context: RefreshContext) -> Self {
        Self {
            context: Arc::new(context),
            in_flight: Mutex::new(None),
            next_flight: AtomicU64::new(0),
        }
    }

    /// Obtain a fresh access token, joining a refresh already in flight.
    pub(crate) async fn refresh(&self) -> RefreshOutcome {
        let (id, flight) = self.join_or_start();
        let outcome = flight.await;
        self.finish(id);
        outcome
    }

    fn join_or_start(&self) -> (u64, RefreshFlight) {
        let mut slot = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some((id, flight)) = slot.as_ref() {
            debug!(flight = id, "joining in-flight refresh");
            return (*id, flight.clone());
        }

        let id = self.next_flight.fetch_add(1, Ordering::Relaxed);
        let flight = self.context.clone().run().boxed().shared();
        *slot = Some((id, flight.clone()));
        debug!(flight = id, "starting refresh");
        (id, flight)
    }

    fn finish(&self, id: u64) {
        let mut slot = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
        if slot.as_ref().is_some_and(|(current, _)| *current == id) {
            *slot = None;
        }
    }
}
