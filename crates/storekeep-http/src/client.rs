//! The authenticated HTTP client.

use std::fmt;
use std::sync::Arc;

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use reqwest::{Method, Request, RequestBuilder, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::broadcast;
use tracing::{debug, info, instrument, trace};
use url::Url;

use storekeep_core::{
    AccessToken, ApiError, ApiUrl, AuthStateStore, CsrfToken, Error, MemoryNavigator, Navigator, Result,
};

use crate::attempt::RequestAttempt;
use crate::config::ClientConfig;
use crate::error::transport_error;
use crate::events::{ClientEvent, EventBus};
use crate::interceptor::{
    REFRESH_ROUTE, RequestInterceptor, ResponseInterceptor, bearer_header, should_refresh,
};
use crate::jar::SharedCookieJar;
use crate::refresh::{RefreshContext, RefreshCoordinator};

/// A buffered successful response.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Vec<u8>,
}

impl ApiResponse {
    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// A header value as text, if present and valid UTF-8.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn bytes(&self) -> &[u8] {
        &self.body
    }

    /// Decode the body. An empty body decodes as JSON `null`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        let body: &[u8] = if self.body.is_empty() { b"null" } else { &self.body };
        Ok(serde_json::from_slice(body)?)
    }

    /// The body as an untyped JSON value.
    pub fn value(&self) -> Result<serde_json::Value> {
        self.json()
    }
}

/// Handle to the authenticated client.
///
/// Cloning is cheap; every clone shares the transport, cookie jar, auth
/// store and in-flight refresh.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    http: reqwest::Client,
    config: ClientConfig,
    api_url: ApiUrl,
    auth: Arc<AuthStateStore>,
    jar: Arc<SharedCookieJar>,
    navigator: Arc<dyn Navigator>,
    events: EventBus,
    refresh: RefreshCoordinator,
}

/// Builder for [`ApiClient`].
pub struct ApiClientBuilder {
    config: ClientConfig,
    auth: Option<Arc<AuthStateStore>>,
    navigator: Option<Arc<dyn Navigator>>,
    jar: Option<Arc<SharedCookieJar>>,
}

impl ApiClientBuilder {
    /// Use an existing auth store. Without one the client gets a fresh store.
    #[must_use]
    pub fn auth_store(mut self, auth: Arc<AuthStateStore>) -> Self {
        self.auth = Some(auth);
        self
    }

    /// Router used for session teardown. Defaults to a [`MemoryNavigator`] on `/`.
    #[must_use]
    pub fn navigator(mut self, navigator: Arc<dyn Navigator>) -> Self {
        self.navigator = Some(navigator);
        self
    }

    /// Start from a jar restored from storage.
    #[must_use]
    pub fn cookie_jar(mut self, jar: Arc<SharedCookieJar>) -> Self {
        self.jar = Some(jar);
        self
    }

    /// Validate the configuration and build the client.
    ///
    /// # Errors
    ///
    /// Fails when the base URL is invalid or the TLS backend cannot start.
    pub fn build(self) -> Result<ApiClient> {
        let config = self.config;
        let api_url = ApiUrl::new(config.api_url(), config.environment())?;
        let refresh_url = api_url.endpoint_url(REFRESH_ROUTE)?;
        let auth = self.auth.unwrap_or_default();
        let jar = self.jar.unwrap_or_default();
        let navigator = self
            .navigator
            .unwrap_or_else(|| Arc::new(MemoryNavigator::default()) as Arc<dyn Navigator>);

        let http = reqwest::Client::builder()
            .user_agent(config.user_agent())
            .timeout(config.request_timeout())
            .connect_timeout(config.connect_timeout())
            .cookie_provider(jar.clone())
            .build()
            .map_err(|e| transport_error(e, config.connect_timeout()))?;

        let events = EventBus::new();
        let refresh = RefreshCoordinator::new(RefreshContext {
            http: http.clone(),
            refresh_url,
            api_url: api_url.clone(),
            environment: config.environment(),
            timeout: config.refresh_timeout(),
            csrf_max_age: config.csrf_max_age(),
            auth: auth.clone(),
            jar: jar.clone(),
            navigator: navigator.clone(),
            events: events.clone(),
        });

        debug!(api = %api_url, environment = %config.environment(), "API client ready");

        Ok(ApiClient {
            inner: Arc::new(ClientInner {
                http,
                config,
                api_url,
                auth,
                jar,
                navigator,
                events,
                refresh,
            }),
        })
    }
}

impl ApiClient {
    /// Create a client sharing `auth` with the caller.
    pub fn new(config: ClientConfig, auth: Arc<AuthStateStore>) -> Result<Self> {
        Self::builder(config).auth_store(auth).build()
    }

    pub fn builder(config: ClientConfig) -> ApiClientBuilder {
        ApiClientBuilder {
            config,
            auth: None,
            navigator: None,
            jar: None,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    /// Normalised base URL, always ending in `/api`.
    pub fn api_url(&self) -> &ApiUrl {
        &self.inner.api_url
    }

    pub fn auth_store(&self) -> &Arc<AuthStateStore> {
        &self.inner.auth
    }

    pub fn cookie_jar(&self) -> &Arc<SharedCookieJar> {
        &self.inner.jar
    }

    pub fn navigator(&self) -> &Arc<dyn Navigator> {
        &self.inner.navigator
    }

    /// Subscribe to client events. Events sent before subscribing are not
    /// replayed.
    pub fn events(&self) -> broadcast::Receiver<ClientEvent> {
        self.inner.events.subscribe()
    }

    /// Current CSRF token, as read from the readable cookie.
    pub fn csrf_token(&self) -> Option<CsrfToken> {
        self.inner.jar.csrf_token(self.inner.api_url.as_url())
    }

    /// Absolute URL for a backend route.
    pub fn endpoint(&self, route: &str) -> Result<Url> {
        self.inner.api_url.endpoint_url(route)
    }

    /// Start a request for `route`; finish it with [`ApiClient::execute`].
    pub fn request(&self, method: Method, route: &str) -> Result<RequestBuilder> {
        Ok(self.inner.http.request(method, self.endpoint(route)?))
    }

    /// Build and send a request started with [`ApiClient::request`].
    pub async fn execute(&self, builder: RequestBuilder) -> Result<ApiResponse> {
        let request = builder
            .build()
            .map_err(|e| transport_error(e, self.inner.config.request_timeout()))?;
        self.send(request).await
    }

    pub async fn get(&self, route: &str) -> Result<ApiResponse> {
        self.execute(self.request(Method::GET, route)?).await
    }

    pub async fn get_with<Q>(&self, route: &str, query: &Q) -> Result<ApiResponse>
    where
        Q: Serialize + ?Sized,
    {
        self.execute(self.request(Method::GET, route)?.query(query))
            .await
    }

    pub async fn post<B>(&self, route: &str, body: &B) -> Result<ApiResponse>
    where
        B: Serialize + ?Sized,
    {
        self.execute(self.request(Method::POST, route)?.json(body))
            .await
    }

    pub async fn put<B>(&self, route: &str, body: &B) -> Result<ApiResponse>
    where
        B: Serialize + ?Sized,
    {
        self.execute(self.request(Method::PUT, route)?.json(body))
            .await
    }

    pub async fn delete(&self, route: &str) -> Result<ApiResponse> {
        self.execute(self.request(Method::DELETE, route)?).await
    }

    /// Send a request through both interceptor stages.
    ///
    /// A 401 carrying `TOKEN_EXPIRED` on a non-auth route triggers one
    /// refresh and one retry. When the token was already replaced while the
    /// request was in flight, the retry uses the new token without another
    /// refresh. If the refresh fails the session is torn down and the
    /// original 401 is returned; `SessionExpired` is broadcast in place of
    /// `ApiError`. Every other failure is returned unchanged after being
    /// logged and broadcast.
    #[instrument(skip_all, fields(method = %request.method(), path = %request.url().path()))]
    pub async fn send(&self, request: Request) -> Result<ApiResponse> {
        let route = self.route_of(request.url());
        let mut request = request;
        let mut attempt = RequestAttempt::first();

        loop {
            let retry = request.try_clone();
            self.requests().intercept(&mut request, &route)?;
            let sent_with = request.headers().get(AUTHORIZATION).cloned();
            debug!(attempt = attempt.number(), "sending request");

            let (status, headers, body) = match self.dispatch(request).await {
                Ok(parts) => parts,
                Err(error) => {
                    self.responses().report(&error);
                    return Err(error);
                }
            };
            trace!(status = %status, bytes = body.len(), "response received");

            if status.is_success() {
                self.responses().rotate_csrf(&headers);
                return Ok(ApiResponse {
                    status,
                    headers,
                    body,
                });
            }

            let error = ApiError::from_body(status.as_u16(), route.clone(), &body);
            if should_refresh(&error, attempt) {
                if let (Some(next), Some(mut retry)) = (attempt.next(), retry) {
                    let renewed = match self.token_newer_than(sent_with.as_ref()) {
                        Some(token) => {
                            debug!("token replaced while request was in flight, retrying");
                            Ok(token)
                        }
                        None => {
                            info!("access token expired, attempting refresh");
                            self.inner.refresh.refresh().await
                        }
                    };
                    match renewed {
                        Ok(token) => {
                            retry
                                .headers_mut()
                                .insert(AUTHORIZATION, bearer_header(&token)?);
                            request = retry;
                            attempt = next;
                            continue;
                        }
                        Err(failure) => {
                            debug!(%failure, "refresh failed, returning original error");
                            return Err(error.into());
                        }
                    }
                }
            }

            let error = Error::Api(error);
            self.responses().report(&error);
            return Err(error);
        }
    }

    async fn dispatch(&self, request: Request) -> Result<(StatusCode, HeaderMap, Vec<u8>)> {
        let timeout = self.inner.config.request_timeout();
        let response = self
            .inner
            .http
            .execute(request)
            .await
            .map_err(|e| transport_error(e, timeout))?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .bytes()
            .await
            .map_err(|e| transport_error(e, timeout))?;
        Ok((status, headers, body.to_vec()))
    }

    /// The current token, when it differs from the one a request carried.
    fn token_newer_than(&self, sent_with: Option<&HeaderValue>) -> Option<AccessToken> {
        let current = self.inner.auth.token()?;
        let sent = sent_with.map(HeaderValue::as_bytes);
        (sent != Some(current.bearer().as_bytes())).then_some(current)
    }

    /// Path of `url` relative to the API base, e.g. `/products/7`.
    fn route_of(&self, url: &Url) -> String {
        let base = self.inner.api_url.as_url().path().trim_end_matches('/');
        match url.path().strip_prefix(base) {
            Some("") => "/".to_string(),
            Some(rest) if rest.starts_with('/') => rest.to_string(),
            _ => url.path().to_string(),
        }
    }

    fn requests(&self) -> RequestInterceptor<'_> {
        RequestInterceptor {
            auth: &self.inner.auth,
            jar: &self.inner.jar,
            environment: self.inner.config.environment(),
        }
    }

    fn responses(&self) -> ResponseInterceptor<'_> {
        ResponseInterceptor {
            jar: &self.inner.jar,
            api_url: &self.inner.api_url,
            csrf_max_age: self.inner.config.csrf_max_age(),
            environment: self.inner.config.environment(),
            events: &self.inner.events,
        }
    }
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("api_url", &self.inner.api_url)
            .field("environment", &self.inner.config.environment())
            .field("auth", &self.inner.auth)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storekeep_core::Environment;

    fn client(url: &str) -> ApiClient {
        ApiClient::new(ClientConfig::new(url), Arc::new(AuthStateStore::new())).unwrap()
    }

    #[test]
    fn base_url_is_normalised() {
        let client = client("http://localhost:3000");
        assert_eq!(client.api_url().as_str(), "http://localhost:3000/api");
        assert_eq!(
            client.endpoint("/products/7").unwrap().as_str(),
            "http://localhost:3000/api/products/7"
        );
    }

    #[test]
    fn production_upgrades_to_https() {
        let client = ApiClient::new(
            ClientConfig::new("http://admin.example.com/api/")
                .with_environment(Environment::Production),
            Arc::new(AuthStateStore::new()),
        )
        .unwrap();
        assert_eq!(client.api_url().as_str(), "https://admin.example.com/api");
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let result = ApiClient::new(ClientConfig::new("not a url"), Arc::new(AuthStateStore::new()));
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    #[test]
    fn routes_are_relative_to_api_base() {
        let client = client("http://localhost:3000/api");
        let url = |p: &str| Url::parse(&format!("http://localhost:3000{}", p)).unwrap();
        assert_eq!(client.route_of(&url("/api/products/7")), "/products/7");
        assert_eq!(client.route_of(&url("/api")), "/");
        assert_eq!(client.route_of(&url("/apix/products")), "/apix/products");
    }

    #[test]
    fn clones_share_auth_state() {
        let client = client("http://localhost:3000");
        let other = client.clone();
        client
            .auth_store()
            .set_token(Some(storekeep_core::AccessToken::new("tokA")));
        assert!(other.auth_store().is_authenticated());
        assert!(!format!("{:?}", other).contains("tokA"));
    }

    #[test]
    fn empty_body_decodes_as_null() {
        let response = ApiResponse {
            status: StatusCode::NO_CONTENT,
            headers: HeaderMap::new(),
            body: Vec::new(),
        };
        assert_eq!(response.value().unwrap(), serde_json::Value::Null);
        let parsed: Option<u32> = response.json().unwrap();
        assert!(parsed.is_none());
    }
}
