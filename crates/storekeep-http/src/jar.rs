//! Cookie jar shared between the transport and the interceptors.

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use reqwest::header::HeaderValue;
use tracing::{debug, trace};
use url::Url;

use storekeep_core::cookie::CSRF_COOKIE;
use storekeep_core::{ApiUrl, Cookie, CookieJar, CsrfToken, SameSite};

/// A [`CookieJar`] behind a lock, installed as the `reqwest` cookie provider.
///
/// `reqwest` stores every `Set-Cookie` it sees here and replays matching
/// cookies on each request, so the HTTP-only refresh cookie travels without
/// client code ever reading it.
#[derive(Debug, Default)]
pub struct SharedCookieJar {
    jar: RwLock<CookieJar>,
}

impl SharedCookieJar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap a jar restored from storage.
    pub fn from_jar(jar: CookieJar) -> Self {
        Self {
            jar: RwLock::new(jar),
        }
    }

    /// Copy of the current contents, e.g. for persisting.
    pub fn snapshot(&self) -> CookieJar {
        let mut jar = self.read().clone();
        jar.cleanup_expired();
        jar
    }

    pub fn add(&self, cookie: Cookie) {
        self.write().add(cookie);
    }

    /// Script-readable cookie value; HTTP-only cookies are never returned.
    pub fn readable_value(&self, name: &str, url: &Url) -> Option<String> {
        self.read().readable_value(name, url)
    }

    /// Current CSRF token for requests to `url`.
    pub fn csrf_token(&self, url: &Url) -> Option<CsrfToken> {
        self.readable_value(CSRF_COOKIE, url)
            .filter(|value| !value.is_empty())
            .map(CsrfToken::new)
    }

    /// Write the CSRF cookie for the API host.
    pub(crate) fn store_csrf(&self, token: &str, api_url: &ApiUrl, max_age: Duration) {
        let Some(host) = api_url.host() else {
            return;
        };
        let max_age =
            chrono::Duration::from_std(max_age).unwrap_or_else(|_| chrono::Duration::hours(1));
        let cookie = Cookie::new(CSRF_COOKIE, token, host)
            .with_path("/")
            .with_same_site(SameSite::Strict)
            .with_secure(api_url.is_secure())
            .with_host_only(true)
            .with_max_age(max_age);
        debug!(host, "rotating CSRF cookie");
        self.add(cookie);
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    pub fn clear(&self) {
        self.write().clear();
    }

    fn read(&self) -> RwLockReadGuard<'_, CookieJar> {
        self.jar.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, CookieJar> {
        self.jar.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl reqwest::cookie::CookieStore for SharedCookieJar {
    fn set_cookies(&self, cookie_headers: &mut dyn Iterator<Item = &HeaderValue>, url: &Url) {
        let headers: Vec<&str> = cookie_headers.filter_map(|v| v.to_str().ok()).collect();
        if headers.is_empty() {
            return;
        }
        trace!(count = headers.len(), %url, "storing response cookies");
        self.write().store_set_cookies(headers, url);
    }

    fn cookies(&self, url: &Url) -> Option<HeaderValue> {
        let header = self.read().cookie_header(url)?;
        HeaderValue::from_str(&header).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::cookie::CookieStore;
    use storekeep_core::Environment;

    #[test]
    fn csrf_cookie_is_strict_and_readable() {
        let jar = SharedCookieJar::new();
        let api = ApiUrl::new("http://127.0.0.1:3000", Environment::Development).unwrap();
        jar.store_csrf("csrf-2", &api, Duration::from_secs(3600));

        let snapshot = jar.snapshot();
        let url = api.endpoint_url("/products").unwrap();
        let cookie = snapshot.get_for_url(&url)[0].clone();
        assert_eq!(cookie.same_site, SameSite::Strict);
        assert_eq!(cookie.path, "/");
        assert!(!cookie.secure);
        assert!(cookie.expires.is_some());
        assert!(cookie.host_only);
        assert_eq!(jar.csrf_token(&url).unwrap().as_str(), "csrf-2");
    }

    #[test]
    fn unbounded_csrf_lifetime_does_not_overflow() {
        let jar = SharedCookieJar::new();
        let api = ApiUrl::new("http://127.0.0.1:3000", Environment::Development).unwrap();
        jar.store_csrf("c", &api, Duration::MAX);
        let url = api.endpoint_url("/products").unwrap();
        assert_eq!(jar.csrf_token(&url).unwrap().as_str(), "c");
    }

    #[test]
    fn csrf_cookie_is_secure_over_https() {
        let jar = SharedCookieJar::new();
        let api = ApiUrl::new("https://admin.example.com", Environment::Development).unwrap();
        jar.store_csrf("c", &api, Duration::from_secs(60));
        let url = api.endpoint_url("/orders").unwrap();
        assert!(jar.snapshot().get_for_url(&url)[0].secure);
    }

    #[test]
    fn acts_as_reqwest_cookie_store() {
        let jar = SharedCookieJar::new();
        let url = Url::parse("http://localhost:3000/api/auth/login").unwrap();
        let headers = [
            HeaderValue::from_static("refresh-token=r1; Path=/; HttpOnly"),
            HeaderValue::from_static("csrf-token=c1; Path=/"),
        ];
        jar.set_cookies(&mut headers.iter(), &url);

        let sent = jar
            .cookies(&Url::parse("http://localhost:3000/api/products").unwrap())
            .unwrap();
        let sent = sent.to_str().unwrap();
        assert!(sent.contains("refresh-token=r1"));
        assert!(sent.contains("csrf-token=c1"));
        assert!(jar.readable_value("refresh-token", &url).is_none());
    }
}
