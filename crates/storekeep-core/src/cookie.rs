//! Cookie model and jar.
//!
//! The jar plays the browser's role: it stores whatever the backend sets
//! (including the HTTP-only refresh cookie) and replays matching cookies on
//! later requests. Client code only ever reads cookies through
//! [`CookieJar::readable_value`], which refuses HTTP-only entries.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

/// Name of the readable anti-forgery cookie.
pub const CSRF_COOKIE: &str = "csrf-token";

/// Longest lifetime a cookie may be given, in seconds (400 days).
const MAX_COOKIE_AGE_SECS: i64 = 400 * 24 * 60 * 60;

/// A single HTTP cookie.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Cookie {
    pub name: String,
    pub value: String,
    /// Host the cookie belongs to, without a leading dot.
    pub domain: String,
    #[serde(default = "default_path")]
    pub path: String,
    /// Expiration time (None for session cookies).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires: Option<DateTime<Utc>>,
    #[serde(default)]
    pub http_only: bool,
    #[serde(default)]
    pub secure: bool,
    #[serde(default)]
    pub same_site: SameSite,
    /// Sent only to `domain` itself, never to its subdomains.
    #[serde(default)]
    pub host_only: bool,
}

fn default_path() -> String {
    "/".to_string()
}

impl Cookie {
    /// Create a new session cookie with path `/`.
    pub fn new(name: impl Into<String>, value: impl Into<String>, domain: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            domain: domain.into().trim_start_matches('.').to_lowercase(),
            path: default_path(),
            expires: None,
            http_only: false,
            secure: false,
            same_site: SameSite::default(),
            host_only: false,
        }
    }

    #[must_use]
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    /// Expire the cookie `max_age` from now.
    #[must_use]
    pub fn with_max_age(mut self, max_age: Duration) -> Self {
        self.expires = Some(expiry_after(max_age));
        self
    }

    #[must_use]
    pub fn with_host_only(mut self, host_only: bool) -> Self {
        self.host_only = host_only;
        self
    }

    #[must_use]
    pub fn with_http_only(mut self, http_only: bool) -> Self {
        self.http_only = http_only;
        self
    }

    #[must_use]
    pub fn with_secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    #[must_use]
    pub fn with_same_site(mut self, same_site: SameSite) -> Self {
        self.same_site = same_site;
        self
    }

    pub fn is_expired(&self) -> bool {
        self.expires.is_some_and(|exp| exp <= Utc::now())
    }

    /// Check whether the cookie should be sent to `url`.
    pub fn applies_to(&self, url: &Url) -> bool {
        if self.secure && url.scheme() != "https" {
            return false;
        }

        let Some(host) = url.host_str() else {
            return false;
        };
        let matches = if self.host_only {
            host.eq_ignore_ascii_case(&self.domain)
        } else {
            domain_matches(&self.domain, host)
        };
        if !matches {
            return false;
        }

        path_matches(&self.path, url.path())
    }

    /// `name=value` pair for the `Cookie` request header.
    pub fn to_cookie_header(&self) -> String {
        format!("{}={}", self.name, self.value)
    }

    /// Parse a `Set-Cookie` header received from `request_url`.
    ///
    /// Returns `None` for malformed headers and for a `Domain` attribute
    /// that does not cover the request host.
    pub fn from_set_cookie(header: &str, request_url: &Url) -> Option<Self> {
        let mut parts = header.split(';');
        let (name, value) = parts.next()?.split_once('=')?;
        let name = name.trim();
        if name.is_empty() {
            return None;
        }

        let host = request_url.host_str()?;
        let is_ip = !matches!(request_url.host(), Some(url::Host::Domain(_)));
        let mut cookie =
            Cookie::new(name, value.trim().trim_matches('"'), host).with_host_only(true);

        for part in parts {
            let part = part.trim();
            match part.split_once('=') {
                Some((attr, val)) => {
                    let val = val.trim();
                    match attr.trim().to_ascii_lowercase().as_str() {
                        "domain" if !val.is_empty() => {
                            let domain = val.trim_start_matches('.').to_lowercase();
                            let allowed = if is_ip {
                                domain == host
                            } else {
                                domain_matches(&domain, host)
                            };
                            if !allowed {
                                return None;
                            }
                            cookie.domain = domain;
                            cookie.host_only = false;
                        }
                        "path" if val.starts_with('/') => cookie.path = val.to_string(),
                        "expires" => {
                            // Max-Age takes precedence when both are present
                            if cookie.expires.is_none() {
                                if let Ok(exp) = DateTime::parse_from_rfc2822(val) {
                                    let latest = expiry_after(max_cookie_age());
                                    cookie.expires = Some(exp.with_timezone(&Utc).min(latest));
                                }
                            }
                        }
                        "max-age" => {
                            if let Some(max_age) = parse_max_age(val) {
                                cookie.expires = Some(expiry_after(max_age));
                            }
                        }
                        "samesite" => cookie.same_site = SameSite::parse(val),
                        _ => {}
                    }
                }
                None => match part.to_ascii_lowercase().as_str() {
                    "httponly" => cookie.http_only = true,
                    "secure" => cookie.secure = true,
                    _ => {}
                },
            }
        }

        Some(cookie)
    }
}

/// SameSite attribute values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SameSite {
    #[default]
    Lax,
    Strict,
    None,
}

impl SameSite {
    fn parse(value: &str) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "strict" => SameSite::Strict,
            "none" => SameSite::None,
            _ => SameSite::Lax,
        }
    }
}

/// Cookie storage keyed by domain.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CookieJar {
    #[serde(default)]
    cookies: HashMap<String, Vec<Cookie>>,
}

impl CookieJar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a cookie, replacing any with the same name and path.
    ///
    /// An already-expired cookie acts as a deletion, which is how servers
    /// clear cookies on logout.
    pub fn add(&mut self, cookie: Cookie) {
        let cookies = self.cookies.entry(cookie.domain.clone()).or_default();
        cookies.retain(|c| c.name != cookie.name || c.path != cookie.path);

        if !cookie.is_expired() {
            cookies.push(cookie);
        }
    }

    /// Parse and store every `Set-Cookie` header from a response.
    pub fn store_set_cookies<'a>(&mut self, headers: impl IntoIterator<Item = &'a str>, url: &Url) {
        for header in headers {
            if let Some(cookie) = Cookie::from_set_cookie(header, url) {
                self.add(cookie);
            }
        }
    }

    /// Remove a cookie by name and domain.
    pub fn remove(&mut self, name: &str, domain: &str) {
        if let Some(cookies) = self.cookies.get_mut(domain) {
            cookies.retain(|c| c.name != name);
        }
    }

    /// All live cookies that apply to `url`, longest path first.
    pub fn get_for_url(&self, url: &Url) -> Vec<&Cookie> {
        let mut matching: Vec<&Cookie> = self
            .cookies
            .values()
            .flatten()
            .filter(|c| !c.is_expired() && c.applies_to(url))
            .collect();
        matching.sort_by(|a, b| b.path.len().cmp(&a.path.len()));
        matching
    }

    /// Value of a script-readable cookie.
    ///
    /// HTTP-only cookies are invisible here, exactly as they are to page
    /// scripts in a browser.
    pub fn readable_value(&self, name: &str, url: &Url) -> Option<String> {
        self.get_for_url(url)
            .into_iter()
            .find(|c| c.name == name && !c.http_only)
            .map(|c| c.value.clone())
    }

    /// Build the `Cookie` header value for a URL.
    pub fn cookie_header(&self, url: &Url) -> Option<String> {
        let cookies = self.get_for_url(url);
        if cookies.is_empty() {
            return None;
        }

        let pairs: Vec<String> = cookies.iter().map(|c| c.to_cookie_header()).collect();
        Some(pairs.join("; "))
    }

    /// Remove expired cookies.
    pub fn cleanup_expired(&mut self) {
        for cookies in self.cookies.values_mut() {
            cookies.retain(|c| !c.is_expired());
        }
        self.cookies.retain(|_, cookies| !cookies.is_empty());
    }

    pub fn len(&self) -> usize {
        self.cookies.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&mut self) {
        self.cookies.clear();
    }
}

/// Delta-seconds value of a `Max-Age` attribute, clamped to the allowed
/// lifetime. Digit strings too long for `i64` count as the maximum.
fn parse_max_age(val: &str) -> Option<Duration> {
    let secs = match val.parse::<i64>() {
        Ok(secs) => secs,
        Err(_) if !val.is_empty() && val.bytes().all(|b| b.is_ascii_digit()) => i64::MAX,
        Err(_) => return None,
    };
    Duration::try_seconds(secs.clamp(-1, MAX_COOKIE_AGE_SECS))
}

fn max_cookie_age() -> Duration {
    Duration::try_seconds(MAX_COOKIE_AGE_SECS).unwrap_or_else(Duration::zero)
}

/// Expiry `max_age` from now. Non-positive ages expire immediately and the
/// lifetime is capped at [`MAX_COOKIE_AGE_SECS`].
fn expiry_after(max_age: Duration) -> DateTime<Utc> {
    let now = Utc::now();
    now.checked_add_signed(max_age.min(max_cookie_age())).unwrap_or(now)
}

fn domain_matches(cookie_domain: &str, request_host: &str) -> bool {
    let request_host = request_host.to_lowercase();
    request_host == cookie_domain || request_host.ends_with(&format!(".{}", cookie_domain))
}

fn path_matches(cookie_path: &str, request_path: &str) -> bool {
    if cookie_path == "/" || request_path == cookie_path {
        return true;
    }
    request_path.starts_with(cookie_path)
        && (cookie_path.ends_with('/') || request_path[cookie_path.len()..].starts_with('/'))
}
