//! API base URL type.

use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

use crate::error::{Error, InvalidInputError};
use crate::types::Environment;

/// Path segment every backend route lives under.
const API_SEGMENT: &str = "/api";

/// A validated base URL for the admin backend.
///
/// The URL is absolute, uses HTTP(S), and always ends in `/api`. In
/// production a plain `http://` URL is upgraded to `https://`.
///
/// # Example
///
/// ```
/// use storekeep_core::{ApiUrl, Environment};
///
/// let api = ApiUrl::new("http://shop.example.com", Environment::Production).unwrap();
/// assert_eq!(api.endpoint("/products"), "https://shop.example.com/api/products");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ApiUrl(Url);

impl ApiUrl {
    /// Create a new API URL from a string, validating and normalising it.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL cannot be parsed, is not HTTP(S), or has no host.
    pub fn new(s: impl AsRef<str>, environment: Environment) -> Result<Self, Error> {
        let s = s.as_ref();
        let mut url = Url::parse(s).map_err(|e| InvalidInputError::ApiUrl {
            value: s.to_string(),
            reason: e.to_string(),
        })?;

        Self::validate(&url, s)?;

        if environment.is_production() && url.scheme() == "http" {
            // http -> https is always a permitted scheme change
            let _ = url.set_scheme("https");
        }

        let trimmed = url.path().trim_end_matches('/').to_string();
        let path = if trimmed.ends_with(API_SEGMENT) {
            trimmed
        } else {
            format!("{}{}", trimmed, API_SEGMENT)
        };
        url.set_path(&path);
        url.set_query(None);
        url.set_fragment(None);

        Ok(Self(url))
    }

    /// Returns the full URL string for a backend route such as `/products`.
    pub fn endpoint(&self, route: &str) -> String {
        let base = self.0.as_str().trim_end_matches('/');
        if route.starts_with('/') {
            format!("{}{}", base, route)
        } else {
            format!("{}/{}", base, route)
        }
    }

    /// Parsed form of [`ApiUrl::endpoint`].
    pub fn endpoint_url(&self, route: &str) -> Result<Url, Error> {
        let raw = self.endpoint(route);
        Url::parse(&raw).map_err(|e| {
            InvalidInputError::ApiUrl {
                value: raw,
                reason: e.to_string(),
            }
            .into()
        })
    }

    /// Returns the base URL as a string.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Returns the inner URL.
    pub fn as_url(&self) -> &Url {
        &self.0
    }

    /// Returns the host string.
    pub fn host(&self) -> Option<&str> {
        self.0.host_str()
    }

    /// True when requests go over TLS.
    pub fn is_secure(&self) -> bool {
        self.0.scheme() == "https"
    }

    fn validate(url: &Url, original: &str) -> Result<(), Error> {
        if url.cannot_be_a_base() {
            return Err(InvalidInputError::ApiUrl {
                value: original.to_string(),
                reason: "must be an absolute URL".to_string(),
            }
            .into());
        }

        let scheme = url.scheme();
        if scheme != "http" && scheme != "https" {
            return Err(InvalidInputError::ApiUrl {
                value: original.to_string(),
                reason: "must use http or https".to_string(),
            }
            .into());
        }

        if url.host_str().is_none() {
            return Err(InvalidInputError::ApiUrl {
                value: original.to_string(),
                reason: "must have a host".to_string(),
            }
            .into());
        }

        Ok(())
    }
}

impl fmt::Display for ApiUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for ApiUrl {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.0.as_str())
    }
}

impl<'de> Deserialize<'de> for ApiUrl {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        ApiUrl::new(&s, Environment::Development).map_err(serde::de::Error::custom)
    }
}

impl AsRef<str> for ApiUrl {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appends_api_segment() {
        let api = ApiUrl::new("http://localhost:3000", Environment::Development).unwrap();
        assert_eq!(api.as_str(), "http://localhost:3000/api");
        assert_eq!(api.endpoint("/auth/me"), "http://localhost:3000/api/auth/me");
    }

    #[test]
    fn keeps_existing_api_segment() {
        let api = ApiUrl::new("https://admin.example.com/api/", Environment::Development).unwrap();
        assert_eq!(api.as_str(), "https://admin.example.com/api");
        assert_eq!(
            api.endpoint("products"),
            "https://admin.example.com/api/products"
        );
    }

    #[test]
    fn production_upgrades_to_https() {
        let api = ApiUrl::new("http://admin.example.com/api", Environment::Production).unwrap();
        assert!(api.is_secure());
        assert_eq!(api.as_str(), "https://admin.example.com/api");
    }

    #[test]
    fn development_keeps_http() {
        let api = ApiUrl::new("http://127.0.0.1:8080", Environment::Development).unwrap();
        assert!(!api.is_secure());
        assert_eq!(api.host(), Some("127.0.0.1"));
    }

    #[test]
    fn rejects_relative_and_foreign_schemes() {
        assert!(ApiUrl::new("/api", Environment::Development).is_err());
        assert!(ApiUrl::new("ftp://example.com", Environment::Development).is_err());
    }
}
