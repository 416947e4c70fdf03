//! Client configuration.

use std::time::Duration;

use storekeep_core::error::InvalidInputError;
use storekeep_core::{Environment, Result};

/// Base URL used when nothing else is configured.
pub const DEFAULT_API_URL: &str = "http://localhost:3000/api";

const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const DEFAULT_REFRESH_TIMEOUT: Duration = Duration::from_secs(10);
const DEFAULT_CSRF_MAX_AGE: Duration = Duration::from_secs(3600);

/// Settings for an [`ApiClient`](crate::ApiClient).
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use storekeep_core::Environment;
/// use storekeep_http::ClientConfig;
///
/// let config = ClientConfig::new("https://admin.example.com")
///     .with_environment(Environment::Production)
///     .with_request_timeout(Duration::from_secs(5));
/// assert_eq!(config.request_timeout(), Duration::from_secs(5));
/// ```
#[derive(Debug, Clone)]
pub struct ClientConfig {
    api_url: String,
    environment: Environment,
    request_timeout: Duration,
    connect_timeout: Duration,
    refresh_timeout: Duration,
    csrf_max_age: Duration,
    user_agent: String,
}

impl ClientConfig {
    /// Configuration with defaults for everything but the base URL.
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            environment: Environment::default(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            refresh_timeout: DEFAULT_REFRESH_TIMEOUT,
            csrf_max_age: DEFAULT_CSRF_MAX_AGE,
            user_agent: concat!("storekeep/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }

    /// Read `STOREKEEP_API_URL`, `STOREKEEP_ENV` and
    /// `STOREKEEP_TIMEOUT_SECS` from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`ClientConfig::from_env`], with a caller-supplied lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_url = lookup("STOREKEEP_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let mut config = Self::new(api_url);

        if let Some(env) = lookup("STOREKEEP_ENV") {
            config.environment = env.parse()?;
        }
        if let Some(raw) = lookup("STOREKEEP_TIMEOUT_SECS") {
            let secs: u64 = raw.trim().parse().map_err(|_| InvalidInputError::Other {
                message: format!("STOREKEEP_TIMEOUT_SECS must be a whole number, got '{}'", raw),
            })?;
            config.request_timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }

    #[must_use]
    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }

    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Upper bound for a single `POST /auth/refresh`.
    #[must_use]
    pub fn with_refresh_timeout(mut self, timeout: Duration) -> Self {
        self.refresh_timeout = timeout;
        self
    }

    /// Lifetime of the CSRF cookie written on rotation.
    #[must_use]
    pub fn with_csrf_max_age(mut self, max_age: Duration) -> Self {
        self.csrf_max_age = max_age;
        self
    }

    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    pub fn environment(&self) -> Environment {
        self.environment
    }

    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    pub fn connect_timeout(&self) -> Duration {
        self.connect_timeout
    }

    pub fn refresh_timeout(&self) -> Duration {
        self.refresh_timeout
    }

    pub fn csrf_max_age(&self) -> Duration {
        self.csrf_max_age
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_without_variables() {
        let config = ClientConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.api_url(), DEFAULT_API_URL);
        assert_eq!(config.environment(), Environment::Development);
        assert_eq!(config.csrf_max_age(), Duration::from_secs(3600));
        assert!(config.user_agent().starts_with("storekeep/"));
    }

    #[test]
    fn reads_environment_variables() {
        let config = ClientConfig::from_lookup(lookup(&[
            ("STOREKEEP_API_URL", "https://admin.example.com"),
            ("STOREKEEP_ENV", "production"),
            ("STOREKEEP_TIMEOUT_SECS", "7"),
        ]))
        .unwrap();
        assert_eq!(config.api_url(), "https://admin.example.com");
        assert!(config.environment().is_production());
        assert_eq!(config.request_timeout(), Duration::from_secs(7));
    }

    #[test]
    fn rejects_bad_timeout() {
        let err = ClientConfig::from_lookup(lookup(&[("STOREKEEP_TIMEOUT_SECS", "soon")]))
            .unwrap_err();
        assert!(err.to_string().contains("STOREKEEP_TIMEOUT_SECS"));
    }
}
