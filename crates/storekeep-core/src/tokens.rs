//! Token types for backend authentication.

use std::fmt;

/// An access token for authenticated API requests.
///
/// Access tokens are short-lived bearer credentials. They live only in
/// process memory, inside the [`AuthStateStore`](crate::AuthStateStore).
///
/// # Security
///
/// - Never logged or displayed in Debug output
/// - Treat as opaque; do not parse or inspect
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    /// Create a new access token.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Returns the token value for use in authorization headers.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The `Authorization` header value for this token.
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("AccessToken").field(&"[REDACTED]").finish()
    }
}

/// An anti-forgery token echoed back on state-changing requests.
///
/// Unlike the access token it lives in a script-readable cookie, so the
/// client can copy it into the `X-CSRF-Token` header.
#[derive(Clone, PartialEq, Eq)]
pub struct CsrfToken(String);

impl CsrfToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for CsrfToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CsrfToken").field(&"[REDACTED]").finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn access_token_hides_value_in_debug() {
        let token = AccessToken::new("eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...");
        let debug = format!("{:?}", token);
        assert!(!debug.contains("eyJ"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn bearer_header_value() {
        assert_eq!(AccessToken::new("tokA").bearer(), "Bearer tokA");
    }

    #[test]
    fn csrf_token_hides_value_in_debug() {
        let token = CsrfToken::new("deadbeef");
        assert!(!format!("{:?}", token).contains("deadbeef"));
    }
}
