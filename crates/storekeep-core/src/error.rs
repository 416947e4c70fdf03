//! Error types for storekeep.
//!
//! This module provides a unified error type with explicit variants for
//! transport, authentication, backend, and input validation errors.

use std::fmt;

use serde::Deserialize;
use thiserror::Error;

use crate::auth::RefreshFailure;
use crate::types::Environment;

/// Message broadcast to the UI layer when the backend gives no usable text.
pub const GENERIC_FAILURE_MESSAGE: &str = "Something went wrong, please try again.";

/// Replacement text for backend messages that may leak configuration details.
const REDACTED_MESSAGE: &str = "An error occurred while processing your request.";

/// The unified error type for storekeep operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Network transport errors (connection, TLS, timeout).
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Authentication errors (no session, failed refresh).
    #[error("authentication error: {0}")]
    Auth(#[from] AuthError),

    /// Non-success responses from the admin backend.
    #[error("api error: {0}")]
    Api(#[from] ApiError),

    /// Input validation errors.
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidInputError),

    /// Response bodies that did not match the expected shape.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The resource does not support the requested operation.
    #[error("operation not supported: {operation}")]
    Unsupported { operation: String },
}

impl Error {
    /// Returns the backend error, if this is one.
    pub fn as_api(&self) -> Option<&ApiError> {
        match self {
            Error::Api(err) => Some(err),
            _ => None,
        }
    }

    /// Stable code for UI consumers.
    pub fn error_code(&self) -> String {
        match self {
            Error::Transport(_) => "NETWORK_ERROR".to_string(),
            Error::Api(err) => err.error_code(),
            Error::Auth(_) => "AUTH_FAILED".to_string(),
            Error::InvalidInput(_) => "INVALID_INPUT".to_string(),
            Error::Serialization(_) => "INVALID_RESPONSE".to_string(),
            Error::Unsupported { .. } => "UNSUPPORTED".to_string(),
        }
    }

    /// Human-facing message, sanitised for the given environment.
    pub fn user_message(&self, environment: Environment) -> String {
        match self {
            Error::Transport(_) => {
                "Unable to connect to the server. Please check your internet connection."
                    .to_string()
            }
            Error::Api(err) => err.user_message(environment),
            other => other.to_string(),
        }
    }
}

/// Transport-level errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Network connection failed.
    #[error("connection failed: {message}")]
    Connection { message: String },

    /// Request timed out.
    #[error("request timed out after {duration_ms}ms")]
    Timeout { duration_ms: u64 },

    /// Generic HTTP error.
    #[error("HTTP error: {message}")]
    Http { message: String },
}

/// Authentication-related errors.
#[derive(Debug, Error)]
pub enum AuthError {
    /// No access token is held and the operation needs one.
    #[error("not authenticated")]
    NotAuthenticated,

    /// The refresh endpoint did not yield a new access token.
    #[error("token refresh failed: {0}")]
    RefreshFailed(RefreshFailure),

    /// The backend answered without an access token where one was required.
    #[error("no access token in {endpoint} response")]
    MissingAccessToken { endpoint: String },
}

/// Error body returned by the admin backend.
#[derive(Debug, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub error: Option<serde_json::Value>,
}

/// A non-success response from the admin backend.
#[derive(Debug, Clone)]
pub struct ApiError {
    /// HTTP status code.
    pub status: u16,
    /// Request path, relative to the API base.
    pub path: String,
    /// Machine-readable code from the body (e.g. `TOKEN_EXPIRED`).
    pub code: Option<String>,
    /// Human-readable message from the body.
    pub message: Option<String>,
    /// Legacy `error` field, flattened to text.
    pub error: Option<String>,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HTTP {} {}", self.status, self.path)?;
        if let Some(ref code) = self.code {
            write!(f, " [{}]", code)?;
        }
        if let Some(text) = self.message.as_deref().or(self.error.as_deref()) {
            write!(f, ": {}", text)?;
        }
        Ok(())
    }
}

impl std::error::Error for ApiError {}

impl ApiError {
    /// Create a new API error without body details.
    pub fn new(status: u16, path: impl Into<String>) -> Self {
        Self {
            status,
            path: path.into(),
            code: None,
            message: None,
            error: None,
        }
    }

    /// Build an error from a raw response body.
    ///
    /// Bodies that are not JSON objects are ignored; the status alone is kept.
    pub fn from_body(status: u16, path: impl Into<String>, body: &[u8]) -> Self {
        let parsed: ErrorBody = serde_json::from_slice(body).unwrap_or_default();
        let error = parsed.error.map(|value| match value {
            serde_json::Value::String(s) => s,
            other => other.to_string(),
        });

        Self {
            status,
            path: path.into(),
            code: parsed.code,
            message: parsed.message,
            error,
        }
    }

    /// True for 401 responses.
    pub fn is_unauthorized(&self) -> bool {
        self.status == 401
    }

    /// True when the body signals an expired access token rather than a
    /// generic authorization failure.
    pub fn is_token_expired(&self) -> bool {
        if self.code.as_deref() == Some("TOKEN_EXPIRED") {
            return true;
        }
        self.message
            .as_deref()
            .is_some_and(|m| m.to_lowercase().contains("token expired"))
    }

    /// Text shown to the user by toast-style consumers.
    pub fn broadcast_message(&self) -> String {
        self.message
            .clone()
            .unwrap_or_else(|| GENERIC_FAILURE_MESSAGE.to_string())
    }

    /// Stable error code, derived from the status table first and the body
    /// second.
    pub fn error_code(&self) -> String {
        if let Some((code, _)) = status_entry(self.status) {
            return code.to_string();
        }
        if self.message.is_some() || self.error.is_some() {
            return self.code.clone().unwrap_or_else(|| "API_ERROR".to_string());
        }
        self.code.clone().unwrap_or_else(|| "HTTP_ERROR".to_string())
    }

    /// Message suitable for display, with sensitive wording redacted in
    /// production builds.
    pub fn user_message(&self, environment: Environment) -> String {
        if let Some((_, message)) = status_entry(self.status) {
            return message.to_string();
        }
        if let Some(text) = self.message.as_deref().or(self.error.as_deref()) {
            return redact(text, environment);
        }
        if let Some(ref code) = self.code {
            return format!("API Error: {}", code);
        }
        format!("API request failed with status {}", self.status)
    }
}

fn status_entry(status: u16) -> Option<(&'static str, &'static str)> {
    let entry = match status {
        401 => (
            "AUTH_FAILED",
            "Authentication failed. Please check your API credentials in Settings.",
        ),
        403 => (
            "ACCESS_FORBIDDEN",
            "Access forbidden. Please check your API key permissions.",
        ),
        404 => ("NOT_FOUND", "Resource not found."),
        500 => (
            "SERVER_ERROR",
            "Server error. Please check your WooCommerce store.",
        ),
        502 => (
            "BAD_GATEWAY",
            "Bad gateway. The server is temporarily unavailable.",
        ),
        503 => (
            "SERVICE_UNAVAILABLE",
            "Service unavailable. Please try again later.",
        ),
        _ => return None,
    };
    Some(entry)
}

fn redact(text: &str, environment: Environment) -> String {
    if environment.is_production()
        && (text.contains("API") || text.contains("credentials") || text.contains("key"))
    {
        REDACTED_MESSAGE.to_string()
    } else {
        text.to_string()
    }
}

/// Input validation errors.
#[derive(Debug, Error)]
pub enum InvalidInputError {
    /// Invalid API base URL.
    #[error("invalid API URL '{value}': {reason}")]
    ApiUrl { value: String, reason: String },

    /// Header value that cannot be sent (e.g. a token with control characters).
    #[error("invalid header value for {name}")]
    HeaderValue { name: String },

    /// Generic invalid input.
    #[error("invalid input: {message}")]
    Other { message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_expired_token_body() {
        let err = ApiError::from_body(
            401,
            "/products",
            br#"{"code":"TOKEN_EXPIRED","message":"Access token expired"}"#,
        );
        assert!(err.is_unauthorized());
        assert!(err.is_token_expired());
    }

    #[test]
    fn bad_credentials_are_not_expiry() {
        let err = ApiError::from_body(401, "/auth/login", br#"{"error":"Invalid email or password"}"#);
        assert!(!err.is_token_expired());
        assert_eq!(err.error.as_deref(), Some("Invalid email or password"));
    }

    #[test]
    fn expiry_detected_from_message() {
        let err = ApiError::from_body(401, "/orders", br#"{"message":"Token Expired, login again"}"#);
        assert!(err.is_token_expired());
    }

    #[test]
    fn non_json_body_keeps_status() {
        let err = ApiError::from_body(500, "/orders", b"Internal Server Error");
        assert_eq!(err.status, 500);
        assert!(err.message.is_none());
        assert!(err.to_string().contains("500"));
    }

    #[test]
    fn status_table_wins_over_body() {
        let err = ApiError::from_body(404, "/settings", br#"{"message":"no settings yet"}"#);
        assert_eq!(err.error_code(), "NOT_FOUND");
        assert_eq!(
            err.user_message(Environment::Development),
            "Resource not found."
        );
    }

    #[test]
    fn production_redacts_sensitive_messages() {
        let err = ApiError::from_body(
            422,
            "/settings",
            br#"{"message":"Consumer key rejected by API"}"#,
        );
        assert_eq!(
            err.user_message(Environment::Production),
            "An error occurred while processing your request."
        );
        assert_eq!(
            err.user_message(Environment::Development),
            "Consumer key rejected by API"
        );
        assert_eq!(err.error_code(), "API_ERROR");
    }

    #[test]
    fn code_only_and_bare_status_fallbacks() {
        let coded = ApiError::from_body(409, "/coupons", br#"{"code":"DUPLICATE"}"#);
        assert_eq!(coded.user_message(Environment::Development), "API Error: DUPLICATE");
        assert_eq!(coded.error_code(), "DUPLICATE");

        let bare = ApiError::new(418, "/coupons");
        assert_eq!(
            bare.user_message(Environment::Development),
            "API request failed with status 418"
        );
        assert_eq!(bare.error_code(), "HTTP_ERROR");
    }

    #[test]
    fn broadcast_message_falls_back() {
        let err = ApiError::new(500, "/orders");
        assert_eq!(err.broadcast_message(), GENERIC_FAILURE_MESSAGE);
    }
}
