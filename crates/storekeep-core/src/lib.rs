//! storekeep-core - Core types for the storekeep store-admin client.
//!
//! This crate holds everything the HTTP layer and its consumers share:
//! the error taxonomy, opaque tokens, the in-memory [`AuthStateStore`],
//! the cookie model, the navigation seam, and the resource models exchanged
//! with the admin backend.

pub mod auth;
pub mod cookie;
pub mod credentials;
pub mod error;
pub mod navigation;
pub mod resources;
pub mod sanitize;
pub mod tokens;
pub mod types;

pub use auth::{AuthStateStore, RefreshFailure, SubscriptionId};
pub use cookie::{Cookie, CookieJar, SameSite};
pub use credentials::{Credentials, Registration};
pub use error::{ApiError, AuthError, Error, InvalidInputError, TransportError};
pub use navigation::{LOGIN_ROUTE, MemoryNavigator, Navigator};
pub use tokens::{AccessToken, CsrfToken};
pub use types::{ApiUrl, Environment};

/// Result type alias using the crate's Error type.
pub type Result<T> = std::result::Result<T, Error>;
