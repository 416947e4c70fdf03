//! storekeep-http - Authenticated client for the store-admin backend.
//!
//! [`ApiClient`] wraps `reqwest` with the two interceptor stages the
//! dashboard relies on:
//!
//! - a request stage that injects the bearer token and, for mutating
//!   verbs, the CSRF token read from the readable `csrf-token` cookie;
//! - a response stage that recovers once from an expired access token by
//!   calling `POST /auth/refresh`, rotates the CSRF cookie, and reports
//!   every other failure on the [`ClientEvent`] channel.
//!
//! The typed wrappers in [`api`] are thin layers over that pipeline.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use storekeep_core::{AuthStateStore, Credentials};
//! use storekeep_http::{ApiClient, ClientConfig};
//! use storekeep_http::api::{AuthApi, CrudResource, ProductsApi};
//!
//! # async fn example() -> storekeep_core::Result<()> {
//! let auth = Arc::new(AuthStateStore::new());
//! let client = ApiClient::new(ClientConfig::new("https://admin.example.com"), auth)?;
//!
//! AuthApi::new(&client)
//!     .login(&Credentials::new("owner@example.com", "hunter2"))
//!     .await?;
//! let page = ProductsApi::new(&client).list(Default::default()).await?;
//! println!("{} products", page.total);
//! # Ok(())
//! # }
//! ```

pub mod api;
mod attempt;
mod client;
mod config;
mod error;
mod events;
mod interceptor;
mod jar;
mod refresh;

pub use attempt::RequestAttempt;
pub use client::{ApiClient, ApiClientBuilder, ApiResponse};
pub use config::{ClientConfig, DEFAULT_API_URL};
pub use events::ClientEvent;
pub use jar::SharedCookieJar;

pub use storekeep_core::{Error, Result};
