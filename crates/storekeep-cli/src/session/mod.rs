//! Per-invocation session handling.
//!
//! A CLI run behaves like a page load in the dashboard: the cookie jar is
//! restored, the access token is re-issued from the refresh cookie, the
//! command runs, and the jar is written back.

pub mod storage;

use std::sync::Arc;

use anyhow::{Context, Result, bail};
use tracing::debug;

use storekeep_core::{LOGIN_ROUTE, MemoryNavigator};
use storekeep_http::api::AuthApi;
use storekeep_http::{ApiClient, SharedCookieJar};

use crate::cli::GlobalArgs;
use crate::output;

/// Route the CLI reports to the navigator while a command runs.
pub const CLI_ROUTE: &str = "/cli";

const NO_SESSION: &str = "No active session. Run 'storekeep auth login' first.";

pub struct CliSession {
    client: ApiClient,
    navigator: Arc<MemoryNavigator>,
}

impl CliSession {
    /// Build a client around the persisted cookie jar without contacting
    /// the backend.
    pub fn open(global: &GlobalArgs) -> Result<Self> {
        let jar = storage::load_cookies().context("Failed to load stored cookies")?;
        let navigator = Arc::new(MemoryNavigator::new(CLI_ROUTE));

        let client = ApiClient::builder(global.client_config())
            .cookie_jar(Arc::new(SharedCookieJar::from_jar(jar)))
            .navigator(navigator.clone())
            .build()
            .context("Failed to create API client")?;

        Ok(Self { client, navigator })
    }

    /// Open and re-issue the access token from the refresh cookie, if any.
    pub async fn restore(global: &GlobalArgs) -> Result<Self> {
        let session = Self::open(global)?;
        if session.client.cookie_jar().is_empty() {
            debug!("no stored cookies");
            return Ok(session);
        }

        match AuthApi::new(&session.client).refresh_token().await {
            Ok(_) => debug!("session restored"),
            Err(e) => debug!(error = %e, "could not restore session"),
        }
        Ok(session)
    }

    /// Restore a session and fail if none is active.
    pub async fn require(global: &GlobalArgs) -> Result<Self> {
        let session = Self::restore(global).await?;
        if !session.client.auth_store().is_authenticated() {
            session.save()?;
            bail!(NO_SESSION);
        }
        Ok(session)
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    /// True once the client has torn the session down.
    pub fn expired(&self) -> bool {
        self.navigator
            .history()
            .iter()
            .any(|route| route.starts_with(LOGIN_ROUTE))
    }

    /// Persist the cookie jar.
    pub fn save(&self) -> Result<()> {
        storage::save_cookies(&self.client.cookie_jar().snapshot())
            .context("Failed to save cookies")
    }

    /// Save cookies and pass the command result through, pointing the user
    /// at `auth login` if the session was torn down along the way.
    pub fn finish<T>(self, result: Result<T>) -> Result<T> {
        self.save()?;
        if self.expired() {
            output::error("Session expired. Run 'storekeep auth login' to sign in again.");
        }
        result
    }
}
