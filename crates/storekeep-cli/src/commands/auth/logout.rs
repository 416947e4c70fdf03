//! Logout command implementation.

use anyhow::{Context, Result};
use clap::Args;

use storekeep_http::api::AuthApi;

use crate::cli::GlobalArgs;
use crate::output;
use crate::session::{CliSession, storage};

#[derive(Args, Debug)]
pub struct LogoutArgs {}

pub async fn run(_args: LogoutArgs, global: &GlobalArgs) -> Result<()> {
    let session = CliSession::restore(global).await?;

    let outcome = AuthApi::new(session.client()).logout().await;

    // Cookies go regardless of what the backend said.
    storage::clear_cookies().context("Failed to remove stored cookies")?;
    let outcome = outcome.context("Failed to logout")?;

    if outcome.local_only {
        output::success("Logged out (no active session on the server)");
    } else {
        output::success("Logged out");
    }

    Ok(())
}
