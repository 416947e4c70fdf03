//! Refresh command implementation.

use anyhow::{Context, Result};
use clap::Args;

use storekeep_http::api::AuthApi;

use crate::cli::GlobalArgs;
use crate::output;
use crate::session::CliSession;

#[derive(Args, Debug)]
pub struct RefreshArgs {}

pub async fn run(_args: RefreshArgs, global: &GlobalArgs) -> Result<()> {
    let session = CliSession::open(global)?;

    output::note("Refreshing session...");

    let result = AuthApi::new(session.client())
        .refresh_token()
        .await
        .context("Failed to refresh session");
    session.finish(result)?;

    output::success("Session refreshed successfully");

    Ok(())
}
