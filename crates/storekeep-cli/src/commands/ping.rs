//! Connection test command.

use anyhow::{Context, Result, bail};
use clap::Args;

use storekeep_http::api::test_connection;

use crate::cli::GlobalArgs;
use crate::output;
use crate::session::CliSession;

#[derive(Args, Debug)]
pub struct PingArgs {}

pub async fn run(_args: PingArgs, global: &GlobalArgs) -> Result<()> {
    let session = CliSession::require(global).await?;

    let result = test_connection(session.client())
        .await
        .context("Connection test failed");
    let report = session.finish(result)?;

    if !report.success {
        bail!("Store is not configured. Run 'storekeep settings set' first.");
    }

    output::success("Store reachable");
    output::field("Products sampled", &report.sample_size.to_string());
    Ok(())
}
