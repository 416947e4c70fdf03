//! Whoami command implementation.

use anyhow::{Context, Result};
use clap::Args;

use storekeep_http::api::AuthApi;

use crate::cli::GlobalArgs;
use crate::output;
use crate::session::CliSession;

#[derive(Args, Debug)]
pub struct WhoamiArgs {}

pub async fn run(_args: WhoamiArgs, global: &GlobalArgs) -> Result<()> {
    let session = CliSession::require(global).await?;

    let result = AuthApi::new(session.client())
        .me()
        .await
        .context("Failed to fetch user");
    let user = session.finish(result)?;

    output::opt_field("Email", user.email.as_deref());
    output::opt_field("Name", user.name.as_deref());
    if let Some(id) = &user.id {
        output::field("ID", &id.to_string());
    }

    Ok(())
}
