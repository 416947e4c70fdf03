//! Login command implementation.

use anyhow::{Context, Result};
use clap::Args;

use storekeep_core::Credentials;
use storekeep_http::api::AuthApi;

use crate::cli::GlobalArgs;
use crate::output;
use crate::session::CliSession;

#[derive(Args, Debug)]
pub struct LoginArgs {
    /// Account email
    #[arg(long)]
    pub email: String,

    /// Account password
    #[arg(long, env = "STOREKEEP_PASSWORD", hide_env_values = true)]
    pub password: String,
}

pub async fn run(args: LoginArgs, global: &GlobalArgs) -> Result<()> {
    let session = CliSession::open(global)?;
    let credentials = Credentials::new(&args.email, args.password);

    output::note("Logging in...");

    let result = AuthApi::new(session.client())
        .login(&credentials)
        .await
        .context("Failed to login");
    let auth = session.finish(result)?;

    output::success("Logged in successfully");
    println!();
    output::field("Email", credentials.email());
    if let Some(name) = auth.user.as_ref().and_then(|u| u.name.as_deref()) {
        output::field("Name", name);
    }

    Ok(())
}
