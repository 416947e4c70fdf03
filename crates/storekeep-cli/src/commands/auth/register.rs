//! Register command implementation.

use anyhow::{Context, Result};
use clap::Args;

use storekeep_core::Registration;
use storekeep_http::api::AuthApi;

use crate::cli::GlobalArgs;
use crate::output;
use crate::session::CliSession;

#[derive(Args, Debug)]
pub struct RegisterArgs {
    /// Account email
    #[arg(long)]
    pub email: String,

    /// Account password
    #[arg(long, env = "STOREKEEP_PASSWORD", hide_env_values = true)]
    pub password: String,

    /// Display name
    #[arg(long)]
    pub name: String,
}

pub async fn run(args: RegisterArgs, global: &GlobalArgs) -> Result<()> {
    let session = CliSession::open(global)?;
    let registration = Registration::new(&args.email, args.password, &args.name);

    let result = AuthApi::new(session.client())
        .register(&registration)
        .await
        .context("Failed to register");
    session.finish(result)?;

    output::success("Account created");
    output::field("Email", registration.credentials().email());
    output::field("Name", registration.name());

    Ok(())
}
