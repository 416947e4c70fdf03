//! Authentication subcommands.

mod login;
mod logout;
mod refresh;
mod register;
mod whoami;

use anyhow::Result;
use clap::{Args, Subcommand};

use crate::cli::GlobalArgs;

#[derive(Args, Debug)]
pub struct AuthCommand {
    #[command(subcommand)]
    pub command: AuthSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum AuthSubcommand {
    /// Sign in with email and password
    Login(login::LoginArgs),

    /// Create a dashboard account
    Register(register::RegisterArgs),

    /// End the session and forget stored cookies
    Logout(logout::LogoutArgs),

    /// Display the signed-in user
    Whoami(whoami::WhoamiArgs),

    /// Re-issue the access token from the refresh cookie
    Refresh(refresh::RefreshArgs),
}

pub async fn handle(cmd: AuthCommand, global: &GlobalArgs) -> Result<()> {
    match cmd.command {
        AuthSubcommand::Login(args) => login::run(args, global).await,
        AuthSubcommand::Register(args) => register::run(args, global).await,
        AuthSubcommand::Logout(args) => logout::run(args, global).await,
        AuthSubcommand::Whoami(args) => whoami::run(args, global).await,
        AuthSubcommand::Refresh(args) => refresh::run(args, global).await,
    }
}
