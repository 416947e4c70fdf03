//! CLI argument definitions.

use std::time::Duration;

use clap::{Args, Parser, Subcommand};

use storekeep_core::Environment;
use storekeep_http::{ClientConfig, DEFAULT_API_URL};

use crate::commands::auth::AuthCommand;
use crate::commands::ping::PingArgs;
use crate::commands::reports::ReportsCommand;
use crate::commands::settings::SettingsCommand;
use crate::commands::store::StoreCommand;

/// Command line client for the store-admin backend.
#[derive(Parser, Debug)]
#[command(name = "storekeep")]
#[command(author, version = env!("STOREKEEP_VERSION"), about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Flags shared by every command.
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Base URL of the admin API
    #[arg(long, env = "STOREKEEP_API_URL", default_value = DEFAULT_API_URL, global = true)]
    pub api_url: String,

    /// Production mode: HTTPS only, terse error messages
    #[arg(long, env = "STOREKEEP_PRODUCTION", global = true)]
    pub production: bool,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Output logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,
}

impl GlobalArgs {
    pub fn client_config(&self) -> ClientConfig {
        let environment = if self.production {
            Environment::Production
        } else {
            Environment::Development
        };

        let config = ClientConfig::new(&self.api_url).with_environment(environment);
        match self.timeout {
            Some(secs) => config.with_request_timeout(Duration::from_secs(secs)),
            None => config,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Sign in, sign out and inspect the session
    Auth(AuthCommand),

    /// Browse and manage store resources
    Store(StoreCommand),

    /// Show or change the store connection settings
    Settings(SettingsCommand),

    /// Sales reports
    Reports(ReportsCommand),

    /// Check that the backend can reach the store
    Ping(PingArgs),
}
