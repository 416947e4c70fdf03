//! Store connection settings subcommands.

use anyhow::{Context, Result, bail};
use clap::{Args, Subcommand};

use storekeep_core::resources::{SettingsUpdate, StoreSettings};
use storekeep_http::api::SettingsApi;

use crate::cli::GlobalArgs;
use crate::output;
use crate::session::CliSession;

#[derive(Args, Debug)]
pub struct SettingsCommand {
    #[command(subcommand)]
    pub command: SettingsSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum SettingsSubcommand {
    /// Show the saved settings
    Show(ShowArgs),

    /// Save new settings
    Set(SetArgs),
}

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Print settings as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct SetArgs {
    /// WooCommerce store URL
    #[arg(long)]
    pub store_url: String,

    /// WooCommerce REST consumer key
    #[arg(long)]
    pub consumer_key: String,

    /// WooCommerce REST consumer secret
    #[arg(long, env = "STOREKEEP_CONSUMER_SECRET", hide_env_values = true)]
    pub consumer_secret: String,

    /// WordPress user for media uploads
    #[arg(long)]
    pub wp_username: Option<String>,

    /// WordPress application password
    #[arg(long, env = "STOREKEEP_WP_APP_PASSWORD", hide_env_values = true)]
    pub wp_app_password: Option<String>,
}

impl From<SetArgs> for SettingsUpdate {
    fn from(args: SetArgs) -> Self {
        SettingsUpdate {
            store_url: Some(args.store_url),
            consumer_key: Some(args.consumer_key),
            consumer_secret: Some(args.consumer_secret),
            wordpress_username: args.wp_username,
            wordpress_app_password: args.wp_app_password,
            ..SettingsUpdate::default()
        }
    }
}

pub async fn handle(cmd: SettingsCommand, global: &GlobalArgs) -> Result<()> {
    let session = CliSession::require(global).await?;
    let api = SettingsApi::new(session.client());

    let result = match cmd.command {
        SettingsSubcommand::Show(args) => show(&api, &args).await,
        SettingsSubcommand::Set(args) => set(&api, args).await,
    };
    session.finish(result)
}

async fn show(api: &SettingsApi, args: &ShowArgs) -> Result<()> {
    let Some(settings) = api.get().await.context("Failed to load settings")? else {
        bail!("No settings saved yet. Run 'storekeep settings set' first.");
    };

    if args.json {
        let mut redacted = settings.clone();
        redacted.consumer_secret = redacted.consumer_secret.map(|_| "********".to_string());
        return output::json_pretty(&redacted);
    }

    print_settings(&settings);
    Ok(())
}

async fn set(api: &SettingsApi, args: SetArgs) -> Result<()> {
    let saved = api
        .update(args.into())
        .await
        .context("Failed to save settings")?;

    output::success("Settings saved");
    println!();
    print_settings(&saved);
    Ok(())
}

fn print_settings(settings: &StoreSettings) {
    output::opt_field("Store URL", settings.store_url.as_deref());
    output::opt_field("Consumer key", settings.consumer_key.as_deref().map(mask));
    output::opt_field(
        "Consumer secret",
        settings.consumer_secret.as_ref().map(|_| "********"),
    );
    output::opt_field("WordPress user", settings.wordpress_username.as_deref());
}

/// Keep the first few characters of a key so it can be recognised.
fn mask(key: &str) -> &str {
    match key.char_indices().nth(6) {
        Some((idx, _)) => &key[..idx],
        None => key,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mask_keeps_key_prefix() {
        assert_eq!(mask("ck_1234567890"), "ck_123");
        assert_eq!(mask("ck_1"), "ck_1");
    }

    #[test]
    fn set_args_fill_store_url() {
        let update: SettingsUpdate = SetArgs {
            store_url: "https://shop.example.com".to_string(),
            consumer_key: "ck".to_string(),
            consumer_secret: "cs".to_string(),
            wp_username: None,
            wp_app_password: None,
        }
        .into();
        assert_eq!(update.store_url.as_deref(), Some("https://shop.example.com"));
        assert!(update.woocommerce_url.is_none());
    }
}
