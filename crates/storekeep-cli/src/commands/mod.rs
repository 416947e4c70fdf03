//! Subcommand implementations.

pub mod auth;
pub mod ping;
pub mod reports;
pub mod settings;
pub mod store;
