//! In-memory authentication state.
//!
//! The [`AuthStateStore`] is the single source of truth for the access token
//! of a running client. It is created by the caller and handed to the HTTP
//! client factory explicitly, so each client (and each test) owns its own.

mod refresh;
mod store;

pub use refresh::{RefreshFailure, RefreshFailureKind};
pub use store::{AuthStateStore, RefreshSubscriber, SubscriptionId};
