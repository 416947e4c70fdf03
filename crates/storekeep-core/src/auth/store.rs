//! Access token holder with refresh observers.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use tracing::{debug, trace};

use crate::tokens::AccessToken;

/// Observer invoked with the new token after a silent refresh.
pub type RefreshSubscriber = Arc<dyn Fn(&AccessToken) + Send + Sync>;

/// Handle returned by [`AuthStateStore::subscribe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Holds the current access token for one client.
///
/// Reads and writes are short critical sections that never span an
/// `.await`, so the store is safe to share across tasks behind an `Arc`.
///
/// # Example
///
/// ```
/// use std::sync::{Arc, Mutex};
/// use storekeep_core::{AccessToken, AuthStateStore};
///
/// let store = AuthStateStore::new();
/// let seen = Arc::new(Mutex::new(Vec::new()));
/// let sink = seen.clone();
/// store.subscribe(move |token| sink.lock().unwrap().push(token.as_str().to_string()));
///
/// let token = AccessToken::new("tokB");
/// store.set_token(Some(token.clone()));
/// store.notify_refreshed(&token);
/// assert_eq!(seen.lock().unwrap().as_slice(), ["tokB"]);
/// ```
#[derive(Default)]
pub struct AuthStateStore {
    token: RwLock<Option<AccessToken>>,
    subscribers: RwLock<Vec<(SubscriptionId, RefreshSubscriber)>>,
    next_id: AtomicU64,
}

impl AuthStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that already holds a token.
    pub fn with_token(token: AccessToken) -> Self {
        let store = Self::new();
        store.set_token(Some(token));
        store
    }

    /// Store or clear the access token. No validation is performed.
    pub fn set_token(&self, token: Option<AccessToken>) {
        trace!(present = token.is_some(), "updating access token");
        let mut slot = self.token.write().unwrap_or_else(PoisonError::into_inner);
        *slot = token;
    }

    /// Returns a snapshot of the current token.
    pub fn token(&self) -> Option<AccessToken> {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Drop the token, e.g. on logout.
    pub fn clear(&self) {
        self.set_token(None);
    }

    /// Register an observer for silent refreshes.
    pub fn subscribe<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&AccessToken) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.subscribers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id, Arc::new(callback)));
        debug!(?id, "refresh subscriber registered");
        id
    }

    /// Remove an observer. Returns false if the id was unknown.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subscribers = self
            .subscribers
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let before = subscribers.len();
        subscribers.retain(|(existing, _)| *existing != id);
        before != subscribers.len()
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Invoke every observer with the refreshed token.
    ///
    /// The subscriber list is snapshotted first, so callbacks may subscribe
    /// or unsubscribe without deadlocking.
    pub fn notify_refreshed(&self, token: &AccessToken) {
        let subscribers: Vec<RefreshSubscriber> = self
            .subscribers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(_, callback)| callback.clone())
            .collect();

        debug!(count = subscribers.len(), "notifying refresh subscribers");
        for callback in subscribers {
            callback(token);
        }
    }
}

impl std::fmt::Debug for AuthStateStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthStateStore")
            .field("authenticated", &self.is_authenticated())
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}
