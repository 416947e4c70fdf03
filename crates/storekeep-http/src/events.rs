//! Client-wide notifications.

use tokio::sync::broadcast;
use tracing::trace;

const EVENT_CAPACITY: usize = 64;

/// Something a UI layer may want to react to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientEvent {
    /// A request failed and the failure was handed back to the caller.
    ApiError { message: String },
    /// The session could not be recovered. `redirect_to` is the route the
    /// navigator was sent to, if it was not already on a login screen.
    SessionExpired { redirect_to: Option<String> },
    /// A silent refresh produced a new access token.
    TokenRefreshed,
}

#[derive(Debug, Clone)]
pub(crate) struct EventBus {
    sender: broadcast::Sender<ClientEvent>,
}

impl EventBus {
    pub(crate) fn new() -> Self {
        let (sender, _) = broadcast::channel(EVENT_CAPACITY);
        Self { sender }
    }

    pub(crate) fn subscribe(&self) -> broadcast::Receiver<ClientEvent> {
        self.sender.subscribe()
    }

    pub(crate) fn emit(&self, event: ClientEvent) {
        // no receivers is fine
        if self.sender.send(event).is_err() {
            trace!("client event dropped, no subscribers");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn emit_without_subscribers_is_silent() {
        let bus = EventBus::new();
        bus.emit(ClientEvent::TokenRefreshed);

        let mut rx = bus.subscribe();
        bus.emit(ClientEvent::ApiError {
            message: "boom".to_string(),
        });
        assert_eq!(
            rx.recv().await.unwrap(),
            ClientEvent::ApiError {
                message: "boom".to_string()
            }
        );
    }
}
