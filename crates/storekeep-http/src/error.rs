//! Mapping from `reqwest` failures onto the shared error type.

use std::time::Duration;

use storekeep_core::error::{InvalidInputError, TransportError};
use storekeep_core::Error;

/// Convert a `reqwest` error, using `timeout` to report how long we waited.
pub(crate) fn transport_error(err: reqwest::Error, timeout: Duration) -> Error {
    if err.is_builder() {
        return InvalidInputError::Other {
            message: err.to_string(),
        }
        .into();
    }

    let transport = if err.is_timeout() {
        TransportError::Timeout {
            duration_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
        }
    } else if err.is_connect() {
        TransportError::Connection {
            message: err.to_string(),
        }
    } else {
        TransportError::Http {
            message: err.to_string(),
        }
    };
    transport.into()
}
