//! Outcome type for a failed token refresh.

use std::fmt;

/// Why a refresh did not produce a new access token.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RefreshFailureKind {
    /// The refresh endpoint answered with a non-success status.
    Rejected { status: u16 },
    /// The endpoint answered 2xx without an access token.
    MissingToken,
    /// The refresh call did not complete in time.
    TimedOut { duration_ms: u64 },
    /// The refresh call never reached the backend.
    Transport,
}

/// A failed refresh attempt.
///
/// Cheap to clone so that every request waiting on the same in-flight
/// refresh observes the same outcome.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RefreshFailure {
    pub kind: RefreshFailureKind,
    pub detail: String,
}

impl RefreshFailure {
    pub fn new(kind: RefreshFailureKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            detail: detail.into(),
        }
    }
}

impl fmt::Display for RefreshFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            RefreshFailureKind::Rejected { status } => write!(f, "rejected with HTTP {}", status)?,
            RefreshFailureKind::MissingToken => f.write_str("no access token in response")?,
            RefreshFailureKind::TimedOut { duration_ms } => {
                write!(f, "timed out after {}ms", duration_ms)?
            }
            RefreshFailureKind::Transport => f.write_str("transport failure")?,
        }
        if !self.detail.is_empty() {
            write!(f, ": {}", self.detail)?;
        }
        Ok(())
    }
}

impl std::error::Error for RefreshFailure {}
