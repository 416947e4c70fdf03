//! Retry budget for a single logical request.

/// Which attempt of a logical request is being made.
///
/// The value is immutable; [`RequestAttempt::next`] returns the following
/// attempt, or `None` once the budget is spent. A refresh is only worth
/// doing while a next attempt exists.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RequestAttempt {
    number: u8,
    max_attempts: u8,
}

impl RequestAttempt {
    /// One original send plus one retry after refresh.
    pub const DEFAULT_MAX_ATTEMPTS: u8 = 2;

    pub fn first() -> Self {
        Self::with_max(Self::DEFAULT_MAX_ATTEMPTS)
    }

    /// First attempt with a custom budget (at least one attempt).
    pub fn with_max(max_attempts: u8) -> Self {
        Self {
            number: 1,
            max_attempts: max_attempts.max(1),
        }
    }

    pub fn number(self) -> u8 {
        self.number
    }

    pub fn max_attempts(self) -> u8 {
        self.max_attempts
    }

    pub fn is_retry(self) -> bool {
        self.number > 1
    }

    pub fn can_retry(self) -> bool {
        self.number < self.max_attempts
    }

    pub fn next(self) -> Option<Self> {
        self.can_retry().then(|| Self {
            number: self.number + 1,
            ..self
        })
    }
}

impl Default for RequestAttempt {
    fn default() -> Self {
        Self::first()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_budget_allows_one_retry() {
        let first = RequestAttempt::first();
        assert_eq!(first.number(), 1);
        assert!(!first.is_retry());

        let second = first.next().unwrap();
        assert_eq!(second.number(), 2);
        assert!(second.is_retry());
        assert!(second.next().is_none());
    }

    #[test]
    fn budget_is_at_least_one() {
        let only = RequestAttempt::with_max(0);
        assert_eq!(only.max_attempts(), 1);
        assert!(only.next().is_none());
    }
}
