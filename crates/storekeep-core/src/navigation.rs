//! Navigation seam used for session teardown.
//!
//! When a silent refresh fails the client sends the user back to the login
//! route. A UI shell implements [`Navigator`] over its router; the CLI and
//! tests use [`MemoryNavigator`].

use std::sync::{PoisonError, RwLock};

/// Route the client redirects to when the session cannot be recovered.
pub const LOGIN_ROUTE: &str = "/login";

/// Minimal router interface.
pub trait Navigator: Send + Sync {
    /// The route currently displayed.
    fn current_route(&self) -> String;

    /// Move to another route.
    fn navigate(&self, route: &str);

    /// True when the current route is a login screen.
    fn is_on_login(&self) -> bool {
        self.current_route().contains(LOGIN_ROUTE)
    }
}

/// In-memory router that records every navigation.
#[derive(Debug)]
pub struct MemoryNavigator {
    state: RwLock<NavigationState>,
}

#[derive(Debug)]
struct NavigationState {
    current: String,
    history: Vec<String>,
}

impl MemoryNavigator {
    pub fn new(initial: impl Into<String>) -> Self {
        Self {
            state: RwLock::new(NavigationState {
                current: initial.into(),
                history: Vec::new(),
            }),
        }
    }

    /// Routes navigated to, oldest first. The initial route is not included.
    pub fn history(&self) -> Vec<String> {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .history
            .clone()
    }
}

impl Default for MemoryNavigator {
    fn default() -> Self {
        Self::new("/")
    }
}

impl Navigator for MemoryNavigator {
    fn current_route(&self) -> String {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .current
            .clone()
    }

    fn navigate(&self, route: &str) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        state.current = route.to_string();
        state.history.push(route.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_history() {
        let nav = MemoryNavigator::new("/products");
        assert!(!nav.is_on_login());

        nav.navigate(LOGIN_ROUTE);
        assert_eq!(nav.current_route(), "/login");
        assert!(nav.is_on_login());
        assert_eq!(nav.history(), vec!["/login".to_string()]);
    }

    #[test]
    fn login_detection_matches_nested_routes() {
        let nav = MemoryNavigator::new("/login/callback");
        assert!(nav.is_on_login());
    }
}
