//! Navigator for shells without a router

use bridge_traits::navigation::Navigator;
use std::sync::Mutex;
use tracing::info;

/// Records navigation requests and logs them
///
/// Desktop shells that render a single window poll `last_route()` (or watch
/// the session events on the bus) instead of reacting to a router push.
#[derive(Debug, Default)]
pub struct LoggingNavigator {
    history: Mutex<Vec<String>>,
}

impl LoggingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Most recently requested route
    pub fn last_route(&self) -> Option<String> {
        self.history
            .lock()
            .ok()
            .and_then(|history| history.last().cloned())
    }

    /// Every route requested so far, oldest first
    pub fn history(&self) -> Vec<String> {
        self.history
            .lock()
            .map(|history| history.clone())
            .unwrap_or_default()
    }
}

impl Navigator for LoggingNavigator {
    fn navigate(&self, route: &str) {
        info!(route = route, "Navigation requested");
        if let Ok(mut history) = self.history.lock() {
            history.push(route.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_navigator_records_routes() {
        let navigator = LoggingNavigator::new();
        assert_eq!(navigator.last_route(), None);

        navigator.navigate("/jobs");
        navigator.navigate("/login");

        assert_eq!(navigator.last_route(), Some("/login".to_string()));
        assert_eq!(navigator.history(), vec!["/jobs", "/login"]);
    }
}
