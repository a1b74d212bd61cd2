//! Navigation Abstraction
//!
//! The core never navigates on its own. When it needs a route change (for
//! example after the backend rejects the session with 401) it asks the host
//! through this trait, and the host decides how to render it.

/// Host navigation trait
///
/// # Example
///
/// ```ignore
/// use bridge_traits::navigation::Navigator;
///
/// struct RouterNavigator { /* host router handle */ }
///
/// impl Navigator for RouterNavigator {
///     fn navigate(&self, route: &str) {
///         // push `route` onto the host router
///     }
/// }
/// ```
#[cfg_attr(test, mockall::automock)]
pub trait Navigator: Send + Sync {
    /// Request navigation to `route` (e.g. `/login`)
    fn navigate(&self, route: &str);
}
