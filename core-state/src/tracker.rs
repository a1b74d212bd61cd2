//! Per-hook loading, error and request fencing
//!
//! Every hook action opens an [`ActionGuard`]. The guard counts as in-flight
//! until it is dropped, so loading is cleared on every exit path. Actions of
//! the same kind draw increasing tickets; only the newest ticket of a kind
//! may write shared state. A failure always records the hook's error.

use core_api::ClientError;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::warn;

#[derive(Debug, Default)]
struct TrackerState {
    in_flight: usize,
    tickets: HashMap<String, u64>,
    error: Option<String>,
}

/// Local loading/error state of one hook
#[derive(Debug, Clone, Default)]
pub struct ActionTracker {
    inner: Arc<Mutex<TrackerState>>,
}

impl ActionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a fenced action of `kind`
    ///
    /// Clears the current error and supersedes any earlier action of the
    /// same kind.
    pub fn begin(&self, kind: impl Into<String>) -> ActionGuard {
        let kind = kind.into();
        let mut state = self.lock();
        state.in_flight += 1;
        state.error = None;
        let ticket = state.tickets.entry(kind.clone()).or_insert(0);
        *ticket += 1;
        let ticket = *ticket;
        drop(state);

        ActionGuard {
            tracker: self.clone(),
            fence: Some((kind, ticket)),
        }
    }

    /// Start an action that is never superseded, e.g. a create
    pub fn begin_unfenced(&self) -> ActionGuard {
        let mut state = self.lock();
        state.in_flight += 1;
        state.error = None;
        drop(state);

        ActionGuard {
            tracker: self.clone(),
            fence: None,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.lock().in_flight > 0
    }

    pub fn error(&self) -> Option<String> {
        self.lock().error.clone()
    }

    pub fn clear_error(&self) {
        self.lock().error = None;
    }

    fn lock(&self) -> MutexGuard<'_, TrackerState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// One in-flight hook action
#[must_use = "the action is finished when the guard is dropped"]
#[derive(Debug)]
pub struct ActionGuard {
    tracker: ActionTracker,
    fence: Option<(String, u64)>,
}

impl ActionGuard {
    /// Whether no newer action of the same kind has started
    pub fn is_current(&self) -> bool {
        match &self.fence {
            None => true,
            Some((kind, ticket)) => self.tracker.lock().tickets.get(kind) == Some(ticket),
        }
    }

    /// Run `f` only if this action is still current
    pub fn commit(&self, f: impl FnOnce()) {
        if self.is_current() {
            f();
        }
    }

    /// Record a failure and hand the error back to the caller
    ///
    /// Superseded actions record their error too; fencing only gates
    /// [`commit`](Self::commit).
    pub fn settle<T>(&self, result: Result<T, ClientError>, fallback: &str) -> Result<T, ClientError> {
        result.map_err(|error| {
            let message = error_message(&error, fallback);
            warn!(
                error = %error,
                message = %message,
                current = self.is_current(),
                "Hook action failed"
            );
            self.tracker.lock().error = Some(message);
            error
        })
    }
}

impl Drop for ActionGuard {
    fn drop(&mut self) {
        let mut state = self.tracker.lock();
        state.in_flight = state.in_flight.saturating_sub(1);
    }
}

/// Display message for a failed action
///
/// Prefers the server's own message, then the error's message, then
/// `fallback`.
pub fn error_message(error: &ClientError, fallback: &str) -> String {
    if let Some(message) = error.server_message().filter(|m| !m.trim().is_empty()) {
        return message.to_string();
    }
    let message = error.to_string();
    if message.trim().is_empty() {
        fallback.to_string()
    } else {
        message
    }
}
