//! # Event Bus
//!
//! Typed notifications from the core to the host over `tokio::sync::broadcast`.
//!
//! ## Overview
//!
//! - [`CoreEvent`] groups one enum per producer: session, store, micro-frontend
//!   registry and calendar
//! - [`EventBus`] is the shared sender; clones publish into the same channel
//! - [`EventStream`] wraps a receiver with an optional predicate
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐    emit     ┌───────────┐
//! │ HTTP adapter ├────────────>│           │
//! └──────────────┘             │           │
//!                              │ EventBus  │
//! ┌──────────────┐    emit     │ (broadcast│   subscribe   ┌────────────┐
//! │ Shared store ├────────────>│  channel) ├──────────────>│ Host shell │
//! └──────────────┘             │           │               └────────────┘
//!                              │           │
//! ┌──────────────┐    emit     │           │   subscribe   ┌────────────┐
//! │ MFE registry ├────────────>│           ├──────────────>│ Subscriber │
//! └──────────────┘             └───────────┘               └────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use core_runtime::events::{CoreEvent, EventBus, SessionEvent};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let event_bus = EventBus::new(100);
//! let mut stream = event_bus.subscribe();
//!
//! event_bus
//!     .emit(CoreEvent::Session(SessionEvent::Unauthorized {
//!         login_route: "/login".to_string(),
//!     }))
//!     .ok();
//!
//! let event = stream.recv().await.unwrap();
//! assert!(matches!(event, CoreEvent::Session(_)));
//! # }
//! ```
//!
//! ## Error Handling
//!
//! - **`RecvError::Lagged(n)`**: Subscriber was too slow and missed `n` events.
//!   Non-fatal; the subscriber keeps receiving new events.
//! - **`RecvError::Closed`**: All senders have been dropped. Treat as shutdown.
//!
//! Emitting with no subscribers returns an error that callers ignore with `.ok()`;
//! the bus is a notification channel, not a delivery guarantee.

use serde::{Deserialize, Serialize};
use std::fmt;
use tokio::sync::broadcast;

pub use tokio::sync::broadcast::error::{RecvError, SendError};
pub use tokio::sync::broadcast::Receiver;

/// Default buffer size for the event bus channel.
pub const DEFAULT_EVENT_BUFFER_SIZE: usize = 100;

// ============================================================================
// Core Event Types
// ============================================================================

/// Top-level event enum encompassing all event categories.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "payload")]
pub enum CoreEvent {
    /// Session token and authorization events
    Session(SessionEvent),
    /// Shared store change notifications
    Store(StoreEvent),
    /// Micro-frontend registry events
    Mfe(MfeEvent),
    /// Calendar navigation and loading events
    Calendar(CalendarNotice),
}

impl CoreEvent {
    /// Returns a human-readable description of the event.
    pub fn description(&self) -> &str {
        match self {
            CoreEvent::Session(e) => e.description(),
            CoreEvent::Store(e) => e.description(),
            CoreEvent::Mfe(e) => e.description(),
            CoreEvent::Calendar(e) => e.description(),
        }
    }

    /// Returns the severity level of the event.
    pub fn severity(&self) -> EventSeverity {
        match self {
            CoreEvent::Calendar(CalendarNotice::LoadFailed { .. }) => EventSeverity::Error,
            CoreEvent::Store(StoreEvent::ErrorRaised { .. }) => EventSeverity::Error,
            CoreEvent::Session(SessionEvent::Unauthorized { .. }) => EventSeverity::Warning,
            CoreEvent::Store(StoreEvent::IllegalTransition { .. }) => EventSeverity::Warning,
            CoreEvent::Session(SessionEvent::TokenStored) => EventSeverity::Info,
            CoreEvent::Session(SessionEvent::TokenCleared) => EventSeverity::Info,
            CoreEvent::Mfe(MfeEvent::Registered { .. }) => EventSeverity::Info,
            _ => EventSeverity::Debug,
        }
    }
}

/// Event severity levels for filtering and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EventSeverity {
    /// Debug-level events (verbose)
    Debug,
    /// Informational events
    Info,
    /// Warning events
    Warning,
    /// Error events
    Error,
}

// ============================================================================
// Session Events
// ============================================================================

/// Events related to the persisted session token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event")]
pub enum SessionEvent {
    /// A token was written to local storage (login, register).
    TokenStored,
    /// The token was removed (logout, unauthorized response).
    TokenCleared,
    /// The backend rejected the session; the host should show the login route.
    Unauthorized {
        /// Route the host is asked to navigate to.
        login_route: String,
    },
}

impl SessionEvent {
    fn description(&self) -> &str {
        match self {
            SessionEvent::TokenStored => "Session token stored",
            SessionEvent::TokenCleared => "Session token cleared",
            SessionEvent::Unauthorized { .. } => "Session rejected by server",
        }
    }
}

// ============================================================================
// Store Events
// ============================================================================

/// Notifications emitted by the shared client store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event")]
pub enum StoreEvent {
    /// The authenticated user changed (sign in, profile update, sign out).
    UserChanged {
        /// New user id, `None` after sign out.
        user_id: Option<String>,
    },
    /// A cached collection or entity slice was replaced or patched.
    SliceUpdated {
        /// Slice name (e.g. "jobs", "mentors", "plugins").
        slice: String,
    },
    /// The server returned a status change the one-way rule forbids.
    IllegalTransition {
        /// Entity kind (e.g. "MentorshipRequest").
        entity: String,
        /// Entity id.
        id: String,
        /// Cached status before the update.
        from: String,
        /// Status returned by the server.
        to: String,
    },
    /// An action failed and the store error was set.
    ErrorRaised {
        /// Display message stored in the error slot.
        message: String,
    },
}

impl StoreEvent {
    fn description(&self) -> &str {
        match self {
            StoreEvent::UserChanged { .. } => "Current user changed",
            StoreEvent::SliceUpdated { .. } => "Store slice updated",
            StoreEvent::IllegalTransition { .. } => "Server applied a forbidden status transition",
            StoreEvent::ErrorRaised { .. } => "Store error set",
        }
    }
}

// ============================================================================
// Micro-frontend Events
// ============================================================================

/// Events from the micro-frontend registry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event")]
pub enum MfeEvent {
    /// A module was added to the registry.
    Registered {
        /// Module name.
        name: String,
        /// Capability names the module exposes.
        capabilities: Vec<String>,
    },
    /// A module was removed from the registry.
    Unregistered {
        /// Module name.
        name: String,
    },
    /// A module was mounted into a host container.
    Mounted {
        /// Module name.
        name: String,
        /// Host-defined container identifier.
        target: String,
    },
    /// A module was unmounted.
    Unmounted {
        /// Module name.
        name: String,
    },
}

impl MfeEvent {
    fn description(&self) -> &str {
        match self {
            MfeEvent::Registered { .. } => "Micro-frontend registered",
            MfeEvent::Unregistered { .. } => "Micro-frontend unregistered",
            MfeEvent::Mounted { .. } => "Micro-frontend mounted",
            MfeEvent::Unmounted { .. } => "Micro-frontend unmounted",
        }
    }
}

// ============================================================================
// Calendar Events
// ============================================================================

/// Events emitted by the event calendar state machine.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event")]
pub enum CalendarNotice {
    /// The view or the anchor date changed.
    Navigated {
        /// View name ("month", "week", "day").
        view: String,
        /// Anchor date (ISO 8601).
        date: String,
    },
    /// Events were reloaded for the visible range.
    EventsLoaded {
        /// Number of events returned by the source.
        count: usize,
    },
    /// The event source failed.
    LoadFailed {
        /// Error message.
        message: String,
    },
}

impl CalendarNotice {
    fn description(&self) -> &str {
        match self {
            CalendarNotice::Navigated { .. } => "Calendar navigated",
            CalendarNotice::EventsLoaded { .. } => "Calendar events loaded",
            CalendarNotice::LoadFailed { .. } => "Calendar events failed to load",
        }
    }
}

// ============================================================================
// Event Bus
// ============================================================================

/// Broadcast channel shared by every producer in the core
///
/// Each subscriber has its own bounded buffer; one that falls more than
/// `capacity` events behind sees `RecvError::Lagged` and then resumes.
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<CoreEvent>,
}

impl EventBus {
    /// Creates a new event bus with the specified buffer size.
    ///
    /// # Arguments
    ///
    /// * `capacity` - Maximum number of events to buffer per subscriber.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero. `CoreConfig` validation rejects a zero
    /// buffer size before the bus is created.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publishes an event to all subscribers.
    ///
    /// Returns the number of subscribers that received the event, or an
    /// error if there are no active subscribers.
    pub fn emit(&self, event: CoreEvent) -> Result<usize, SendError<CoreEvent>> {
        self.sender.send(event)
    }

    /// Creates a new subscriber. Past events are not replayed.
    pub fn subscribe(&self) -> Receiver<CoreEvent> {
        self.sender.subscribe()
    }

    /// Returns the number of active subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_BUFFER_SIZE)
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscriber_count", &self.subscriber_count())
            .finish()
    }
}

// ============================================================================
// Event Stream Wrapper
// ============================================================================

type EventFilter = Box<dyn Fn(&CoreEvent) -> bool + Send + Sync>;

/// A wrapper around `broadcast::Receiver` with optional filtering.
///
/// ```rust
/// use core_runtime::events::{CoreEvent, EventBus, EventStream};
///
/// let event_bus = EventBus::new(100);
/// let session_only = EventStream::new(event_bus.subscribe())
///     .filter(|event| matches!(event, CoreEvent::Session(_)));
/// ```
pub struct EventStream {
    receiver: Receiver<CoreEvent>,
    filter: Option<EventFilter>,
}

impl EventStream {
    /// Creates a new event stream from a receiver.
    pub fn new(receiver: Receiver<CoreEvent>) -> Self {
        Self {
            receiver,
            filter: None,
        }
    }

    /// Only events that match `predicate` will be returned by `recv()`.
    pub fn filter<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&CoreEvent) -> bool + Send + Sync + 'static,
    {
        self.filter = Some(Box::new(predicate));
        self
    }

    /// Wait for the next matching event
    ///
    /// # Errors
    ///
    /// `Lagged(n)` after `n` events were dropped for this subscriber,
    /// `Closed` once every sender is gone.
    pub async fn recv(&mut self) -> Result<CoreEvent, RecvError> {
        loop {
            let event = self.receiver.recv().await?;
            if self.matches(&event) {
                return Ok(event);
            }
        }
    }

    /// Next matching event if one is already buffered
    pub fn try_recv(&mut self) -> Option<Result<CoreEvent, RecvError>> {
        use broadcast::error::TryRecvError;

        loop {
            let event = match self.receiver.try_recv() {
                Ok(event) => event,
                Err(TryRecvError::Empty) => return None,
                Err(TryRecvError::Lagged(n)) => return Some(Err(RecvError::Lagged(n))),
                Err(TryRecvError::Closed) => return Some(Err(RecvError::Closed)),
            };
            if self.matches(&event) {
                return Some(Ok(event));
            }
        }
    }

    fn matches(&self, event: &CoreEvent) -> bool {
        self.filter.as_ref().map_or(true, |filter| filter(event))
    }
}

impl fmt::Debug for EventStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventStream")
            .field("has_filter", &self.filter.is_some())
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn unauthorized() -> CoreEvent {
        CoreEvent::Session(SessionEvent::Unauthorized {
            login_route: "/login".to_string(),
        })
    }

    #[tokio::test]
    async fn test_event_bus_subscription() {
        let bus = EventBus::new(10);
        assert_eq!(bus.subscriber_count(), 0);

        let _sub1 = bus.subscribe();
        let _sub2 = bus.subscribe();
        assert_eq!(bus.subscriber_count(), 2);
    }

    #[tokio::test]
    async fn test_event_emission_no_subscribers() {
        let bus = EventBus::new(10);
        assert!(bus.emit(unauthorized()).is_err());
    }

    #[tokio::test]
    async fn test_multiple_subscribers_receive_same_event() {
        let bus = EventBus::new(10);
        let mut sub1 = bus.subscribe();
        let mut sub2 = bus.subscribe();

        let event = CoreEvent::Mfe(MfeEvent::Registered {
            name: "jobs".to_string(),
            capabilities: vec!["fetchJobs".to_string()],
        });

        assert_eq!(bus.emit(event.clone()).unwrap(), 2);
        assert_eq!(sub1.recv().await.unwrap(), event);
        assert_eq!(sub2.recv().await.unwrap(), event);
    }

    #[tokio::test]
    async fn test_event_stream_with_filter() {
        let bus = EventBus::new(10);
        let mut stream = EventStream::new(bus.subscribe())
            .filter(|event| matches!(event, CoreEvent::Session(_)));

        bus.emit(CoreEvent::Store(StoreEvent::SliceUpdated {
            slice: "jobs".to_string(),
        }))
        .ok();
        bus.emit(unauthorized()).ok();

        assert_eq!(stream.recv().await.unwrap(), unauthorized());
        assert!(stream.try_recv().is_none());
    }

    #[tokio::test]
    async fn test_lagged_subscriber() {
        let bus = EventBus::new(2);
        let mut sub = bus.subscribe();

        for count in 0..5 {
            bus.emit(CoreEvent::Calendar(CalendarNotice::EventsLoaded { count }))
                .ok();
        }

        assert!(matches!(sub.recv().await, Err(RecvError::Lagged(_))));
    }

    #[test]
    fn test_event_severity() {
        assert_eq!(unauthorized().severity(), EventSeverity::Warning);
        assert_eq!(
            CoreEvent::Calendar(CalendarNotice::LoadFailed {
                message: "boom".to_string()
            })
            .severity(),
            EventSeverity::Error
        );
        assert_eq!(
            CoreEvent::Session(SessionEvent::TokenCleared).severity(),
            EventSeverity::Info
        );
        assert_eq!(
            CoreEvent::Store(StoreEvent::SliceUpdated {
                slice: "plugins".to_string()
            })
            .severity(),
            EventSeverity::Debug
        );
    }

    #[test]
    fn test_event_description() {
        assert_eq!(unauthorized().description(), "Session rejected by server");
    }

    #[test]
    fn test_event_serialization() {
        let event = CoreEvent::Store(StoreEvent::IllegalTransition {
            entity: "MentorshipRequest".to_string(),
            id: "req-1".to_string(),
            from: "Accepted".to_string(),
            to: "Pending".to_string(),
        });

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "Store");
        assert_eq!(json["payload"]["event"], "IllegalTransition");

        let deserialized: CoreEvent = serde_json::from_value(json).unwrap();
        assert_eq!(deserialized, event);
    }
}
