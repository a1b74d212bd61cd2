//! # Event Calendar Module
//!
//! Month, week and day calendar state plus the upcoming-events page.
//!
//! Events are loaded through an [`EventSource`] for the range the active
//! view shows. Filtering by category and day bucketing happen client-side
//! on the loaded events.

pub mod error;
pub mod event;
pub mod events_page;
pub mod source;
pub mod state;

pub use error::{CalendarError, Result};
pub use event::{CalendarEvent, CategoryFilter, EventCategory};
pub use events_page::EventsPage;
pub use source::{DateRange, EventSource, StaticEventSource};
pub use state::{CalendarState, CalendarView};
