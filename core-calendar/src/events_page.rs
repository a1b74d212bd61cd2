//! Upcoming-events list with a detail selection

use crate::error::{CalendarError, Result};
use crate::event::{CalendarEvent, CategoryFilter};
use crate::source::{DateRange, EventSource};
use bridge_traits::Clock;
use chrono::Days;
use std::sync::Arc;
use tracing::warn;

/// Days ahead of today the page loads by default
pub const DEFAULT_HORIZON_DAYS: u64 = 30;

pub struct EventsPage {
    events: Vec<CalendarEvent>,
    filter: CategoryFilter,
    selected: Option<String>,
    horizon_days: u64,
    error: Option<String>,
    source: Arc<dyn EventSource>,
    clock: Arc<dyn Clock>,
}

impl EventsPage {
    pub fn new(source: Arc<dyn EventSource>, clock: Arc<dyn Clock>) -> Self {
        Self {
            events: Vec::new(),
            filter: CategoryFilter::All,
            selected: None,
            horizon_days: DEFAULT_HORIZON_DAYS,
            error: None,
            source,
            clock,
        }
    }

    pub fn with_horizon_days(mut self, days: u64) -> Self {
        self.horizon_days = days;
        self
    }

    pub fn filter(&self) -> CategoryFilter {
        self.filter
    }

    pub fn set_filter(&mut self, filter: CategoryFilter) {
        self.filter = filter;
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Load events from today through the horizon
    pub async fn refresh(&mut self) -> Result<()> {
        let today = self.clock.today();
        let end = today
            .checked_add_days(Days::new(self.horizon_days))
            .ok_or_else(|| CalendarError::DateOutOfRange(today.to_string()))?;

        match self.source.load(DateRange::new(today, end)).await {
            Ok(events) => {
                self.events = events;
                self.error = None;
                if let Some(id) = &self.selected {
                    if !self.events.iter().any(|e| &e.id == id) {
                        self.selected = None;
                    }
                }
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Failed to load upcoming events");
                self.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Filtered events that have not started yet, soonest first
    pub fn upcoming(&self) -> Vec<&CalendarEvent> {
        let now = self.clock.now();
        let mut upcoming: Vec<&CalendarEvent> = self
            .events
            .iter()
            .filter(|e| e.start >= now && self.filter.matches(e.category))
            .collect();
        upcoming.sort_by_key(|e| e.start);
        upcoming
    }

    /// Select an event for the detail view
    pub fn select(&mut self, event_id: &str) -> Result<&CalendarEvent> {
        let event = self
            .events
            .iter()
            .find(|e| e.id == event_id)
            .ok_or_else(|| CalendarError::UnknownEvent(event_id.to_string()))?;
        self.selected = Some(event.id.clone());
        Ok(event)
    }

    pub fn selected(&self) -> Option<&CalendarEvent> {
        let id = self.selected.as_ref()?;
        self.events.iter().find(|e| &e.id == id)
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }
}
