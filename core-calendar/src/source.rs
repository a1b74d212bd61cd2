//! Where calendar events come from

use crate::error::Result;
use crate::event::CalendarEvent;
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Inclusive range of calendar days
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn single(day: NaiveDate) -> Self {
        Self::new(day, day)
    }

    pub fn contains(&self, day: NaiveDate) -> bool {
        self.start <= day && day <= self.end
    }

    /// Number of days covered
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

/// Loads events for a visible range
///
/// Implementations typically fetch from the backend. The calendar reloads
/// through this trait after every navigation.
#[async_trait]
pub trait EventSource: Send + Sync {
    async fn load(&self, range: DateRange) -> Result<Vec<CalendarEvent>>;
}

/// Fixed in-memory event list, filtered by start date
#[derive(Debug, Clone, Default)]
pub struct StaticEventSource {
    events: Vec<CalendarEvent>,
}

impl StaticEventSource {
    pub fn new(events: Vec<CalendarEvent>) -> Self {
        Self { events }
    }
}

#[async_trait]
impl EventSource for StaticEventSource {
    async fn load(&self, range: DateRange) -> Result<Vec<CalendarEvent>> {
        Ok(self
            .events
            .iter()
            .filter(|e| range.contains(e.start_date()))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 2, d).unwrap()
    }

    #[test]
    fn test_range_bounds_are_inclusive() {
        let range = DateRange::new(day(4), day(10));
        assert!(range.contains(day(4)));
        assert!(range.contains(day(10)));
        assert!(!range.contains(day(11)));
        assert_eq!(range.days(), 7);
        assert_eq!(DateRange::single(day(29)).days(), 1);
    }
}
