//! Calendar event records and category filtering

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventCategory {
    Academic,
    Career,
    Workshop,
    Social,
    Sports,
}

impl EventCategory {
    pub const ALL: [EventCategory; 5] = [
        EventCategory::Academic,
        EventCategory::Career,
        EventCategory::Workshop,
        EventCategory::Social,
        EventCategory::Sports,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            EventCategory::Academic => "academic",
            EventCategory::Career => "career",
            EventCategory::Workshop => "workshop",
            EventCategory::Social => "social",
            EventCategory::Sports => "sports",
        }
    }
}

impl fmt::Display for EventCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Category filter: everything, or a single category
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryFilter {
    #[default]
    All,
    Only(EventCategory),
}

impl CategoryFilter {
    pub fn matches(self, category: EventCategory) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(wanted) => wanted == category,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub category: EventCategory,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organizer: Option<String>,
}

impl CalendarEvent {
    /// Calendar day the event starts on
    pub fn start_date(&self) -> NaiveDate {
        self.start.date_naive()
    }

    /// Whether the event starts on `day` and passes `filter`
    pub fn falls_on(&self, day: NaiveDate, filter: CategoryFilter) -> bool {
        self.start_date() == day && filter.matches(self.category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn event(category: EventCategory, y: i32, m: u32, d: u32, h: u32) -> CalendarEvent {
        let start = Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap();
        CalendarEvent {
            id: "e1".to_string(),
            title: "Career Fair".to_string(),
            description: String::new(),
            start,
            end: start + chrono::Duration::hours(2),
            category,
            location: None,
            organizer: None,
        }
    }

    #[test]
    fn test_falls_on_matches_exact_day_and_category() {
        let e = event(EventCategory::Career, 2024, 3, 15, 23);
        let day = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();

        assert!(e.falls_on(day, CategoryFilter::All));
        assert!(e.falls_on(day, CategoryFilter::Only(EventCategory::Career)));
        assert!(!e.falls_on(day, CategoryFilter::Only(EventCategory::Social)));
        assert!(!e.falls_on(day.succ_opt().unwrap(), CategoryFilter::All));
        // Same day number, different month and year
        assert!(!e.falls_on(NaiveDate::from_ymd_opt(2024, 4, 15).unwrap(), CategoryFilter::All));
        assert!(!e.falls_on(NaiveDate::from_ymd_opt(2023, 3, 15).unwrap(), CategoryFilter::All));
    }

    #[test]
    fn test_wire_format() {
        let json = r#"{"id":"e9","title":"Hackathon","start":"2024-05-01T09:00:00Z","end":"2024-05-02T09:00:00Z","category":"workshop"}"#;
        let e: CalendarEvent = serde_json::from_str(json).unwrap();
        assert_eq!(e.category, EventCategory::Workshop);
        assert!(e.location.is_none());
    }
}
