//! # Event Calendar State
//!
//! View state for the month/week/day calendar.
//!
//! ## Overview
//!
//! `CalendarState` holds the active view, the category filter and a single
//! anchor date. Navigation moves the anchor by one unit of the active view
//! and reloads the visible range from an [`EventSource`]. Queries read the
//! loaded events; the category filter is applied client-side and never
//! triggers a reload.
//!
//! Weeks start on Sunday.

use crate::error::{CalendarError, Result};
use crate::event::{CalendarEvent, CategoryFilter};
use crate::source::{DateRange, EventSource};
use bridge_traits::Clock;
use chrono::{Datelike, Days, Months, NaiveDate};
use core_runtime::events::{CalendarNotice, CoreEvent, EventBus};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CalendarView {
    #[default]
    Month,
    Week,
    Day,
}

impl CalendarView {
    pub fn as_str(self) -> &'static str {
        match self {
            CalendarView::Month => "month",
            CalendarView::Week => "week",
            CalendarView::Day => "day",
        }
    }
}

impl fmt::Display for CalendarView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub struct CalendarState {
    view: CalendarView,
    filter: CategoryFilter,
    current_date: NaiveDate,
    events: Vec<CalendarEvent>,
    is_loading: bool,
    error: Option<String>,
    source: Arc<dyn EventSource>,
    clock: Arc<dyn Clock>,
    event_bus: Option<EventBus>,
}

impl CalendarState {
    /// Month view anchored on today, nothing loaded yet
    pub fn new(source: Arc<dyn EventSource>, clock: Arc<dyn Clock>) -> Self {
        Self {
            view: CalendarView::Month,
            filter: CategoryFilter::All,
            current_date: clock.today(),
            events: Vec::new(),
            is_loading: false,
            error: None,
            source,
            clock,
            event_bus: None,
        }
    }

    pub fn with_event_bus(mut self, event_bus: EventBus) -> Self {
        self.event_bus = Some(event_bus);
        self
    }

    pub fn view(&self) -> CalendarView {
        self.view
    }

    pub fn filter(&self) -> CategoryFilter {
        self.filter
    }

    pub fn current_date(&self) -> NaiveDate {
        self.current_date
    }

    /// Every loaded event, unfiltered
    pub fn events(&self) -> &[CalendarEvent] {
        &self.events
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Switch view and reload the new visible range
    pub async fn set_view(&mut self, view: CalendarView) -> Result<()> {
        range_at(view, self.current_date)?;
        self.view = view;
        self.navigated().await
    }

    pub fn set_filter(&mut self, filter: CategoryFilter) {
        self.filter = filter;
    }

    /// Move forward one month, week or day
    pub async fn next(&mut self) -> Result<()> {
        let date = self.step(true)?;
        self.move_to(date).await
    }

    /// Move back one month, week or day
    pub async fn previous(&mut self) -> Result<()> {
        let date = self.step(false)?;
        self.move_to(date).await
    }

    pub async fn today(&mut self) -> Result<()> {
        let date = self.clock.today();
        self.move_to(date).await
    }

    /// Jump to `date`
    ///
    /// A date whose visible range would leave the supported calendar is
    /// rejected with `DateOutOfRange` and the current date is kept.
    pub async fn go_to(&mut self, date: NaiveDate) -> Result<()> {
        self.move_to(date).await
    }

    /// Load events for the visible range
    ///
    /// On failure the previous events are kept and the error is recorded.
    pub async fn reload(&mut self) -> Result<()> {
        let range = self.visible_range()?;
        self.is_loading = true;
        self.error = None;
        let loaded = self.source.load(range).await;
        self.is_loading = false;

        match loaded {
            Ok(events) => {
                debug!(count = events.len(), start = %range.start, end = %range.end, "Calendar events loaded");
                self.emit(CalendarNotice::EventsLoaded {
                    count: events.len(),
                });
                self.events = events;
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Calendar event source failed");
                self.error = Some(e.to_string());
                self.emit(CalendarNotice::LoadFailed {
                    message: e.to_string(),
                });
                Err(e)
            }
        }
    }

    /// Events starting on `day` that pass the active filter
    pub fn events_for_day(&self, day: NaiveDate) -> Vec<&CalendarEvent> {
        self.events
            .iter()
            .filter(|e| e.falls_on(day, self.filter))
            .collect()
    }

    /// Sunday-first weeks covering the month of the current date
    pub fn month_grid(&self) -> Result<Vec<[NaiveDate; 7]>> {
        month_grid_at(self.current_date)
    }

    /// Sunday-first week containing the current date
    pub fn week_days(&self) -> Result<[NaiveDate; 7]> {
        week_from(sunday_on_or_before(self.current_date)?)
    }

    /// Days the active view shows
    ///
    /// Month view covers the whole grid, including the leading and
    /// trailing days of the neighbouring months.
    pub fn visible_range(&self) -> Result<DateRange> {
        range_at(self.view, self.current_date)
    }

    /// Header text, e.g. "March 2024"
    pub fn title(&self) -> String {
        match self.view {
            CalendarView::Month => self.current_date.format("%B %Y").to_string(),
            CalendarView::Week => match self.week_days() {
                Ok(days) => {
                    let (start, end) = (days[0], days[6]);
                    if start.year() == end.year() {
                        format!("{} - {}", start.format("%b %-d"), end.format("%b %-d, %Y"))
                    } else {
                        format!("{} - {}", start.format("%b %-d, %Y"), end.format("%b %-d, %Y"))
                    }
                }
                Err(_) => self.current_date.format("%b %-d, %Y").to_string(),
            },
            CalendarView::Day => self.current_date.format("%A, %B %-d, %Y").to_string(),
        }
    }

    fn step(&self, forward: bool) -> Result<NaiveDate> {
        let date = self.current_date;
        let moved = match (self.view, forward) {
            (CalendarView::Month, true) => date.checked_add_months(Months::new(1)),
            (CalendarView::Month, false) => date.checked_sub_months(Months::new(1)),
            (CalendarView::Week, true) => date.checked_add_days(Days::new(7)),
            (CalendarView::Week, false) => date.checked_sub_days(Days::new(7)),
            (CalendarView::Day, true) => date.checked_add_days(Days::new(1)),
            (CalendarView::Day, false) => date.checked_sub_days(Days::new(1)),
        };
        moved.ok_or_else(|| CalendarError::DateOutOfRange(date.to_string()))
    }

    async fn move_to(&mut self, date: NaiveDate) -> Result<()> {
        range_at(self.view, date)?;
        self.current_date = date;
        self.navigated().await
    }

    async fn navigated(&mut self) -> Result<()> {
        self.emit(CalendarNotice::Navigated {
            view: self.view.as_str().to_string(),
            date: self.current_date.to_string(),
        });
        self.reload().await
    }

    fn emit(&self, notice: CalendarNotice) {
        if let Some(bus) = &self.event_bus {
            bus.emit(CoreEvent::Calendar(notice)).ok();
        }
    }
}

impl fmt::Debug for CalendarState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CalendarState")
            .field("view", &self.view)
            .field("filter", &self.filter)
            .field("current_date", &self.current_date)
            .field("events", &self.events.len())
            .field("is_loading", &self.is_loading)
            .finish()
    }
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

fn last_of_month(date: NaiveDate) -> NaiveDate {
    let first = first_of_month(date);
    first
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .unwrap_or(NaiveDate::MAX)
}

fn out_of_range(date: NaiveDate) -> CalendarError {
    CalendarError::DateOutOfRange(date.to_string())
}

fn sunday_on_or_before(date: NaiveDate) -> Result<NaiveDate> {
    date.checked_sub_days(Days::new(u64::from(date.weekday().num_days_from_sunday())))
        .ok_or_else(|| out_of_range(date))
}

fn week_from(sunday: NaiveDate) -> Result<[NaiveDate; 7]> {
    let mut days = [sunday; 7];
    for (offset, day) in days.iter_mut().enumerate() {
        *day = sunday
            .checked_add_days(Days::new(offset as u64))
            .ok_or_else(|| out_of_range(sunday))?;
    }
    Ok(days)
}

fn month_grid_at(date: NaiveDate) -> Result<Vec<[NaiveDate; 7]>> {
    let last = last_of_month(date);

    let mut weeks = Vec::with_capacity(6);
    let mut week_start = sunday_on_or_before(first_of_month(date))?;
    while week_start <= last {
        weeks.push(week_from(week_start)?);
        match week_start.checked_add_days(Days::new(7)) {
            Some(next) => week_start = next,
            None => break,
        }
    }
    Ok(weeks)
}

fn range_at(view: CalendarView, date: NaiveDate) -> Result<DateRange> {
    match view {
        CalendarView::Month => {
            let grid = month_grid_at(date)?;
            match (grid.first(), grid.last()) {
                (Some(first), Some(last)) => Ok(DateRange::new(first[0], last[6])),
                _ => Ok(DateRange::single(date)),
            }
        }
        CalendarView::Week => {
            let days = week_from(sunday_on_or_before(date)?)?;
            Ok(DateRange::new(days[0], days[6]))
        }
        CalendarView::Day => Ok(DateRange::single(date)),
    }
}
