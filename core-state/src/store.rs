//! # Shared Client Store
//!
//! Cached copies of server-owned entities shared by every hook.
//!
//! ## Overview
//!
//! The store is a single [`AppState`] behind a `tokio::sync::watch` channel.
//! Writers patch it in place under the channel's lock; readers take cheap
//! snapshots or subscribe for change notifications. Every write announces
//! the touched slice on the event bus.
//!
//! The store never talks to the backend. Hooks write into it after a
//! successful call; the last write wins.

use core_api::envelope::DEFAULT_PAGE_LIMIT;
use core_api::{
    Job, JobApplication, MarketplacePlugin, Mentor, MentorshipRequest, Paginated, Plugin,
    RequestStatus, Review, SkillExchange, SkillExchangeResponse, User,
};
use core_runtime::events::{CoreEvent, EventBus, StoreEvent};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, warn};

/// Named region of [`AppState`], used in change notifications
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slice {
    Session,
    Jobs,
    CurrentJob,
    Applications,
    MyApplications,
    Mentors,
    CurrentMentor,
    ReceivedRequests,
    SentRequests,
    Reviews,
    SkillExchanges,
    CurrentExchange,
    MyExchanges,
    ExchangeResponses,
    Plugins,
    Marketplace,
    Status,
}

impl Slice {
    pub fn as_str(self) -> &'static str {
        match self {
            Slice::Session => "session",
            Slice::Jobs => "jobs",
            Slice::CurrentJob => "current_job",
            Slice::Applications => "applications",
            Slice::MyApplications => "my_applications",
            Slice::Mentors => "mentors",
            Slice::CurrentMentor => "current_mentor",
            Slice::ReceivedRequests => "received_requests",
            Slice::SentRequests => "sent_requests",
            Slice::Reviews => "reviews",
            Slice::SkillExchanges => "skill_exchanges",
            Slice::CurrentExchange => "current_exchange",
            Slice::MyExchanges => "my_exchanges",
            Slice::ExchangeResponses => "exchange_responses",
            Slice::Plugins => "plugins",
            Slice::Marketplace => "marketplace",
            Slice::Status => "status",
        }
    }
}

impl fmt::Display for Slice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything the UI renders from
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    pub user: Option<User>,
    pub is_authenticated: bool,

    pub jobs: Paginated<Job>,
    pub current_job: Option<Job>,
    /// Applications received for the job last queried
    pub applications: Paginated<JobApplication>,
    pub my_applications: Paginated<JobApplication>,

    pub mentors: Paginated<Mentor>,
    pub current_mentor: Option<Mentor>,
    pub received_requests: Paginated<MentorshipRequest>,
    pub sent_requests: Paginated<MentorshipRequest>,
    /// Reviews of the mentor last queried
    pub reviews: Paginated<Review>,
    /// Mentor whose reviews `reviews` holds
    pub reviews_mentor_id: Option<String>,

    pub skill_exchanges: Paginated<SkillExchange>,
    pub current_exchange: Option<SkillExchange>,
    pub my_exchanges: Paginated<SkillExchange>,
    /// Responses to the exchange last queried
    pub exchange_responses: Paginated<SkillExchangeResponse>,
    /// Exchange whose responses `exchange_responses` holds
    pub responses_exchange_id: Option<String>,

    pub plugins: Paginated<Plugin>,
    pub marketplace: Paginated<MarketplacePlugin>,

    pub is_loading: bool,
    pub error: Option<String>,
}

/// Shared, observable [`AppState`]
///
/// Cloning is cheap; clones share the same state and bus.
#[derive(Clone)]
pub struct Store {
    state: Arc<watch::Sender<AppState>>,
    event_bus: EventBus,
}

impl Store {
    pub fn new(event_bus: EventBus) -> Self {
        let (state, _) = watch::channel(AppState::default());
        Self {
            state: Arc::new(state),
            event_bus,
        }
    }

    /// Owned copy of the current state
    pub fn snapshot(&self) -> AppState {
        self.state.borrow().clone()
    }

    /// Read a projection of the current state without cloning all of it
    pub fn read<R>(&self, f: impl FnOnce(&AppState) -> R) -> R {
        f(&self.state.borrow())
    }

    /// Receiver that is notified after every write
    pub fn subscribe(&self) -> watch::Receiver<AppState> {
        self.state.subscribe()
    }

    /// Patch one slice in place and announce it
    pub fn update(&self, slice: Slice, f: impl FnOnce(&mut AppState)) {
        self.state.send_modify(f);
        debug!(slice = %slice, "Store slice updated");
        self.emit(StoreEvent::SliceUpdated {
            slice: slice.as_str().to_string(),
        });
    }

    pub fn user(&self) -> Option<User> {
        self.read(|s| s.user.clone())
    }

    pub fn is_authenticated(&self) -> bool {
        self.read(|s| s.is_authenticated)
    }

    /// Replace the signed-in user
    ///
    /// `authenticated` may be true without a user when only a persisted
    /// token is known.
    pub fn set_session(&self, user: Option<User>, authenticated: bool) {
        let user_id = user.as_ref().map(|u| u.id.clone());
        self.state.send_modify(|s| {
            s.user = user;
            s.is_authenticated = authenticated;
        });
        self.emit(StoreEvent::UserChanged { user_id });
    }

    /// Drop the user and every per-user cache
    pub fn sign_out(&self) {
        self.state.send_modify(|s| {
            *s = AppState {
                jobs: std::mem::take(&mut s.jobs),
                mentors: std::mem::take(&mut s.mentors),
                skill_exchanges: std::mem::take(&mut s.skill_exchanges),
                marketplace: std::mem::take(&mut s.marketplace),
                ..AppState::default()
            };
        });
        self.emit(StoreEvent::UserChanged { user_id: None });
    }

    /// Store-wide loading flag
    ///
    /// Hooks never write it; the host sets it around work that spans hooks,
    /// e.g. the initial data load. Every hook's `is_loading()` reports it.
    pub fn is_loading(&self) -> bool {
        self.read(|s| s.is_loading)
    }

    pub fn set_loading(&self, loading: bool) {
        self.state.send_if_modified(|s| {
            let changed = s.is_loading != loading;
            s.is_loading = loading;
            changed
        });
    }

    pub fn error(&self) -> Option<String> {
        self.read(|s| s.error.clone())
    }

    /// Record a store-wide error and announce it
    ///
    /// Host-driven like [`set_loading`](Self::set_loading); every hook's
    /// `error()` falls back to it.
    pub fn set_error(&self, message: impl Into<String>) {
        let message = message.into();
        self.state.send_modify(|s| s.error = Some(message.clone()));
        self.emit(StoreEvent::ErrorRaised { message });
    }

    pub fn clear_error(&self) {
        self.state.send_if_modified(|s| s.error.take().is_some());
    }

    /// Check a server-reported status change against the one-way rule
    ///
    /// A forbidden change is logged and announced but still applied by the
    /// caller.
    pub(crate) fn check_transition(
        &self,
        entity: &str,
        id: &str,
        from: Option<RequestStatus>,
        to: RequestStatus,
    ) {
        let Some(from) = from else {
            return;
        };
        if from.can_transition_to(to) {
            return;
        }

        warn!(
            entity,
            id,
            from = from.as_str(),
            to = to.as_str(),
            "Server applied a status change the one-way rule forbids"
        );
        self.emit(StoreEvent::IllegalTransition {
            entity: entity.to_string(),
            id: id.to_string(),
            from: from.as_str().to_string(),
            to: to.as_str().to_string(),
        });
    }

    fn emit(&self, event: StoreEvent) {
        self.event_bus.emit(CoreEvent::Store(event)).ok();
    }
}

impl fmt::Debug for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("Store")
            .field("is_authenticated", &state.is_authenticated)
            .field("is_loading", &state.is_loading)
            .field("error", &state.error)
            .finish()
    }
}

/// Replace the entry with `item`'s id, returning whether one was found
pub(crate) fn replace_by_id<T>(items: &mut [T], item: &T, id: impl Fn(&T) -> &str) -> bool
where
    T: Clone,
{
    let key = id(item);
    match items.iter_mut().find(|existing| id(existing) == key) {
        Some(existing) => {
            *existing = item.clone();
            true
        }
        None => false,
    }
}

/// Insert at the front of a cached page, bumping its total
///
/// The page keeps at most `limit` items and its page count follows the new
/// total. A page that was never fetched takes the backend's default limit.
pub(crate) fn prepend<T>(page: &mut Paginated<T>, item: T) {
    if page.limit == 0 {
        page.limit = DEFAULT_PAGE_LIMIT;
    }
    page.data.insert(0, item);
    page.data.truncate(page.limit as usize);
    page.total += 1;
    page.total_pages = Paginated::<T>::expected_total_pages(page.total, page.limit);
}

/// Remove the entry with `key` from a cached page, returning whether one was found
pub(crate) fn remove_by_id<T>(page: &mut Paginated<T>, key: &str, id: impl Fn(&T) -> &str) -> bool {
    let before = page.data.len();
    page.data.retain(|item| id(item) != key);
    let removed = page.data.len() != before;
    if removed {
        page.total = page.total.saturating_sub(1);
        page.total_pages = Paginated::<T>::expected_total_pages(page.total, page.limit);
    }
    removed
}
