use super::ViewState;
use crate::store::{prepend, replace_by_id, Slice, Store};
use crate::tracker::ActionTracker;
use core_api::{
    ApiClient, BecomeMentorRequest, Mentor, MentorFilters, MentorshipApi, MentorshipRequest,
    Paginated, PaginationParams, RequestStatus, Result, Review, ReviewRequest,
    SendMentorshipRequest, UpdateMentorRequest,
};

/// Mentor directory, mentorship requests and reviews
#[derive(Debug, Clone)]
pub struct MentorshipHook {
    api: MentorshipApi,
    store: Store,
    tracker: ActionTracker,
}

impl MentorshipHook {
    pub fn new(client: ApiClient, store: Store) -> Self {
        Self {
            api: MentorshipApi::new(client),
            store,
            tracker: ActionTracker::new(),
        }
    }

    pub async fn fetch_mentors(&self, filters: &MentorFilters) -> Result<Paginated<Mentor>> {
        let action = self.tracker.begin("fetch_mentors");
        let page = action.settle(self.api.list(filters).await, "Failed to fetch mentors")?;
        action.commit(|| self.store.update(Slice::Mentors, |s| s.mentors = page.clone()));
        Ok(page)
    }

    pub async fn fetch_mentor(&self, mentor_id: &str) -> Result<Mentor> {
        let action = self.tracker.begin("fetch_mentor");
        let mentor = action.settle(self.api.get(mentor_id).await, "Failed to fetch mentor")?;
        action.commit(|| {
            self.store.update(Slice::CurrentMentor, |s| {
                s.current_mentor = Some(mentor.clone())
            })
        });
        Ok(mentor)
    }

    pub async fn become_mentor(&self, profile: &BecomeMentorRequest) -> Result<Mentor> {
        let action = self.tracker.begin("become_mentor");
        let mentor = action.settle(
            self.api.become_mentor(profile).await,
            "Failed to create mentor profile",
        )?;
        action.commit(|| {
            self.store.update(Slice::Mentors, |s| {
                prepend(&mut s.mentors, mentor.clone());
                s.current_mentor = Some(mentor.clone());
            })
        });
        Ok(mentor)
    }

    pub async fn update_mentor_profile(
        &self,
        mentor_id: &str,
        update: &UpdateMentorRequest,
    ) -> Result<Mentor> {
        let action = self.tracker.begin(format!("update_mentor:{}", mentor_id));
        let mentor = action.settle(
            self.api.update_profile(mentor_id, update).await,
            "Failed to update mentor profile",
        )?;
        action.commit(|| {
            self.store.update(Slice::Mentors, |s| {
                replace_by_id(&mut s.mentors.data, &mentor, |m| &m.id);
                if s.current_mentor.as_ref().is_some_and(|m| m.id == mentor.id) {
                    s.current_mentor = Some(mentor.clone());
                }
            })
        });
        Ok(mentor)
    }

    pub async fn request_mentorship(
        &self,
        mentor_id: &str,
        message: &str,
    ) -> Result<MentorshipRequest> {
        let action = self.tracker.begin_unfenced();
        let request = SendMentorshipRequest {
            message: message.to_string(),
        };
        let sent = action.settle(
            self.api.request(mentor_id, &request).await,
            "Failed to send mentorship request",
        )?;
        self.store
            .update(Slice::SentRequests, |s| prepend(&mut s.sent_requests, sent.clone()));
        Ok(sent)
    }

    pub async fn fetch_received_requests(
        &self,
        pagination: &PaginationParams,
    ) -> Result<Paginated<MentorshipRequest>> {
        let action = self.tracker.begin("fetch_received_requests");
        let page = action.settle(
            self.api.received_requests(pagination).await,
            "Failed to fetch mentorship requests",
        )?;
        action.commit(|| {
            self.store
                .update(Slice::ReceivedRequests, |s| s.received_requests = page.clone())
        });
        Ok(page)
    }

    pub async fn fetch_sent_requests(
        &self,
        pagination: &PaginationParams,
    ) -> Result<Paginated<MentorshipRequest>> {
        let action = self.tracker.begin("fetch_sent_requests");
        let page = action.settle(
            self.api.sent_requests(pagination).await,
            "Failed to fetch sent requests",
        )?;
        action.commit(|| {
            self.store
                .update(Slice::SentRequests, |s| s.sent_requests = page.clone())
        });
        Ok(page)
    }

    /// Accept or reject a received request
    ///
    /// The status is sent without a client-side check. A reply that breaks
    /// the one-way rule is reported on the bus and cached anyway.
    pub async fn respond_to_request(
        &self,
        request_id: &str,
        status: RequestStatus,
    ) -> Result<MentorshipRequest> {
        let action = self.tracker.begin(format!("respond_to_request:{}", request_id));
        let updated = action.settle(
            self.api.respond(request_id, status).await,
            "Failed to respond to request",
        )?;
        action.commit(|| {
            let previous = self.store.read(|s| {
                s.received_requests
                    .data
                    .iter()
                    .find(|r| r.id == updated.id)
                    .map(|r| r.status)
            });
            self.store
                .check_transition("MentorshipRequest", &updated.id, previous, updated.status);
            self.store.update(Slice::ReceivedRequests, |s| {
                replace_by_id(&mut s.received_requests.data, &updated, |r| &r.id);
            });
        });
        Ok(updated)
    }

    /// Review a mentor
    ///
    /// The cached review page only grows when it holds this mentor's reviews.
    pub async fn add_review(&self, mentor_id: &str, review: &ReviewRequest) -> Result<Review> {
        let action = self.tracker.begin_unfenced();
        let added = action.settle(
            self.api.add_review(mentor_id, review).await,
            "Failed to add review",
        )?;
        self.store.update(Slice::Reviews, |s| {
            if s.reviews_mentor_id.as_deref() == Some(mentor_id) {
                prepend(&mut s.reviews, added.clone());
            }
            if let Some(mentor) = s.current_mentor.as_mut().filter(|m| m.id == mentor_id) {
                mentor.reviews.push(added.clone());
            }
        });
        Ok(added)
    }

    pub async fn fetch_reviews(
        &self,
        mentor_id: &str,
        pagination: &PaginationParams,
    ) -> Result<Paginated<Review>> {
        let action = self.tracker.begin("fetch_reviews");
        let page = action.settle(
            self.api.reviews(mentor_id, pagination).await,
            "Failed to fetch reviews",
        )?;
        action.commit(|| {
            self.store.update(Slice::Reviews, |s| {
                s.reviews = page.clone();
                s.reviews_mentor_id = Some(mentor_id.to_string());
            })
        });
        Ok(page)
    }
}

impl ViewState for MentorshipHook {
    fn tracker(&self) -> &ActionTracker {
        &self.tracker
    }

    fn store(&self) -> &Store {
        &self.store
    }
}
