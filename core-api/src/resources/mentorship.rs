use super::segment;
use crate::client::ApiClient;
use crate::envelope::{ApiResponse, Paginated, PaginationParams};
use crate::error::Result;
use crate::models::{
    BecomeMentorRequest, Mentor, MentorFilters, MentorshipRequest, RequestStatus, Review,
    ReviewRequest, SendMentorshipRequest, UpdateMentorRequest,
};
use serde::Serialize;
use tracing::{debug, instrument};

#[derive(Serialize)]
struct StatusUpdate {
    status: RequestStatus,
}

/// `/mentors` directory, requests and reviews
///
/// Request status changes are sent as-is. The one-way `Pending` rule is
/// the server's to enforce.
#[derive(Debug, Clone)]
pub struct MentorshipApi {
    client: ApiClient,
}

impl MentorshipApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    #[instrument(skip(self, filters))]
    pub async fn list(&self, filters: &MentorFilters) -> Result<Paginated<Mentor>> {
        let page: Paginated<Mentor> = self.client.get_with_query("mentors", filters).await?;
        debug!(count = page.data.len(), total = page.total, "Fetched mentors");
        Ok(page)
    }

    #[instrument(skip(self))]
    pub async fn get(&self, mentor_id: &str) -> Result<Mentor> {
        let response: ApiResponse<Mentor> = self
            .client
            .get(&format!("mentors/{}", segment(mentor_id)))
            .await?;
        Ok(response.data)
    }

    #[instrument(skip(self, profile))]
    pub async fn become_mentor(&self, profile: &BecomeMentorRequest) -> Result<Mentor> {
        let response: ApiResponse<Mentor> = self.client.post("mentors", profile).await?;
        Ok(response.data)
    }

    #[instrument(skip(self, update))]
    pub async fn update_profile(
        &self,
        mentor_id: &str,
        update: &UpdateMentorRequest,
    ) -> Result<Mentor> {
        let response: ApiResponse<Mentor> = self
            .client
            .put(&format!("mentors/{}", segment(mentor_id)), update)
            .await?;
        Ok(response.data)
    }

    #[instrument(skip(self, request))]
    pub async fn request(
        &self,
        mentor_id: &str,
        request: &SendMentorshipRequest,
    ) -> Result<MentorshipRequest> {
        let response: ApiResponse<MentorshipRequest> = self
            .client
            .post(&format!("mentors/{}/request", segment(mentor_id)), request)
            .await?;
        Ok(response.data)
    }

    /// Requests addressed to the current user as mentor
    #[instrument(skip(self, pagination))]
    pub async fn received_requests(
        &self,
        pagination: &PaginationParams,
    ) -> Result<Paginated<MentorshipRequest>> {
        self.client
            .get_with_query("mentors/requests", pagination)
            .await
    }

    /// Requests the current user sent as mentee
    #[instrument(skip(self, pagination))]
    pub async fn sent_requests(
        &self,
        pagination: &PaginationParams,
    ) -> Result<Paginated<MentorshipRequest>> {
        self.client
            .get_with_query("mentors/requests/sent", pagination)
            .await
    }

    #[instrument(skip(self), fields(status = status.as_str()))]
    pub async fn respond(
        &self,
        request_id: &str,
        status: RequestStatus,
    ) -> Result<MentorshipRequest> {
        let response: ApiResponse<MentorshipRequest> = self
            .client
            .put(
                &format!("mentors/requests/{}", segment(request_id)),
                &StatusUpdate { status },
            )
            .await?;
        Ok(response.data)
    }

    #[instrument(skip(self, review), fields(rating = review.rating))]
    pub async fn add_review(&self, mentor_id: &str, review: &ReviewRequest) -> Result<Review> {
        let response: ApiResponse<Review> = self
            .client
            .post(&format!("mentors/{}/reviews", segment(mentor_id)), review)
            .await?;
        Ok(response.data)
    }

    #[instrument(skip(self, pagination))]
    pub async fn reviews(
        &self,
        mentor_id: &str,
        pagination: &PaginationParams,
    ) -> Result<Paginated<Review>> {
        self.client
            .get_with_query(&format!("mentors/{}/reviews", segment(mentor_id)), pagination)
            .await
    }
}
