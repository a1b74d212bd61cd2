use super::segment;
use crate::client::ApiClient;
use crate::envelope::{Acknowledgement, ApiResponse, Paginated, PaginationParams};
use crate::error::Result;
use crate::models::{
    ApplyRequest, CreateJobRequest, Job, JobApplication, JobFilters, UpdateJobRequest,
};
use tracing::{debug, instrument};

/// `/jobs` board and applications
#[derive(Debug, Clone)]
pub struct JobsApi {
    client: ApiClient,
}

impl JobsApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    #[instrument(skip(self, filters))]
    pub async fn list(&self, filters: &JobFilters) -> Result<Paginated<Job>> {
        let page: Paginated<Job> = self.client.get_with_query("jobs", filters).await?;
        debug!(count = page.data.len(), total = page.total, "Fetched jobs");
        Ok(page)
    }

    #[instrument(skip(self))]
    pub async fn get(&self, job_id: &str) -> Result<Job> {
        let response: ApiResponse<Job> = self
            .client
            .get(&format!("jobs/{}", segment(job_id)))
            .await?;
        Ok(response.data)
    }

    #[instrument(skip(self, job), fields(title = %job.title))]
    pub async fn create(&self, job: &CreateJobRequest) -> Result<Job> {
        let response: ApiResponse<Job> = self.client.post("jobs", job).await?;
        Ok(response.data)
    }

    #[instrument(skip(self, update))]
    pub async fn update(&self, job_id: &str, update: &UpdateJobRequest) -> Result<Job> {
        let response: ApiResponse<Job> = self
            .client
            .put(&format!("jobs/{}", segment(job_id)), update)
            .await?;
        Ok(response.data)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, job_id: &str) -> Result<()> {
        self.client
            .delete::<Acknowledgement>(&format!("jobs/{}", segment(job_id)))
            .await?;
        Ok(())
    }

    #[instrument(skip(self, application))]
    pub async fn apply(&self, job_id: &str, application: &ApplyRequest) -> Result<JobApplication> {
        let response: ApiResponse<JobApplication> = self
            .client
            .post(&format!("jobs/{}/apply", segment(job_id)), application)
            .await?;
        Ok(response.data)
    }

    /// Applications received for a job the caller posted
    #[instrument(skip(self, pagination))]
    pub async fn applications(
        &self,
        job_id: &str,
        pagination: &PaginationParams,
    ) -> Result<Paginated<JobApplication>> {
        self.client
            .get_with_query(&format!("jobs/{}/applications", segment(job_id)), pagination)
            .await
    }

    /// Applications the current user has submitted
    #[instrument(skip(self, pagination))]
    pub async fn my_applications(
        &self,
        pagination: &PaginationParams,
    ) -> Result<Paginated<JobApplication>> {
        self.client
            .get_with_query("user/applications", pagination)
            .await
    }
}
