use super::ViewState;
use crate::store::{prepend, remove_by_id, replace_by_id, Slice, Store};
use crate::tracker::ActionTracker;
use core_api::{
    ApiClient, ApplyRequest, CreateJobRequest, Job, JobApplication, JobFilters, JobsApi,
    Paginated, PaginationParams, Result, UpdateJobRequest,
};

/// Job board actions
#[derive(Debug, Clone)]
pub struct JobsHook {
    api: JobsApi,
    store: Store,
    tracker: ActionTracker,
}

impl JobsHook {
    pub fn new(client: ApiClient, store: Store) -> Self {
        Self {
            api: JobsApi::new(client),
            store,
            tracker: ActionTracker::new(),
        }
    }

    pub async fn fetch_jobs(&self, filters: &JobFilters) -> Result<Paginated<Job>> {
        let action = self.tracker.begin("fetch_jobs");
        let page = action.settle(self.api.list(filters).await, "Failed to fetch jobs")?;
        action.commit(|| self.store.update(Slice::Jobs, |s| s.jobs = page.clone()));
        Ok(page)
    }

    pub async fn fetch_job(&self, job_id: &str) -> Result<Job> {
        let action = self.tracker.begin("fetch_job");
        let job = action.settle(self.api.get(job_id).await, "Failed to fetch job")?;
        action.commit(|| {
            self.store
                .update(Slice::CurrentJob, |s| s.current_job = Some(job.clone()))
        });
        Ok(job)
    }

    pub async fn create_job(&self, request: &CreateJobRequest) -> Result<Job> {
        let action = self.tracker.begin_unfenced();
        let job = action.settle(self.api.create(request).await, "Failed to create job")?;
        self.store
            .update(Slice::Jobs, |s| prepend(&mut s.jobs, job.clone()));
        Ok(job)
    }

    pub async fn update_job(&self, job_id: &str, update: &UpdateJobRequest) -> Result<Job> {
        let action = self.tracker.begin(format!("update_job:{}", job_id));
        let job = action.settle(self.api.update(job_id, update).await, "Failed to update job")?;
        action.commit(|| self.store_job(&job));
        Ok(job)
    }

    pub async fn delete_job(&self, job_id: &str) -> Result<()> {
        let action = self.tracker.begin(format!("delete_job:{}", job_id));
        action.settle(self.api.delete(job_id).await, "Failed to delete job")?;
        action.commit(|| {
            self.store.update(Slice::Jobs, |s| {
                remove_by_id(&mut s.jobs, job_id, |j| &j.id);
                if s.current_job.as_ref().is_some_and(|j| j.id == job_id) {
                    s.current_job = None;
                }
            })
        });
        Ok(())
    }

    /// Apply to a job; the applicant is appended to the cached job
    pub async fn apply(&self, job_id: &str, application: &ApplyRequest) -> Result<JobApplication> {
        let action = self.tracker.begin(format!("apply:{}", job_id));
        let submitted = action.settle(
            self.api.apply(job_id, application).await,
            "Failed to submit application",
        )?;
        action.commit(|| {
            let applicant = submitted.applicant_id.clone();
            self.store.update(Slice::MyApplications, |s| {
                prepend(&mut s.my_applications, submitted.clone());
                let cached = s
                    .jobs
                    .data
                    .iter_mut()
                    .chain(s.current_job.as_mut())
                    .filter(|j| j.id == job_id);
                for job in cached {
                    if !job.applicants.contains(&applicant) {
                        job.applicants.push(applicant.clone());
                    }
                }
            })
        });
        Ok(submitted)
    }

    pub async fn fetch_applications(
        &self,
        job_id: &str,
        pagination: &PaginationParams,
    ) -> Result<Paginated<JobApplication>> {
        let action = self.tracker.begin("fetch_applications");
        let page = action.settle(
            self.api.applications(job_id, pagination).await,
            "Failed to fetch applications",
        )?;
        action.commit(|| {
            self.store
                .update(Slice::Applications, |s| s.applications = page.clone())
        });
        Ok(page)
    }

    pub async fn fetch_my_applications(
        &self,
        pagination: &PaginationParams,
    ) -> Result<Paginated<JobApplication>> {
        let action = self.tracker.begin("fetch_my_applications");
        let page = action.settle(
            self.api.my_applications(pagination).await,
            "Failed to fetch your applications",
        )?;
        action.commit(|| {
            self.store
                .update(Slice::MyApplications, |s| s.my_applications = page.clone())
        });
        Ok(page)
    }

    fn store_job(&self, job: &Job) {
        self.store.update(Slice::Jobs, |s| {
            replace_by_id(&mut s.jobs.data, job, |j| &j.id);
            if s.current_job.as_ref().is_some_and(|j| j.id == job.id) {
                s.current_job = Some(job.clone());
            }
        });
    }
}

impl ViewState for JobsHook {
    fn tracker(&self) -> &ActionTracker {
        &self.tracker
    }

    fn store(&self) -> &Store {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hooks::test_support::*;
    use async_trait::async_trait;
    use bridge_desktop::MemoryLocalStorage;
    use bridge_traits::error::Result as BridgeResult;
    use bridge_traits::{HttpClient, HttpMethod, HttpRequest, HttpResponse};
    use core_api::{JobStatus, JobType};
    use core_auth::SessionContext;
    use core_runtime::events::EventBus;
    use std::sync::Arc;
    use tokio::sync::Notify;

    #[tokio::test]
    async fn test_fetch_jobs_populates_store() {
        let mut http = MockHttpClient::new();
        expect_call(
            &mut http,
            HttpMethod::Get,
            "jobs",
            200,
            page(vec![job_json("j1", "Intern"), job_json("j2", "Engineer")]),
        );
        let f = fixture(http);
        let hook = JobsHook::new(f.client, f.store.clone());

        let jobs = hook.fetch_jobs(&JobFilters::default()).await.unwrap();

        assert_eq!(jobs.total, 2);
        assert_eq!(f.store.snapshot().jobs, jobs);
        assert!(!hook.is_loading());
    }

    #[tokio::test]
    async fn test_failed_fetch_sets_error() {
        let mut http = MockHttpClient::new();
        expect_call(&mut http, HttpMethod::Get, "jobs/j9", 500, "oops".to_string());
        let f = fixture(http);
        let hook = JobsHook::new(f.client, f.store.clone());

        assert!(hook.fetch_job("j9").await.is_err());

        assert!(!hook.is_loading());
        assert_eq!(
            hook.error().as_deref(),
            Some("Request failed with status code 500")
        );
        assert!(f.store.snapshot().current_job.is_none());
    }

    #[tokio::test]
    async fn test_mutations_patch_cached_list() {
        let mut http = MockHttpClient::new();
        let mut filled = job_json("j1", "Intern");
        filled["status"] = serde_json::json!("Filled");
        expect_call(&mut http, HttpMethod::Post, "jobs", 201, envelope(job_json("j1", "Intern")));
        expect_call(&mut http, HttpMethod::Put, "jobs/j1", 200, envelope(filled));
        expect_call(
            &mut http,
            HttpMethod::Post,
            "jobs/j1/apply",
            201,
            envelope(serde_json::json!({
                "id": "a1",
                "jobId": "j1",
                "applicantId": "u7",
                "status": "pending",
                "createdAt": "2024-03-02T09:00:00Z"
            })),
        );
        expect_call(&mut http, HttpMethod::Delete, "jobs/j1", 204, String::new());

        let f = fixture(http);
        let hook = JobsHook::new(f.client, f.store.clone());

        hook.create_job(&CreateJobRequest {
            title: "Intern".to_string(),
            company: "Acme".to_string(),
            description: "Build things".to_string(),
            location: "Remote".to_string(),
            job_type: JobType::FullTime,
            requirements: vec![],
            salary: None,
            deadline: None,
        })
        .await
        .unwrap();
        assert_eq!(f.store.snapshot().jobs.total, 1);

        hook.update_job("j1", &UpdateJobRequest::default()).await.unwrap();
        assert_eq!(f.store.snapshot().jobs.data[0].status, JobStatus::Filled);

        hook.apply("j1", &ApplyRequest::default()).await.unwrap();
        let state = f.store.snapshot();
        assert_eq!(state.jobs.data[0].applicants, vec!["u7".to_string()]);
        assert_eq!(state.my_applications.data[0].id, "a1");

        hook.delete_job("j1").await.unwrap();
        assert!(f.store.snapshot().jobs.data.is_empty());
    }

    /// Holds `/jobs/slow` until released, then answers with `slow_status`
    struct GatedHttp {
        gate: Notify,
        slow_status: u16,
    }

    #[async_trait]
    impl HttpClient for GatedHttp {
        async fn execute(&self, request: HttpRequest) -> BridgeResult<HttpResponse> {
            if request.url.ends_with("/jobs/slow") {
                self.gate.notified().await;
                let body = if self.slow_status == 200 {
                    envelope(job_json("slow", "Stale"))
                } else {
                    String::new()
                };
                return Ok(HttpResponse::new(self.slow_status, body));
            }
            Ok(HttpResponse::new(200, envelope(job_json("fast", "Fresh"))))
        }
    }

    fn gated_hook(slow_status: u16) -> (Arc<GatedHttp>, JobsHook, Store) {
        let http = Arc::new(GatedHttp {
            gate: Notify::new(),
            slow_status,
        });
        let storage = Arc::new(MemoryLocalStorage::new());
        let bus = EventBus::new(16);
        let client = ApiClient::new(
            http.clone(),
            SessionContext::new(storage, bus.clone()),
            BASE_URL,
        );
        let store = Store::new(bus);
        let hook = JobsHook::new(client, store.clone());
        (http, hook, store)
    }

    #[tokio::test]
    async fn test_superseded_fetch_does_not_overwrite_store() {
        let (http, hook, store) = gated_hook(200);

        let slow = tokio::spawn({
            let hook = hook.clone();
            async move { hook.fetch_job("slow").await }
        });
        while !hook.is_loading() {
            tokio::task::yield_now().await;
        }

        let fresh = hook.fetch_job("fast").await.unwrap();
        assert_eq!(fresh.title, "Fresh");
        assert!(hook.is_loading());

        http.gate.notify_one();
        let stale = slow.await.unwrap().unwrap();

        assert_eq!(stale.title, "Stale");
        assert_eq!(store.snapshot().current_job.unwrap().id, "fast");
        assert!(!hook.is_loading());
    }

    #[tokio::test]
    async fn test_superseded_failure_still_sets_error() {
        let (http, hook, store) = gated_hook(500);

        let slow = tokio::spawn({
            let hook = hook.clone();
            async move { hook.fetch_job("slow").await }
        });
        while !hook.is_loading() {
            tokio::task::yield_now().await;
        }

        hook.fetch_job("fast").await.unwrap();
        assert!(hook.error().is_none());

        http.gate.notify_one();
        assert!(slow.await.unwrap().is_err());

        assert!(!hook.is_loading());
        assert_eq!(
            hook.error().as_deref(),
            Some("Request failed with status code 500")
        );
        assert_eq!(store.snapshot().current_job.unwrap().id, "fast");
    }
}
