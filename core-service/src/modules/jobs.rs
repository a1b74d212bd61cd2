use super::{action, FeatureModule, Id, PageOf, WithId, JOBS};
use core_api::{
    ApplyRequest, CreateJobRequest, Job, JobApplication, JobFilters, Paginated,
    PaginationParams, UpdateJobRequest,
};
use core_mfe::{to_value, CapabilityMap};
use core_state::{JobsHook, Store};
use serde::Serialize;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JobsView<'a> {
    jobs: &'a Paginated<Job>,
    current_job: &'a Option<Job>,
    applications: &'a Paginated<JobApplication>,
    my_applications: &'a Paginated<JobApplication>,
}

/// Job board module
pub fn jobs_module(hook: JobsHook, store: Store) -> FeatureModule {
    let capabilities = CapabilityMap::new()
        .with(
            "fetch_jobs",
            action(&hook, |hook: JobsHook, filters: JobFilters| async move {
                hook.fetch_jobs(&filters).await
            }),
        )
        .with(
            "fetch_job",
            action(&hook, |hook: JobsHook, args: Id| async move {
                hook.fetch_job(&args.id).await
            }),
        )
        .with(
            "create_job",
            action(&hook, |hook: JobsHook, request: CreateJobRequest| async move {
                hook.create_job(&request).await
            }),
        )
        .with(
            "update_job",
            action(
                &hook,
                |hook: JobsHook, args: WithId<UpdateJobRequest>| async move {
                    hook.update_job(&args.id, &args.body).await
                },
            ),
        )
        .with(
            "delete_job",
            action(&hook, |hook: JobsHook, args: Id| async move {
                hook.delete_job(&args.id).await
            }),
        )
        .with(
            "apply",
            action(&hook, |hook: JobsHook, args: WithId<ApplyRequest>| async move {
                hook.apply(&args.id, &args.body).await
            }),
        )
        .with(
            "fetch_applications",
            action(&hook, |hook: JobsHook, args: PageOf| async move {
                hook.fetch_applications(&args.id, &args.pagination()).await
            }),
        )
        .with(
            "fetch_my_applications",
            action(&hook, |hook: JobsHook, page: PaginationParams| async move {
                hook.fetch_my_applications(&page).await
            }),
        )
        .with("state", move |_| {
            let view = store.read(|s| {
                to_value(&JobsView {
                    jobs: &s.jobs,
                    current_job: &s.current_job,
                    applications: &s.applications,
                    my_applications: &s.my_applications,
                })
            });
            async move { view }
        });

    FeatureModule::new(JOBS, capabilities)
}
