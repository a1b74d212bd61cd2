use super::{action, FeatureModule, Id, PageOf, WithId, MENTORSHIP};
use core_api::{
    BecomeMentorRequest, Mentor, MentorFilters, MentorshipRequest, Paginated, PaginationParams,
    RequestStatus, Review, ReviewRequest, SendMentorshipRequest, UpdateMentorRequest,
};
use core_mfe::{to_value, CapabilityMap};
use core_state::{MentorshipHook, Store};
use serde::{Deserialize, Serialize};

#[derive(Deserialize)]
struct Respond {
    id: String,
    status: RequestStatus,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct MentorshipView<'a> {
    mentors: &'a Paginated<Mentor>,
    current_mentor: &'a Option<Mentor>,
    received_requests: &'a Paginated<MentorshipRequest>,
    sent_requests: &'a Paginated<MentorshipRequest>,
    reviews: &'a Paginated<Review>,
    reviews_mentor_id: &'a Option<String>,
}

/// Mentorship matching module
pub fn mentorship_module(hook: MentorshipHook, store: Store) -> FeatureModule {
    let capabilities = CapabilityMap::new()
        .with(
            "fetch_mentors",
            action(&hook, |hook: MentorshipHook, filters: MentorFilters| async move {
                hook.fetch_mentors(&filters).await
            }),
        )
        .with(
            "fetch_mentor",
            action(&hook, |hook: MentorshipHook, args: Id| async move {
                hook.fetch_mentor(&args.id).await
            }),
        )
        .with(
            "become_mentor",
            action(
                &hook,
                |hook: MentorshipHook, profile: BecomeMentorRequest| async move {
                    hook.become_mentor(&profile).await
                },
            ),
        )
        .with(
            "update_mentor_profile",
            action(
                &hook,
                |hook: MentorshipHook, args: WithId<UpdateMentorRequest>| async move {
                    hook.update_mentor_profile(&args.id, &args.body).await
                },
            ),
        )
        .with(
            "request_mentorship",
            action(
                &hook,
                |hook: MentorshipHook, args: WithId<SendMentorshipRequest>| async move {
                    hook.request_mentorship(&args.id, &args.body.message).await
                },
            ),
        )
        .with(
            "fetch_received_requests",
            action(&hook, |hook: MentorshipHook, page: PaginationParams| async move {
                hook.fetch_received_requests(&page).await
            }),
        )
        .with(
            "fetch_sent_requests",
            action(&hook, |hook: MentorshipHook, page: PaginationParams| async move {
                hook.fetch_sent_requests(&page).await
            }),
        )
        .with(
            "respond_to_request",
            action(&hook, |hook: MentorshipHook, args: Respond| async move {
                hook.respond_to_request(&args.id, args.status).await
            }),
        )
        .with(
            "add_review",
            action(
                &hook,
                |hook: MentorshipHook, args: WithId<ReviewRequest>| async move {
                    hook.add_review(&args.id, &args.body).await
                },
            ),
        )
        .with(
            "fetch_reviews",
            action(&hook, |hook: MentorshipHook, args: PageOf| async move {
                hook.fetch_reviews(&args.id, &args.pagination()).await
            }),
        )
        .with("state", move |_| {
            let view = store.read(|s| {
                to_value(&MentorshipView {
                    mentors: &s.mentors,
                    current_mentor: &s.current_mentor,
                    received_requests: &s.received_requests,
                    sent_requests: &s.sent_requests,
                    reviews: &s.reviews,
                    reviews_mentor_id: &s.reviews_mentor_id,
                })
            });
            async move { view }
        });

    FeatureModule::new(MENTORSHIP, capabilities)
}
