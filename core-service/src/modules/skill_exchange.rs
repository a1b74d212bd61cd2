use super::{action, FeatureModule, Id, PageOf, WithId, SKILL_EXCHANGE};
use core_api::{
    CreateSkillExchangeRequest, Paginated, PaginationParams, RequestStatus,
    RespondToExchangeRequest, SkillExchange, SkillExchangeFilters, SkillExchangeResponse,
    UpdateSkillExchangeRequest,
};
use core_mfe::{to_value, CapabilityMap};
use core_state::{SkillExchangeHook, Store};
use serde::{Deserialize, Serialize};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResponseStatus {
    exchange_id: String,
    response_id: String,
    status: RequestStatus,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SkillExchangeView<'a> {
    skill_exchanges: &'a Paginated<SkillExchange>,
    current_exchange: &'a Option<SkillExchange>,
    my_exchanges: &'a Paginated<SkillExchange>,
    exchange_responses: &'a Paginated<SkillExchangeResponse>,
    responses_exchange_id: &'a Option<String>,
}

/// Skill exchange module
pub fn skill_exchange_module(hook: SkillExchangeHook, store: Store) -> FeatureModule {
    let capabilities = CapabilityMap::new()
        .with(
            "fetch_exchanges",
            action(
                &hook,
                |hook: SkillExchangeHook, filters: SkillExchangeFilters| async move {
                    hook.fetch_exchanges(&filters).await
                },
            ),
        )
        .with(
            "fetch_exchange",
            action(&hook, |hook: SkillExchangeHook, args: Id| async move {
                hook.fetch_exchange(&args.id).await
            }),
        )
        .with(
            "create_exchange",
            action(
                &hook,
                |hook: SkillExchangeHook, request: CreateSkillExchangeRequest| async move {
                    hook.create_exchange(&request).await
                },
            ),
        )
        .with(
            "update_exchange",
            action(
                &hook,
                |hook: SkillExchangeHook, args: WithId<UpdateSkillExchangeRequest>| async move {
                    hook.update_exchange(&args.id, &args.body).await
                },
            ),
        )
        .with(
            "delete_exchange",
            action(&hook, |hook: SkillExchangeHook, args: Id| async move {
                hook.delete_exchange(&args.id).await
            }),
        )
        .with(
            "respond",
            action(
                &hook,
                |hook: SkillExchangeHook, args: WithId<RespondToExchangeRequest>| async move {
                    hook.respond(&args.id, &args.body.message).await
                },
            ),
        )
        .with(
            "fetch_responses",
            action(&hook, |hook: SkillExchangeHook, args: PageOf| async move {
                hook.fetch_responses(&args.id, &args.pagination()).await
            }),
        )
        .with(
            "update_response_status",
            action(
                &hook,
                |hook: SkillExchangeHook, args: ResponseStatus| async move {
                    hook.update_response_status(&args.exchange_id, &args.response_id, args.status)
                        .await
                },
            ),
        )
        .with(
            "fetch_my_exchanges",
            action(
                &hook,
                |hook: SkillExchangeHook, page: PaginationParams| async move {
                    hook.fetch_my_exchanges(&page).await
                },
            ),
        )
        .with("state", move |_| {
            let view = store.read(|s| {
                to_value(&SkillExchangeView {
                    skill_exchanges: &s.skill_exchanges,
                    current_exchange: &s.current_exchange,
                    my_exchanges: &s.my_exchanges,
                    exchange_responses: &s.exchange_responses,
                    responses_exchange_id: &s.responses_exchange_id,
                })
            });
            async move { view }
        });

    FeatureModule::new(SKILL_EXCHANGE, capabilities)
}
