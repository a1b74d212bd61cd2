use super::ViewState;
use crate::store::{prepend, remove_by_id, replace_by_id, Slice, Store};
use crate::tracker::ActionTracker;
use core_api::{
    ApiClient, CreateSkillExchangeRequest, Paginated, PaginationParams, RequestStatus,
    RespondToExchangeRequest, Result, SkillExchange, SkillExchangeApi, SkillExchangeFilters,
    SkillExchangeResponse, UpdateSkillExchangeRequest,
};

/// Skill exchange offers and responses
#[derive(Debug, Clone)]
pub struct SkillExchangeHook {
    api: SkillExchangeApi,
    store: Store,
    tracker: ActionTracker,
}

impl SkillExchangeHook {
    pub fn new(client: ApiClient, store: Store) -> Self {
        Self {
            api: SkillExchangeApi::new(client),
            store,
            tracker: ActionTracker::new(),
        }
    }

    pub async fn fetch_exchanges(
        &self,
        filters: &SkillExchangeFilters,
    ) -> Result<Paginated<SkillExchange>> {
        let action = self.tracker.begin("fetch_exchanges");
        let page = action.settle(
            self.api.list(filters).await,
            "Failed to fetch skill exchanges",
        )?;
        action.commit(|| {
            self.store
                .update(Slice::SkillExchanges, |s| s.skill_exchanges = page.clone())
        });
        Ok(page)
    }

    pub async fn fetch_exchange(&self, exchange_id: &str) -> Result<SkillExchange> {
        let action = self.tracker.begin("fetch_exchange");
        let exchange = action.settle(
            self.api.get(exchange_id).await,
            "Failed to fetch skill exchange",
        )?;
        action.commit(|| {
            self.store.update(Slice::CurrentExchange, |s| {
                s.current_exchange = Some(exchange.clone())
            })
        });
        Ok(exchange)
    }

    pub async fn create_exchange(
        &self,
        request: &CreateSkillExchangeRequest,
    ) -> Result<SkillExchange> {
        let action = self.tracker.begin_unfenced();
        let exchange = action.settle(
            self.api.create(request).await,
            "Failed to create skill exchange",
        )?;
        self.store.update(Slice::SkillExchanges, |s| {
            prepend(&mut s.skill_exchanges, exchange.clone());
            prepend(&mut s.my_exchanges, exchange.clone());
        });
        Ok(exchange)
    }

    pub async fn update_exchange(
        &self,
        exchange_id: &str,
        update: &UpdateSkillExchangeRequest,
    ) -> Result<SkillExchange> {
        let action = self.tracker.begin(format!("update_exchange:{}", exchange_id));
        let exchange = action.settle(
            self.api.update(exchange_id, update).await,
            "Failed to update skill exchange",
        )?;
        action.commit(|| {
            self.store.update(Slice::SkillExchanges, |s| {
                replace_by_id(&mut s.skill_exchanges.data, &exchange, |e| &e.id);
                replace_by_id(&mut s.my_exchanges.data, &exchange, |e| &e.id);
                if s.current_exchange.as_ref().is_some_and(|e| e.id == exchange.id) {
                    s.current_exchange = Some(exchange.clone());
                }
            })
        });
        Ok(exchange)
    }

    pub async fn delete_exchange(&self, exchange_id: &str) -> Result<()> {
        let action = self.tracker.begin(format!("delete_exchange:{}", exchange_id));
        action.settle(
            self.api.delete(exchange_id).await,
            "Failed to delete skill exchange",
        )?;
        action.commit(|| {
            self.store.update(Slice::SkillExchanges, |s| {
                remove_by_id(&mut s.skill_exchanges, exchange_id, |e| &e.id);
                remove_by_id(&mut s.my_exchanges, exchange_id, |e| &e.id);
                if s.current_exchange.as_ref().is_some_and(|e| e.id == exchange_id) {
                    s.current_exchange = None;
                }
            })
        });
        Ok(())
    }

    pub async fn respond(&self, exchange_id: &str, message: &str) -> Result<SkillExchangeResponse> {
        let action = self.tracker.begin_unfenced();
        let request = RespondToExchangeRequest {
            message: message.to_string(),
        };
        let response = action.settle(
            self.api.respond(exchange_id, &request).await,
            "Failed to respond to skill exchange",
        )?;
        self.store.update(Slice::ExchangeResponses, |s| {
            if s.responses_exchange_id.as_deref() == Some(exchange_id) {
                prepend(&mut s.exchange_responses, response.clone());
            }
            if let Some(exchange) = s.current_exchange.as_mut().filter(|e| e.id == exchange_id) {
                exchange.responses.push(response.clone());
            }
        });
        Ok(response)
    }

    pub async fn fetch_responses(
        &self,
        exchange_id: &str,
        pagination: &PaginationParams,
    ) -> Result<Paginated<SkillExchangeResponse>> {
        let action = self.tracker.begin("fetch_responses");
        let page = action.settle(
            self.api.responses(exchange_id, pagination).await,
            "Failed to fetch responses",
        )?;
        action.commit(|| {
            self.store.update(Slice::ExchangeResponses, |s| {
                s.exchange_responses = page.clone();
                s.responses_exchange_id = Some(exchange_id.to_string());
            })
        });
        Ok(page)
    }

    /// Accept or reject a response to one of the caller's exchanges
    pub async fn update_response_status(
        &self,
        exchange_id: &str,
        response_id: &str,
        status: RequestStatus,
    ) -> Result<SkillExchangeResponse> {
        let action = self
            .tracker
            .begin(format!("update_response_status:{}", response_id));
        let updated = action.settle(
            self.api
                .update_response_status(exchange_id, response_id, status)
                .await,
            "Failed to update response status",
        )?;
        action.commit(|| {
            let previous = self.store.read(|s| {
                s.exchange_responses
                    .data
                    .iter()
                    .chain(s.current_exchange.iter().flat_map(|e| e.responses.iter()))
                    .find(|r| r.id == updated.id)
                    .map(|r| r.status)
            });
            self.store.check_transition(
                "SkillExchangeResponse",
                &updated.id,
                previous,
                updated.status,
            );
            self.store.update(Slice::ExchangeResponses, |s| {
                replace_by_id(&mut s.exchange_responses.data, &updated, |r| &r.id);
                if let Some(exchange) = s.current_exchange.as_mut() {
                    replace_by_id(&mut exchange.responses, &updated, |r| &r.id);
                }
            });
        });
        Ok(updated)
    }

    pub async fn fetch_my_exchanges(
        &self,
        pagination: &PaginationParams,
    ) -> Result<Paginated<SkillExchange>> {
        let action = self.tracker.begin("fetch_my_exchanges");
        let page = action.settle(
            self.api.mine(pagination).await,
            "Failed to fetch your skill exchanges",
        )?;
        action.commit(|| {
            self.store
                .update(Slice::MyExchanges, |s| s.my_exchanges = page.clone())
        });
        Ok(page)
    }
}

impl ViewState for SkillExchangeHook {
    fn tracker(&self) -> &ActionTracker {
        &self.tracker
    }

    fn store(&self) -> &Store {
        &self.store
    }
}
