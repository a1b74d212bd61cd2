use super::segment;
use crate::client::ApiClient;
use crate::envelope::{Acknowledgement, ApiResponse, Paginated, PaginationParams};
use crate::error::Result;
use crate::models::{
    CreateSkillExchangeRequest, RequestStatus, RespondToExchangeRequest, SkillExchange,
    SkillExchangeFilters, SkillExchangeResponse, UpdateSkillExchangeRequest,
};
use serde::Serialize;
use tracing::{debug, instrument};

#[derive(Serialize)]
struct StatusUpdate {
    status: RequestStatus,
}

/// `/skill-exchanges` offers and their responses
#[derive(Debug, Clone)]
pub struct SkillExchangeApi {
    client: ApiClient,
}

impl SkillExchangeApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    fn exchange_path(exchange_id: &str) -> String {
        format!("skill-exchanges/{}", segment(exchange_id))
    }

    #[instrument(skip(self, filters))]
    pub async fn list(&self, filters: &SkillExchangeFilters) -> Result<Paginated<SkillExchange>> {
        let page: Paginated<SkillExchange> = self
            .client
            .get_with_query("skill-exchanges", filters)
            .await?;
        debug!(count = page.data.len(), total = page.total, "Fetched skill exchanges");
        Ok(page)
    }

    #[instrument(skip(self))]
    pub async fn get(&self, exchange_id: &str) -> Result<SkillExchange> {
        let response: ApiResponse<SkillExchange> =
            self.client.get(&Self::exchange_path(exchange_id)).await?;
        Ok(response.data)
    }

    #[instrument(skip(self, exchange), fields(title = %exchange.title))]
    pub async fn create(&self, exchange: &CreateSkillExchangeRequest) -> Result<SkillExchange> {
        let response: ApiResponse<SkillExchange> =
            self.client.post("skill-exchanges", exchange).await?;
        Ok(response.data)
    }

    #[instrument(skip(self, update))]
    pub async fn update(
        &self,
        exchange_id: &str,
        update: &UpdateSkillExchangeRequest,
    ) -> Result<SkillExchange> {
        let response: ApiResponse<SkillExchange> = self
            .client
            .put(&Self::exchange_path(exchange_id), update)
            .await?;
        Ok(response.data)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, exchange_id: &str) -> Result<()> {
        self.client
            .delete::<Acknowledgement>(&Self::exchange_path(exchange_id))
            .await?;
        Ok(())
    }

    #[instrument(skip(self, response))]
    pub async fn respond(
        &self,
        exchange_id: &str,
        response: &RespondToExchangeRequest,
    ) -> Result<SkillExchangeResponse> {
        let envelope: ApiResponse<SkillExchangeResponse> = self
            .client
            .post(
                &format!("{}/responses", Self::exchange_path(exchange_id)),
                response,
            )
            .await?;
        Ok(envelope.data)
    }

    #[instrument(skip(self, pagination))]
    pub async fn responses(
        &self,
        exchange_id: &str,
        pagination: &PaginationParams,
    ) -> Result<Paginated<SkillExchangeResponse>> {
        self.client
            .get_with_query(
                &format!("{}/responses", Self::exchange_path(exchange_id)),
                pagination,
            )
            .await
    }

    #[instrument(skip(self), fields(status = status.as_str()))]
    pub async fn update_response_status(
        &self,
        exchange_id: &str,
        response_id: &str,
        status: RequestStatus,
    ) -> Result<SkillExchangeResponse> {
        let envelope: ApiResponse<SkillExchangeResponse> = self
            .client
            .put(
                &format!(
                    "{}/responses/{}",
                    Self::exchange_path(exchange_id),
                    segment(response_id)
                ),
                &StatusUpdate { status },
            )
            .await?;
        Ok(envelope.data)
    }

    /// Exchanges posted by the current user
    #[instrument(skip(self, pagination))]
    pub async fn mine(&self, pagination: &PaginationParams) -> Result<Paginated<SkillExchange>> {
        self.client
            .get_with_query("user/skill-exchanges", pagination)
            .await
    }
}
