use super::segment;
use crate::client::ApiClient;
use crate::envelope::ApiResponse;
use crate::error::Result;
use crate::models::{UpdateProfileRequest, User};
use tracing::instrument;

/// `/users/:id` profile endpoints
#[derive(Debug, Clone)]
pub struct UsersApi {
    client: ApiClient,
}

impl UsersApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    #[instrument(skip(self))]
    pub async fn get_profile(&self, user_id: &str) -> Result<User> {
        let response: ApiResponse<User> = self
            .client
            .get(&format!("users/{}", segment(user_id)))
            .await?;
        Ok(response.data)
    }

    #[instrument(skip(self, update))]
    pub async fn update_profile(&self, user_id: &str, update: &UpdateProfileRequest) -> Result<User> {
        let response: ApiResponse<User> = self
            .client
            .put(&format!("users/{}", segment(user_id)), update)
            .await?;
        Ok(response.data)
    }
}
