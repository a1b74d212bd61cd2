use crate::client::ApiClient;
use crate::envelope::{Acknowledgement, ApiResponse};
use crate::error::Result;
use crate::models::{
    AuthPayload, ForgotPasswordRequest, LoginRequest, RegisterRequest, ResetPasswordRequest,
    VerifyEmailRequest,
};
use core_runtime::logging::redact_if_sensitive;
use tracing::{info, instrument, warn};

/// `/auth/*` endpoints
///
/// Login and register persist the returned token in the session. Logout
/// always clears the local session, even when the remote call fails.
#[derive(Debug, Clone)]
pub struct AuthApi {
    client: ApiClient,
}

impl AuthApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    #[instrument(skip(self, request), fields(email = %redact_if_sensitive("email", &request.email)))]
    pub async fn login(&self, request: &LoginRequest) -> Result<AuthPayload> {
        let response: ApiResponse<AuthPayload> = self.client.post("auth/login", request).await?;
        self.client.session().set_token(&response.data.token).await?;
        info!(user_id = %response.data.user.id, "Logged in");
        Ok(response.data)
    }

    #[instrument(skip(self, request), fields(email = %redact_if_sensitive("email", &request.email)))]
    pub async fn register(&self, request: &RegisterRequest) -> Result<AuthPayload> {
        let response: ApiResponse<AuthPayload> =
            self.client.post("auth/register", request).await?;
        self.client.session().set_token(&response.data.token).await?;
        info!(user_id = %response.data.user.id, "Registered");
        Ok(response.data)
    }

    /// Sign out remotely, then clear the local session regardless
    ///
    /// A remote failure is reported after the local session is cleared.
    #[instrument(skip(self))]
    pub async fn logout(&self) -> Result<()> {
        let remote = self
            .client
            .post_empty::<Acknowledgement>("auth/logout")
            .await;
        let local = self.client.session().clear().await;

        match (remote, local) {
            (Err(remote), Err(local)) => {
                warn!(error = %local, "Failed to clear local session after remote logout failure");
                Err(remote)
            }
            (Err(remote), Ok(())) => {
                warn!(error = %remote, "Remote logout failed, local session cleared");
                Err(remote)
            }
            (Ok(_), Err(local)) => Err(local.into()),
            (Ok(_), Ok(())) => {
                info!("Logged out");
                Ok(())
            }
        }
    }

    #[instrument(skip(self, token))]
    pub async fn verify_email(&self, token: &str) -> Result<()> {
        let request = VerifyEmailRequest {
            token: token.to_string(),
        };
        self.client
            .post::<Acknowledgement, _>("auth/verify-email", &request)
            .await?;
        Ok(())
    }

    #[instrument(skip(self, email))]
    pub async fn forgot_password(&self, email: &str) -> Result<()> {
        let request = ForgotPasswordRequest {
            email: email.to_string(),
        };
        self.client
            .post::<Acknowledgement, _>("auth/forgot-password", &request)
            .await?;
        Ok(())
    }

    #[instrument(skip(self, request))]
    pub async fn reset_password(&self, request: &ResetPasswordRequest) -> Result<()> {
        self.client
            .post::<Acknowledgement, _>("auth/reset-password", request)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::test_support::*;
    use bridge_traits::{HttpMethod, LocalStorage};

    fn login_request() -> LoginRequest {
        LoginRequest {
            email: "ada@uni.edu".to_string(),
            password: "secret".to_string(),
        }
    }

    #[tokio::test]
    async fn test_login_persists_token() {
        let mut http = MockHttpClient::new();
        let body = serde_json::json!({
            "data": { "user": user_json("u1"), "token": "tok-1" },
            "success": true
        })
        .to_string();
        expect_call(&mut http, HttpMethod::Post, "auth/login", 200, body);

        let (client, storage) = api_client(http);
        let payload = AuthApi::new(client).login(&login_request()).await.unwrap();

        assert_eq!(payload.user.id, "u1");
        assert_eq!(
            storage.get_item("edumesh_token").await.unwrap(),
            Some("tok-1".to_string())
        );
    }

    #[tokio::test]
    async fn test_failed_login_leaves_no_token() {
        let mut http = MockHttpClient::new();
        expect_call(
            &mut http,
            HttpMethod::Post,
            "auth/login",
            400,
            r#"{"message":"Invalid credentials"}"#,
        );

        let (client, storage) = api_client(http);
        let err = AuthApi::new(client)
            .login(&login_request())
            .await
            .unwrap_err();

        assert_eq!(err.server_message(), Some("Invalid credentials"));
        assert_eq!(storage.get_item("edumesh_token").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_logout_clears_token_when_remote_fails() {
        let mut http = MockHttpClient::new();
        expect_call(&mut http, HttpMethod::Post, "auth/logout", 500, "");

        let (client, storage) = api_client(http);
        storage.set_item("edumesh_token", "tok").await.unwrap();

        let err = AuthApi::new(client).logout().await.unwrap_err();

        assert_eq!(err.status(), Some(500));
        assert_eq!(storage.get_item("edumesh_token").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_logout_success() {
        let mut http = MockHttpClient::new();
        expect_call(
            &mut http,
            HttpMethod::Post,
            "auth/logout",
            200,
            r#"{"success":true,"message":"Logged out"}"#,
        );

        let (client, storage) = api_client(http);
        storage.set_item("edumesh_token", "tok").await.unwrap();

        AuthApi::new(client).logout().await.unwrap();
        assert_eq!(storage.get_item("edumesh_token").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_password_endpoints() {
        let mut http = MockHttpClient::new();
        expect_call(
            &mut http,
            HttpMethod::Post,
            "auth/forgot-password",
            200,
            r#"{"success":true}"#,
        );
        expect_call(
            &mut http,
            HttpMethod::Post,
            "auth/reset-password",
            200,
            r#"{"success":true}"#,
        );
        expect_call(
            &mut http,
            HttpMethod::Post,
            "auth/verify-email",
            200,
            r#"{"success":true}"#,
        );

        let (client, _storage) = api_client(http);
        let api = AuthApi::new(client);
        api.forgot_password("ada@uni.edu").await.unwrap();
        api.reset_password(&ResetPasswordRequest {
            token: "reset".to_string(),
            password: "new".to_string(),
        })
        .await
        .unwrap();
        api.verify_email("verify").await.unwrap();
    }
}
