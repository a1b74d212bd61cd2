//! Resource API modules
//!
//! One module per backend resource. Each method maps one endpoint to one
//! typed request/response pair, unwraps the envelope and returns failures
//! unchanged. Nothing is validated client-side.

mod auth;
mod jobs;
mod mentorship;
mod plugins;
mod skill_exchange;
mod users;

pub use auth::AuthApi;
pub use jobs::JobsApi;
pub use mentorship::MentorshipApi;
pub use plugins::PluginsApi;
pub use skill_exchange::SkillExchangeApi;
pub use users::UsersApi;

use std::borrow::Cow;

/// Percent-encode an id for use as a path segment
pub(crate) fn segment(id: &str) -> Cow<'_, str> {
    urlencoding::encode(id)
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::client::ApiClient;
    use async_trait::async_trait;
    use bridge_desktop::MemoryLocalStorage;
    use bridge_traits::error::Result as BridgeResult;
    use bridge_traits::{HttpClient, HttpMethod, HttpRequest, HttpResponse};
    use core_auth::SessionContext;
    use core_runtime::events::EventBus;
    use mockall::mock;
    use std::sync::Arc;

    mock! {
        pub HttpClient {}

        #[async_trait]
        impl HttpClient for HttpClient {
            async fn execute(&self, request: HttpRequest) -> BridgeResult<HttpResponse>;
        }
    }

    pub const BASE_URL: &str = "https://api.test/api/v1";

    pub fn api_client(http: MockHttpClient) -> (ApiClient, Arc<MemoryLocalStorage>) {
        let storage = Arc::new(MemoryLocalStorage::new());
        let session = SessionContext::new(storage.clone(), EventBus::new(16));
        (ApiClient::new(Arc::new(http), session, BASE_URL), storage)
    }

    /// Expect exactly one call to `method path` and answer with `status`/`body`
    pub fn expect_call(
        http: &mut MockHttpClient,
        method: HttpMethod,
        path: &'static str,
        status: u16,
        body: impl Into<String>,
    ) {
        let url = format!("{}/{}", BASE_URL, path);
        let body = body.into();
        http.expect_execute()
            .withf(move |req| req.method == method && req.url == url)
            .times(1)
            .returning(move |_| Ok(HttpResponse::new(status, body.clone())));
    }

    pub fn user_json(id: &str) -> serde_json::Value {
        serde_json::json!({
            "id": id,
            "email": format!("{}@uni.edu", id),
            "firstName": "Test",
            "lastName": "User",
            "role": "student"
        })
    }
}
