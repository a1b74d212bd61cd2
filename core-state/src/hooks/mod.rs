//! View-state hooks
//!
//! One hook per domain. A hook composes a resource API with the shared
//! [`Store`], exposes imperative actions and its own loading/error state
//! layered over the store's.

mod auth;
mod jobs;
mod mentorship;
mod plugins;
mod skill_exchange;

pub use auth::AuthHook;
pub use jobs::JobsHook;
pub use mentorship::MentorshipHook;
pub use plugins::PluginsHook;
pub use skill_exchange::SkillExchangeHook;

use crate::store::Store;
use crate::tracker::ActionTracker;

/// Loading and error flags the UI binds to
///
/// Both flags combine the hook's own state with the store's.
pub trait ViewState {
    fn tracker(&self) -> &ActionTracker;

    fn store(&self) -> &Store;

    fn is_loading(&self) -> bool {
        self.tracker().is_loading() || self.store().is_loading()
    }

    fn error(&self) -> Option<String> {
        self.tracker().error().or_else(|| self.store().error())
    }

    fn clear_error(&self) {
        self.tracker().clear_error();
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use async_trait::async_trait;
    use bridge_desktop::MemoryLocalStorage;
    use bridge_traits::error::Result as BridgeResult;
    use bridge_traits::{HttpClient, HttpMethod, HttpRequest, HttpResponse};
    use core_api::ApiClient;
    use core_auth::SessionContext;
    use core_runtime::events::EventBus;
    use mockall::mock;
    use std::sync::Arc;

    use crate::store::Store;

    mock! {
        pub HttpClient {}

        #[async_trait]
        impl HttpClient for HttpClient {
            async fn execute(&self, request: HttpRequest) -> BridgeResult<HttpResponse>;
        }
    }

    pub const BASE_URL: &str = "https://api.test/api/v1";

    pub struct Fixture {
        pub client: ApiClient,
        pub store: Store,
        pub storage: Arc<MemoryLocalStorage>,
        pub bus: EventBus,
    }

    pub fn fixture(http: MockHttpClient) -> Fixture {
        let storage = Arc::new(MemoryLocalStorage::new());
        let bus = EventBus::new(64);
        let session = SessionContext::new(storage.clone(), bus.clone());
        Fixture {
            client: ApiClient::new(Arc::new(http), session, BASE_URL),
            store: Store::new(bus.clone()),
            storage,
            bus,
        }
    }

    pub fn expect_call(
        http: &mut MockHttpClient,
        method: HttpMethod,
        path: &'static str,
        status: u16,
        body: String,
    ) {
        let url = format!("{}/{}", BASE_URL, path);
        http.expect_execute()
            .withf(move |req| req.method == method && req.url == url)
            .times(1)
            .returning(move |_| Ok(HttpResponse::new(status, body.clone())));
    }

    pub fn envelope(data: serde_json::Value) -> String {
        serde_json::json!({ "data": data, "success": true }).to_string()
    }

    pub fn page(items: Vec<serde_json::Value>) -> String {
        let total = items.len();
        serde_json::json!({
            "data": items,
            "total": total,
            "page": 1,
            "limit": 10,
            "totalPages": if total == 0 { 0 } else { 1 }
        })
        .to_string()
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

    pub fn job_json(id: &str, title: &str) -> serde_json::Value {
        serde_json::json!({
            "id": id,
            "title": title,
            "company": "Acme",
            "description": "Build things",
            "location": "Remote",
            "type": "full-time",
            "postedBy": "u1",
            "status": "Open",
            "createdAt": "2024-03-01T09:00:00Z"
        })
    }
}
