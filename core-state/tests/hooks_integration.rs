//! Hooks sharing one store over a scripted backend

use async_trait::async_trait;
use bridge_desktop::MemoryLocalStorage;
use bridge_traits::error::{BridgeError, Result as BridgeResult};
use bridge_traits::{HttpClient, HttpRequest, HttpResponse, LocalStorage};
use core_api::{ApiClient, JobFilters, LoginRequest, MentorFilters};
use core_auth::SessionContext;
use core_runtime::events::EventBus;
use core_state::{AuthHook, JobsHook, MentorshipHook, Store, ViewState};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Routes by "METHOD url-path" to a canned status and body
#[derive(Default)]
struct RoutedHttp {
    routes: Mutex<HashMap<String, (u16, String)>>,
}

impl RoutedHttp {
    fn route(&self, key: &str, status: u16, body: serde_json::Value) {
        self.routes
            .lock()
            .unwrap()
            .insert(key.to_string(), (status, body.to_string()));
    }
}

#[async_trait]
impl HttpClient for RoutedHttp {
    async fn execute(&self, request: HttpRequest) -> BridgeResult<HttpResponse> {
        let path = request
            .url
            .trim_start_matches("https://api.test/api/v1/")
            .split('?')
            .next()
            .unwrap_or_default()
            .to_string();
        let key = format!("{} {}", request.method, path);
        match self.routes.lock().unwrap().get(&key) {
            Some((status, body)) => Ok(HttpResponse::new(*status, body.clone())),
            None => Err(BridgeError::Network(format!("no route for {}", key))),
        }
    }
}

fn setup() -> (Arc<RoutedHttp>, Arc<MemoryLocalStorage>, ApiClient, Store) {
    let http = Arc::new(RoutedHttp::default());
    let storage = Arc::new(MemoryLocalStorage::new());
    let bus = EventBus::new(64);
    let session = SessionContext::new(storage.clone(), bus.clone());
    let client = ApiClient::new(http.clone(), session, "https://api.test/api/v1");
    (http, storage, client, Store::new(bus))
}

#[tokio::test]
async fn every_failing_action_clears_loading_and_sets_error() {
    let (http, _storage, client, store) = setup();
    http.route("GET jobs", 500, serde_json::json!({}));
    http.route("GET mentors", 422, serde_json::json!({ "message": "Bad filter" }));

    let jobs = JobsHook::new(client.clone(), store.clone());
    let mentorship = MentorshipHook::new(client.clone(), store.clone());
    let auth = AuthHook::new(client, store);

    assert!(jobs.fetch_jobs(&JobFilters::default()).await.is_err());
    assert!(mentorship
        .fetch_mentors(&MentorFilters::default())
        .await
        .is_err());
    assert!(auth.verify_email("unrouted").await.is_err());

    for (loading, error) in [
        (jobs.is_loading(), jobs.error()),
        (mentorship.is_loading(), mentorship.error()),
        (auth.is_loading(), auth.error()),
    ] {
        assert!(!loading);
        assert!(error.is_some_and(|e| !e.is_empty()));
    }
    assert_eq!(mentorship.error().as_deref(), Some("Bad filter"));
}

#[tokio::test]
async fn login_then_logout_round_trip() {
    let (http, storage, client, store) = setup();
    http.route(
        "POST auth/login",
        200,
        serde_json::json!({
            "data": {
                "user": {
                    "id": "u1",
                    "email": "ada@uni.edu",
                    "firstName": "Ada",
                    "lastName": "Lovelace",
                    "role": "alumni"
                },
                "token": "tok-abc"
            },
            "success": true
        }),
    );

    let auth = AuthHook::new(client, store.clone());
    auth.login(&LoginRequest {
        email: "ada@uni.edu".to_string(),
        password: "pw".to_string(),
    })
    .await
    .unwrap();

    assert!(auth.is_authenticated());
    assert_eq!(
        storage.get_item("edumesh_token").await.unwrap().as_deref(),
        Some("tok-abc")
    );

    // auth/logout has no route, so the remote call fails
    assert!(auth.logout().await.is_err());
    assert_eq!(storage.get_item("edumesh_token").await.unwrap(), None);
    assert!(!store.is_authenticated());
    assert!(store.user().is_none());
}
