//! End-to-end session behaviour across resource modules

use async_trait::async_trait;
use bridge_desktop::MemoryLocalStorage;
use bridge_traits::error::{BridgeError, Result as BridgeResult};
use bridge_traits::{HttpClient, HttpMethod, HttpRequest, HttpResponse, LocalStorage};
use core_api::{parse_api_error, ApiClient, AuthApi, JobsApi, LoginRequest, PaginationParams};
use core_auth::SessionContext;
use core_runtime::events::{CoreEvent, EventBus, SessionEvent};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Replays canned responses in order and records what was sent
#[derive(Default)]
struct ScriptedHttp {
    responses: Mutex<VecDeque<BridgeResult<HttpResponse>>>,
    sent: Mutex<Vec<HttpRequest>>,
}

impl ScriptedHttp {
    fn push(&self, status: u16, body: &str) {
        self.responses
            .lock()
            .unwrap()
            .push_back(Ok(HttpResponse::new(status, body.to_string())));
    }

    fn push_network_failure(&self) {
        self.responses
            .lock()
            .unwrap()
            .push_back(Err(BridgeError::Network("connection refused".to_string())));
    }

    fn sent(&self) -> Vec<HttpRequest> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl HttpClient for ScriptedHttp {
    async fn execute(&self, request: HttpRequest) -> BridgeResult<HttpResponse> {
        self.sent.lock().unwrap().push(request);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(BridgeError::OperationFailed("no scripted response".into())))
    }
}

struct Harness {
    http: Arc<ScriptedHttp>,
    storage: Arc<MemoryLocalStorage>,
    bus: EventBus,
    client: ApiClient,
}

fn harness() -> Harness {
    let http = Arc::new(ScriptedHttp::default());
    let storage = Arc::new(MemoryLocalStorage::new());
    let bus = EventBus::new(32);
    let session = SessionContext::new(storage.clone(), bus.clone());
    let client = ApiClient::new(http.clone(), session, "https://campus.example/api/v1/");
    Harness {
        http,
        storage,
        bus,
        client,
    }
}

const LOGIN_OK: &str = r#"{"data":{"user":{"id":"u1","email":"ada@uni.edu","firstName":"Ada","lastName":"L","role":"student"},"token":"tok-123"},"success":true}"#;
const EMPTY_PAGE: &str = r#"{"data":[],"total":0,"page":1,"limit":10,"totalPages":0}"#;

#[tokio::test]
async fn login_then_requests_carry_bearer_token() {
    let h = harness();
    h.http.push(200, LOGIN_OK);
    h.http.push(200, EMPTY_PAGE);

    let auth = AuthApi::new(h.client.clone());
    auth.login(&LoginRequest {
        email: "ada@uni.edu".to_string(),
        password: "pw".to_string(),
    })
    .await
    .unwrap();

    JobsApi::new(h.client.clone())
        .my_applications(&PaginationParams::default())
        .await
        .unwrap();

    let sent = h.http.sent();
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0].header_value("Authorization"), None);
    assert_eq!(
        sent[1].header_value("authorization"),
        Some("Bearer tok-123")
    );
    assert_eq!(
        sent[1].url,
        "https://campus.example/api/v1/user/applications"
    );
    assert_ne!(
        sent[0].header_value("X-Request-Id"),
        sent[1].header_value("X-Request-Id")
    );
}

#[tokio::test]
async fn unauthorized_response_clears_session_for_every_caller() {
    let h = harness();
    let mut events = h.bus.subscribe();
    h.storage.set_item("edumesh_token", "stale").await.unwrap();
    h.http.push(401, r#"{"message":"Token expired"}"#);
    h.http.push(200, EMPTY_PAGE);

    let jobs = JobsApi::new(h.client.clone());
    let err = jobs.my_applications(&PaginationParams::default()).await.unwrap_err();
    assert!(err.is_unauthorized());
    assert_eq!(parse_api_error(&err).message, "Token expired");

    assert_eq!(h.storage.get_item("edumesh_token").await.unwrap(), None);
    assert_eq!(
        events.recv().await.unwrap(),
        CoreEvent::Session(SessionEvent::TokenCleared)
    );
    assert_eq!(
        events.recv().await.unwrap(),
        CoreEvent::Session(SessionEvent::Unauthorized {
            login_route: "/login".to_string()
        })
    );

    // The next call goes out without credentials
    jobs.my_applications(&PaginationParams::default()).await.unwrap();
    assert_eq!(h.http.sent()[1].header_value("Authorization"), None);
}

#[tokio::test]
async fn logout_clears_token_when_backend_unreachable() {
    let h = harness();
    h.storage.set_item("edumesh_token", "tok").await.unwrap();
    h.http.push_network_failure();

    let err = AuthApi::new(h.client.clone()).logout().await.unwrap_err();

    assert!(err.is_network());
    assert_eq!(parse_api_error(&err).code, "NETWORK_ERROR");
    assert_eq!(h.storage.get_item("edumesh_token").await.unwrap(), None);
    assert_eq!(h.http.sent()[0].method, HttpMethod::Post);
}
