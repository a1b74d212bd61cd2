//! HTTP client adapter
//!
//! One configured transport for every resource module: versioned base URL,
//! JSON default headers, bearer token injection from the session, and the
//! global 401 reaction. No retries, no backoff.

use crate::error::{ClientError, Result};
use crate::query::to_query_string;
use bridge_traits::{HttpClient, HttpMethod, HttpRequest, HttpResponse};
use bytes::Bytes;
use core_auth::SessionContext;
use core_runtime::config::CoreConfig;
use core_runtime::logging::strip_query;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, instrument, warn};
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "X-Request-Id";

/// Shared REST transport
///
/// Cloning shares the underlying HTTP client and session.
#[derive(Clone)]
pub struct ApiClient {
    http: Arc<dyn HttpClient>,
    session: SessionContext,
    base_url: String,
    default_headers: HashMap<String, String>,
    timeout: Option<Duration>,
}

impl ApiClient {
    /// Create a client for `base_url` (e.g. `https://host/api/v1`)
    pub fn new(
        http: Arc<dyn HttpClient>,
        session: SessionContext,
        base_url: impl Into<String>,
    ) -> Self {
        let mut default_headers = HashMap::new();
        default_headers.insert("Content-Type".to_string(), "application/json".to_string());
        default_headers.insert("Accept".to_string(), "application/json".to_string());

        Self {
            http,
            session,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            default_headers,
            timeout: None,
        }
    }

    pub fn from_config(config: &CoreConfig, session: SessionContext) -> Self {
        let client = Self::new(
            Arc::clone(&config.http_client),
            session,
            config.api_base_url.clone(),
        );
        match config.request_timeout {
            Some(timeout) => client.with_timeout(timeout),
            None => client,
        }
    }

    /// Add a header sent with every request
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.insert(key.into(), value.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for an API path
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.send(HttpMethod::Get, path, None, None).await
    }

    /// GET with a filter struct encoded as query string
    pub async fn get_with_query<T, Q>(&self, path: &str, query: &Q) -> Result<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let query = to_query_string(query)?;
        let query = (!query.is_empty()).then_some(query);
        self.send(HttpMethod::Get, path, query, None).await
    }

    pub async fn post<T, B>(&self, path: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let body = encode_body(body)?;
        self.send(HttpMethod::Post, path, None, Some(body)).await
    }

    /// POST without a request body
    pub async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.send(HttpMethod::Post, path, None, None).await
    }

    pub async fn put<T, B>(&self, path: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let body = encode_body(body)?;
        self.send(HttpMethod::Put, path, None, Some(body)).await
    }

    /// PUT without a request body
    pub async fn put_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.send(HttpMethod::Put, path, None, None).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.send(HttpMethod::Delete, path, None, None).await
    }

    #[instrument(skip(self, query, body), fields(method = %method, path = %path))]
    async fn send<T: DeserializeOwned>(
        &self,
        method: HttpMethod,
        path: &str,
        query: Option<String>,
        body: Option<Bytes>,
    ) -> Result<T> {
        let mut url = self.url(path);
        if let Some(query) = query {
            url.push('?');
            url.push_str(&query);
        }

        let request_id = Uuid::new_v4().to_string();
        let mut request = HttpRequest::new(method, url.clone());
        for (key, value) in &self.default_headers {
            request = request.header(key.clone(), value.clone());
        }
        request = request.header(REQUEST_ID_HEADER, request_id.clone());

        if let Some(token) = self.session.token().await? {
            request = request.bearer_token(token);
        }
        if let Some(body) = body {
            request = request.body(body);
        }
        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }

        debug!(request_id = %request_id, url = %strip_query(&url), "Sending API request");

        let response = self.http.execute(request).await.map_err(|e| {
            if e.is_network() {
                error!(
                    request_id = %request_id,
                    url = %strip_query(&url),
                    error = %e,
                    "No response from API"
                );
                ClientError::Network(e.to_string())
            } else {
                error!(request_id = %request_id, error = %e, "API request could not be sent");
                ClientError::Unknown(e.to_string())
            }
        })?;

        if !response.is_success() {
            return Err(self.handle_failure(&request_id, &url, response).await);
        }

        debug!(request_id = %request_id, status = response.status, "API request succeeded");
        decode_body(&response)
    }

    async fn handle_failure(
        &self,
        request_id: &str,
        url: &str,
        response: HttpResponse,
    ) -> ClientError {
        let status = response.status;
        let failure = ClientError::from_status(status, &response.body);
        let url = strip_query(url);

        match status {
            401 => {
                warn!(request_id = %request_id, url = %url, "API rejected session");
                if let Err(e) = self.session.handle_unauthorized().await {
                    warn!(error = %e, "Failed to clear session after 401");
                }
            }
            403 => {
                warn!(
                    request_id = %request_id,
                    url = %url,
                    server_message = ?failure.server_message(),
                    "API denied access"
                );
            }
            500..=599 => {
                error!(
                    request_id = %request_id,
                    url = %url,
                    status,
                    server_message = ?failure.server_message(),
                    "API server error"
                );
            }
            _ => {
                debug!(request_id = %request_id, url = %url, status, "API request failed");
            }
        }

        failure
    }
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

fn encode_body<B: Serialize + ?Sized>(body: &B) -> Result<Bytes> {
    serde_json::to_vec(body)
        .map(Bytes::from)
        .map_err(|e| ClientError::Unknown(format!("Failed to encode request body: {}", e)))
}

fn decode_body<T: DeserializeOwned>(response: &HttpResponse) -> Result<T> {
    // 204 and empty 200s decode as an empty object
    let body: &[u8] = if response.body.iter().all(u8::is_ascii_whitespace) {
        b"{}"
    } else {
        &response.body
    };

    serde_json::from_slice(body).map_err(|e| {
        warn!(status = response.status, error = %e, "Unexpected API response shape");
        ClientError::Decode(e.to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::envelope::{Acknowledgement, ApiResponse};
    use async_trait::async_trait;
    use bridge_desktop::MemoryLocalStorage;
    use bridge_traits::error::{BridgeError, Result as BridgeResult};
    use bridge_traits::LocalStorage;
    use core_runtime::events::{CoreEvent, EventBus, SessionEvent};
    use mockall::mock;

    mock! {
        HttpClient {}

        #[async_trait]
        impl HttpClient for HttpClient {
            async fn execute(&self, request: HttpRequest) -> BridgeResult<HttpResponse>;
        }
    }

    fn client_with(
        http: MockHttpClient,
    ) -> (ApiClient, Arc<MemoryLocalStorage>, EventBus) {
        let storage = Arc::new(MemoryLocalStorage::new());
        let bus = EventBus::new(16);
        let session = SessionContext::new(storage.clone(), bus.clone());
        let client = ApiClient::new(Arc::new(http), session, "https://api.test/api/v1/");
        (client, storage, bus)
    }

    #[tokio::test]
    async fn test_headers_and_bearer_injection() {
        let mut http = MockHttpClient::new();
        http.expect_execute()
            .withf(|req| {
                req.url == "https://api.test/api/v1/jobs/42"
                    && req.header_value("authorization") == Some("Bearer tok")
                    && req.header_value("accept") == Some("application/json")
                    && req.header_value("content-type") == Some("application/json")
                    && req
                        .header_value(REQUEST_ID_HEADER)
                        .map(|id| Uuid::parse_str(id).is_ok())
                        .unwrap_or(false)
            })
            .times(1)
            .returning(|_| Ok(HttpResponse::new(200, r#"{"data":"ok","success":true}"#)));

        let (client, storage, _bus) = client_with(http);
        storage.set_item("edumesh_token", "tok").await.unwrap();

        let response: ApiResponse<String> = client.get("/jobs/42").await.unwrap();
        assert_eq!(response.data, "ok");
    }

    #[tokio::test]
    async fn test_no_authorization_without_token() {
        let mut http = MockHttpClient::new();
        http.expect_execute()
            .withf(|req| req.header_value("authorization").is_none())
            .times(1)
            .returning(|_| Ok(HttpResponse::new(200, r#"{"success":true}"#)));

        let (client, _storage, _bus) = client_with(http);
        let _: Acknowledgement = client.post_empty("auth/logout").await.unwrap();
    }

    #[tokio::test]
    async fn test_query_is_appended() {
        let mut http = MockHttpClient::new();
        http.expect_execute()
            .withf(|req| {
                req.url.starts_with("https://api.test/api/v1/jobs?")
                    && req.url.contains("page=2")
                    && req.url.contains("limit=5")
            })
            .times(1)
            .returning(|_| Ok(HttpResponse::new(200, r#"{"success":true}"#)));

        let (client, _storage, _bus) = client_with(http);
        let params = crate::envelope::PaginationParams::new(2, 5);
        let _: Acknowledgement = client.get_with_query("jobs", &params).await.unwrap();
    }

    #[tokio::test]
    async fn test_unauthorized_clears_session_and_emits() {
        let mut http = MockHttpClient::new();
        http.expect_execute()
            .times(1)
            .returning(|_| Ok(HttpResponse::new(401, r#"{"message":"Token expired"}"#)));

        let (client, storage, bus) = client_with(http);
        storage.set_item("edumesh_token", "stale").await.unwrap();
        let mut events = bus.subscribe();

        let err = client
            .get::<ApiResponse<String>>("users/me")
            .await
            .unwrap_err();

        assert!(err.is_unauthorized());
        assert_eq!(err.server_message(), Some("Token expired"));
        assert_eq!(storage.get_item("edumesh_token").await.unwrap(), None);

        let mut saw_unauthorized = false;
        while let Ok(event) = events.try_recv() {
            if matches!(event, CoreEvent::Session(SessionEvent::Unauthorized { .. })) {
                saw_unauthorized = true;
            }
        }
        assert!(saw_unauthorized);
    }

    #[tokio::test]
    async fn test_forbidden_keeps_session() {
        let mut http = MockHttpClient::new();
        http.expect_execute()
            .times(1)
            .returning(|_| Ok(HttpResponse::new(403, r#"{"message":"Admins only"}"#)));

        let (client, storage, _bus) = client_with(http);
        storage.set_item("edumesh_token", "tok").await.unwrap();

        let err = client
            .delete::<Acknowledgement>("jobs/1")
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(403));
        assert!(storage.get_item("edumesh_token").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_network_failure_maps_to_network_error() {
        let mut http = MockHttpClient::new();
        http.expect_execute()
            .times(1)
            .returning(|_| Err(BridgeError::Network("connection refused".to_string())));

        let (client, _storage, _bus) = client_with(http);
        let err = client.get::<Acknowledgement>("jobs").await.unwrap_err();
        assert!(err.is_network());
    }

    #[tokio::test]
    async fn test_unexpected_shape_is_decode_error() {
        let mut http = MockHttpClient::new();
        http.expect_execute()
            .times(1)
            .returning(|_| Ok(HttpResponse::new(200, r#"{"items":[]}"#)));

        let (client, _storage, _bus) = client_with(http);
        let err = client
            .get::<ApiResponse<Vec<String>>>("jobs")
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Decode(_)));
    }

    #[tokio::test]
    async fn test_empty_body_decodes_as_acknowledgement() {
        let mut http = MockHttpClient::new();
        http.expect_execute()
            .times(1)
            .returning(|_| Ok(HttpResponse::new(204, "")));

        let (client, _storage, _bus) = client_with(http);
        let ack: Acknowledgement = client.delete("plugins/p1").await.unwrap();
        assert!(ack.success);
    }
}
