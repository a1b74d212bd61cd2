use super::segment;
use crate::client::ApiClient;
use crate::envelope::{Acknowledgement, ApiResponse, Paginated, PaginationParams};
use crate::error::Result;
use crate::models::{MarketplacePlugin, Plugin, RegisterPluginRequest};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{info, instrument};

#[derive(Serialize)]
struct SettingsUpdate<'a> {
    settings: &'a Map<String, Value>,
}

/// `/plugins` installed set and marketplace
///
/// Lifecycle: install, then enable/disable any number of times, then
/// uninstall.
#[derive(Debug, Clone)]
pub struct PluginsApi {
    client: ApiClient,
}

impl PluginsApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    #[instrument(skip(self, pagination))]
    pub async fn list(&self, pagination: &PaginationParams) -> Result<Paginated<Plugin>> {
        self.client.get_with_query("plugins", pagination).await
    }

    /// Publish a new plugin
    #[instrument(skip(self, plugin), fields(name = %plugin.name))]
    pub async fn register(&self, plugin: &RegisterPluginRequest) -> Result<Plugin> {
        let response: ApiResponse<Plugin> = self.client.post("plugins", plugin).await?;
        Ok(response.data)
    }

    #[instrument(skip(self, pagination))]
    pub async fn marketplace(
        &self,
        pagination: &PaginationParams,
    ) -> Result<Paginated<MarketplacePlugin>> {
        self.client
            .get_with_query("plugins/marketplace", pagination)
            .await
    }

    #[instrument(skip(self))]
    pub async fn install(&self, plugin_id: &str) -> Result<Plugin> {
        let response: ApiResponse<Plugin> = self
            .client
            .post_empty(&format!("plugins/marketplace/{}/install", segment(plugin_id)))
            .await?;
        info!(plugin = %response.data.name, "Plugin installed");
        Ok(response.data)
    }

    #[instrument(skip(self))]
    pub async fn enable(&self, plugin_id: &str) -> Result<Plugin> {
        self.toggle(plugin_id, "enable").await
    }

    #[instrument(skip(self))]
    pub async fn disable(&self, plugin_id: &str) -> Result<Plugin> {
        self.toggle(plugin_id, "disable").await
    }

    async fn toggle(&self, plugin_id: &str, action: &str) -> Result<Plugin> {
        let response: ApiResponse<Plugin> = self
            .client
            .put_empty(&format!("plugins/{}/{}", segment(plugin_id), action))
            .await?;
        Ok(response.data)
    }

    /// Replace the plugin's settings object
    #[instrument(skip(self, settings))]
    pub async fn update_settings(
        &self,
        plugin_id: &str,
        settings: &Map<String, Value>,
    ) -> Result<Plugin> {
        let response: ApiResponse<Plugin> = self
            .client
            .put(
                &format!("plugins/{}/settings", segment(plugin_id)),
                &SettingsUpdate { settings },
            )
            .await?;
        Ok(response.data)
    }

    #[instrument(skip(self))]
    pub async fn uninstall(&self, plugin_id: &str) -> Result<()> {
        self.client
            .delete::<Acknowledgement>(&format!("plugins/{}", segment(plugin_id)))
            .await?;
        info!("Plugin uninstalled");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::test_support::*;
    use bridge_traits::{HttpMethod, HttpResponse};

    fn plugin_envelope(enabled: bool) -> String {
        format!(
            r#"{{"data":{{"id":"p1","name":"Calendar Sync","description":"Sync","version":"1.0.0","author":"Ada","enabled":{},"settings":{{"interval":5}}}},"success":true}}"#,
            enabled
        )
    }

    #[tokio::test]
    async fn test_lifecycle_paths() {
        let mut http = MockHttpClient::new();
        expect_call(
            &mut http,
            HttpMethod::Post,
            "plugins/marketplace/p1/install",
            200,
            plugin_envelope(false),
        );
        expect_call(&mut http, HttpMethod::Put, "plugins/p1/enable", 200, plugin_envelope(true));
        expect_call(&mut http, HttpMethod::Put, "plugins/p1/disable", 200, plugin_envelope(false));
        expect_call(&mut http, HttpMethod::Delete, "plugins/p1", 200, r#"{"success":true}"#);

        let (client, _storage) = api_client(http);
        let api = PluginsApi::new(client);

        let installed = api.install("p1").await.unwrap();
        assert!(!installed.enabled);
        assert_eq!(installed.settings.get("interval"), Some(&serde_json::json!(5)));

        assert!(api.enable("p1").await.unwrap().enabled);
        assert!(!api.disable("p1").await.unwrap().enabled);
        api.uninstall("p1").await.unwrap();
    }

    #[tokio::test]
    async fn test_update_settings_wraps_object() {
        let mut http = MockHttpClient::new();
        http.expect_execute()
            .withf(|req| {
                let sent: serde_json::Value =
                    serde_json::from_slice(req.body.as_deref().unwrap_or_default())
                        .unwrap_or_default();
                req.url == "https://api.test/api/v1/plugins/p1/settings"
                    && sent == serde_json::json!({ "settings": { "interval": 10 } })
            })
            .times(1)
            .returning(|_| Ok(HttpResponse::new(200, plugin_envelope(true))));

        let (client, _storage) = api_client(http);
        let mut settings = Map::new();
        settings.insert("interval".to_string(), serde_json::json!(10));

        PluginsApi::new(client)
            .update_settings("p1", &settings)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_marketplace_and_list() {
        let mut http = MockHttpClient::new();
        expect_call(
            &mut http,
            HttpMethod::Get,
            "plugins/marketplace",
            200,
            r#"{"data":[{"id":"p2","name":"Polls","description":"Polls","version":"0.2.0","author":"Bo","downloads":120,"rating":4.1,"installed":false}],"total":1,"page":1,"limit":10,"totalPages":1}"#,
        );
        expect_call(
            &mut http,
            HttpMethod::Get,
            "plugins",
            200,
            r#"{"data":[],"total":0,"page":1,"limit":10,"totalPages":0}"#,
        );

        let (client, _storage) = api_client(http);
        let api = PluginsApi::new(client);

        let market = api.marketplace(&PaginationParams::default()).await.unwrap();
        assert_eq!(market.data[0].downloads, 120);

        let installed = api.list(&PaginationParams::default()).await.unwrap();
        assert!(installed.is_empty());
    }
}
