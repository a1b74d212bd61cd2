use super::ViewState;
use crate::store::{prepend, remove_by_id, replace_by_id, Slice, Store};
use crate::tracker::ActionTracker;
use core_api::{
    ApiClient, MarketplacePlugin, Paginated, PaginationParams, Plugin, PluginsApi,
    RegisterPluginRequest, Result,
};
use serde_json::{Map, Value};

/// Installed plugins and the marketplace
#[derive(Debug, Clone)]
pub struct PluginsHook {
    api: PluginsApi,
    store: Store,
    tracker: ActionTracker,
}

impl PluginsHook {
    pub fn new(client: ApiClient, store: Store) -> Self {
        Self {
            api: PluginsApi::new(client),
            store,
            tracker: ActionTracker::new(),
        }
    }

    pub async fn fetch_plugins(&self, pagination: &PaginationParams) -> Result<Paginated<Plugin>> {
        let action = self.tracker.begin("fetch_plugins");
        let page = action.settle(self.api.list(pagination).await, "Failed to fetch plugins")?;
        action.commit(|| self.store.update(Slice::Plugins, |s| s.plugins = page.clone()));
        Ok(page)
    }

    pub async fn fetch_marketplace(
        &self,
        pagination: &PaginationParams,
    ) -> Result<Paginated<MarketplacePlugin>> {
        let action = self.tracker.begin("fetch_marketplace");
        let page = action.settle(
            self.api.marketplace(pagination).await,
            "Failed to fetch marketplace",
        )?;
        action.commit(|| {
            self.store
                .update(Slice::Marketplace, |s| s.marketplace = page.clone())
        });
        Ok(page)
    }

    pub async fn register(&self, plugin: &RegisterPluginRequest) -> Result<Plugin> {
        let action = self.tracker.begin_unfenced();
        let registered = action.settle(
            self.api.register(plugin).await,
            "Failed to register plugin",
        )?;
        self.store
            .update(Slice::Plugins, |s| prepend(&mut s.plugins, registered.clone()));
        Ok(registered)
    }

    pub async fn install(&self, plugin_id: &str) -> Result<Plugin> {
        let action = self.tracker.begin(format!("lifecycle:{}", plugin_id));
        let installed = action.settle(
            self.api.install(plugin_id).await,
            "Failed to install plugin",
        )?;
        action.commit(|| {
            self.store.update(Slice::Plugins, |s| {
                if !replace_by_id(&mut s.plugins.data, &installed, |p| &p.id) {
                    prepend(&mut s.plugins, installed.clone());
                }
                mark_installed(&mut s.marketplace, plugin_id, true);
            })
        });
        Ok(installed)
    }

    pub async fn enable(&self, plugin_id: &str) -> Result<Plugin> {
        let action = self.tracker.begin(format!("lifecycle:{}", plugin_id));
        let plugin = action.settle(self.api.enable(plugin_id).await, "Failed to enable plugin")?;
        action.commit(|| self.store_plugin(&plugin));
        Ok(plugin)
    }

    pub async fn disable(&self, plugin_id: &str) -> Result<Plugin> {
        let action = self.tracker.begin(format!("lifecycle:{}", plugin_id));
        let plugin = action.settle(
            self.api.disable(plugin_id).await,
            "Failed to disable plugin",
        )?;
        action.commit(|| self.store_plugin(&plugin));
        Ok(plugin)
    }

    pub async fn update_settings(
        &self,
        plugin_id: &str,
        settings: &Map<String, Value>,
    ) -> Result<Plugin> {
        let action = self.tracker.begin(format!("settings:{}", plugin_id));
        let plugin = action.settle(
            self.api.update_settings(plugin_id, settings).await,
            "Failed to update plugin settings",
        )?;
        action.commit(|| self.store_plugin(&plugin));
        Ok(plugin)
    }

    pub async fn uninstall(&self, plugin_id: &str) -> Result<()> {
        let action = self.tracker.begin(format!("lifecycle:{}", plugin_id));
        action.settle(
            self.api.uninstall(plugin_id).await,
            "Failed to uninstall plugin",
        )?;
        action.commit(|| {
            self.store.update(Slice::Plugins, |s| {
                remove_by_id(&mut s.plugins, plugin_id, |p| &p.id);
                mark_installed(&mut s.marketplace, plugin_id, false);
            })
        });
        Ok(())
    }

    fn store_plugin(&self, plugin: &Plugin) {
        self.store.update(Slice::Plugins, |s| {
            replace_by_id(&mut s.plugins.data, plugin, |p| &p.id);
        });
    }
}

fn mark_installed(marketplace: &mut Paginated<MarketplacePlugin>, plugin_id: &str, installed: bool) {
    for entry in marketplace.data.iter_mut().filter(|p| p.id == plugin_id) {
        entry.installed = installed;
    }
}

impl ViewState for PluginsHook {
    fn tracker(&self) -> &ActionTracker {
        &self.tracker
    }

    fn store(&self) -> &Store {
        &self.store
    }
}
