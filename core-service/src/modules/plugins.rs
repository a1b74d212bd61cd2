use super::{action, FeatureModule, Id, WithId, PLUGINS};
use core_api::{MarketplacePlugin, Paginated, PaginationParams, Plugin, RegisterPluginRequest};
use core_mfe::{to_value, CapabilityMap};
use core_state::{PluginsHook, Store};
use serde::Serialize;
use serde_json::{Map, Value};

#[derive(Serialize)]
struct PluginsView<'a> {
    plugins: &'a Paginated<Plugin>,
    marketplace: &'a Paginated<MarketplacePlugin>,
}

/// Plugin management module
///
/// Plugin execution is out of reach here; only the backend's plugin
/// records are managed.
pub fn plugins_module(hook: PluginsHook, store: Store) -> FeatureModule {
    let capabilities = CapabilityMap::new()
        .with(
            "fetch_plugins",
            action(&hook, |hook: PluginsHook, page: PaginationParams| async move {
                hook.fetch_plugins(&page).await
            }),
        )
        .with(
            "fetch_marketplace",
            action(&hook, |hook: PluginsHook, page: PaginationParams| async move {
                hook.fetch_marketplace(&page).await
            }),
        )
        .with(
            "register",
            action(
                &hook,
                |hook: PluginsHook, plugin: RegisterPluginRequest| async move {
                    hook.register(&plugin).await
                },
            ),
        )
        .with(
            "install",
            action(&hook, |hook: PluginsHook, args: Id| async move {
                hook.install(&args.id).await
            }),
        )
        .with(
            "enable",
            action(&hook, |hook: PluginsHook, args: Id| async move {
                hook.enable(&args.id).await
            }),
        )
        .with(
            "disable",
            action(&hook, |hook: PluginsHook, args: Id| async move {
                hook.disable(&args.id).await
            }),
        )
        .with(
            "update_settings",
            action(
                &hook,
                |hook: PluginsHook, args: WithId<Map<String, Value>>| async move {
                    hook.update_settings(&args.id, &args.body).await
                },
            ),
        )
        .with(
            "uninstall",
            action(&hook, |hook: PluginsHook, args: Id| async move {
                hook.uninstall(&args.id).await
            }),
        )
        .with("state", move |_| {
            let view = store.read(|s| {
                to_value(&PluginsView {
                    plugins: &s.plugins,
                    marketplace: &s.marketplace,
                })
            });
            async move { view }
        });

    FeatureModule::new(PLUGINS, capabilities)
}
