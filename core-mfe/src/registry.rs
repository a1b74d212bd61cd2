//! # Micro-frontend Registry
//!
//! Explicit registry the host creates and passes to whoever needs it.
//!
//! ## Overview
//!
//! Modules are registered by name. The host mounts them into its own
//! containers and calls their capabilities through the registry. Every
//! registration change and mount state change is announced on the event
//! bus as an [`MfeEvent`].
//!
//! A name can only be registered once; unregister it first to replace a
//! module. Unregistering a mounted module unmounts it.

use crate::error::{MfeError, Result};
use crate::module::MicroFrontend;
use core_runtime::events::{CoreEvent, EventBus, MfeEvent};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, instrument, warn};

pub struct MfeRegistry {
    modules: RwLock<BTreeMap<String, Arc<dyn MicroFrontend>>>,
    /// Module name to mount target
    mounted: RwLock<HashMap<String, String>>,
    event_bus: EventBus,
}

impl MfeRegistry {
    pub fn new(event_bus: EventBus) -> Self {
        Self {
            modules: RwLock::new(BTreeMap::new()),
            mounted: RwLock::new(HashMap::new()),
            event_bus,
        }
    }

    /// Add a module under its own name
    ///
    /// # Errors
    ///
    /// `AlreadyRegistered` if the name is taken.
    pub async fn register(&self, module: Arc<dyn MicroFrontend>) -> Result<()> {
        let name = module.name().to_string();
        let capabilities = module.capabilities().names();

        {
            let mut modules = self.modules.write().await;
            if modules.contains_key(&name) {
                return Err(MfeError::AlreadyRegistered(name));
            }
            modules.insert(name.clone(), module);
        }

        info!(module = %name, capabilities = capabilities.len(), "Micro-frontend registered");
        self.emit(MfeEvent::Registered { name, capabilities });
        Ok(())
    }

    /// Remove a module, unmounting it first when mounted
    ///
    /// The module is removed even if unmounting fails; the unmount error is
    /// returned afterwards.
    pub async fn unregister(&self, name: &str) -> Result<Arc<dyn MicroFrontend>> {
        let module = self
            .modules
            .write()
            .await
            .remove(name)
            .ok_or_else(|| MfeError::NotFound(name.to_string()))?;

        let unmounted = if self.mounted.write().await.remove(name).is_some() {
            let result = module.unmount().await;
            self.emit(MfeEvent::Unmounted {
                name: name.to_string(),
            });
            result
        } else {
            Ok(())
        };

        info!(module = %name, "Micro-frontend unregistered");
        self.emit(MfeEvent::Unregistered {
            name: name.to_string(),
        });

        unmounted.map(|()| module)
    }

    pub async fn get(&self, name: &str) -> Option<Arc<dyn MicroFrontend>> {
        self.modules.read().await.get(name).cloned()
    }

    /// Registered module names in sorted order
    pub async fn names(&self) -> Vec<String> {
        self.modules.read().await.keys().cloned().collect()
    }

    pub async fn len(&self) -> usize {
        self.modules.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.modules.read().await.is_empty()
    }

    /// Mount a registered module into a host container
    ///
    /// Mounting an already mounted module into another target unmounts it
    /// from the old one first.
    #[instrument(skip(self))]
    pub async fn mount(&self, name: &str, target: &str) -> Result<()> {
        let module = self.require(name).await?;

        let previous = self.mounted.read().await.get(name).cloned();
        if let Some(previous) = previous {
            if previous == target {
                debug!("Already mounted");
                return Ok(());
            }
            self.unmount(name).await?;
        }

        module.mount(target).await.map_err(|e| {
            warn!(error = %e, "Mount failed");
            MfeError::Mount {
                name: name.to_string(),
                message: e.to_string(),
            }
        })?;

        self.mounted
            .write()
            .await
            .insert(name.to_string(), target.to_string());
        self.emit(MfeEvent::Mounted {
            name: name.to_string(),
            target: target.to_string(),
        });
        Ok(())
    }

    /// Unmount a module; a module that is not mounted is left alone
    #[instrument(skip(self))]
    pub async fn unmount(&self, name: &str) -> Result<()> {
        let module = self.require(name).await?;
        if self.mounted.write().await.remove(name).is_none() {
            return Ok(());
        }

        module.unmount().await?;
        self.emit(MfeEvent::Unmounted {
            name: name.to_string(),
        });
        Ok(())
    }

    /// Current mount target of a module
    pub async fn mount_target(&self, name: &str) -> Option<String> {
        self.mounted.read().await.get(name).cloned()
    }

    /// Call a capability of a registered module
    #[instrument(skip(self, args))]
    pub async fn invoke(&self, name: &str, capability: &str, args: Value) -> Result<Value> {
        let module = self.require(name).await?;
        let call = module
            .capabilities()
            .call(capability, args)
            .ok_or_else(|| MfeError::CapabilityNotFound {
                module: name.to_string(),
                capability: capability.to_string(),
            })?;

        call.await.map_err(|e| {
            warn!(error = %e, "Capability failed");
            e
        })
    }

    async fn require(&self, name: &str) -> Result<Arc<dyn MicroFrontend>> {
        self.get(name)
            .await
            .ok_or_else(|| MfeError::NotFound(name.to_string()))
    }

    fn emit(&self, event: MfeEvent) {
        self.event_bus.emit(CoreEvent::Mfe(event)).ok();
    }
}

impl fmt::Debug for MfeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MfeRegistry").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::CapabilityMap;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct TestModule {
        name: &'static str,
        capabilities: CapabilityMap,
        fail_mount: bool,
        mounts: AtomicUsize,
        unmounts: AtomicUsize,
    }

    #[async_trait]
    impl MicroFrontend for TestModule {
        fn name(&self) -> &str {
            self.name
        }

        async fn mount(&self, _target: &str) -> Result<()> {
            if self.fail_mount {
                return Err(MfeError::Invocation("no container".into()));
            }
            self.mounts.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        async fn unmount(&self) -> Result<()> {
            self.unmounts.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        fn capabilities(&self) -> &CapabilityMap {
            &self.capabilities
        }
    }

    fn module(name: &'static str, capabilities: CapabilityMap) -> TestModule {
        TestModule {
            name,
            capabilities,
            fail_mount: false,
            mounts: AtomicUsize::new(0),
            unmounts: AtomicUsize::new(0),
        }
    }

    fn counter_capabilities() -> CapabilityMap {
        CapabilityMap::new().with("double", |args: Value| async move {
            let n = args
                .get("n")
                .and_then(Value::as_i64)
                .ok_or_else(|| MfeError::InvalidArguments("n must be an integer".into()))?;
            Ok(json!(n * 2))
        })
    }

    #[tokio::test]
    async fn test_register_announces_capabilities() {
        let bus = EventBus::new(8);
        let mut rx = bus.subscribe();
        let registry = MfeRegistry::new(bus);

        registry
            .register(Arc::new(module("jobs", counter_capabilities())))
            .await
            .unwrap();

        assert_eq!(registry.names().await, vec!["jobs"]);
        assert_eq!(
            rx.recv().await.unwrap(),
            CoreEvent::Mfe(MfeEvent::Registered {
                name: "jobs".to_string(),
                capabilities: vec!["double".to_string()],
            })
        );
    }

    #[tokio::test]
    async fn test_duplicate_name_is_rejected() {
        let registry = MfeRegistry::new(EventBus::new(8));
        registry
            .register(Arc::new(module("jobs", CapabilityMap::new())))
            .await
            .unwrap();

        let err = registry
            .register(Arc::new(module("jobs", CapabilityMap::new())))
            .await
            .unwrap_err();
        assert_eq!(err, MfeError::AlreadyRegistered("jobs".to_string()));
    }

    #[tokio::test]
    async fn test_invoke() {
        let registry = MfeRegistry::new(EventBus::new(8));
        registry
            .register(Arc::new(module("math", counter_capabilities())))
            .await
            .unwrap();

        assert_eq!(
            registry.invoke("math", "double", json!({ "n": 21 })).await.unwrap(),
            json!(42)
        );
        assert!(matches!(
            registry.invoke("math", "double", json!({})).await,
            Err(MfeError::InvalidArguments(_))
        ));
        assert!(matches!(
            registry.invoke("math", "triple", Value::Null).await,
            Err(MfeError::CapabilityNotFound { .. })
        ));
        assert!(matches!(
            registry.invoke("nope", "double", Value::Null).await,
            Err(MfeError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_unregister_unmounts_mounted_module() {
        let m = Arc::new(module("skills", CapabilityMap::new()));

        let bus = EventBus::new(16);
        let registry = MfeRegistry::new(bus.clone());
        registry.register(m.clone()).await.unwrap();
        let mut rx = bus.subscribe();

        registry.mount("skills", "#main").await.unwrap();
        registry.mount("skills", "#main").await.unwrap();
        assert_eq!(registry.mount_target("skills").await.as_deref(), Some("#main"));

        registry.unregister("skills").await.unwrap();
        assert!(registry.is_empty().await);
        assert_eq!(m.mounts.load(Ordering::SeqCst), 1);
        assert_eq!(m.unmounts.load(Ordering::SeqCst), 1);

        let mut seen = Vec::new();
        while let Ok(CoreEvent::Mfe(event)) = rx.try_recv() {
            seen.push(event);
        }
        assert_eq!(
            seen,
            vec![
                MfeEvent::Mounted {
                    name: "skills".to_string(),
                    target: "#main".to_string()
                },
                MfeEvent::Unmounted {
                    name: "skills".to_string()
                },
                MfeEvent::Unregistered {
                    name: "skills".to_string()
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_failed_mount_is_not_recorded() {
        let mut m = module("plugins", CapabilityMap::new());
        m.fail_mount = true;

        let registry = MfeRegistry::new(EventBus::new(8));
        registry.register(Arc::new(m)).await.unwrap();

        assert!(matches!(
            registry.mount("plugins", "#side").await,
            Err(MfeError::Mount { .. })
        ));
        assert!(registry.mount_target("plugins").await.is_none());
    }
}
