//! Core service façade and bootstrap helpers.
//!
//! This crate wires the host-provided bridges from a [`CoreConfig`] into the
//! rest of the core: one event bus, one session, one API client, one shared
//! store, the domain hooks built over them and a micro-frontend registry
//! holding the built-in feature modules.
//!
//! Desktop apps typically enable the `desktop-shims` feature (which depends
//! on `bridge-desktop`) and call [`bootstrap_desktop`]. Other hosts build a
//! config with their own bridges and call [`EduMeshCore::new`].
//!
//! ```no_run
//! # async fn example(config: core_runtime::CoreConfig) -> core_service::Result<()> {
//! use core_service::EduMeshCore;
//! use serde_json::json;
//!
//! let core = EduMeshCore::new(config).await?;
//! core.restore_session().await?;
//!
//! let jobs = core
//!     .registry()
//!     .invoke("jobs", "fetch_jobs", json!({ "type": "internship" }))
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod event_log;
pub mod modules;

pub use error::{CoreError, Result};
pub use event_log::spawn_event_logger;
pub use modules::FeatureModule;

use core_api::ApiClient;
use core_auth::SessionContext;
use core_mfe::MfeRegistry;
use core_runtime::events::{CoreEvent, EventBus, EventSeverity};
use core_runtime::CoreConfig;
use core_state::{AuthHook, JobsHook, MentorshipHook, PluginsHook, SkillExchangeHook, Store};
use std::fmt;
use std::sync::Arc;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::info;

/// Primary façade exposed to host applications.
///
/// Cloning is cheap; clones share every component.
#[derive(Clone)]
pub struct EduMeshCore {
    config: Arc<CoreConfig>,
    event_bus: EventBus,
    session: SessionContext,
    client: ApiClient,
    store: Store,
    auth: AuthHook,
    jobs: JobsHook,
    mentorship: MentorshipHook,
    skill_exchange: SkillExchangeHook,
    plugins: PluginsHook,
    registry: Arc<MfeRegistry>,
}

impl EduMeshCore {
    /// Build every component from `config` and register the built-in
    /// feature modules.
    ///
    /// # Errors
    ///
    /// Fails if the config does not validate or a built-in module cannot be
    /// registered.
    pub async fn new(config: CoreConfig) -> Result<Self> {
        config.validate()?;

        let event_bus = EventBus::new(config.event_buffer_size);
        let session = SessionContext::from_config(&config, event_bus.clone());
        let client = ApiClient::from_config(&config, session.clone());
        let store = Store::new(event_bus.clone());

        let auth = AuthHook::new(client.clone(), store.clone());
        let jobs = JobsHook::new(client.clone(), store.clone());
        let mentorship = MentorshipHook::new(client.clone(), store.clone());
        let skill_exchange = SkillExchangeHook::new(client.clone(), store.clone());
        let plugins = PluginsHook::new(client.clone(), store.clone());

        let registry = Arc::new(MfeRegistry::new(event_bus.clone()));
        let builtins = [
            modules::jobs_module(jobs.clone(), store.clone()),
            modules::mentorship_module(mentorship.clone(), store.clone()),
            modules::skill_exchange_module(skill_exchange.clone(), store.clone()),
            modules::plugins_module(plugins.clone(), store.clone()),
        ];
        for module in builtins {
            registry.register(Arc::new(module)).await?;
        }

        info!(api = %config.api_base_url, "EduMesh core initialized");

        Ok(Self {
            config: Arc::new(config),
            event_bus,
            session,
            client,
            store,
            auth,
            jobs,
            mentorship,
            skill_exchange,
            plugins,
            registry,
        })
    }

    pub fn config(&self) -> &CoreConfig {
        &self.config
    }

    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    /// Subscribe to every core event
    pub fn subscribe(&self) -> broadcast::Receiver<CoreEvent> {
        self.event_bus.subscribe()
    }

    /// Mirror bus events at or above `min_severity` into `tracing`
    pub fn spawn_event_logger(&self, min_severity: EventSeverity) -> JoinHandle<()> {
        spawn_event_logger(&self.event_bus, min_severity)
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn auth(&self) -> &AuthHook {
        &self.auth
    }

    pub fn jobs(&self) -> &JobsHook {
        &self.jobs
    }

    pub fn mentorship(&self) -> &MentorshipHook {
        &self.mentorship
    }

    pub fn skill_exchange(&self) -> &SkillExchangeHook {
        &self.skill_exchange
    }

    pub fn plugins(&self) -> &PluginsHook {
        &self.plugins
    }

    /// Registry holding the built-in modules and any the host adds
    pub fn registry(&self) -> &Arc<MfeRegistry> {
        &self.registry
    }

    /// Mark the store authenticated when a token survived from an earlier
    /// run
    pub async fn restore_session(&self) -> Result<bool> {
        Ok(self.auth.restore_session().await?)
    }
}

impl fmt::Debug for EduMeshCore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EduMeshCore")
            .field("config", &self.config)
            .field("session", &self.session)
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}

/// Convenience bootstrapper for desktop hosts.
///
/// Seeds the config from the environment, overrides the base URL and
/// falls back to the desktop bridges for anything not set: reqwest for
/// HTTP, SQLite (or memory without `EDUMESH_STORAGE_PATH`) for the token,
/// and a navigator that only logs.
///
/// ```no_run
/// # async fn example() -> core_service::Result<()> {
/// let core = core_service::bootstrap_desktop("https://api.edumesh.io/api/v1").await?;
/// let signed_in = core.restore_session().await?;
/// # Ok(())
/// # }
/// ```
#[cfg(all(feature = "desktop-shims", not(target_arch = "wasm32")))]
pub async fn bootstrap_desktop(api_base_url: impl Into<String>) -> Result<EduMeshCore> {
    use bridge_desktop::LoggingNavigator;
    use core_runtime::CoreConfigBuilder;

    let config = CoreConfigBuilder::from_env()
        .api_base_url(api_base_url)
        .navigator(Arc::new(LoggingNavigator::new()))
        .build()?;

    EduMeshCore::new(config).await
}
