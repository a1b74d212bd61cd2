//! Built-in feature modules
//!
//! Each domain hook is exposed to the host as a [`MicroFrontend`] whose
//! capabilities forward to hook actions. Every module also has a `state`
//! capability returning the store slices it owns.
//!
//! Capability arguments are JSON objects in the same camelCase shape as the
//! REST payloads. Actions on a single entity take its `id`; actions with a
//! payload take it under `body`.

mod jobs;
mod mentorship;
mod plugins;
mod skill_exchange;

pub use jobs::jobs_module;
pub use mentorship::mentorship_module;
pub use plugins::plugins_module;
pub use skill_exchange::skill_exchange_module;

use async_trait::async_trait;
use core_api::{parse_api_error, ClientError, PaginationParams};
use core_mfe::{parse_args, to_value, CapabilityMap, MfeError, MicroFrontend};
use futures::future::BoxFuture;
use futures::FutureExt;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::future::Future;
use std::sync::{Mutex, PoisonError};
use tracing::{debug, info};

pub const JOBS: &str = "jobs";
pub const MENTORSHIP: &str = "mentorship";
pub const SKILL_EXCHANGE: &str = "skill-exchange";
pub const PLUGINS: &str = "plugins";

/// A feature module backed by a capability map
///
/// Mounting only records the target; rendering belongs to the host.
pub struct FeatureModule {
    name: &'static str,
    capabilities: CapabilityMap,
    target: Mutex<Option<String>>,
}

impl FeatureModule {
    pub fn new(name: &'static str, capabilities: CapabilityMap) -> Self {
        Self {
            name,
            capabilities,
            target: Mutex::new(None),
        }
    }

    /// Container the module is currently mounted into
    pub fn target(&self) -> Option<String> {
        self.target
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl MicroFrontend for FeatureModule {
    fn name(&self) -> &str {
        self.name
    }

    async fn mount(&self, target: &str) -> core_mfe::Result<()> {
        if target.trim().is_empty() {
            return Err(MfeError::InvalidArguments(
                "mount target must not be empty".to_string(),
            ));
        }

        *self.target.lock().unwrap_or_else(PoisonError::into_inner) = Some(target.to_string());
        info!(module = self.name, target, "Feature module mounted");
        Ok(())
    }

    async fn unmount(&self) -> core_mfe::Result<()> {
        let previous = self
            .target
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        debug!(module = self.name, ?previous, "Feature module unmounted");
        Ok(())
    }

    fn capabilities(&self) -> &CapabilityMap {
        &self.capabilities
    }
}

/// Arguments naming a single entity
#[derive(Debug, Deserialize)]
pub(crate) struct Id {
    pub id: String,
}

/// Arguments naming an entity plus a payload
#[derive(Debug, Deserialize)]
pub(crate) struct WithId<T> {
    pub id: String,
    pub body: T,
}

/// Arguments naming a parent entity plus a page
#[derive(Debug, Deserialize)]
pub(crate) struct PageOf {
    pub id: String,
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub limit: Option<u32>,
}

impl PageOf {
    pub fn pagination(&self) -> PaginationParams {
        PaginationParams {
            page: self.page,
            limit: self.limit,
        }
    }
}

/// Hook errors surface to the host with their normalized message
pub(crate) fn invocation_error(err: ClientError) -> MfeError {
    MfeError::Invocation(parse_api_error(&err).message)
}

/// Wrap a hook action as a capability handler
///
/// The handler decodes its arguments into `A`, calls `f` with a clone of
/// `hook` and encodes the result.
pub(crate) fn action<H, A, T, F, Fut>(
    hook: &H,
    f: F,
) -> impl Fn(Value) -> BoxFuture<'static, core_mfe::Result<Value>> + Send + Sync + 'static
where
    H: Clone + Send + Sync + 'static,
    A: DeserializeOwned + Send + 'static,
    T: Serialize + Send,
    F: Fn(H, A) -> Fut + Copy + Send + Sync + 'static,
    Fut: Future<Output = core_api::Result<T>> + Send + 'static,
{
    let hook = hook.clone();
    move |args: Value| {
        let hook = hook.clone();
        async move {
            let args: A = parse_args(args)?;
            let out = f(hook, args).await.map_err(invocation_error)?;
            to_value(&out)
        }
        .boxed()
    }
}
