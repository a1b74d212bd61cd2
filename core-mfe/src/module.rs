use crate::capability::CapabilityMap;
use crate::error::Result;
use async_trait::async_trait;

/// An independently mountable feature module
///
/// `target` is a host-defined container identifier; the module decides
/// what mounting into it means.
#[async_trait]
pub trait MicroFrontend: Send + Sync {
    fn name(&self) -> &str;

    async fn mount(&self, target: &str) -> Result<()>;

    async fn unmount(&self) -> Result<()>;

    fn capabilities(&self) -> &CapabilityMap;
}
