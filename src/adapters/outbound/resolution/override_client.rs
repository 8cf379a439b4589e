use crate::ports::outbound::registry_client::RegistrySet;
use crate::ports::outbound::resolution_client::{
    ClientCapabilities, RequirementVersion, ResolutionClient, VersionKey,
};
use crate::shared::Result;
use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

/// Decorator that injects the scanned project's own coordinate into the
/// resolution client, as if it were already indexed.
///
/// The scanned manifest is the authoritative source for its own version
/// and requirement list — it may not exist in any registry yet (for
/// example a pre-release workspace build) — so lookups for the root
/// coordinate are answered locally and everything else is delegated.
pub struct OverrideClient<C> {
    inner: C,
    root: VersionKey,
    requirements: Vec<RequirementVersion>,
}

impl<C> OverrideClient<C> {
    pub fn new(inner: C, root: VersionKey, requirements: Vec<RequirementVersion>) -> Self {
        Self {
            inner,
            root,
            requirements,
        }
    }
}

#[async_trait]
impl<C: ResolutionClient> ResolutionClient for OverrideClient<C> {
    fn capabilities(&self) -> ClientCapabilities {
        self.inner.capabilities()
    }

    async fn versions(
        &self,
        ctx: &CancellationToken,
        name: &str,
        registries: &RegistrySet,
    ) -> Result<Vec<String>> {
        if name == self.root.name {
            return Ok(vec![self.root.version.clone()]);
        }
        self.inner.versions(ctx, name, registries).await
    }

    async fn requirements(
        &self,
        ctx: &CancellationToken,
        key: &VersionKey,
        registries: &RegistrySet,
    ) -> Result<Vec<RequirementVersion>> {
        if *key == self.root {
            return Ok(self.requirements.clone());
        }
        self.inner.requirements(ctx, key, registries).await
    }
}
