use crate::maven::model::Project;
use crate::ports::outbound::registry_client::{RegistryClient, RegistrySet};
use crate::shared::Result;
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Cache key: the coordinate plus the registry URLs in effect, since a
/// different registry set can answer with a different document.
#[derive(Debug, Clone, Hash, Eq, PartialEq)]
struct CacheKey {
    group_id: String,
    artifact_id: String,
    version: String,
    registries: String,
}

impl CacheKey {
    fn new(group_id: &str, artifact_id: &str, version: &str, registries: &RegistrySet) -> Self {
        Self {
            group_id: group_id.to_string(),
            artifact_id: artifact_id.to_string(),
            version: version.to_string(),
            registries: registries.urls().join(","),
        }
    }
}

/// CachingRegistryClient wraps a RegistryClient and adds in-memory
/// caching of fetched projects and version listings.
///
/// Parent chains and dependency-management imports revisit the same
/// coordinates many times within one resolution; the cache is
/// thread-safe and shared across extractions of the same client.
pub struct CachingRegistryClient<R: RegistryClient> {
    inner: R,
    projects: Arc<DashMap<CacheKey, Project>>,
    versions: Arc<DashMap<CacheKey, Vec<String>>>,
}

impl<R: RegistryClient> CachingRegistryClient<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            projects: Arc::new(DashMap::new()),
            versions: Arc::new(DashMap::new()),
        }
    }

    #[cfg(test)]
    pub fn cached_projects(&self) -> usize {
        self.projects.len()
    }
}

#[async_trait]
impl<R: RegistryClient> RegistryClient for CachingRegistryClient<R> {
    async fn fetch_project(
        &self,
        ctx: &CancellationToken,
        group_id: &str,
        artifact_id: &str,
        version: &str,
        registries: &RegistrySet,
    ) -> Result<Project> {
        let key = CacheKey::new(group_id, artifact_id, version, registries);
        if let Some(cached) = self.projects.get(&key) {
            return Ok(cached.clone());
        }

        let project = self
            .inner
            .fetch_project(ctx, group_id, artifact_id, version, registries)
            .await?;
        self.projects.insert(key, project.clone());
        Ok(project)
    }

    async fn fetch_versions(
        &self,
        ctx: &CancellationToken,
        group_id: &str,
        artifact_id: &str,
        registries: &RegistrySet,
    ) -> Result<Vec<String>> {
        let key = CacheKey::new(group_id, artifact_id, "", registries);
        if let Some(cached) = self.versions.get(&key) {
            return Ok(cached.clone());
        }

        let versions = self
            .inner
            .fetch_versions(ctx, group_id, artifact_id, registries)
            .await?;
        self.versions.insert(key, versions.clone());
        Ok(versions)
    }
}
