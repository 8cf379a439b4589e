use crate::maven::model::{Project, Repository};
use crate::shared::Result;
use async_trait::async_trait;
use serde::Serialize;
use tokio_util::sync::CancellationToken;

/// One remote or local package index capable of serving POM metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Registry {
    pub url: String,
    pub id: String,
    pub releases_enabled: bool,
    pub snapshots_enabled: bool,
}

impl From<&Repository> for Registry {
    fn from(repo: &Repository) -> Self {
        Self {
            url: repo.url.clone(),
            id: repo.id.clone(),
            releases_enabled: repo.releases_enabled,
            snapshots_enabled: repo.snapshots_enabled,
        }
    }
}

/// The registries discovered for one extraction.
///
/// Built fresh per scanned manifest and passed by snapshot into every
/// fetch and resolve call, so no client holds registry state between
/// extractions and concurrent extractions never race on it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegistrySet {
    registries: Vec<Registry>,
}

impl RegistrySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a registry unless one with the same URL is already present.
    /// Returns whether the registry was added.
    pub fn add(&mut self, registry: Registry) -> bool {
        if self.registries.iter().any(|r| r.url == registry.url) {
            return false;
        }
        self.registries.push(registry);
        true
    }

    pub fn registries(&self) -> &[Registry] {
        &self.registries
    }

    pub fn urls(&self) -> Vec<String> {
        self.registries.iter().map(|r| r.url.clone()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.registries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.registries.len()
    }
}

/// RegistryClient port for fetching Maven metadata from package indexes.
///
/// Implementations are potentially network-backed and fallible; every
/// method takes the cancellation token and must check it before issuing
/// a request. Implementations must be `Send + Sync` so one client can be
/// shared across extractions.
#[async_trait]
pub trait RegistryClient: Send + Sync {
    /// Fetches and parses the POM for a coordinate, trying the given
    /// registries (on top of any default the implementation carries).
    async fn fetch_project(
        &self,
        ctx: &CancellationToken,
        group_id: &str,
        artifact_id: &str,
        version: &str,
        registries: &RegistrySet,
    ) -> Result<Project>;

    /// Lists the known concrete versions of a package, oldest first.
    async fn fetch_versions(
        &self,
        ctx: &CancellationToken,
        group_id: &str,
        artifact_id: &str,
        registries: &RegistrySet,
    ) -> Result<Vec<String>>;
}

#[async_trait]
impl<T: RegistryClient + ?Sized> RegistryClient for std::sync::Arc<T> {
    async fn fetch_project(
        &self,
        ctx: &CancellationToken,
        group_id: &str,
        artifact_id: &str,
        version: &str,
        registries: &RegistrySet,
    ) -> Result<Project> {
        (**self)
            .fetch_project(ctx, group_id, artifact_id, version, registries)
            .await
    }

    async fn fetch_versions(
        &self,
        ctx: &CancellationToken,
        group_id: &str,
        artifact_id: &str,
        registries: &RegistrySet,
    ) -> Result<Vec<String>> {
        (**self)
            .fetch_versions(ctx, group_id, artifact_id, registries)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry(url: &str) -> Registry {
        Registry {
            url: url.to_string(),
            id: String::new(),
            releases_enabled: true,
            snapshots_enabled: false,
        }
    }

    #[test]
    fn test_registry_set_deduplicates_by_url() {
        let mut set = RegistrySet::new();
        assert!(set.add(registry("https://repo.example.com/maven2")));
        assert!(!set.add(registry("https://repo.example.com/maven2")));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_registry_set_snapshot_is_independent() {
        let mut set = RegistrySet::new();
        set.add(registry("https://a.example.com"));
        let snapshot = set.clone();
        set.add(registry("https://b.example.com"));
        assert_eq!(snapshot.len(), 1);
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_registry_from_repository() {
        let repo = Repository {
            id: "internal".to_string(),
            url: "https://repo.example.com/maven2".to_string(),
            releases_enabled: true,
            snapshots_enabled: true,
        };
        let reg = Registry::from(&repo);
        assert_eq!(reg.id, "internal");
        assert!(reg.snapshots_enabled);
    }
}
