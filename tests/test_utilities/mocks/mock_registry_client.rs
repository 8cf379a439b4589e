use async_trait::async_trait;
use pomscan::maven::{parse_project, Project};
use pomscan::ports::outbound::{RegistryClient, RegistrySet};
use pomscan::shared::{Result, ScanError};
use std::collections::HashMap;
use tokio_util::sync::CancellationToken;

/// Mock RegistryClient serving POM documents from memory.
pub struct MockRegistryClient {
    projects: HashMap<(String, String, String), String>,
    versions: HashMap<(String, String), Vec<String>>,
}

impl MockRegistryClient {
    pub fn new() -> Self {
        Self {
            projects: HashMap::new(),
            versions: HashMap::new(),
        }
    }

    /// Registers a POM document for a coordinate; the version is also
    /// added to the package's version listing.
    pub fn with_project(mut self, group: &str, artifact: &str, version: &str, pom: &str) -> Self {
        self.projects.insert(
            (group.to_string(), artifact.to_string(), version.to_string()),
            pom.to_string(),
        );
        self.versions
            .entry((group.to_string(), artifact.to_string()))
            .or_default()
            .push(version.to_string());
        self
    }
}

impl Default for MockRegistryClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RegistryClient for MockRegistryClient {
    async fn fetch_project(
        &self,
        ctx: &CancellationToken,
        group_id: &str,
        artifact_id: &str,
        version: &str,
        _registries: &RegistrySet,
    ) -> Result<Project> {
        if ctx.is_cancelled() {
            return Err(ScanError::Cancelled.into());
        }
        let key = (
            group_id.to_string(),
            artifact_id.to_string(),
            version.to_string(),
        );
        match self.projects.get(&key) {
            Some(pom) => parse_project(pom.as_bytes()),
            None => anyhow::bail!("project {group_id}:{artifact_id}:{version} not found"),
        }
    }

    async fn fetch_versions(
        &self,
        ctx: &CancellationToken,
        group_id: &str,
        artifact_id: &str,
        _registries: &RegistrySet,
    ) -> Result<Vec<String>> {
        if ctx.is_cancelled() {
            return Err(ScanError::Cancelled.into());
        }
        let key = (group_id.to_string(), artifact_id.to_string());
        match self.versions.get(&key) {
            Some(versions) => Ok(versions.clone()),
            None => anyhow::bail!("package {group_id}:{artifact_id} not found"),
        }
    }
}
