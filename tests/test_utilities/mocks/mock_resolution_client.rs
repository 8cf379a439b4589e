use async_trait::async_trait;
use pomscan::ports::outbound::{
    ClientCapabilities, RegistrySet, RequirementVersion, ResolutionClient, VersionKey,
};
use pomscan::shared::{Result, ScanError};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;
use tokio_util::sync::CancellationToken;

/// YAML schema of a resolution universe fixture.
#[derive(Debug, Deserialize)]
struct Universe {
    #[serde(default)]
    packages: Vec<UniversePackage>,
}

#[derive(Debug, Deserialize)]
struct UniversePackage {
    name: String,
    #[serde(default)]
    versions: Vec<UniverseVersion>,
}

#[derive(Debug, Deserialize)]
struct UniverseVersion {
    version: String,
    #[serde(default)]
    requirements: Vec<UniverseRequirement>,
}

#[derive(Debug, Deserialize)]
struct UniverseRequirement {
    name: String,
    #[serde(default)]
    version: String,
    #[serde(default)]
    scope: String,
    #[serde(default)]
    optional: bool,
}

/// Mock ResolutionClient backed by a YAML-described universe of
/// packages, versions and requirements.
pub struct MockResolutionClient {
    packages: HashMap<String, Vec<(String, Vec<RequirementVersion>)>>,
    supports_registries: bool,
    /// Registry URL lists observed on resolve calls, for asserting the
    /// registry bridge behavior.
    pub seen_registries: Mutex<Vec<Vec<String>>>,
}

impl MockResolutionClient {
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let universe: Universe = serde_yaml_ng::from_str(yaml)?;
        let mut packages = HashMap::new();
        for package in universe.packages {
            let versions = package
                .versions
                .into_iter()
                .map(|v| {
                    let requirements = v
                        .requirements
                        .into_iter()
                        .map(|r| RequirementVersion {
                            name: r.name,
                            version: r.version,
                            scope: r.scope,
                            optional: r.optional,
                            origin: String::new(),
                        })
                        .collect();
                    (v.version, requirements)
                })
                .collect();
            packages.insert(package.name, versions);
        }
        Ok(Self {
            packages,
            supports_registries: true,
            seen_registries: Mutex::new(Vec::new()),
        })
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    pub fn without_registry_support(mut self) -> Self {
        self.supports_registries = false;
        self
    }
}

#[async_trait]
impl ResolutionClient for MockResolutionClient {
    fn capabilities(&self) -> ClientCapabilities {
        ClientCapabilities {
            supports_registries: self.supports_registries,
        }
    }

    async fn versions(
        &self,
        ctx: &CancellationToken,
        name: &str,
        registries: &RegistrySet,
    ) -> Result<Vec<String>> {
        if ctx.is_cancelled() {
            return Err(ScanError::Cancelled.into());
        }
        self.seen_registries
            .lock()
            .unwrap()
            .push(registries.urls());
        match self.packages.get(name) {
            Some(versions) => Ok(versions.iter().map(|(v, _)| v.clone()).collect()),
            None => anyhow::bail!("unknown package {name}"),
        }
    }

    async fn requirements(
        &self,
        ctx: &CancellationToken,
        key: &VersionKey,
        _registries: &RegistrySet,
    ) -> Result<Vec<RequirementVersion>> {
        if ctx.is_cancelled() {
            return Err(ScanError::Cancelled.into());
        }
        let versions = self
            .packages
            .get(&key.name)
            .ok_or_else(|| anyhow::anyhow!("unknown package {}", key.name))?;
        versions
            .iter()
            .find(|(v, _)| *v == key.version)
            .map(|(_, requirements)| requirements.clone())
            .ok_or_else(|| anyhow::anyhow!("unknown version {key}"))
    }
}
