//! Graph resolver: computes the full direct + transitive dependency
//! closure of an effective project against a [`ResolutionClient`].

use crate::ports::outbound::registry_client::RegistrySet;
use crate::ports::outbound::resolution_client::{
    ClientCapabilities, RequirementVersion, ResolutionClient, VersionKey,
};
use crate::shared::{Result, ScanError};
use anyhow::Context;
use std::collections::{HashMap, HashSet, VecDeque};
use tokio_util::sync::CancellationToken;

/// One resolved package in the graph.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedNode {
    pub name: String,
    pub version: String,
}

/// The resolved dependency graph. The first node is the synthetic root
/// (the scanned project itself) and is discarded by callers. `error`
/// collects non-fatal per-package failures, e.g. one of several
/// registries being unreachable while others kept answering.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedGraph {
    pub nodes: Vec<ResolvedNode>,
    pub error: String,
}

impl ResolvedGraph {
    /// The "no registries reachable" guard: nothing beyond the root
    /// resolved and an error was recorded. Larger graphs are best-effort
    /// successes even with a non-empty error string.
    pub fn is_empty_failure(&self) -> bool {
        self.nodes.len() <= 1 && !self.error.is_empty()
    }
}

/// Scopes that do not propagate to transitive dependencies.
const NON_PROPAGATING_SCOPES: [&str; 3] = ["test", "provided", "system"];

/// GraphResolver walks the requirement closure breadth-first.
///
/// Requirements tagged `origin = management` pin versions for the whole
/// walk but never become nodes themselves; duplicate coordinate names
/// collapse to the first resolved entry. Per-package lookup failures are
/// recorded on the graph and resolution continues, so a partially
/// reachable registry universe still yields a useful inventory.
pub struct GraphResolver<C: ResolutionClient> {
    client: C,
    capabilities: ClientCapabilities,
}

impl<C: ResolutionClient> GraphResolver<C> {
    pub fn new(client: C) -> Self {
        let capabilities = client.capabilities();
        Self {
            client,
            capabilities,
        }
    }

    pub async fn resolve(
        &self,
        ctx: &CancellationToken,
        root: &VersionKey,
        registries: &RegistrySet,
    ) -> Result<ResolvedGraph> {
        let empty = RegistrySet::default();
        let regs = if self.capabilities.supports_registries {
            registries
        } else {
            &empty
        };

        // The root's requirements come from the override decorator, so a
        // failure here is a genuine transport/protocol error and fatal.
        let root_requirements = self
            .client
            .requirements(ctx, root, regs)
            .await
            .with_context(|| format!("failed to fetch requirements for {root}"))?;

        let mut pins: HashMap<String, String> = HashMap::new();
        for req in root_requirements.iter().filter(|r| r.is_management()) {
            if !req.version.is_empty() {
                pins.entry(req.name.clone()).or_insert(req.version.clone());
            }
        }

        let mut queue: VecDeque<RequirementVersion> = root_requirements
            .into_iter()
            .filter(|r| !r.is_management())
            .collect();

        let mut visited: HashSet<String> = HashSet::from([root.name.clone()]);
        let mut nodes = vec![ResolvedNode {
            name: root.name.clone(),
            version: root.version.clone(),
        }];
        let mut errors: Vec<String> = Vec::new();

        while let Some(req) = queue.pop_front() {
            if ctx.is_cancelled() {
                return Err(ScanError::Cancelled.into());
            }
            if visited.contains(&req.name) {
                continue;
            }

            let want = if req.version.is_empty() {
                pins.get(&req.name).cloned().unwrap_or_default()
            } else {
                req.version.clone()
            };
            let version = match self.pick_version(ctx, &req.name, &want, regs).await {
                Ok(version) => version,
                Err(err) => {
                    if ScanError::is_cancelled(&err) {
                        return Err(err);
                    }
                    errors.push(format!("{}: {err:#}", req.name));
                    continue;
                }
            };

            visited.insert(req.name.clone());
            nodes.push(ResolvedNode {
                name: req.name.clone(),
                version: version.clone(),
            });

            let key = VersionKey::new(&req.name, &version);
            let requirements = match self.client.requirements(ctx, &key, regs).await {
                Ok(requirements) => requirements,
                Err(err) => {
                    if ScanError::is_cancelled(&err) {
                        return Err(err);
                    }
                    errors.push(format!("{key}: {err:#}"));
                    continue;
                }
            };
            for mut dep in requirements {
                if dep.is_management() || dep.optional {
                    continue;
                }
                if NON_PROPAGATING_SCOPES.contains(&dep.scope.as_str()) {
                    continue;
                }
                if visited.contains(&dep.name) {
                    continue;
                }
                // Management entries of the scanned project constrain
                // the whole closure.
                if let Some(pin) = pins.get(&dep.name) {
                    dep.version = pin.clone();
                }
                queue.push_back(dep);
            }
        }

        Ok(ResolvedGraph {
            nodes,
            error: errors.join("; "),
        })
    }

    /// Picks the concrete version satisfying a requirement: the exact
    /// version when the registry knows it, otherwise the newest
    /// available. An empty or `"0"` requirement is unconstrained.
    async fn pick_version(
        &self,
        ctx: &CancellationToken,
        name: &str,
        want: &str,
        registries: &RegistrySet,
    ) -> Result<String> {
        let versions = self.client.versions(ctx, name, registries).await?;
        let newest = versions
            .last()
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("no versions available"))?;
        if !want.is_empty() && want != "0" && versions.iter().any(|v| v == want) {
            return Ok(want.to_string());
        }
        Ok(newest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    /// In-memory resolution universe: name -> [(version, requirements)].
    #[derive(Default)]
    struct FixedClient {
        packages: HashMap<String, Vec<(String, Vec<RequirementVersion>)>>,
        fail_versions: bool,
    }

    impl FixedClient {
        fn with(
            mut self,
            name: &str,
            version: &str,
            requirements: Vec<RequirementVersion>,
        ) -> Self {
            self.packages
                .entry(name.to_string())
                .or_default()
                .push((version.to_string(), requirements));
            self
        }
    }

    #[async_trait]
    impl ResolutionClient for FixedClient {
        async fn versions(
            &self,
            _ctx: &CancellationToken,
            name: &str,
            _registries: &RegistrySet,
        ) -> Result<Vec<String>> {
            if self.fail_versions {
                anyhow::bail!("registry unreachable");
            }
            match self.packages.get(name) {
                Some(versions) => Ok(versions.iter().map(|(v, _)| v.clone()).collect()),
                None => anyhow::bail!("unknown package {name}"),
            }
        }

        async fn requirements(
            &self,
            _ctx: &CancellationToken,
            key: &VersionKey,
            _registries: &RegistrySet,
        ) -> Result<Vec<RequirementVersion>> {
            let versions = self
                .packages
                .get(&key.name)
                .ok_or_else(|| anyhow::anyhow!("unknown package {}", key.name))?;
            versions
                .iter()
                .find(|(v, _)| *v == key.version)
                .map(|(_, reqs)| reqs.clone())
                .ok_or_else(|| anyhow::anyhow!("unknown version {key}"))
        }
    }

    fn req(name: &str, version: &str) -> RequirementVersion {
        RequirementVersion {
            name: name.to_string(),
            version: version.to_string(),
            ..Default::default()
        }
    }

    fn names(graph: &ResolvedGraph) -> Vec<&str> {
        graph.nodes.iter().map(|n| n.name.as_str()).collect()
    }

    #[tokio::test]
    async fn test_resolve_transitive_closure() {
        let client = FixedClient::default()
            .with("root:root", "1.0", vec![req("org.direct:alice", "1.0.0")])
            .with(
                "org.direct:alice",
                "1.0.0",
                vec![req("org.transitive:chuck", "1.1.1")],
            )
            .with("org.transitive:chuck", "1.1.1", vec![]);

        let resolver = GraphResolver::new(client);
        let graph = resolver
            .resolve(
                &CancellationToken::new(),
                &VersionKey::new("root:root", "1.0"),
                &RegistrySet::default(),
            )
            .await
            .unwrap();

        assert_eq!(
            names(&graph),
            vec!["root:root", "org.direct:alice", "org.transitive:chuck"]
        );
        assert!(graph.error.is_empty());
    }

    #[tokio::test]
    async fn test_management_requirements_never_become_nodes() {
        let mut managed = req("org.managed:only", "3.0.0");
        managed.origin = crate::ports::outbound::ORIGIN_MANAGEMENT.to_string();
        let client = FixedClient::default()
            .with("root:root", "1.0", vec![req("org.direct:alice", "1.0.0"), managed])
            .with("org.direct:alice", "1.0.0", vec![])
            .with("org.managed:only", "3.0.0", vec![]);

        let resolver = GraphResolver::new(client);
        let graph = resolver
            .resolve(
                &CancellationToken::new(),
                &VersionKey::new("root:root", "1.0"),
                &RegistrySet::default(),
            )
            .await
            .unwrap();
        assert_eq!(names(&graph), vec!["root:root", "org.direct:alice"]);
    }

    #[tokio::test]
    async fn test_management_pin_constrains_transitive_version() {
        let mut pin = req("org.transitive:chuck", "1.0.5");
        pin.origin = crate::ports::outbound::ORIGIN_MANAGEMENT.to_string();
        let client = FixedClient::default()
            .with("root:root", "1.0", vec![req("org.direct:alice", "1.0.0"), pin])
            .with(
                "org.direct:alice",
                "1.0.0",
                vec![req("org.transitive:chuck", "1.1.1")],
            )
            .with("org.transitive:chuck", "1.0.5", vec![])
            .with("org.transitive:chuck", "1.1.1", vec![]);

        let resolver = GraphResolver::new(client);
        let graph = resolver
            .resolve(
                &CancellationToken::new(),
                &VersionKey::new("root:root", "1.0"),
                &RegistrySet::default(),
            )
            .await
            .unwrap();
        let chuck = graph
            .nodes
            .iter()
            .find(|n| n.name == "org.transitive:chuck")
            .unwrap();
        assert_eq!(chuck.version, "1.0.5");
    }

    #[tokio::test]
    async fn test_test_scope_does_not_propagate() {
        let mut test_dep = req("org.test:junit", "4.13");
        test_dep.scope = "test".to_string();
        let client = FixedClient::default()
            .with("root:root", "1.0", vec![req("org.direct:alice", "1.0.0")])
            .with("org.direct:alice", "1.0.0", vec![test_dep])
            .with("org.test:junit", "4.13", vec![]);

        let resolver = GraphResolver::new(client);
        let graph = resolver
            .resolve(
                &CancellationToken::new(),
                &VersionKey::new("root:root", "1.0"),
                &RegistrySet::default(),
            )
            .await
            .unwrap();
        assert_eq!(names(&graph), vec!["root:root", "org.direct:alice"]);
    }

    #[tokio::test]
    async fn test_unreachable_registry_yields_empty_failure() {
        let client = FixedClient {
            packages: HashMap::from([(
                "root:root".to_string(),
                vec![("1.0".to_string(), vec![req("org.direct:alice", "1.0.0")])],
            )]),
            fail_versions: true,
        };

        let resolver = GraphResolver::new(client);
        let graph = resolver
            .resolve(
                &CancellationToken::new(),
                &VersionKey::new("root:root", "1.0"),
                &RegistrySet::default(),
            )
            .await
            .unwrap();
        assert_eq!(graph.nodes.len(), 1);
        assert!(!graph.error.is_empty());
        assert!(graph.is_empty_failure());
    }

    #[tokio::test]
    async fn test_partial_failure_is_not_empty_failure() {
        let client = FixedClient::default()
            .with(
                "root:root",
                "1.0",
                vec![req("org.direct:alice", "1.0.0"), req("org.gone:ghost", "1.0")],
            )
            .with("org.direct:alice", "1.0.0", vec![]);

        let resolver = GraphResolver::new(client);
        let graph = resolver
            .resolve(
                &CancellationToken::new(),
                &VersionKey::new("root:root", "1.0"),
                &RegistrySet::default(),
            )
            .await
            .unwrap();
        assert_eq!(graph.nodes.len(), 2);
        assert!(!graph.error.is_empty());
        assert!(!graph.is_empty_failure());
    }

    #[tokio::test]
    async fn test_cancellation_aborts_resolution() {
        let client = FixedClient::default()
            .with("root:root", "1.0", vec![req("org.direct:alice", "1.0.0")])
            .with("org.direct:alice", "1.0.0", vec![]);

        let ctx = CancellationToken::new();
        ctx.cancel();
        let resolver = GraphResolver::new(client);
        let err = resolver
            .resolve(
                &ctx,
                &VersionKey::new("root:root", "1.0"),
                &RegistrySet::default(),
            )
            .await
            .unwrap_err();
        assert!(ScanError::is_cancelled(&err));
    }
}
