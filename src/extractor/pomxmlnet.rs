//! Transitive pom.xml extractor: resolves the full dependency graph of
//! a manifest against the configured registry and resolution clients.

use crate::adapters::outbound::resolution::OverrideClient;
use crate::extractor::ScanInput;
use crate::inventory::{Inventory, MavenMetadata, Package, PURL_TYPE_MAVEN};
use crate::maven::model::ActivationOs;
use crate::maven::parents::{merge_parents, MergeOptions, RegistryManagementLookup};
use crate::maven::parser::parse_project_at;
use crate::ports::outbound::registry_client::{Registry, RegistryClient, RegistrySet};
use crate::ports::outbound::resolution_client::{
    RequirementVersion, ResolutionClient, VersionKey, ORIGIN_MANAGEMENT,
};
use crate::resolver::GraphResolver;
use crate::shared::{Result, ScanError};
use anyhow::Context;
use std::collections::HashMap;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Unique name of the transitive extractor plugin.
pub const NAME: &str = "java/pomxmlnet";

/// Extracts Maven packages with transitive dependency resolution.
///
/// One instance may be shared across sequential extractions; each call
/// builds its own registry snapshot, so no state leaks between files.
pub struct Extractor {
    registry: Arc<dyn RegistryClient>,
    resolution: Arc<dyn ResolutionClient>,
}

impl Extractor {
    pub fn new(registry: Arc<dyn RegistryClient>, resolution: Arc<dyn ResolutionClient>) -> Self {
        Self {
            registry,
            resolution,
        }
    }

    pub fn file_required(&self, path: &str) -> bool {
        super::file_required(path)
    }

    pub async fn extract(&self, ctx: &CancellationToken, input: &ScanInput) -> Result<Inventory> {
        resolve_project_inventory(ctx, input, &self.registry, &self.resolution, NAME).await
    }
}

/// The full per-manifest pipeline, shared by the transitive extractor
/// and the inventory enricher: parse, merge profiles, interpolate
/// repositories, collect registries, merge parents, normalize
/// dependencies, resolve the graph and convert nodes to packages.
pub(crate) async fn resolve_project_inventory(
    ctx: &CancellationToken,
    input: &ScanInput,
    registry: &Arc<dyn RegistryClient>,
    resolution: &Arc<dyn ResolutionClient>,
    plugin_name: &str,
) -> Result<Inventory> {
    let data = input.read()?;
    let mut project = parse_project_at(&data, &input.path).context("could not extract")?;
    // Empty JDK and OS filters merge the default profiles.
    project
        .merge_profiles("", &ActivationOs::default())
        .context("failed to merge profiles")?;
    project
        .interpolate_repositories()
        .context("failed to interpolate project")?;

    // A fresh registry snapshot per extraction; repositories whose URL
    // still contains an unresolved property are not registered.
    let mut registries = RegistrySet::new();
    for repo in &project.repositories {
        if repo.url.contains("${") {
            continue;
        }
        registries.add(Registry::from(repo));
    }

    let parent = project.parent.clone();
    merge_parents(
        ctx,
        parent,
        &mut project,
        MergeOptions {
            input: Some(input),
            client: Some(registry.as_ref()),
            registries: &mut registries,
            add_registry: true,
            allow_local: true,
            initial_parent_index: 1,
        },
    )
    .await
    .context("failed to merge parents")?;

    // Process the dependencies:
    //  - dedupe dependencies and dependency management
    //  - import dependency management
    //  - fill in missing dependency version requirement
    let lookup = RegistryManagementLookup {
        ctx: ctx.clone(),
        client: registry.as_ref(),
        registries: registries.clone(),
    };
    project.process_dependencies(&lookup).await;

    let registries = registries;
    let key = project.effective_key();
    let root = VersionKey::new(&key.name(), &key.version);

    let requirements: Vec<RequirementVersion> = project
        .dependencies
        .iter()
        .map(|dep| RequirementVersion::from_dependency(dep, ""))
        .chain(
            project
                .dependency_management
                .dependencies
                .iter()
                .map(|dep| RequirementVersion::from_dependency(dep, ORIGIN_MANAGEMENT)),
        )
        .collect();

    let override_client = OverrideClient::new(Arc::clone(resolution), root.clone(), requirements);
    let resolver = GraphResolver::new(override_client);
    let graph = resolver
        .resolve(ctx, &root, &registries)
        .await
        .with_context(|| format!("failed resolving {root}"))?;
    if graph.is_empty_failure() {
        return Err(ScanError::Resolution {
            coordinate: root.to_string(),
            details: graph.error,
        }
        .into());
    }

    let registry_urls = registries.urls();
    let mut details: HashMap<String, Package> = HashMap::new();
    // The first node is the synthetic root and is not inventory.
    for node in graph.nodes.iter().skip(1) {
        let (group_id, artifact_id) = node
            .name
            .split_once(':')
            .unwrap_or((node.name.as_str(), ""));
        // Dependency groups are only known for direct dependencies; the
        // resolved graph carries no scope for transitive nodes.
        let mut dep_groups = Vec::new();
        let mut is_direct = false;
        for dep in &project.dependencies {
            if dep.name() != node.name {
                continue;
            }
            is_direct = true;
            if !dep.scope.is_empty() && dep.scope != "compile" {
                dep_groups.push(dep.scope.clone());
            }
            break;
        }
        details.insert(
            node.name.clone(),
            Package {
                name: node.name.clone(),
                version: node.version.clone(),
                purl_type: PURL_TYPE_MAVEN.to_string(),
                locations: vec![input.path.clone()],
                metadata: Some(MavenMetadata {
                    group_id: group_id.to_string(),
                    artifact_id: artifact_id.to_string(),
                    dep_group_vals: dep_groups,
                    is_transitive: !is_direct,
                    registries: registry_urls.clone(),
                }),
                plugins: vec![plugin_name.to_string()],
            },
        );
    }

    let mut inventory = Inventory {
        packages: details.into_values().collect(),
    };
    inventory.sort_by_name();
    Ok(inventory)
}
