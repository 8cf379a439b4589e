use crate::maven::model::ActivationOs;
use crate::maven::parents::{merge_parents, MergeOptions, RegistryManagementLookup};
use crate::ports::outbound::registry_client::{RegistryClient, RegistrySet};
use crate::ports::outbound::resolution_client::{
    ClientCapabilities, RequirementVersion, ResolutionClient, VersionKey,
};
use crate::shared::Result;
use anyhow::Context;
use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

/// ResolutionClient adapter backed by a [`RegistryClient`].
///
/// Versions come from the registry's version listing; requirements come
/// from the coordinate's POM with parents merged (remote only) and
/// dependencies normalized, so management imports and inherited
/// dependencies are visible to the resolver.
pub struct RegistryResolutionClient<R: RegistryClient> {
    registry: R,
}

impl<R: RegistryClient> RegistryResolutionClient<R> {
    pub fn new(registry: R) -> Self {
        Self { registry }
    }
}

fn split_name(name: &str) -> Result<(&str, &str)> {
    name.split_once(':')
        .ok_or_else(|| anyhow::anyhow!("invalid Maven package name {name}"))
}

#[async_trait]
impl<R: RegistryClient> ResolutionClient for RegistryResolutionClient<R> {
    fn capabilities(&self) -> ClientCapabilities {
        ClientCapabilities {
            supports_registries: true,
        }
    }

    async fn versions(
        &self,
        ctx: &CancellationToken,
        name: &str,
        registries: &RegistrySet,
    ) -> Result<Vec<String>> {
        let (group_id, artifact_id) = split_name(name)?;
        self.registry
            .fetch_versions(ctx, group_id, artifact_id, registries)
            .await
    }

    async fn requirements(
        &self,
        ctx: &CancellationToken,
        key: &VersionKey,
        registries: &RegistrySet,
    ) -> Result<Vec<RequirementVersion>> {
        let (group_id, artifact_id) = split_name(&key.name)?;
        let mut project = self
            .registry
            .fetch_project(ctx, group_id, artifact_id, &key.version, registries)
            .await
            .with_context(|| format!("failed to fetch project {key}"))?;

        project.merge_profiles("", &ActivationOs::default())?;
        let parent = project.parent.clone();
        // Dependencies can live in parents; repositories declared by
        // other projects' POMs are not adopted.
        let mut set = registries.clone();
        merge_parents(
            ctx,
            parent,
            &mut project,
            MergeOptions {
                input: None,
                client: Some(&self.registry),
                registries: &mut set,
                add_registry: false,
                allow_local: false,
                initial_parent_index: 1,
            },
        )
        .await
        .with_context(|| format!("failed to merge parents of {key}"))?;

        let lookup = RegistryManagementLookup {
            ctx: ctx.clone(),
            client: &self.registry,
            registries: registries.clone(),
        };
        project.process_dependencies(&lookup).await;

        Ok(project
            .dependencies
            .iter()
            .map(|dep| RequirementVersion::from_dependency(dep, ""))
            .collect())
    }
}
