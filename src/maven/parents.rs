use crate::extractor::{normalize_path, ScanInput};
use crate::maven::model::{ActivationOs, DependencyManagement, Parent, Project, ProjectKey};
use crate::maven::parser::parse_project;
use crate::maven::merge::ManagementLookup;
use crate::ports::outbound::registry_client::{Registry, RegistryClient, RegistrySet};
use crate::shared::{Result, ScanError};
use anyhow::Context;
use async_trait::async_trait;
use std::collections::HashSet;
use std::path::Path;
use tokio_util::sync::CancellationToken;

/// Upper bound on the parent chain length.
pub const MAX_PARENT: usize = 100;

/// Options for merging parent data.
pub struct MergeOptions<'a> {
    /// Scan input of the current manifest; `None` when resolving a
    /// remote coordinate that has no file on disk.
    pub input: Option<&'a ScanInput>,
    /// Registry client for fetching remote parent POMs; `None` disables
    /// remote lookup (the walk then stops at the first remote parent).
    pub client: Option<&'a dyn RegistryClient>,
    /// Registry set for the current extraction. Repositories declared by
    /// merged parents are added here when `add_registry` is set.
    pub registries: &'a mut RegistrySet,
    pub add_registry: bool,
    /// Whether parsing local parent POM files is allowed.
    pub allow_local: bool,
    /// Depth of the first parent relative to the scanned file; parents
    /// beyond index 0 must use `pom` packaging.
    pub initial_parent_index: usize,
}

/// Walks the parent chain, merging each parent into `result` (child
/// values taking precedence) and finally interpolating the project.
///
/// Each step looks for a local sibling POM first (when allowed), then
/// fetches the parent from the registry. Once a parent came from the
/// registry, local lookup stays disabled for the rest of the chain. The
/// walk is bounded by [`MAX_PARENT`] and a visited-coordinate set, so a
/// cycle of parents is reported as an error instead of looping.
pub async fn merge_parents(
    ctx: &CancellationToken,
    mut current: Option<Parent>,
    result: &mut Project,
    opts: MergeOptions<'_>,
) -> Result<()> {
    let mut current_path = opts
        .input
        .map(|input| input.path.clone())
        .unwrap_or_default();
    let mut allow_local = opts.allow_local;
    let mut visited: HashSet<ProjectKey> = HashSet::new();

    for index in opts.initial_parent_index..MAX_PARENT {
        if ctx.is_cancelled() {
            return Err(ScanError::Cancelled.into());
        }
        let Some(parent) = current.take() else {
            break;
        };
        if !parent.key.is_complete() {
            break;
        }
        if !visited.insert(parent.key.clone()) {
            anyhow::bail!("a cycle of parents is detected at {}", parent.key);
        }

        let mut found_locally = None;
        if allow_local {
            if let Some(input) = opts.input {
                if let Some((parent_path, project)) =
                    load_parent_local(input, &parent, &current_path)
                        .with_context(|| format!("failed to load parent at {current_path}"))?
                {
                    current_path = parent_path;
                    found_locally = Some(project);
                }
            }
        }
        let mut project = match found_locally {
            Some(project) => project,
            None => {
                // Once a parent came from upstream, its own parents can
                // only come from upstream as well.
                allow_local = false;
                load_parent_remote(ctx, opts.client, &parent, index, opts.registries)
                    .await
                    .context("failed to load parent from remote")?
            }
        };

        result
            .merge_profiles("", &ActivationOs::default())
            .context("failed to merge default profiles")?;
        if opts.add_registry && opts.client.is_some() {
            for repo in &project.repositories {
                if repo.url.contains("${") {
                    continue;
                }
                opts.registries.add(Registry::from(repo));
            }
        }
        current = project.parent.take();
        result.merge_parent(project);
    }

    result
        .merge_profiles("", &ActivationOs::default())
        .context("failed to merge default profiles")?;
    result.interpolate();
    Ok(())
}

/// Attempts to load a parent POM from the local filesystem. Returns the
/// parent's path and project when the candidate file exists and matches
/// the expected identifiers with `pom` packaging; `None` sends the walk
/// to the registry instead.
fn load_parent_local(
    input: &ScanInput,
    parent: &Parent,
    current_path: &str,
) -> Result<Option<(String, Project)>> {
    let Some(parent_path) = parent_pom_path(input, current_path, &parent.relative_path) else {
        return Ok(None);
    };
    let data = input.read_relative(&parent_path)?;
    let project = parse_project(&data)
        .with_context(|| format!("failed to unmarshal project at {parent_path}"))?;
    if project.effective_key() != parent.key || project.packaging != "pom" {
        // Only a file with the expected identifiers and packaging counts
        // as the parent.
        return Ok(None);
    }
    Ok(Some((parent_path, project)))
}

/// Fetches a parent POM from the registry. A missing client yields an
/// empty project, which ends the walk at the next step.
async fn load_parent_remote(
    ctx: &CancellationToken,
    client: Option<&dyn RegistryClient>,
    parent: &Parent,
    parent_index: usize,
    registries: &RegistrySet,
) -> Result<Project> {
    let Some(client) = client else {
        return Ok(Project::default());
    };

    let project = client
        .fetch_project(
            ctx,
            &parent.key.group_id,
            &parent.key.artifact_id,
            &parent.key.version,
            registries,
        )
        .await
        .with_context(|| format!("failed to get Maven project {}", parent.key))?;
    if parent_index > 0 && project.packaging != "pom" {
        anyhow::bail!(
            "invalid packaging for parent project {}",
            project.packaging
        );
    }
    if project.effective_key() != parent.key {
        anyhow::bail!(
            "parent identifiers mismatch: {}, expect {}",
            project.effective_key(),
            parent.key
        );
    }
    Ok(project)
}

/// Resolves the path of a parent POM: `relativePath` when declared
/// (default `../pom.xml`), with a directory resolving to the `pom.xml`
/// inside it. Returns `None` when no candidate file exists.
pub fn parent_pom_path(input: &ScanInput, current_path: &str, relative_path: &str) -> Option<String> {
    let relative = if relative_path.is_empty() {
        "../pom.xml"
    } else {
        relative_path
    };

    let dir = Path::new(current_path).parent().unwrap_or(Path::new(""));
    let candidate = normalize_path(&dir.join(relative));
    match input.stat(&candidate)? {
        false => Some(candidate),
        true => {
            // The relative path points at a directory, so look for the
            // pom.xml inside it.
            let nested = normalize_path(&Path::new(&candidate).join("pom.xml"));
            match input.stat(&nested) {
                Some(false) => Some(nested),
                _ => None,
            }
        }
    }
}

/// Returns the managed dependencies of the given coordinate by fetching
/// its POM chain from the registry: used to expand `import`-scoped
/// dependency management.
pub async fn get_dependency_management(
    ctx: &CancellationToken,
    client: &dyn RegistryClient,
    registries: &RegistrySet,
    group_id: &str,
    artifact_id: &str,
    version: &str,
) -> Result<DependencyManagement> {
    let root = Parent {
        key: ProjectKey::new(group_id, artifact_id, version),
        relative_path: String::new(),
    };
    let mut result = Project::default();
    // The coordinate's own POM is walked like a parent chain over an
    // empty project, which yields its effective dependency management.
    let mut set = registries.clone();
    merge_parents(
        ctx,
        Some(root),
        &mut result,
        MergeOptions {
            input: None,
            client: Some(client),
            registries: &mut set,
            add_registry: false,
            allow_local: false,
            initial_parent_index: 0,
        },
    )
    .await?;
    Ok(result.dependency_management)
}

/// [`ManagementLookup`] backed by the registry client, carrying the
/// extraction's cancellation token and registry snapshot.
pub struct RegistryManagementLookup<'a> {
    pub ctx: CancellationToken,
    pub client: &'a dyn RegistryClient,
    pub registries: RegistrySet,
}

#[async_trait]
impl ManagementLookup for RegistryManagementLookup<'_> {
    async fn dependency_management(
        &self,
        group_id: &str,
        artifact_id: &str,
        version: &str,
    ) -> Result<DependencyManagement> {
        get_dependency_management(
            &self.ctx,
            self.client,
            &self.registries,
            group_id,
            artifact_id,
            version,
        )
        .await
    }
}
