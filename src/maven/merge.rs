use crate::maven::model::{Dependency, DependencyManagement, Project};
use crate::shared::Result;
use async_trait::async_trait;
use std::collections::{HashMap, HashSet, VecDeque};
use tracing::warn;

/// Lookup of another coordinate's effective dependency management,
/// typically backed by the registry client. Used to expand
/// `<scope>import</scope>` management entries during normalization.
#[async_trait]
pub trait ManagementLookup: Send + Sync {
    async fn dependency_management(
        &self,
        group_id: &str,
        artifact_id: &str,
        version: &str,
    ) -> Result<DependencyManagement>;
}

impl Project {
    /// Merges a parent project into this one, child values taking
    /// precedence on conflicting keys. Parent profiles are carried over
    /// so the parent walk can merge their default contributions next.
    pub fn merge_parent(&mut self, parent: Project) {
        if self.key.group_id.is_empty() {
            self.key.group_id = parent.key.group_id;
        }
        if self.key.version.is_empty() {
            self.key.version = parent.key.version;
        }
        for (key, value) in parent.properties {
            self.properties.entry(key).or_insert(value);
        }
        self.dependencies.extend(parent.dependencies);
        self.dependency_management
            .dependencies
            .extend(parent.dependency_management.dependencies);
        for repo in parent.repositories {
            if !self.repositories.iter().any(|r| r.url == repo.url) {
                self.repositories.push(repo);
            }
        }
        self.profiles.extend(parent.profiles);
    }

    /// Normalizes the dependency tables:
    ///
    /// 1. deduplicates dependencies and dependency management, keeping
    ///    the first occurrence per `{group, artifact, classifier, type}`;
    /// 2. expands `import`-scoped management entries through `lookup`,
    ///    merging the returned management lists (a failed lookup logs a
    ///    warning and drops that import, favoring completeness);
    /// 3. fills missing dependency versions from the merged management
    ///    table.
    ///
    /// Deterministic given a deterministic lookup, and a second run over
    /// an already-normalized project changes nothing. A dependency whose
    /// version remains unknown keeps its empty requirement and proceeds
    /// to resolution.
    pub async fn process_dependencies(&mut self, lookup: &dyn ManagementLookup) {
        let deps = dedupe(std::mem::take(&mut self.dependencies));
        let management = dedupe(std::mem::take(
            &mut self.dependency_management.dependencies,
        ));

        let mut expanded: Vec<Dependency> = Vec::new();
        let mut queue: VecDeque<Dependency> = management.into();
        let mut imported: HashSet<(String, String, String)> = HashSet::new();
        while let Some(entry) = queue.pop_front() {
            if !entry.is_import() {
                expanded.push(entry);
                continue;
            }
            let key = (
                entry.group_id.clone(),
                entry.artifact_id.clone(),
                entry.version.clone(),
            );
            if !imported.insert(key) {
                continue;
            }
            match lookup
                .dependency_management(&entry.group_id, &entry.artifact_id, &entry.version)
                .await
            {
                Ok(management) => queue.extend(management.dependencies),
                Err(err) => warn!(
                    import = %entry.name(),
                    version = %entry.version,
                    error = %format!("{err:#}"),
                    "failed to import dependency management"
                ),
            }
        }
        let management = dedupe(expanded);

        let versions: HashMap<_, _> = management
            .iter()
            .filter(|d| !d.version.is_empty())
            .map(|d| (d.dedupe_key(), d.version.clone()))
            .collect();

        self.dependencies = deps;
        for dep in &mut self.dependencies {
            if dep.version.is_empty() {
                if let Some(version) = versions.get(&dep.dedupe_key()) {
                    dep.version = version.clone();
                }
            }
        }
        self.dependency_management.dependencies = management;
    }
}

fn dedupe(dependencies: Vec<Dependency>) -> Vec<Dependency> {
    let mut seen = HashSet::new();
    let mut result = Vec::with_capacity(dependencies.len());
    for dep in dependencies {
        if seen.insert(dep.dedupe_key()) {
            result.push(dep);
        }
    }
    result
}
