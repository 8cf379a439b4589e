use crate::maven::model::{Dependency, Project};
use crate::shared::Result;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use tracing::warn;

static PROPERTY: Lazy<Regex> = Lazy::new(|| Regex::new(r"\$\{([^}]+)\}").unwrap());

/// Fixed-form version ranges: `[1.0,2.0)`, `(,1.5]`, `[1.0]` and the
/// comma-separated upper-bound form. Reduced to the lower-bound token;
/// real constraint solving happens in the graph resolver.
static RANGE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*[\[(]\s*([^,\])]*?)\s*(?:,[^\])]*)?[\])]\s*$").unwrap());

/// Sentinel for an unknown or unconstrained version.
pub const UNKNOWN_VERSION: &str = "0";

pub fn contains_property(value: &str) -> bool {
    value.contains("${")
}

/// Substitutes `${...}` tokens using the given table. Unknown tokens are
/// left in place and reported through the returned flag.
fn substitute(value: &str, properties: &HashMap<String, String>) -> (String, bool) {
    let mut fully_resolved = true;
    let result = PROPERTY.replace_all(value, |caps: &regex::Captures<'_>| {
        match properties.get(&caps[1]) {
            Some(resolved) => resolved.clone(),
            None => {
                fully_resolved = false;
                caps[0].to_string()
            }
        }
    });
    (result.into_owned(), fully_resolved)
}

/// Reduces a version range to its lower-bound token, or the unknown
/// sentinel when the lower bound is empty. Plain versions pass through.
pub fn normalize_range(version: &str) -> String {
    match RANGE.captures(version) {
        Some(caps) => {
            let lower = caps[1].trim();
            if lower.is_empty() {
                UNKNOWN_VERSION.to_string()
            } else {
                lower.to_string()
            }
        }
        None => version.to_string(),
    }
}

impl Project {
    /// The property table used for `${...}` interpolation: declared
    /// properties plus the built-in project coordinates.
    fn property_table(&self) -> HashMap<String, String> {
        let mut table = self.properties.clone();
        let key = self.effective_key();
        table.insert("project.groupId".to_string(), key.group_id.clone());
        table.insert("project.artifactId".to_string(), key.artifact_id.clone());
        table.insert("project.version".to_string(), key.version.clone());
        if let Some(parent) = &self.parent {
            table.insert(
                "project.parent.version".to_string(),
                parent.key.version.clone(),
            );
            table.insert("parent.version".to_string(), parent.key.version.clone());
        }
        table
    }

    /// Resolves `${property}` placeholders in dependency and
    /// dependency-management coordinates, then normalizes version
    /// ranges. A version referencing an undefined property falls back to
    /// the `"0"` sentinel with a warning; it never fails the extraction.
    pub fn interpolate(&mut self) {
        let table = self.property_table();
        for dep in self
            .dependencies
            .iter_mut()
            .chain(self.dependency_management.dependencies.iter_mut())
        {
            interpolate_dependency(dep, &table);
        }
    }

    /// Resolves `${...}` tokens in repository URLs. URLs that still
    /// contain an unresolved property are left as-is; downstream
    /// registration skips them rather than failing the manifest.
    pub fn interpolate_repositories(&mut self) -> Result<()> {
        let table = self.property_table();
        for repo in &mut self.repositories {
            let (url, _) = substitute(&repo.url, &table);
            repo.url = url;
        }
        Ok(())
    }
}

fn interpolate_dependency(dep: &mut Dependency, table: &HashMap<String, String>) {
    for field in [&mut dep.group_id, &mut dep.artifact_id, &mut dep.scope] {
        if contains_property(field) {
            let (value, _) = substitute(field, table);
            *field = value;
        }
    }

    if contains_property(&dep.version) {
        let (value, fully_resolved) = substitute(&dep.version, table);
        if fully_resolved {
            dep.version = value;
        } else {
            warn!(
                dependency = %dep.name(),
                version = %dep.version,
                "property in version requirement is undefined, falling back to \"0\""
            );
            dep.version = UNKNOWN_VERSION.to_string();
        }
    }
    dep.version = normalize_range(&dep.version);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maven::model::{Parent, ProjectKey};

    fn dep(group: &str, artifact: &str, version: &str) -> Dependency {
        Dependency {
            group_id: group.to_string(),
            artifact_id: artifact.to_string(),
            version: version.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_interpolate_version_from_properties() {
        let mut project = Project {
            dependencies: vec![dep("org.direct", "alice", "${alice.version}")],
            ..Default::default()
        };
        project
            .properties
            .insert("alice.version".to_string(), "1.0.0".to_string());
        project.interpolate();
        assert_eq!(project.dependencies[0].version, "1.0.0");
    }

    #[test]
    fn test_undefined_property_falls_back_to_zero() {
        let mut project = Project {
            dependencies: vec![dep("org.direct", "alice", "${missing.version}")],
            ..Default::default()
        };
        project.interpolate();
        assert_eq!(project.dependencies[0].version, "0");
    }

    #[test]
    fn test_builtin_project_version_property() {
        let mut project = Project {
            key: ProjectKey::new("org.example", "app", "3.1.4"),
            dependencies: vec![dep("org.example", "sibling", "${project.version}")],
            ..Default::default()
        };
        project.interpolate();
        assert_eq!(project.dependencies[0].version, "3.1.4");
    }

    #[test]
    fn test_parent_version_property() {
        let mut project = Project {
            parent: Some(Parent {
                key: ProjectKey::new("org.parent", "parent", "7.0"),
                relative_path: String::new(),
            }),
            dependencies: vec![dep("org.example", "lib", "${parent.version}")],
            ..Default::default()
        };
        project.interpolate();
        assert_eq!(project.dependencies[0].version, "7.0");
    }

    #[test]
    fn test_range_reduced_to_lower_bound() {
        assert_eq!(normalize_range("[1.0,2.0)"), "1.0");
        assert_eq!(normalize_range("[1.5]"), "1.5");
        assert_eq!(normalize_range("(,2.0]"), "0");
        assert_eq!(normalize_range("[ 2.4, 3.0 )"), "2.4");
        assert_eq!(normalize_range("1.2.3"), "1.2.3");
    }

    #[test]
    fn test_interpolate_repositories_keeps_unresolved() {
        let mut project = Project {
            repositories: vec![
                crate::maven::model::Repository {
                    id: "resolved".to_string(),
                    url: "https://${repo.host}/maven2".to_string(),
                    ..Default::default()
                },
                crate::maven::model::Repository {
                    id: "unresolved".to_string(),
                    url: "https://${unknown.host}/maven2".to_string(),
                    ..Default::default()
                },
            ],
            ..Default::default()
        };
        project
            .properties
            .insert("repo.host".to_string(), "repo.example.com".to_string());
        project.interpolate_repositories().unwrap();
        assert_eq!(project.repositories[0].url, "https://repo.example.com/maven2");
        assert!(contains_property(&project.repositories[1].url));
    }
}
