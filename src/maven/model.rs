use std::collections::HashMap;

/// The `groupId:artifactId:version` coordinate identifying a project.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ProjectKey {
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
}

impl ProjectKey {
    pub fn new(group_id: &str, artifact_id: &str, version: &str) -> Self {
        Self {
            group_id: group_id.to_string(),
            artifact_id: artifact_id.to_string(),
            version: version.to_string(),
        }
    }

    /// Package name as used throughout the inventory: `groupId:artifactId`.
    pub fn name(&self) -> String {
        format!("{}:{}", self.group_id, self.artifact_id)
    }

    pub fn is_complete(&self) -> bool {
        !self.group_id.is_empty() && !self.artifact_id.is_empty() && !self.version.is_empty()
    }
}

impl std::fmt::Display for ProjectKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}:{}", self.group_id, self.artifact_id, self.version)
    }
}

/// Reference to a parent project declared in `<parent>`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Parent {
    pub key: ProjectKey,
    pub relative_path: String,
}

/// One `<dependency>` entry: a requirement on another coordinate.
///
/// The version may be a literal, a `${property}` reference, a range, or
/// empty (to be filled from dependency management during normalization).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dependency {
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
    pub scope: String,
    pub dep_type: String,
    pub classifier: String,
    pub optional: bool,
}

impl Dependency {
    pub fn name(&self) -> String {
        format!("{}:{}", self.group_id, self.artifact_id)
    }

    /// Deduplication key: two entries with the same key describe the same
    /// artifact and only the first occurrence is kept.
    pub fn dedupe_key(&self) -> (String, String, String, String) {
        (
            self.group_id.clone(),
            self.artifact_id.clone(),
            self.classifier.clone(),
            self.dep_type.clone(),
        )
    }

    /// An import entry pulls dependency management from another POM.
    pub fn is_import(&self) -> bool {
        self.dep_type == "pom" && self.scope == "import"
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DependencyManagement {
    pub dependencies: Vec<Dependency>,
}

/// One `<repository>` entry describing a package index.
#[derive(Debug, Clone, PartialEq)]
pub struct Repository {
    pub id: String,
    pub url: String,
    pub releases_enabled: bool,
    pub snapshots_enabled: bool,
}

impl Default for Repository {
    fn default() -> Self {
        Self {
            id: String::new(),
            url: String::new(),
            releases_enabled: true,
            snapshots_enabled: false,
        }
    }
}

/// Operating-system activation condition of a profile.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActivationOs {
    pub name: String,
    pub family: String,
    pub arch: String,
    pub version: String,
}

impl ActivationOs {
    pub fn is_empty(&self) -> bool {
        self.name.is_empty()
            && self.family.is_empty()
            && self.arch.is_empty()
            && self.version.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Activation {
    pub active_by_default: bool,
    pub jdk: String,
    pub os: ActivationOs,
}

/// One `<profile>` with the contributions it can merge into the project.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Profile {
    pub id: String,
    pub activation: Activation,
    pub dependencies: Vec<Dependency>,
    pub dependency_management: DependencyManagement,
    pub repositories: Vec<Repository>,
    pub properties: HashMap<String, String>,
}

/// An in-memory POM project tree.
///
/// Built fresh per scanned manifest and mutated while profiles, parents
/// and imports are merged in; once processing completes it is the
/// "effective project" handed to the graph resolver, and it is discarded
/// when the extraction for that file finishes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Project {
    pub key: ProjectKey,
    pub packaging: String,
    pub parent: Option<Parent>,
    pub properties: HashMap<String, String>,
    pub dependencies: Vec<Dependency>,
    pub dependency_management: DependencyManagement,
    pub repositories: Vec<Repository>,
    pub profiles: Vec<Profile>,
}

impl Project {
    /// Project key with empty groupId/version filled in from the parent
    /// reference, the way Maven inherits coordinates.
    pub fn effective_key(&self) -> ProjectKey {
        let mut key = self.key.clone();
        if let Some(parent) = &self.parent {
            if key.group_id.is_empty() {
                key.group_id = parent.key.group_id.clone();
            }
            if key.version.is_empty() {
                key.version = parent.key.version.clone();
            }
        }
        key
    }
}
