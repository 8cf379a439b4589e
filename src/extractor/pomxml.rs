//! Base pom.xml extractor: direct dependencies only, no network.

use crate::extractor::ScanInput;
use crate::inventory::{Inventory, MavenMetadata, Package, PURL_TYPE_MAVEN};
use crate::maven::interpolate::UNKNOWN_VERSION;
use crate::maven::model::ActivationOs;
use crate::maven::parser::parse_project_at;
use crate::shared::Result;
use std::collections::HashMap;

/// Unique name of the base extractor plugin.
pub const NAME: &str = "java/pomxml";

/// Extracts the dependencies a pom.xml declares directly, after merging
/// default profiles and interpolating properties. No registries are
/// consulted, so inherited and transitive dependencies are invisible
/// here; the enricher fills those in later.
#[derive(Debug, Default)]
pub struct Extractor;

impl Extractor {
    pub fn new() -> Self {
        Self
    }

    pub fn file_required(&self, path: &str) -> bool {
        super::file_required(path)
    }

    pub fn extract(&self, input: &ScanInput) -> Result<Inventory> {
        let data = input.read()?;
        let mut project = parse_project_at(&data, &input.path)?;
        project.merge_profiles("", &ActivationOs::default())?;
        project.interpolate();

        let mut details: HashMap<String, Package> = HashMap::new();
        for dep in &project.dependencies {
            if dep.group_id.is_empty() || dep.artifact_id.is_empty() {
                continue;
            }
            let version = if dep.version.is_empty() {
                UNKNOWN_VERSION.to_string()
            } else {
                dep.version.clone()
            };
            let mut dep_groups = Vec::new();
            if !dep.scope.is_empty() && dep.scope != "compile" {
                dep_groups.push(dep.scope.clone());
            }
            details.insert(
                dep.name(),
                Package {
                    name: dep.name(),
                    version,
                    purl_type: PURL_TYPE_MAVEN.to_string(),
                    locations: vec![input.path.clone()],
                    metadata: Some(MavenMetadata {
                        group_id: dep.group_id.clone(),
                        artifact_id: dep.artifact_id.clone(),
                        dep_group_vals: dep_groups,
                        is_transitive: false,
                        registries: vec![],
                    }),
                    plugins: vec![NAME.to_string()],
                },
            );
        }

        let mut inventory = Inventory {
            packages: details.into_values().collect(),
        };
        inventory.sort_by_name();
        Ok(inventory)
    }
}
