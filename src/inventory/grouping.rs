//! Grouping and in-place merging of resolved packages into the
//! inventory.

use crate::inventory::{Inventory, Package};
use std::collections::{BTreeMap, HashMap};
use tracing::warn;

/// Partitions packages that carry the given plugin's provenance by the
/// first location they were found at, mapping
/// `location -> package name -> inventory index`.
///
/// Packages without any recorded location cannot be re-extracted and are
/// skipped with a warning.
pub fn group_packages_from_plugin(
    packages: &[Package],
    plugin_name: &str,
) -> BTreeMap<String, HashMap<String, usize>> {
    let mut result: BTreeMap<String, HashMap<String, usize>> = BTreeMap::new();
    for (index, package) in packages.iter().enumerate() {
        if !package.plugins.iter().any(|p| p == plugin_name) {
            continue;
        }
        let Some(path) = package.locations.first() else {
            warn!(package = %package.name, "package has no locations");
            continue;
        };
        result
            .entry(path.clone())
            .or_default()
            .insert(package.name.clone(), index);
    }
    result
}

/// Merges newly resolved packages into the inventory.
///
/// A package whose name is already present (per `existing`, the map for
/// its location) updates that inventory slot in place: the version is
/// replaced and `plugin_name` is appended to its provenance. Unknown
/// names are appended as brand-new (transitive) entries.
pub fn add_resolved(
    new_packages: Vec<Package>,
    inventory: &mut Inventory,
    plugin_name: &str,
    existing: &HashMap<String, usize>,
) {
    for package in new_packages {
        match existing.get(&package.name) {
            Some(&index) => {
                let slot = &mut inventory.packages[index];
                slot.version = package.version;
                if !slot.plugins.iter().any(|p| p == plugin_name) {
                    slot.plugins.push(plugin_name.to_string());
                }
            }
            None => inventory.packages.push(package),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn package(name: &str, version: &str, location: &str, plugins: &[&str]) -> Package {
        Package {
            name: name.to_string(),
            version: version.to_string(),
            purl_type: crate::inventory::PURL_TYPE_MAVEN.to_string(),
            locations: if location.is_empty() {
                vec![]
            } else {
                vec![location.to_string()]
            },
            metadata: None,
            plugins: plugins.iter().map(|p| p.to_string()).collect(),
        }
    }

    #[test]
    fn test_group_filters_by_plugin_and_location() {
        let packages = vec![
            package("org.direct:alice", "1.0.0", "a/pom.xml", &["java/pomxml"]),
            package("org.direct:bob", "2.0.0", "b/pom.xml", &["java/pomxml"]),
            package("other", "1.0.0", "poetry.lock", &["python/poetrylock"]),
            package("org.direct:lost", "3.0.0", "", &["java/pomxml"]),
        ];
        let groups = group_packages_from_plugin(&packages, "java/pomxml");
        assert_eq!(groups.len(), 2);
        assert_eq!(groups["a/pom.xml"]["org.direct:alice"], 0);
        assert_eq!(groups["b/pom.xml"]["org.direct:bob"], 1);
        assert!(!groups.contains_key("poetry.lock"));
    }

    #[test]
    fn test_add_resolved_updates_existing_in_place() {
        let mut inventory = Inventory {
            packages: vec![package(
                "org.direct:alice",
                "1.0.0",
                "pom.xml",
                &["java/pomxml"],
            )],
        };
        let existing = HashMap::from([("org.direct:alice".to_string(), 0)]);
        let resolved = vec![package(
            "org.direct:alice",
            "1.0.1",
            "pom.xml",
            &["resolver"],
        )];

        add_resolved(resolved, &mut inventory, "resolver", &existing);

        assert_eq!(inventory.packages.len(), 1);
        assert_eq!(inventory.packages[0].version, "1.0.1");
        assert_eq!(
            inventory.packages[0].plugins,
            vec!["java/pomxml".to_string(), "resolver".to_string()]
        );
    }

    #[test]
    fn test_add_resolved_appends_unknown_names() {
        let mut inventory = Inventory {
            packages: vec![package(
                "org.direct:alice",
                "1.0.0",
                "pom.xml",
                &["java/pomxml"],
            )],
        };
        let existing = HashMap::from([("org.direct:alice".to_string(), 0)]);
        let resolved = vec![package(
            "org.transitive:chuck",
            "1.1.1",
            "pom.xml",
            &["resolver"],
        )];

        add_resolved(resolved, &mut inventory, "resolver", &existing);

        assert_eq!(inventory.packages.len(), 2);
        assert_eq!(inventory.packages[1].name, "org.transitive:chuck");
    }
}
