//! Normalized inventory records produced by the extractors.

pub mod grouping;

use serde::Serialize;

/// PURL package type for Maven artifacts.
pub const PURL_TYPE_MAVEN: &str = "maven";

/// Maven-specific metadata attached to an inventory package.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MavenMetadata {
    pub group_id: String,
    pub artifact_id: String,
    /// Non-default scopes of a direct dependency ("test", "provided",
    /// ...); empty for transitive packages, whose scope the resolved
    /// graph does not carry.
    pub dep_group_vals: Vec<String>,
    pub is_transitive: bool,
    /// URLs of the registries in effect when the package was resolved.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub registries: Vec<String>,
}

/// One normalized package record.
///
/// Within one extraction pass, package names are unique per source-file
/// location; the enricher updates known direct dependencies in place
/// (version + provenance) and appends unknown names as new transitive
/// entries, never duplicating a direct dependency.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Package {
    pub name: String,
    pub version: String,
    pub purl_type: String,
    pub locations: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<MavenMetadata>,
    /// Names of the plugins that produced or updated this record.
    pub plugins: Vec<String>,
}

/// The running package inventory of a scan.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Inventory {
    pub packages: Vec<Package>,
}

impl Inventory {
    pub fn sort_by_name(&mut self) {
        self.packages.sort_by(|a, b| a.name.cmp(&b.name));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_by_name() {
        let mut inventory = Inventory {
            packages: vec![
                Package {
                    name: "org.z:last".to_string(),
                    ..Default::default()
                },
                Package {
                    name: "org.a:first".to_string(),
                    ..Default::default()
                },
            ],
        };
        inventory.sort_by_name();
        assert_eq!(inventory.packages[0].name, "org.a:first");
    }

    #[test]
    fn test_package_serializes_camel_case() {
        let package = Package {
            name: "org.direct:alice".to_string(),
            version: "1.0.0".to_string(),
            purl_type: PURL_TYPE_MAVEN.to_string(),
            locations: vec!["pom.xml".to_string()],
            metadata: Some(MavenMetadata {
                group_id: "org.direct".to_string(),
                artifact_id: "alice".to_string(),
                is_transitive: false,
                ..Default::default()
            }),
            plugins: vec!["java/pomxml".to_string()],
        };
        let json = serde_json::to_string(&package).unwrap();
        assert!(json.contains("\"purlType\":\"maven\""));
        assert!(json.contains("\"isTransitive\":false"));
        assert!(!json.contains("registries"));
    }
}
