//! Inventory enricher: re-resolves every pom.xml already present in the
//! inventory and merges the transitive closure into it.

use crate::extractor::pomxml;
use crate::extractor::pomxmlnet::resolve_project_inventory;
use crate::extractor::ScanInput;
use crate::inventory::grouping::{add_resolved, group_packages_from_plugin};
use crate::inventory::Inventory;
use crate::ports::outbound::registry_client::RegistryClient;
use crate::ports::outbound::resolution_client::ResolutionClient;
use crate::shared::Result;
use std::path::Path;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Unique name of the enricher plugin.
pub const NAME: &str = "transitivedependency/pomxml";

/// Enricher performing transitive dependency resolution for pom.xml
/// packages extracted by the base parser plugin.
pub struct Enricher {
    registry: Arc<dyn RegistryClient>,
    resolution: Arc<dyn ResolutionClient>,
}

impl Enricher {
    pub fn new(registry: Arc<dyn RegistryClient>, resolution: Arc<dyn ResolutionClient>) -> Self {
        Self {
            registry,
            resolution,
        }
    }

    /// Plugins whose output this enricher consumes.
    pub fn required_plugins() -> &'static [&'static str] {
        &[pomxml::NAME]
    }

    /// Enriches the inventory with transitive dependencies.
    ///
    /// Packages extracted by the base parser are grouped by manifest
    /// location; each manifest is re-extracted with full resolution, and
    /// the resolved packages are merged back: known direct dependencies
    /// are updated in place (version + provenance), new names are
    /// appended as transitive entries. A manifest that fails to resolve
    /// aborts the enrichment of that inventory with an error; the caller
    /// decides whether the scan continues.
    pub async fn enrich(
        &self,
        ctx: &CancellationToken,
        scan_root: &Path,
        inventory: &mut Inventory,
    ) -> Result<()> {
        let groups = group_packages_from_plugin(&inventory.packages, pomxml::NAME);

        for (path, known) in groups {
            let input = ScanInput::new(scan_root, path);
            let enriched =
                resolve_project_inventory(ctx, &input, &self.registry, &self.resolution, NAME)
                    .await?;
            add_resolved(enriched.packages, inventory, NAME, &known);
        }

        Ok(())
    }
}
