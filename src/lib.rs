//! pomscan - transitive dependency inventory for Maven projects
//!
//! This library parses Maven `pom.xml` manifests, merges profiles,
//! parents and dependency-management imports into one effective
//! project, resolves the transitive dependency graph against pluggable
//! registry/resolution clients and produces a normalized package
//! inventory.
//!
//! # Architecture
//!
//! The library is organized into the following layers:
//!
//! - **Domain** (`maven`, `resolver`, `inventory`): POM model, merge
//!   logic, graph resolution and inventory records
//! - **Ports** (`ports`): collaborator contracts for registries and
//!   resolution
//! - **Adapters** (`adapters`): HTTP/caching registry clients, the
//!   root-override resolution decorator and report formatters
//! - **Extractors** (`extractor`, `enricher`): the plugin pipeline
//! - **Shared** (`shared`): common error types
//!
//! # Example
//!
//! ```no_run
//! use pomscan::prelude::*;
//! use std::sync::Arc;
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn scan() -> pomscan::shared::Result<()> {
//! let http = HttpRegistryClient::new(None)?;
//! let registry: Arc<dyn RegistryClient> = Arc::new(CachingRegistryClient::new(http));
//! let resolution: Arc<dyn ResolutionClient> =
//!     Arc::new(RegistryResolutionClient::new(Arc::clone(&registry)));
//!
//! let extractor = TransitiveExtractor::new(registry, resolution);
//! let input = ScanInput::new(".", "pom.xml");
//! let inventory = extractor.extract(&CancellationToken::new(), &input).await?;
//! for package in &inventory.packages {
//!     println!("{} {}", package.name, package.version);
//! }
//! # Ok(())
//! # }
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod enricher;
pub mod extractor;
pub mod inventory;
pub mod maven;
pub mod ports;
pub mod resolver;
pub mod shared;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::adapters::outbound::formatters::{
        JsonFormatter, MarkdownFormatter, ReportFormatter, ScanReport,
    };
    pub use crate::adapters::outbound::network::{
        CachingRegistryClient, HttpRegistryClient, MAVEN_CENTRAL,
    };
    pub use crate::adapters::outbound::resolution::{OverrideClient, RegistryResolutionClient};
    pub use crate::enricher::Enricher;
    pub use crate::extractor::pomxml::Extractor as PomXmlExtractor;
    pub use crate::extractor::pomxmlnet::Extractor as TransitiveExtractor;
    pub use crate::extractor::ScanInput;
    pub use crate::inventory::{Inventory, MavenMetadata, Package, PURL_TYPE_MAVEN};
    pub use crate::maven::{parse_project, Project};
    pub use crate::ports::outbound::{
        ClientCapabilities, Registry, RegistryClient, RegistrySet, RequirementVersion,
        ResolutionClient, VersionKey, ORIGIN_MANAGEMENT,
    };
    pub use crate::resolver::{GraphResolver, ResolvedGraph, ResolvedNode};
    pub use crate::shared::{Result, ScanError};
}
