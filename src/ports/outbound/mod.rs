pub mod registry_client;
pub mod resolution_client;

pub use registry_client::{Registry, RegistryClient, RegistrySet};
pub use resolution_client::{
    ClientCapabilities, RequirementVersion, ResolutionClient, VersionKey, ORIGIN_MANAGEMENT,
};
