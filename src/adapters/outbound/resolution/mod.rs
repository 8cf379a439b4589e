mod override_client;
mod registry_resolution_client;

pub use override_client::OverrideClient;
pub use registry_resolution_client::RegistryResolutionClient;
