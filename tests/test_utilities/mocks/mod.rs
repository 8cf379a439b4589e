mod mock_registry_client;
mod mock_resolution_client;

pub use mock_registry_client::MockRegistryClient;
pub use mock_resolution_client::MockResolutionClient;
