mod caching_registry_client;
mod http_registry_client;

pub use caching_registry_client::CachingRegistryClient;
pub use http_registry_client::{HttpRegistryClient, MAVEN_CENTRAL};
