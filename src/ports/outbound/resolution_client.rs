use crate::maven::model::Dependency;
use crate::ports::outbound::registry_client::RegistrySet;
use crate::shared::Result;
use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

/// Origin tag for requirements that come from dependency management.
/// Management entries constrain versions but never become graph nodes
/// on their own.
pub const ORIGIN_MANAGEMENT: &str = "management";

/// A `name@version` pair, where the name is `groupId:artifactId` and the
/// version is concrete.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct VersionKey {
    pub name: String,
    pub version: String,
}

impl VersionKey {
    pub fn new(name: &str, version: &str) -> Self {
        Self {
            name: name.to_string(),
            version: version.to_string(),
        }
    }
}

impl std::fmt::Display for VersionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}", self.name, self.version)
    }
}

/// One declared requirement on a package: a version string (possibly
/// empty or the `"0"` sentinel), the declared scope and whether the
/// entry only constrains versions (`origin = management`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequirementVersion {
    pub name: String,
    pub version: String,
    pub scope: String,
    pub optional: bool,
    pub origin: String,
}

impl RequirementVersion {
    pub fn from_dependency(dep: &Dependency, origin: &str) -> Self {
        Self {
            name: dep.name(),
            version: dep.version.clone(),
            scope: dep.scope.clone(),
            optional: dep.optional,
            origin: origin.to_string(),
        }
    }

    pub fn is_management(&self) -> bool {
        self.origin == ORIGIN_MANAGEMENT
    }
}

/// What a resolution client supports, resolved once at construction
/// instead of probing the concrete type at call sites.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClientCapabilities {
    /// Whether the client honours per-call registry sets beyond its
    /// built-in default registry.
    pub supports_registries: bool,
}

/// ResolutionClient port: the version/requirement store the graph
/// resolver walks. Typically registry-backed and network-calling; every
/// method checks the cancellation token before issuing a request.
#[async_trait]
pub trait ResolutionClient: Send + Sync {
    fn capabilities(&self) -> ClientCapabilities {
        ClientCapabilities::default()
    }

    /// Known concrete versions of a package, oldest first.
    async fn versions(
        &self,
        ctx: &CancellationToken,
        name: &str,
        registries: &RegistrySet,
    ) -> Result<Vec<String>>;

    /// Declared requirements of one concrete version.
    async fn requirements(
        &self,
        ctx: &CancellationToken,
        key: &VersionKey,
        registries: &RegistrySet,
    ) -> Result<Vec<RequirementVersion>>;
}

#[async_trait]
impl<T: ResolutionClient + ?Sized> ResolutionClient for std::sync::Arc<T> {
    fn capabilities(&self) -> ClientCapabilities {
        (**self).capabilities()
    }

    async fn versions(
        &self,
        ctx: &CancellationToken,
        name: &str,
        registries: &RegistrySet,
    ) -> Result<Vec<String>> {
        (**self).versions(ctx, name, registries).await
    }

    async fn requirements(
        &self,
        ctx: &CancellationToken,
        key: &VersionKey,
        registries: &RegistrySet,
    ) -> Result<Vec<RequirementVersion>> {
        (**self).requirements(ctx, key, registries).await
    }
}
