use crate::maven::model::Project;
use crate::maven::parser::parse_project;
use crate::ports::outbound::registry_client::{Registry, RegistryClient, RegistrySet};
use crate::shared::{Result, ScanError};
use async_trait::async_trait;
use quick_xml::events::Event;
use quick_xml::Reader;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// URL of the Maven Central repository, the default registry.
pub const MAVEN_CENTRAL: &str = "https://repo.maven.apache.org/maven2";

/// HttpRegistryClient adapter fetching POMs and version metadata from
/// Maven registries over HTTP.
///
/// Requests go to the default registry first, then to each registry in
/// the per-call set whose release/snapshot policy admits the requested
/// version. The first registry that answers wins; version listings are
/// merged across all answering registries.
pub struct HttpRegistryClient {
    client: reqwest::Client,
    default_registry: Registry,
    max_retries: u32,
}

impl HttpRegistryClient {
    /// Creates a client with the given default registry URL, falling
    /// back to Maven Central.
    pub fn new(default_url: Option<&str>) -> Result<Self> {
        let version = env!("CARGO_PKG_VERSION");
        let user_agent = format!("pomscan/{}", version);
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        let url = default_url.unwrap_or(MAVEN_CENTRAL).trim_end_matches('/');
        Ok(Self {
            client,
            default_registry: Registry {
                url: url.to_string(),
                id: "default".to_string(),
                releases_enabled: true,
                snapshots_enabled: false,
            },
            max_retries: 3,
        })
    }

    /// Validates a URL path component before it is interpolated into a
    /// registry request.
    fn validate_url_component(component: &str, component_type: &str) -> Result<()> {
        if component.contains('/') || component.contains('\\') {
            anyhow::bail!("{} contains path separators which are not allowed", component_type);
        }
        if component.contains("..") {
            anyhow::bail!("{} contains '..' which is not allowed", component_type);
        }
        if component.contains('#') || component.contains('?') || component.contains('@') {
            anyhow::bail!("{} contains URL-unsafe characters", component_type);
        }
        Ok(())
    }

    /// The registries to try for a version: the default plus every
    /// registry from the set whose policy admits it.
    fn candidates<'a>(&'a self, registries: &'a RegistrySet, version: &str) -> Vec<&'a Registry> {
        let snapshot = version.ends_with("-SNAPSHOT");
        let mut result = vec![&self.default_registry];
        for registry in registries.registries() {
            let admitted = if snapshot {
                registry.snapshots_enabled
            } else {
                registry.releases_enabled
            };
            if admitted && registry.url != self.default_registry.url {
                result.push(registry);
            }
        }
        result
    }

    fn group_path(group_id: &str) -> String {
        group_id
            .split('.')
            .map(|segment| urlencoding::encode(segment).into_owned())
            .collect::<Vec<_>>()
            .join("/")
    }

    fn pom_url(base: &str, group_id: &str, artifact_id: &str, version: &str) -> String {
        let artifact = urlencoding::encode(artifact_id);
        let version = urlencoding::encode(version);
        format!(
            "{}/{}/{}/{}/{}-{}.pom",
            base.trim_end_matches('/'),
            Self::group_path(group_id),
            artifact,
            version,
            artifact,
            version
        )
    }

    fn metadata_url(base: &str, group_id: &str, artifact_id: &str) -> String {
        format!(
            "{}/{}/{}/maven-metadata.xml",
            base.trim_end_matches('/'),
            Self::group_path(group_id),
            urlencoding::encode(artifact_id)
        )
    }

    /// Issues a GET with retry and backoff; the cancellation token is
    /// checked before every attempt.
    async fn get_with_retry(&self, ctx: &CancellationToken, url: &str) -> Result<Vec<u8>> {
        let mut last_error = None;

        for attempt in 1..=self.max_retries {
            if ctx.is_cancelled() {
                return Err(ScanError::Cancelled.into());
            }
            match self.get_once(url).await {
                Ok(body) => return Ok(body),
                Err(e) => {
                    last_error = Some(e);
                    if attempt < self.max_retries {
                        tokio::time::sleep(Duration::from_millis(100 * attempt as u64)).await;
                    }
                }
            }
        }

        Err(last_error.unwrap())
    }

    async fn get_once(&self, url: &str) -> Result<Vec<u8>> {
        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            anyhow::bail!("registry returned status code {}", response.status());
        }
        Ok(response.bytes().await?.to_vec())
    }
}

/// Parses the `<versions>` list out of a maven-metadata.xml document.
fn parse_metadata_versions(data: &[u8]) -> Result<Vec<String>> {
    let mut reader = Reader::from_reader(data);
    reader.config_mut().trim_text(true);

    let mut versions = Vec::new();
    let mut stack: Vec<String> = Vec::new();
    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                stack.push(String::from_utf8_lossy(e.name().as_ref()).to_string());
            }
            Ok(Event::End(_)) => {
                stack.pop();
            }
            Ok(Event::Text(t)) => {
                if stack.last().map(String::as_str) == Some("version")
                    && stack.iter().any(|s| s == "versions")
                {
                    let text = reader
                        .decoder()
                        .decode(t.as_ref())
                        .map_err(|e| anyhow::anyhow!("invalid metadata encoding: {e}"))?
                        .trim()
                        .to_string();
                    if !text.is_empty() {
                        versions.push(text);
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => anyhow::bail!("invalid maven-metadata.xml: {e}"),
            _ => {}
        }
        buf.clear();
    }
    Ok(versions)
}

#[async_trait]
impl RegistryClient for HttpRegistryClient {
    async fn fetch_project(
        &self,
        ctx: &CancellationToken,
        group_id: &str,
        artifact_id: &str,
        version: &str,
        registries: &RegistrySet,
    ) -> Result<Project> {
        Self::validate_url_component(artifact_id, "Artifact id")?;
        Self::validate_url_component(version, "Version")?;

        let coordinate = format!("{group_id}:{artifact_id}:{version}");
        let mut last_error = None;
        for registry in self.candidates(registries, version) {
            let url = Self::pom_url(&registry.url, group_id, artifact_id, version);
            match self.get_with_retry(ctx, &url).await {
                Ok(body) => {
                    return parse_project(&body).map_err(|e| {
                        ScanError::Registry {
                            coordinate: coordinate.clone(),
                            details: format!("{e:#}"),
                        }
                        .into()
                    });
                }
                Err(e) => {
                    if ScanError::is_cancelled(&e) {
                        return Err(e);
                    }
                    last_error = Some(e);
                }
            }
        }

        Err(ScanError::Registry {
            coordinate,
            details: last_error
                .map(|e| format!("{e:#}"))
                .unwrap_or_else(|| "no registry admitted the version".to_string()),
        }
        .into())
    }

    async fn fetch_versions(
        &self,
        ctx: &CancellationToken,
        group_id: &str,
        artifact_id: &str,
        registries: &RegistrySet,
    ) -> Result<Vec<String>> {
        Self::validate_url_component(artifact_id, "Artifact id")?;

        let mut merged: Vec<String> = Vec::new();
        let mut last_error = None;
        for registry in self.candidates(registries, "") {
            let url = Self::metadata_url(&registry.url, group_id, artifact_id);
            match self.get_with_retry(ctx, &url).await {
                Ok(body) => {
                    for version in parse_metadata_versions(&body)? {
                        if !merged.contains(&version) {
                            merged.push(version);
                        }
                    }
                }
                Err(e) => {
                    if ScanError::is_cancelled(&e) {
                        return Err(e);
                    }
                    last_error = Some(e);
                }
            }
        }

        if merged.is_empty() {
            if let Some(e) = last_error {
                return Err(ScanError::Registry {
                    coordinate: format!("{group_id}:{artifact_id}"),
                    details: format!("{e:#}"),
                }
                .into());
            }
        }
        Ok(merged)
    }
}
