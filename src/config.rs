//! Configuration file support for pomscan.
//!
//! Provides YAML-based configuration through `pomscan.config.yml`
//! files, including data structures, file loading, and validation.

use anyhow::{bail, Context};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use tracing::warn;

use crate::shared::Result;

const CONFIG_FILENAME: &str = "pomscan.config.yml";

/// Top-level configuration file schema.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    /// Default registry URL used instead of Maven Central.
    pub registry: Option<String>,
    /// Default output format ("json" or "markdown").
    pub format: Option<String>,
    /// Captures unknown fields for warnings.
    #[serde(flatten)]
    pub unknown_fields: HashMap<String, serde_yaml_ng::Value>,
}

/// Load config from an explicit path. Returns an error if the file is not found.
pub fn load_config_from_path(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file: {}", path.display()))?;

    let config: ConfigFile = serde_yaml_ng::from_str(&content)
        .with_context(|| format!("failed to parse config file: {}", path.display()))?;

    validate_config(&config)?;
    warn_unknown_fields(&config);

    Ok(config)
}

/// Auto-discover config in a directory. Returns `None` silently if not found.
pub fn discover_config(dir: &Path) -> Result<Option<ConfigFile>> {
    let config_path = dir.join(CONFIG_FILENAME);

    if !config_path.exists() {
        return Ok(None);
    }

    let config = load_config_from_path(&config_path)?;
    Ok(Some(config))
}

/// Validate the loaded configuration.
fn validate_config(config: &ConfigFile) -> Result<()> {
    if let Some(registry) = &config.registry {
        if registry.trim().is_empty() {
            bail!("invalid config: registry must not be empty");
        }
        if !registry.starts_with("http://") && !registry.starts_with("https://") {
            bail!("invalid config: registry must be an http(s) URL, got {registry}");
        }
    }
    if let Some(format) = &config.format {
        match format.to_lowercase().as_str() {
            "json" | "markdown" | "md" => {}
            other => bail!("invalid config: unknown format {other}"),
        }
    }
    Ok(())
}

/// Warn about unknown fields in the config file.
fn warn_unknown_fields(config: &ConfigFile) {
    for key in config.unknown_fields.keys() {
        warn!(field = %key, "unknown config field will be ignored");
    }
}
