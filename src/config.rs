//! Configuration file support for sbom-assembler.
//!
//! Provides YAML-based configuration through `sbom-assembler.config.yml` files,
//! including data structures, file loading, and validation.

use anyhow::{bail, Context};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use sbom_assembler::application::dto::OutputFormat;
use sbom_assembler::sbom_generation::domain::ComponentType;
use sbom_assembler::shared::Result;

pub const CONFIG_FILENAME: &str = "sbom-assembler.config.yml";

/// Top-level configuration file schema.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    pub format: Option<String>,
    pub exclude: Option<Vec<String>>,
    pub exclude_dev: Option<bool>,
    pub exclude_test_projects: Option<bool>,
    pub root: Option<RootConfig>,
    pub serial_number: Option<bool>,
    pub timestamp: Option<bool>,
    pub max_concurrency: Option<usize>,
    /// Captures unknown fields for warnings.
    #[serde(flatten)]
    pub unknown_fields: HashMap<String, serde_yaml_ng::Value>,
}

/// Explicit identity for the BOM root.
#[derive(Debug, Deserialize, Default)]
pub struct RootConfig {
    pub name: Option<String>,
    pub version: Option<String>,
    #[serde(rename = "type")]
    pub component_type: Option<String>,
}

impl ConfigFile {
    pub fn output_format(&self) -> Result<Option<OutputFormat>> {
        self.format
            .as_deref()
            .map(OutputFormat::from_str)
            .transpose()
            .map_err(anyhow::Error::msg)
    }

    pub fn root_type(&self) -> Result<Option<ComponentType>> {
        self.root
            .as_ref()
            .and_then(|root| root.component_type.as_deref())
            .map(ComponentType::from_str)
            .transpose()
            .map_err(anyhow::Error::msg)
    }
}

/// Load config from an explicit path. Returns an error if the file is not found.
pub fn load_config_from_path(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path).with_context(|| {
        format!(
            "Failed to read config file: {}\n\n💡 Hint: Check that the file exists and is readable.",
            path.display()
        )
    })?;

    let config: ConfigFile = serde_yaml_ng::from_str(&content).with_context(|| {
        format!(
            "Failed to parse config file: {}\n\n💡 Hint: Ensure the file contains valid YAML syntax.",
            path.display()
        )
    })?;

    validate_config(&config)
        .with_context(|| format!("Invalid config file: {}", path.display()))?;
    warn_unknown_fields(&config);

    Ok(config)
}

/// Auto-discover config in a directory. Returns `None` silently if not found.
pub fn discover_config(dir: &Path) -> Result<Option<(PathBuf, ConfigFile)>> {
    let config_path = dir.join(CONFIG_FILENAME);

    if !config_path.exists() {
        return Ok(None);
    }

    let config = load_config_from_path(&config_path)?;
    Ok(Some((config_path, config)))
}

/// Validate the loaded configuration.
fn validate_config(config: &ConfigFile) -> Result<()> {
    config.output_format()?;
    config.root_type()?;

    if let Some(ref patterns) = config.exclude {
        for (i, pattern) in patterns.iter().enumerate() {
            if pattern.trim().is_empty() {
                bail!(
                    "Invalid config: exclude[{}] must not be empty.\n\n\
                     💡 Hint: Remove the entry or give it a component name pattern (e.g., \"xunit*\").",
                    i
                );
            }
        }
    }

    if config.max_concurrency == Some(0) {
        bail!("Invalid config: max_concurrency must be at least 1.");
    }

    Ok(())
}

/// Warn about unknown fields in the config file.
fn warn_unknown_fields(config: &ConfigFile) {
    let mut keys: Vec<&String> = config.unknown_fields.keys().collect();
    keys.sort();
    for key in keys {
        eprintln!(
            "⚠️  Warning: Unknown config field '{}' will be ignored.",
            key
        );
    }
}
