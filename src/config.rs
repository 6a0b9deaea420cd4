//! Migration configuration
//!
//! TOML configuration for a migration run: where the legacy and target
//! services live and how filter rule imports should behave. Credential and
//! session handling live in the driving process, not here — this is plain
//! configuration data.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{MigrateError, Result};

/// Top-level migration configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MigrationConfig {
    /// Legacy Zimbra endpoint
    #[serde(default)]
    pub zimbra: ZimbraConfig,

    /// Target JMAP endpoint
    #[serde(default)]
    pub jmap: JmapConfig,

    /// Filter rule import policy
    #[serde(default)]
    pub filters: FilterImportPolicy,
}

/// Legacy Zimbra endpoint identity
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ZimbraConfig {
    /// SOAP service hostname
    pub host: Option<String>,

    /// Account name to migrate
    pub user: Option<String>,
}

/// Target JMAP endpoint identity
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JmapConfig {
    /// JMAP session URL
    pub url: Option<String>,

    /// Target account identifier
    pub account_id: Option<String>,
}

/// Policy knobs for the filter rule merge
///
/// Both default to the safe setting: merged rules land inactive and the
/// merge never overwrites an active rule without being told to.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilterImportPolicy {
    /// Keep the imported rules' `active` flags instead of importing
    /// everything inactive
    #[serde(default)]
    pub preserve_active: bool,

    /// Overwrite base-name slots directly, skipping the conflict search
    #[serde(default)]
    pub force: bool,
}

/// Get default config paths
pub fn default_config_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    // XDG config path
    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("zmigrate").join("config.toml"));
    }

    // Home directory fallback
    if let Some(home_dir) = dirs::home_dir() {
        paths.push(home_dir.join(".config").join("zmigrate").join("config.toml"));
        paths.push(home_dir.join(".zmigrate.toml"));
    }

    paths
}

/// Load configuration from the first default path that exists
///
/// Falls back to defaults when no config file is present.
pub fn load_default() -> Result<MigrationConfig> {
    for path in default_config_paths() {
        if path.exists() {
            info!("Found config at: {:?}", path);
            return load_from_path(&path);
        }
    }

    info!("No config file found, using defaults");
    Ok(MigrationConfig::default())
}

/// Load configuration from a specific path
pub fn load_from_path(path: &Path) -> Result<MigrationConfig> {
    info!("Loading configuration from: {:?}", path);

    let content = fs::read_to_string(path)
        .map_err(|e| MigrateError::Config(format!("Failed to read config: {}", e)))?;

    let config: MigrationConfig = toml::from_str(&content)
        .map_err(|e| MigrateError::Config(format!("Failed to parse config: {}", e)))?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_toml() {
        let config: MigrationConfig = toml::from_str("").unwrap();
        assert!(config.zimbra.host.is_none());
        assert!(!config.filters.preserve_active);
        assert!(!config.filters.force);
    }

    #[test]
    fn test_parse_full_config() {
        let config: MigrationConfig = toml::from_str(
            r#"
[zimbra]
host = "mail.example.com"
user = "user@example.com"

[jmap]
url = "https://jmap.example.com/.well-known/jmap"
account_id = "a0"

[filters]
preserve_active = true
"#,
        )
        .unwrap();
        assert_eq!(config.zimbra.host.as_deref(), Some("mail.example.com"));
        assert_eq!(config.jmap.account_id.as_deref(), Some("a0"));
        assert!(config.filters.preserve_active);
        assert!(!config.filters.force);
    }
}
