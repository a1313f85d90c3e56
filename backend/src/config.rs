//! # Configuration
//!
//! Runtime settings, read from an optional `config.yaml` in the data
//! directory.
//!
//! ## Data directory resolution
//!
//! 1. an explicit override (the `--data-dir` flag)
//! 2. the `LUXE_SPEND_DATA_DIR` environment variable
//! 3. the platform data directory, e.g. `~/.local/share/LuxeSpend`
//! 4. `LuxeSpend` under the system temp directory
//!
//! ## YAML Format
//!
//! ```yaml
//! storage_key: "luxe_spend_data_v1"
//! export_directory: "/home/me/Documents/finance"
//! default_budget_limit: 2000.0
//! currency_symbol: "$"
//! ```
//!
//! Every field is optional. A malformed file is logged and ignored.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::storage::json::connection::DEFAULT_STORAGE_KEY;
use shared::DEFAULT_BUDGET_LIMIT;

pub const DATA_DIR_ENV_VAR: &str = "LUXE_SPEND_DATA_DIR";
pub const CONFIG_FILE_NAME: &str = "config.yaml";
const APP_DIR_NAME: &str = "LuxeSpend";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Resolved at startup, never read from the file
    #[serde(skip)]
    pub data_directory: PathBuf,
    /// Name of the state document inside the data directory
    pub storage_key: String,
    /// Where exports go when no path is given
    pub export_directory: Option<PathBuf>,
    /// Budget limit used when no state has been stored yet
    pub default_budget_limit: f64,
    pub currency_symbol: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_directory: std::env::temp_dir().join(APP_DIR_NAME),
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            export_directory: None,
            default_budget_limit: DEFAULT_BUDGET_LIMIT,
            currency_symbol: "$".to_string(),
        }
    }
}

impl AppConfig {
    /// Resolve the data directory and read its config file
    pub fn load(data_dir_override: Option<PathBuf>) -> Self {
        let env_value = std::env::var(DATA_DIR_ENV_VAR).ok();
        let data_directory = resolve_data_directory(data_dir_override, env_value);
        Self::load_from_directory(&data_directory)
    }

    /// Read `config.yaml` from `data_directory`, defaulting what is missing
    pub fn load_from_directory(data_directory: &Path) -> Self {
        let config_path = data_directory.join(CONFIG_FILE_NAME);

        let mut config = if config_path.exists() {
            match fs::read_to_string(&config_path)
                .map_err(|e| e.to_string())
                .and_then(|content| {
                    serde_yaml::from_str::<AppConfig>(&content).map_err(|e| e.to_string())
                }) {
                Ok(config) => {
                    debug!("Loaded config from {:?}", config_path);
                    config
                }
                Err(e) => {
                    warn!("Ignoring invalid config file {:?}: {}", config_path, e);
                    AppConfig::default()
                }
            }
        } else {
            debug!("No config file at {:?}, using defaults", config_path);
            AppConfig::default()
        };

        config.data_directory = data_directory.to_path_buf();
        if config.storage_key.trim().is_empty() {
            warn!("Empty storage_key in config, using {}", DEFAULT_STORAGE_KEY);
            config.storage_key = DEFAULT_STORAGE_KEY.to_string();
        }

        info!("Using data directory {}", config.data_directory.display());
        config
    }
}

/// Pick the data directory from the override, the environment, or the
/// platform default
pub fn resolve_data_directory(
    data_dir_override: Option<PathBuf>,
    env_value: Option<String>,
) -> PathBuf {
    data_dir_override
        .or_else(|| {
            env_value
                .filter(|value| !value.trim().is_empty())
                .map(PathBuf::from)
        })
        .or_else(|| dirs::data_dir().map(|dir| dir.join(APP_DIR_NAME)))
        .unwrap_or_else(|| std::env::temp_dir().join(APP_DIR_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_resolve_prefers_override_then_env() {
        let resolved = resolve_data_directory(
            Some(PathBuf::from("/tmp/override")),
            Some("/tmp/env".to_string()),
        );
        assert_eq!(resolved, PathBuf::from("/tmp/override"));

        let resolved = resolve_data_directory(None, Some("/tmp/env".to_string()));
        assert_eq!(resolved, PathBuf::from("/tmp/env"));

        let resolved = resolve_data_directory(None, Some("  ".to_string()));
        assert!(resolved.ends_with(APP_DIR_NAME));
    }

    #[test]
    fn test_missing_config_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();

        let config = AppConfig::load_from_directory(temp_dir.path());

        assert_eq!(config.data_directory, temp_dir.path());
        assert_eq!(config.storage_key, "luxe_spend_data_v1");
        assert_eq!(config.default_budget_limit, 2000.0);
        assert_eq!(config.currency_symbol, "$");
        assert!(config.export_directory.is_none());
    }

    #[test]
    fn test_partial_config_file() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(
            temp_dir.path().join(CONFIG_FILE_NAME),
            "currency_symbol: \"€\"\ndefault_budget_limit: 1500\n",
        )
        .unwrap();

        let config = AppConfig::load_from_directory(temp_dir.path());

        assert_eq!(config.currency_symbol, "€");
        assert_eq!(config.default_budget_limit, 1500.0);
        assert_eq!(config.storage_key, "luxe_spend_data_v1");
    }

    #[test]
    fn test_invalid_config_file_is_ignored() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join(CONFIG_FILE_NAME), "default_budget_limit: [oops").unwrap();

        let config = AppConfig::load_from_directory(temp_dir.path());

        assert_eq!(config.default_budget_limit, 2000.0);
        assert_eq!(config.data_directory, temp_dir.path());
    }

    #[test]
    fn test_blank_storage_key_falls_back() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join(CONFIG_FILE_NAME), "storage_key: \"\"\n").unwrap();

        let config = AppConfig::load_from_directory(temp_dir.path());
        assert_eq!(config.storage_key, "luxe_spend_data_v1");
    }
}
