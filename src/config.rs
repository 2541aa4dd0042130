// Runtime configuration loaded from YAML

use crate::history::DEFAULT_HISTORY_LIMIT;
use crate::render::ListFormat;
use crate::store::{IdentityMode, TaskStore};
use crate::task::{DEFAULT_CATEGORY, Priority};
use eyre::{Context, Result, eyre};
use serde::{Deserialize, Deserializer, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_DIR_NAME: &str = "tasklist";
const CONFIG_FILE_NAME: &str = "tasklist.yml";

/// User-tunable settings; any field missing from the file takes its default
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub default_category: String,
    #[serde(deserialize_with = "lenient_priority")]
    pub default_priority: Priority,
    /// Number of actions kept for undo (at least 1)
    pub history_limit: usize,
    pub identity: IdentityMode,
    pub color: bool,
    pub list_format: ListFormat,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_category: DEFAULT_CATEGORY.to_string(),
            default_priority: Priority::default(),
            history_limit: DEFAULT_HISTORY_LIMIT,
            identity: IdentityMode::default(),
            color: true,
            list_format: ListFormat::default(),
            log_level: "warn".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from the file chosen by [`Config::locate`], or defaults
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match Self::locate(explicit) {
            Some(path) => Self::from_file(&path),
            None => Ok(Self::default()),
        }
    }

    /// File to read settings from
    ///
    /// An explicit path is always returned (and must exist when loaded).
    /// Without one, the per-user config file is used if present.
    pub fn locate(explicit: Option<&Path>) -> Option<PathBuf> {
        match explicit {
            Some(path) => Some(path.to_path_buf()),
            None => Self::default_path().filter(|path| path.exists()),
        }
    }

    /// `<config_dir>/tasklist/tasklist.yml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).context(format!("Failed to read config file {}", path.display()))?;
        Self::from_yaml(&content).context(format!("Invalid config file {}", path.display()))
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        // An empty document deserializes to unit, not to a mapping
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Config = serde_yaml::from_str(content).context("Failed to parse YAML")?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).context("Failed to serialize config")
    }

    pub fn validate(&self) -> Result<()> {
        if self.history_limit == 0 {
            return Err(eyre!("history_limit must be at least 1"));
        }
        if self.default_category.trim().is_empty() {
            return Err(eyre!("default_category cannot be empty"));
        }
        Ok(())
    }

    /// Build an empty store configured with these settings
    pub fn build_store(&self) -> TaskStore {
        TaskStore::with_options(self.history_limit, self.identity)
    }
}

/// Config files may spell priorities in any case
fn lenient_priority<'de, D>(deserializer: D) -> std::result::Result<Priority, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    Ok(Priority::parse_lenient(&raw))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.default_category, "General");
        assert_eq!(config.default_priority, Priority::Medium);
        assert_eq!(config.history_limit, 10);
        assert_eq!(config.identity, IdentityMode::Positional);
        assert!(config.color);
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = Config::from_yaml("identity: stable\nhistory_limit: 3\n").unwrap();
        assert_eq!(config.identity, IdentityMode::Stable);
        assert_eq!(config.history_limit, 3);
        assert_eq!(config.default_category, "General");
        assert!(config.color);
    }

    #[test]
    fn test_list_format_from_yaml() {
        assert_eq!(Config::default().list_format, ListFormat::Table);
        let config = Config::from_yaml("list_format: json\n").unwrap();
        assert_eq!(config.list_format, ListFormat::Json);
    }

    #[test]
    fn test_empty_yaml_is_default() {
        assert_eq!(Config::from_yaml("").unwrap(), Config::default());
    }

    #[test]
    fn test_zero_history_limit_rejected() {
        let err = Config::from_yaml("history_limit: 0\n").unwrap_err();
        assert!(err.to_string().contains("history_limit"));
    }

    #[test]
    fn test_bad_identity_rejected() {
        assert!(Config::from_yaml("identity: sometimes\n").is_err());
    }

    #[test]
    fn test_yaml_roundtrip_of_priority() {
        let config = Config::from_yaml("default_priority: high\n").unwrap();
        assert_eq!(config.default_priority, Priority::High);

        let yaml = config.to_yaml().unwrap();
        assert!(yaml.contains("default_priority: High"));
        assert!(yaml.contains("identity: positional"));
    }

    #[test]
    fn test_load_from_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("tasklist.yml");
        fs::write(&path, "default_category: Inbox\ncolor: false\n").unwrap();

        let config = Config::load(Some(path.as_path())).unwrap();
        assert_eq!(config.default_category, "Inbox");
        assert!(!config.color);
    }

    #[test]
    fn test_locate_prefers_explicit_path() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("anything.yml");
        assert_eq!(Config::locate(Some(path.as_path())), Some(path));
    }

    #[test]
    fn test_load_missing_explicit_file_fails() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("missing.yml");
        assert!(Config::load(Some(path.as_path())).is_err());
    }

    #[test]
    fn test_build_store_uses_settings() {
        let config = Config::from_yaml("identity: stable\nhistory_limit: 1\n").unwrap();
        let mut store = config.build_store();
        assert_eq!(store.identity_mode(), IdentityMode::Stable);

        store.add("A", "General", "Low", None);
        store.add("B", "General", "Low", None);
        assert_eq!(store.history_len(), 1);
    }
}
