use crate::error::Result;
use crate::files::{ConflictAction, DiskFiles};
use log::warn;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Name given to exported files
    #[serde(default = "default_export_filename")]
    pub export_filename: String,

    /// Title of the top-level folder each import creates
    #[serde(default = "default_import_folder_title")]
    pub import_folder_title: String,

    /// Label shown on the root of the export tree
    #[serde(default = "default_root_label")]
    pub root_label: String,

    /// Where exports are saved; the user's download directory when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download_dir: Option<PathBuf>,

    /// What to do when the export file already exists
    #[serde(default)]
    pub conflict_action: ConflictAction,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            export_filename: default_export_filename(),
            import_folder_title: default_import_folder_title(),
            root_label: default_root_label(),
            download_dir: None,
            conflict_action: ConflictAction::default(),
        }
    }
}

fn default_export_filename() -> String {
    "bookmarks.json".to_string()
}

fn default_import_folder_title() -> String {
    "Imported Bookmarks".to_string()
}

fn default_root_label() -> String {
    "All".to_string()
}

impl Config {
    /// Load configuration from a file path
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&contents)?;
        Ok(config)
    }

    /// Load configuration from default location (~/.config/markport/config.yml)
    /// Falls back to default config if file doesn't exist
    pub fn load() -> Self {
        let config_path = crate::utils::get_config_dir().join("config.yml");

        if config_path.exists() {
            match Self::load_from_path(&config_path) {
                Ok(config) => config,
                Err(e) => {
                    warn!(
                        "Failed to load config from {:?}: {}; using default configuration",
                        config_path, e
                    );
                    Self::default()
                }
            }
        } else {
            Self::default()
        }
    }

    /// Save configuration to a file path
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        // Create parent directory if it doesn't exist
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(path, self.to_yaml()?)?;
        Ok(())
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Save configuration to default location
    pub fn save(&self) -> Result<()> {
        let config_path = crate::utils::get_config_dir().join("config.yml");
        self.save_to_path(&config_path)
    }

    pub fn download_dir(&self) -> PathBuf {
        self.download_dir
            .clone()
            .unwrap_or_else(crate::utils::get_download_dir)
    }

    /// File port saving exports where this config says
    pub fn disk_files(&self) -> DiskFiles {
        DiskFiles::new(self.download_dir(), self.conflict_action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.export_filename, "bookmarks.json");
        assert_eq!(config.import_folder_title, "Imported Bookmarks");
        assert_eq!(config.root_label, "All");
        assert_eq!(config.conflict_action, ConflictAction::Uniquify);
    }

    #[test]
    fn test_save_and_load() {
        let temp_file = NamedTempFile::new().unwrap();
        let config_path = temp_file.path();

        let original = Config {
            export_filename: "export.json".to_string(),
            download_dir: Some(PathBuf::from("/tmp/exports")),
            conflict_action: ConflictAction::Overwrite,
            ..Config::default()
        };

        original.save_to_path(config_path).unwrap();
        let loaded = Config::load_from_path(config_path).unwrap();

        assert_eq!(original, loaded);
    }

    #[test]
    fn test_load_invalid_yaml() {
        let temp_file = NamedTempFile::new().unwrap();
        let config_path = temp_file.path();

        fs::write(config_path, "invalid: yaml: content:").unwrap();

        let result = Config::load_from_path(config_path);
        assert!(result.is_err());
    }

    #[test]
    fn test_load_partial_config() {
        let temp_file = NamedTempFile::new().unwrap();
        let config_path = temp_file.path();

        fs::write(config_path, "root_label: Everything\nconflict_action: overwrite\n").unwrap();

        let config = Config::load_from_path(config_path).unwrap();
        assert_eq!(config.root_label, "Everything");
        assert_eq!(config.conflict_action, ConflictAction::Overwrite);
        // Should use default for missing fields
        assert_eq!(config.export_filename, default_export_filename());
        assert_eq!(config.download_dir, None);
    }

    #[test]
    fn test_explicit_download_dir_wins() {
        let config = Config {
            download_dir: Some(PathBuf::from("/srv/exports")),
            ..Config::default()
        };
        assert_eq!(config.download_dir(), PathBuf::from("/srv/exports"));
        assert_eq!(config.disk_files().download_dir(), Path::new("/srv/exports"));
    }
}
