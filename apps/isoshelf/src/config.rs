//! Application configuration.
//!
//! Configuration is stored as TOML:
//! - Linux: `~/.config/isoshelf/config.toml`
//! - Windows: `%APPDATA%/isoshelf/config.toml`

use std::path::{Path, PathBuf};

use isoshelf_browser::{
    DEFAULT_EXTENSIONS, DirectoryLister, EntryOrder, ExtensionWhitelist, SizeFormat,
    default_start_dir,
};
use serde::{Deserialize, Serialize};

/// How size labels are rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SizeStyle {
    #[default]
    Bytes,
    Binary,
}

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// File extensions shown while browsing.
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    /// Directory browsing starts in (home directory when unset).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_dir: Option<String>,

    /// INI file holding the registered source directories.
    #[serde(default = "default_ini_path")]
    pub ini_path: String,

    /// Sort names case-sensitively.
    #[serde(default)]
    pub case_sensitive_sort: bool,

    #[serde(default)]
    pub size_format: SizeStyle,
}

fn default_extensions() -> Vec<String> {
    DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect()
}

fn default_ini_path() -> String {
    config_dir()
        .join("Dolphin.ini")
        .to_string_lossy()
        .into_owned()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            extensions: default_extensions(),
            start_dir: None,
            ini_path: default_ini_path(),
            case_sensitive_sort: false,
            size_format: SizeStyle::default(),
        }
    }
}

impl Config {
    /// Loads configuration from `path`, or creates a default there if not
    /// found.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            let config = Config::default();
            config.save(path)?;
            Ok(config)
        }
    }

    /// Saves the configuration to `path`.
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;

        tracing::debug!(path = %path.display(), "configuration saved");
        Ok(())
    }

    pub fn whitelist(&self) -> ExtensionWhitelist {
        ExtensionWhitelist::new(&self.extensions)
    }

    /// Builds a lister with the configured sort order and size labels.
    pub fn lister(&self) -> DirectoryLister {
        let order = if self.case_sensitive_sort {
            EntryOrder::CaseSensitive
        } else {
            EntryOrder::CaseInsensitive
        };
        let size_format = match self.size_format {
            SizeStyle::Bytes => SizeFormat::Bytes,
            SizeStyle::Binary => SizeFormat::Binary,
        };
        DirectoryLister::new().order(order).size_format(size_format)
    }

    pub fn start_dir(&self) -> PathBuf {
        match self.start_dir.as_deref() {
            Some(dir) if !dir.is_empty() => expand_home(dir),
            _ => default_start_dir(),
        }
    }

    pub fn ini_path(&self) -> PathBuf {
        expand_home(&self.ini_path)
    }
}

/// Returns the platform-specific configuration file path.
pub fn config_path() -> PathBuf {
    config_dir().join("config.toml")
}

fn config_dir() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        let appdata =
            std::env::var("APPDATA").unwrap_or_else(|_| "C:\\Users\\Default\\AppData".into());
        PathBuf::from(appdata).join("isoshelf")
    }

    #[cfg(not(target_os = "windows"))]
    {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".into());
        PathBuf::from(home).join(".config").join("isoshelf")
    }
}

/// Expands a `~` prefix to the user's home directory.
fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        default_start_dir().join(rest)
    } else if path == "~" {
        default_start_dir()
    } else {
        PathBuf::from(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = Config::default();
        assert_eq!(config.extensions.len(), DEFAULT_EXTENSIONS.len());
        assert!(config.start_dir.is_none());
        assert!(config.ini_path.ends_with("Dolphin.ini"));
        assert!(!config.case_sensitive_sort);
        assert_eq!(config.size_format, SizeStyle::Bytes);
    }

    #[test]
    fn config_roundtrip_toml() {
        let config = Config {
            extensions: vec![".iso".into(), ".rvz".into()],
            start_dir: Some("/media/usb".into()),
            ini_path: "/opt/dolphin/Dolphin.ini".into(),
            case_sensitive_sort: true,
            size_format: SizeStyle::Binary,
        };

        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();

        assert_eq!(parsed.extensions, vec![".iso", ".rvz"]);
        assert_eq!(parsed.start_dir.as_deref(), Some("/media/usb"));
        assert_eq!(parsed.ini_path, "/opt/dolphin/Dolphin.ini");
        assert!(parsed.case_sensitive_sort);
        assert_eq!(parsed.size_format, SizeStyle::Binary);
    }

    #[test]
    fn config_partial_toml() {
        // Only specify extensions, rest should use defaults.
        let toml_str = r#"extensions = ["ISO", "wbfs"]"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert!(config.whitelist().contains(".iso"));
        assert!(config.whitelist().contains(".wbfs"));
        assert!(!config.whitelist().contains(".gcz"));
        assert!(config.ini_path.ends_with("Dolphin.ini"));
        assert_eq!(config.size_format, SizeStyle::Bytes);
    }

    #[test]
    fn config_path_not_empty() {
        let path = config_path();
        assert!(path.to_string_lossy().contains("isoshelf"));
    }

    #[test]
    fn config_save_and_load() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("nested").join("config.toml");

        let config = Config {
            start_dir: Some("/media".into()),
            ..Config::default()
        };
        config.save(&path).unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded.start_dir(), PathBuf::from("/media"));
    }

    #[test]
    fn load_creates_default_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.toml");

        let config = Config::load(&path).unwrap();
        assert!(path.exists());
        assert_eq!(config.extensions.len(), DEFAULT_EXTENSIONS.len());
    }

    #[test]
    fn expand_home_prefix() {
        assert_eq!(expand_home("/opt/games"), PathBuf::from("/opt/games"));
        assert_eq!(expand_home("~/roms"), default_start_dir().join("roms"));
    }
}
