//! Configuration file support.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Application configuration loaded from config file.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Default data directory
    pub data_dir: Option<PathBuf>,

    /// Log filter directive, e.g. "corpus_vault=debug"
    pub log: Option<String>,
}

impl Config {
    /// Load configuration from the default config file location.
    ///
    /// Returns default config if the file doesn't exist.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from a specific file.
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(config_path)
            .with_context(|| format!("failed to read config file: {}", config_path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", config_path.display()))
    }

    /// Returns the path to the config file.
    ///
    /// Default: `~/.config/corpus-vault/config.toml`
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("corpus-vault")
            .join("config.toml")
    }

    /// Resolve the data directory, with CLI argument taking precedence.
    ///
    /// Precedence order:
    /// 1. CLI `--dir` argument
    /// 2. Config file `data_dir` setting
    /// 3. Platform data directory (e.g. `~/.local/share/corpus-vault`)
    pub fn data_dir(&self, cli_dir: Option<&PathBuf>) -> PathBuf {
        cli_dir
            .cloned()
            .or_else(|| self.data_dir.clone())
            .unwrap_or_else(|| {
                dirs::data_dir()
                    .unwrap_or_else(|| PathBuf::from("."))
                    .join("corpus-vault")
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn default_config_has_no_dir() {
        let config = Config::default();
        assert!(config.data_dir.is_none());
        assert!(config.log.is_none());
    }

    #[test]
    fn data_dir_prefers_cli_arg() {
        let config = Config {
            data_dir: Some(PathBuf::from("/config/vault")),
            log: None,
        };
        let cli_dir = PathBuf::from("/cli/vault");
        assert_eq!(config.data_dir(Some(&cli_dir)), PathBuf::from("/cli/vault"));
    }

    #[test]
    fn data_dir_falls_back_to_config() {
        let config = Config {
            data_dir: Some(PathBuf::from("/config/vault")),
            log: None,
        };
        assert_eq!(config.data_dir(None), PathBuf::from("/config/vault"));
    }

    #[test]
    fn data_dir_falls_back_to_platform_dir() {
        let config = Config::default();
        assert!(config.data_dir(None).ends_with("corpus-vault"));
    }

    #[test]
    fn config_path_is_in_config_dir() {
        let path = Config::config_path();
        assert!(path.ends_with("corpus-vault/config.toml"));
    }

    #[test]
    fn missing_file_gives_defaults() {
        let temp = TempDir::new().unwrap();
        let config = Config::load_from(&temp.path().join("nope.toml")).unwrap();
        assert!(config.data_dir.is_none());
    }

    #[test]
    fn parses_toml() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(&path, "data_dir = \"/srv/vault\"\nlog = \"debug\"\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.data_dir, Some(PathBuf::from("/srv/vault")));
        assert_eq!(config.log.as_deref(), Some("debug"));
    }

    #[test]
    fn invalid_toml_is_an_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(&path, "data_dir = [").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(format!("{err:#}").contains("failed to parse config file"));
    }
}
