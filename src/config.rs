//! Application configuration
//!
//! Settings live in `~/.salary-tax/config.toml`; environment variables win
//! over the file. A missing file is not an error.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::AppError;

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash-latest";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

pub const ENV_API_KEY: &str = "GEMINI_API_KEY";
pub const ENV_DB_PATH: &str = "SALARY_TAX_DB";
pub const ENV_GEMINI_URL: &str = "SALARY_TAX_GEMINI_URL";

/// Directory holding config, database and conversation log (~/.salary-tax)
pub fn app_dir() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME environment variable not set")?;
    Ok(PathBuf::from(home).join(".salary-tax"))
}

/// Resolved settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub gemini_base_url: String,
    pub db_path: Option<PathBuf>,
    pub conversation_log: PathBuf,
}

/// On-disk shape of config.toml; every key is optional
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    gemini_api_key: Option<String>,
    gemini_model: Option<String>,
    gemini_base_url: Option<String>,
    db_path: Option<PathBuf>,
    conversation_log: Option<PathBuf>,
}

impl AppConfig {
    /// Load from the default location and apply environment overrides
    pub fn load() -> Result<Self> {
        let dir = app_dir()?;
        let config = Self::from_file(&dir.join("config.toml"), &dir)?;
        Ok(config.with_env_overrides(|key| std::env::var(key).ok()))
    }

    /// Read a config file; `base_dir` anchors the default conversation log
    pub fn from_file(path: &Path, base_dir: &Path) -> Result<Self> {
        let file = if path.exists() {
            info!("Loading config from {:?}", path);
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file {:?}", path))?;
            Self::parse_file(&text)?
        } else {
            debug!("No config file at {:?}, using defaults", path);
            ConfigFile::default()
        };

        Ok(Self::from_parts(file, base_dir))
    }

    /// Parse config.toml contents
    pub fn from_toml(text: &str, base_dir: &Path) -> Result<Self> {
        Ok(Self::from_parts(Self::parse_file(text)?, base_dir))
    }

    fn parse_file(text: &str) -> Result<ConfigFile> {
        toml::from_str(text).map_err(|e| AppError::Config(e.to_string()).into())
    }

    fn from_parts(file: ConfigFile, base_dir: &Path) -> Self {
        Self {
            gemini_api_key: file.gemini_api_key.filter(|k| !k.trim().is_empty()),
            gemini_model: file
                .gemini_model
                .unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
            gemini_base_url: file
                .gemini_base_url
                .unwrap_or_else(|| DEFAULT_GEMINI_BASE_URL.to_string()),
            db_path: file.db_path,
            conversation_log: file
                .conversation_log
                .unwrap_or_else(|| base_dir.join("ai_conversation_log.json")),
        }
    }

    /// Apply environment overrides through `lookup` (std::env::var in production)
    pub fn with_env_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup(ENV_API_KEY).filter(|k| !k.trim().is_empty()) {
            self.gemini_api_key = Some(key);
        }
        if let Some(path) = lookup(ENV_DB_PATH).filter(|p| !p.is_empty()) {
            self.db_path = Some(PathBuf::from(path));
        }
        if let Some(url) = lookup(ENV_GEMINI_URL).filter(|u| !u.is_empty()) {
            self.gemini_base_url = url;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = AppConfig::from_file(&dir.path().join("config.toml"), dir.path()).unwrap();

        assert_eq!(config.gemini_api_key, None);
        assert_eq!(config.gemini_model, DEFAULT_GEMINI_MODEL);
        assert_eq!(config.gemini_base_url, DEFAULT_GEMINI_BASE_URL);
        assert_eq!(config.db_path, None);
        assert_eq!(
            config.conversation_log,
            dir.path().join("ai_conversation_log.json")
        );
    }

    #[test]
    fn test_file_values_are_used() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "gemini_api_key = \"abc\"\ngemini_model = \"gemini-pro\"\ndb_path = \"/tmp/tax.db\"\n",
        )
        .unwrap();

        let config = AppConfig::from_file(&path, dir.path()).unwrap();
        assert_eq!(config.gemini_api_key.as_deref(), Some("abc"));
        assert_eq!(config.gemini_model, "gemini-pro");
        assert_eq!(config.db_path, Some(PathBuf::from("/tmp/tax.db")));
    }

    #[test]
    fn test_blank_api_key_is_ignored() {
        let config = AppConfig::from_toml("gemini_api_key = \"  \"", Path::new("/x")).unwrap();
        assert_eq!(config.gemini_api_key, None);
    }

    #[test]
    fn test_malformed_file_is_a_config_error() {
        let err = AppConfig::from_toml("gemini_model = [", Path::new("/x")).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<AppError>(),
            Some(AppError::Config(_))
        ));

        let err = AppConfig::from_toml("unknown_key = 1", Path::new("/x")).unwrap_err();
        assert!(err.to_string().starts_with("config error"));
    }

    #[test]
    fn test_env_overrides_win() {
        let env: HashMap<&str, &str> = HashMap::from([
            (ENV_API_KEY, "from-env"),
            (ENV_DB_PATH, "/data/tax.db"),
            (ENV_GEMINI_URL, "http://localhost:9999"),
        ]);
        let config = AppConfig::from_toml("gemini_api_key = \"from-file\"", Path::new("/x"))
            .unwrap()
            .with_env_overrides(|k| env.get(k).map(|v| v.to_string()));

        assert_eq!(config.gemini_api_key.as_deref(), Some("from-env"));
        assert_eq!(config.db_path, Some(PathBuf::from("/data/tax.db")));
        assert_eq!(config.gemini_base_url, "http://localhost:9999");
    }
}
