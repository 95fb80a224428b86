use crate::cli::Args;
use crate::core::error::ChatError;
use crate::providers::gemini::{DEFAULT_BASE_URL, DEFAULT_MODEL};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Optional settings file. Holds connection settings only; conversations are
/// never written to disk.
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub persona: Option<String>,
}

/// Effective settings after merging flags, file and defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub persona: Option<String>,
}

impl Config {
    fn config_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".aiconnect")
    }

    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.yaml")
    }

    /// Loads the user's config file. A missing file means defaults.
    pub fn load() -> Result<Config, ChatError> {
        Self::load_or_default(&Self::config_path())
    }

    pub fn load_or_default(path: &Path) -> Result<Config, ChatError> {
        if !path.exists() {
            return Ok(Config::default());
        }
        Self::load_from(path)
    }

    pub fn load_from(path: &Path) -> Result<Config, ChatError> {
        let contents = fs::read_to_string(path)?;
        if contents.trim().is_empty() {
            return Ok(Config::default());
        }
        serde_yml::from_str::<Config>(&contents)
            .map_err(|e| ChatError::Config(format!("Parse {}: {}", path.display(), e)))
    }

    /// Command-line flags win over the file, the file over defaults.
    pub fn resolve(&self, args: &Args) -> Settings {
        Settings {
            api_key: args
                .api_key
                .clone()
                .or_else(|| self.api_key.clone())
                .filter(|key| !key.trim().is_empty()),
            base_url: args
                .base_url
                .clone()
                .or_else(|| self.base_url.clone())
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            model: args
                .model
                .clone()
                .or_else(|| self.model.clone())
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            persona: args.persona.clone().or_else(|| self.persona.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use tempfile::TempDir;

    #[test]
    fn load_reads_yaml_fields() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "api_key: secret\npersona: teacher\n").unwrap();

        let config = Config::load_or_default(&path).unwrap();
        assert_eq!(config.api_key.as_deref(), Some("secret"));
        assert_eq!(config.persona.as_deref(), Some("teacher"));
        assert_eq!(config.model, None);
    }

    #[test]
    fn missing_file_is_default_and_not_created() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(".aiconnect").join("config.yaml");

        assert_eq!(Config::load_or_default(&path).unwrap(), Config::default());
        assert!(!path.exists());
        assert!(!path.parent().unwrap().exists());
    }

    #[test]
    fn empty_file_is_default() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "\n").unwrap();
        assert_eq!(Config::load_from(&path).unwrap(), Config::default());
    }

    #[test]
    fn invalid_yaml_is_config_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "model: [unterminated").unwrap();
        assert!(matches!(Config::load_from(&path), Err(ChatError::Config(_))));
    }

    #[test]
    fn flags_override_file_which_overrides_defaults() {
        let config = Config {
            api_key: Some("from-file".to_string()),
            model: Some("gemini-file".to_string()),
            ..Default::default()
        };

        let args = Args::try_parse_from(["aiconnect", "--model", "gemini-flag"]).unwrap();
        let settings = config.resolve(&args);
        assert_eq!(settings.api_key.as_deref(), Some("from-file"));
        assert_eq!(settings.model, "gemini-flag");
        assert_eq!(settings.base_url, DEFAULT_BASE_URL);
        assert_eq!(settings.persona, None);

        let settings = Config::default().resolve(&Args::try_parse_from(["aiconnect"]).unwrap());
        assert_eq!(settings.model, DEFAULT_MODEL);
        assert_eq!(settings.api_key, None);
    }
}
