use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use anyhow::{Result, anyhow};

use crate::backend::{parse_endpoint, DEFAULT_ENDPOINT};
use crate::exchange::DEFAULT_GREETING;

pub const ENDPOINT_ENV_VAR: &str = "MEDCHAT_ENDPOINT";

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub greeting: Option<String>,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load() -> Result<Self> {
        Self::load_from(&Self::get_config_path()?)
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            return Ok(Self::new());
        }

        let config_content = fs::read_to_string(config_path)?;
        let config: Config = serde_json::from_str(&config_content)?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::get_config_path()?)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        // Create config directory if it doesn't exist
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let config_content = serde_json::to_string_pretty(self)?;
        fs::write(config_path, config_content)?;
        Ok(())
    }

    /// Endpoint to talk to: explicit override, then `MEDCHAT_ENDPOINT`,
    /// then the config file, then the built-in default.
    pub fn resolve_endpoint(&self, cli_override: Option<&str>) -> String {
        let env_value = std::env::var(ENDPOINT_ENV_VAR).ok();
        self.resolve_endpoint_with(cli_override, env_value.as_deref())
    }

    fn resolve_endpoint_with(&self, cli_override: Option<&str>, env_value: Option<&str>) -> String {
        cli_override
            .or(env_value)
            .or(self.endpoint.as_deref())
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(DEFAULT_ENDPOINT)
            .to_string()
    }

    /// Store a new endpoint after checking it is a usable http(s) URL
    pub fn set_endpoint(&mut self, endpoint: &str) -> Result<()> {
        let url = parse_endpoint(endpoint.trim())?;
        self.endpoint = Some(url.to_string());
        Ok(())
    }

    /// An empty greeting turns the opening message off
    pub fn set_greeting(&mut self, greeting: &str) {
        self.greeting = Some(greeting.to_string());
    }

    pub fn greeting(&self) -> &str {
        self.greeting.as_deref().unwrap_or(DEFAULT_GREETING)
    }

    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow!("Could not determine config directory"))?;

        Ok(config_dir.join("medchat").join("config.json"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.json")).unwrap();
        assert_eq!(config, Config::new());
        assert_eq!(config.greeting(), DEFAULT_GREETING);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let config = Config {
            endpoint: Some("http://10.0.0.5:8000/chat".to_string()),
            greeting: Some("Hi.".to_string()),
        };
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, config);
        assert_eq!(loaded.greeting(), "Hi.");
    }

    #[test]
    fn test_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"endpoint":"http://example.test/chat"}"#).unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.endpoint.as_deref(), Some("http://example.test/chat"));
        assert!(config.greeting.is_none());
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{not json").unwrap();
        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn test_set_endpoint_validates() {
        let mut config = Config::new();
        assert!(config.set_endpoint("localhost:8000").is_err());
        assert!(config.set_endpoint("ftp://host/chat").is_err());
        assert!(config.endpoint.is_none());

        config.set_endpoint(" http://10.0.0.5:8000/chat ").unwrap();
        assert_eq!(config.endpoint.as_deref(), Some("http://10.0.0.5:8000/chat"));
    }

    #[test]
    fn test_set_greeting_then_save() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = Config::new();
        config.set_greeting("");
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.greeting(), "");
    }

    #[test]
    fn test_endpoint_precedence() {
        let config = Config {
            endpoint: Some("http://file/chat".to_string()),
            greeting: None,
        };

        assert_eq!(
            config.resolve_endpoint_with(Some("http://flag/chat"), Some("http://env/chat")),
            "http://flag/chat"
        );
        assert_eq!(
            config.resolve_endpoint_with(None, Some("http://env/chat")),
            "http://env/chat"
        );
        assert_eq!(config.resolve_endpoint_with(None, None), "http://file/chat");
        assert_eq!(
            Config::new().resolve_endpoint_with(None, None),
            "http://localhost:8000/chat"
        );
    }
}
