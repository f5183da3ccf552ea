use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub db: DbConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub assistant: AssistantConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DbConfig {
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

fn default_db_path() -> PathBuf {
    PathBuf::from("./data/sahayak.sqlite")
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

fn default_bind() -> String {
    "0.0.0.0:3001".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct AssistantConfig {
    /// Generative model identifier.
    #[serde(default = "default_model")]
    pub model: String,
    /// Environment variable holding the API key. A missing key fails on
    /// the first model call, never in the detector or repository paths.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    /// Number of prior conversation turns included in the prompt.
    #[serde(default = "default_history_window")]
    pub history_window: usize,
    /// Cap on schemes suggested per reply.
    #[serde(default = "default_suggestion_limit")]
    pub suggestion_limit: usize,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            api_key_env: default_api_key_env(),
            history_window: default_history_window(),
            suggestion_limit: default_suggestion_limit(),
            max_retries: default_max_retries(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_model() -> String {
    "gemini-1.5-flash".to_string()
}
fn default_api_key_env() -> String {
    "GEMINI_API_KEY".to_string()
}
fn default_history_window() -> usize {
    4
}
fn default_suggestion_limit() -> usize {
    3
}
fn default_max_retries() -> u32 {
    1
}
fn default_timeout_secs() -> u64 {
    30
}

impl Config {
    /// Defaults for commands that work without a config file (`detect`).
    pub fn minimal() -> Self {
        Self {
            db: DbConfig::default(),
            server: ServerConfig::default(),
            assistant: AssistantConfig::default(),
        }
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let mut config: Config =
        toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    // Validate server bind
    if config.server.bind.parse::<std::net::SocketAddr>().is_err() {
        anyhow::bail!("server.bind must be a host:port address, got '{}'", config.server.bind);
    }

    // Validate assistant settings
    if config.assistant.model.is_empty() {
        anyhow::bail!("assistant.model must not be empty");
    }
    if config.assistant.history_window == 0 {
        anyhow::bail!("assistant.history_window must be > 0");
    }
    if config.assistant.suggestion_limit == 0 {
        anyhow::bail!("assistant.suggestion_limit must be > 0");
    }

    // PORT overrides the configured listen port (container convention).
    if let Ok(port) = std::env::var("PORT") {
        let port: u16 = port
            .parse()
            .with_context(|| format!("PORT must be a number, got '{}'", port))?;
        let host = config
            .server
            .bind
            .rsplit_once(':')
            .map(|(h, _)| h.to_string())
            .unwrap_or_else(|| "0.0.0.0".to_string());
        config.server.bind = format!("{}:{}", host, port);
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.server.bind, "0.0.0.0:3001");
        assert_eq!(config.assistant.model, "gemini-1.5-flash");
        assert_eq!(config.assistant.history_window, 4);
        assert_eq!(config.assistant.max_retries, 1);
    }

    #[test]
    fn test_partial_toml_overrides() {
        let config: Config = toml::from_str(
            r#"
            [server]
            bind = "127.0.0.1:9000"

            [assistant]
            model = "gemini-1.5-pro"
            "#,
        )
        .unwrap();
        assert_eq!(config.server.bind, "127.0.0.1:9000");
        assert_eq!(config.assistant.model, "gemini-1.5-pro");
        // Untouched sections keep defaults
        assert_eq!(config.assistant.timeout_secs, 30);
    }
}
