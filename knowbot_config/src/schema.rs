use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

use crate::{ConfigError, Credential};

#[derive(Debug, Default, Deserialize, Serialize, Clone, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub agent: AgentDefaults,
    #[serde(default)]
    pub providers: ProvidersConfig,
    #[serde(default)]
    pub tools: ToolsConfig,
}

/// Settings for the chat model. Frozen once a session is built.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct AgentDefaults {
    #[serde(default = "AgentDefaults::default_model")]
    pub model: String,
    #[serde(default = "AgentDefaults::default_temperature")]
    pub temperature: f32,
    #[serde(default = "AgentDefaults::default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "AgentDefaults::default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Number of messages replayed to the model (3 exchanges by default).
    #[serde(default = "AgentDefaults::default_history_window")]
    pub history_window: usize,
}

impl Default for AgentDefaults {
    fn default() -> Self {
        Self {
            model: Self::default_model(),
            temperature: Self::default_temperature(),
            max_tokens: Self::default_max_tokens(),
            request_timeout_secs: Self::default_request_timeout_secs(),
            history_window: Self::default_history_window(),
        }
    }
}

impl AgentDefaults {
    fn default_model() -> String {
        "deepseek/deepseek-chat".to_string()
    }

    const fn default_temperature() -> f32 {
        0.7
    }

    const fn default_max_tokens() -> u32 {
        1000
    }

    const fn default_request_timeout_secs() -> u64 {
        30
    }

    const fn default_history_window() -> usize {
        6
    }

    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[derive(Debug, Default, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct ProvidersConfig {
    #[serde(default)]
    pub openrouter: OpenRouterConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct OpenRouterConfig {
    #[serde(default = "OpenRouterConfig::default_base_url")]
    pub base_url: String,
    /// Environment variable holding the API key.
    #[serde(default = "OpenRouterConfig::default_api_key_env")]
    pub api_key_env: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub referer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl Default for OpenRouterConfig {
    fn default() -> Self {
        Self {
            base_url: Self::default_base_url(),
            api_key_env: Self::default_api_key_env(),
            referer: Some("http://localhost:8501".to_string()),
            title: Some("Knowledge Bot".to_string()),
        }
    }
}

impl OpenRouterConfig {
    fn default_base_url() -> String {
        "https://openrouter.ai/api/v1".to_string()
    }

    fn default_api_key_env() -> String {
        "OPENROUTER_API_KEY".to_string()
    }
}

#[derive(Debug, Default, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct ToolsConfig {
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub wiki: WikiConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct SearchConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default = "SearchConfig::default_base_url")]
    pub base_url: String,
    #[serde(default = "SearchConfig::default_max_results")]
    pub max_results: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: Self::default_base_url(),
            max_results: Self::default_max_results(),
        }
    }
}

impl SearchConfig {
    fn default_base_url() -> String {
        "https://api.duckduckgo.com/".to_string()
    }

    const fn default_max_results() -> usize {
        3
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct WikiConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default = "WikiConfig::default_language")]
    pub language: String,
}

impl Default for WikiConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            language: Self::default_language(),
        }
    }
}

impl WikiConfig {
    fn default_language() -> String {
        "en".to_string()
    }
}

const fn default_enabled() -> bool {
    true
}

const CONFIG_TEMPLATE: &str = r#"{
  "agent": {
    "model": "deepseek/deepseek-chat",
    "temperature": 0.7,
    "max_tokens": 1000,
    "request_timeout_secs": 30,
    "history_window": 6
  },
  "providers": {
    "openrouter": {
      "base_url": "https://openrouter.ai/api/v1",
      "api_key_env": "OPENROUTER_API_KEY",
      "referer": "http://localhost:8501",
      "title": "Knowledge Bot"
    }
  },
  "tools": {
    "search": {
      "enabled": true,
      "base_url": "https://api.duckduckgo.com/",
      "max_results": 3
    },
    "wiki": {
      "enabled": true,
      "language": "en"
    }
  }
}
"#;

impl Config {
    pub fn config_dir() -> Result<PathBuf, ConfigError> {
        Ok(dirs::home_dir()
            .ok_or(ConfigError::HomeDirNotFound)?
            .join("knowbot"))
    }

    pub fn config_path() -> Result<PathBuf, ConfigError> {
        Ok(Self::config_dir()?.join("config.json"))
    }

    /// Load `~/knowbot/config.json`, falling back to defaults when the file
    /// does not exist.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            info!(
                "No config file at {}, using built-in defaults",
                path.display()
            );
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;

        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let temperature = self.agent.temperature;
        if !(0.0..=2.0).contains(&temperature) {
            return Err(ConfigError::InvalidTemperature(temperature));
        }
        if self.agent.history_window == 0 {
            return Err(ConfigError::InvalidHistoryWindow);
        }
        Ok(())
    }

    /// Resolve the chat service credential from the environment variable
    /// named in the config.
    pub fn credential(&self) -> Result<Credential, ConfigError> {
        Credential::from_env(&self.providers.openrouter.api_key_env)
    }

    pub fn create_config() -> Result<PathBuf, ConfigError> {
        let path = Self::config_path()?;
        Self::create_config_at(&path)?;

        println!("✅ Created config file at: {}", path.display());
        println!();
        println!("📝 Next steps:");
        println!("   1. Export your OpenRouter key: export OPENROUTER_API_KEY=...");
        println!("   2. Run 'knowbot chat' to start a conversation");
        println!();
        println!("🔧 Configuration options:");
        println!("   - model: any OpenRouter model id (deepseek/deepseek-chat, ...)");
        println!("   - history_window: number of messages replayed to the model");
        println!("   - tools.search / tools.wiki: enable or disable lookups");
        println!();
        Ok(path)
    }

    pub fn create_config_at(path: &Path) -> Result<(), ConfigError> {
        if path.exists() {
            return Err(ConfigError::AlreadyExists(path.to_path_buf()));
        }

        let io_err = |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir).map_err(io_err)?;
        }
        std::fs::write(path, CONFIG_TEMPLATE).map_err(io_err)
    }
}
