use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::Level;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Explicit provider choice; `None` picks the first configured one.
    pub provider: Option<ProviderKind>,
    pub system_prompt: Option<String>,
    pub gemini: Option<ProviderSettings>,
    pub openai: Option<ProviderSettings>,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProviderKind {
    #[serde(rename = "gemini")]
    Gemini,
    #[serde(rename = "openai")]
    OpenAI,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderSettings {
    /// Empty means "read the vendor's environment variable".
    pub api_key: String,
    pub api_base: Option<String>,
    pub text_model: Option<String>,
    pub image_model: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub level: String,
    pub file: Option<String>,
    pub max_file_bytes: u64,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
            max_file_bytes: 10 * 1024 * 1024,
        }
    }
}

impl LoggingSettings {
    pub fn level(&self) -> anyhow::Result<Level> {
        self.level
            .parse::<Level>()
            .map_err(|_| anyhow::anyhow!("Invalid log level: {}", self.level))
    }
}

impl ProviderSettings {
    pub fn resolved_api_key(&self, env_var: &str) -> String {
        let key = self.api_key.trim();
        if key.is_empty() {
            std::env::var(env_var).map(|k| k.trim().to_string()).unwrap_or_default()
        } else {
            key.to_string()
        }
    }
}

impl Config {
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Like [`Config::from_file`], but a missing file means defaults with
    /// both providers enabled so keys can come from the environment.
    pub fn load_or_default(path: &str) -> anyhow::Result<Self> {
        if Path::new(path).exists() {
            return Self::from_file(path);
        }
        Ok(Config {
            gemini: Some(ProviderSettings::default()),
            openai: Some(ProviderSettings::default()),
            ..Default::default()
        })
    }
}
