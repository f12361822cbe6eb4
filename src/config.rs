use std::path::PathBuf;

use eyre::Result;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::Error;
use crate::generate::Provider;

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_LANG: &str = "en";

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub default_lang: Option<String>,
    pub default_format: Option<String>,
    pub default_model: Option<String>,
    pub summary_prompt: Option<String>,
    pub question_prompt: Option<String>,
}

impl Config {
    /// Load config from ~/.config/ytqa/config.toml if it exists
    pub fn load() -> Result<Self> {
        let path = config_path();
        if path.exists() {
            debug!("Loading config from {}", path.display());
            let content = std::fs::read_to_string(&path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            debug!("No config file found at {}", path.display());
            Ok(Config::default())
        }
    }
}

pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from(".config"))
        .join("ytqa")
        .join("config.toml")
}

/// Model selection and credential, resolved once at startup
#[derive(Clone)]
pub struct Settings {
    pub provider: Provider,
    pub model: String,
    pub api_key: String,
}

impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

impl Settings {
    /// Resolve settings from the process environment
    pub fn from_env(model: &str) -> crate::Result<Self> {
        Self::resolve(model, |name| std::env::var(name).ok())
    }

    /// Resolve settings, looking up the provider's credential with `lookup`
    pub fn resolve<F>(model: &str, lookup: F) -> crate::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let model = model.trim();
        if model.is_empty() {
            return Err(Error::Configuration("model name is empty".to_string()));
        }

        let provider = Provider::from_model(model);
        let env_var = provider.env_var();
        let api_key = lookup(env_var)
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .ok_or_else(|| {
                Error::Configuration(format!(
                    "{env_var} environment variable not set (required for {provider} model {model})"
                ))
            })?;

        debug!("Using {provider} model {model}");
        Ok(Self {
            provider,
            model: model.to_string(),
            api_key,
        })
    }
}
