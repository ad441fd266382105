use anyhow::{Context, Result, bail};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::debug;

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ProviderConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_base_currency")]
    pub base_currency: String,
}

fn default_base_url() -> String {
    "https://api.exchangerate-api.com".to_string()
}

fn default_base_currency() -> String {
    "USD".to_string()
}

fn default_currencies() -> Vec<String> {
    ["USD", "EUR", "JPY", "GBP"]
        .iter()
        .map(|c| c.to_string())
        .collect()
}

impl Default for ProviderConfig {
    fn default() -> Self {
        ProviderConfig {
            base_url: default_base_url(),
            api_key: None,
            base_currency: default_base_currency(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub provider: ProviderConfig,
    /// Selectable currencies; the first two are the default source and
    /// destination.
    #[serde(default = "default_currencies")]
    pub currencies: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            provider: ProviderConfig::default(),
            currencies: default_currencies(),
        }
    }
}

impl AppConfig {
    /// Loads the config from the default location, falling back to built-in
    /// defaults when no file exists there.
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!("No config at {}, using defaults", config_path.display());
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("dev", "fxconv", "fxconv")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        Self::from_yaml(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))
    }

    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let mut config: Self = serde_yaml::from_str(yaml)?;
        config.normalize()?;
        debug!("Successfully loaded config");
        Ok(config)
    }

    fn normalize(&mut self) -> Result<()> {
        if self.currencies.len() < 2 {
            bail!(
                "At least two currencies are required, found {}",
                self.currencies.len()
            );
        }
        for code in self.currencies.iter_mut() {
            *code = code.trim().to_uppercase();
        }
        self.provider.base_currency = self.provider.base_currency.trim().to_uppercase();
        self.provider.base_url = self.provider.base_url.trim_end_matches('/').to_string();
        Ok(())
    }

    pub fn default_source(&self) -> &str {
        &self.currencies[0]
    }

    pub fn default_destination(&self) -> &str {
        &self.currencies[1]
    }
}
