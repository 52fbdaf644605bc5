use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Main configuration structure for bed_commander
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// AI provider configurations
    #[serde(default)]
    pub ai_providers: AIProvidersConfig,

    /// Garden-management backend configuration
    #[serde(default)]
    pub backend: BackendConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AIProvidersConfig {
    /// OpenAI configuration
    pub openai: Option<ProviderConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Model to use
    pub model: String,

    /// Temperature setting
    pub temperature: Option<f32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Base URL of the garden-management API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Identifier of the bed all commands target
    #[serde(default = "default_bed_id")]
    pub bed_id: String,
}

fn default_base_url() -> String {
    "https://starbornag-vevkduzweq-uc.a.run.app/api".to_string()
}

fn default_bed_id() -> String {
    "67ea635a-8840-4bfa-899d-fed572de48a4".to_string()
}

impl Default for BackendConfig {
    fn default() -> Self {
        BackendConfig {
            base_url: default_base_url(),
            bed_id: default_bed_id(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            ai_providers: AIProvidersConfig {
                openai: Some(ProviderConfig {
                    model: "gpt-4o-mini".to_string(),
                    temperature: Some(0.2),
                }),
            },
            backend: BackendConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))
    }

    /// Load configuration from command line argument or default locations
    pub fn load(config_path: &Option<String>) -> Result<Self> {
        if let Some(path) = config_path {
            return Self::from_file(path);
        }

        // Try loading from default locations
        let default_paths = vec![
            "bed_commander.toml",
            ".bed_commander.toml",
            "~/.config/bed_commander/config.toml",
        ];

        for path in default_paths {
            let expanded_path = shellexpand::tilde(path);
            if Path::new(expanded_path.as_ref()).exists() {
                match Self::from_file(expanded_path.as_ref()) {
                    Ok(config) => return Ok(config),
                    Err(e) => eprintln!("Warning: Failed to load config from {}: {}", path, e),
                }
            }
        }

        // Return default config if no file found
        Ok(Self::default())
    }
}
