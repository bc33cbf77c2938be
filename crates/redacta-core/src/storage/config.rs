//! TOML-based application configuration.
//!
//! Stores user preferences including:
//! - Gateway model/endpoint selection and request timeout
//! - Simulation defaults (question count, subject list)
//! - Minimum essay length accepted by the correction flow
//!
//! Configuration is stored at `~/.config/redacta/config.toml`. The API
//! key is deliberately not part of the file; it comes from the
//! `GEMINI_API_KEY` environment variable only.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::ConfigError;

use super::data_dir;

/// Gateway configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Sampling temperature for the chat sessions.
    #[serde(default = "default_temperature")]
    pub temperature: f64,
}

/// Simulation defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    #[serde(default = "default_question_count")]
    pub question_count: u32,
    #[serde(default = "default_subjects")]
    pub subjects: Vec<String>,
}

/// Essay correction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EssayConfig {
    /// Essays shorter than this are rejected before any network call.
    #[serde(default = "default_min_length")]
    pub min_length: usize,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/redacta/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub gateway: GatewayConfig,
    #[serde(default)]
    pub simulation: SimulationConfig,
    #[serde(default)]
    pub essay: EssayConfig,
}

// Default functions
fn default_model() -> String {
    "gemini-3-flash-preview".to_string()
}
fn default_endpoint() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}
fn default_timeout_secs() -> u64 {
    120
}
fn default_temperature() -> f64 {
    0.7
}
fn default_question_count() -> u32 {
    10
}
fn default_subjects() -> Vec<String> {
    vec![
        "Linguagens".to_string(),
        "Ciências Humanas".to_string(),
        "Ciências da Natureza".to_string(),
        "Matemática".to_string(),
    ]
}
fn default_min_length() -> usize {
    500
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            endpoint: default_endpoint(),
            timeout_secs: default_timeout_secs(),
            temperature: default_temperature(),
        }
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            question_count: default_question_count(),
            subjects: default_subjects(),
        }
    }
}

impl Default for EssayConfig {
    fn default() -> Self {
        Self {
            min_length: default_min_length(),
        }
    }
}

impl Config {
    fn path() -> Result<PathBuf, ConfigError> {
        let dir = data_dir().map_err(|e| ConfigError::LoadFailed {
            path: PathBuf::from("~/.config/redacta"),
            message: e.to_string(),
        })?;
        Ok(dir.join("config.toml"))
    }

    /// Load the configuration, falling back to defaults when the file
    /// does not exist yet.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::path()?;
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(&path).map_err(|e| ConfigError::LoadFailed {
            path: path.clone(),
            message: e.to_string(),
        })?;
        toml::from_str(&raw).map_err(|e| ConfigError::ParseFailed(e.to_string()))
    }

    /// Save the configuration to disk.
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = Self::path()?;
        let raw = toml::to_string_pretty(self).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        std::fs::write(&path, raw).map_err(|e| ConfigError::SaveFailed {
            path,
            message: e.to_string(),
        })
    }

    /// Read a dotted configuration key as a display string.
    pub fn get(&self, key: &str) -> Result<String, ConfigError> {
        match key {
            "gateway.model" => Ok(self.gateway.model.clone()),
            "gateway.endpoint" => Ok(self.gateway.endpoint.clone()),
            "gateway.timeout_secs" => Ok(self.gateway.timeout_secs.to_string()),
            "gateway.temperature" => Ok(self.gateway.temperature.to_string()),
            "simulation.question_count" => Ok(self.simulation.question_count.to_string()),
            "simulation.subjects" => Ok(self.simulation.subjects.join(", ")),
            "essay.min_length" => Ok(self.essay.min_length.to_string()),
            _ => Err(ConfigError::UnknownKey(key.to_string())),
        }
    }

    /// Set a dotted configuration key from a string value.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let invalid = |message: &str| ConfigError::ParseFailed(format!("{key}: {message}"));
        match key {
            "gateway.model" => self.gateway.model = value.to_string(),
            "gateway.endpoint" => self.gateway.endpoint = value.to_string(),
            "gateway.timeout_secs" => {
                self.gateway.timeout_secs = value.parse().map_err(|_| invalid("expected integer"))?
            }
            "gateway.temperature" => {
                self.gateway.temperature = value.parse().map_err(|_| invalid("expected number"))?
            }
            "simulation.question_count" => {
                self.simulation.question_count =
                    value.parse().map_err(|_| invalid("expected integer"))?
            }
            "simulation.subjects" => {
                self.simulation.subjects = value
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            }
            "essay.min_length" => {
                self.essay.min_length = value.parse().map_err(|_| invalid("expected integer"))?
            }
            _ => return Err(ConfigError::UnknownKey(key.to_string())),
        }
        Ok(())
    }
}
