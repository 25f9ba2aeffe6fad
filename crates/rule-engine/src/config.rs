//! Engine configuration.

use crate::error::{Result, RuleError};
use serde::{Deserialize, Serialize};

/// How a condition error (missing field, unsupported kind) is handled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorPolicy {
    /// Abort the firing pass and return the error.
    #[default]
    Fail,
    /// Treat the failing condition as not matching.
    NoMatch,
}

/// Configuration for a [`RuleEngine`](crate::RuleEngine).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Name attached to log events of this engine.
    #[serde(default = "default_name")]
    pub name: String,

    /// What to do when a condition cannot be evaluated.
    #[serde(default)]
    pub on_condition_error: ErrorPolicy,
}

fn default_name() -> String {
    "rule-engine".to_string()
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            on_condition_error: ErrorPolicy::default(),
        }
    }
}

impl EngineConfig {
    /// Creates a config with the given engine name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Sets the condition error policy.
    pub fn with_error_policy(mut self, policy: ErrorPolicy) -> Self {
        self.on_condition_error = policy;
        self
    }

    /// Parses a config from YAML.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: EngineConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Parses a config from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Parses a config, auto-detecting the format.
    pub fn parse(content: &str) -> Result<Self> {
        Self::parse_with_format(content, ConfigFormat::detect(content))
    }

    /// Parses a config in a known format.
    pub fn parse_with_format(content: &str, format: ConfigFormat) -> Result<Self> {
        match format {
            ConfigFormat::Yaml => Self::from_yaml(content),
            ConfigFormat::Json => Self::from_json(content),
        }
    }

    /// Serializes the config to YAML.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| RuleError::SerializationError(e.to_string()))
    }

    /// Serializes the config to JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Validates the config.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(RuleError::ParseError("Engine name must not be empty".to_string()));
        }
        Ok(())
    }
}

/// Supported config formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Yaml,
    Json,
}

impl ConfigFormat {
    /// Detects format from content: a leading `{` means JSON.
    pub fn detect(content: &str) -> Self {
        if content.trim_start().starts_with('{') {
            ConfigFormat::Json
        } else {
            ConfigFormat::Yaml
        }
    }
}
