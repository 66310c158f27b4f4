use serde::{de::Deserializer, Deserialize, Serialize};
use std::fmt;

use crate::ConfigError;

/// Stores user-configurable CLI preferences and backend settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "Config::default_api_base_url")]
    pub api_base_url: String,
    #[serde(default = "Config::default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default)]
    pub backend: Backend,
    #[serde(default = "Config::default_weight_unit")]
    pub weight_unit: String,
    #[serde(default = "Config::default_ui_color_enabled")]
    pub ui_color_enabled: bool,
    /// Name of the environment variable holding the bearer token.
    #[serde(default = "Config::default_access_token_env")]
    pub access_token_env: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: Self::default_api_base_url(),
            request_timeout_secs: Self::default_request_timeout_secs(),
            user_id: None,
            backend: Backend::default(),
            weight_unit: Self::default_weight_unit(),
            ui_color_enabled: Self::default_ui_color_enabled(),
            access_token_env: Self::default_access_token_env(),
        }
    }
}

impl Config {
    pub const KEYS: [&'static str; 7] = [
        "api_base_url",
        "request_timeout_secs",
        "user_id",
        "backend",
        "weight_unit",
        "ui_color_enabled",
        "access_token_env",
    ];

    pub fn default_api_base_url() -> String {
        "http://localhost:8080/api".into()
    }

    pub fn default_request_timeout_secs() -> u64 {
        30
    }

    pub fn default_weight_unit() -> String {
        "kg".into()
    }

    pub fn default_ui_color_enabled() -> bool {
        true
    }

    pub fn default_access_token_env() -> String {
        "PETCORE_ACCESS_TOKEN".into()
    }

    /// Key/value pairs in display order.
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        vec![
            ("api_base_url", self.api_base_url.clone()),
            ("request_timeout_secs", self.request_timeout_secs.to_string()),
            ("user_id", self.user_id.clone().unwrap_or_else(|| "(unset)".into())),
            ("backend", self.backend.to_string()),
            ("weight_unit", self.weight_unit.clone()),
            ("ui_color_enabled", self.ui_color_enabled.to_string()),
            ("access_token_env", self.access_token_env.clone()),
        ]
    }

    /// Updates one key from user text.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let value = value.trim();
        let invalid = || ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        };
        match key {
            "api_base_url" => {
                if !(value.starts_with("http://") || value.starts_with("https://")) {
                    return Err(invalid());
                }
                self.api_base_url = value.trim_end_matches('/').to_string();
            }
            "request_timeout_secs" => {
                self.request_timeout_secs = value
                    .parse()
                    .ok()
                    .filter(|secs| *secs > 0)
                    .ok_or_else(invalid)?;
            }
            "user_id" => {
                self.user_id = if value.is_empty() || value == "none" {
                    None
                } else {
                    Some(value.to_string())
                };
            }
            "backend" => self.backend = Backend::parse(value).ok_or_else(invalid)?,
            "weight_unit" => match value.to_ascii_lowercase().as_str() {
                unit @ ("kg" | "lb") => self.weight_unit = unit.to_string(),
                _ => return Err(invalid()),
            },
            "ui_color_enabled" => {
                self.ui_color_enabled = match value.to_ascii_lowercase().as_str() {
                    "true" | "on" | "yes" | "1" => true,
                    "false" | "off" | "no" | "0" => false,
                    _ => return Err(invalid()),
                }
            }
            "access_token_env" if !value.is_empty() => self.access_token_env = value.to_string(),
            "access_token_env" => return Err(invalid()),
            other => return Err(ConfigError::UnknownKey(other.to_string())),
        }
        Ok(())
    }
}

/// Where pet data comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    #[default]
    Http,
    Memory,
}

impl Backend {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "http" | "rest" | "remote" => Some(Backend::Http),
            "memory" | "mem" | "local" => Some(Backend::Memory),
            _ => None,
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Backend::Http => "http",
            Backend::Memory => "memory",
        };
        f.write_str(label)
    }
}

impl<'de> Deserialize<'de> for Backend {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<String>::deserialize(deserializer)?;
        Ok(value
            .as_deref()
            .and_then(Backend::parse)
            .unwrap_or_default())
    }
}
