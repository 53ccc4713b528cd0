use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;
use wasm_bindgen::JsValue;

/// Name of the optional global the hosting page sets to override defaults.
pub const CONFIG_GLOBAL: &str = "__FOODBOOK_CONFIG__";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config error: {0}")]
    Invalid(String),
}

/// Runtime settings. Every field has a default, so a partial override is fine.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AppConfig {
    /// Prefix for backend paths; empty means same origin.
    pub api_base: String,
    /// Where unauthenticated users are sent.
    pub login_path: String,
    pub auth_redirect_delay_ms: u64,
    pub toast_duration_ms: u64,
    /// `EnvFilter` directive, e.g. `"info"` or `"foodbook=debug"`.
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base: String::new(),
            login_path: "/api/login".to_string(),
            auth_redirect_delay_ms: 500,
            toast_duration_ms: 4000,
            log_level: "info".to_string(),
        }
    }
}

impl AppConfig {
    pub fn auth_redirect_delay(&self) -> Duration {
        Duration::from_millis(self.auth_redirect_delay_ms)
    }

    pub fn toast_duration(&self) -> Duration {
        Duration::from_millis(self.toast_duration_ms)
    }

    #[cfg(test)]
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|e| ConfigError::Invalid(e.to_string()))
    }

    pub fn from_js(value: JsValue) -> Result<Self, ConfigError> {
        serde_wasm_bindgen::from_value(value).map_err(|e| ConfigError::Invalid(e.to_string()))
    }

    /// Read `window.__FOODBOOK_CONFIG__`. Absent means defaults.
    pub fn load() -> Result<Self, ConfigError> {
        let Some(window) = web_sys::window() else {
            return Ok(Self::default());
        };
        let value = js_sys::Reflect::get(&window, &JsValue::from_str(CONFIG_GLOBAL))
            .map_err(|e| ConfigError::Invalid(format!("{:?}", e)))?;
        if value.is_undefined() || value.is_null() {
            return Ok(Self::default());
        }
        Self::from_js(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.login_path, "/api/login");
        assert_eq!(config.auth_redirect_delay(), Duration::from_millis(500));
        assert_eq!(config.api_base, "");
    }

    #[test]
    fn test_partial_override_keeps_defaults() {
        let config = AppConfig::from_json(r#"{"apiBase":"https://api.example.com","logLevel":"debug"}"#)
            .unwrap();
        assert_eq!(config.api_base, "https://api.example.com");
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.login_path, "/api/login");
        assert_eq!(config.toast_duration_ms, 4000);
    }

    #[test]
    fn test_malformed_config_is_an_error() {
        let err = AppConfig::from_json(r#"{"authRedirectDelayMs":"soon"}"#).unwrap_err();
        assert!(err.to_string().starts_with("Config error"));
    }
}
