//! Application configuration.
//!
//! Defaults are baked in at compile time from `KLINE_*` environment variables;
//! a host page may override any subset with [`AppConfig::from_json`].

use crate::domain::{
    chart::ChartOptions,
    errors::{AppError, AppResult},
    logging::LogLevel,
};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

pub const DEFAULT_API_URL: &str = "http://localhost:1666";
pub const DEFAULT_API_TIMEOUT_MS: u32 = 30_000;
pub const DEFAULT_APP_NAME: &str = "Quant Trading System";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString, AsRefStr, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSection {
    pub name: String,
    pub version: String,
    pub env: Environment,
    pub debug: bool,
}

impl Default for AppSection {
    fn default() -> Self {
        let env = option_env!("KLINE_ENV")
            .and_then(|value| value.parse().ok())
            .unwrap_or_default();
        Self {
            name: option_env!("KLINE_APP_NAME").unwrap_or(DEFAULT_APP_NAME).to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            env,
            debug: option_env!("KLINE_DEBUG")
                .map(|value| matches!(value, "1" | "true" | "yes"))
                .unwrap_or(env == Environment::Development),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ApiSection {
    pub base_url: String,
    pub timeout_ms: u32,
}

impl Default for ApiSection {
    fn default() -> Self {
        Self {
            base_url: option_env!("KLINE_API_URL").unwrap_or(DEFAULT_API_URL).to_string(),
            timeout_ms: option_env!("KLINE_API_TIMEOUT")
                .and_then(|value| value.parse().ok())
                .unwrap_or(DEFAULT_API_TIMEOUT_MS),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub app: AppSection,
    pub api: ApiSection,
    pub chart: ChartOptions,
}

impl AppConfig {
    /// Defaults overridden by the fields present in `json`
    pub fn from_json(json: &str) -> AppResult<Self> {
        let mut config: AppConfig = serde_json::from_str(json)
            .map_err(|e| AppError::Configuration(e.to_string()))?;
        config.api.base_url = config.api.base_url.trim_end_matches('/').to_string();
        if config.api.base_url.is_empty() {
            return Err(AppError::Configuration("api.baseUrl must not be empty".to_string()));
        }
        Ok(config)
    }

    /// Lowest level the console logger prints
    pub fn min_log_level(&self) -> LogLevel {
        if self.app.debug { LogLevel::Debug } else { LogLevel::Info }
    }
}

static CONFIG: OnceCell<AppConfig> = OnceCell::new();

/// Install the process-wide configuration. Only the first call wins.
pub fn init_config(config: AppConfig) -> bool {
    CONFIG.set(config).is_ok()
}

/// Installed configuration, or compile-time defaults
pub fn config() -> &'static AppConfig {
    CONFIG.get_or_init(AppConfig::default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let config = AppConfig::from_json(r#"{"api":{"baseUrl":"https://quotes.example.com/"}}"#).unwrap();
        assert_eq!(config.api.base_url, "https://quotes.example.com");
        assert_eq!(config.api.timeout_ms, AppConfig::default().api.timeout_ms);
        assert_eq!(config.chart, ChartOptions::default());
    }

    #[test]
    fn invalid_json_is_a_configuration_error() {
        assert!(matches!(AppConfig::from_json("{"), Err(AppError::Configuration(_))));
        assert!(matches!(
            AppConfig::from_json(r#"{"api":{"baseUrl":""}}"#),
            Err(AppError::Configuration(_))
        ));
    }

    #[test]
    fn environment_parses_case_insensitively() {
        assert_eq!("Production".parse::<Environment>().unwrap(), Environment::Production);
        assert_eq!(Environment::Development.to_string(), "development");
    }
}
