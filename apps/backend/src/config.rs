//! Service configuration read from the environment.

use std::time::Duration;
use thiserror::Error;

const DEFAULT_EXTRACTION_URL: &str = "https://api.openai.com/v1/chat/completions";
const DEFAULT_EXTRACTION_MODEL: &str = "gpt-4o-mini";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value}")]
    Invalid { key: &'static str, value: String },
}

/// Runtime configuration.
///
/// Env vars:
/// - HOST / PORT: listen address (default 0.0.0.0:3000)
/// - EXTRACTION_API_URL: chat completion endpoint
/// - EXTRACTION_API_KEY: credential for the extraction service
/// - EXTRACTION_MODEL: model name sent with each request
/// - SIMULATED_MODE: initial value of the simulated-mode preference
/// - ALLOWED_SOURCE_HOSTS: extra comma-separated article hosts
/// - HTTP_TIMEOUT_SECS: timeout for outbound requests (default 30)
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub extraction_url: String,
    pub extraction_api_key: Option<String>,
    pub extraction_model: String,
    pub simulated_mode: bool,
    pub extra_source_hosts: Vec<String>,
    pub http_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            extraction_url: DEFAULT_EXTRACTION_URL.to_string(),
            extraction_api_key: None,
            extraction_model: DEFAULT_EXTRACTION_MODEL.to_string(),
            simulated_mode: false,
            extra_source_hosts: Vec::new(),
            http_timeout: Duration::from_secs(30),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let port = match get("PORT") {
            Some(value) => value.trim().parse().map_err(|_| ConfigError::Invalid {
                key: "PORT",
                value,
            })?,
            None => defaults.port,
        };

        let http_timeout = match get("HTTP_TIMEOUT_SECS") {
            Some(value) => Duration::from_secs(value.trim().parse().map_err(|_| {
                ConfigError::Invalid {
                    key: "HTTP_TIMEOUT_SECS",
                    value,
                }
            })?),
            None => defaults.http_timeout,
        };

        let simulated_mode = get("SIMULATED_MODE")
            .map(|v| ingest_core::ports::is_truthy(&v))
            .unwrap_or(defaults.simulated_mode);

        let extra_source_hosts = get("ALLOWED_SOURCE_HOSTS")
            .map(|v| {
                v.split(',')
                    .map(|h| h.trim().to_string())
                    .filter(|h| !h.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            host: get("HOST").unwrap_or(defaults.host),
            port,
            extraction_url: get("EXTRACTION_API_URL").unwrap_or(defaults.extraction_url),
            extraction_api_key: get("EXTRACTION_API_KEY"),
            extraction_model: get("EXTRACTION_MODEL").unwrap_or(defaults.extraction_model),
            simulated_mode,
            extra_source_hosts,
            http_timeout,
        })
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
