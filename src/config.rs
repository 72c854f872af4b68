use std::env;

use thiserror::Error;

pub const API_KEY_VAR: &str = "AI_GATEWAY_API_KEY";
pub const GATEWAY_URL_VAR: &str = "AI_GATEWAY_URL";
pub const MODEL_VAR: &str = "AI_GATEWAY_MODEL";
pub const TIMEOUT_VAR: &str = "AI_GATEWAY_TIMEOUT_MS";
pub const PORT_VAR: &str = "PORT";

pub const DEFAULT_GATEWAY_URL: &str = "https://ai.gateway.lovable.dev/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "google/gemini-2.5-flash";
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;
pub const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("AI_GATEWAY_API_KEY is not set")]
    MissingApiKey,
    #[error("invalid value for {var}: {value:?}")]
    Invalid { var: &'static str, value: String },
}

/// Settings for the upstream chat-completion gateway.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub api_key: String,
    pub url: String,
    pub model: String,
    pub timeout_ms: u64,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub gateway: GatewayConfig,
}

impl AppConfig {
    /// Reads the process environment. Fails when the API key is absent so the
    /// server never starts without credentials.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup(API_KEY_VAR)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .ok_or(ConfigError::MissingApiKey)?;

        let url = lookup(GATEWAY_URL_VAR)
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_GATEWAY_URL.to_string());

        let model = lookup(MODEL_VAR)
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let timeout_ms = parse_or(&lookup, TIMEOUT_VAR, DEFAULT_TIMEOUT_MS)?;
        let port = parse_or(&lookup, PORT_VAR, DEFAULT_PORT)?;

        Ok(Self {
            port,
            gateway: GatewayConfig {
                api_key,
                url,
                model,
                timeout_ms,
            },
        })
    }
}

fn parse_or<F, T>(lookup: &F, var: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(var) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::Invalid { var, value }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn missing_api_key_fails_startup() {
        let err = AppConfig::from_lookup(lookup_from(&[])).unwrap_err();
        assert_eq!(err, ConfigError::MissingApiKey);
    }

    #[test]
    fn blank_api_key_counts_as_missing() {
        let err = AppConfig::from_lookup(lookup_from(&[(API_KEY_VAR, "   ")])).unwrap_err();
        assert_eq!(err, ConfigError::MissingApiKey);
    }

    #[test]
    fn defaults_apply_when_only_key_is_set() {
        let cfg = AppConfig::from_lookup(lookup_from(&[(API_KEY_VAR, "secret")])).unwrap();
        assert_eq!(cfg.port, DEFAULT_PORT);
        assert_eq!(cfg.gateway.api_key, "secret");
        assert_eq!(cfg.gateway.url, DEFAULT_GATEWAY_URL);
        assert_eq!(cfg.gateway.model, DEFAULT_MODEL);
        assert_eq!(cfg.gateway.timeout_ms, DEFAULT_TIMEOUT_MS);
    }

    #[test]
    fn overrides_are_read() {
        let cfg = AppConfig::from_lookup(lookup_from(&[
            (API_KEY_VAR, "secret"),
            (GATEWAY_URL_VAR, "http://127.0.0.1:9000/v1/chat/completions"),
            (MODEL_VAR, "test-model"),
            (TIMEOUT_VAR, "1500"),
            (PORT_VAR, "8081"),
        ]))
        .unwrap();
        assert_eq!(cfg.port, 8081);
        assert_eq!(cfg.gateway.url, "http://127.0.0.1:9000/v1/chat/completions");
        assert_eq!(cfg.gateway.model, "test-model");
        assert_eq!(cfg.gateway.timeout_ms, 1500);
    }

    #[test]
    fn unparseable_port_is_rejected() {
        let err = AppConfig::from_lookup(lookup_from(&[(API_KEY_VAR, "secret"), (PORT_VAR, "http")]))
            .unwrap_err();
        assert_eq!(
            err,
            ConfigError::Invalid {
                var: PORT_VAR,
                value: "http".to_string()
            }
        );
    }
}
