//! Adapter configuration.

use serde::Deserialize;

use crate::error::ApiError;
use crate::DEFAULT_API_BASE;

pub const TOKEN_ENV: &str = "VIKA_TOKEN";
pub const API_BASE_ENV: &str = "VIKA_API_BASE";

/// Construction parameters for `RequestAdapter`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AdapterConfig {
    pub token: String,
    #[serde(default = "default_api_base")]
    pub api_base: String,
}

fn default_api_base() -> String {
    DEFAULT_API_BASE.to_string()
}

impl AdapterConfig {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            api_base: default_api_base(),
        }
    }

    /// Read `VIKA_TOKEN` and, optionally, `VIKA_API_BASE`.
    pub fn from_env() -> Result<Self, ApiError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ApiError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let token = lookup(TOKEN_ENV)
            .filter(|token| !token.trim().is_empty())
            .ok_or_else(|| ApiError::Config(format!("{TOKEN_ENV} is not set")))?;
        let api_base = lookup(API_BASE_ENV)
            .filter(|base| !base.trim().is_empty())
            .unwrap_or_else(default_api_base);
        Ok(Self { token, api_base })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn api_base_defaults_when_unset() {
        let config = AdapterConfig::from_lookup(lookup(&[(TOKEN_ENV, "usk123")])).unwrap();
        assert_eq!(config.token, "usk123");
        assert_eq!(config.api_base, DEFAULT_API_BASE);
    }

    #[test]
    fn api_base_override() {
        let config = AdapterConfig::from_lookup(lookup(&[
            (TOKEN_ENV, "usk123"),
            (API_BASE_ENV, "https://vika.example.com/"),
        ]))
        .unwrap();
        assert_eq!(config.api_base, "https://vika.example.com/");
    }

    #[test]
    fn missing_token_is_a_config_error() {
        let err = AdapterConfig::from_lookup(lookup(&[(TOKEN_ENV, "  ")])).unwrap_err();
        assert!(matches!(err, ApiError::Config(_)));
        assert!(err.to_string().contains(TOKEN_ENV));
    }

    #[test]
    fn deserializes_with_default_base() {
        let config: AdapterConfig = serde_json::from_str(r#"{"token":"usk123"}"#).unwrap();
        assert_eq!(config, AdapterConfig::new("usk123"));
    }
}
