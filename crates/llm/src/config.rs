//! Text-generation settings loaded from the environment.

use std::time::Duration;

/// Placeholder value shipped in sample `.env` files; treated as unset.
pub const PLACEHOLDER_API_KEY: &str = "your-gemini-api-key-here";

pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// `None` disables generation; every reply uses the fallback.
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl LlmConfig {
    /// Load from environment variables.
    ///
    /// | Env Var            | Default                  |
    /// |--------------------|--------------------------|
    /// | `GEMINI_API_KEY`   | unset                    |
    /// | `GEMINI_MODEL`     | `gemini-1.5-flash`       |
    /// | `GEMINI_BASE_URL`  | Google generative API    |
    /// | `LLM_TIMEOUT_SECS` | `30`                     |
    ///
    /// # Panics
    ///
    /// Panics if `LLM_TIMEOUT_SECS` is set but not a valid `u64`.
    pub fn from_env() -> Self {
        let timeout_secs: u64 = std::env::var("LLM_TIMEOUT_SECS")
            .unwrap_or_else(|_| DEFAULT_TIMEOUT_SECS.to_string())
            .parse()
            .expect("LLM_TIMEOUT_SECS must be a valid u64");

        Self {
            api_key: normalize_api_key(std::env::var("GEMINI_API_KEY").ok()),
            model: std::env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.into()),
            base_url: std::env::var("GEMINI_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_BASE_URL.into()),
            timeout: Duration::from_secs(timeout_secs),
        }
    }

    /// Configuration with generation disabled.
    pub fn disabled() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.into(),
            base_url: DEFAULT_BASE_URL.into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

/// Blank and placeholder keys count as unset.
pub fn normalize_api_key(key: Option<String>) -> Option<String> {
    key.map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty() && k != PLACEHOLDER_API_KEY)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_and_blank_keys_are_unset() {
        assert_eq!(normalize_api_key(None), None);
        assert_eq!(normalize_api_key(Some("   ".into())), None);
        assert_eq!(normalize_api_key(Some(PLACEHOLDER_API_KEY.into())), None);
        assert_eq!(normalize_api_key(Some(" abc ".into())).as_deref(), Some("abc"));
    }

    #[test]
    fn disabled_has_no_key() {
        let config = LlmConfig::disabled();
        assert!(config.api_key.is_none());
        assert_eq!(config.model, DEFAULT_MODEL);
    }
}
