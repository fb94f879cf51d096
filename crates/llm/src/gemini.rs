//! REST client for the Gemini `generateContent` endpoint.

use std::fmt;

use async_trait::async_trait;
use serde::Deserialize;

use crate::config::LlmConfig;
use crate::error::GenerationError;
use crate::generator::TextGenerator;

/// HTTP client for one Gemini model.
pub struct GeminiClient {
    client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: String,
}

const API_KEY_HEADER: &str = "x-goog-api-key";

impl fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiClient")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

impl GeminiClient {
    /// Build a client from configuration.
    ///
    /// Fails with [`GenerationError::NotConfigured`] when no API key is set.
    pub fn from_config(config: &LlmConfig) -> Result<Self, GenerationError> {
        let api_key = config
            .api_key
            .clone()
            .ok_or(GenerationError::NotConfigured)?;
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }

    // ---- private helpers ----

    async fn ensure_success(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, GenerationError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(GenerationError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }
}

/// Concatenate the text parts of the first candidate.
fn first_candidate_text(response: GenerateResponse) -> Result<String, GenerationError> {
    let text: String = response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|p| p.text)
                .collect()
        })
        .unwrap_or_default();

    if text.trim().is_empty() {
        Err(GenerationError::EmptyResponse)
    } else {
        Ok(text)
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        let body = serde_json::json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
        });

        let response = self
            .client
            .post(self.endpoint())
            .header(API_KEY_HEADER, &self.api_key)
            .json(&body)
            .send()
            .await?;

        let response = Self::ensure_success(response).await?;
        let parsed = response.json::<GenerateResponse>().await?;
        first_candidate_text(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use serde_json::json;

    fn parse(value: serde_json::Value) -> GenerateResponse {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn joins_parts_of_first_candidate() {
        let response = parse(json!({
            "candidates": [
                { "content": { "parts": [{ "text": "Hello " }, { "text": "there" }] } },
                { "content": { "parts": [{ "text": "ignored" }] } }
            ]
        }));
        assert_eq!(first_candidate_text(response).unwrap(), "Hello there");
    }

    #[test]
    fn missing_candidates_is_empty_response() {
        assert_matches!(
            first_candidate_text(parse(json!({}))),
            Err(GenerationError::EmptyResponse)
        );
        assert_matches!(
            first_candidate_text(parse(json!({ "candidates": [{ "finishReason": "SAFETY" }] }))),
            Err(GenerationError::EmptyResponse)
        );
    }

    #[test]
    fn requires_api_key() {
        assert_matches!(
            GeminiClient::from_config(&LlmConfig::disabled()),
            Err(GenerationError::NotConfigured)
        );
    }

    #[test]
    fn debug_output_hides_api_key() {
        let mut config = LlmConfig::disabled();
        config.api_key = Some("SECRET-KEY-123".into());
        let client = GeminiClient::from_config(&config).unwrap();

        let debug = format!("{client:?}");
        assert!(debug.contains("gemini-1.5-flash"));
        assert!(!debug.contains("SECRET-KEY-123"));
    }

    #[tokio::test]
    async fn connection_failure_does_not_expose_api_key() {
        let mut config = LlmConfig::disabled();
        config.api_key = Some("SECRET-KEY-123".into());
        config.base_url = "http://127.0.0.1:1".into();
        let client = GeminiClient::from_config(&config).unwrap();

        let err = client.generate("hello").await.unwrap_err();
        assert_matches!(err, GenerationError::Request(_));
        assert!(!err.to_string().contains("SECRET-KEY-123"));
        assert!(!format!("{err:?}").contains("SECRET-KEY-123"));
    }

    #[test]
    fn endpoint_includes_model() {
        let mut config = LlmConfig::disabled();
        config.api_key = Some("k".into());
        config.base_url = "http://localhost:9999/v1beta/".into();
        let client = GeminiClient::from_config(&config).unwrap();
        assert_eq!(
            client.endpoint(),
            "http://localhost:9999/v1beta/models/gemini-1.5-flash:generateContent"
        );
    }
}
