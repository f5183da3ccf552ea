//! Generative-model client.
//!
//! Defines the [`LanguageModel`] trait — the seam between the chat
//! orchestrator and the external generative API — and [`GeminiModel`],
//! the production implementation calling the Google Generative Language
//! `generateContent` endpoint.
//!
//! # Retry Strategy
//!
//! Transient failures are retried with exponential backoff:
//! - HTTP 429 (rate limited) and 5xx (server error) → retry
//! - HTTP 4xx (client error, not 429) → fail immediately
//! - Network errors → retry
//! - Backoff: 1s, 2s, 4s, ... (capped at 2^5)
//!
//! The default retry budget is a single retry with a 30s per-request
//! timeout; both are configurable under `[assistant]`.

use anyhow::{bail, Result};
use async_trait::async_trait;
use std::time::Duration;

use crate::config::AssistantConfig;
use crate::models::ExtractedInfo;

/// A generative language model that completes a single prompt.
///
/// The orchestrator only depends on this trait, so tests can substitute a
/// counting mock and the HTTP layer never leaks into chat logic.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Generate a free-text completion for `prompt`.
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Model identifier for logging.
    fn model_name(&self) -> &str;
}

/// Client for the Google Generative Language API.
///
/// The API key is resolved from the environment on every call, never at
/// construction: without a key the server still starts and serves the
/// detector and the scheme endpoints, and only chat calls fail at this
/// boundary.
pub struct GeminiModel {
    model: String,
    api_key_env: String,
    max_retries: u32,
    client: reqwest::Client,
}

impl GeminiModel {
    /// Create a client from configuration.
    pub fn new(config: &AssistantConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            model: config.model.clone(),
            api_key_env: config.api_key_env.clone(),
            max_retries: config.max_retries,
            client,
        })
    }
}

#[async_trait]
impl LanguageModel for GeminiModel {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let api_key = std::env::var(&self.api_key_env)
            .map_err(|_| anyhow::anyhow!("{} environment variable not set", self.api_key_env))?;

        let url = format!(
            "https://generativelanguage.googleapis.com/v1beta/models/{}:generateContent?key={}",
            self.model, api_key
        );

        let body = serde_json::json!({
            "contents": [{ "parts": [{ "text": prompt }] }]
        });

        let mut last_err = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                // Exponential backoff: 1s, 2s, 4s, ...
                let delay = Duration::from_secs(1 << (attempt - 1).min(5));
                tokio::time::sleep(delay).await;
            }

            let resp = self.client.post(&url).json(&body).send().await;

            match resp {
                Ok(response) => {
                    let status = response.status();

                    if status.is_success() {
                        let json: serde_json::Value = response.json().await?;
                        return parse_generate_response(&json);
                    }

                    // Rate limited or server error — retry
                    if status.as_u16() == 429 || status.is_server_error() {
                        let body_text = response.text().await.unwrap_or_default();
                        last_err = Some(anyhow::anyhow!(
                            "Generative API error {}: {}",
                            status,
                            body_text
                        ));
                        continue;
                    }

                    // Client error (not 429) — don't retry
                    let body_text = response.text().await.unwrap_or_default();
                    bail!("Generative API error {}: {}", status, body_text);
                }
                Err(e) => {
                    last_err = Some(e.into());
                    continue;
                }
            }
        }

        Err(last_err.unwrap_or_else(|| anyhow::anyhow!("Model call failed after retries")))
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

/// Extract the first candidate's text from a `generateContent` response.
fn parse_generate_response(json: &serde_json::Value) -> Result<String> {
    let text = json
        .get("candidates")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("content"))
        .and_then(|c| c.get("parts"))
        .and_then(|p| p.get(0))
        .and_then(|p| p.get("text"))
        .and_then(|t| t.as_str())
        .ok_or_else(|| anyhow::anyhow!("Invalid generate response: missing candidate text"))?;

    Ok(text.to_string())
}

/// Parse a structured-extraction reply into [`ExtractedInfo`].
///
/// The model is prompted for bare JSON but often wraps it in Markdown
/// code fences; strip those first. Any parse failure degrades to the
/// empty extraction — extraction is best-effort, never an error.
pub fn parse_extraction(reply: &str) -> ExtractedInfo {
    let cleaned = strip_code_fences(reply);
    serde_json::from_str(cleaned.trim()).unwrap_or_default()
}

/// Remove surrounding Markdown code fences (``` or ```json) if present.
fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop an optional language tag on the opening fence line.
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    let rest = rest.trim_start_matches(['\r', '\n']);
    rest.strip_suffix("```").map(str::trim).unwrap_or(rest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_generate_response() {
        let json = serde_json::json!({
            "candidates": [{
                "content": { "parts": [{ "text": "नमस्ते! मैं मदद कर सकता हूं।" }] }
            }]
        });
        assert_eq!(
            parse_generate_response(&json).unwrap(),
            "नमस्ते! मैं मदद कर सकता हूं।"
        );
    }

    #[test]
    fn test_parse_generate_response_missing_text() {
        let json = serde_json::json!({ "candidates": [] });
        assert!(parse_generate_response(&json).is_err());
    }

    #[test]
    fn test_parse_extraction_bare_json() {
        let info = parse_extraction(r#"{"age": 25, "state": "Maharashtra"}"#);
        assert_eq!(info.age, Some(25));
        assert_eq!(info.state.as_deref(), Some("Maharashtra"));
        assert!(info.occupation.is_none());
    }

    #[test]
    fn test_parse_extraction_fenced_json() {
        let reply = "```json\n{\"occupation\": \"farmer\", \"familySize\": 5}\n```";
        let info = parse_extraction(reply);
        assert_eq!(info.occupation.as_deref(), Some("farmer"));
        assert_eq!(info.family_size, Some(5));
    }

    #[test]
    fn test_parse_extraction_garbage_degrades_to_empty() {
        assert!(parse_extraction("I could not find any details.").is_empty());
        assert!(parse_extraction("").is_empty());
    }

    #[tokio::test]
    async fn test_missing_api_key_fails_per_call_not_at_construction() {
        let config = AssistantConfig {
            // A variable nothing in the test environment sets.
            api_key_env: "SAHAYAK_TEST_UNSET_KEY".to_string(),
            ..AssistantConfig::default()
        };

        // Construction must succeed without the key.
        let model = GeminiModel::new(&config).unwrap();

        // Each call fails at the boundary instead.
        let err = model.generate("hello").await.unwrap_err();
        assert!(err.to_string().contains("SAHAYAK_TEST_UNSET_KEY"));
    }
}
