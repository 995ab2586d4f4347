//! Hugging Face single-string completion client (classic inference API).

use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use tracing::info;

use crate::{http_client, mask_token, GenerateOptions, InferenceClient, InferenceError};

/// Default endpoint base; the model id is appended as a path segment.
pub const HF_INFERENCE_API_BASE: &str = "https://router.huggingface.co/models";

/// Client for the Hugging Face completion API: `POST {base}/{model}` with an
/// `inputs` string, reply extracted from the first element of the returned array.
#[derive(Debug, Clone)]
pub struct HfInferenceClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    inputs: &'a str,
    parameters: Parameters,
}

#[derive(Debug, Serialize)]
struct Parameters {
    max_new_tokens: u32,
    temperature: f32,
    return_full_text: bool,
}

impl HfInferenceClient {
    pub fn new(api_key: String, model: String) -> Self {
        Self {
            client: http_client(crate::DEFAULT_TIMEOUT),
            api_key,
            model,
            base_url: HF_INFERENCE_API_BASE.to_string(),
        }
    }

    /// Overrides the endpoint base (e.g. for proxies or a local mock server).
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    /// Rebuilds the HTTP client with the given per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.client = http_client(timeout);
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

/// Extracts reply text from a completion response body.
///
/// An object with an `error` field fails with that message. An array yields
/// the first element's `generated_text`, falling back to `text`, falling back
/// to the element's string form, trimmed. Anything else is returned in string
/// form, matching the provider's loose output contract.
fn extract_generated_text(data: Value) -> Result<String, InferenceError> {
    if let Some(err) = data.get("error").filter(|v| !v.is_null()) {
        let message = err
            .as_str()
            .map(str::to_string)
            .unwrap_or_else(|| err.to_string());
        return Err(InferenceError::Backend(message));
    }
    if let Some(first) = data.as_array().and_then(|items| items.first()) {
        let text = first
            .get("generated_text")
            .and_then(Value::as_str)
            .or_else(|| first.get("text").and_then(Value::as_str))
            .map(str::to_string)
            .unwrap_or_else(|| first.to_string());
        return Ok(text.trim().to_string());
    }
    Ok(data.to_string())
}

#[async_trait::async_trait]
impl InferenceClient for HfInferenceClient {
    async fn generate(
        &self,
        prompt: &str,
        options: &GenerateOptions,
    ) -> Result<String, InferenceError> {
        let url = format!("{}/{}", self.base_url.trim_end_matches('/'), self.model);
        let request = CompletionRequest {
            inputs: prompt,
            parameters: Parameters {
                max_new_tokens: options.max_tokens,
                temperature: options.temperature,
                return_full_text: false,
            },
        };

        info!(
            model = %self.model,
            prompt_len = prompt.len(),
            api_key = %mask_token(&self.api_key),
            "step: inference HF completion request"
        );

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(InferenceError::Status { status, body });
        }

        let data: Value = response.json().await?;
        let text = extract_generated_text(data)?;
        info!(reply_len = text.len(), "step: inference HF completion done");
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extract_prefers_generated_text() {
        let data = json!([{"generated_text": " hello ", "text": "other"}]);
        assert_eq!(extract_generated_text(data).unwrap(), "hello");
    }

    #[test]
    fn test_extract_falls_back_to_text_field() {
        let data = json!([{"text": "fallback"}]);
        assert_eq!(extract_generated_text(data).unwrap(), "fallback");
    }

    #[test]
    fn test_extract_falls_back_to_element_string_form() {
        let data = json!([{"other": 1}]);
        assert_eq!(extract_generated_text(data).unwrap(), r#"{"other":1}"#);
    }

    #[test]
    fn test_extract_error_field_fails() {
        let data = json!({"error": "rate limited"});
        match extract_generated_text(data) {
            Err(InferenceError::Backend(message)) => assert_eq!(message, "rate limited"),
            other => panic!("expected Backend error, got {:?}", other),
        }
    }

    #[test]
    fn test_extract_null_error_is_not_an_error() {
        let data = json!({"error": null});
        // Falls through to the string form of the whole body.
        assert_eq!(extract_generated_text(data).unwrap(), r#"{"error":null}"#);
    }

    #[test]
    fn test_extract_non_array_body_returns_string_form() {
        let data = json!({"status": "queued"});
        assert_eq!(
            extract_generated_text(data).unwrap(),
            r#"{"status":"queued"}"#
        );
    }
}
