//! OpenRouter chat-completions client.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::info;

use crate::{
    http_client, mask_token, GenerateOptions, InferenceClient, InferenceError, WireChatMessage,
};

/// Default OpenRouter chat-completions endpoint.
pub const OPENROUTER_API_URL: &str = "https://openrouter.ai/api/v1/chat/completions";

/// Client for the OpenRouter API: `POST {url}` with a single user message,
/// reply read strictly from `choices[0].message.content`.
#[derive(Debug, Clone)]
pub struct OpenRouterClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<WireChatMessage<'a>>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: String,
}

impl OpenRouterClient {
    pub fn new(api_key: String, model: String) -> Self {
        Self {
            client: http_client(crate::DEFAULT_TIMEOUT),
            api_key,
            model,
            base_url: OPENROUTER_API_URL.to_string(),
        }
    }

    /// Overrides the endpoint URL (e.g. for proxies or a local mock server).
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

#[async_trait::async_trait]
impl InferenceClient for OpenRouterClient {
    /// The OpenRouter wire contract carries no generation parameters, so
    /// `options` is not sent.
    async fn generate(
        &self,
        prompt: &str,
        _options: &GenerateOptions,
    ) -> Result<String, InferenceError> {
        let request = ChatCompletionRequest {
            model: &self.model,
            messages: vec![WireChatMessage {
                role: "user",
                content: prompt,
            }],
        };

        info!(
            model = %self.model,
            prompt_len = prompt.len(),
            api_key = %mask_token(&self.api_key),
            "step: inference OpenRouter chat request"
        );

        let response = self
            .client
            .post(&self.base_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(InferenceError::Status { status, body });
        }

        let body = response.text().await?;
        let data: ChatCompletionResponse = serde_json::from_str(&body)
            .map_err(|e| InferenceError::Malformed(e.to_string()))?;
        let text = data
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| InferenceError::Malformed("empty choices".to_string()))?
            .message
            .content;

        info!(reply_len = text.len(), "step: inference OpenRouter chat done");
        Ok(text)
    }
}
