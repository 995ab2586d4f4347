//! Hugging Face router chat client (chat-completions style endpoint).

use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use tracing::info;

use crate::{
    http_client, mask_token, GenerateOptions, InferenceClient, InferenceError, WireChatMessage,
};

/// Default chat endpoint of the Hugging Face router.
pub const HF_ROUTER_API_URL: &str = "https://router.huggingface.co/v1/chat/completions";

/// Fixed system message sent with every router chat request. The actual
/// role-play instructions travel inside the user message (the built prompt).
pub const ROUTER_SYSTEM_CONTENT: &str = "You are a role-play assistant. Follow the instructions \
in the user's message and reply in plain text suitable for a chat message.";

/// Client for the router chat API: `POST {url}` with a system + user message
/// pair, reply extracted from `generated_text` or `choices`.
#[derive(Debug, Clone)]
pub struct HfRouterClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

#[derive(Debug, Serialize)]
struct RouterChatRequest<'a> {
    model: &'a str,
    messages: Vec<WireChatMessage<'a>>,
    max_output_tokens: u32,
    temperature: f32,
}

impl HfRouterClient {
    pub fn new(api_key: String, model: String) -> Self {
        Self {
            client: http_client(crate::DEFAULT_TIMEOUT),
            api_key,
            model,
            base_url: HF_ROUTER_API_URL.to_string(),
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

/// Extracts reply text from a router chat response body.
///
/// An `error` field fails with that message. Otherwise a top-level
/// `generated_text` wins, then `choices[0].message.content`, then the
/// response's string form.
fn extract_reply_text(data: Value) -> Result<String, InferenceError> {
    if let Some(err) = data.get("error").filter(|v| !v.is_null()) {
        let message = err
            .as_str()
            .map(str::to_string)
            .unwrap_or_else(|| err.to_string());
        return Err(InferenceError::Backend(message));
    }
    if let Some(text) = data.get("generated_text").and_then(Value::as_str) {
        return Ok(text.to_string());
    }
    if let Some(text) = data
        .pointer("/choices/0/message/content")
        .and_then(Value::as_str)
    {
        return Ok(text.to_string());
    }
    Ok(data.to_string())
}

#[async_trait::async_trait]
impl InferenceClient for HfRouterClient {
    async fn generate(
        &self,
        prompt: &str,
        options: &GenerateOptions,
    ) -> Result<String, InferenceError> {
        let request = RouterChatRequest {
            model: &self.model,
            messages: vec![
                WireChatMessage {
                    role: "system",
                    content: ROUTER_SYSTEM_CONTENT,
                },
                WireChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            max_output_tokens: options.max_tokens,
            temperature: options.temperature,
        };

        info!(
            model = %self.model,
            prompt_len = prompt.len(),
            api_key = %mask_token(&self.api_key),
            "step: inference HF router chat request"
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

        let data: Value = response.json().await?;
        let text = extract_reply_text(data)?;
        info!(reply_len = text.len(), "step: inference HF router chat done");
        Ok(text)
    }
}
