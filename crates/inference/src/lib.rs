//! # Inference backend clients
//!
//! Defines the [`InferenceClient`] trait and three implementations, one per
//! remote provider wire format:
//!
//! - [`HfInferenceClient`]: Hugging Face single-string completion API
//! - [`HfRouterClient`]: Hugging Face router chat API
//! - [`OpenRouterClient`]: OpenRouter chat-completions API
//!
//! Exactly one client is constructed at startup from [`InferenceConfig`]; the
//! rest of the application only sees the trait, so switching providers never
//! touches dispatch or prompt logic.
//!
//! Every call is a single HTTP request with a bounded timeout and no retry: a
//! failed call surfaces immediately as [`InferenceError`].

use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;

mod config;
mod hf_inference;
mod hf_router;
mod openrouter;

pub use config::{InferenceConfig, Provider, DEFAULT_HF_MODEL, DEFAULT_OPENROUTER_MODEL};
pub use hf_inference::{HfInferenceClient, HF_INFERENCE_API_BASE};
pub use hf_router::{HfRouterClient, HF_ROUTER_API_URL, ROUTER_SYSTEM_CONTENT};
pub use openrouter::{OpenRouterClient, OPENROUTER_API_URL};

/// Default per-request timeout. Overridable via `HTTP_TIMEOUT_SECS`.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Generation parameters passed with every request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerateOptions {
    pub max_tokens: u32,
    pub temperature: f32,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            max_tokens: 200,
            temperature: 0.7,
        }
    }
}

/// Failure of one inference call. Never retried; the dispatch boundary turns
/// this into a user-visible reply.
#[derive(Error, Debug)]
pub enum InferenceError {
    /// Network-level failure (connect, timeout, decode of the transport body).
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-2xx HTTP status; carries the status and the raw response body.
    #[error("backend returned status {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    /// 2xx response whose body carried an explicit `error` field.
    #[error("error from backend: {0}")]
    Backend(String),

    /// 2xx response whose body did not match the expected structure.
    #[error("unexpected response shape: {0}")]
    Malformed(String),
}

/// Inference client interface: one prompt in, one reply text out.
#[async_trait]
pub trait InferenceClient: Send + Sync {
    /// Sends the prompt to the backend and returns the extracted reply text.
    async fn generate(
        &self,
        prompt: &str,
        options: &GenerateOptions,
    ) -> Result<String, InferenceError>;
}

/// One element of a chat-style `messages` array (variants B and C).
#[derive(Debug, Serialize)]
pub(crate) struct WireChatMessage<'a> {
    pub role: &'a str,
    pub content: &'a str,
}

/// Masks an API key/token for safe logging: shows first 7 chars + "***" + last 4 chars.
/// If length <= 11, returns "***" to avoid leaking any part of the key.
pub fn mask_token(token: &str) -> String {
    let len = token.len();
    if len <= 11 {
        "***".to_string()
    } else {
        let head_len = 7.min(len);
        let tail_len = 4.min(len.saturating_sub(head_len));
        let head = &token[..head_len];
        let tail = if tail_len > 0 {
            &token[len - tail_len..]
        } else {
            ""
        };
        format!("{}***{}", head, tail)
    }
}

/// Builds the shared HTTP client with the given per-request timeout.
pub(crate) fn http_client(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .expect("Failed to create HTTP client")
}
