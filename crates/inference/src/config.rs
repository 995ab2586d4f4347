//! Inference configuration: provider selection and env loading.
//!
//! Exactly one provider is active per process; it is chosen here once at
//! startup and never changes at runtime.

use anyhow::{Context, Result};
use std::env;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use crate::{
    GenerateOptions, HfInferenceClient, HfRouterClient, InferenceClient, OpenRouterClient,
};

/// Default model for the Hugging Face variants.
pub const DEFAULT_HF_MODEL: &str = "google/flan-t5-small";

/// Default model for OpenRouter.
pub const DEFAULT_OPENROUTER_MODEL: &str = "deepseek/deepseek-r1";

/// Which remote API family the process talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    /// Hugging Face single-string completion API (`PROVIDER=hf-inference`).
    HfInference,
    /// Hugging Face router chat API (`PROVIDER=hf-router`).
    HfRouter,
    /// OpenRouter chat-completions API (`PROVIDER=openrouter`).
    OpenRouter,
}

impl FromStr for Provider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "hf-inference" => Ok(Provider::HfInference),
            "hf-router" => Ok(Provider::HfRouter),
            "openrouter" => Ok(Provider::OpenRouter),
            other => anyhow::bail!(
                "Unknown PROVIDER \"{}\" (expected hf-inference, hf-router, or openrouter)",
                other
            ),
        }
    }
}

/// Inference config loaded from environment variables.
#[derive(Debug, Clone)]
pub struct InferenceConfig {
    pub provider: Provider,
    pub api_key: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub timeout_secs: u64,
    /// Endpoint override for tests and proxies; None uses the provider default.
    pub base_url: Option<String>,
}

impl InferenceConfig {
    /// Loads from environment variables. The provider credential is required;
    /// everything else has a default.
    pub fn from_env() -> Result<Self> {
        let provider = env::var("PROVIDER")
            .map(|s| s.parse())
            .unwrap_or(Ok(Provider::HfInference))?;

        let api_key = match provider {
            Provider::HfInference | Provider::HfRouter => {
                env::var("HF_TOKEN").context("HF_TOKEN not set")?
            }
            Provider::OpenRouter => env::var("OPENROUTER_KEY").context("OPENROUTER_KEY not set")?,
        };

        let model = env::var("MODEL").unwrap_or_else(|_| {
            match provider {
                Provider::HfInference | Provider::HfRouter => DEFAULT_HF_MODEL,
                Provider::OpenRouter => DEFAULT_OPENROUTER_MODEL,
            }
            .to_string()
        });

        let max_tokens = env::var("MAX_TOKENS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(200);
        let temperature = env::var("TEMPERATURE")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(0.7);
        let timeout_secs = env::var("HTTP_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(30);
        let base_url = env::var("INFERENCE_BASE_URL")
            .ok()
            .filter(|s| !s.trim().is_empty());

        Ok(Self {
            provider,
            api_key,
            model,
            max_tokens,
            temperature,
            timeout_secs,
            base_url,
        })
    }

    /// Generation parameters carried with every request.
    pub fn options(&self) -> GenerateOptions {
        GenerateOptions {
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        }
    }

    /// Constructs the one active client for the configured provider.
    pub fn client(&self) -> Arc<dyn InferenceClient> {
        let timeout = Duration::from_secs(self.timeout_secs);
        match self.provider {
            Provider::HfInference => {
                let mut client = HfInferenceClient::new(self.api_key.clone(), self.model.clone())
                    .with_timeout(timeout);
                if let Some(ref url) = self.base_url {
                    client = client.with_base_url(url.clone());
                }
                Arc::new(client)
            }
            Provider::HfRouter => {
                let mut client = HfRouterClient::new(self.api_key.clone(), self.model.clone())
                    .with_timeout(timeout);
                if let Some(ref url) = self.base_url {
                    client = client.with_base_url(url.clone());
                }
                Arc::new(client)
            }
            Provider::OpenRouter => {
                let mut client = OpenRouterClient::new(self.api_key.clone(), self.model.clone())
                    .with_timeout(timeout);
                if let Some(ref url) = self.base_url {
                    client = client.with_base_url(url.clone());
                }
                Arc::new(client)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_inference_env() {
        for key in [
            "PROVIDER",
            "HF_TOKEN",
            "OPENROUTER_KEY",
            "MODEL",
            "MAX_TOKENS",
            "TEMPERATURE",
            "HTTP_TIMEOUT_SECS",
            "INFERENCE_BASE_URL",
        ] {
            env::remove_var(key);
        }
    }

    #[test]
    fn test_provider_parse() {
        assert_eq!(
            "hf-inference".parse::<Provider>().unwrap(),
            Provider::HfInference
        );
        assert_eq!("hf-router".parse::<Provider>().unwrap(), Provider::HfRouter);
        assert_eq!(
            "openrouter".parse::<Provider>().unwrap(),
            Provider::OpenRouter
        );
        assert!("azure".parse::<Provider>().is_err());
    }

    #[test]
    #[serial]
    fn test_from_env_defaults_to_hf_inference() {
        clear_inference_env();
        env::set_var("HF_TOKEN", "hf_test_token");
        let config = InferenceConfig::from_env().unwrap();
        assert_eq!(config.provider, Provider::HfInference);
        assert_eq!(config.model, DEFAULT_HF_MODEL);
        assert_eq!(config.max_tokens, 200);
        assert_eq!(config.temperature, 0.7);
        assert_eq!(config.timeout_secs, 30);
        assert!(config.base_url.is_none());
        clear_inference_env();
    }

    #[test]
    #[serial]
    fn test_from_env_missing_credential_fails() {
        clear_inference_env();
        assert!(InferenceConfig::from_env().is_err());

        env::set_var("PROVIDER", "openrouter");
        assert!(InferenceConfig::from_env().is_err());
        clear_inference_env();
    }

    #[test]
    #[serial]
    fn test_from_env_openrouter_defaults() {
        clear_inference_env();
        env::set_var("PROVIDER", "openrouter");
        env::set_var("OPENROUTER_KEY", "or_test_key");
        let config = InferenceConfig::from_env().unwrap();
        assert_eq!(config.provider, Provider::OpenRouter);
        assert_eq!(config.model, DEFAULT_OPENROUTER_MODEL);
        clear_inference_env();
    }

    #[test]
    #[serial]
    fn test_from_env_overrides() {
        clear_inference_env();
        env::set_var("PROVIDER", "hf-router");
        env::set_var("HF_TOKEN", "hf_test_token");
        env::set_var("MODEL", "my/model");
        env::set_var("MAX_TOKENS", "64");
        env::set_var("TEMPERATURE", "0.2");
        env::set_var("HTTP_TIMEOUT_SECS", "60");
        let config = InferenceConfig::from_env().unwrap();
        assert_eq!(config.provider, Provider::HfRouter);
        assert_eq!(config.model, "my/model");
        assert_eq!(config.max_tokens, 64);
        assert_eq!(config.temperature, 0.2);
        assert_eq!(config.timeout_secs, 60);
        clear_inference_env();
    }
}
