// src/llm/client.rs

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Value, json};

use crate::backend::CompletionBackend;
use crate::config::TriadConfig;
use crate::error::{Result, TriadError};

/// OpenAI-compatible chat completions client.
///
/// One instance per model; `with_model` clones the handle (and the
/// underlying connection pool) for a different model name.
#[derive(Clone)]
pub struct CompletionClient {
    client: Client,
    api_base: String,
    api_key: String,
    model: String,
}

impl CompletionClient {
    pub fn new(config: &TriadConfig) -> Result<Self> {
        if config.openai_api_key.is_empty() {
            return Err(TriadError::Config("OPENAI_API_KEY not set".to_string()));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.openai_timeout_secs))
            .build()
            .map_err(|e| TriadError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_base: config.openai_base_url.trim_end_matches('/').to_string(),
            api_key: config.openai_api_key.clone(),
            model: config.completion_model.clone(),
        })
    }

    /// Same credentials and connection pool, different model.
    pub fn with_model(&self, model: &str) -> Self {
        let mut clone = self.clone();
        clone.model = model.to_string();
        clone
    }

    async fn chat(&self, prompt: &str) -> Result<String> {
        let url = format!("{}/chat/completions", self.api_base);
        let payload = json!({
            "model": self.model,
            "messages": [{"role": "user", "content": prompt}],
            "temperature": 0.1,
        });

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&payload)
            .send()
            .await
            .map_err(|e| TriadError::BackendUnavailable(format!("completion request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            tracing::warn!("completion backend returned {}: {}", status, error_text);
            return Err(TriadError::BackendUnavailable(format!(
                "completion backend returned {status}"
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| TriadError::BackendUnavailable(format!("malformed completion response: {e}")))?;

        let text = body["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| {
                TriadError::BackendUnavailable("no text in completion response".to_string())
            })?;

        Ok(text.to_string())
    }
}

#[async_trait]
impl CompletionBackend for CompletionClient {
    fn name(&self) -> &'static str {
        "openai-chat"
    }

    async fn complete(&self, prompt: &str) -> Result<String> {
        self.chat(prompt).await
    }
}
