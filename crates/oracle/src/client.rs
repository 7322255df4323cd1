use anyhow::Context;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::warn;

use crate::retry::{RetryConfig, RetryPolicy};
use crate::traits::{DecisionOracle, SENTINEL_RESPONSE, Stage};

const SYSTEM_MESSAGE: &str =
    "You are a virtual patient deciding whether and to whom to share a piece of health news.";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OracleConfig {
    pub api_url: String,
    pub api_key: String,
    pub model: String,
}

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("oracle returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("oracle response had no choices")]
    EmptyChoices,
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    thinking: Thinking,
}

#[derive(Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Serialize)]
struct Thinking {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: String,
}

/// Production oracle: an OpenAI-style chat completion endpoint. Transient
/// transport failures are retried on a fixed delay; once the budget is
/// exhausted the call degrades to the sentinel text instead of erroring,
/// so the engine never has to handle a transport failure.
pub struct LlmOracle {
    config: OracleConfig,
    retry: RetryConfig,
    client: reqwest::Client,
}

impl LlmOracle {
    pub fn new(config: OracleConfig, retry: RetryConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(retry.timeout_secs))
            .build()
            .context("Failed to build oracle HTTP client")?;
        Ok(Self {
            config,
            retry,
            client,
        })
    }

    async fn call_once(&self, prompt: &str) -> Result<String, TransportError> {
        let request = ChatRequest {
            model: self.config.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_MESSAGE.to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: prompt.to_string(),
                },
            ],
            thinking: Thinking { kind: "disabled" },
        };

        let response = self
            .client
            .post(&self.config.api_url)
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TransportError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatResponse = response.json().await?;
        parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or(TransportError::EmptyChoices)
    }
}

#[async_trait]
impl DecisionOracle for LlmOracle {
    async fn decide(&self, stage: Stage, prompt: &str) -> String {
        let policy = RetryPolicy::from(&self.retry);
        match policy
            .run(stage.as_str(), || self.call_once(prompt))
            .await
        {
            Ok(text) => text,
            Err(e) => {
                warn!(stage = stage.as_str(), error = %e, "Oracle call failed after retries");
                SENTINEL_RESPONSE.to_string()
            }
        }
    }
}
