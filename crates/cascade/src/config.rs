use anyhow::{Context, Result};
use oracle::{OracleConfig, PromptTemplates, RetryConfig, SurveyTemplates};
use population::SamplingConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::fs;

fn default_max_depth() -> usize {
    3
}

/// Whole-run configuration: oracle endpoint, prompt templates, sampling
/// caps, propagation bound, retry budget. Loaded once by the entry point
/// and passed down explicitly; nothing in the core reads globals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimConfig {
    #[serde(flatten)]
    pub oracle: OracleConfig,
    pub prompts: PromptTemplates,
    #[serde(default)]
    pub sampling: SamplingConfig,
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
    #[serde(default)]
    pub retry: RetryConfig,
}

impl SimConfig {
    pub async fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .context(format!("Failed to read config file: {:?}", path))?;
        let config: SimConfig = serde_json::from_str(&content)
            .context(format!("Failed to parse config file: {:?}", path))?;
        Ok(config)
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            oracle: OracleConfig {
                api_url: String::new(),
                api_key: String::new(),
                model: String::new(),
            },
            prompts: PromptTemplates {
                sharing: String::new(),
                survey: SurveyTemplates {
                    before: String::new(),
                    after: String::new(),
                },
            },
            sampling: SamplingConfig::default(),
            max_depth: default_max_depth(),
            retry: RetryConfig::default(),
        }
    }
}
