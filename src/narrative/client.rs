//! Client for the external trade-idea generator.

use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use backoff::ExponentialBackoffBuilder;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::types::{ChatMessage, ChatRequest, ChatResponse};

const DEFAULT_API_URL: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "gpt-4o-mini";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

const SYSTEM_PROMPT: &str = "You are an NBA front-office analyst who knows the Collective \
Bargaining Agreement's salary-matching and apron rules. Suggest realistic trades.";

/// Connection settings for the text generator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NarrativeConfig {
    /// Base URL of a chat-completions compatible API
    pub api_url: String,

    /// Bearer token, if the service needs one
    #[serde(skip_serializing)]
    pub api_key: Option<String>,

    pub model: String,

    pub temperature: f32,

    /// Give up retrying transient failures after this many seconds
    pub max_retry_secs: u64,
}

impl Default for NarrativeConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.7,
            max_retry_secs: 30,
        }
    }
}

impl NarrativeConfig {
    /// Read settings from the environment:
    /// - NARRATIVE_API_KEY
    /// - NARRATIVE_API_URL (defaults to the OpenAI API)
    /// - NARRATIVE_MODEL (defaults to gpt-4o-mini)
    /// - NARRATIVE_MAX_RETRY_SECS (defaults to 30)
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let max_retry_secs = match std::env::var("NARRATIVE_MAX_RETRY_SECS") {
            Ok(v) => v.parse().context("Invalid NARRATIVE_MAX_RETRY_SECS")?,
            Err(_) => defaults.max_retry_secs,
        };

        Ok(Self {
            api_url: std::env::var("NARRATIVE_API_URL").unwrap_or(defaults.api_url),
            api_key: std::env::var("NARRATIVE_API_KEY").ok().filter(|k| !k.is_empty()),
            model: std::env::var("NARRATIVE_MODEL").unwrap_or(defaults.model),
            temperature: defaults.temperature,
            max_retry_secs,
        })
    }
}

/// Sends trade prompts to the generator and returns its text.
pub struct NarrativeClient {
    http: Client,
    config: NarrativeConfig,
}

impl NarrativeClient {
    pub fn new(config: NarrativeConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { http, config })
    }

    pub fn from_env() -> Result<Self> {
        Self::new(NarrativeConfig::from_env()?)
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.config.api_url.trim_end_matches('/'))
    }

    /// Generate text for a prompt, retrying transient failures.
    pub async fn generate(&self, prompt: &str) -> Result<String> {
        let request = ChatRequest {
            model: self.config.model.clone(),
            messages: vec![ChatMessage::system(SYSTEM_PROMPT), ChatMessage::user(prompt)],
            temperature: self.config.temperature,
        };

        let policy = ExponentialBackoffBuilder::new()
            .with_max_elapsed_time(Some(Duration::from_secs(self.config.max_retry_secs)))
            .build();

        info!(model = %self.config.model, prompt_len = prompt.len(), "Requesting trade ideas");

        let response = backoff::future::retry(policy, || async { self.send_once(&request).await })
            .await?;

        response
            .text()
            .ok_or_else(|| anyhow!("Narrative service returned no content"))
    }

    async fn send_once(&self, request: &ChatRequest) -> Result<ChatResponse, backoff::Error<anyhow::Error>> {
        let url = self.endpoint();
        debug!(url = %url, "Sending narrative request");

        let mut builder = self.http.post(&url).json(request);
        if let Some(key) = &self.config.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder.send().await.map_err(|e| {
            warn!(error = %e, "Narrative request failed, will retry");
            backoff::Error::transient(anyhow::Error::new(e).context("Failed to reach narrative service"))
        })?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = %status, "Narrative service busy, will retry");
            return Err(backoff::Error::transient(anyhow!(
                "Narrative request failed: {} - {}",
                status,
                body
            )));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(backoff::Error::permanent(anyhow!(
                "Narrative request failed: {} - {}",
                status,
                body
            )));
        }

        response.json::<ChatResponse>().await.map_err(|e| {
            backoff::Error::permanent(anyhow::Error::new(e).context("Failed to parse narrative response"))
        })
    }
}
