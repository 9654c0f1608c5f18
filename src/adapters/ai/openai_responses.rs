//! OpenAI Responses generator - `ReplyGenerator` over the Responses API.
//!
//! Each user owns a server-side conversation, so a request only carries the
//! new combined text plus the conversation id; prior turns are kept by OpenAI.
//!
//! ```ignore
//! let config = OpenAIResponsesConfig::new(api_key)
//!     .with_model("gpt-4.1-mini")
//!     .with_instructions("Answer briefly.");
//! let generator = OpenAIResponsesGenerator::new(config)?;
//! ```
//!
//! Failures are returned as-is; the relay drops the batch rather than retry.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::domain::messaging::ConversationContext;
use crate::ports::{GenerationError, ReplyGenerator};

pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4.1-mini";
pub const DEFAULT_INSTRUCTIONS: &str =
    "You are a helpful assistant that can answer questions directly to the point and concisely.";

/// Configuration for the Responses API generator.
#[derive(Debug, Clone)]
pub struct OpenAIResponsesConfig {
    api_key: SecretString,
    pub base_url: String,
    pub model: String,
    pub instructions: String,
    pub temperature: f32,
    pub max_output_tokens: u32,
    pub timeout: Duration,
}

impl OpenAIResponsesConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: SecretString::new(api_key.into()),
            base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            model: DEFAULT_OPENAI_MODEL.to_string(),
            instructions: DEFAULT_INSTRUCTIONS.to_string(),
            temperature: 0.1,
            max_output_tokens: 150,
            timeout: Duration::from_secs(60),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.instructions = instructions.into();
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_output_tokens(mut self, max_output_tokens: u32) -> Self {
        self.max_output_tokens = max_output_tokens;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

/// `ReplyGenerator` backed by `POST /responses`.
pub struct OpenAIResponsesGenerator {
    config: OpenAIResponsesConfig,
    client: Client,
}

impl OpenAIResponsesGenerator {
    pub fn new(config: OpenAIResponsesConfig) -> Result<Self, GenerationError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| GenerationError::network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url, path)
    }

    fn to_request<'a>(
        &'a self,
        prompt: &'a str,
        conversation: &'a ConversationContext,
    ) -> ResponsesRequest<'a> {
        ResponsesRequest {
            model: &self.config.model,
            input: prompt,
            conversation: conversation.as_str(),
            instructions: &self.config.instructions,
            temperature: self.config.temperature,
            max_output_tokens: self.config.max_output_tokens,
        }
    }

    async fn post<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Response, GenerationError> {
        let response = self
            .client
            .post(self.url(path))
            .bearer_auth(self.config.api_key())
            .json(body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GenerationError::Timeout {
                        timeout_secs: self.config.timeout.as_secs(),
                    }
                } else if e.is_connect() {
                    GenerationError::network(format!("Connection failed: {}", e))
                } else {
                    GenerationError::network(e.to_string())
                }
            })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(status_error(status, body))
    }
}

/// Maps a non-success status to a generation error.
fn status_error(status: StatusCode, body: String) -> GenerationError {
    match status.as_u16() {
        401 | 403 => GenerationError::AuthenticationFailed,
        429 => GenerationError::RateLimited {
            retry_after_secs: parse_retry_after(&body),
        },
        400..=499 => GenerationError::InvalidRequest(format!("{}: {}", status, body)),
        500..=599 => GenerationError::unavailable(format!("Server error {}: {}", status, body)),
        _ => GenerationError::network(format!("Unexpected status {}: {}", status, body)),
    }
}

/// Reads "try again in Ns" out of an OpenAI error message. Defaults to 30s.
fn parse_retry_after(body: &str) -> u32 {
    let message = serde_json::from_str::<ErrorBody>(body)
        .map(|b| b.error.message)
        .unwrap_or_default();

    message
        .split("try again in ")
        .nth(1)
        .and_then(|rest| {
            let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
            digits.parse().ok()
        })
        .unwrap_or(30)
}

/// First `output_text` content of the first message item.
fn first_output_text(response: ResponsesResponse) -> Result<String, GenerationError> {
    let text = response
        .output
        .into_iter()
        .flat_map(|item| item.content)
        .find(|content| content.kind == "output_text")
        .map(|content| content.text)
        .ok_or_else(|| GenerationError::parse("No output_text in response"))?;

    if text.trim().is_empty() {
        return Err(GenerationError::EmptyReply);
    }
    Ok(text)
}

#[async_trait]
impl ReplyGenerator for OpenAIResponsesGenerator {
    async fn generate(
        &self,
        prompt: &str,
        conversation: &ConversationContext,
    ) -> Result<String, GenerationError> {
        let response = self
            .post("responses", &self.to_request(prompt, conversation))
            .await?;

        let body: ResponsesResponse = response
            .json()
            .await
            .map_err(|e| GenerationError::parse(format!("Failed to parse response: {}", e)))?;

        first_output_text(body)
    }

    async fn start_conversation(&self) -> Result<ConversationContext, GenerationError> {
        let response = self.post("conversations", &serde_json::json!({})).await?;

        let body: ConversationResponse = response
            .json()
            .await
            .map_err(|e| GenerationError::parse(format!("Failed to parse conversation: {}", e)))?;

        ConversationContext::new(body.id).map_err(|e| GenerationError::parse(e.to_string()))
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Wire types
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Serialize)]
struct ResponsesRequest<'a> {
    model: &'a str,
    input: &'a str,
    conversation: &'a str,
    instructions: &'a str,
    temperature: f32,
    max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ResponsesResponse {
    #[serde(default)]
    output: Vec<OutputItem>,
}

#[derive(Debug, Deserialize)]
struct OutputItem {
    #[serde(default)]
    content: Vec<OutputContent>,
}

#[derive(Debug, Deserialize)]
struct OutputContent {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
struct ConversationResponse {
    id: String,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: ErrorDetail,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorDetail {
    #[serde(default)]
    message: String,
}
