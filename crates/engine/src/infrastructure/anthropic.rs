//! Anthropic Messages API client

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::warn;

use crate::infrastructure::ports::{
    FinishReason, LlmError, LlmPort, LlmRequest, LlmResponse, MessageRole, TokenUsage,
};

/// Default Anthropic base URL.
pub const DEFAULT_ANTHROPIC_BASE_URL: &str = "https://api.anthropic.com";

/// Default model for dialogue.
pub const DEFAULT_ANTHROPIC_MODEL: &str = "claude-opus-4-6";

/// Value sent in the `anthropic-version` header.
pub const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Used when a request does not set `max_tokens` (the API requires one).
const FALLBACK_MAX_TOKENS: u32 = 512;

/// Network limits for one oracle call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpTimeouts {
    pub connect: Duration,
    pub read: Duration,
    /// Hard bound on the whole request, including the body.
    pub overall: Duration,
}

impl Default for HttpTimeouts {
    fn default() -> Self {
        Self {
            connect: Duration::from_secs(30),
            read: Duration::from_secs(60),
            overall: Duration::from_secs(90),
        }
    }
}

/// Client for the Anthropic Messages API
#[derive(Clone)]
pub struct AnthropicClient {
    client: Client,
    base_url: String,
    model: String,
    timeouts: HttpTimeouts,
}

impl AnthropicClient {
    pub fn new(base_url: &str, model: &str) -> Self {
        Self::with_timeouts(base_url, model, HttpTimeouts::default())
    }

    pub fn with_timeouts(base_url: &str, model: &str, timeouts: HttpTimeouts) -> Self {
        let client = Client::builder()
            .connect_timeout(timeouts.connect)
            .read_timeout(timeouts.read)
            .timeout(timeouts.overall)
            .build()
            .unwrap_or_else(|e| {
                warn!(error = %e, "HTTP client builder failed, using defaults");
                Client::new()
            });

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            timeouts,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn map_transport_error(&self, e: reqwest::Error) -> LlmError {
        if e.is_timeout() {
            LlmError::Timeout(self.timeouts.overall.as_secs())
        } else {
            LlmError::RequestFailed(e.to_string())
        }
    }

    async fn send(
        &self,
        api_key: &str,
        api_request: &MessagesRequest,
    ) -> Result<(reqwest::StatusCode, String), LlmError> {
        let response = self
            .client
            .post(format!("{}/v1/messages", self.base_url))
            .header("x-api-key", api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(api_request)
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| self.map_transport_error(e))?;
        Ok((status, body))
    }
}

impl Default for AnthropicClient {
    fn default() -> Self {
        Self::new(DEFAULT_ANTHROPIC_BASE_URL, DEFAULT_ANTHROPIC_MODEL)
    }
}

#[async_trait]
impl LlmPort for AnthropicClient {
    async fn generate(&self, request: LlmRequest) -> Result<LlmResponse, LlmError> {
        let api_key = request.api_key.clone().ok_or(LlmError::MissingCredential)?;
        let api_request = build_request(&self.model, &request);

        let (status, body) = tokio::time::timeout(
            self.timeouts.overall,
            self.send(api_key.expose(), &api_request),
        )
        .await
        .map_err(|_| LlmError::Timeout(self.timeouts.overall.as_secs()))??;

        if !status.is_success() {
            return Err(LlmError::Status {
                status: status.as_u16(),
                message: error_message(status.as_u16(), &body),
            });
        }
        if body.trim().is_empty() {
            return Err(LlmError::InvalidResponse("Empty response from API".to_string()));
        }

        let api_response: MessagesResponse =
            serde_json::from_str(&body).map_err(|e| LlmError::InvalidResponse(e.to_string()))?;

        convert_response(api_response)
    }
}

fn build_request(model: &str, request: &LlmRequest) -> MessagesRequest {
    MessagesRequest {
        model: model.to_string(),
        max_tokens: request.max_tokens.unwrap_or(FALLBACK_MAX_TOKENS),
        system: request.system_prompt.clone(),
        temperature: request.temperature,
        messages: request
            .messages
            .iter()
            .map(|msg| ApiMessage {
                role: match msg.role {
                    MessageRole::User => "user",
                    MessageRole::Assistant => "assistant",
                }
                .to_string(),
                content: msg.content.clone(),
            })
            .collect(),
    }
}

/// Provider error text, or a generic status line when the body has none.
fn error_message(status: u16, body: &str) -> String {
    serde_json::from_str::<ErrorEnvelope>(body)
        .ok()
        .map(|e| e.error.message)
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| format!("API error: {status}"))
}

fn convert_response(response: MessagesResponse) -> Result<LlmResponse, LlmError> {
    let content = response
        .content
        .into_iter()
        .find(|block| block.kind == "text")
        .and_then(|block| block.text)
        .ok_or_else(|| LlmError::InvalidResponse("No text content in LLM response".to_string()))?;

    let finish_reason = match response.stop_reason.as_deref() {
        Some("end_turn") | Some("stop_sequence") => FinishReason::Stop,
        Some("max_tokens") => FinishReason::Length,
        _ => FinishReason::Unknown,
    };

    Ok(LlmResponse {
        content,
        finish_reason,
        usage: response.usage.map(|u| TokenUsage {
            input_tokens: u.input_tokens,
            output_tokens: u.output_tokens,
        }),
    })
}

// =============================================================================
// Messages API types
// =============================================================================

#[derive(Debug, Serialize)]
struct MessagesRequest {
    model: String,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    messages: Vec<ApiMessage>,
}

#[derive(Debug, Serialize)]
struct ApiMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
    stop_reason: Option<String>,
    usage: Option<ApiUsage>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiUsage {
    input_tokens: u32,
    output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}
