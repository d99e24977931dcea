//! Content generation: the chat-completion call against OpenRouter.
//!
//! This stage is intentionally thin — all prompt engineering lives in
//! [`crate::prompt`] so the conversation can change without touching the
//! wire handling here.
//!
//! [`ContentGenerator`] is the seam the dispatcher and the HTTP service
//! depend on. Production code uses [`OpenRouterClient`]; tests substitute a
//! counting stub to prove the fail-fast paths never reach the network.
//!
//! ## Failure taxonomy
//!
//! Four failure shapes map onto four error variants: transport failure
//! → `ConnectionFailed`, HTTP 429 →
//! `RateLimited`, any other non-success status or error body → `ApiError`,
//! and a well-formed response with zero choices → `EmptyCompletion`. A
//! successful call never returns empty content silently.

use crate::credentials::Credentials;
use crate::error::DsegenError;
use crate::prompt::{build_prompt, ChatMessage};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Fixed chat-completions endpoint base.
pub const OPENROUTER_BASE_URL: &str = "https://openrouter.ai/api/v1";

/// Anything that can turn a topic into a markdown paper.
#[async_trait]
pub trait ContentGenerator: Send + Sync {
    /// Generate the markdown paper for `topic`.
    async fn generate(&self, topic: &str) -> Result<String, DsegenError>;
}

/// Generator stand-in for processes started without credentials.
///
/// Every call fails with [`DsegenError::MissingCredentials`] — absence of
/// credentials only becomes an error at the moment generation is attempted.
pub struct UnconfiguredGenerator;

#[async_trait]
impl ContentGenerator for UnconfiguredGenerator {
    async fn generate(&self, _topic: &str) -> Result<String, DsegenError> {
        Err(DsegenError::MissingCredentials)
    }
}

/// Chat-completion client for OpenRouter's OpenAI-compatible API.
///
/// Constructed once at process start with loaded [`Credentials`] and shared
/// read-only for the life of the process — no hidden global client handle.
pub struct OpenRouterClient {
    http: reqwest::Client,
    credentials: Credentials,
    base_url: String,
}

impl OpenRouterClient {
    pub fn new(credentials: Credentials) -> Self {
        Self {
            http: reqwest::Client::new(),
            credentials,
            base_url: OPENROUTER_BASE_URL.to_string(),
        }
    }

    /// Point the client at a different base URL. Used by tests against a
    /// local mock server.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

// ── Wire types ───────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    #[serde(default)]
    error: Option<ApiErrorBody>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: String,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    message: String,
}

#[async_trait]
impl ContentGenerator for OpenRouterClient {
    async fn generate(&self, topic: &str) -> Result<String, DsegenError> {
        let messages = build_prompt(topic);
        let request = ChatRequest {
            model: &self.credentials.model,
            messages: &messages,
        };

        info!(model = %self.credentials.model, "Requesting paper generation");

        let response = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.credentials.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() || e.is_timeout() {
                    DsegenError::ConnectionFailed {
                        reason: e.to_string(),
                    }
                } else {
                    DsegenError::ApiError {
                        message: e.to_string(),
                    }
                }
            })?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(DsegenError::RateLimited);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DsegenError::ApiError {
                message: format!("HTTP {status}: {}", truncate(&body, 300)),
            });
        }

        let parsed: ChatResponse = response.json().await.map_err(|e| DsegenError::ApiError {
            message: format!("Malformed completion response: {e}"),
        })?;

        // OpenRouter reports some upstream faults as 200 + error body with
        // no choices.
        if let Some(err) = parsed.error {
            if parsed.choices.is_empty() {
                return Err(DsegenError::ApiError {
                    message: err.message,
                });
            }
        }

        let first = parsed
            .choices
            .into_iter()
            .next()
            .ok_or(DsegenError::EmptyCompletion)?;

        debug!(bytes = first.message.content.len(), "Completion received");
        Ok(first.message.content)
    }
}

fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
