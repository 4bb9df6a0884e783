use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use log::{debug, error, info};
use serde::Serialize;
use serde_json::{Value, json};
use thiserror::Error;

use crate::utils::config::GeminiConfig;
use crate::utils::http::{Transport, TransportError, redact_key};

/// What went wrong with an AI call. Callers branch on this, never on the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorKind {
    Config,
    Connection,
    Timeout,
    Request,
    Response,
    Unknown,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Config => "config",
            ErrorKind::Connection => "connection",
            ErrorKind::Timeout => "timeout",
            ErrorKind::Request => "request",
            ErrorKind::Response => "response",
            ErrorKind::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Error, Serialize)]
#[error("{message}")]
pub struct AiError {
    pub kind: ErrorKind,
    pub message: String,
    pub details: Option<String>,
}

impl AiError {
    pub fn missing_key() -> Self {
        AiError {
            kind: ErrorKind::Config,
            message: "Gemini API key is missing. Set GEMINI_API_KEY or gemini.api_key in config.toml."
                .to_string(),
            details: None,
        }
    }

    pub fn invalid_response(details: impl Into<String>) -> Self {
        AiError {
            kind: ErrorKind::Response,
            message: "Received invalid response from AI service. Please try again.".to_string(),
            details: Some(details.into()),
        }
    }

    /// Prepends `context` to the message, keeping the kind.
    pub fn context(mut self, context: &str) -> Self {
        self.message = format!("{}: {}", context, self.message);
        self
    }
}

impl From<TransportError> for AiError {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::Connect(details) => AiError {
                kind: ErrorKind::Connection,
                message: "Could not connect to the AI service. Please check your internet connection and try again."
                    .to_string(),
                details: Some(details),
            },
            TransportError::Timeout => AiError {
                kind: ErrorKind::Timeout,
                message: "The AI service took too long to respond. Please try again.".to_string(),
                details: None,
            },
            TransportError::Decode(details) => AiError::invalid_response(details),
            err @ (TransportError::Status { .. } | TransportError::Other(_)) => AiError {
                kind: ErrorKind::Request,
                message: format!("Error communicating with the AI service: {}", err),
                details: None,
            },
            TransportError::Builder(details) => AiError {
                kind: ErrorKind::Unknown,
                message: format!("An unexpected error occurred: {}", details),
                details: None,
            },
        }
    }
}

/// Thin `generateContent` client: one prompt in, the first candidate's text out.
pub struct GeminiClient {
    transport: Arc<dyn Transport>,
    config: GeminiConfig,
}

impl GeminiClient {
    pub fn new(transport: Arc<dyn Transport>, config: GeminiConfig) -> Self {
        GeminiClient { transport, config }
    }

    pub fn default_timeout(&self) -> Duration {
        self.config.timeout()
    }

    /// Sends `prompt` once. Fails with [`ErrorKind::Config`] before touching the
    /// network when no key is configured.
    pub async fn generate(&self, prompt: &str, timeout: Option<Duration>) -> Result<String, AiError> {
        let api_key = self.config.key().ok_or_else(AiError::missing_key)?;

        let url = format!(
            "{}/{}:generateContent?key={}",
            self.config.endpoint.trim_end_matches('/'),
            self.config.model,
            api_key
        );

        info!("calling Gemini API (model: {})", self.config.model);
        debug!(
            "prompt length: {} characters, url: {}",
            prompt.len(),
            redact_key(&url)
        );

        let request_body = json!({
            "contents": [{"parts": [{"text": prompt}]}]
        });

        let body = self
            .transport
            .post_json(&url, &request_body, timeout)
            .await
            .map_err(|e| {
                error!("Gemini API call failed: {}", e);
                AiError::from(e)
            })?;

        let text = candidate_text(&body).ok_or_else(|| {
            error!("Gemini response is missing candidates[0].content.parts[0].text");
            AiError::invalid_response("missing candidates[0].content.parts[0].text")
        })?;

        debug!("Gemini response length: {} characters", text.len());
        Ok(text.to_string())
    }
}

fn candidate_text(body: &Value) -> Option<&str> {
    body.get("candidates")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("content"))
        .and_then(|c| c.get("parts"))
        .and_then(|p| p.get(0))
        .and_then(|p| p.get("text"))
        .and_then(|t| t.as_str())
}

/// Wraps `text` in a minimal successful `generateContent` envelope.
#[cfg(test)]
pub(crate) fn reply_with_text(text: &str) -> Value {
    json!({ "candidates": [{ "content": { "parts": [{ "text": text }] } }] })
}

#[cfg(test)]
pub(crate) fn test_config(api_key: Option<&str>) -> GeminiConfig {
    GeminiConfig {
        api_key: api_key.map(str::to_string),
        model: "gemini-test".to_string(),
        endpoint: "https://gemini.test/v1/models/".to_string(),
        timeout_secs: 30,
    }
}
