use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use serde_json::Value;
use thiserror::Error;

/// Failure of a single HTTP exchange, classified by what went wrong on the wire.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("connection failed: {0}")]
    Connect(String),

    #[error("request timed out")]
    Timeout,

    #[error("HTTP error (status {status}): {body}")]
    Status { status: u16, body: String },

    #[error("invalid JSON body: {0}")]
    Decode(String),

    #[error("request failed: {0}")]
    Other(String),

    #[error("could not build request: {0}")]
    Builder(String),
}

// Request URLs carry API keys, so they never make it into the message.
impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        let err = err.without_url();
        if err.is_builder() {
            TransportError::Builder(err.to_string())
        } else if err.is_timeout() {
            TransportError::Timeout
        } else if err.is_connect() {
            TransportError::Connect(err.to_string())
        } else if err.is_decode() {
            TransportError::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            TransportError::Status {
                status: status.as_u16(),
                body: err.to_string(),
            }
        } else {
            TransportError::Other(err.to_string())
        }
    }
}

/// JSON-over-HTTP seam shared by the Gemini and Custom Search clients.
#[async_trait]
pub trait Transport: Send + Sync {
    /// POSTs `body` and decodes the JSON reply. `timeout` of `None` leaves the
    /// client default in place.
    async fn post_json(
        &self,
        url: &str,
        body: &Value,
        timeout: Option<Duration>,
    ) -> Result<Value, TransportError>;

    /// GETs `url` with the given query pairs and decodes the JSON reply.
    async fn get_json(&self, url: &str, query: &[(&str, String)]) -> Result<Value, TransportError>;
}

pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        HttpTransport {
            client: reqwest::Client::new(),
        }
    }

    async fn read_json(response: reqwest::Response) -> Result<Value, TransportError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TransportError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let text = response.text().await?;
        debug!("response body length: {}", text.len());

        serde_json::from_str(&text).map_err(|e| TransportError::Decode(e.to_string()))
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post_json(
        &self,
        url: &str,
        body: &Value,
        timeout: Option<Duration>,
    ) -> Result<Value, TransportError> {
        let mut request = self.client.post(url).json(body);
        if let Some(timeout) = timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await?;
        Self::read_json(response).await
    }

    async fn get_json(&self, url: &str, query: &[(&str, String)]) -> Result<Value, TransportError> {
        let url = reqwest::Url::parse_with_params(url, query)
            .map_err(|e| TransportError::Builder(e.to_string()))?;

        let response = self.client.get(url).send().await?;
        Self::read_json(response).await
    }
}

/// Hides the `key=` query parameter before a URL reaches the logs.
pub fn redact_key(url: &str) -> String {
    match url.find("key=") {
        Some(start) => {
            let value_start = start + "key=".len();
            let value_end = url[value_start..]
                .find('&')
                .map(|i| value_start + i)
                .unwrap_or(url.len());
            format!("{}***{}", &url[..value_start], &url[value_end..])
        }
        None => url.to_string(),
    }
}

#[cfg(test)]
pub mod testing {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use super::*;

    #[derive(Debug, Clone)]
    pub struct RecordedCall {
        pub method: &'static str,
        pub url: String,
        pub body: Option<Value>,
        pub query: Vec<(String, String)>,
        pub timeout: Option<Duration>,
    }

    /// Replays canned replies in order and records every call it receives.
    /// Once the replies run out every further call gets an empty object.
    #[derive(Default)]
    pub struct FakeTransport {
        replies: Mutex<VecDeque<Result<Value, TransportError>>>,
        calls: Mutex<Vec<RecordedCall>>,
    }

    impl FakeTransport {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_replies(replies: Vec<Result<Value, TransportError>>) -> Self {
            FakeTransport {
                replies: Mutex::new(replies.into()),
                calls: Mutex::new(Vec::new()),
            }
        }

        pub fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }

        pub fn calls(&self) -> Vec<RecordedCall> {
            self.calls.lock().unwrap().clone()
        }

        fn next_reply(&self) -> Result<Value, TransportError> {
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(Value::Object(Default::default())))
        }
    }

    #[async_trait]
    impl Transport for FakeTransport {
        async fn post_json(
            &self,
            url: &str,
            body: &Value,
            timeout: Option<Duration>,
        ) -> Result<Value, TransportError> {
            self.calls.lock().unwrap().push(RecordedCall {
                method: "POST",
                url: url.to_string(),
                body: Some(body.clone()),
                query: Vec::new(),
                timeout,
            });
            self.next_reply()
        }

        async fn get_json(
            &self,
            url: &str,
            query: &[(&str, String)],
        ) -> Result<Value, TransportError> {
            self.calls.lock().unwrap().push(RecordedCall {
                method: "GET",
                url: url.to_string(),
                body: None,
                query: query
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.clone()))
                    .collect(),
                timeout: None,
            });
            self.next_reply()
        }
    }
}
