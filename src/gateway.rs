use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::time::{timeout, Duration};
use tracing::{debug, warn};

use crate::config::GatewayConfig;

/// Upper bound on generated tokens per explanation.
pub const MAX_TOKENS: u32 = 1000;

/// Upstream error bodies are logged up to this many bytes.
const ERROR_BODY_LIMIT: usize = 1024;

#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("AI gateway misconfigured: AI_GATEWAY_API_KEY is not set")]
    Misconfigured,
    #[error("AI gateway rate limited the request")]
    RateLimited,
    #[error("AI gateway credits exhausted")]
    CreditsExhausted,
    #[error("AI gateway error: {}", .0.as_u16())]
    Status(StatusCode),
    #[error("AI gateway request timed out after {0} ms")]
    Timeout(u64),
    #[error("failed to reach AI gateway: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("failed to decode AI gateway response: {0}")]
    Decode(#[source] reqwest::Error),
}

/// Narrow seam over the chat-completion upstream.
///
/// `Ok(None)` means the upstream answered successfully but produced no text.
#[async_trait]
pub trait Completer: Send + Sync {
    async fn complete(&self, system: &str, user: &str) -> Result<Option<String>, UpstreamError>;
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    max_tokens: u32,
}

#[derive(Debug, Default, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Default, Deserialize)]
struct ChatChoice {
    #[serde(default)]
    message: Option<ChoiceMessage>,
}

#[derive(Debug, Default, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

impl ChatResponse {
    fn first_content(self) -> Option<String> {
        self.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .filter(|content| !content.is_empty())
    }
}

/// HTTP client for an OpenAI-compatible chat-completions endpoint.
pub struct GatewayClient {
    client: reqwest::Client,
    cfg: GatewayConfig,
}

impl GatewayClient {
    pub fn new(cfg: GatewayConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            cfg,
        }
    }
}

#[async_trait]
impl Completer for GatewayClient {
    async fn complete(&self, system: &str, user: &str) -> Result<Option<String>, UpstreamError> {
        if self.cfg.api_key.trim().is_empty() {
            return Err(UpstreamError::Misconfigured);
        }

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let bearer = HeaderValue::from_str(&format!("Bearer {}", self.cfg.api_key))
            .map_err(|_| UpstreamError::Misconfigured)?;
        headers.insert(AUTHORIZATION, bearer);

        let payload = ChatRequest {
            model: &self.cfg.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
            max_tokens: MAX_TOKENS,
        };

        debug!(url = %self.cfg.url, model = %self.cfg.model, "sending completion request");
        let exchange = async {
            let response = self
                .client
                .post(&self.cfg.url)
                .headers(headers)
                .json(&payload)
                .send()
                .await
                .map_err(UpstreamError::Transport)?;

            let status = response.status();
            match status {
                StatusCode::TOO_MANY_REQUESTS => return Err(UpstreamError::RateLimited),
                StatusCode::PAYMENT_REQUIRED => return Err(UpstreamError::CreditsExhausted),
                s if !s.is_success() => {
                    let body = read_error_body(response).await;
                    warn!(status = s.as_u16(), body = %body, "AI gateway returned an error");
                    return Err(UpstreamError::Status(s));
                }
                _ => {}
            }

            let parsed: ChatResponse = response.json().await.map_err(UpstreamError::Decode)?;
            Ok::<_, UpstreamError>(parsed.first_content())
        };

        timeout(Duration::from_millis(self.cfg.timeout_ms), exchange)
            .await
            .map_err(|_| UpstreamError::Timeout(self.cfg.timeout_ms))?
    }
}

/// Reads at most [`ERROR_BODY_LIMIT`] bytes of an error response for logging.
async fn read_error_body(mut response: reqwest::Response) -> String {
    let mut body = Vec::new();
    while body.len() < ERROR_BODY_LIMIT {
        match response.chunk().await {
            Ok(Some(chunk)) => body.extend_from_slice(&chunk),
            Ok(None) => break,
            Err(_) => return "<unable to read response body>".to_string(),
        }
    }
    log_snippet(&body)
}

fn log_snippet(body: &[u8]) -> String {
    if body.len() <= ERROR_BODY_LIMIT {
        return String::from_utf8_lossy(body).into_owned();
    }
    let mut text = String::from_utf8_lossy(&body[..ERROR_BODY_LIMIT]).into_owned();
    text.push_str("...");
    text
}
