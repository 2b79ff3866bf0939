use std::time::Duration;

use fanout_logging::fanout_trace;
use serde::{Deserialize, Serialize};

use crate::{RequestError, RequestErrorKind};

#[derive(Debug, Clone)]
pub struct CompletionSettings {
    /// API root, e.g. `https://openrouter.ai/api/v1`.
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    /// Bounds connection setup only. The request itself runs under the
    /// transport defaults.
    pub connect_timeout: Duration,
}

impl CompletionSettings {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            model: model.into(),
            connect_timeout: Duration::from_secs(10),
        }
    }
}

/// One stateless completion call per prompt.
#[async_trait::async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, RequestError>;
}

/// Client for OpenAI-compatible `chat/completions` endpoints.
#[derive(Debug, Clone)]
pub struct OpenAiCompatibleClient {
    settings: CompletionSettings,
    endpoint: reqwest::Url,
    client: reqwest::Client,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
    error: Option<ServiceError>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: Option<ChoiceMessage>,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ServiceError,
}

#[derive(Deserialize)]
struct ServiceError {
    message: String,
}

impl OpenAiCompatibleClient {
    pub fn new(settings: CompletionSettings) -> Result<Self, RequestError> {
        let endpoint = format!("{}/chat/completions", settings.base_url.trim_end_matches('/'));
        let endpoint = reqwest::Url::parse(&endpoint)
            .map_err(|err| RequestError::new(RequestErrorKind::InvalidEndpoint, err.to_string()))?;
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .build()
            .map_err(|err| RequestError::new(RequestErrorKind::Network, err.to_string()))?;
        Ok(Self {
            settings,
            endpoint,
            client,
        })
    }

    pub fn endpoint(&self) -> &reqwest::Url {
        &self.endpoint
    }

    pub fn model(&self) -> &str {
        &self.settings.model
    }
}

#[async_trait::async_trait]
impl CompletionClient for OpenAiCompatibleClient {
    async fn complete(&self, prompt: &str) -> Result<String, RequestError> {
        let body = ChatRequest {
            model: &self.settings.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
        };

        let response = self
            .client
            .post(self.endpoint.clone())
            .bearer_auth(&self.settings.api_key)
            .json(&body)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        let text = response.text().await.map_err(map_reqwest_error)?;
        fanout_trace!("completion response status={} body_len={}", status, text.len());

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorEnvelope>(&text)
                .map(|envelope| envelope.error.message)
                .unwrap_or_else(|_| status.to_string());
            return Err(RequestError::new(
                RequestErrorKind::HttpStatus(status.as_u16()),
                message,
            ));
        }

        let parsed: ChatResponse = serde_json::from_str(&text)
            .map_err(|err| RequestError::new(RequestErrorKind::MalformedResponse, err.to_string()))?;
        if let Some(error) = parsed.error {
            return Err(RequestError::new(RequestErrorKind::Service, error.message));
        }

        let choice = parsed.choices.into_iter().next().ok_or_else(|| {
            RequestError::new(RequestErrorKind::EmptyCompletion, "response carried no choices")
        })?;
        choice
            .message
            .and_then(|message| message.content)
            .ok_or_else(|| {
                RequestError::new(
                    RequestErrorKind::EmptyCompletion,
                    "first choice carried no message content",
                )
            })
    }
}

fn map_reqwest_error(err: reqwest::Error) -> RequestError {
    if err.is_timeout() {
        return RequestError::new(RequestErrorKind::Timeout, err.to_string());
    }
    RequestError::new(RequestErrorKind::Network, err.to_string())
}
