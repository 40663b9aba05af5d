//! OpenAI-compatible chat completions client
//!
//! Serves OpenAI, DeepSeek and Groq, which share the `/chat/completions`
//! request and response shapes.

use super::{ClientSettings, build_http_client, get_json, post_json};
use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};
use team_application::{GatewayError, ProviderClient};
use team_domain::ResolvedTarget;
use tracing::debug;

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_completion_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reasoning_effort: Option<&'static str>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ModelList {
    #[serde(default)]
    data: Vec<ModelEntry>,
}

#[derive(Debug, Deserialize)]
struct ModelEntry {
    id: String,
}

/// Client for `POST {base}/chat/completions`
pub struct OpenAiCompatibleClient {
    http: reqwest::Client,
    settings: ClientSettings,
}

impl OpenAiCompatibleClient {
    /// `api_key` is `None` only for local servers, which get no auth header.
    pub fn new(settings: ClientSettings, api_key: Option<&str>) -> Result<Self, GatewayError> {
        let mut headers = HeaderMap::new();
        if let Some(api_key) = api_key {
            let bearer = HeaderValue::from_str(&format!("Bearer {}", api_key)).map_err(|e| {
                GatewayError::Configuration(format!("Invalid API key for {}: {}", settings.provider, e))
            })?;
            headers.insert(AUTHORIZATION, bearer);
        }

        Ok(Self {
            http: build_http_client(&settings, headers)?,
            settings,
        })
    }

    /// OpenAI itself rejects `max_tokens` on reasoning models; the other
    /// compatible vendors only know `max_tokens`.
    fn uses_completion_tokens(&self) -> bool {
        self.settings.provider == "openai"
    }

    fn request_body<'a>(&self, target: &'a ResolvedTarget, prompt: &'a str) -> ChatRequest<'a> {
        let limit = Some(self.settings.max_tokens);
        let (max_tokens, max_completion_tokens) = if self.uses_completion_tokens() {
            (None, limit)
        } else {
            (limit, None)
        };

        ChatRequest {
            model: &target.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            max_tokens,
            max_completion_tokens,
            // reasoning models ignore sampling parameters
            temperature: self
                .settings
                .temperature
                .filter(|_| target.reasoning_effort.is_none()),
            reasoning_effort: target.reasoning_effort.map(|e| e.as_str()),
        }
    }
}

fn extract_text(response: ChatResponse) -> Result<String, GatewayError> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .ok_or_else(|| GatewayError::MalformedResponse("response has no message content".to_string()))
}

#[async_trait]
impl ProviderClient for OpenAiCompatibleClient {
    fn provider(&self) -> &str {
        &self.settings.provider
    }

    async fn send(&self, target: &ResolvedTarget, prompt: &str) -> Result<String, GatewayError> {
        let url = self.settings.endpoint("chat/completions");
        debug!("POST {} ({})", url, target);
        let response: ChatResponse =
            post_json(&self.http, &url, &self.request_body(target, prompt)).await?;
        extract_text(response)
    }

    async fn list_models(&self) -> Result<Vec<String>, GatewayError> {
        let list: ModelList = get_json(&self.http, &self.settings.endpoint("models")).await?;
        Ok(list.data.into_iter().map(|m| m.id).collect())
    }
}
