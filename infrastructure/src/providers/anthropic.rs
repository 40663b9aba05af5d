//! Anthropic Messages API client

use super::{ClientSettings, build_http_client, get_json, post_json};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};
use team_application::{GatewayError, ProviderClient};
use team_domain::ResolvedTarget;
use tracing::debug;

const API_VERSION: &str = "2023-06-01";

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<Message<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
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

/// Client for `POST {base}/v1/messages`
pub struct AnthropicClient {
    http: reqwest::Client,
    settings: ClientSettings,
}

impl AnthropicClient {
    pub fn new(settings: ClientSettings, api_key: Option<&str>) -> Result<Self, GatewayError> {
        let mut headers = HeaderMap::new();
        if let Some(api_key) = api_key {
            let key = HeaderValue::from_str(api_key).map_err(|e| {
                GatewayError::Configuration(format!("Invalid API key for {}: {}", settings.provider, e))
            })?;
            headers.insert("x-api-key", key);
        }
        headers.insert("anthropic-version", HeaderValue::from_static(API_VERSION));

        Ok(Self {
            http: build_http_client(&settings, headers)?,
            settings,
        })
    }

    fn request_body<'a>(&self, target: &'a ResolvedTarget, prompt: &'a str) -> MessagesRequest<'a> {
        MessagesRequest {
            model: &target.model,
            max_tokens: self.settings.max_tokens,
            messages: vec![Message {
                role: "user",
                content: prompt,
            }],
            temperature: self.settings.temperature,
        }
    }
}

/// Concatenate the text blocks; tool use and thinking blocks are skipped
fn extract_text(response: MessagesResponse) -> Result<String, GatewayError> {
    let texts: Vec<String> = response
        .content
        .into_iter()
        .filter(|block| block.kind == "text")
        .filter_map(|block| block.text)
        .collect();

    if texts.is_empty() {
        return Err(GatewayError::MalformedResponse(
            "response has no text content".to_string(),
        ));
    }
    Ok(texts.join(""))
}

#[async_trait]
impl ProviderClient for AnthropicClient {
    fn provider(&self) -> &str {
        &self.settings.provider
    }

    async fn send(&self, target: &ResolvedTarget, prompt: &str) -> Result<String, GatewayError> {
        let url = self.settings.endpoint("v1/messages");
        debug!("POST {} ({})", url, target);
        let response: MessagesResponse =
            post_json(&self.http, &url, &self.request_body(target, prompt)).await?;
        extract_text(response)
    }

    async fn list_models(&self) -> Result<Vec<String>, GatewayError> {
        let list: ModelList = get_json(&self.http, &self.settings.endpoint("v1/models")).await?;
        Ok(list.data.into_iter().map(|m| m.id).collect())
    }
}
