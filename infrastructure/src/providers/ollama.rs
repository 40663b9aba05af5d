//! Ollama client for a local daemon

use super::{ClientSettings, build_http_client, get_json, post_json};
use async_trait::async_trait;
use reqwest::header::HeaderMap;
use serde::{Deserialize, Serialize};
use team_application::{GatewayError, ProviderClient};
use team_domain::ResolvedTarget;
use tracing::debug;

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<Message<'a>>,
    stream: bool,
    options: Options,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct Options {
    num_predict: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    message: Option<ResponseMessage>,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: String,
}

#[derive(Debug, Deserialize)]
struct TagList {
    #[serde(default)]
    models: Vec<Tag>,
}

#[derive(Debug, Deserialize)]
struct Tag {
    name: String,
}

/// Client for `POST {base}/api/chat` with streaming disabled
pub struct OllamaClient {
    http: reqwest::Client,
    settings: ClientSettings,
}

impl OllamaClient {
    /// Ollama takes no credentials; a configured key is ignored
    pub fn new(settings: ClientSettings) -> Result<Self, GatewayError> {
        Ok(Self {
            http: build_http_client(&settings, HeaderMap::new())?,
            settings,
        })
    }

    fn request_body<'a>(&self, target: &'a ResolvedTarget, prompt: &'a str) -> ChatRequest<'a> {
        ChatRequest {
            model: &target.model,
            messages: vec![Message {
                role: "user",
                content: prompt,
            }],
            stream: false,
            options: Options {
                num_predict: self.settings.max_tokens,
                temperature: self.settings.temperature,
            },
        }
    }
}

fn extract_text(response: ChatResponse) -> Result<String, GatewayError> {
    response
        .message
        .map(|m| m.content)
        .ok_or_else(|| GatewayError::MalformedResponse("response has no message".to_string()))
}

#[async_trait]
impl ProviderClient for OllamaClient {
    fn provider(&self) -> &str {
        &self.settings.provider
    }

    async fn send(&self, target: &ResolvedTarget, prompt: &str) -> Result<String, GatewayError> {
        let url = self.settings.endpoint("api/chat");
        debug!("POST {} ({})", url, target);
        let response: ChatResponse =
            post_json(&self.http, &url, &self.request_body(target, prompt)).await?;
        extract_text(response)
    }

    async fn list_models(&self) -> Result<Vec<String>, GatewayError> {
        let tags: TagList = get_json(&self.http, &self.settings.endpoint("api/tags")).await?;
        Ok(tags.models.into_iter().map(|t| t.name).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_disables_streaming() {
        let client = OllamaClient::new(
            ClientSettings::new("ollama", "http://localhost:11434").with_max_tokens(64),
        )
        .unwrap();
        let target = ResolvedTarget::new("ollama", "llama3:8b");
        let body = serde_json::to_value(client.request_body(&target, "hi")).unwrap();
        assert_eq!(body["model"], "llama3:8b");
        assert_eq!(body["stream"], false);
        assert_eq!(body["options"]["num_predict"], 64);
    }

    #[test]
    fn extracts_message_content() {
        let response: ChatResponse = serde_json::from_str(
            r#"{"model":"llama3","message":{"role":"assistant","content":"hello"},"done":true}"#,
        )
        .unwrap();
        assert_eq!(extract_text(response).unwrap(), "hello");
    }

    #[test]
    fn parses_tag_list() {
        let tags: TagList =
            serde_json::from_str(r#"{"models":[{"name":"llama3:latest","size":1},{"name":"phi3"}]}"#)
                .unwrap();
        let names: Vec<String> = tags.models.into_iter().map(|t| t.name).collect();
        assert_eq!(names, vec!["llama3:latest", "phi3"]);
    }
}
