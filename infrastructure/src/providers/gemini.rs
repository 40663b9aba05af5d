//! Google Gemini `generateContent` client

use super::{ClientSettings, build_http_client, get_json, post_json};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};
use team_application::{GatewayError, ProviderClient};
use team_domain::ResolvedTarget;
use tracing::debug;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    max_output_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ModelList {
    #[serde(default)]
    models: Vec<ModelEntry>,
}

#[derive(Debug, Deserialize)]
struct ModelEntry {
    name: String,
}

/// Client for `POST {base}/models/{model}:generateContent`
pub struct GeminiClient {
    http: reqwest::Client,
    settings: ClientSettings,
}

impl GeminiClient {
    pub fn new(settings: ClientSettings, api_key: Option<&str>) -> Result<Self, GatewayError> {
        let mut headers = HeaderMap::new();
        if let Some(api_key) = api_key {
            let key = HeaderValue::from_str(api_key).map_err(|e| {
                GatewayError::Configuration(format!("Invalid API key for {}: {}", settings.provider, e))
            })?;
            headers.insert("x-goog-api-key", key);
        }

        Ok(Self {
            http: build_http_client(&settings, headers)?,
            settings,
        })
    }

    fn generate_url(&self, model: &str) -> String {
        self.settings
            .endpoint(&format!("models/{}:generateContent", model))
    }

    fn request_body<'a>(&self, prompt: &'a str) -> GenerateRequest<'a> {
        GenerateRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![Part { text: prompt }],
            }],
            generation_config: GenerationConfig {
                max_output_tokens: self.settings.max_tokens,
                temperature: self.settings.temperature,
            },
        }
    }
}

fn extract_text(response: GenerateResponse) -> Result<String, GatewayError> {
    let parts = response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|c| c.parts)
        .unwrap_or_default();

    let texts: Vec<String> = parts.into_iter().filter_map(|p| p.text).collect();
    if texts.is_empty() {
        return Err(GatewayError::MalformedResponse(
            "response has no candidate text".to_string(),
        ));
    }
    Ok(texts.join(""))
}

#[async_trait]
impl ProviderClient for GeminiClient {
    fn provider(&self) -> &str {
        &self.settings.provider
    }

    async fn send(&self, target: &ResolvedTarget, prompt: &str) -> Result<String, GatewayError> {
        let url = self.generate_url(&target.model);
        debug!("POST {} ({})", url, target);
        let response: GenerateResponse =
            post_json(&self.http, &url, &self.request_body(prompt)).await?;
        extract_text(response)
    }

    async fn list_models(&self) -> Result<Vec<String>, GatewayError> {
        let list: ModelList = get_json(&self.http, &self.settings.endpoint("models")).await?;
        Ok(list
            .models
            .into_iter()
            .map(|m| match m.name.strip_prefix("models/") {
                Some(short) => short.to_string(),
                None => m.name,
            })
            .collect())
    }
}
