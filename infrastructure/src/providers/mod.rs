//! Provider clients
//!
//! One [`ProviderClient`](team_application::ProviderClient) implementation
//! per wire protocol. [`HttpClientFactory`] picks the implementation from the
//! descriptor's [`ProviderApi`](team_domain::ProviderApi).

mod anthropic;
mod factory;
mod gemini;
mod ollama;
mod openai_compatible;
mod testing;

pub use anthropic::AnthropicClient;
pub use factory::HttpClientFactory;
pub use gemini::GeminiClient;
pub use ollama::OllamaClient;
pub use openai_compatible::OpenAiCompatibleClient;
pub use testing::TestingClient;

use reqwest::header::HeaderMap;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use team_application::GatewayError;

/// Longest slice of an error body kept in a failure message
const MAX_ERROR_BODY: usize = 500;

/// Connection settings resolved for one provider
#[derive(Debug, Clone, PartialEq)]
pub struct ClientSettings {
    /// Full provider name, used in log lines
    pub provider: String,
    pub base_url: String,
    pub max_tokens: u32,
    pub temperature: Option<f32>,
    pub connect_timeout: Duration,
}

impl ClientSettings {
    pub fn new(provider: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            base_url: base_url.into(),
            max_tokens: 4096,
            temperature: None,
            connect_timeout: Duration::from_secs(10),
        }
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_temperature(mut self, temperature: Option<f32>) -> Self {
        self.temperature = temperature;
        self
    }

    /// `{base_url}/{path}` without doubled slashes
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

pub(crate) fn build_http_client(
    settings: &ClientSettings,
    headers: HeaderMap,
) -> Result<reqwest::Client, GatewayError> {
    reqwest::Client::builder()
        .connect_timeout(settings.connect_timeout)
        .default_headers(headers)
        .build()
        .map_err(|e| {
            GatewayError::Configuration(format!(
                "Failed to build HTTP client for {}: {}",
                settings.provider, e
            ))
        })
}

pub(crate) async fn post_json<B, R>(
    client: &reqwest::Client,
    url: &str,
    body: &B,
) -> Result<R, GatewayError>
where
    B: Serialize + ?Sized,
    R: DeserializeOwned,
{
    let response = client
        .post(url)
        .json(body)
        .send()
        .await
        .map_err(|e| GatewayError::RequestFailed(e.to_string()))?;
    decode(response).await
}

pub(crate) async fn get_json<R>(client: &reqwest::Client, url: &str) -> Result<R, GatewayError>
where
    R: DeserializeOwned,
{
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| GatewayError::RequestFailed(e.to_string()))?;
    decode(response).await
}

async fn decode<R: DeserializeOwned>(response: reqwest::Response) -> Result<R, GatewayError> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| GatewayError::RequestFailed(e.to_string()))?;

    if !status.is_success() {
        return Err(GatewayError::RequestFailed(format!(
            "HTTP {}: {}",
            status.as_u16(),
            error_detail(&body)
        )));
    }

    serde_json::from_str(&body).map_err(|e| GatewayError::MalformedResponse(e.to_string()))
}

/// Best-effort message from an API error body.
///
/// Understands `{"error": {"message": ...}}`, `{"error": "..."}` and
/// `{"message": ...}`; anything else is returned truncated.
pub(crate) fn error_detail(body: &str) -> String {
    let parsed: Option<serde_json::Value> = serde_json::from_str(body).ok();
    let message = parsed.as_ref().and_then(|v| {
        v.pointer("/error/message")
            .or_else(|| v.get("error"))
            .or_else(|| v.get("message"))
            .and_then(|m| m.as_str())
    });

    match message {
        Some(m) => m.to_string(),
        None => clip_body(body.trim()),
    }
}

/// At most `MAX_ERROR_BODY` bytes of `body`, cut on a char boundary and
/// marked with `...` when something was dropped
fn clip_body(body: &str) -> String {
    if body.len() <= MAX_ERROR_BODY {
        return body.to_string();
    }
    let end = (0..=MAX_ERROR_BODY)
        .rev()
        .find(|&i| body.is_char_boundary(i))
        .unwrap_or(0);
    format!("{}...", &body[..end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_joins_without_double_slash() {
        let settings = ClientSettings::new("openai", "https://api.openai.com/v1/");
        assert_eq!(
            settings.endpoint("/chat/completions"),
            "https://api.openai.com/v1/chat/completions"
        );
        assert_eq!(settings.endpoint("models"), "https://api.openai.com/v1/models");
    }

    #[test]
    fn error_detail_reads_nested_message() {
        let body = r#"{"error":{"message":"Incorrect API key provided","type":"invalid_request_error"}}"#;
        assert_eq!(error_detail(body), "Incorrect API key provided");
    }

    #[test]
    fn error_detail_reads_flat_shapes() {
        assert_eq!(error_detail(r#"{"error":"model not found"}"#), "model not found");
        assert_eq!(error_detail(r#"{"message":"quota"}"#), "quota");
    }

    #[test]
    fn error_detail_truncates_plain_bodies() {
        let body = "x".repeat(2000);
        let detail = error_detail(&body);
        assert_eq!(detail.len(), MAX_ERROR_BODY + 3);
        assert!(detail.ends_with("..."));
        assert_eq!(error_detail("  Bad Gateway \n"), "Bad Gateway");
    }

    #[test]
    fn clipped_body_keeps_whole_characters() {
        // 3-byte characters never line up with the 500-byte limit
        let body = "エラー".repeat(100);
        let detail = clip_body(&body);
        assert!(detail.ends_with("..."));
        assert_eq!(detail.len(), 498 + 3);
        assert_eq!(clip_body("short"), "short");
    }
}
