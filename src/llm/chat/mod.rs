pub mod gemini;
pub mod mock;
pub mod vertex;

use async_trait::async_trait;
use log::debug;
use reqwest::{ Client as HttpClient, RequestBuilder };
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use url::Url;

use super::{ BackendType, LlmConfig };
use self::gemini::GeminiChatClient;
use self::mock::MockChatClient;
use self::vertex::VertexChatClient;
use crate::models::gemini::{ GenerateContentRequest, GenerateContentResponse };

#[derive(Debug, Error)]
pub enum ChatError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Generation API returned status {status}: {body}")]
    Status {
        status: u16,
        body: String,
    },
    #[error("Failed to decode generation response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("Authentication failed: {0}")]
    Auth(String),
    #[error("Client configuration error: {0}")]
    Config(String),
}

#[async_trait]
pub trait ChatClient: Send + Sync {
    /// One `generateContent` round trip.
    async fn generate(
        &self,
        request: &GenerateContentRequest
    ) -> Result<GenerateContentResponse, ChatError>;

    fn get_model(&self) -> String;
    fn get_base_url(&self) -> Option<String>;
    fn get_backend(&self) -> BackendType;
}

pub fn build_http_client(timeout: Option<Duration>) -> Result<HttpClient, ChatError> {
    let mut builder = HttpClient::builder();
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    Ok(builder.build()?)
}

/// Rejects base URL overrides that are not absolute http(s) URLs.
pub fn validate_base_url(base_url: Option<&str>) -> Result<(), ChatError> {
    let Some(raw) = base_url else {
        return Ok(());
    };
    match Url::parse(raw) {
        Ok(url) if url.scheme() == "http" || url.scheme() == "https" => Ok(()),
        _ => Err(ChatError::Config(format!("Invalid CHAT_BASE_URL: {}", raw))),
    }
}

/// Sends a prepared POST carrying `payload` and decodes a generate-content response.
pub async fn send_generate(
    req: RequestBuilder,
    payload: &GenerateContentRequest
) -> Result<GenerateContentResponse, ChatError> {
    let resp = req.json(payload).send().await?;
    let status = resp.status();
    let body = resp.text().await?;

    if !status.is_success() {
        return Err(ChatError::Status { status: status.as_u16(), body });
    }
    debug!("Generation response body ({} bytes)", body.len());
    Ok(serde_json::from_str::<GenerateContentResponse>(&body)?)
}

pub async fn new_client(config: &LlmConfig) -> Result<Arc<dyn ChatClient>, ChatError> {
    let client: Arc<dyn ChatClient> = match config.backend {
        BackendType::Vertex => {
            let specific_client = VertexChatClient::from_config(config).await?;
            Arc::new(specific_client)
        }
        BackendType::Gemini => {
            let specific_client = GeminiChatClient::from_config(config)?;
            Arc::new(specific_client)
        }
        BackendType::Mock => {
            let specific_client = MockChatClient::new();
            Arc::new(specific_client)
        }
    };
    Ok(client)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn mock_backend_always_builds() {
        let client = new_client(&LlmConfig::default()).await.unwrap();
        assert_eq!(client.get_backend(), BackendType::Mock);
    }

    #[tokio::test]
    async fn gemini_backend_requires_api_key() {
        let config = LlmConfig { backend: BackendType::Gemini, ..Default::default() };
        assert!(matches!(new_client(&config).await, Err(ChatError::Config(_))));
    }

    #[tokio::test]
    async fn vertex_backend_requires_project() {
        let config = LlmConfig {
            backend: BackendType::Vertex,
            access_token: Some("token".into()),
            ..Default::default()
        };
        assert!(matches!(new_client(&config).await, Err(ChatError::Config(_))));
    }

    #[test]
    fn base_url_must_be_http() {
        assert!(validate_base_url(None).is_ok());
        assert!(validate_base_url(Some("http://localhost:8080")).is_ok());
        assert!(matches!(validate_base_url(Some("localhost:8080")), Err(ChatError::Config(_))));
        assert!(matches!(validate_base_url(Some("not a url")), Err(ChatError::Config(_))));
    }

    #[test]
    fn status_error_mentions_code_and_body() {
        let err = ChatError::Status { status: 403, body: "PERMISSION_DENIED".into() };
        assert_eq!(err.to_string(), "Generation API returned status 403: PERMISSION_DENIED");
    }
}
