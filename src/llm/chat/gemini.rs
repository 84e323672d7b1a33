use async_trait::async_trait;
use log::info;
use reqwest::Client as HttpClient;

use super::{ build_http_client, send_generate, validate_base_url, ChatClient, ChatError };
use crate::llm::{ BackendType, LlmConfig };
use crate::models::gemini::{ GenerateContentRequest, GenerateContentResponse };

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

pub struct GeminiChatClient {
    http: HttpClient,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiChatClient {
    pub fn new(http: HttpClient, api_key: String, model: String, base_url: Option<String>) -> Self {
        let base_url = base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        Self { http, api_key, model, base_url }
    }

    pub fn from_config(config: &LlmConfig) -> Result<Self, ChatError> {
        let api_key = config.api_key
            .clone()
            .ok_or_else(|| ChatError::Config("CHAT_API_KEY is required for the gemini backend".to_string()))?;
        validate_base_url(config.base_url.as_deref())?;
        let http = build_http_client(config.timeout)?;
        let client = Self::new(http, api_key, config.model.clone(), config.base_url.clone());
        info!(
            "GeminiChatClient configured → model={} base_url={}",
            client.model,
            client.base_url
        );
        Ok(client)
    }

    /// Endpoint without the key; the key travels as a query parameter.
    pub fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }
}

#[async_trait]
impl ChatClient for GeminiChatClient {
    async fn generate(
        &self,
        request: &GenerateContentRequest
    ) -> Result<GenerateContentResponse, ChatError> {
        let req = self.http
            .post(self.endpoint())
            .query(&[("key", self.api_key.as_str())]);
        send_generate(req, request).await
    }

    fn get_model(&self) -> String {
        self.model.clone()
    }

    fn get_base_url(&self) -> Option<String> {
        Some(self.base_url.clone())
    }

    fn get_backend(&self) -> BackendType {
        BackendType::Gemini
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_uses_v1beta_models_path() {
        let client = GeminiChatClient::new(HttpClient::new(), "k".into(), "gemini-pro".into(), None);
        assert_eq!(
            client.endpoint(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-pro:generateContent"
        );
    }

    #[tokio::test]
    async fn unreachable_host_is_an_http_error() {
        let client = GeminiChatClient::new(
            HttpClient::new(),
            "k".into(),
            "m".into(),
            Some("http://127.0.0.1:1".into())
        );
        let err = client.generate(&GenerateContentRequest::default()).await.unwrap_err();
        assert!(matches!(err, ChatError::Http(_)));
    }
}
