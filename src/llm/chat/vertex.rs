use async_trait::async_trait;
use log::info;
use reqwest::Client as HttpClient;
use reqwest::header::AUTHORIZATION;

use super::{ build_http_client, send_generate, validate_base_url, ChatClient, ChatError };
use crate::llm::auth::TokenSource;
use crate::llm::{ BackendType, LlmConfig };
use crate::models::gemini::{ GenerateContentRequest, GenerateContentResponse };

/// Vertex AI `publishers/google/models/{model}:generateContent`.
pub struct VertexChatClient {
    http: HttpClient,
    tokens: TokenSource,
    project_id: String,
    location: String,
    model: String,
    base_url: String,
}

pub fn default_base_url(location: &str) -> String {
    if location == "global" {
        "https://aiplatform.googleapis.com".to_string()
    } else {
        format!("https://{}-aiplatform.googleapis.com", location)
    }
}

impl VertexChatClient {
    pub fn new(
        http: HttpClient,
        tokens: TokenSource,
        project_id: String,
        location: String,
        model: String,
        base_url: Option<String>
    ) -> Self {
        let base_url = base_url.unwrap_or_else(|| default_base_url(&location));
        Self { http, tokens, project_id, location, model, base_url }
    }

    pub async fn from_config(config: &LlmConfig) -> Result<Self, ChatError> {
        let project_id = config.project_id
            .clone()
            .ok_or_else(|| ChatError::Config("GOOGLE_CLOUD_PROJECT is required for the vertex backend".to_string()))?;

        let tokens = match (&config.access_token, &config.credentials_path) {
            (Some(token), _) => TokenSource::Static(token.clone()),
            (None, Some(path)) => TokenSource::from_key_file(path).await?,
            (None, None) => {
                return Err(
                    ChatError::Config(
                        "Either GOOGLE_APPLICATION_CREDENTIALS or VERTEX_ACCESS_TOKEN is required for the vertex backend".to_string()
                    )
                );
            }
        };

        validate_base_url(config.base_url.as_deref())?;
        let http = build_http_client(config.timeout)?;
        let client = Self::new(
            http,
            tokens,
            project_id,
            config.location.clone(),
            config.model.clone(),
            config.base_url.clone()
        );
        info!(
            "VertexChatClient configured → project={} location={} model={} base_url={}",
            client.project_id,
            client.location,
            client.model,
            client.base_url
        );
        Ok(client)
    }

    pub fn endpoint(&self) -> String {
        format!(
            "{}/v1/projects/{}/locations/{}/publishers/google/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.project_id,
            self.location,
            self.model
        )
    }
}

#[async_trait]
impl ChatClient for VertexChatClient {
    async fn generate(
        &self,
        request: &GenerateContentRequest
    ) -> Result<GenerateContentResponse, ChatError> {
        let token = self.tokens.access_token().await?;
        let req = self.http
            .post(self.endpoint())
            .header(AUTHORIZATION, format!("Bearer {}", token));
        send_generate(req, request).await
    }

    fn get_model(&self) -> String {
        self.model.clone()
    }

    fn get_base_url(&self) -> Option<String> {
        Some(self.base_url.clone())
    }

    fn get_backend(&self) -> BackendType {
        BackendType::Vertex
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(location: &str, base_url: Option<String>) -> VertexChatClient {
        VertexChatClient::new(
            HttpClient::new(),
            TokenSource::Static("t".into()),
            "proj".into(),
            location.into(),
            "gemini-2.0-flash-001".into(),
            base_url
        )
    }

    #[test]
    fn regional_endpoint() {
        assert_eq!(
            client("us-central1", None).endpoint(),
            "https://us-central1-aiplatform.googleapis.com/v1/projects/proj/locations/us-central1/publishers/google/models/gemini-2.0-flash-001:generateContent"
        );
    }

    #[test]
    fn global_endpoint_has_no_region_prefix() {
        assert!(client("global", None).endpoint().starts_with("https://aiplatform.googleapis.com/v1/"));
    }

    #[test]
    fn base_url_override_drops_trailing_slash() {
        let endpoint = client("us-central1", Some("http://localhost:9000/".into())).endpoint();
        assert!(endpoint.starts_with("http://localhost:9000/v1/projects/proj/"));
    }

    #[tokio::test]
    async fn missing_credentials_is_a_config_error() {
        let config = LlmConfig {
            backend: BackendType::Vertex,
            project_id: Some("proj".into()),
            ..Default::default()
        };
        assert!(matches!(VertexChatClient::from_config(&config).await, Err(ChatError::Config(_))));
    }
}
