use crate::cli::Args;
use crate::config::ErrorPolicy;
use crate::config::generation::{
    single_turn_request,
    GenerationSettings,
    SamplingParams,
};
use crate::config::prompt;
use crate::llm::LlmConfig;
use crate::llm::chat::{ new_client, ChatClient, ChatError };
use crate::models::chat::{ ChatReply, ChatRequest, ConversationTurn };
use crate::models::gemini::{ Content, GenerateContentRequest, GenerateContentResponse };

use log::{ debug, error, info, warn };
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use uuid::Uuid;

pub const AUTH_PROBE_PROMPT: &str = "Hello, can you give me a one-word response for testing?";
const AUTH_PROBE_SAMPLING: SamplingParams = SamplingParams {
    temperature: 0.0,
    top_p: None,
    max_output_tokens: 10,
};
const SIMPLIFIED_SAMPLING: SamplingParams = SamplingParams {
    temperature: 0.7,
    top_p: None,
    max_output_tokens: 1000,
};

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Chat backend is not initialized: {0}")]
    Unavailable(String),
    #[error("Generation call timed out after {}s", .0.as_secs_f32())]
    Timeout(Duration),
    #[error("Error generating response: {0}")]
    Backend(#[from] ChatError),
    #[error("No response text returned")]
    EmptyResponse,
    #[error("Invalid chat request: {0}")]
    InvalidRequest(String),
}

/// The generation client, or the reason it could not be built at startup.
#[derive(Clone)]
pub enum ClientState {
    Ready(Arc<dyn ChatClient>),
    Unavailable {
        reason: String,
    },
}

pub struct ChatGateway {
    client: ClientState,
    settings: Arc<GenerationSettings>,
    policy: ErrorPolicy,
    timeout: Option<Duration>,
}

impl ChatGateway {
    pub fn new(
        client: ClientState,
        settings: Arc<GenerationSettings>,
        policy: ErrorPolicy,
        timeout: Option<Duration>
    ) -> Self {
        Self { client, settings, policy, timeout }
    }

    pub async fn from_args(args: &Args) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let prompts = prompt::load_prompts(args.prompts_path.as_deref())?;
        let settings = GenerationSettings::from_args(args, prompts)?;
        let policy: ErrorPolicy = args.error_policy.parse()?;
        let llm_config = LlmConfig::from_args(args)?;

        let client = match new_client(&llm_config).await {
            Ok(client) => {
                info!(
                    "Chat client initialized: Type={}, Model={}, BaseURL={:?}",
                    llm_config.backend,
                    client.get_model(),
                    client.get_base_url().as_deref().unwrap_or("none")
                );
                ClientState::Ready(client)
            }
            Err(e) => {
                error!("Failed to initialize {} chat client: {}", llm_config.backend, e);
                error!("Every chat request will fail until the configuration is fixed");
                ClientState::Unavailable { reason: e.to_string() }
            }
        };

        Ok(Self::new(client, Arc::new(settings), policy, llm_config.timeout))
    }

    pub fn is_initialized(&self) -> bool {
        matches!(self.client, ClientState::Ready(_))
    }

    pub fn client_status(&self) -> &'static str {
        if self.is_initialized() { "initialized" } else { "not initialized" }
    }

    pub fn policy(&self) -> ErrorPolicy {
        self.policy
    }

    pub fn settings(&self) -> &GenerationSettings {
        &self.settings
    }

    fn ready_client(&self) -> Result<&Arc<dyn ChatClient>, GatewayError> {
        match &self.client {
            ClientState::Ready(client) => Ok(client),
            ClientState::Unavailable { reason } => Err(GatewayError::Unavailable(reason.clone())),
        }
    }

    /// Handles one chat request under the configured error policy. Only invalid
    /// requests fail under the graceful policy; every other failure becomes the
    /// apology reply.
    pub async fn handle(&self, request: ChatRequest) -> Result<ChatReply, GatewayError> {
        let request_id = Uuid::new_v4();
        let turns = request.into_turns();
        if turns.is_empty() {
            return Err(GatewayError::InvalidRequest("conversation has no messages".to_string()));
        }
        info!("[{}] Chat request received with {} messages", request_id, turns.len());

        match self.generate(&request_id, &turns).await {
            Ok(reply) => {
                info!(
                    "[{}] Returning response with {} citations: {:.100}",
                    request_id,
                    reply.citations.len(),
                    reply.text
                );
                Ok(reply)
            }
            Err(e) => {
                error!("[{}] Error in chat endpoint: {}", request_id, e);
                match self.policy {
                    ErrorPolicy::Graceful =>
                        Ok(ChatReply::text_only(self.settings.prompts.error_reply.clone())),
                    ErrorPolicy::Strict => Err(e),
                }
            }
        }
    }

    /// Walks the attempt profiles in order until one call succeeds.
    async fn generate(
        &self,
        request_id: &Uuid,
        turns: &[ConversationTurn]
    ) -> Result<ChatReply, GatewayError> {
        let client = self.ready_client()?;
        let contents = to_contents(request_id, turns);
        let mut last_error = None;

        for (attempt, profile) in self.settings.profiles.iter().enumerate() {
            let prepared = self.settings.build_request(profile, contents.clone());
            info!(
                "[{}] Attempt {}/{} with {} profile (tool attached: {})",
                request_id,
                attempt + 1,
                self.settings.profiles.len(),
                profile.name(),
                prepared.tool_attached
            );

            match self.call(client, &prepared.body).await {
                Ok(resp) => {
                    info!("[{}] Received response with {} profile", request_id, profile.name());
                    return Ok(self.to_reply(&resp, prepared.tool_attached));
                }
                Err(e) => {
                    warn!("[{}] Error with {} profile: {}", request_id, profile.name(), e);
                    last_error = Some(e);
                }
            }
        }

        Err(
            last_error.unwrap_or_else(|| {
                GatewayError::Unavailable("no attempt profiles configured".to_string())
            })
        )
    }

    async fn call(
        &self,
        client: &Arc<dyn ChatClient>,
        body: &GenerateContentRequest
    ) -> Result<GenerateContentResponse, GatewayError> {
        match self.timeout {
            Some(limit) => {
                let resp = tokio::time
                    ::timeout(limit, client.generate(body)).await
                    .map_err(|_| GatewayError::Timeout(limit))??;
                Ok(resp)
            }
            None => Ok(client.generate(body).await?),
        }
    }

    fn to_reply(&self, resp: &GenerateContentResponse, tool_attached: bool) -> ChatReply {
        let text = resp.reply_text().unwrap_or_else(|| {
            warn!("Response carried no text, substituting the empty-reply message");
            self.settings.prompts.empty_reply.clone()
        });
        let citations = if tool_attached { resp.citations() } else { Vec::new() };
        ChatReply { text, citations }
    }

    /// One cheap call to confirm the backend accepts our credentials.
    pub async fn test_auth(&self) -> Result<String, GatewayError> {
        let client = self.ready_client()?;
        info!("Testing backend authentication with a simple request");
        let resp = self.call(client, &single_turn_request(AUTH_PROBE_PROMPT, AUTH_PROBE_SAMPLING)).await?;
        Ok(resp.reply_text().unwrap_or_default())
    }

    /// Single-turn call without persona, safety overrides or retrieval.
    pub async fn simplified_chat(&self, message: &str) -> Result<String, GatewayError> {
        let client = self.ready_client()?;
        info!("Simplified chat request received with message: {:.50}", message);
        let resp = self.call(client, &single_turn_request(message, SIMPLIFIED_SAMPLING)).await?;
        resp.reply_text().ok_or(GatewayError::EmptyResponse)
    }
}

/// Maps caller turns to the backend's message format, preserving order.
pub fn to_contents(request_id: &Uuid, turns: &[ConversationTurn]) -> Vec<Content> {
    turns
        .iter()
        .map(|turn| {
            debug!(
                "[{}] Adding message with role: {} -> {}, content: {:.50}",
                request_id,
                turn.role,
                turn.backend_role(),
                turn.content
            );
            Content::text(Some(turn.backend_role()), turn.content.clone())
        })
        .collect()
}
