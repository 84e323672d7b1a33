pub mod auth;
pub mod chat;
use serde::{ Deserialize, Serialize };
use std::str::FromStr;
use std::fmt;
use std::time::Duration;

use crate::cli::Args;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendType {
    Vertex,
    Gemini,
    Mock,
}

#[derive(Debug, PartialEq, Eq)]
pub struct ParseBackendTypeError {
    message: String,
}

impl fmt::Display for ParseBackendTypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ParseBackendTypeError {}
impl FromStr for BackendType {
    type Err = ParseBackendTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "vertex" | "vertexai" => Ok(BackendType::Vertex),
            "gemini" => Ok(BackendType::Gemini),
            "mock" => Ok(BackendType::Mock),
            _ =>
                Err(ParseBackendTypeError {
                    message: format!("Invalid backend type: '{}'", s),
                }),
        }
    }
}

impl fmt::Display for BackendType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendType::Vertex => write!(f, "vertex"),
            BackendType::Gemini => write!(f, "gemini"),
            BackendType::Mock => write!(f, "mock"),
        }
    }
}

/// Everything needed to construct a generation client.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub backend: BackendType,
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: Option<String>,
    pub project_id: Option<String>,
    pub location: String,
    pub credentials_path: Option<String>,
    pub access_token: Option<String>,
    pub timeout: Option<Duration>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            backend: BackendType::Mock,
            api_key: None,
            model: "gemini-2.0-flash-001".to_string(),
            base_url: None,
            project_id: None,
            location: "us-central1".to_string(),
            credentials_path: None,
            access_token: None,
            timeout: None,
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.as_ref().map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

impl LlmConfig {
    pub fn from_args(args: &Args) -> Result<Self, ParseBackendTypeError> {
        let backend = args.chat_llm_type.parse()?;
        let api_key = if !args.chat_api_key.is_empty() {
            Some(args.chat_api_key.clone())
        } else {
            None
        };
        Ok(Self {
            backend,
            api_key,
            model: args.chat_model.clone(),
            base_url: non_empty(&args.chat_base_url),
            project_id: non_empty(&args.project_id),
            location: args.location.clone(),
            credentials_path: non_empty(&args.credentials_path),
            access_token: non_empty(&args.access_token),
            timeout: request_timeout(args.request_timeout_secs),
        })
    }
}

pub fn request_timeout(secs: u64) -> Option<Duration> {
    if secs == 0 { None } else { Some(Duration::from_secs(secs)) }
}
