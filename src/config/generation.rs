//! Process-wide generation settings and the ordered request profiles the
//! gateway walks through when a call fails.

use std::str::FromStr;
use std::sync::Arc;
use log::info;

use super::ConfigError;
use super::prompt::PromptConfig;
use crate::cli::Args;
use crate::models::gemini::{
    Content,
    GenerateContentRequest,
    GenerationConfig,
    Retrieval,
    SafetySetting,
    Tool,
    VertexAiSearch,
};

pub const SAFETY_THRESHOLD_OFF: &str = "OFF";
pub const TEXT_MODALITY: &str = "TEXT";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileKind {
    /// Persona, safety overrides, retrieval tool and full sampling.
    Full,
    /// Sampling only.
    Simple,
}

impl FromStr for ProfileKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "full" => Ok(ProfileKind::Full),
            "simple" => Ok(ProfileKind::Simple),
            _ => Err(ConfigError::UnknownProfile(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplingParams {
    pub temperature: f32,
    pub top_p: Option<f32>,
    pub max_output_tokens: u32,
}

impl SamplingParams {
    pub fn new(temperature: f32, max_output_tokens: u32) -> Self {
        Self { temperature, top_p: None, max_output_tokens }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AttemptProfile {
    pub kind: ProfileKind,
    pub sampling: SamplingParams,
    pub with_persona: bool,
    pub with_safety: bool,
    pub with_tools: bool,
    pub text_modality: bool,
}

impl AttemptProfile {
    pub fn full(sampling: SamplingParams) -> Self {
        Self {
            kind: ProfileKind::Full,
            sampling,
            with_persona: true,
            with_safety: true,
            with_tools: true,
            text_modality: true,
        }
    }

    pub fn simple(sampling: SamplingParams) -> Self {
        Self {
            kind: ProfileKind::Simple,
            sampling,
            with_persona: false,
            with_safety: false,
            with_tools: false,
            text_modality: false,
        }
    }

    pub fn name(&self) -> &'static str {
        match self.kind {
            ProfileKind::Full => "full",
            ProfileKind::Simple => "simple",
        }
    }

    fn generation_config(&self) -> GenerationConfig {
        GenerationConfig {
            temperature: Some(self.sampling.temperature),
            top_p: self.sampling.top_p,
            max_output_tokens: Some(self.sampling.max_output_tokens),
            response_modalities: if self.text_modality {
                vec![TEXT_MODALITY.to_string()]
            } else {
                Vec::new()
            },
        }
    }
}

/// An outbound request plus whether the retrieval tool rides along with it.
#[derive(Debug, Clone)]
pub struct PreparedRequest {
    pub body: GenerateContentRequest,
    pub tool_attached: bool,
}

#[derive(Debug, Clone)]
pub struct GenerationSettings {
    pub profiles: Vec<AttemptProfile>,
    pub prompts: Arc<PromptConfig>,
    pub safety_settings: Vec<SafetySetting>,
    pub retrieval: Option<Tool>,
}

impl GenerationSettings {
    pub fn from_args(args: &Args, prompts: Arc<PromptConfig>) -> Result<Self, ConfigError> {
        let full = SamplingParams {
            temperature: args.temperature,
            top_p: Some(args.top_p),
            max_output_tokens: args.max_output_tokens,
        };
        let simple = SamplingParams::new(args.fallback_temperature, args.fallback_max_output_tokens);

        let profiles = args.attempt_profiles
            .iter()
            .filter(|p| !p.trim().is_empty())
            .map(|p| {
                p.parse::<ProfileKind>().map(|kind| match kind {
                    ProfileKind::Full => AttemptProfile::full(full),
                    ProfileKind::Simple => AttemptProfile::simple(simple),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        if profiles.is_empty() {
            return Err(ConfigError::NoProfiles);
        }

        let safety_settings = args.disabled_safety_categories
            .iter()
            .map(|c| c.trim())
            .filter(|c| !c.is_empty())
            .map(|category| SafetySetting {
                category: category.to_string(),
                threshold: SAFETY_THRESHOLD_OFF.to_string(),
            })
            .collect();

        let retrieval = match args.datastore_id.as_deref().map(str::trim) {
            Some(id) if !id.is_empty() => {
                let datastore = datastore_resource(
                    id,
                    args.project_id.as_deref(),
                    &args.datastore_location
                )?;
                info!("Retrieval tool bound to data store: {}", datastore);
                Some(retrieval_tool(datastore))
            }
            _ => {
                info!("No DATASTORE_ID configured, retrieval tool disabled");
                None
            }
        };

        Ok(Self { profiles, prompts, safety_settings, retrieval })
    }

    pub fn retrieval_enabled(&self) -> bool {
        self.retrieval.is_some()
    }

    pub fn build_request(&self, profile: &AttemptProfile, contents: Vec<Content>) -> PreparedRequest {
        let tools: Vec<Tool> = if profile.with_tools {
            self.retrieval.iter().cloned().collect()
        } else {
            Vec::new()
        };
        let tool_attached = !tools.is_empty();

        let body = GenerateContentRequest {
            contents,
            system_instruction: profile.with_persona.then(|| {
                Content::text(None, self.prompts.system_instruction.clone())
            }),
            generation_config: Some(profile.generation_config()),
            safety_settings: if profile.with_safety {
                self.safety_settings.clone()
            } else {
                Vec::new()
            },
            tools,
        };

        PreparedRequest { body, tool_attached }
    }
}

pub fn retrieval_tool(datastore: String) -> Tool {
    Tool {
        retrieval: Retrieval {
            vertex_ai_search: VertexAiSearch { datastore },
        },
    }
}

/// Expands a bare data store id into its full resource name. Ids that already
/// contain a path are returned unchanged.
pub fn datastore_resource(
    id: &str,
    project_id: Option<&str>,
    location: &str
) -> Result<String, ConfigError> {
    if id.contains('/') {
        return Ok(id.to_string());
    }
    let project = project_id
        .filter(|p| !p.trim().is_empty())
        .ok_or_else(|| ConfigError::DatastoreWithoutProject(id.to_string()))?;
    Ok(
        format!(
            "projects/{}/locations/{}/collections/default_collection/dataStores/{}",
            project,
            location,
            id
        )
    )
}

/// Request with a single user turn and nothing but sampling attached.
pub fn single_turn_request(message: &str, sampling: SamplingParams) -> GenerateContentRequest {
    GenerateContentRequest {
        contents: vec![Content::text(Some("user"), message)],
        generation_config: Some(AttemptProfile::simple(sampling).generation_config()),
        ..Default::default()
    }
}
