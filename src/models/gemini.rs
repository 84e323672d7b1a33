//! Wire schema of the `generateContent` API shared by Vertex AI and the Gemini API.
//!
//! Every optional field of the response is modelled as `Option` or defaulted
//! collection, so extraction never has to probe for fields at runtime.

use serde::{ Deserialize, Serialize };

use super::chat::Citation;

pub const DEFAULT_CITATION_TITLE: &str = "Source";
pub const DEFAULT_CITATION_URI: &str = "#";

#[derive(Serialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub safety_settings: Vec<SafetySetting>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<Tool>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

impl Content {
    pub fn text(role: Option<&str>, text: impl Into<String>) -> Self {
        Self {
            role: role.map(str::to_string),
            parts: vec![Part::text(text)],
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub citation_metadata: Option<CitationMetadata>,
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Self { text: Some(text.into()), citation_metadata: None }
    }
}

#[derive(Serialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub response_modalities: Vec<String>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct SafetySetting {
    pub category: String,
    pub threshold: String,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Tool {
    pub retrieval: Retrieval,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Retrieval {
    pub vertex_ai_search: VertexAiSearch,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct VertexAiSearch {
    pub datastore: String,
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    /// Flat text accessor some deployments and the mock backend fill in.
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub prompt_feedback: Option<PromptFeedback>,
    #[serde(default)]
    pub model_version: Option<String>,
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
    #[serde(default)]
    pub finish_reason: Option<String>,
    #[serde(default)]
    pub citation_metadata: Option<CitationMetadata>,
    #[serde(default)]
    pub grounding_metadata: Option<GroundingMetadata>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CitationMetadata {
    // Vertex AI says "citations", the Gemini API says "citationSources".
    #[serde(default, alias = "citationSources")]
    pub citations: Vec<CitationSource>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CitationSource {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_index: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_index: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct GroundingMetadata {
    #[serde(default)]
    pub grounding_chunks: Vec<GroundingChunk>,
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct GroundingChunk {
    #[serde(default)]
    pub retrieved_context: Option<GroundingSource>,
    #[serde(default)]
    pub web: Option<GroundingSource>,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct GroundingSource {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub uri: Option<String>,
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    #[serde(default)]
    pub block_reason: Option<String>,
}

fn to_citation(title: Option<&String>, uri: Option<&String>) -> Citation {
    Citation {
        title: title.cloned().unwrap_or_else(|| DEFAULT_CITATION_TITLE.to_string()),
        uri: uri.cloned().unwrap_or_else(|| DEFAULT_CITATION_URI.to_string()),
    }
}

impl GenerateContentResponse {
    pub fn first_candidate(&self) -> Option<&Candidate> {
        self.candidates.first()
    }

    /// Text of the first candidate's parts, concatenated in order.
    pub fn candidate_text(&self) -> String {
        self.first_candidate()
            .and_then(|c| c.content.as_ref())
            .map(|content| {
                content.parts
                    .iter()
                    .filter_map(|p| p.text.as_deref())
                    .collect::<String>()
            })
            .unwrap_or_default()
    }

    /// Candidate text, falling back to the flat `text` field. `None` when both are empty.
    pub fn reply_text(&self) -> Option<String> {
        let text = self.candidate_text();
        if !text.is_empty() {
            return Some(text);
        }
        self.text.clone().filter(|t| !t.is_empty())
    }

    /// Citations of the first candidate: part level first, then candidate level,
    /// then retrieval grounding chunks.
    pub fn citations(&self) -> Vec<Citation> {
        let Some(candidate) = self.first_candidate() else {
            return Vec::new();
        };
        let mut citations = Vec::new();

        if let Some(content) = &candidate.content {
            for part in &content.parts {
                if let Some(meta) = &part.citation_metadata {
                    citations.extend(
                        meta.citations.iter().map(|c| to_citation(c.title.as_ref(), c.uri.as_ref()))
                    );
                }
            }
        }

        if let Some(meta) = &candidate.citation_metadata {
            citations.extend(
                meta.citations.iter().map(|c| to_citation(c.title.as_ref(), c.uri.as_ref()))
            );
        }

        if let Some(grounding) = &candidate.grounding_metadata {
            for chunk in &grounding.grounding_chunks {
                for source in [&chunk.retrieved_context, &chunk.web].into_iter().flatten() {
                    citations.push(to_citation(source.title.as_ref(), source.uri.as_ref()));
                }
            }
        }

        citations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: serde_json::Value) -> GenerateContentResponse {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn request_uses_camel_case_and_skips_unset_fields() {
        let req = GenerateContentRequest {
            contents: vec![Content::text(Some("user"), "Hello")],
            generation_config: Some(GenerationConfig {
                temperature: Some(0.5),
                max_output_tokens: Some(10),
                ..Default::default()
            }),
            ..Default::default()
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(
            json,
            json!({
                "contents": [{ "role": "user", "parts": [{ "text": "Hello" }] }],
                "generationConfig": { "temperature": 0.5, "maxOutputTokens": 10 }
            })
        );
    }

    #[test]
    fn retrieval_tool_serializes_to_vertex_shape() {
        let tool = Tool {
            retrieval: Retrieval {
                vertex_ai_search: VertexAiSearch { datastore: "projects/p/x".into() },
            },
        };
        assert_eq!(
            serde_json::to_value(&tool).unwrap(),
            json!({ "retrieval": { "vertexAiSearch": { "datastore": "projects/p/x" } } })
        );
    }

    #[test]
    fn text_is_concatenated_in_part_order() {
        let resp = parse(json!({
            "candidates": [{
                "content": { "role": "model", "parts": [
                    { "text": "Hello, " },
                    { "citationMetadata": { "citations": [] } },
                    { "text": "world" },
                    { "text": "!" }
                ]}
            }]
        }));
        assert_eq!(resp.reply_text().as_deref(), Some("Hello, world!"));
    }

    #[test]
    fn only_first_candidate_is_read() {
        let resp = parse(json!({
            "candidates": [
                { "content": { "parts": [{ "text": "first" }] } },
                { "content": { "parts": [{ "text": "second" }] } }
            ]
        }));
        assert_eq!(resp.candidate_text(), "first");
    }

    #[test]
    fn flat_text_is_used_when_candidates_are_empty() {
        let resp = parse(json!({ "candidates": [{ "finishReason": "SAFETY" }], "text": "flat" }));
        assert_eq!(resp.reply_text().as_deref(), Some("flat"));
    }

    #[test]
    fn no_text_anywhere_yields_none() {
        assert_eq!(parse(json!({})).reply_text(), None);
        assert_eq!(parse(json!({ "text": "" })).reply_text(), None);
        let blocked = parse(json!({ "promptFeedback": { "blockReason": "SAFETY" } }));
        assert_eq!(blocked.reply_text(), None);
        assert_eq!(
            blocked.prompt_feedback.and_then(|f| f.block_reason).as_deref(),
            Some("SAFETY")
        );
    }

    #[test]
    fn citations_default_missing_title_and_uri() {
        let resp = parse(json!({
            "candidates": [{
                "content": { "parts": [{
                    "text": "x",
                    "citationMetadata": { "citations": [
                        { "title": "Doc", "uri": "https://a" },
                        { "uri": "https://b" },
                        { "title": "Only title" },
                        {}
                    ]}
                }]}
            }]
        }));
        assert_eq!(
            resp.citations(),
            vec![
                Citation { title: "Doc".into(), uri: "https://a".into() },
                Citation { title: "Source".into(), uri: "https://b".into() },
                Citation { title: "Only title".into(), uri: "#".into() },
                Citation { title: "Source".into(), uri: "#".into() },
            ]
        );
    }

    #[test]
    fn citations_are_collected_from_every_level_in_order() {
        let resp = parse(json!({
            "candidates": [{
                "content": { "parts": [
                    { "text": "a", "citationMetadata": { "citations": [{ "title": "part-1" }] } },
                    { "text": "b", "citationMetadata": { "citations": [{ "title": "part-2" }] } }
                ]},
                "citationMetadata": { "citationSources": [{ "uri": "https://candidate" }] },
                "groundingMetadata": { "groundingChunks": [
                    { "retrievedContext": { "title": "Manual", "uri": "gs://bucket/manual.pdf" } },
                    { "web": { "title": "Site", "uri": "https://site" } }
                ]}
            }]
        }));
        let titles: Vec<String> = resp.citations().into_iter().map(|c| c.title).collect();
        assert_eq!(titles, vec!["part-1", "part-2", "Source", "Manual", "Site"]);
    }

    #[test]
    fn empty_response_has_no_citations() {
        assert!(parse(json!({})).citations().is_empty());
    }
}
