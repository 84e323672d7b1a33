//! Offline responder that answers from canned keyword rules.

use async_trait::async_trait;
use log::info;

use super::{ ChatClient, ChatError };
use crate::llm::BackendType;
use crate::models::chat::USER_ROLE;
use crate::models::gemini::{
    Candidate,
    CitationMetadata,
    CitationSource,
    GenerateContentRequest,
    GenerateContentResponse,
};

struct MockRule {
    keywords: &'static [&'static str],
    text: &'static str,
    citation: Option<(&'static str, &'static str)>,
}

const RULES: &[MockRule] = &[
    MockRule {
        keywords: &["weather"],
        text: "I don't have real-time weather data access, but San Francisco generally has a cool Mediterranean climate characterized by mild, wet winters and dry summers.",
        citation: None,
    },
    MockRule {
        keywords: &["next.js"],
        text: "Next.js offers several advantages including server-side rendering, static site generation, file-based routing, API routes, and built-in image optimization.",
        citation: Some(("Next.js Documentation", "https://nextjs.org/docs")),
    },
    MockRule {
        keywords: &["algorithm", "dijkstra"],
        text: "Dijkstra's algorithm is used to find the shortest path between nodes in a graph. Here's a simplified implementation in Python:\n\ndef dijkstra(graph, start):\n    distances = {node: float('inf') for node in graph}\n    distances[start] = 0\n    unvisited = list(graph.keys())\n    \n    while unvisited:\n        current = min(unvisited, key=lambda node: distances[node])\n        \n        if distances[current] == float('inf'):\n            break\n            \n        for neighbor, cost in graph[current].items():\n            distance = distances[current] + cost\n            \n            if distance < distances[neighbor]:\n                distances[neighbor] = distance\n                \n        unvisited.remove(current)\n        \n    return distances",
        citation: Some(("Algorithm Explanation", "https://en.wikipedia.org/wiki/Dijkstra%27s_algorithm")),
    },
    MockRule {
        keywords: &["essay", "silicon valley"],
        text: "Silicon Valley, located in the southern part of the San Francisco Bay Area, has become synonymous with technological innovation and entrepreneurship. The region has been the birthplace of numerous tech giants including Apple, Google, and Facebook. Its unique ecosystem combines world-class universities, venture capital firms, and a culture that embraces risk-taking and innovation.",
        citation: Some(("Silicon Valley History", "https://en.wikipedia.org/wiki/Silicon_Valley")),
    },
];

#[derive(Debug, Clone, Default)]
pub struct MockChatClient;

impl MockChatClient {
    pub fn new() -> Self {
        MockChatClient
    }

    /// Text of the most recent user turn in the request.
    fn latest_user_message(request: &GenerateContentRequest) -> String {
        request.contents
            .iter()
            .rev()
            .find(|c| c.role.as_deref() == Some(USER_ROLE))
            .map(|c| {
                c.parts
                    .iter()
                    .filter_map(|p| p.text.as_deref())
                    .collect::<String>()
            })
            .unwrap_or_default()
    }

    pub fn respond(message: &str) -> GenerateContentResponse {
        let lowered = message.to_lowercase();
        let rule = RULES.iter().find(|r| r.keywords.iter().any(|k| lowered.contains(k)));

        let (text, citations) = match rule {
            Some(rule) => {
                let citations = rule.citation
                    .iter()
                    .map(|(title, uri)| CitationSource {
                        title: Some(title.to_string()),
                        uri: Some(uri.to_string()),
                        ..Default::default()
                    })
                    .collect();
                (rule.text.to_string(), citations)
            }
            None =>
                (
                    format!(
                        "You asked: '{}'. This is a mock response from the backend. When fully implemented with Vertex AI credentials, I'll be able to provide more helpful and contextual responses.",
                        message
                    ),
                    Vec::new(),
                ),
        };

        GenerateContentResponse {
            candidates: vec![Candidate {
                citation_metadata: Some(CitationMetadata { citations }),
                finish_reason: Some("STOP".to_string()),
                ..Default::default()
            }],
            text: Some(text),
            ..Default::default()
        }
    }
}

#[async_trait]
impl ChatClient for MockChatClient {
    async fn generate(
        &self,
        request: &GenerateContentRequest
    ) -> Result<GenerateContentResponse, ChatError> {
        let message = Self::latest_user_message(request);
        info!("MockChatClient answering: {:.50}", message);
        Ok(Self::respond(&message))
    }

    fn get_model(&self) -> String {
        "mock".to_string()
    }

    fn get_base_url(&self) -> Option<String> {
        None
    }

    fn get_backend(&self) -> BackendType {
        BackendType::Mock
    }
}
