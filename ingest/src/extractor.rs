//! Structured graph extraction via a local Ollama server.
//!
//! One chunk in, one `GraphFragment` out. The request pins temperature to
//! zero and passes the fragment's JSON schema in the `format` field so the
//! model replies with structured output. The HTTP transport sits behind a
//! trait so tests can run against canned responses.

use anyhow::{Context, Result};
use async_trait::async_trait;
use graphloom_models::GraphFragment;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

const SYSTEM_PROMPT: &str = "\
You are an expert in knowledge graph extraction. Your task is to analyze the \
provided text and identify all distinct entities and the relationships \
between them.\n\
\n\
- Nodes: Have an 'id' (entity's name) and 'type' (e.g., Person, Technology).\n\
- Relationships: Must include 'source', 'target', and a 'type' (verb phrase \
in UPPERCASE_SNAKE_CASE).\n\
\n\
Output must be a JSON object with 'nodes' and 'relationships'.";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct OllamaChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub stream: bool,
    /// JSON schema for structured output.
    pub format: serde_json::Value,
    pub options: OllamaOptions,
}

#[derive(Debug, Clone, Serialize)]
pub struct OllamaOptions {
    pub temperature: f32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OllamaChatResponse {
    pub message: ChatMessage,
}

#[async_trait]
pub trait ExtractionTransport: Send + Sync {
    async fn post_chat(&self, url: &str, request: &OllamaChatRequest)
        -> Result<OllamaChatResponse>;
}

struct ReqwestTransport {
    client: reqwest::Client,
}

#[async_trait]
impl ExtractionTransport for ReqwestTransport {
    async fn post_chat(
        &self,
        url: &str,
        request: &OllamaChatRequest,
    ) -> Result<OllamaChatResponse> {
        let response = self
            .client
            .post(url)
            .json(request)
            .send()
            .await
            .context("Failed to reach Ollama")?
            .error_for_status()
            .context("Ollama returned an error status")?;

        response
            .json::<OllamaChatResponse>()
            .await
            .context("Failed to decode Ollama response")
    }
}

pub struct OllamaExtractor {
    base_url: String,
    model: String,
    transport: Arc<dyn ExtractionTransport>,
}

impl OllamaExtractor {
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self::with_transport(
            base_url,
            model,
            Arc::new(ReqwestTransport {
                client: reqwest::Client::new(),
            }),
        )
    }

    fn with_transport(
        base_url: impl Into<String>,
        model: impl Into<String>,
        transport: Arc<dyn ExtractionTransport>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            model: model.into(),
            transport,
        }
    }

    #[cfg(test)]
    pub(crate) fn new_with_transport(
        base_url: impl Into<String>,
        model: impl Into<String>,
        transport: Arc<dyn ExtractionTransport>,
    ) -> Self {
        Self::with_transport(base_url, model, transport)
    }

    /// Extract a graph fragment from one text chunk.
    pub async fn extract(&self, chunk: &str) -> Result<GraphFragment> {
        let request = self.build_request(chunk);
        let url = format!("{}/api/chat", self.base_url.trim_end_matches('/'));

        let response = self.transport.post_chat(&url, &request).await?;

        serde_json::from_str(&response.message.content)
            .context("Model reply was not a valid graph fragment")
    }

    fn build_request(&self, chunk: &str) -> OllamaChatRequest {
        OllamaChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: format!("Here is the text to analyze:\n\n{}", chunk),
                },
            ],
            stream: false,
            format: fragment_schema(),
            options: OllamaOptions { temperature: 0.0 },
        }
    }
}

/// JSON schema of `GraphFragment`, sent as Ollama's `format` field.
fn fragment_schema() -> serde_json::Value {
    serde_json::json!({
        "type": "object",
        "properties": {
            "nodes": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "id": { "type": "string" },
                        "type": { "type": "string" }
                    },
                    "required": ["id", "type"]
                }
            },
            "relationships": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "source": { "type": "string" },
                        "target": { "type": "string" },
                        "type": { "type": "string" }
                    },
                    "required": ["source", "target", "type"]
                }
            }
        },
        "required": ["nodes", "relationships"]
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct CannedTransport {
        content: String,
        seen: Mutex<Vec<(String, OllamaChatRequest)>>,
    }

    impl CannedTransport {
        fn new(content: &str) -> Self {
            Self {
                content: content.to_string(),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ExtractionTransport for CannedTransport {
        async fn post_chat(
            &self,
            url: &str,
            request: &OllamaChatRequest,
        ) -> Result<OllamaChatResponse> {
            self.seen
                .lock()
                .unwrap()
                .push((url.to_string(), request.clone()));
            Ok(OllamaChatResponse {
                message: ChatMessage {
                    role: "assistant".to_string(),
                    content: self.content.clone(),
                },
            })
        }
    }

    #[tokio::test]
    async fn parses_a_structured_reply() {
        let transport = Arc::new(CannedTransport::new(
            r#"{"nodes": [{"id": "Paris", "type": "Location"},
                          {"id": "France", "type": "Location"}],
                "relationships": [{"source": "Paris", "target": "France",
                                   "type": "CAPITAL_OF"}]}"#,
        ));
        let extractor = OllamaExtractor::new_with_transport(
            "http://localhost:11434",
            "llama3.2:1b",
            transport.clone(),
        );

        let fragment = extractor
            .extract("Paris is the capital of France.")
            .await
            .unwrap();

        assert_eq!(fragment.nodes.len(), 2);
        assert_eq!(fragment.nodes[0].id, "Paris");
        assert_eq!(fragment.relationships.len(), 1);
        assert_eq!(fragment.relationships[0].rel_type, "CAPITAL_OF");

        let seen = transport.seen.lock().unwrap();
        let (url, request) = &seen[0];
        assert_eq!(url, "http://localhost:11434/api/chat");
        assert_eq!(request.model, "llama3.2:1b");
        assert!(!request.stream);
        assert_eq!(request.options.temperature, 0.0);
        assert_eq!(request.messages[0].role, "system");
        assert!(request.messages[1].content.contains("Paris is the capital"));
    }

    #[tokio::test]
    async fn malformed_reply_is_an_error_not_a_panic() {
        let transport = Arc::new(CannedTransport::new("The graph contains Paris."));
        let extractor = OllamaExtractor::new_with_transport(
            "http://localhost:11434/",
            "llama3.2:1b",
            transport,
        );

        let result = extractor.extract("some text").await;
        assert!(result.is_err());
    }

    #[test]
    fn schema_covers_both_collections() {
        let schema = fragment_schema();
        assert!(schema["properties"]["nodes"].is_object());
        assert!(schema["properties"]["relationships"].is_object());
    }
}
