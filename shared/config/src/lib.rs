//! Environment-backed settings shared by the explorer and ingest binaries.
//!
//! Defaults match a local developer setup: Neo4j over bolt on the standard
//! port and an Ollama server on localhost.

use std::env;

#[derive(Debug, Clone)]
pub struct Settings {
    pub neo4j_uri: String,
    pub neo4j_user: String,
    pub neo4j_password: String,

    pub ollama_base_url: String,
    pub ollama_model: String,

    pub input_dir: String,
    pub chunk_size: usize,
    pub chunk_overlap: usize,
}

impl Settings {
    /// Load settings from the environment, falling back to local defaults.
    /// Callers are expected to have run `dotenv::dotenv().ok()` already.
    pub fn from_env() -> Self {
        Self {
            neo4j_uri: env::var("NEO4J_URI")
                .unwrap_or_else(|_| "bolt://localhost:7687".to_string()),
            neo4j_user: env::var("NEO4J_USER").unwrap_or_else(|_| "neo4j".to_string()),
            neo4j_password: env::var("NEO4J_PASSWORD")
                .unwrap_or_else(|_| "password".to_string()),
            ollama_base_url: env::var("OLLAMA_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:11434".to_string()),
            ollama_model: env::var("OLLAMA_MODEL")
                .unwrap_or_else(|_| "llama3.2:1b".to_string()),
            input_dir: env::var("INGEST_INPUT_DIR").unwrap_or_else(|_| "input".to_string()),
            chunk_size: parse_or_default("CHUNK_SIZE", env::var("CHUNK_SIZE").ok(), 512),
            chunk_overlap: parse_or_default(
                "CHUNK_OVERLAP",
                env::var("CHUNK_OVERLAP").ok(),
                50,
            ),
        }
    }
}

/// Parse a numeric override, keeping the default on bad input.
fn parse_or_default(key: &str, raw: Option<String>, default: usize) -> usize {
    match raw {
        Some(value) => match value.trim().parse::<usize>() {
            Ok(parsed) => parsed,
            Err(_) => {
                tracing::warn!("Invalid {} value '{}', using default {}", key, value, default);
                default
            }
        },
        None => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_or_default_accepts_valid_numbers() {
        assert_eq!(parse_or_default("CHUNK_SIZE", Some("1024".to_string()), 512), 1024);
        assert_eq!(parse_or_default("CHUNK_SIZE", Some(" 256 ".to_string()), 512), 256);
    }

    #[test]
    fn parse_or_default_falls_back_on_garbage() {
        assert_eq!(parse_or_default("CHUNK_SIZE", Some("abc".to_string()), 512), 512);
        assert_eq!(parse_or_default("CHUNK_SIZE", None, 512), 512);
    }
}
