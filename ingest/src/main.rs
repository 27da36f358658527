//! Batch text → knowledge graph pipeline.
//!
//! Scans the input directory for `.txt` files, splits each into overlapping
//! windows, asks the local Ollama model for a graph fragment per window, and
//! merges every fragment into Neo4j. One failed chunk never aborts the rest;
//! a dead store connection at startup does.

use anyhow::{bail, Context, Result};
use graphloom_config::Settings;
use graphloom_graph::{GraphClient, MergeStats};
use std::path::PathBuf;
use tracing::{error, info, warn};
use walkdir::WalkDir;

mod chunker;
mod extractor;

use chunker::TextChunker;
use extractor::OllamaExtractor;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    dotenv::dotenv().ok();

    let settings = Settings::from_env();

    let files = require_text_files(&settings.input_dir)?;

    let client = GraphClient::connect(&settings)
        .await
        .context("Failed to connect to Neo4j")?;

    let chunker = TextChunker::new(settings.chunk_size, settings.chunk_overlap);
    let extractor = OllamaExtractor::new(&settings.ollama_base_url, &settings.ollama_model);

    let mut totals = MergeStats::default();

    for path in &files {
        info!("📄 Processing file: {}", path.display());

        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) => {
                error!("Failed to read {}: {}", path.display(), e);
                continue;
            }
        };

        let chunks = chunker.split(&text);
        info!("Text split into {} chunk(s)", chunks.len());

        for chunk in &chunks {
            info!("--- Processing chunk {}/{} ---", chunk.index + 1, chunks.len());

            let fragment = match extractor.extract(&chunk.content).await {
                Ok(fragment) => fragment,
                Err(e) => {
                    warn!("Extraction failed for chunk {}: {:#}", chunk.index, e);
                    continue;
                }
            };

            if fragment.is_empty() {
                info!("Nothing extracted from chunk {}", chunk.index);
                continue;
            }

            info!(
                "Extracted {} node(s), {} relationship(s)",
                fragment.nodes.len(),
                fragment.relationships.len()
            );

            match client.merge_fragment(&fragment).await {
                Ok(stats) => {
                    totals.nodes_merged += stats.nodes_merged;
                    totals.nodes_skipped += stats.nodes_skipped;
                    totals.relationships_merged += stats.relationships_merged;
                    totals.relationships_skipped += stats.relationships_skipped;
                }
                Err(e) => {
                    warn!("Merge failed for chunk {}: {}", chunk.index, e);
                }
            }
        }
    }

    info!(
        "🎉 All files processed: {} node(s) and {} relationship(s) merged, {} node(s) and {} relationship(s) skipped",
        totals.nodes_merged,
        totals.relationships_merged,
        totals.nodes_skipped,
        totals.relationships_skipped
    );

    Ok(())
}

/// Resolve the input files or fail the run, with the reason in the log.
fn require_text_files(input_dir: &str) -> Result<Vec<PathBuf>> {
    let files = find_text_files(input_dir);
    if files.is_empty() {
        error!("No .txt files found in '{}'", input_dir);
        bail!("No .txt files found in '{}'", input_dir);
    }
    Ok(files)
}

/// All `.txt` files directly under the input directory, in stable order.
fn find_text_files(input_dir: &str) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(input_dir)
        .max_depth(1)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| path.extension().map(|ext| ext == "txt").unwrap_or(false))
        .collect();
    files.sort();
    files
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn find_text_files_filters_and_sorts() {
        let dir = std::env::temp_dir().join(format!("ingest-test-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("b.txt"), "b").unwrap();
        std::fs::write(dir.join("a.txt"), "a").unwrap();
        std::fs::write(dir.join("notes.md"), "skip me").unwrap();

        let files = find_text_files(dir.to_str().unwrap());
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["a.txt", "b.txt"]);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn missing_input_dir_yields_no_files() {
        assert!(find_text_files("/definitely/not/a/real/dir").is_empty());
    }

    #[test]
    fn empty_input_dir_fails_the_run() {
        let dir = std::env::temp_dir().join(format!("ingest-empty-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();

        let result = require_text_files(dir.to_str().unwrap());
        assert!(result.is_err());

        std::fs::write(dir.join("doc.txt"), "some text").unwrap();
        let files = require_text_files(dir.to_str().unwrap()).unwrap();
        assert_eq!(files.len(), 1);

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
