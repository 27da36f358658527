//! Idempotent fragment merge.
//!
//! Node type strings become store labels, relationship type strings become
//! uppercase edge types. Both go through sanitizers before being spliced into
//! the Cypher text; the entity ids themselves always travel as parameters.
//! Items whose type sanitizes to nothing are dropped, not errors.

use crate::client::GraphClient;
use crate::errors::GraphResult;
use graphloom_models::GraphFragment;
use lazy_static::lazy_static;
use neo4rs::query;
use regex::Regex;
use tracing::warn;

lazy_static! {
    static ref NON_REL_CHARS: Regex = Regex::new(r"[^A-Z_]").unwrap();
}

/// Outcome of merging one fragment.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MergeStats {
    pub nodes_merged: usize,
    pub nodes_skipped: usize,
    pub relationships_merged: usize,
    pub relationships_skipped: usize,
}

/// Title-case a raw node type and strip everything non-alphanumeric, e.g.
/// "software engineer" -> "SoftwareEngineer". Returns `None` when nothing
/// usable remains.
pub fn sanitize_label(raw: &str) -> Option<String> {
    let mut label = String::new();
    let mut prev_alpha = false;
    for c in raw.chars() {
        if c.is_alphanumeric() {
            if c.is_alphabetic() {
                if prev_alpha {
                    label.extend(c.to_lowercase());
                } else {
                    label.extend(c.to_uppercase());
                }
                prev_alpha = true;
            } else {
                label.push(c);
                prev_alpha = false;
            }
        } else {
            prev_alpha = false;
        }
    }
    if label.is_empty() {
        None
    } else {
        Some(label)
    }
}

/// Normalize a raw relationship type to UPPERCASE_SNAKE_CASE, e.g.
/// "capital of" -> "CAPITAL_OF". Returns `None` when nothing usable remains.
pub fn sanitize_rel_type(raw: &str) -> Option<String> {
    let upper = raw.to_uppercase().replace(' ', "_");
    let cleaned = NON_REL_CHARS.replace_all(&upper, "").to_string();
    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned)
    }
}

/// MERGE statement for one node; the label is pre-sanitized, the id is a
/// parameter. Every node also gets the shared `:Entity` label so the
/// explorer can search across categories.
fn node_merge_query(label: &str) -> String {
    format!("MERGE (n:{} {{id: $id}}) SET n.name = $id, n:Entity", label)
}

/// MERGE statement for one relationship. Endpoints are matched by id; if
/// either is absent the MATCH produces no rows and the merge is a silent
/// no-op, which is the intended skip behavior.
fn relationship_merge_query(rel_type: &str) -> String {
    format!(
        "MATCH (a {{id: $source_id}}) \
         MATCH (b {{id: $target_id}}) \
         MERGE (a)-[r:{}]->(b)",
        rel_type
    )
}

impl GraphClient {
    /// Upsert an extracted fragment into the store.
    ///
    /// Merging the same fragment twice yields exactly one node per id and
    /// one edge per (source, type, target) triple. A failure on one item is
    /// logged and does not abort the rest of the fragment.
    pub async fn merge_fragment(&self, fragment: &GraphFragment) -> GraphResult<MergeStats> {
        let mut stats = MergeStats::default();

        for node in &fragment.nodes {
            let label = match sanitize_label(&node.node_type) {
                Some(label) => label,
                None => {
                    warn!("Dropping node '{}': unusable type '{}'", node.id, node.node_type);
                    stats.nodes_skipped += 1;
                    continue;
                }
            };

            let cypher = node_merge_query(&label);
            match self
                .graph()
                .run(query(&cypher).param("id", node.id.as_str()))
                .await
            {
                Ok(()) => stats.nodes_merged += 1,
                Err(e) => {
                    warn!("Failed to merge node '{}': {}", node.id, e);
                    stats.nodes_skipped += 1;
                }
            }
        }

        for rel in &fragment.relationships {
            let rel_type = match sanitize_rel_type(&rel.rel_type) {
                Some(rel_type) => rel_type,
                None => {
                    warn!(
                        "Dropping relationship {} -> {}: unusable type '{}'",
                        rel.source, rel.target, rel.rel_type
                    );
                    stats.relationships_skipped += 1;
                    continue;
                }
            };

            let cypher = relationship_merge_query(&rel_type);
            match self
                .graph()
                .run(
                    query(&cypher)
                        .param("source_id", rel.source.as_str())
                        .param("target_id", rel.target.as_str()),
                )
                .await
            {
                Ok(()) => stats.relationships_merged += 1,
                Err(e) => {
                    warn!(
                        "Failed to merge relationship {} -[{}]-> {}: {}",
                        rel.source, rel_type, rel.target, e
                    );
                    stats.relationships_skipped += 1;
                }
            }
        }

        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_label_title_cases_and_strips() {
        assert_eq!(sanitize_label("Person"), Some("Person".to_string()));
        assert_eq!(sanitize_label("software engineer"), Some("SoftwareEngineer".to_string()));
        assert_eq!(sanitize_label("location!"), Some("Location".to_string()));
        assert_eq!(sanitize_label("c++ library"), Some("CLibrary".to_string()));
        assert_eq!(sanitize_label("abc1def"), Some("Abc1Def".to_string()));
    }

    #[test]
    fn sanitize_label_drops_unusable_types() {
        assert_eq!(sanitize_label(""), None);
        assert_eq!(sanitize_label("!!! ---"), None);
        assert_eq!(sanitize_label("   "), None);
    }

    #[test]
    fn sanitize_rel_type_normalizes_to_upper_snake() {
        assert_eq!(sanitize_rel_type("capital of"), Some("CAPITAL_OF".to_string()));
        assert_eq!(sanitize_rel_type("CAPITAL_OF"), Some("CAPITAL_OF".to_string()));
        assert_eq!(sanitize_rel_type("works-at"), Some("WORKSAT".to_string()));
        assert_eq!(sanitize_rel_type("is a"), Some("IS_A".to_string()));
    }

    #[test]
    fn sanitize_rel_type_drops_unusable_types() {
        assert_eq!(sanitize_rel_type(""), None);
        assert_eq!(sanitize_rel_type("123!"), None);
    }

    #[test]
    fn node_query_parameterizes_id() {
        let cypher = node_merge_query("Location");
        assert!(cypher.starts_with("MERGE (n:Location {id: $id})"));
        assert!(cypher.contains("n:Entity"));
        // Upsert keyed on the natural id, never CREATE
        assert!(!cypher.contains("CREATE"));
    }

    #[test]
    fn relationship_query_matches_both_endpoints() {
        let cypher = relationship_merge_query("CAPITAL_OF");
        assert!(cypher.contains("MATCH (a {id: $source_id})"));
        assert!(cypher.contains("MATCH (b {id: $target_id})"));
        assert!(cypher.contains("MERGE (a)-[r:CAPITAL_OF]->(b)"));
        assert!(!cypher.contains("CREATE"));
    }
}
