use serde::{Deserialize, Serialize};

/// A single entity extracted from text.
///
/// `id` is the entity's display name and doubles as the natural key in the
/// graph store: re-ingesting the same id merges into the existing node.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Node {
    /// Unique identifier for the node, usually the entity name.
    pub id: String,

    /// Type/category of the node (e.g. Person, Technology).
    #[serde(rename = "type")]
    pub node_type: String,
}

/// A directed, typed edge between two extracted entities.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Relationship {
    /// ID of the source node.
    pub source: String,

    /// ID of the target node.
    pub target: String,

    /// Relationship type in UPPERCASE_SNAKE_CASE format.
    #[serde(rename = "type")]
    pub rel_type: String,
}

/// One chunk's worth of extraction output.
///
/// Transient: produced by the extraction service, consumed by the merge step,
/// never persisted outside the graph store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraphFragment {
    #[serde(default)]
    pub nodes: Vec<Node>,

    #[serde(default)]
    pub relationships: Vec<Relationship>,
}

impl GraphFragment {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.relationships.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fragment_deserializes_with_missing_fields() {
        let fragment: GraphFragment = serde_json::from_str("{}").unwrap();
        assert!(fragment.is_empty());

        let fragment: GraphFragment =
            serde_json::from_str(r#"{"nodes": [{"id": "Paris", "type": "Location"}]}"#).unwrap();
        assert_eq!(fragment.nodes.len(), 1);
        assert_eq!(fragment.nodes[0].node_type, "Location");
        assert!(fragment.relationships.is_empty());
    }

    #[test]
    fn relationship_round_trips_type_field() {
        let rel = Relationship {
            source: "Paris".to_string(),
            target: "France".to_string(),
            rel_type: "CAPITAL_OF".to_string(),
        };
        let json = serde_json::to_value(&rel).unwrap();
        assert_eq!(json["type"], "CAPITAL_OF");
        let back: Relationship = serde_json::from_value(json).unwrap();
        assert_eq!(back, rel);
    }
}
