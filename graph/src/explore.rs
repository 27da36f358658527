//! Read-only query facade for the interactive explorer.
//!
//! Every operation is a single parameterized Cypher query: no caching, no
//! retries, no pagination beyond a caller-supplied limit.

use crate::client::GraphClient;
use crate::errors::{GraphError, GraphResult};
use neo4rs::query;
use std::collections::BTreeMap;

#[derive(Debug, Clone)]
pub struct LabelCount {
    pub label: String,
    pub count: i64,
}

#[derive(Debug, Clone)]
pub struct RelTypeCount {
    pub rel_type: String,
    pub count: i64,
}

/// Aggregate statistics for the whole graph.
#[derive(Debug, Clone)]
pub struct GraphSummary {
    pub node_count: i64,
    pub relationship_count: i64,
    pub labels: Vec<LabelCount>,
    pub relationship_types: Vec<RelTypeCount>,
}

#[derive(Debug, Clone)]
pub struct NodeDetails {
    pub id: String,
    pub labels: Vec<String>,
    /// Property name/value pairs, values stringified by the store.
    pub properties: Vec<(String, String)>,
}

#[derive(Debug, Clone)]
pub struct NodeHit {
    pub id: String,
    pub labels: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Outgoing,
    Incoming,
}

/// One neighbor of a node, as seen from that node.
#[derive(Debug, Clone)]
pub struct NeighborEntry {
    pub target: String,
    pub target_labels: Vec<String>,
    pub direction: Direction,
}

#[derive(Debug, Clone)]
pub struct PathNode {
    pub id: String,
    pub labels: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct PathRel {
    pub rel_type: String,
    pub source: String,
    pub target: String,
}

#[derive(Debug, Clone)]
pub struct PathHit {
    pub nodes: Vec<PathNode>,
    pub relationships: Vec<PathRel>,
}

#[derive(Debug, Clone)]
pub struct DuplicateRel {
    pub source: String,
    pub target: String,
    pub rel_type: String,
    pub count: i64,
}

#[derive(Debug, Clone)]
pub struct SearchHit {
    pub id: String,
    pub labels: Vec<String>,
    pub matched_terms: Vec<String>,
}

impl GraphClient {
    /// Node/relationship counts plus per-label and per-type histograms.
    pub async fn summary(&self) -> GraphResult<GraphSummary> {
        let node_count = self.single_count("MATCH (n) RETURN count(n) as count").await?;
        let relationship_count = self
            .single_count("MATCH ()-[r]->() RETURN count(r) as count")
            .await?;

        let mut labels = Vec::new();
        let mut result = self
            .graph()
            .execute(query(
                "MATCH (n) \
                 UNWIND labels(n) as label \
                 RETURN label, count(*) as count \
                 ORDER BY count DESC",
            ))
            .await
            .map_err(|e| GraphError::Neo4j(e.to_string()))?;
        while let Some(row) = result
            .next()
            .await
            .map_err(|e| GraphError::Neo4j(e.to_string()))?
        {
            labels.push(LabelCount {
                label: row.get("label").map_err(|e| GraphError::Neo4j(e.to_string()))?,
                count: row.get("count").map_err(|e| GraphError::Neo4j(e.to_string()))?,
            });
        }

        let mut relationship_types = Vec::new();
        let mut result = self
            .graph()
            .execute(query(
                "MATCH ()-[r]->() \
                 RETURN type(r) as type, count(*) as count \
                 ORDER BY count DESC",
            ))
            .await
            .map_err(|e| GraphError::Neo4j(e.to_string()))?;
        while let Some(row) = result
            .next()
            .await
            .map_err(|e| GraphError::Neo4j(e.to_string()))?
        {
            relationship_types.push(RelTypeCount {
                rel_type: row.get("type").map_err(|e| GraphError::Neo4j(e.to_string()))?,
                count: row.get("count").map_err(|e| GraphError::Neo4j(e.to_string()))?,
            });
        }

        Ok(GraphSummary {
            node_count,
            relationship_count,
            labels,
            relationship_types,
        })
    }

    /// Look a node up by its natural id. Property values are stringified in
    /// the query so the rows stay simply typed.
    pub async fn get_node(&self, node_id: &str) -> GraphResult<Option<NodeDetails>> {
        let mut result = self
            .graph()
            .execute(
                query(
                    "MATCH (n {id: $node_id}) \
                     RETURN n.id as id, labels(n) as labels, \
                            [k IN keys(n) | [k, toString(n[k])]] as props",
                )
                .param("node_id", node_id),
            )
            .await
            .map_err(|e| GraphError::Neo4j(e.to_string()))?;

        let row = match result
            .next()
            .await
            .map_err(|e| GraphError::Neo4j(e.to_string()))?
        {
            Some(row) => row,
            None => return Ok(None),
        };

        let props: Vec<Vec<String>> =
            row.get("props").map_err(|e| GraphError::Neo4j(e.to_string()))?;
        let properties = props
            .into_iter()
            .filter_map(|pair| {
                let mut it = pair.into_iter();
                Some((it.next()?, it.next().unwrap_or_default()))
            })
            .collect();

        Ok(Some(NodeDetails {
            id: row.get("id").map_err(|e| GraphError::Neo4j(e.to_string()))?,
            labels: row.get("labels").map_err(|e| GraphError::Neo4j(e.to_string()))?,
            properties,
        }))
    }

    /// Case-insensitive substring search on node ids.
    pub async fn search_nodes(&self, term: &str, limit: i64) -> GraphResult<Vec<NodeHit>> {
        let mut result = self
            .graph()
            .execute(
                query(
                    "MATCH (n) \
                     WHERE toLower(n.id) CONTAINS toLower($term) \
                     RETURN n.id as id, labels(n) as labels \
                     LIMIT $limit",
                )
                .param("term", term)
                .param("limit", limit),
            )
            .await
            .map_err(|e| GraphError::Neo4j(e.to_string()))?;

        let mut hits = Vec::new();
        while let Some(row) = result
            .next()
            .await
            .map_err(|e| GraphError::Neo4j(e.to_string()))?
        {
            hits.push(NodeHit {
                id: row.get("id").map_err(|e| GraphError::Neo4j(e.to_string()))?,
                labels: row.get("labels").map_err(|e| GraphError::Neo4j(e.to_string()))?,
            });
        }
        Ok(hits)
    }

    /// All relationships touching a node, grouped by relationship type.
    pub async fn node_relationships(
        &self,
        node_id: &str,
    ) -> GraphResult<BTreeMap<String, Vec<NeighborEntry>>> {
        let mut result = self
            .graph()
            .execute(
                query(
                    "MATCH (a {id: $node_id})-[r]-(b) \
                     RETURN type(r) as type, \
                            startNode(r).id as source, \
                            b.id as neighbor, \
                            labels(b) as neighbor_labels \
                     ORDER BY type",
                )
                .param("node_id", node_id),
            )
            .await
            .map_err(|e| GraphError::Neo4j(e.to_string()))?;

        let mut grouped: BTreeMap<String, Vec<NeighborEntry>> = BTreeMap::new();
        while let Some(row) = result
            .next()
            .await
            .map_err(|e| GraphError::Neo4j(e.to_string()))?
        {
            let rel_type: String =
                row.get("type").map_err(|e| GraphError::Neo4j(e.to_string()))?;
            let source: String =
                row.get("source").map_err(|e| GraphError::Neo4j(e.to_string()))?;
            let neighbor: String =
                row.get("neighbor").map_err(|e| GraphError::Neo4j(e.to_string()))?;
            let neighbor_labels: Vec<String> = row
                .get("neighbor_labels")
                .map_err(|e| GraphError::Neo4j(e.to_string()))?;

            grouped.entry(rel_type).or_default().push(NeighborEntry {
                target: neighbor,
                target_labels: neighbor_labels,
                direction: if source == node_id {
                    Direction::Outgoing
                } else {
                    Direction::Incoming
                },
            });
        }
        Ok(grouped)
    }

    /// Shortest path between two nodes, bounded to `max_hops`.
    ///
    /// The hop bound has to be spliced into the pattern; Cypher does not
    /// allow it as a parameter.
    pub async fn find_paths(
        &self,
        source_id: &str,
        target_id: &str,
        max_hops: usize,
    ) -> GraphResult<Vec<PathHit>> {
        let cypher = format!(
            "MATCH path = shortestPath((a {{id: $source_id}})-[*..{}]-(b {{id: $target_id}})) \
             RETURN [n IN nodes(path) | n.id] as node_ids, \
                    [n IN nodes(path) | labels(n)] as node_labels, \
                    [r IN relationships(path) | type(r)] as rel_types, \
                    [r IN relationships(path) | startNode(r).id] as rel_sources, \
                    [r IN relationships(path) | endNode(r).id] as rel_targets",
            max_hops
        );

        let mut result = self
            .graph()
            .execute(
                query(&cypher)
                    .param("source_id", source_id)
                    .param("target_id", target_id),
            )
            .await
            .map_err(|e| GraphError::Neo4j(e.to_string()))?;

        let mut paths = Vec::new();
        while let Some(row) = result
            .next()
            .await
            .map_err(|e| GraphError::Neo4j(e.to_string()))?
        {
            let node_ids: Vec<String> =
                row.get("node_ids").map_err(|e| GraphError::Neo4j(e.to_string()))?;
            let node_labels: Vec<Vec<String>> = row
                .get("node_labels")
                .map_err(|e| GraphError::Neo4j(e.to_string()))?;
            let rel_types: Vec<String> =
                row.get("rel_types").map_err(|e| GraphError::Neo4j(e.to_string()))?;
            let rel_sources: Vec<String> = row
                .get("rel_sources")
                .map_err(|e| GraphError::Neo4j(e.to_string()))?;
            let rel_targets: Vec<String> = row
                .get("rel_targets")
                .map_err(|e| GraphError::Neo4j(e.to_string()))?;

            let nodes = node_ids
                .into_iter()
                .zip(node_labels)
                .map(|(id, labels)| PathNode { id, labels })
                .collect();
            let relationships = rel_types
                .into_iter()
                .zip(rel_sources.into_iter().zip(rel_targets))
                .map(|(rel_type, (source, target))| PathRel {
                    rel_type,
                    source,
                    target,
                })
                .collect();

            paths.push(PathHit {
                nodes,
                relationships,
            });
        }
        Ok(paths)
    }

    /// (source, target, type) triples asserted more than once.
    pub async fn duplicate_relationships(&self) -> GraphResult<Vec<DuplicateRel>> {
        let mut result = self
            .graph()
            .execute(query(
                "MATCH (a)-[r]->(b) \
                 WITH a.id as source, b.id as target, type(r) as type, count(*) as count \
                 WHERE count > 1 \
                 RETURN source, target, type, count \
                 ORDER BY count DESC",
            ))
            .await
            .map_err(|e| GraphError::Neo4j(e.to_string()))?;

        let mut duplicates = Vec::new();
        while let Some(row) = result
            .next()
            .await
            .map_err(|e| GraphError::Neo4j(e.to_string()))?
        {
            duplicates.push(DuplicateRel {
                source: row.get("source").map_err(|e| GraphError::Neo4j(e.to_string()))?,
                target: row.get("target").map_err(|e| GraphError::Neo4j(e.to_string()))?,
                rel_type: row.get("type").map_err(|e| GraphError::Neo4j(e.to_string()))?,
                count: row.get("count").map_err(|e| GraphError::Neo4j(e.to_string()))?,
            });
        }
        Ok(duplicates)
    }

    /// OR-combined case-insensitive substring match of each term against node
    /// ids, property names, and stringified property values. Recall-oriented:
    /// the only ranking is the number of matched terms.
    pub async fn semantic_search(
        &self,
        terms: &[String],
        limit: i64,
    ) -> GraphResult<Vec<SearchHit>> {
        if terms.is_empty() {
            return Ok(Vec::new());
        }

        let cypher = "MATCH (n) \
             WHERE ANY(term IN $terms WHERE \
                 toLower(n.id) CONTAINS term OR \
                 ANY(prop IN keys(n) WHERE \
                     toLower(prop) CONTAINS term OR \
                     toLower(toString(n[prop])) CONTAINS term \
                 ) \
             ) \
             RETURN DISTINCT n.id as id, labels(n) as labels, \
                    [term IN $terms WHERE \
                     toLower(n.id) CONTAINS term OR \
                     ANY(prop IN keys(n) WHERE \
                         toLower(prop) CONTAINS term OR \
                         toLower(toString(n[prop])) CONTAINS term \
                     ) | term] as matched_terms \
             ORDER BY size(matched_terms) DESC \
             LIMIT $limit";

        let mut result = self
            .graph()
            .execute(
                query(cypher)
                    .param("terms", terms.to_vec())
                    .param("limit", limit),
            )
            .await
            .map_err(|e| GraphError::Neo4j(e.to_string()))?;

        let mut hits = Vec::new();
        while let Some(row) = result
            .next()
            .await
            .map_err(|e| GraphError::Neo4j(e.to_string()))?
        {
            hits.push(SearchHit {
                id: row.get("id").map_err(|e| GraphError::Neo4j(e.to_string()))?,
                labels: row.get("labels").map_err(|e| GraphError::Neo4j(e.to_string()))?,
                matched_terms: row
                    .get("matched_terms")
                    .map_err(|e| GraphError::Neo4j(e.to_string()))?,
            });
        }
        Ok(hits)
    }

    async fn single_count(&self, cypher: &str) -> GraphResult<i64> {
        let mut result = self
            .graph()
            .execute(query(cypher))
            .await
            .map_err(|e| GraphError::Neo4j(e.to_string()))?;

        if let Some(row) = result
            .next()
            .await
            .map_err(|e| GraphError::Neo4j(e.to_string()))?
        {
            row.get("count").map_err(|e| GraphError::Neo4j(e.to_string()))
        } else {
            Ok(0)
        }
    }
}
