use crate::errors::{GraphError, GraphResult};
use graphloom_config::Settings;
use neo4rs::{query, ConfigBuilder, Graph};
use std::sync::Arc;

/// Neo4j client shared by the explorer and ingest binaries.
///
/// Process-scoped: connected once at startup, dropped at process exit.
/// There is no retry or backoff layer; a connection failure here is fatal
/// for the run.
pub struct GraphClient {
    graph: Arc<Graph>,
}

impl GraphClient {
    /// Connect to Neo4j and verify the connection with a probe query.
    ///
    /// Supports local `bolt://` URIs as well as `neo4j+s://` AuraDB URIs.
    pub async fn connect(settings: &Settings) -> GraphResult<Self> {
        tracing::info!("🔷 Connecting to Neo4j at: {}", settings.neo4j_uri);

        let config = ConfigBuilder::default()
            .uri(&settings.neo4j_uri)
            .user(&settings.neo4j_user)
            .password(&settings.neo4j_password)
            .db("neo4j")
            .fetch_size(500)
            .max_connections(10)
            .build()
            .map_err(|e| GraphError::Neo4j(format!("Failed to build Neo4j config: {}", e)))?;

        let graph = Graph::connect(config)
            .await
            .map_err(|e| GraphError::Neo4j(format!("Failed to connect to Neo4j: {}", e)))?;

        // Liveness probe before handing the client out
        let mut result = graph
            .execute(query("RETURN 1 as test"))
            .await
            .map_err(|e| GraphError::Neo4j(format!("Connection test failed: {}", e)))?;

        if result
            .next()
            .await
            .map_err(|e| GraphError::Neo4j(e.to_string()))?
            .is_some()
        {
            tracing::info!("✅ Neo4j connection established successfully");
        }

        Ok(Self {
            graph: Arc::new(graph),
        })
    }

    pub(crate) fn graph(&self) -> &Graph {
        &self.graph
    }
}
