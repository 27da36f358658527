//! Neo4j client for the GraphLoom knowledge graph.
//!
//! `client` owns the connection, `explore` holds the read-only query facade
//! used by the interactive explorer, and `merge` holds the idempotent
//! fragment upsert used by the ingest pipeline.

pub mod client;
pub mod errors;
pub mod explore;
pub mod merge;

pub use client::GraphClient;
pub use errors::{GraphError, GraphResult};
pub use merge::MergeStats;
