use thiserror::Error;

#[derive(Error, Debug)]
pub enum GraphError {
    #[error("Neo4j error: {0}")]
    Neo4j(String),
}

pub type GraphResult<T> = Result<T, GraphError>;
