pub mod chunking;
pub mod graph;

pub use chunking::TextChunk;
pub use graph::{GraphFragment, Node, Relationship};
