use serde::{Deserialize, Serialize};

/// One sliding window over an input file.
///
/// Offsets are byte positions into the original text; windows overlap so that
/// entities straddling a boundary appear whole in at least one chunk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextChunk {
    /// Position of this chunk within its source file.
    pub index: usize,

    pub content: String,

    pub start_offset: usize,
    pub end_offset: usize,
}
