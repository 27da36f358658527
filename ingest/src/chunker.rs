//! Sliding-window text chunking.
//!
//! Fixed-size character windows with overlap, so entities cut off at one
//! window boundary appear whole in the next. Overlap can duplicate
//! extractions across windows; the merge step is idempotent, so that is
//! tolerated rather than prevented.

use graphloom_models::TextChunk;

pub struct TextChunker {
    chunk_size: usize,
    overlap: usize,
}

impl TextChunker {
    pub fn new(chunk_size: usize, overlap: usize) -> Self {
        // Overlap must leave room for forward progress
        let overlap = overlap.min(chunk_size.saturating_sub(1));
        Self {
            chunk_size: chunk_size.max(1),
            overlap,
        }
    }

    /// Split text into overlapping windows, preferring to break at a newline
    /// or sentence end inside the window. Whitespace-only windows are skipped.
    pub fn split(&self, content: &str) -> Vec<TextChunk> {
        let mut chunks = Vec::new();
        let len = content.len();
        let mut start = 0;
        let mut index = 0;

        while start < len {
            let mut end = (start + self.chunk_size).min(len);
            while !content.is_char_boundary(end) {
                end -= 1;
            }

            // A break point inside the overlap region would stall the window
            let chunk_end = if end < len {
                match find_break_point(&content[start..end]) {
                    Some(p) if p > self.overlap => start + p,
                    _ => end,
                }
            } else {
                end
            };

            let window = &content[start..chunk_end];
            if !window.trim().is_empty() {
                chunks.push(TextChunk {
                    index,
                    content: window.to_string(),
                    start_offset: start,
                    end_offset: chunk_end,
                });
                index += 1;
            }

            if chunk_end >= len {
                break;
            }

            let mut next = chunk_end.saturating_sub(self.overlap).max(start + 1);
            while !content.is_char_boundary(next) {
                next += 1;
            }
            start = next;
        }

        chunks
    }
}

/// Last newline or sentence end in the window, if any.
fn find_break_point(window: &str) -> Option<usize> {
    let bytes = window.as_bytes();
    for i in (0..bytes.len()).rev() {
        if bytes[i] == b'\n' {
            return Some(i + 1);
        }
        if (bytes[i] == b'.' || bytes[i] == b'!' || bytes[i] == b'?')
            && i + 1 < bytes.len()
            && bytes[i + 1] == b' '
        {
            return Some(i + 2);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_is_a_single_chunk() {
        let chunker = TextChunker::new(512, 50);
        let chunks = chunker.split("Paris is the capital of France.");
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].content, "Paris is the capital of France.");
        assert_eq!(chunks[0].start_offset, 0);
        assert_eq!(chunks[0].index, 0);
    }

    #[test]
    fn empty_text_yields_no_chunks() {
        let chunker = TextChunker::new(512, 50);
        assert!(chunker.split("").is_empty());
        assert!(chunker.split("   \n\n  ").is_empty());
    }

    #[test]
    fn long_text_produces_overlapping_windows() {
        let chunker = TextChunker::new(40, 10);
        let text = "The quick brown fox jumps over the lazy dog. \
                    Pack my box with five dozen liquor jugs. \
                    How vexingly quick daft zebras jump.";
        let chunks = chunker.split(text);
        assert!(chunks.len() > 1);

        // Windows cover the whole input
        assert_eq!(chunks[0].start_offset, 0);
        assert_eq!(chunks.last().unwrap().end_offset, text.len());

        // Consecutive windows overlap or at least touch
        for pair in chunks.windows(2) {
            assert!(pair[1].start_offset <= pair[0].end_offset);
            assert!(pair[1].start_offset > pair[0].start_offset);
        }
    }

    #[test]
    fn offsets_index_back_into_the_source() {
        let chunker = TextChunker::new(30, 5);
        let text = "First sentence here. Second sentence follows. Third one ends it.";
        for chunk in chunker.split(text) {
            assert_eq!(&text[chunk.start_offset..chunk.end_offset], chunk.content);
        }
    }

    #[test]
    fn prefers_sentence_boundaries() {
        let chunker = TextChunker::new(30, 0);
        let text = "Short one. A second sentence that runs longer than the window.";
        let chunks = chunker.split(text);
        assert!(chunks[0].content.ends_with(". "));
    }

    #[test]
    fn multibyte_text_does_not_split_characters() {
        let chunker = TextChunker::new(10, 3);
        let text = "héllø wörld résumé naïve café déjà vu";
        let chunks = chunker.split(text);
        assert!(!chunks.is_empty());
        // Reconstruction via offsets would panic on a broken boundary
        for chunk in &chunks {
            assert_eq!(&text[chunk.start_offset..chunk.end_offset], chunk.content);
        }
    }
}
