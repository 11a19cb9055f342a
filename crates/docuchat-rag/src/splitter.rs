//! Overlapping text splitter

use serde_json::json;

use docuchat_core::{Chunk, Document, Error, Result};

/// Splits document text into overlapping windows of at most `chunk_size`
/// characters, with `chunk_overlap` characters shared between adjacent
/// chunks.
///
/// Each window prefers to end on a paragraph, newline, or sentence boundary
/// found in the tail of the window, falling back to a hard character cut.
/// The next window always starts exactly `chunk_overlap` characters before
/// the previous cut, so concatenating the chunks with the overlap stripped
/// reconstructs the source text.
#[derive(Debug, Clone)]
pub struct TextSplitter {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl TextSplitter {
    pub const DEFAULT_CHUNK_SIZE: usize = 1000;
    pub const DEFAULT_CHUNK_OVERLAP: usize = 100;

    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Result<Self> {
        if chunk_size == 0 {
            return Err(Error::Configuration("chunk_size must be positive".to_string()));
        }
        if chunk_overlap >= chunk_size {
            return Err(Error::Configuration(format!(
                "chunk_overlap ({}) must be smaller than chunk_size ({})",
                chunk_overlap, chunk_size
            )));
        }
        Ok(Self {
            chunk_size,
            chunk_overlap,
        })
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn chunk_overlap(&self) -> usize {
        self.chunk_overlap
    }

    /// Split a document, copying its metadata to every chunk and recording
    /// each chunk's index.
    pub fn split(&self, document: &Document) -> Vec<Chunk> {
        self.split_text(&document.text)
            .into_iter()
            .enumerate()
            .map(|(i, text)| {
                let mut metadata = document.metadata.clone();
                if let Some(map) = metadata.as_object_mut() {
                    map.insert("chunk_index".to_string(), json!(i));
                }
                Chunk { text, metadata }
            })
            .collect()
    }

    /// Split raw text into overlapping windows.
    pub fn split_text(&self, text: &str) -> Vec<String> {
        let chars: Vec<char> = text.chars().collect();
        if chars.len() <= self.chunk_size {
            // A document shorter than one window is a single chunk.
            return vec![text.to_string()];
        }

        let mut chunks = Vec::new();
        let mut start = 0;
        loop {
            let end = (start + self.chunk_size).min(chars.len());
            let cut = if end == chars.len() {
                end
            } else {
                self.find_cut(&chars, start, end)
            };

            chunks.push(chars[start..cut].iter().collect());
            if cut == chars.len() {
                break;
            }
            start = cut - self.chunk_overlap;
        }

        chunks
    }

    /// Pick a cut point in `(floor, end]`, preferring a paragraph break,
    /// then a newline, then a sentence end; otherwise cut hard at `end`.
    ///
    /// The floor keeps the cut past the overlap region (so the walk always
    /// advances) and past the window midpoint (so chunks stay reasonably
    /// full).
    fn find_cut(&self, chars: &[char], start: usize, end: usize) -> usize {
        let floor = start + (self.chunk_size / 2).max(self.chunk_overlap + 1);
        if floor >= end {
            return end;
        }

        // Paragraph break: cut after "\n\n".
        for i in (floor..end).rev() {
            if i >= 2 && chars[i - 1] == '\n' && chars[i - 2] == '\n' {
                return i;
            }
        }
        // Line break: cut after '\n'.
        for i in (floor..end).rev() {
            if chars[i - 1] == '\n' {
                return i;
            }
        }
        // Sentence end: cut after ". ".
        for i in (floor..end).rev() {
            if i >= 2 && chars[i - 2] == '.' && chars[i - 1] == ' ' {
                return i;
            }
        }

        end
    }
}

impl Default for TextSplitter {
    fn default() -> Self {
        Self {
            chunk_size: Self::DEFAULT_CHUNK_SIZE,
            chunk_overlap: Self::DEFAULT_CHUNK_OVERLAP,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reconstruct(chunks: &[String], overlap: usize) -> String {
        let mut text: String = chunks.first().cloned().unwrap_or_default();
        for chunk in &chunks[1..] {
            text.extend(chunk.chars().skip(overlap));
        }
        text
    }

    #[test]
    fn test_short_document_yields_single_chunk() {
        let splitter = TextSplitter::new(100, 10).unwrap();
        let chunks = splitter.split_text("a short note");
        assert_eq!(chunks, vec!["a short note".to_string()]);
    }

    #[test]
    fn test_chunks_respect_max_size_and_reconstruct() {
        let splitter = TextSplitter::new(50, 10).unwrap();
        let text = "The holiday policy covers twelve paid holidays. Employees may carry \
                    over up to five unused days. Carried days expire at the end of March. \
                    Requests go through the HR portal.";
        let chunks = splitter.split_text(text);

        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert!(chunk.chars().count() <= 50);
        }
        assert_eq!(reconstruct(&chunks, 10), text);
    }

    #[test]
    fn test_prefers_sentence_boundary() {
        let splitter = TextSplitter::new(60, 5).unwrap();
        let text = "First sentence here. Second sentence follows on. Third one is much longer than the rest of them.";
        let chunks = splitter.split_text(text);
        // The first cut lands after a ". " boundary, not mid-word.
        assert!(chunks[0].ends_with(". "), "got {:?}", chunks[0]);
    }

    #[test]
    fn test_prefers_paragraph_boundary() {
        let splitter = TextSplitter::new(40, 5).unwrap();
        let text = "alpha beta gamma delta epsilon\n\nzeta eta theta iota kappa lambda mu nu xi";
        let chunks = splitter.split_text(text);
        assert!(chunks[0].ends_with("\n\n"), "got {:?}", chunks[0]);
        assert_eq!(reconstruct(&chunks, 5), text);
    }

    #[test]
    fn test_hard_cut_fallback_reconstructs() {
        let splitter = TextSplitter::new(20, 4).unwrap();
        let text: String = "x".repeat(95);
        let chunks = splitter.split_text(&text);
        for chunk in &chunks {
            assert!(chunk.chars().count() <= 20);
        }
        assert_eq!(reconstruct(&chunks, 4), text);
    }

    #[test]
    fn test_metadata_copied_to_every_chunk() {
        let splitter = TextSplitter::new(30, 5).unwrap();
        let doc = Document::new(
            "one two three four five six seven eight nine ten eleven twelve",
            serde_json::json!({"source": "policy.pdf"}),
        );
        let chunks = splitter.split(&doc);
        assert!(chunks.len() > 1);
        for (i, chunk) in chunks.iter().enumerate() {
            assert_eq!(chunk.metadata["source"], "policy.pdf");
            assert_eq!(chunk.metadata["chunk_index"], i);
        }
    }

    #[test]
    fn test_invalid_configuration_rejected() {
        assert!(TextSplitter::new(0, 0).is_err());
        assert!(TextSplitter::new(10, 10).is_err());
        assert!(TextSplitter::new(10, 20).is_err());
    }
}
