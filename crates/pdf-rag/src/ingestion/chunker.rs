//! Fixed-size word chunking

use crate::error::{Error, Result};

/// Default number of words per chunk
pub const DEFAULT_CHUNK_SIZE: usize = 500;

/// Splits text into chunks of a fixed number of whitespace-separated words
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WordChunker {
    /// Words per chunk
    chunk_size: usize,
}

impl WordChunker {
    /// Create a new chunker; `chunk_size` must be at least 1
    pub fn new(chunk_size: usize) -> Result<Self> {
        if chunk_size == 0 {
            return Err(Error::Config("chunk_size must be at least 1".to_string()));
        }
        Ok(Self { chunk_size })
    }

    /// Words per chunk
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Chunk text into groups of `chunk_size` words joined by single spaces.
    ///
    /// Every chunk holds exactly `chunk_size` words except the last, which
    /// holds the remainder. Empty or whitespace-only text yields no chunks.
    pub fn chunk(&self, text: &str) -> Vec<String> {
        let words: Vec<&str> = text.split_whitespace().collect();

        words
            .chunks(self.chunk_size)
            .map(|window| window.join(" "))
            .collect()
    }
}

impl Default for WordChunker {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

/// Chunk `text` into `chunk_size`-word segments
pub fn chunk(text: &str, chunk_size: usize) -> Result<Vec<String>> {
    Ok(WordChunker::new(chunk_size)?.chunk(text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_five_words_by_two() {
        let chunks = chunk("a b c d e", 2).unwrap();
        assert_eq!(chunks, vec!["a b", "c d", "e"]);
    }

    #[test]
    fn test_empty_text() {
        assert!(chunk("", 3).unwrap().is_empty());
        assert!(chunk(" \n\t ", 3).unwrap().is_empty());
    }

    #[test]
    fn test_whitespace_is_collapsed() {
        let chunks = chunk("  one\ttwo\n\nthree   four ", 3).unwrap();
        assert_eq!(chunks, vec!["one two three", "four"]);
    }

    #[test]
    fn test_exact_multiple_has_no_short_tail() {
        let chunks = chunk("a b c d", 2).unwrap();
        assert_eq!(chunks, vec!["a b", "c d"]);
    }

    #[test]
    fn test_zero_chunk_size_rejected() {
        assert!(matches!(chunk("a b", 0), Err(Error::Config(_))));
        assert!(WordChunker::new(0).is_err());
    }

    #[test]
    fn test_default_size() {
        let text = vec!["w"; 1001].join(" ");
        let chunks = WordChunker::default().chunk(&text);
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[2], "w");
    }

    proptest! {
        #[test]
        fn prop_rejoin_reconstructs_words(text in "[a-z \\n\\t]{0,300}", size in 1usize..20) {
            let chunks = chunk(&text, size).unwrap();
            let expected: Vec<&str> = text.split_whitespace().collect();
            prop_assert_eq!(chunks.join(" "), expected.join(" "));
        }

        #[test]
        fn prop_chunk_lengths(text in "[a-z ]{0,300}", size in 1usize..20) {
            let chunks = chunk(&text, size).unwrap();
            if let Some((last, rest)) = chunks.split_last() {
                for c in rest {
                    prop_assert_eq!(c.split_whitespace().count(), size);
                }
                let tail = last.split_whitespace().count();
                prop_assert!(tail >= 1 && tail <= size);
            }
        }
    }
}
