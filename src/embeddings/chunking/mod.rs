
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::ConfigError;

/// A slice of the source text ready for embedding
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextChunk {
    /// The chunk text
    pub content: String,
    /// Position of this chunk in the chunk sequence
    pub index: usize,
    /// Offset of the first character of this chunk in the source text, in characters
    pub start: usize,
}

impl TextChunk {
    /// Length of the chunk in characters
    #[inline]
    pub fn char_len(&self) -> usize {
        self.content.chars().count()
    }
}

/// Configuration for text chunking, in characters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingConfig {
    /// Maximum chunk length
    pub chunk_size: usize,
    /// Number of trailing characters of a chunk repeated at the start of the next one
    pub chunk_overlap: usize,
}

impl Default for ChunkingConfig {
    #[inline]
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            chunk_overlap: 200,
        }
    }
}

impl ChunkingConfig {
    #[inline]
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.chunk_size == 0 {
            return Err(ConfigError::InvalidChunkSize(self.chunk_size));
        }

        if self.chunk_overlap >= self.chunk_size {
            return Err(ConfigError::OverlapTooLarge(
                self.chunk_overlap,
                self.chunk_size,
            ));
        }

        Ok(())
    }
}

/// Split `text` into overlapping chunks, preferring to end chunks on a line break.
///
/// Every chunk holds at most `chunk_size` characters and starts with the last
/// `chunk_overlap` characters of the chunk before it. Blank input yields no chunks.
#[inline]
pub fn chunk_text(text: &str, config: &ChunkingConfig) -> Result<Vec<TextChunk>, ConfigError> {
    config.validate()?;

    if text.trim().is_empty() {
        return Ok(Vec::new());
    }

    let chars: Vec<char> = text.chars().collect();
    let total = chars.len();
    let mut chunks = Vec::new();
    let mut start = 0;

    loop {
        if total - start <= config.chunk_size {
            push_chunk(&mut chunks, &chars, start, total);
            break;
        }

        let end = split_point(&chars, start, config);
        push_chunk(&mut chunks, &chars, start, end);
        start = end - config.chunk_overlap;
    }

    debug!(
        "Chunked {} characters into {} chunks (size {}, overlap {})",
        total,
        chunks.len(),
        config.chunk_size,
        config.chunk_overlap
    );

    Ok(chunks)
}

/// Find where the chunk starting at `start` ends.
///
/// Prefers the position right after the last newline in the window, as long as
/// that still moves the next chunk forward; otherwise cuts at the window end.
fn split_point(chars: &[char], start: usize, config: &ChunkingConfig) -> usize {
    let window_end = start + config.chunk_size;
    let min_end = start + config.chunk_overlap + 1;

    chars
        .get(start..window_end)
        .and_then(|window| window.iter().rposition(|&c| c == '\n'))
        .map(|newline| start + newline + 1)
        .filter(|&end| end >= min_end)
        .unwrap_or(window_end)
}

fn push_chunk(chunks: &mut Vec<TextChunk>, chars: &[char], start: usize, end: usize) {
    let content: String = chars.get(start..end).unwrap_or_default().iter().collect();

    // Whitespace-only windows carry nothing worth embedding
    if content.trim().is_empty() {
        return;
    }

    chunks.push(TextChunk {
        content,
        index: chunks.len(),
        start,
    });
}
