
use tracing::debug;

use crate::embeddings::Embedding;
use crate::{PdfChatError, Result};

/// A chunk of text stored alongside its embedding
#[derive(Debug, Clone, PartialEq)]
pub struct IndexedChunk {
    pub text: String,
    pub embedding: Embedding,
}

/// A search hit; lower distances are closer matches
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredChunk {
    pub text: String,
    pub distance: f32,
}

/// In-memory exact nearest-neighbour index over chunk embeddings.
///
/// Searches scan every entry and rank by squared Euclidean distance.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorIndex {
    dimension: usize,
    entries: Vec<IndexedChunk>,
}

impl VectorIndex {
    /// Pair each text with its embedding. All embeddings must share one non-zero dimension.
    #[inline]
    pub fn from_embeddings(texts: Vec<String>, embeddings: Vec<Embedding>) -> Result<Self> {
        if texts.len() != embeddings.len() {
            return Err(PdfChatError::Index(format!(
                "Got {} embeddings for {} chunks",
                embeddings.len(),
                texts.len()
            )));
        }

        let dimension = embeddings.first().map_or(0, Vec::len);
        if dimension == 0 {
            return Err(PdfChatError::Index(
                "Cannot build an index without embeddings".to_string(),
            ));
        }

        if let Some(position) = embeddings.iter().position(|e| e.len() != dimension) {
            return Err(PdfChatError::Index(format!(
                "Embedding {} has {} dimensions, expected {}",
                position,
                embeddings[position].len(),
                dimension
            )));
        }

        let entries = texts
            .into_iter()
            .zip(embeddings)
            .map(|(text, embedding)| IndexedChunk { text, embedding })
            .collect::<Vec<_>>();

        debug!(
            "Built vector index with {} entries of dimension {}",
            entries.len(),
            dimension
        );

        Ok(Self { dimension, entries })
    }

    #[inline]
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn entries(&self) -> &[IndexedChunk] {
        &self.entries
    }

    /// Return up to `k` entries closest to `query`, nearest first; ties keep insertion order
    #[inline]
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<ScoredChunk>> {
        if query.len() != self.dimension {
            return Err(PdfChatError::Index(format!(
                "Query has {} dimensions, index has {}",
                query.len(),
                self.dimension
            )));
        }

        let mut scored: Vec<(f32, &IndexedChunk)> = self
            .entries
            .iter()
            .map(|entry| (squared_l2(query, &entry.embedding), entry))
            .collect();

        scored.sort_by(|a, b| a.0.total_cmp(&b.0));

        Ok(scored
            .into_iter()
            .take(k)
            .map(|(distance, entry)| ScoredChunk {
                text: entry.text.clone(),
                distance,
            })
            .collect())
    }
}

fn squared_l2(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b)
        .map(|(x, y)| {
            let diff = x - y;
            diff * diff
        })
        .sum()
}
