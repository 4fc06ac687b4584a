// Indexer module
// Turns text chunks into a searchable vector index


pub mod vector_index;

pub use vector_index::{IndexedChunk, ScoredChunk, VectorIndex};

use tracing::{debug, info};

use crate::embeddings::{EmbeddingProvider, TextChunk};
use crate::{PdfChatError, Result};

/// Embed every chunk and build a fresh index over them.
///
/// An empty chunk list means the PDFs had no usable text, so the provider is never called.
#[inline]
pub fn build_index<E: EmbeddingProvider + ?Sized>(
    chunks: &[TextChunk],
    embedder: &E,
) -> Result<VectorIndex> {
    if chunks.is_empty() {
        return Err(PdfChatError::NoExtractableText);
    }

    let texts: Vec<String> = chunks.iter().map(|chunk| chunk.content.clone()).collect();
    debug!("Requesting embeddings for {} chunks", texts.len());

    let embeddings = embedder.embed_documents(&texts)?;
    if embeddings.len() != texts.len() {
        return Err(PdfChatError::Embedding(format!(
            "Expected {} embeddings, got {}",
            texts.len(),
            embeddings.len()
        )));
    }

    let index = VectorIndex::from_embeddings(texts, embeddings)?;
    info!("Indexed {} chunks", index.len());

    Ok(index)
}
