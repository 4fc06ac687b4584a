// Embeddings module
// Text chunking and the embedding provider boundary

pub mod chunking;
pub mod openai;

pub use chunking::{ChunkingConfig, TextChunk, chunk_text};
pub use openai::OpenAiEmbeddings;

use crate::Result;

/// A fixed-dimension vector describing the meaning of a piece of text
pub type Embedding = Vec<f32>;

/// Source of embedding vectors for documents and queries
pub trait EmbeddingProvider {
    /// Embed a batch of texts; the result has the same length and order as `texts`
    fn embed_documents(&self, texts: &[String]) -> Result<Vec<Embedding>>;

    /// Embed a single search query
    fn embed_query(&self, text: &str) -> Result<Embedding>;
}

impl<T: EmbeddingProvider + ?Sized> EmbeddingProvider for &T {
    #[inline]
    fn embed_documents(&self, texts: &[String]) -> Result<Vec<Embedding>> {
        (**self).embed_documents(texts)
    }

    #[inline]
    fn embed_query(&self, text: &str) -> Result<Embedding> {
        (**self).embed_query(text)
    }
}
