#[cfg(test)]
mod tests;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{Embedding, EmbeddingProvider};
use crate::config::ProviderConfig;
use crate::provider::ApiClient;
use crate::{PdfChatError, Result};

const EMBEDDINGS_ENDPOINT: &str = "embeddings";

/// Client for an OpenAI-compatible `/embeddings` endpoint
#[derive(Debug, Clone)]
pub struct OpenAiEmbeddings {
    client: ApiClient,
    model: String,
    dimension: usize,
    batch_size: usize,
}

#[derive(Debug, Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Debug, Deserialize)]
struct EmbedResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    index: usize,
    embedding: Vec<f32>,
}

impl OpenAiEmbeddings {
    #[inline]
    pub fn new(config: &ProviderConfig) -> Result<Self> {
        let client = ApiClient::new(config)?;
        Ok(Self::with_client(client, config))
    }

    #[inline]
    pub fn with_client(client: ApiClient, config: &ProviderConfig) -> Self {
        Self {
            client,
            model: config.embedding_model.clone(),
            dimension: config.embedding_dimension as usize,
            batch_size: config.batch_size as usize,
        }
    }

    #[inline]
    pub fn model(&self) -> &str {
        &self.model
    }

    #[inline]
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Embedding>> {
        let request = EmbedRequest {
            model: &self.model,
            input: texts,
        };

        let response: EmbedResponse = self.client.post_json(EMBEDDINGS_ENDPOINT, &request)?;

        if response.data.len() != texts.len() {
            return Err(PdfChatError::Embedding(format!(
                "Mismatch between request and response counts: {} vs {}",
                texts.len(),
                response.data.len()
            )));
        }

        let mut data = response.data;
        data.sort_by_key(|d| d.index);

        data.into_iter()
            .enumerate()
            .map(|(position, item)| {
                if item.index != position {
                    return Err(PdfChatError::Embedding(format!(
                        "Response is missing the embedding for input {}",
                        position
                    )));
                }
                if item.embedding.len() != self.dimension {
                    return Err(PdfChatError::Embedding(format!(
                        "Expected {} dimensions from model {}, got {}",
                        self.dimension,
                        self.model,
                        item.embedding.len()
                    )));
                }
                Ok(item.embedding)
            })
            .collect()
    }
}

impl EmbeddingProvider for OpenAiEmbeddings {
    #[inline]
    fn embed_documents(&self, texts: &[String]) -> Result<Vec<Embedding>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        debug!(
            "Generating embeddings for {} texts with {}",
            texts.len(),
            self.model
        );

        let mut embeddings = Vec::with_capacity(texts.len());
        for batch in texts.chunks(self.batch_size.max(1)) {
            embeddings.extend(self.embed_batch(batch)?);
        }

        debug!("Generated {} embeddings total", embeddings.len());
        Ok(embeddings)
    }

    #[inline]
    fn embed_query(&self, text: &str) -> Result<Embedding> {
        let mut embeddings = self.embed_batch(&[text.to_string()])?;
        embeddings
            .pop()
            .ok_or_else(|| PdfChatError::Embedding("Empty response for query".to_string()))
    }
}
