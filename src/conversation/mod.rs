//! Conversational question answering over indexed documents.
//!
//! The engine is stateless apart from its providers and settings; everything
//! that changes over a conversation lives in a [`Session`] passed in by the
//! caller.


pub mod prompts;
pub mod session;
pub mod transcript;

pub use session::{RebuildPolicy, Session, SessionState};
pub use transcript::Transcript;

use tracing::{debug, info};

use crate::config::Config;
use crate::embeddings::{ChunkingConfig, EmbeddingProvider, chunk_text};
use crate::indexer::build_index;
use crate::llm::{ChatMessage, ChatModel};
use crate::{PdfChatError, Result};

/// Settings the engine needs from the wider configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineSettings {
    pub chunking: ChunkingConfig,
    pub top_k: usize,
    pub on_rebuild: RebuildPolicy,
    pub condense_question: bool,
}

impl Default for EngineSettings {
    #[inline]
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl EngineSettings {
    #[inline]
    pub fn from_config(config: &Config) -> Self {
        Self {
            chunking: config.chunking.clone(),
            top_k: config.retrieval.top_k,
            on_rebuild: config.conversation.on_rebuild,
            condense_question: config.conversation.condense_question,
        }
    }
}

/// Result of indexing a batch of text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexSummary {
    pub chunks: usize,
    pub characters: usize,
    pub transcript_cleared: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Nothing has been indexed yet
    NoDocuments,
    /// The question was empty or whitespace
    EmptyQuestion,
}

#[derive(Debug, PartialEq, Eq)]
pub enum AskOutcome<'a> {
    Answered(&'a Transcript),
    Skipped(SkipReason),
}

pub struct ConversationEngine<E, M> {
    embedder: E,
    chat_model: M,
    settings: EngineSettings,
}

impl<E: EmbeddingProvider, M: ChatModel> ConversationEngine<E, M> {
    #[inline]
    pub fn new(embedder: E, chat_model: M, settings: EngineSettings) -> Self {
        Self {
            embedder,
            chat_model,
            settings,
        }
    }

    #[inline]
    pub fn embedder(&self) -> &E {
        &self.embedder
    }

    #[inline]
    pub fn chat_model(&self) -> &M {
        &self.chat_model
    }

    #[inline]
    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Chunk and embed `text`, then make the result the session's active index.
    ///
    /// On failure the session keeps its previous index and transcript.
    #[inline]
    pub fn process_text(&self, session: &mut Session, text: &str) -> Result<IndexSummary> {
        let chunks = chunk_text(text, &self.settings.chunking)?;
        debug!(
            "Split {} characters into {} chunks",
            text.chars().count(),
            chunks.len()
        );

        let index = build_index(&chunks, &self.embedder)?;
        let had_history = !session.transcript().is_empty();
        session.install_index(index, self.settings.on_rebuild);

        let summary = IndexSummary {
            chunks: chunks.len(),
            characters: text.chars().count(),
            transcript_cleared: had_history
                && self.settings.on_rebuild == RebuildPolicy::ClearTranscript,
        };
        info!("Documents processed: {} chunks indexed", summary.chunks);

        Ok(summary)
    }

    /// Answer `question` from the active index, recording the exchange in the transcript
    #[inline]
    pub fn ask<'s>(&self, session: &'s mut Session, question: &str) -> Result<AskOutcome<'s>> {
        let question = question.trim();
        if question.is_empty() {
            return Ok(AskOutcome::Skipped(SkipReason::EmptyQuestion));
        }

        let Some(index) = session.index() else {
            debug!("Question asked before any documents were processed");
            return Ok(AskOutcome::Skipped(SkipReason::NoDocuments));
        };

        let history = session.transcript().messages();
        let retrieval_query = self.retrieval_query(history, question)?;

        let query_embedding = self.embedder.embed_query(&retrieval_query)?;
        let context = index.search(&query_embedding, self.settings.top_k)?;
        debug!("Retrieved {} chunks for question", context.len());

        let mut messages = Vec::with_capacity(history.len() + 2);
        messages.push(prompts::answer_system_message(&context));
        messages.extend_from_slice(history);
        messages.push(ChatMessage::user(question));

        let answer = self.chat_model.complete(&messages)?;
        if answer.content.trim().is_empty() {
            return Err(PdfChatError::Generation(
                "Model returned an empty answer".to_string(),
            ));
        }

        session.transcript_mut().push_exchange(question, answer);
        Ok(AskOutcome::Answered(session.transcript()))
    }

    fn retrieval_query(&self, history: &[ChatMessage], question: &str) -> Result<String> {
        if !self.settings.condense_question || history.is_empty() {
            return Ok(question.to_string());
        }

        let request = prompts::condense_question_message(history, question);
        let condensed = self.chat_model.complete(&[request])?;
        let condensed = condensed.content.trim();
        if condensed.is_empty() {
            return Ok(question.to_string());
        }

        debug!("Condensed follow-up question to: {}", condensed);
        Ok(condensed.to_string())
    }
}
