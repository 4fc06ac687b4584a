// Prompt text for retrieval-augmented answering

use crate::indexer::ScoredChunk;
use crate::llm::{ChatMessage, Role};

pub const ANSWER_SYSTEM_TEMPLATE: &str = "Use the following pieces of context to answer the user's question. \nIf you don't know the answer, just say that you don't know, don't try to make up an answer.\n----------------\n{context}";

pub const CONDENSE_QUESTION_TEMPLATE: &str = "Given the following conversation and a follow up question, rephrase the follow up question to be a standalone question, in its original language.\n\nChat History:\n{chat_history}\nFollow Up Input: {question}\nStandalone question:";

const CONTEXT_SEPARATOR: &str = "\n\n";

/// System message carrying the retrieved chunks
#[inline]
pub fn answer_system_message(context: &[ScoredChunk]) -> ChatMessage {
    let joined = context
        .iter()
        .map(|chunk| chunk.text.as_str())
        .collect::<Vec<_>>()
        .join(CONTEXT_SEPARATOR);
    ChatMessage::system(ANSWER_SYSTEM_TEMPLATE.replace("{context}", &joined))
}

/// Single user message asking the model to rewrite a follow-up as a standalone question
#[inline]
pub fn condense_question_message(history: &[ChatMessage], question: &str) -> ChatMessage {
    let prompt = CONDENSE_QUESTION_TEMPLATE
        .replace("{chat_history}", &format_history(history))
        .replace("{question}", question);
    ChatMessage::user(prompt)
}

/// Render history as `Human:`/`Assistant:` lines
#[inline]
pub fn format_history(history: &[ChatMessage]) -> String {
    history
        .iter()
        .map(|message| {
            let speaker = match message.role {
                Role::User => "Human",
                Role::Assistant => "Assistant",
                Role::System => "System",
            };
            format!("{}: {}", speaker, message.content)
        })
        .collect::<Vec<_>>()
        .join("\n")
}
