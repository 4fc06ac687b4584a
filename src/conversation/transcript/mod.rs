
use crate::llm::{ChatMessage, Role};

/// Chronological history of user questions and assistant answers.
///
/// Entries are only ever added in (user, assistant) pairs, so the list always
/// alternates starting with the user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transcript {
    messages: Vec<ChatMessage>,
}

impl Transcript {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one completed exchange
    #[inline]
    pub fn push_exchange(&mut self, question: impl Into<String>, answer: ChatMessage) {
        self.messages.push(ChatMessage::user(question));
        self.messages.push(ChatMessage {
            role: Role::Assistant,
            content: answer.content,
        });
    }

    #[inline]
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Iterate (question, answer) pairs in order
    #[inline]
    pub fn exchanges(&self) -> impl Iterator<Item = (&str, &str)> {
        self.messages
            .chunks_exact(2)
            .map(|pair| (pair[0].content.as_str(), pair[1].content.as_str()))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    #[inline]
    pub fn clear(&mut self) {
        self.messages.clear();
    }
}
